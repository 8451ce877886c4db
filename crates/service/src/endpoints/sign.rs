//! # POST /pgp/sign
//!
//! ## 処理フロー
//! 1. ペイロードを正規化
//! 2. 鍵ストアから鍵素材一式を読み込む（リクエストごと、キャッシュなし）
//! 3. パスフレーズで秘密鍵を復号し分離署名
//! 4. 公開鍵のフィンガープリントを添えて返却（秘密鍵と異なる公開鍵は500）

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine;
use pgp_service_crypto::canonicalize;
use pgp_service_types::SignResponse;

use super::{b64, run_blocking};
use crate::config::ServiceState;
use crate::error::ServiceError;

/// POST /pgp/sign — ペイロードへの分離署名。
pub async fn handle_sign(
    State(state): State<Arc<ServiceState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<SignResponse>, ServiceError> {
    let Json(payload) = body.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    tracing::info!("署名リクエスト");

    let canonical = canonicalize(&payload);
    tracing::debug!(payload = %canonical.to_text(), "正規化済みペイロード");

    let key_pair = state.key_store.load_key_material(&state.secret_name).await?;

    let (signature, fingerprint) = run_blocking(move || {
        // public.asc と private.asc が同じ鍵であることを先に確認
        let fingerprint = key_pair.fingerprint()?;
        let signature = pgp_service_crypto::sign(&key_pair, &canonical)?;
        Ok((signature, fingerprint))
    })
    .await?;

    tracing::debug!(signature = %signature.as_armored(), "分離署名");
    tracing::info!(%fingerprint, "署名完了");

    Ok(Json(SignResponse {
        signature: b64().encode(signature.as_armored()),
        fingerprint: fingerprint.to_string(),
    }))
}
