//! /pgp/validate ハンドラ実装

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine;
use pgp_service_crypto::{
    canonicalize, fingerprints_of, verify, DetachedSignature, Fingerprint, PgpError,
    VerificationOutcome,
};
use pgp_service_types::{ValidateRequest, ValidateResponse};

use crate::config::ServiceState;
use crate::endpoints::{b64, run_blocking};
use crate::error::{ServiceError, ValidateRejection};

/// POST /pgp/validate — 分離署名の検証。
pub async fn handle_validate(
    State(state): State<Arc<ServiceState>>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ValidateRejection> {
    let Json(request) = body.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    tracing::info!(fingerprint = %request.fingerprint, "検証リクエスト");

    let fingerprint = Fingerprint::parse(&request.fingerprint)?;
    let signature = decode_signature(&request.signature)?;
    tracing::debug!(signature = %signature.as_armored(), "分離署名");

    let canonical = canonicalize(&request.input);
    tracing::debug!(payload = %canonical.to_text(), "正規化済みペイロード");

    // Step 3. 鍵ディレクトリから公開鍵を取得
    let public_key = state.key_directory.lookup_public_key(&fingerprint).await?;

    // Step 4. 別の鍵へのすり替えを拒否（主鍵・副鍵のいずれかと一致すればよい）
    let key_fingerprints = fingerprints_of(&public_key)?;
    if !key_fingerprints.iter().any(|fp| fp.matches(&fingerprint)) {
        let actual = key_fingerprints
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(ServiceError::FingerprintMismatch {
            requested: fingerprint.to_string(),
            actual,
        }
        .into());
    }

    // Step 5. 署名検証
    let outcome = run_blocking(move || verify(&public_key, &signature, &canonical)).await?;

    match outcome {
        VerificationOutcome::Valid => {
            tracing::debug!(%fingerprint, "署名は有効です");
            Ok(Json(ValidateResponse {
                valid: true,
                success: true,
            }))
        }
        VerificationOutcome::Invalid => {
            tracing::error!(%fingerprint, "署名が一致しません");
            Ok(Json(ValidateResponse {
                valid: false,
                success: true,
            }))
        }
        VerificationOutcome::SignerNotFound => {
            Err(ServiceError::SignerNotFound(fingerprint.to_string()).into())
        }
    }
}

/// Base64で運ばれたアーマー形式の署名をデコードする。
fn decode_signature(encoded: &str) -> Result<DetachedSignature, PgpError> {
    let bytes = b64()
        .decode(encoded.trim())
        .map_err(|e| PgpError::MalformedInput(format!("signature is not valid base64: {e}")))?;
    let armored = String::from_utf8(bytes)
        .map_err(|e| PgpError::MalformedInput(format!("signature is not UTF-8 text: {e}")))?;
    Ok(DetachedSignature::from_armored(armored))
}
