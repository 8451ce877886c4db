//! # Serviceエンドポイント
//!
//! ## API エンドポイント
//! - `GET /` — 稼働確認
//! - `POST /pgp/sign` — ペイロードへの分離署名
//! - `POST /pgp/validate` — 鍵ディレクトリの公開鍵による分離署名の検証

pub mod index;
pub mod sign;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use index::handle_index;
pub use sign::handle_sign;
pub use validate::handle_validate;

use std::sync::Arc;

use pgp_service_crypto::PgpError;

use crate::config::ServiceState;
use crate::error::ServiceError;

/// Base64エンジン（Standard）
pub(crate) fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// ルーターを構築する。
pub fn router(state: Arc<ServiceState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(handle_index))
        .route("/pgp/sign", axum::routing::post(handle_sign))
        .route("/pgp/validate", axum::routing::post(handle_validate))
        .layer(axum::middleware::from_fn(crate::telemetry::log_requests))
        .with_state(state)
}

/// CPU負荷の高いOpenPGP処理（S2K、署名、検証）をブロッキングスレッドで実行する。
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, PgpError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ServiceError::from)
}
