//! # Service エラー型
//!
//! 全エンドポイントで共通のエラー型。失敗は必ずログに残し、
//! 構造化された [`FailureResponse`] として呼び出し元に返す。

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::Json;
use pgp_service_crypto::PgpError;
use pgp_service_types::FailureResponse;

/// Serviceエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 鍵ストアから鍵素材を読み込めない（署名の前提条件）
    #[error("cannot read keys")]
    KeyMaterialUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 鍵・署名のパース、秘密鍵の復号に失敗
    #[error(transparent)]
    Pgp(#[from] PgpError),
    /// 鍵ディレクトリに該当する公開鍵がない
    #[error("invalid fingerprint: no key for {0} in key directory")]
    FingerprintNotFound(String),
    /// 鍵ディレクトリとの通信に失敗
    #[error("key directory unreachable: {0}")]
    DirectoryUnreachable(String),
    /// 署名の発行者が取得した公開鍵に含まれない
    #[error("invalid fingerprint: signature was not issued by key {0}")]
    SignerNotFound(String),
    /// 鍵ディレクトリが要求と異なる鍵を返した
    #[error("invalid fingerprint: key directory returned key {actual} for {requested}")]
    FingerprintMismatch { requested: String, actual: String },
    /// 不正なリクエスト（JSONパース失敗、必須フィールド欠落、Base64デコード失敗）
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 内部エラー（ブロッキングタスクの異常終了）
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// エラーに対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::KeyMaterialUnavailable { .. } | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // 署名側では自身の鍵の問題なのでサーバーエラー
            ServiceError::Pgp(PgpError::MalformedKey(_))
            | ServiceError::Pgp(PgpError::KeyDecryptionFailed(_))
            | ServiceError::Pgp(PgpError::Armor(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Pgp(PgpError::MalformedInput(_))
            | ServiceError::FingerprintNotFound(_)
            | ServiceError::SignerNotFound(_)
            | ServiceError::FingerprintMismatch { .. }
            | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::DirectoryUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// 失敗の詳細をログに残す。
    fn log(&self, status: StatusCode) {
        match self {
            ServiceError::KeyMaterialUnavailable { path, source } => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "鍵素材の読み込みに失敗"
                );
            }
            _ if status.is_server_error() => {
                tracing::error!(status = status.as_u16(), error = %self, "リクエスト処理に失敗");
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "リクエストを拒否");
            }
        }
    }
}

impl axum::response::IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        self.log(status);
        (status, Json(FailureResponse::new(self.to_string()))).into_response()
    }
}

/// /pgp/validate 用のエラーラッパー。
///
/// 失敗理由に関わらず400を返し、`valid: false` を付与する。
/// 「検証できなかった」を `valid: false, success: true` として返すことはない。
#[derive(Debug)]
pub struct ValidateRejection(pub ServiceError);

impl From<ServiceError> for ValidateRejection {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl From<PgpError> for ValidateRejection {
    fn from(error: PgpError) -> Self {
        Self(ServiceError::Pgp(error))
    }
}

impl axum::response::IntoResponse for ValidateRejection {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::BAD_REQUEST;
        self.0.log(status);
        (status, Json(FailureResponse::invalid(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> ServiceError {
        ServiceError::KeyMaterialUnavailable {
            path: PathBuf::from("/keys/pgp-key/private.asc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }
    }

    #[test]
    fn test_key_material_message_hides_path() {
        let error = unavailable();
        assert_eq!(error.to_string(), "cannot read keys");
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        let errors = [
            ServiceError::FingerprintNotFound("ab".into()),
            ServiceError::SignerNotFound("ab".into()),
            ServiceError::Pgp(PgpError::MalformedInput("bad".into())),
            ServiceError::BadRequest("missing field".into()),
        ];
        for error in errors {
            assert_eq!(error.status(), StatusCode::BAD_REQUEST, "{error}");
        }
    }

    #[test]
    fn test_signing_key_problems_are_server_errors() {
        let error = ServiceError::Pgp(PgpError::KeyDecryptionFailed("checksum".into()));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validate_rejection_is_always_bad_request() {
        use axum::response::IntoResponse;

        let response = ValidateRejection(ServiceError::DirectoryUnreachable("timeout".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ValidateRejection(unavailable()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
