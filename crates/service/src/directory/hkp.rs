//! # HKP 鍵ディレクトリ
//!
//! `GET {base}/pks/lookup?op=get&options=mr&search=0x{fingerprint}` で公開鍵を取得する。

use pgp_service_crypto::Fingerprint;
use reqwest::StatusCode;

use super::KeyDirectory;
use crate::error::ServiceError;

const KEY_BLOCK_BEGIN: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
const KEY_BLOCK_END: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// HKPプロトコルで公開鍵を取得する鍵ディレクトリ。
pub struct HkpDirectory {
    /// HKPサーバーのベースURL（例: "http://localhost:11371"）
    base_url: String,
    /// HTTPクライアント
    http_client: reqwest::Client,
}

impl HkpDirectory {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl KeyDirectory for HkpDirectory {
    async fn lookup_public_key(&self, fingerprint: &Fingerprint) -> Result<String, ServiceError> {
        let url = format!("{}/pks/lookup", self.base_url);
        let search = format!("0x{fingerprint}");

        tracing::debug!(%url, %fingerprint, "HKPで公開鍵を検索");

        let response = self
            .http_client
            .get(&url)
            .query(&[("op", "get"), ("options", "mr"), ("search", search.as_str())])
            .send()
            .await
            .map_err(|e| ServiceError::DirectoryUnreachable(format!("HKP request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::FingerprintNotFound(fingerprint.to_string()));
        }
        if !status.is_success() {
            return Err(ServiceError::DirectoryUnreachable(format!(
                "key directory returned HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            ServiceError::DirectoryUnreachable(format!("cannot read HKP response: {e}"))
        })?;

        extract_public_key_block(&body)
            .ok_or_else(|| ServiceError::FingerprintNotFound(fingerprint.to_string()))
    }
}

/// 応答本文から最初の公開鍵ブロックを取り出す。
fn extract_public_key_block(body: &str) -> Option<String> {
    let start = body.find(KEY_BLOCK_BEGIN)?;
    let end = start + body[start..].find(KEY_BLOCK_END)? + KEY_BLOCK_END.len();
    Some(format!("{}\n", &body[start..end]))
}
