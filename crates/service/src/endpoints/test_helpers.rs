//! # エンドポイントテスト用共通ヘルパー
//!
//! sign, validate, 鍵ストア, HKPテストで共有するフィクスチャとモックサーバー群。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::Query;
use pgp_service_crypto::Fingerprint;

use crate::config::ServiceState;
use crate::directory::KeyDirectory;
use crate::error::ServiceError;
use crate::key_store::FileKeyStore;

pub use pgp_service_crypto::test_fixtures::{
    ABC_TEST_OTHER_KEY_SIGNATURE, ABC_TEST_SIGNATURE, ABC_TEST_SUBKEY_SIGNATURE,
    OTHER_FINGERPRINT, OTHER_PUBLIC_KEY, SUBKEY_SIGNER_PUBLIC_KEY,
    SUBKEY_SIGNER_SUBKEY_FINGERPRINT, TEST_FINGERPRINT, TEST_PUBLIC_KEY,
};

/// ワークスペース直下の `testdata/`（FileKeyStoreのルートとして使う）
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata")
}

/// 固定の鍵を返すテスト用鍵ディレクトリ。
/// 呼び出し回数を記録する。
#[derive(Clone, Default)]
pub struct StaticDirectory {
    keys: HashMap<String, String>,
    unreachable: bool,
    lookups: Arc<AtomicUsize>,
}

impl StaticDirectory {
    /// 何も登録されていないディレクトリ（全て FingerprintNotFound）
    pub fn empty() -> Self {
        Self::default()
    }

    /// フィンガープリントと公開鍵の組を登録する
    pub fn with_key(mut self, fingerprint: &str, public_key: &str) -> Self {
        self.keys.insert(fingerprint.to_string(), public_key.to_string());
        self
    }

    /// 常に通信失敗を返すディレクトリ
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// lookup_public_keyの呼び出し回数（clone間で共有）
    pub fn lookup_count(&self) -> Arc<AtomicUsize> {
        self.lookups.clone()
    }
}

#[async_trait::async_trait]
impl KeyDirectory for StaticDirectory {
    async fn lookup_public_key(&self, fingerprint: &Fingerprint) -> Result<String, ServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ServiceError::DirectoryUnreachable(
                "connection refused".to_string(),
            ));
        }
        self.keys
            .get(fingerprint.as_str())
            .cloned()
            .ok_or_else(|| ServiceError::FingerprintNotFound(fingerprint.to_string()))
    }
}

/// testdata/pgp-key で署名し、指定の鍵ディレクトリで検証する状態を構築する。
pub fn test_state(directory: StaticDirectory) -> Arc<ServiceState> {
    Arc::new(ServiceState {
        key_store: Box::new(FileKeyStore::new(testdata_dir())),
        key_directory: Box::new(directory),
        secret_name: "pgp-key".to_string(),
    })
}

/// ルーターを127.0.0.1の空きポートで起動し、ベースURLを返す。
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

/// Service本体を起動し、ベースURLを返す。
pub async fn start_service(state: Arc<ServiceState>) -> String {
    serve(crate::endpoints::router(state)).await
}

/// テスト鍵だけを知っているモックHKPサーバーを起動し、ベースURLを返す。
pub async fn start_mock_hkp() -> String {
    let app = axum::Router::new().route(
        "/pks/lookup",
        axum::routing::get(|Query(params): Query<HashMap<String, String>>| async move {
            let expected_search = format!("0x{TEST_FINGERPRINT}");
            let is_get = params.get("op").map(String::as_str) == Some("get");
            if is_get && params.get("search") == Some(&expected_search) {
                (axum::http::StatusCode::OK, TEST_PUBLIC_KEY.to_string())
            } else {
                (axum::http::StatusCode::NOT_FOUND, "No results found".to_string())
            }
        }),
    );
    serve(app).await
}

/// 接続を受け付けないポート番号。
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
