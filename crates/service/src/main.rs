//! # PGP Service
//!
//! JSONペイロードへのOpenPGP分離署名と、HKP鍵ディレクトリの公開鍵による検証を提供する。
//!
//! ## 役割
//! - ペイロードの正規化（キーの再帰的ソート + コンパクトJSON）
//! - 鍵ストア（ファイル）の署名鍵による分離署名
//! - HKP鍵ディレクトリから取得した公開鍵による署名検証
//!
//! ## API エンドポイント
//! - `GET /` — 稼働確認
//! - `POST /pgp/sign` — 分離署名
//! - `POST /pgp/validate` — 署名検証

mod config;
mod directory;
mod endpoints;
mod error;
mod key_store;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;

use config::{ServiceConfig, ServiceState};
use directory::HkpDirectory;
use key_store::FileKeyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    telemetry::init_logging(&config.log_level);

    // 鍵ディレクトリ用HTTPクライアント
    let mut client_builder = reqwest::Client::builder();
    if let Some(timeout) = config.hkp_timeout {
        client_builder = client_builder.timeout(timeout);
    }
    let http_client = client_builder
        .build()
        .context("HTTPクライアントの構築に失敗")?;

    let state = Arc::new(ServiceState {
        key_store: Box::new(FileKeyStore::new(config.key_path.clone())),
        key_directory: Box::new(HkpDirectory::new(config.hkp_address.clone(), http_client)),
        secret_name: config.secret_name.clone(),
    });

    tracing::info!(
        key_path = %config.key_path.display(),
        secret = %config.secret_name,
        hkp_address = %config.hkp_address,
        "鍵ストアと鍵ディレクトリを設定しました"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("{} で待ち受けできません", config.listen_addr))?;
    tracing::info!("PGP Serviceを {} で起動します", config.listen_addr);

    axum::serve(listener, endpoints::router(state)).await?;

    Ok(())
}
