//! # Service設定・共有状態
//!
//! 環境変数からの設定読み込みとServiceの共有状態の定義。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::directory::KeyDirectory;
use crate::key_store::KeyStore;

/// 鍵ストアのルートディレクトリ（既定値）
const DEFAULT_KEY_PATH: &str = "/keys";
/// 署名鍵一式のシークレット名（既定値）
const DEFAULT_SECRET_NAME: &str = "pgp-key";
/// HKP鍵ディレクトリのアドレス（既定値）
const DEFAULT_HKP_ADDRESS: &str = "http://localhost:11371";
/// 待ち受けアドレス（既定値）
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
/// `RUST_LOG` 未設定時のログレベル（既定値）
const DEFAULT_LOG_LEVEL: &str = "info";

/// 起動時に読み込む設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// 鍵ストアのルート（`PGP_KEY_PATH`）
    pub key_path: PathBuf,
    /// 署名鍵一式のシークレット名（`PGP_SECRET`）
    pub secret_name: String,
    /// HKP鍵ディレクトリのベースURL（`HKP_ADDRESS`）。末尾の `/` は除去済み。
    pub hkp_address: String,
    /// 鍵ディレクトリ問い合わせのタイムアウト（`HKP_TIMEOUT_SECS`）。未設定なら無制限。
    pub hkp_timeout: Option<Duration>,
    /// 待ち受けアドレス（`LISTEN_ADDR`）
    pub listen_addr: String,
    /// `RUST_LOG` 未設定時のログフィルタ（`PGP_LOG_LEVEL`）
    pub log_level: String,
}

impl ServiceConfig {
    /// 環境変数から読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の変数ソースから読み込む。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let hkp_timeout = lookup("HKP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("HKP_TIMEOUT_SECSは秒数である必要があります: {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            key_path: PathBuf::from(var_or("PGP_KEY_PATH", DEFAULT_KEY_PATH)),
            secret_name: var_or("PGP_SECRET", DEFAULT_SECRET_NAME),
            hkp_address: var_or("HKP_ADDRESS", DEFAULT_HKP_ADDRESS)
                .trim_end_matches('/')
                .to_string(),
            hkp_timeout,
            listen_addr: var_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            log_level: var_or("PGP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        })
    }
}

/// Serviceの共有状態。リクエスト間で読み取り専用。
pub struct ServiceState {
    /// 署名鍵一式の読み込み元
    pub key_store: Box<dyn KeyStore>,
    /// 検証用公開鍵の取得先
    pub key_directory: Box<dyn KeyDirectory>,
    /// 署名に使う鍵一式のシークレット名
    pub secret_name: String,
}
