//! # 鍵ストア
//!
//! 署名用の鍵素材一式（公開鍵・秘密鍵・パスフレーズ）の読み込みを抽象化する。
//! ファイルシステム実装は `file` サブモジュールを参照。

pub mod file;

pub use file::FileKeyStore;

use pgp_service_crypto::KeyPair;

use crate::error::ServiceError;

/// 鍵素材一式を読み込むトレイト。
///
/// 3点のうち1つでも読めなければ全体が失敗し、部分的な [`KeyPair`] は返さない。
#[async_trait::async_trait]
pub trait KeyStore: Send + Sync {
    /// `secret_name` に対応する鍵素材一式を読み込む。
    ///
    /// 失敗時は [`ServiceError::KeyMaterialUnavailable`]。
    async fn load_key_material(&self, secret_name: &str) -> Result<KeyPair, ServiceError>;
}
