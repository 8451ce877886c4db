//! # 鍵ディレクトリ
//!
//! フィンガープリントから公開鍵を引く外部サービスの抽象インターフェース。
//! HKP実装は `hkp` サブモジュールを参照。
//!
//! 外部サービスの可用性はローカルで保証できないため、
//! テストでは固定の鍵を返す実装に差し替える。

pub mod hkp;

pub use hkp::HkpDirectory;

use pgp_service_crypto::Fingerprint;

use crate::error::ServiceError;

/// 鍵ディレクトリの抽象インターフェース。
#[async_trait::async_trait]
pub trait KeyDirectory: Send + Sync {
    /// フィンガープリントに対応するアーマー形式の公開鍵を取得する。
    ///
    /// - 該当なし・空の応答: [`ServiceError::FingerprintNotFound`]
    /// - 通信失敗・想定外のステータス: [`ServiceError::DirectoryUnreachable`]
    async fn lookup_public_key(&self, fingerprint: &Fingerprint) -> Result<String, ServiceError>;
}
