//! # PGP Service 暗号処理
//!
//! JSONペイロードの正規化と、OpenPGP分離署名の作成・検証を提供する。
//! 鍵生成・署名演算・パケット符号化はrPGP（`pgp` クレート）に委譲する。
//!
//! ## 処理の流れ
//! | 操作 | 入力 | 出力 |
//! |------|------|------|
//! | [`canonicalize`] | 任意のJSON値 | [`CanonicalPayload`] |
//! | [`sign`] | [`KeyPair`] + [`CanonicalPayload`] | [`DetachedSignature`] |
//! | [`fingerprint_of`] | アーマー形式の公開鍵 | [`Fingerprint`] |
//! | [`verify`] | 公開鍵 + [`DetachedSignature`] + [`CanonicalPayload`] | [`VerificationOutcome`] |
//!
//! 署名側と検証側は必ず同じ [`CanonicalPayload::to_text`] のバイト列を扱う。

pub mod canonical;
pub mod fingerprint;
pub mod signer;
pub mod verifier;

pub use canonical::{canonicalize, CanonicalPayload};
pub use fingerprint::{fingerprint_of, fingerprints_of, Fingerprint};
pub use signer::{sign, DetachedSignature, KeyPair};
pub use verifier::{verify, VerificationOutcome};

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum PgpError {
    /// 公開鍵・秘密鍵のパースに失敗
    #[error("malformed key: {0}")]
    MalformedKey(String),
    /// 署名またはフィンガープリントのパースに失敗
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// パスフレーズによる秘密鍵の復号、または署名生成に失敗
    #[error("cannot decrypt private key: {0}")]
    KeyDecryptionFailed(String),
    /// 署名のアーマー化に失敗
    #[error("cannot armor signature: {0}")]
    Armor(String),
}

#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;
