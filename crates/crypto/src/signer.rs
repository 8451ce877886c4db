//! # 分離署名の作成
//!
//! パスフレーズで秘密鍵を復号し、正規化済みペイロードに対する
//! 分離署名（署名のみ、メッセージを含まない）を作成する。

use std::fmt;

use pgp::composed::{
    ArmorOptions, Deserializable, DetachedSignature as PgpDetachedSignature, SignedSecretKey,
};
use pgp::crypto::hash::HashAlgorithm;
use pgp::types::{KeyDetails, Password};

use crate::fingerprint::parse_public_key;
use crate::{CanonicalPayload, Fingerprint, PgpError};

/// 署名用の鍵素材一式（公開鍵・秘密鍵・パスフレーズ）。
///
/// 3点は常にまとめて読み込まれ、一部だけの状態では存在しない。
#[derive(Clone)]
pub struct KeyPair {
    /// アーマー形式の公開鍵
    pub public_key_armored: String,
    /// アーマー形式の秘密鍵（パスフレーズで保護）
    pub private_key_armored: String,
    /// 秘密鍵のパスフレーズ
    pub passphrase: String,
}

impl KeyPair {
    pub fn new(
        public_key_armored: impl Into<String>,
        private_key_armored: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            public_key_armored: public_key_armored.into(),
            private_key_armored: private_key_armored.into(),
            passphrase: passphrase.into(),
        }
    }

    /// 署名に使う鍵のフィンガープリント。
    ///
    /// 公開鍵と秘密鍵の主鍵が一致しない組は `MalformedKey`。
    pub fn fingerprint(&self) -> Result<Fingerprint, PgpError> {
        let public_key = parse_public_key(&self.public_key_armored)?;
        let secret_key = parse_secret_key(&self.private_key_armored)?;

        let public = Fingerprint::from_bytes(public_key.fingerprint().as_bytes());
        let secret = Fingerprint::from_bytes(secret_key.primary_key.fingerprint().as_bytes());
        if public != secret {
            return Err(PgpError::MalformedKey(format!(
                "public key {public} does not belong to private key {secret}"
            )));
        }
        Ok(public)
    }
}

// 秘密鍵とパスフレーズはログに出さない
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_armored", &self.public_key_armored)
            .field("private_key_armored", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// アーマー形式の分離署名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSignature(String);

impl DetachedSignature {
    /// アーマー形式のテキストから構築する。パースは検証時に行う。
    pub fn from_armored(armored: impl Into<String>) -> Self {
        Self(armored.into())
    }

    pub fn as_armored(&self) -> &str {
        &self.0
    }

    pub fn into_armored(self) -> String {
        self.0
    }
}

/// 正規化済みペイロードに分離署名する。
///
/// 署名タイプはバイナリ（0x00）、ハッシュはSHA-256。
/// 署名対象は [`CanonicalPayload::to_text`] のバイト列。
pub fn sign(key_pair: &KeyPair, payload: &CanonicalPayload) -> Result<DetachedSignature, PgpError> {
    let secret_key = parse_secret_key(&key_pair.private_key_armored)?;

    let password = Password::from(key_pair.passphrase.as_str());
    let text = payload.to_text();

    // 秘密鍵の復号（S2K）は署名生成の中で行われる
    let mut rng = rand::thread_rng();
    let signature = PgpDetachedSignature::sign_binary_data(
        &mut rng,
        &secret_key.primary_key,
        &password,
        HashAlgorithm::Sha256,
        text.as_bytes(),
    )
    .map_err(|e| PgpError::KeyDecryptionFailed(e.to_string()))?;

    let armored = signature
        .to_armored_string(ArmorOptions::default())
        .map_err(|e| PgpError::Armor(e.to_string()))?;

    Ok(DetachedSignature(armored))
}

fn parse_secret_key(private_key_armored: &str) -> Result<SignedSecretKey, PgpError> {
    let (secret_key, _headers) = SignedSecretKey::from_string(private_key_armored)
        .map_err(|e| PgpError::MalformedKey(format!("cannot parse private key: {e}")))?;
    Ok(secret_key)
}
