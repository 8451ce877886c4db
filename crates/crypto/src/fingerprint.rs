//! # 公開鍵フィンガープリント
//!
//! 署名レスポンスに含める「どの鍵で署名したか」と、
//! 検証リクエストで「どの鍵を取得するか」の両方に使う識別子。

use std::fmt;
use std::str::FromStr;

use pgp::composed::{Deserializable, SignedPublicKey};
use pgp::types::KeyDetails;

use crate::PgpError;

/// キーIDの16進桁数（8バイト）
const KEY_ID_HEX_LEN: usize = 16;
/// v4フィンガープリントの16進桁数（20バイト）
const V4_HEX_LEN: usize = 40;
/// v6フィンガープリントの16進桁数（32バイト）
const V6_HEX_LEN: usize = 64;

/// 小文字16進で表現された公開鍵フィンガープリント（またはキーID）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// 呼び出し元から渡された文字列をパースする。
    ///
    /// `0x` プレフィックスと大文字を許容し、16 / 40 / 64 桁の16進のみ受け付ける。
    pub fn parse(input: &str) -> Result<Self, PgpError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let valid_len = matches!(digits.len(), KEY_ID_HEX_LEN | V4_HEX_LEN | V6_HEX_LEN);
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PgpError::MalformedInput(format!(
                "invalid fingerprint format: {input:?}"
            )));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }

    /// 生のフィンガープリントバイト列から構築する。
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 16桁のキーIDかどうか。
    pub fn is_key_id(&self) -> bool {
        self.0.len() == KEY_ID_HEX_LEN
    }

    /// 2つの識別子が同じ鍵を指すかどうか。
    ///
    /// 片方がキーIDの場合、v4ではフィンガープリントの末尾8バイト、
    /// v6では先頭8バイトと比較する。
    pub fn matches(&self, other: &Fingerprint) -> bool {
        if self.0.len() == other.0.len() {
            return self.0 == other.0;
        }
        let (short, long) = if self.0.len() < other.0.len() {
            (self, other)
        } else {
            (other, self)
        };
        if !short.is_key_id() {
            return false;
        }
        match long.0.len() {
            V4_HEX_LEN => long.0.ends_with(&short.0),
            V6_HEX_LEN => long.0.starts_with(&short.0),
            _ => false,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = PgpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// アーマー形式の公開鍵をパースする。
pub(crate) fn parse_public_key(public_key_armored: &str) -> Result<SignedPublicKey, PgpError> {
    let (public_key, _headers) = SignedPublicKey::from_string(public_key_armored)
        .map_err(|e| PgpError::MalformedKey(format!("cannot parse public key: {e}")))?;
    Ok(public_key)
}

/// アーマー形式の公開鍵から主鍵のフィンガープリントを取り出す。
pub fn fingerprint_of(public_key_armored: &str) -> Result<Fingerprint, PgpError> {
    let public_key = parse_public_key(public_key_armored)?;
    Ok(Fingerprint::from_bytes(public_key.fingerprint().as_bytes()))
}

/// 主鍵と全副鍵のフィンガープリント。先頭は主鍵。
pub fn fingerprints_of(public_key_armored: &str) -> Result<Vec<Fingerprint>, PgpError> {
    let public_key = parse_public_key(public_key_armored)?;
    let mut fingerprints = vec![Fingerprint::from_bytes(public_key.fingerprint().as_bytes())];
    fingerprints.extend(
        public_key
            .public_subkeys
            .iter()
            .map(|subkey| Fingerprint::from_bytes(subkey.key.fingerprint().as_bytes())),
    );
    Ok(fingerprints)
}
