//! # 分離署名の検証
//!
//! ## 状態遷移
//! 1. 入力のパース（公開鍵・署名）。失敗はエラーとして伝播し、`Invalid` にはしない
//! 2. 署名の発行者と一致する鍵（主鍵・副鍵）を候補として選ぶ
//! 3. 候補ごとに署名を検証し `Valid` / `Invalid` を決める
//!
//! 候補が1つもない場合は `SignerNotFound`。検証を自動で再試行することはない。

use pgp::composed::{Deserializable, DetachedSignature as PgpDetachedSignature};
use pgp::types::{KeyDetails, VerifyingKey};

use crate::fingerprint::parse_public_key;
use crate::{CanonicalPayload, DetachedSignature, Fingerprint, PgpError};

/// 署名検証の結果。
///
/// 「検証できなかった」と「検証した結果一致しなかった」を区別するため、
/// `bool` ではなく3値で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// 署名が暗号学的に一致した
    Valid,
    /// 鍵と署名は正しくパースでき、検証した結果一致しなかった
    Invalid,
    /// 署名の発行者が渡された公開鍵のどの鍵とも一致せず、検証できなかった
    SignerNotFound,
}

impl VerificationOutcome {
    pub fn is_valid(self) -> bool {
        self == VerificationOutcome::Valid
    }
}

/// 公開鍵で分離署名を検証する。
pub fn verify(
    public_key_armored: &str,
    signature: &DetachedSignature,
    payload: &CanonicalPayload,
) -> Result<VerificationOutcome, PgpError> {
    let public_key = parse_public_key(public_key_armored)?;
    let (pgp_signature, _headers) = PgpDetachedSignature::from_string(signature.as_armored())
        .map_err(|e| PgpError::MalformedInput(format!("cannot parse signature: {e}")))?;

    let issuers = issuers_of(&pgp_signature);
    let text = payload.to_text();
    let data = text.as_bytes();

    let mut checked = false;
    if let Some(matched) = check_candidate(&pgp_signature, &public_key.primary_key, &issuers, data) {
        if matched {
            return Ok(VerificationOutcome::Valid);
        }
        checked = true;
    }
    for subkey in &public_key.public_subkeys {
        if let Some(matched) = check_candidate(&pgp_signature, &subkey.key, &issuers, data) {
            if matched {
                return Ok(VerificationOutcome::Valid);
            }
            checked = true;
        }
    }

    if checked {
        Ok(VerificationOutcome::Invalid)
    } else {
        Ok(VerificationOutcome::SignerNotFound)
    }
}

/// 署名パケットに記録された発行者（フィンガープリントとキーID）。
fn issuers_of(signature: &PgpDetachedSignature) -> Vec<Fingerprint> {
    let mut issuers: Vec<Fingerprint> = signature
        .signature
        .issuer_fingerprint()
        .into_iter()
        .map(|fp| Fingerprint::from_bytes(fp.as_bytes()))
        .collect();
    issuers.extend(
        signature
            .signature
            .issuer_key_id()
            .into_iter()
            .map(|key_id| Fingerprint::from_bytes(key_id.as_ref())),
    );
    issuers
}

/// 鍵が発行者と一致すれば検証結果を返し、一致しなければ `None`。
///
/// 発行者情報を持たない署名では全ての鍵が候補になる。
fn check_candidate<K>(
    signature: &PgpDetachedSignature,
    key: &K,
    issuers: &[Fingerprint],
    data: &[u8],
) -> Option<bool>
where
    K: VerifyingKey + KeyDetails,
{
    let key_fingerprint = Fingerprint::from_bytes(key.fingerprint().as_bytes());
    if !issuers.is_empty() && !issuers.iter().any(|issuer| issuer.matches(&key_fingerprint)) {
        return None;
    }
    Some(signature.verify(key, data).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{
        test_key_pair, ABC_TEST_OTHER_KEY_SIGNATURE, ABC_TEST_SIGNATURE,
        ABC_TEST_SUBKEY_SIGNATURE, OTHER_PUBLIC_KEY, SUBKEY_SIGNER_PUBLIC_KEY, TEST_PUBLIC_KEY,
    };
    use crate::{canonicalize, sign};
    use serde_json::json;

    fn abc_test() -> CanonicalPayload {
        canonicalize(&json!({"test": "test", "abc": "abc"}))
    }

    #[test]
    fn test_fixture_signature_is_valid() {
        let signature = DetachedSignature::from_armored(ABC_TEST_SIGNATURE);
        let outcome = verify(TEST_PUBLIC_KEY, &signature, &abc_test()).unwrap();
        assert_eq!(outcome, VerificationOutcome::Valid);
    }

    #[test]
    fn test_changed_value_is_invalid() {
        let signature = DetachedSignature::from_armored(ABC_TEST_SIGNATURE);
        let tampered = canonicalize(&json!({"test": "test2", "abc": "abc"}));
        let outcome = verify(TEST_PUBLIC_KEY, &signature, &tampered).unwrap();
        assert_eq!(outcome, VerificationOutcome::Invalid);
    }

    #[test]
    fn test_signing_subkey_signature_is_valid() {
        let signature = DetachedSignature::from_armored(ABC_TEST_SUBKEY_SIGNATURE);
        let outcome = verify(SUBKEY_SIGNER_PUBLIC_KEY, &signature, &abc_test()).unwrap();
        assert_eq!(outcome, VerificationOutcome::Valid);
    }

    #[test]
    fn test_signature_from_other_key_is_signer_not_found() {
        let signature = DetachedSignature::from_armored(ABC_TEST_OTHER_KEY_SIGNATURE);
        let outcome = verify(TEST_PUBLIC_KEY, &signature, &abc_test()).unwrap();
        assert_eq!(outcome, VerificationOutcome::SignerNotFound);

        // 正しい鍵を渡せば検証できる
        let outcome = verify(OTHER_PUBLIC_KEY, &signature, &abc_test()).unwrap();
        assert_eq!(outcome, VerificationOutcome::Valid);
    }

    #[test]
    fn test_garbage_signature_is_malformed_input() {
        let signature = DetachedSignature::from_armored("bad");
        let result = verify(TEST_PUBLIC_KEY, &signature, &abc_test());
        assert!(matches!(result, Err(PgpError::MalformedInput(_))), "{result:?}");
    }

    #[test]
    fn test_garbage_public_key_is_malformed_key() {
        let signature = DetachedSignature::from_armored(ABC_TEST_SIGNATURE);
        let result = verify("not a key", &signature, &abc_test());
        assert!(matches!(result, Err(PgpError::MalformedKey(_))), "{result:?}");
    }

    #[test]
    fn test_sign_then_verify_roundtrip() {
        let key_pair = test_key_pair();
        let payload = canonicalize(&json!({
            "order": {"items": [{"sku": "a-1", "qty": 2}], "total": 19},
            "customer": "c-42",
        }));

        let signature = sign(&key_pair, &payload).unwrap();
        let outcome = verify(&key_pair.public_key_armored, &signature, &payload).unwrap();
        assert!(outcome.is_valid());

        let tampered = canonicalize(&json!({
            "order": {"items": [{"sku": "a-1", "qty": 3}], "total": 19},
            "customer": "c-42",
        }));
        let outcome = verify(&key_pair.public_key_armored, &signature, &tampered).unwrap();
        assert_eq!(outcome, VerificationOutcome::Invalid);
    }
}
