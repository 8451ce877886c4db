//! # テスト用鍵・署名
//!
//! `testdata/` 配下のフィクスチャ。署名はGnuPGで事前に作成したもので、
//! 対象は `{"abc":"abc","test":"test"}`（正規化済みテキスト）。
//!
//! `test-fixtures` フィーチャで他クレートのテストからも参照する。

pub const TEST_PUBLIC_KEY: &str = include_str!("../../../testdata/pgp-key/public.asc");
pub const TEST_PRIVATE_KEY: &str = include_str!("../../../testdata/pgp-key/private.asc");
pub const TEST_PASSPHRASE: &str = include_str!("../../../testdata/pgp-key/password");
pub const TEST_FINGERPRINT: &str = "be4111124ea865e768053f506befb8038f780723";

pub const OTHER_PUBLIC_KEY: &str = include_str!("../../../testdata/other-key/public.asc");
pub const OTHER_FINGERPRINT: &str = "fda8531036c78f5d36c2bbdfa8a381c9f94bb424";

/// 署名専用の副鍵を持つ鍵（主鍵は認証のみ）
pub const SUBKEY_SIGNER_PUBLIC_KEY: &str =
    include_str!("../../../testdata/subkey-signer/public.asc");
pub const SUBKEY_SIGNER_PRIMARY_FINGERPRINT: &str = "c8808c859fca475bff50cdaff83c302d02b9ef9d";
pub const SUBKEY_SIGNER_SUBKEY_FINGERPRINT: &str = "56980b195214a544cab4f245d384edf08c5d1594";

/// テスト鍵による `{"abc":"abc","test":"test"}` の分離署名
pub const ABC_TEST_SIGNATURE: &str = include_str!("../../../testdata/signatures/abc-test.asc");
/// 別の鍵による同じペイロードの分離署名
pub const ABC_TEST_OTHER_KEY_SIGNATURE: &str =
    include_str!("../../../testdata/signatures/abc-test-other-key.asc");
/// 副鍵による同じペイロードの分離署名
pub const ABC_TEST_SUBKEY_SIGNATURE: &str =
    include_str!("../../../testdata/signatures/abc-test-subkey.asc");

pub fn test_key_pair() -> crate::KeyPair {
    crate::KeyPair::new(TEST_PUBLIC_KEY, TEST_PRIVATE_KEY, TEST_PASSPHRASE)
}
