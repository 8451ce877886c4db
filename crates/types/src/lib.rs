//! # PGP Service 共有型定義
//!
//! HTTP境界でやり取りされるリクエスト・レスポンスをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - Base64: アーマー形式の分離署名（`-----BEGIN PGP SIGNATURE-----` を含むテキスト全体）
//! - Hex: 公開鍵フィンガープリント（小文字、プレフィックスなし）

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /pgp/sign
// ---------------------------------------------------------------------------

/// /pgp/sign レスポンス。
///
/// リクエストボディは任意のJSON値（ペイロード）なので専用の型を持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    /// Base64エンコードされたアーマー形式の分離署名
    pub signature: String,
    /// 署名に使用した鍵の公開鍵フィンガープリント
    pub fingerprint: String,
}

// ---------------------------------------------------------------------------
// POST /pgp/validate
// ---------------------------------------------------------------------------

/// /pgp/validate リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// 署名対象のペイロード。署名時と同じ正規化が適用される。
    pub input: serde_json::Value,
    /// Base64エンコードされたアーマー形式の分離署名
    pub signature: String,
    /// 鍵ディレクトリから公開鍵を引くためのフィンガープリント
    pub fingerprint: String,
}

/// /pgp/validate の成功レスポンス。
///
/// `success` は検証処理が最後まで実行できたことを表し、
/// 署名が一致したかどうかは `valid` が表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// 失敗レスポンス
// ---------------------------------------------------------------------------

/// 全エンドポイント共通の失敗レスポンス。
///
/// /pgp/validate では `valid: false` が付与され、/pgp/sign では省略される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    /// /pgp/sign 用の失敗レスポンス。
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            valid: None,
            success: false,
            message: message.into(),
        }
    }

    /// /pgp/validate 用の失敗レスポンス（`valid: false` 付き）。
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: Some(false),
            success: false,
            message: message.into(),
        }
    }
}
