//! # POST /pgp/validate
//!
//! ## 処理フロー
//! 1. リクエストのパース（フィンガープリント形式、署名のBase64デコード）
//! 2. ペイロードを正規化
//! 3. 鍵ディレクトリからフィンガープリントに対応する公開鍵を取得
//! 4. 取得した鍵が要求したフィンガープリントのものであることを確認
//! 5. 分離署名を検証
//!
//! ## 応答
//! - `Valid` / `Invalid`: 200 `{valid, success: true}`
//! - それ以外の全ての失敗: 400 `{valid: false, success: false, message}`

mod handler;


pub use handler::handle_validate;
