//! # ペイロード正規化
//!
//! 署名側と検証側が同一のバイト列を扱えるよう、JSON値のキーを再帰的に並べ替える。
//! `serde_json` の `preserve_order` フィーチャが有効かどうかに関係なく同じ結果になる。

use serde_json::{Map, Value};

/// 正規化済みペイロード。[`canonicalize`] 経由でのみ構築できる。
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPayload(Value);

impl CanonicalPayload {
    /// 正規化済みのJSON値。
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// 署名対象の安定したテキスト表現。
    ///
    /// 空白なしのコンパクトJSON（UTF-8）。署名・検証の両方がこのバイト列を使う。
    pub fn to_text(&self) -> String {
        self.0.to_string()
    }
}

/// ペイロードを正規化する。
///
/// - オブジェクトのキーは全階層で辞書順（Unicodeスカラー値順）に並べ替える
/// - 配列は要素の順序を保ったまま各要素を正規化する
/// - スカラー値はそのまま
pub fn canonicalize(payload: &Value) -> CanonicalPayload {
    CanonicalPayload(sort_keys(payload))
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::with_capacity(entries.len());
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        scalar => scalar.clone(),
    }
}
