//! # GET /

/// GET / — 稼働確認。
pub async fn handle_index() -> &'static str {
    "PGP Service"
}
