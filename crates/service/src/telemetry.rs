//! # ログ出力
//!
//! - `RUST_LOG` があればそれを優先し、なければ `PGP_LOG_LEVEL` をフィルタとして使う
//! - 全リクエストのメソッド・パス・ステータスを記録する（`GET /` の稼働確認は除く）

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing_subscriber::EnvFilter;

/// グローバルなtracingサブスクライバを初期化する。
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// リクエストログ用ミドルウェア。
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;

    if uri.path() != "/" {
        tracing::info!(
            status = response.status().as_u16(),
            "HTTP {} {}",
            method,
            uri
        );
    }
    response
}
