//! ロギング初期化ユーティリティ
//!
//! tracing-subscriber を標準エラー出力に向けて初期化する。
//! 標準出力はレポート表示専用。

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// ログフィルタ文字列から `EnvFilter` を作成（不正な場合は既定値）
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// グローバルsubscriberを初期化
///
/// `AIXCL_LOG_LEVEL`（旧: `RUST_LOG`）でフィルタを指定できる。
/// 2回目以降の呼び出しはエラーを返す。
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let level = crate::config::get_log_level();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(build_filter(&level))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let filter = build_filter("aixcl=debug,warn").to_string();
        assert!(filter.contains("aixcl=debug"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_build_filter_invalid_falls_back() {
        let filter = build_filter("aixcl=notalevel");
        assert_eq!(filter.to_string(), "warn");
    }
}
