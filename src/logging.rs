use tracing_subscriber::{fmt, EnvFilter};

/// tracingの初期化
///
/// `RUST_LOG` があればそれに従う。なければ `info`（`--verbose` 時は `debug`）。
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // テストなどで既に初期化済みの場合は無視
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
