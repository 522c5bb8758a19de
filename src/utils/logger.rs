use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// verbose 時一律開到 debug，否則沿用設定檔的 `[monitoring] log_level`
pub fn cli_filter_directive(verbose: bool, log_level: &str) -> String {
    if verbose {
        "feedme_discovery=debug,info".to_string()
    } else {
        format!("feedme_discovery={}", log_level)
    }
}

pub fn init_cli_logger(verbose: bool, log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli_filter_directive(verbose, log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

/// 以設定檔的 log_level 初始化 JSON 格式日誌，方便送進集中式日誌系統
pub fn init_json_logger(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("feedme_discovery={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .json()
                .with_current_span(false),
        )
        .init();
}
