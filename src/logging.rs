use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "deepresearch_rs=debug"
    } else {
        "deepresearch_rs=info"
    }
}

/// 初始化日志，`RUST_LOG` 优先于 `verbose`
pub fn init_tracing(verbose: bool, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
