use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};
use std::sync::OnceLock;

static LOG_INIT: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Filter used when `RUST_LOG` is unset. Covers the crate and the
/// `line_item` target emitted by `log_item!`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "cost_core=debug,line_item=debug,info"
    } else {
        "cost_core=info,line_item=info,warn"
    }
}

/// Install the global subscriber once; later calls are no-ops.
///
/// Logs go to stderr so stdout stays clean for the estimate itself.
/// `RUST_LOG` overrides the default filter.
pub fn setup_logging(format: LogFormat, verbose: bool) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(verbose)
                        .compact(),
                )
                .try_init(),
        };

        if let Err(e) = result {
            eprintln!("logging already initialised: {}", e);
        }
    });
}

#[macro_export]
macro_rules! log_item {
    ($level:ident, $item:expr, $($arg:tt)*) => {
        tracing::$level!(
            target: "line_item",
            item = $item,
            $($arg)*
        );
    };
}
