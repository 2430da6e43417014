use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Minimum severity for the stderr log stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives covering this workspace's crates at `level` and
/// nothing else, so dependency noise stays out of the stream.
fn workspace_filter(level: LogLevel) -> String {
    let level = level.directive();
    format!(
        "lcdlink={level},lcdlink_session={level},lcdlink_transport={level},lcdlink_proto={level}"
    )
}

/// Initialize plain-text logging on stderr. A `RUST_LOG` environment
/// variable takes precedence over the CLI level.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(workspace_filter(level)));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
