use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Overrides `--log-level` with full filter directives when set,
/// e.g. `PRT7_LOG=prt7_frame=trace`.
pub const LOG_ENV: &str = "PRT7_LOG";

/// Crates whose events `--log-level` controls. Everything else is held at
/// `error`.
const LOG_TARGETS: [&str; 3] = ["prt7", "prt7_frame", "prt7_transport"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive spelling of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives for a run: the `PRT7_LOG` value if non-empty, else
/// `level` applied to the decoder crates only.
pub fn filter_directives(level: LogLevel, env_override: Option<&str>) -> String {
    if let Some(directives) = env_override.map(str::trim).filter(|d| !d.is_empty()) {
        return directives.to_string();
    }

    let mut directives = String::from("error");
    for target in LOG_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(level.as_str());
    }
    directives
}

/// Install the stderr subscriber. Stdout is reserved for decoded output.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let env_override = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(level, env_override.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("warning: ignoring invalid {LOG_ENV} ({err})");
        EnvFilter::new(filter_directives(level, None))
    });

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
