//! Where the log level and format come from.
//!
//! Level precedence: `-q`/`-v` on the command line, then `RZW_LOG`, then
//! `RUST_LOG` directives, then `info`. Format: `--log-format`, then
//! `RZW_LOG_FORMAT`, then human-readable.

pub const ENV_LOG_LEVEL: &str = "RZW_LOG";
pub const ENV_LOG_FORMAT: &str = "RZW_LOG_FORMAT";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {} (expected human or jsonl)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Level requested by `-q` and repeated `-v`; `None` when neither is given.
    pub fn from_flags(quiet: bool, verbose: u8) -> Option<Self> {
        match (quiet, verbose) {
            (true, _) => Some(LogLevel::Error),
            (false, 0) => None,
            (false, 1) => Some(LogLevel::Debug),
            (false, _) => Some(LogLevel::Trace),
        }
    }

    /// Filter directive for the rzw crates.
    pub fn directive(self) -> String {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        format!("rzw_core={level},rzw={level}")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

/// Resolved logging setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives; set only when nothing rzw-specific chose a
    /// level, and then used instead of `level`.
    pub directives: Option<String>,
}

impl LogConfig {
    /// Resolve from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let var = |key: &str| std::env::var(key).ok();
        Self::resolve(
            cli_level,
            cli_format,
            var(ENV_LOG_LEVEL).as_deref(),
            var(ENV_LOG_FORMAT).as_deref(),
            var(ENV_RUST_LOG).as_deref(),
        )
    }

    /// Apply the precedence rules to explicit values.
    ///
    /// Unparseable `RZW_LOG`/`RZW_LOG_FORMAT` values are ignored.
    pub fn resolve(
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
        rzw_log: Option<&str>,
        rzw_log_format: Option<&str>,
        rust_log: Option<&str>,
    ) -> Self {
        let format = cli_format
            .or_else(|| rzw_log_format.and_then(|v| v.parse().ok()))
            .unwrap_or_default();

        match cli_level.or_else(|| rzw_log.and_then(|v| v.parse().ok())) {
            Some(level) => LogConfig {
                format,
                level,
                directives: None,
            },
            None => LogConfig {
                format,
                level: LogLevel::Info,
                directives: rust_log
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            },
        }
    }

    /// The filter directive string handed to the subscriber.
    pub fn filter(&self) -> String {
        self.directives
            .clone()
            .unwrap_or_else(|| self.level.directive())
    }
}
