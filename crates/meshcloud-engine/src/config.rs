//! Runtime configuration.
//!
//! Everything has a default; hosts that cannot pass configuration (the
//! native plugin) read overrides from the environment.

use std::fmt;
use std::str::FromStr;

use crate::logging::LoggingConfig;

/// Environment variable holding the log filter (`env_logger` syntax).
pub const LOG_ENV: &str = "MESHCLOUD_LOG";
/// Environment variable selecting the [`DebugReport`] policy.
pub const DEBUG_REPORT_ENV: &str = "MESHCLOUD_DEBUG_REPORT";

/// When the render dispatcher reports the GPU error code to the host.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DebugReport {
    /// After every dispatch, including `GL_ERROR: 0`.
    #[default]
    EveryDispatch,
    /// Only when the error code is non-zero.
    ErrorsOnly,
    Off,
}

impl DebugReport {
    /// Whether a dispatch that ended with `code` should be reported.
    pub fn should_report(self, code: u32) -> bool {
        match self {
            Self::EveryDispatch => true,
            Self::ErrorsOnly => code != 0,
            Self::Off => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDebugReport(pub String);

impl fmt::Display for UnknownDebugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown debug report mode `{}` (expected every, errors or off)", self.0)
    }
}

impl std::error::Error for UnknownDebugReport {}

impl FromStr for DebugReport {
    type Err = UnknownDebugReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every" | "all" => Ok(Self::EveryDispatch),
            "errors" => Ok(Self::ErrorsOnly),
            "off" | "none" => Ok(Self::Off),
            _ => Err(UnknownDebugReport(s.to_owned())),
        }
    }
}

/// Plugin-wide settings.
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    pub logging: LoggingConfig,
    pub debug_report: DebugReport,
}

impl PluginConfig {
    /// Defaults overridden by [`LOG_ENV`] and [`DEBUG_REPORT_ENV`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`PluginConfig::from_env`] with a custom variable source.
    ///
    /// An unparsable report mode keeps the default and logs a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.logging.env_filter = Some(filter);
        }

        if let Some(raw) = lookup(DEBUG_REPORT_ENV) {
            match raw.parse() {
                Ok(report) => config.debug_report = report,
                Err(err) => log::warn!("{err}; using {:?}", config.debug_report),
            }
        }

        config
    }
}
