//! Log output setup
//!
//! Filtering follows `RUST_LOG`, falling back to `info`.

use std::str::FromStr;

use gestura_core::{GesturaError, GesturaResult};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human readable
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = GesturaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(GesturaError::Config(format!("unknown log format: {}", other))),
        }
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_tracing(format: LogFormat) -> GesturaResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| GesturaError::Config(format!("tracing init failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" text ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
