//! Tracing setup for the booth and its tools.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::BoothResult;

/// Install the global subscriber. `RUST_LOG` overrides `config.level`.
///
/// With `config.file` set, events are appended to that file without ANSI
/// colors. Otherwise they go to stderr, leaving stdout to command output.
pub fn init_logging(config: &LoggingConfig) -> BoothResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        tracing::subscriber::set_global_default(builder.finish()).ok();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unwritable_log_file_is_reported() {
        let config = LoggingConfig {
            file: Some(PathBuf::from("/nonexistent/snapbooth/booth.log")),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
