use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::screening::{RuleSetError, ScreeningError};
use std::fmt;

/// Failure of a CLI command or of service startup. HTTP handlers map workflow errors
/// through their own routers.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Rules(RuleSetError),
    Screening(ScreeningError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Rules(err) => write!(f, "area rules error: {}", err),
            AppError::Screening(err) => write!(f, "screening error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Screening(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RuleSetError> for AppError {
    fn from(value: RuleSetError) -> Self {
        Self::Rules(value)
    }
}

impl From<ScreeningError> for AppError {
    fn from(value: ScreeningError) -> Self {
        Self::Screening(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::IngestError;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn batch_failures_keep_their_source() {
        let err = AppError::from(ScreeningError::Ingest(IngestError::EmptyFolder(
            PathBuf::from("/srv/cvs"),
        )));

        assert!(err.to_string().starts_with("screening error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn display_prefixes_the_error_kind() {
        let err = AppError::from(RuleSetError::DuplicateArea("Sales".to_string()));
        assert!(err.to_string().starts_with("area rules error:"));
    }
}
