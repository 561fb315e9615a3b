use thiserror::Error;

use crate::sensor::SensorKind;

#[derive(Error, Debug)]
pub enum HeadingError {
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(SensorKind),

    #[error("Sensor registration failed: {0}")]
    Registration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recording error at line {line}: {message}")]
    Recording { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, HeadingError>;
