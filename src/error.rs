//! Error types for the AQI predictor
//!
//! Only startup can surface these to the user. At runtime, store faults are
//! turned into a failure notice by the data access service and gateway faults
//! into a fallback message, so both arrive here only to be logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AqiError {
    /// Invalid settings or a client that could not be built from them
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The text-generation service failed or answered in an unexpected shape
    #[error("API error: {message}")]
    Api { message: String },

    /// A city record or level label broke a data invariant
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The city table could not be read
    #[error("Data error: {message}")]
    Data { message: String },
}

impl AqiError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data {
            message: message.into(),
        }
    }
}

// Transport errors only come from the recommendation client
impl From<reqwest::Error> for AqiError {
    fn from(err: reqwest::Error) -> Self {
        AqiError::api(err.to_string())
    }
}

// JSON errors only come from parsing the city table
impl From<serde_json::Error> for AqiError {
    fn from(err: serde_json::Error) -> Self {
        AqiError::data(err.to_string())
    }
}
