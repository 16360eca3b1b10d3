use thiserror::Error;

/// Every failure a search, save, delete or export can end with.
///
/// None of these are fatal: the caller reports the message and the session
/// stays usable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeatherError {
    /// A location (or stored record) could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An external call failed: network, non-2xx status or malformed body.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The date range removed every entry of the forecast window.
    #[error("No forecast data falls inside the requested date range")]
    EmptyForecastWindow,

    /// Missing or malformed input.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl WeatherError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
