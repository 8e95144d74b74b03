//! Custom error types for the share icons crate
//!
//! This module defines custom error types and implements the necessary traits
//! to properly handle errors throughout the application.

use std::fmt;

/// Main error type for the share icons crate
#[derive(Debug)]
pub enum ShareIconsError {
    /// Error occurred while parsing address
    AddressParse(std::net::AddrParseError),

    /// Error occurred while reading or writing the configuration file
    ConfigRead(std::io::Error),

    /// Error occurred while parsing configuration
    ConfigParse(json5::Error),

    /// Error occurred while converting configuration values
    ConfigValue(serde_json::Error),

    /// Error occurred while watching the configuration file
    ConfigWatch(notify::Error),

    /// Error occurred while rendering a template
    Render(askama::Error),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for ShareIconsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareIconsError::AddressParse(e) => {
                write!(f, "Failed to parse network address: {e}")
            }
            ShareIconsError::ConfigRead(e) => {
                write!(f, "Failed to access configuration file: {e}")
            }
            ShareIconsError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            ShareIconsError::ConfigValue(e) => {
                write!(f, "Failed to convert configuration: {e}")
            }
            ShareIconsError::ConfigWatch(e) => {
                write!(f, "Failed to watch configuration file: {e}")
            }
            ShareIconsError::Render(e) => {
                write!(f, "Template rendering error: {e}")
            }
            ShareIconsError::Generic(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

impl std::error::Error for ShareIconsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShareIconsError::AddressParse(e) => Some(e),
            ShareIconsError::ConfigRead(e) => Some(e),
            ShareIconsError::ConfigParse(e) => Some(e),
            ShareIconsError::ConfigValue(e) => Some(e),
            ShareIconsError::ConfigWatch(e) => Some(e),
            ShareIconsError::Render(e) => Some(e),
            ShareIconsError::Generic(_) => None,
        }
    }
}

impl From<std::net::AddrParseError> for ShareIconsError {
    fn from(error: std::net::AddrParseError) -> Self {
        ShareIconsError::AddressParse(error)
    }
}

impl From<std::io::Error> for ShareIconsError {
    fn from(error: std::io::Error) -> Self {
        ShareIconsError::ConfigRead(error)
    }
}

impl From<json5::Error> for ShareIconsError {
    fn from(error: json5::Error) -> Self {
        ShareIconsError::ConfigParse(error)
    }
}

impl From<serde_json::Error> for ShareIconsError {
    fn from(error: serde_json::Error) -> Self {
        ShareIconsError::ConfigValue(error)
    }
}

impl From<notify::Error> for ShareIconsError {
    fn from(error: notify::Error) -> Self {
        ShareIconsError::ConfigWatch(error)
    }
}

impl From<askama::Error> for ShareIconsError {
    fn from(error: askama::Error) -> Self {
        ShareIconsError::Render(error)
    }
}

impl From<&str> for ShareIconsError {
    fn from(msg: &str) -> Self {
        ShareIconsError::Generic(msg.to_string())
    }
}

impl From<String> for ShareIconsError {
    fn from(msg: String) -> Self {
        ShareIconsError::Generic(msg)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, ShareIconsError>;
