//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Validation failure raised while building or combining geohash values.
///
/// Every constructor validates its input up front, so a value of any public type
/// is either fully valid or never created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeohashError {
    #[error("Latitude out of range [-90.0, 90.0]: {0}")]
    InvalidLatitude(f64),

    #[error("Longitude out of range [-180.0, 180.0]: {0}")]
    InvalidLongitude(f64),

    #[error("Southern latitude {south} must be less than northern latitude {north}")]
    InvertedLatitudes { south: f64, north: f64 },

    #[error("Geohash precision must be between 1 and 12, got: {0}")]
    InvalidPrecision(usize),

    #[error("Invalid geohash character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Geohash must be between 1 and 12 characters, got: {0}")]
    InvalidLength(usize),

    #[error("Geohashes must share a precision, got {left} and {right}")]
    PrecisionMismatch { left: u8, right: u8 },
}

pub type Result<T> = std::result::Result<T, GeohashError>;
