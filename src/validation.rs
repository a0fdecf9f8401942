//! Range checks shared by every constructor in the crate.

use crate::error::{GeohashError, Result};
use crate::{LATITUDE_MAX, LATITUDE_MIN, LONGITUDE_MAX, LONGITUDE_MIN, MAX_PRECISION};

/// Validates a latitude lies in [-90.0, 90.0].
///
/// NaN and infinities are rejected along with out-of-range values.
///
/// # Examples
///
/// ```
/// use geohash_cells::validation::validate_latitude;
///
/// assert!(validate_latitude(40.7128).is_ok());
/// assert!(validate_latitude(95.0).is_err());
/// assert!(validate_latitude(f64::NAN).is_err());
/// ```
pub fn validate_latitude(latitude: f64) -> Result<f64> {
    if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&latitude) {
        return Err(GeohashError::InvalidLatitude(latitude));
    }
    Ok(latitude)
}

/// Validates a longitude lies in [-180.0, 180.0].
///
/// # Examples
///
/// ```
/// use geohash_cells::validation::validate_longitude;
///
/// assert!(validate_longitude(-74.0060).is_ok());
/// assert!(validate_longitude(180.0).is_ok());
/// assert!(validate_longitude(200.0).is_err());
/// ```
pub fn validate_longitude(longitude: f64) -> Result<f64> {
    if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&longitude) {
        return Err(GeohashError::InvalidLongitude(longitude));
    }
    Ok(longitude)
}

/// Validates both halves of a latitude/longitude pair.
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    validate_latitude(latitude)?;
    validate_longitude(longitude)?;
    Ok(())
}

/// Validates a character precision and narrows it to `u8`.
///
/// # Examples
///
/// ```
/// use geohash_cells::validation::validate_precision;
///
/// assert_eq!(validate_precision(12).unwrap(), 12u8);
/// assert!(validate_precision(0).is_err());
/// assert!(validate_precision(13).is_err());
/// ```
pub fn validate_precision(precision: usize) -> Result<u8> {
    if !(1..=MAX_PRECISION as usize).contains(&precision) {
        return Err(GeohashError::InvalidPrecision(precision));
    }
    Ok(precision as u8)
}

/// Validates the length and alphabet of a geohash string.
///
/// Characters are matched case-insensitively. Length is checked before the
/// alphabet so an over-long string reports its length.
pub fn validate_geohash_str(text: &str) -> Result<()> {
    let length = text.chars().count();
    if !(1..=MAX_PRECISION as usize).contains(&length) {
        return Err(GeohashError::InvalidLength(length));
    }

    for (position, character) in text.chars().enumerate() {
        if crate::codec::char_value(character).is_none() {
            return Err(GeohashError::InvalidCharacter {
                character,
                position,
            });
        }
    }

    Ok(())
}
