use crate::error::{GeohashError, Result};
use crate::validation::{validate_latitude, validate_longitude};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated latitude/longitude pair in degrees.
///
/// Latitude is guaranteed to lie in [-90.0, 90.0] and longitude in
/// [-180.0, 180.0]; out-of-range or non-finite values never produce a value.
///
/// # Examples
///
/// ```
/// use geohash_cells::Coordinate;
///
/// let nyc = Coordinate::new(40.7128, -74.0060)?;
/// assert_eq!(nyc.latitude(), 40.7128);
/// assert_eq!(nyc.longitude(), -74.0060);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, failing if either value is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: validate_latitude(latitude)?,
            longitude: validate_longitude(longitude)?,
        })
    }

    /// Build from values already known to be in range (cell bounds and centers).
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // -0.0 == 0.0, so both must hash alike
        (self.latitude + 0.0).to_bits().hash(state);
        (self.longitude + 0.0).to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = GeohashError;

    /// Interprets the tuple as `(latitude, longitude)`.
    fn try_from((latitude, longitude): (f64, f64)) -> Result<Self> {
        Self::new(latitude, longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeohashError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}
