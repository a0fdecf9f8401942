use crate::codec::{max_lat_size_at, max_lon_size_at};
use crate::coordinate::Coordinate;
use crate::error::{GeohashError, Result};
use crate::validation::{validate_latitude, validate_longitude};
use crate::{LONGITUDE_MAX, LONGITUDE_MIN, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A latitude/longitude rectangle that may cross the antimeridian.
///
/// The box is stored as its south-west (`min_lat`, `min_lon`) and north-east
/// (`max_lat`, `max_lon`) corners. When `max_lon < min_lon` the box wraps across
/// the ±180° meridian and covers `[min_lon, 180] ∪ [-180, max_lon]`.
///
/// # Examples
///
/// ```
/// use geohash_cells::BoundingBox;
///
/// let bbox = BoundingBox::from_corners(40.0, -75.0, 41.0, -73.0)?;
/// assert!(bbox.contains(40.7128, -74.0060));
/// assert!(!bbox.crosses_antimeridian());
///
/// // Spans the Pacific from 170°E to 170°W
/// let pacific = BoundingBox::from_corners(-10.0, 170.0, 10.0, -170.0)?;
/// assert!(pacific.crosses_antimeridian());
/// assert!(pacific.contains(0.0, 180.0));
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box from its south-west and north-east corners.
    ///
    /// Fails when the southern latitude is not strictly below the northern one.
    pub fn new(south_west: Coordinate, north_east: Coordinate) -> Result<Self> {
        Self::from_corners(
            south_west.latitude(),
            south_west.longitude(),
            north_east.latitude(),
            north_east.longitude(),
        )
    }

    /// Create a bounding box from raw corner values.
    ///
    /// # Arguments
    ///
    /// * `min_lat` - Southern-most latitude
    /// * `min_lon` - Western-most longitude
    /// * `max_lat` - Northern-most latitude
    /// * `max_lon` - Eastern-most longitude (less than `min_lon` when crossing 180°)
    pub fn from_corners(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Self> {
        validate_latitude(min_lat)?;
        validate_latitude(max_lat)?;
        validate_longitude(min_lon)?;
        validate_longitude(max_lon)?;

        if min_lat >= max_lat {
            return Err(GeohashError::InvertedLatitudes {
                south: min_lat,
                north: max_lat,
            });
        }

        Ok(Self::new_unchecked(min_lat, min_lon, max_lat, max_lon))
    }

    /// Build a box whose bounds are produced by cell bisection and are valid by construction.
    pub(crate) const fn new_unchecked(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    #[inline]
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    #[inline]
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    #[inline]
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    #[inline]
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn south_west(&self) -> Coordinate {
        Coordinate::new_unchecked(self.min_lat, self.min_lon)
    }

    pub fn north_east(&self) -> Coordinate {
        Coordinate::new_unchecked(self.max_lat, self.max_lon)
    }

    pub fn north_west(&self) -> Coordinate {
        Coordinate::new_unchecked(self.max_lat, self.min_lon)
    }

    pub fn south_east(&self) -> Coordinate {
        Coordinate::new_unchecked(self.min_lat, self.max_lon)
    }

    /// Whether the box wraps across the ±180° meridian.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.max_lon < self.min_lon
    }

    /// Center of the box.
    ///
    /// For a box crossing the antimeridian the longitude is averaged across the
    /// seam and folded back into [-180.0, 180.0].
    pub fn center(&self) -> Coordinate {
        let latitude = (self.min_lat + self.max_lat) / 2.0;
        let east = if self.crosses_antimeridian() {
            self.max_lon + 360.0
        } else {
            self.max_lon
        };
        let mut longitude = (self.min_lon + east) / 2.0;
        if longitude > LONGITUDE_MAX {
            longitude -= 360.0;
        }
        Coordinate::new_unchecked(latitude, longitude)
    }

    /// Height of the box in degrees of latitude.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Width of the box in degrees of longitude, measured eastward across the seam if needed.
    pub fn lon_span(&self) -> f64 {
        let delta = self.max_lon - self.min_lon;
        if delta < 0.0 { delta + 360.0 } else { delta }
    }

    /// Check if this box intersects another. Tangent boxes intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if other.min_lat > self.max_lat || other.max_lat < self.min_lat {
            return false;
        }

        match (self.crosses_antimeridian(), other.crosses_antimeridian()) {
            (false, false) => other.max_lon >= self.min_lon && other.min_lon <= self.max_lon,
            (true, false) => self.max_lon >= other.min_lon || self.min_lon <= other.max_lon,
            (false, true) => other.max_lon >= self.min_lon || other.min_lon <= self.max_lon,
            // both cover the seam
            (true, true) => true,
        }
    }

    /// Check if a latitude/longitude lies within the box, edges included.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let within_lat = (self.min_lat..=self.max_lat).contains(&latitude);
        within_lat
            && if self.crosses_antimeridian() {
                longitude <= self.max_lon || longitude >= self.min_lon
            } else {
                (self.min_lon..=self.max_lon).contains(&longitude)
            }
    }

    pub fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        self.contains(coordinate.latitude(), coordinate.longitude())
    }

    /// Check if all four corners of `other` lie within this box.
    pub fn encompasses_completely(&self, other: &BoundingBox) -> bool {
        [
            other.north_west(),
            other.north_east(),
            other.south_east(),
            other.south_west(),
        ]
        .iter()
        .all(|corner| self.contains_coordinate(corner))
    }

    /// Largest geohash precision whose cells are at least as large as this box.
    ///
    /// Returns 0 when even a single-character cell is smaller than the box in
    /// either dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cells::BoundingBox;
    ///
    /// let world = BoundingBox::from_corners(-90.0, -180.0, 90.0, 180.0)?;
    /// assert_eq!(world.max_chars_to_cover(), 0);
    ///
    /// let block = BoundingBox::from_corners(37.77, -122.42, 37.771, -122.419)?;
    /// assert_eq!(block.max_chars_to_cover(), 7);
    /// # Ok::<(), geohash_cells::GeohashError>(())
    /// ```
    pub fn max_chars_to_cover(&self) -> u8 {
        let lat_delta = self.lat_span();
        let lon_delta = self.lon_span();
        (1..=MAX_PRECISION)
            .rev()
            .find(|&precision| {
                max_lat_size_at(precision) >= lat_delta && max_lon_size_at(precision) >= lon_delta
            })
            .unwrap_or(0)
    }

    /// Split a box crossing the antimeridian into its western and eastern halves.
    ///
    /// A box that does not cross is returned unchanged with no second half.
    pub fn split_at_antimeridian(&self) -> (BoundingBox, Option<BoundingBox>) {
        if !self.crosses_antimeridian() {
            return (*self, None);
        }
        let west = Self::new_unchecked(self.min_lat, self.min_lon, self.max_lat, LONGITUDE_MAX);
        let east = Self::new_unchecked(self.min_lat, LONGITUDE_MIN, self.max_lat, self.max_lon);
        (west, Some(east))
    }
}

impl Eq for BoundingBox {}

impl Hash for BoundingBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.min_lat + 0.0).to_bits().hash(state);
        (self.min_lon + 0.0).to_bits().hash(state);
        (self.max_lat + 0.0).to_bits().hash(state);
        (self.max_lon + 0.0).to_bits().hash(state);
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox(lat: [{}, {}], lon: [{}, {}])",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

#[derive(Deserialize)]
struct RawBoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = GeohashError;

    fn try_from(raw: RawBoundingBox) -> Result<Self> {
        Self::from_corners(raw.min_lat, raw.min_lon, raw.max_lat, raw.max_lon)
    }
}
