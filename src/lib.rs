//! Geohash cells with bit-level navigation, ordering, ranges and bounding-box coverage.
//!
//! ```rust
//! use geohash_cells::{BoundingBox, BoxQuery, Direction, Geohash, GeohashQuery};
//!
//! let cell = Geohash::new(36.51264084, -106.26257842, 12)?;
//! assert_eq!(cell.as_str(), "9wkrtyvvw3wd");
//!
//! let north = cell.neighbor_at(Direction::North);
//! assert_eq!(north.neighbor_at(Direction::South), cell);
//!
//! let parent = cell.parent().expect("precision 12 has a parent");
//! assert!(parent.contains(&cell));
//!
//! let area = BoundingBox::from_corners(37.77, -122.43, 37.78, -122.41)?;
//! let query = BoxQuery::new(area);
//! assert!(!query.geohashes().is_empty());
//! # Ok::<(), geohash_cells::GeohashError>(())
//! ```

pub mod bbox;
pub mod codec;
pub mod coordinate;
pub mod error;
pub mod geohash;
pub mod interop;
pub mod query;
pub mod range;
pub mod validation;

pub use bbox::BoundingBox;
pub use codec::LatLonBits;
pub use coordinate::Coordinate;
pub use error::{GeohashError, Result};
pub use geohash::{Direction, Geohash};
pub use query::{BoxQuery, GeohashQuery};
pub use range::{GeohashIter, GeohashRange};

/// Longest supported geohash, in characters.
pub const MAX_PRECISION: u8 = 12;

/// Bits encoded by one base-32 character.
pub const BITS_PER_CHAR: u32 = 5;

/// Base-32 geohash alphabet (no `a`, `i`, `l`, `o`).
pub const GEOHASH_ALPHABET: &str = "0123456789bcdefghjkmnpqrstuvwxyz";

pub const LATITUDE_MIN: f64 = -90.0;
pub const LATITUDE_MAX: f64 = 90.0;
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeohashError, Result};

    pub use crate::{BoundingBox, Coordinate, Direction, Geohash};

    pub use crate::{BoxQuery, GeohashQuery, GeohashRange};

    pub use geo::{Point, Polygon, Rect};
}
