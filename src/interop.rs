//! Conversions to and from [`geo`] types.
//!
//! `geo` uses `x` for longitude and `y` for latitude.

use crate::bbox::BoundingBox;
use crate::coordinate::Coordinate;
use crate::error::{GeohashError, Result};
use crate::geohash::Geohash;
use crate::{LONGITUDE_MAX, LONGITUDE_MIN};
use geo::{Coord, Point, Polygon, Rect};
use smallvec::{SmallVec, smallvec};

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude(), coordinate.latitude())
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::coord! { x: coordinate.longitude(), y: coordinate.latitude() }
    }
}

impl TryFrom<Point<f64>> for Coordinate {
    type Error = GeohashError;

    fn try_from(point: Point<f64>) -> Result<Self> {
        Coordinate::new(point.y(), point.x())
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = GeohashError;

    fn try_from(coord: Coord<f64>) -> Result<Self> {
        Coordinate::new(coord.y, coord.x)
    }
}

impl TryFrom<Rect<f64>> for BoundingBox {
    type Error = GeohashError;

    /// A `Rect` never crosses the antimeridian; degenerate (zero height) rects are rejected.
    fn try_from(rect: Rect<f64>) -> Result<Self> {
        BoundingBox::from_corners(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }
}

impl BoundingBox {
    /// Express the box as `geo` rectangles.
    ///
    /// A box crossing the antimeridian yields its western and eastern halves.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cells::BoundingBox;
    ///
    /// let pacific = BoundingBox::from_corners(-10.0, 170.0, 10.0, -170.0)?;
    /// let rects = pacific.to_rects();
    /// assert_eq!(rects.len(), 2);
    /// assert_eq!(rects[0].max().x, 180.0);
    /// assert_eq!(rects[1].min().x, -180.0);
    /// # Ok::<(), geohash_cells::GeohashError>(())
    /// ```
    pub fn to_rects(&self) -> SmallVec<[Rect<f64>; 2]> {
        if !self.crosses_antimeridian() {
            return smallvec![self.to_rect_within(self.min_lon(), self.max_lon())];
        }
        smallvec![
            self.to_rect_within(self.min_lon(), LONGITUDE_MAX),
            self.to_rect_within(LONGITUDE_MIN, self.max_lon()),
        ]
    }

    fn to_rect_within(&self, west: f64, east: f64) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: west, y: self.min_lat() },
            geo::coord! { x: east, y: self.max_lat() },
        )
    }
}

impl Geohash {
    /// Encode a `geo` point (x = longitude, y = latitude).
    pub fn from_point(point: Point<f64>, precision: u8) -> Result<Geohash> {
        Geohash::new(point.y(), point.x(), precision)
    }

    /// Bounds of the cell as a `geo` rectangle. Cells never cross the antimeridian.
    pub fn to_rect(&self) -> Rect<f64> {
        let bbox = self.bounding_box();
        Rect::new(
            geo::coord! { x: bbox.min_lon(), y: bbox.min_lat() },
            geo::coord! { x: bbox.max_lon(), y: bbox.max_lat() },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}
