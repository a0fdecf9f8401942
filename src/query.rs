//! Covering a bounding box with geohash cells.

use crate::bbox::BoundingBox;
use crate::codec;
use crate::geohash::Geohash;
use crate::range::GeohashRange;
use crate::MAX_PRECISION;
use rustc_hash::FxHashSet;

/// A set of geohash cells standing in for a geographic area.
pub trait GeohashQuery {
    /// The cells making up the query. Cells may overlap.
    fn geohashes(&self) -> &FxHashSet<Geohash>;

    /// Check if `geohash` lies within any cell of the query.
    fn matches(&self, geohash: &Geohash) -> bool {
        self.geohashes().iter().any(|cell| cell.contains(geohash))
    }
}

/// Geohash cells covering a bounding box.
///
/// The cells together cover the whole box; some may extend past its edges and
/// some may overlap one another.
///
/// # Examples
///
/// ```
/// use geohash_cells::{BoundingBox, BoxQuery, Geohash, GeohashQuery};
///
/// let area = BoundingBox::from_corners(37.70, -122.52, 37.82, -122.35)?;
/// let query = BoxQuery::new(area);
///
/// let ferry_building = Geohash::new(37.7955, -122.3937, 9)?;
/// assert!(query.matches(&ferry_building));
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoxQuery {
    query_box: BoundingBox,
    geohashes: FxHashSet<Geohash>,
}

impl BoxQuery {
    pub fn new(query_box: BoundingBox) -> Self {
        let (west, east) = query_box.split_at_antimeridian();
        let mut geohashes = cover(&west);
        if let Some(east) = east {
            log::debug!("{} crosses the antimeridian, covering both halves", query_box);
            geohashes.extend(cover(&east));
        }

        log::debug!("{} covered by {} cells", query_box, geohashes.len());
        Self {
            query_box,
            geohashes,
        }
    }

    pub fn query_box(&self) -> &BoundingBox {
        &self.query_box
    }

    pub fn into_geohashes(self) -> FxHashSet<Geohash> {
        self.geohashes
    }
}

impl GeohashQuery for BoxQuery {
    fn geohashes(&self) -> &FxHashSet<Geohash> {
        &self.geohashes
    }
}

/// Cover a box that does not cross the antimeridian.
fn cover(bbox: &BoundingBox) -> FxHashSet<Geohash> {
    let precision = bbox.max_chars_to_cover();
    let candidates: Vec<Geohash> = if precision == 0 {
        log::debug!("{} is larger than any cell, scanning first-level cells", bbox);
        GeohashRange::new_unchecked(Geohash::at_ordinal(0, 1), Geohash::at_ordinal(31, 1))
            .into_iter()
            .filter(|cell| cell.bounding_box().intersects(bbox))
            .collect()
    } else {
        log::debug!("covering {} from precision {}", bbox, precision);
        let center = bbox.center();
        let bits = codec::encode_unchecked(center.latitude(), center.longitude(), precision);
        Geohash::from_lat_lon_bits(bits)
            .surrounding_geohashes(true)
            .into_iter()
            .filter(|cell| cell.bounding_box().intersects(bbox))
            .collect()
    };

    let mut covering: FxHashSet<Geohash> = candidates
        .iter()
        .filter(|cell| bbox.encompasses_completely(cell.bounding_box()))
        .cloned()
        .collect();

    for candidate in &candidates {
        if candidate.precision() == MAX_PRECISION {
            // nothing finer to refine with
            covering.insert(candidate.clone());
            continue;
        }
        covering.extend(
            candidate
                .children()
                .into_iter()
                .filter(|child| child.bounding_box().intersects(bbox)),
        );
    }

    log::trace!("{} candidates -> {} cells", candidates.len(), covering.len());
    covering
}
