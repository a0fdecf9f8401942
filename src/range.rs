//! Inclusive walks along the Z-order curve of a single precision.

use crate::codec::significant_bits;
use crate::error::Result;
use crate::geohash::Geohash;
use std::iter::FusedIterator;

/// Cells from `start` to `end` inclusive, walking forward along the Z-order curve.
///
/// The walk wraps from the last cell of the precision to the first, so a range
/// whose `end` precedes its `start` passes through the top of the curve. A range
/// always holds at least one cell.
///
/// # Examples
///
/// ```
/// use geohash_cells::Geohash;
///
/// let start: Geohash = "9q8".parse()?;
/// let end: Geohash = "9qb".parse()?;
/// let cells: Vec<String> = start.range_to(&end)?.iter().map(String::from).collect();
/// assert_eq!(cells, ["9q8", "9q9", "9qb"]);
///
/// // Wraps past "z" back to "0"
/// let wrapped = "z".parse::<Geohash>()?.range_to(&"0".parse()?)?;
/// assert_eq!(wrapped.len(), 2);
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeohashRange {
    start: Geohash,
    end: Geohash,
}

impl GeohashRange {
    /// Create a range, failing when the endpoints differ in precision.
    pub fn new(start: Geohash, end: Geohash) -> Result<Self> {
        start.check_same_precision(&end)?;
        Ok(Self::new_unchecked(start, end))
    }

    pub(crate) fn new_unchecked(start: Geohash, end: Geohash) -> Self {
        log::trace!("range {}..={}", start, end);
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> &Geohash {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &Geohash {
        &self.end
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.start.precision()
    }

    /// Number of cells in the range, endpoints included.
    pub fn len(&self) -> u64 {
        self.offset_of(&self.end) + 1
    }

    /// Always false: a range holds at least its start cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `geohash` is visited when walking this range.
    pub fn contains(&self, geohash: &Geohash) -> bool {
        geohash.precision() == self.precision()
            && self.offset_of(geohash) <= self.offset_of(&self.end)
    }

    pub fn iter(&self) -> GeohashIter {
        GeohashIter {
            front: self.start.clone(),
            back: self.end.clone(),
            remaining: self.len(),
        }
    }

    /// Forward distance from `start` to a cell of the same precision.
    fn offset_of(&self, geohash: &Geohash) -> u64 {
        let bits = significant_bits(self.precision());
        geohash.ord().wrapping_sub(self.start.ord()) & ((1u64 << bits) - 1)
    }
}

impl IntoIterator for GeohashRange {
    type Item = Geohash;
    type IntoIter = GeohashIter;

    fn into_iter(self) -> GeohashIter {
        let remaining = self.len();
        GeohashIter {
            front: self.start,
            back: self.end,
            remaining,
        }
    }
}

impl<'a> IntoIterator for &'a GeohashRange {
    type Item = Geohash;
    type IntoIter = GeohashIter;

    fn into_iter(self) -> GeohashIter {
        self.iter()
    }
}

/// Iterator over a [`GeohashRange`].
///
/// `front` and `back` are the next cells to yield from either end; `remaining`
/// counts the cells between them, both included.
#[derive(Debug, Clone)]
pub struct GeohashIter {
    front: Geohash,
    back: Geohash,
    remaining: u64,
}

impl Iterator for GeohashIter {
    type Item = Geohash;

    fn next(&mut self) -> Option<Geohash> {
        match self.remaining {
            0 => None,
            1 => {
                self.remaining = 0;
                Some(self.front.clone())
            }
            _ => {
                self.remaining -= 1;
                let following = self.front.next();
                Some(std::mem::replace(&mut self.front, following))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl DoubleEndedIterator for GeohashIter {
    fn next_back(&mut self) -> Option<Geohash> {
        match self.remaining {
            0 => None,
            1 => {
                self.remaining = 0;
                Some(self.back.clone())
            }
            _ => {
                self.remaining -= 1;
                let preceding = self.back.previous();
                Some(std::mem::replace(&mut self.back, preceding))
            }
        }
    }
}

impl FusedIterator for GeohashIter {}
