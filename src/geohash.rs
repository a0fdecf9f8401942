use crate::bbox::BoundingBox;
use crate::codec::{self, LatLonBits, insignificant_bits};
use crate::coordinate::Coordinate;
use crate::error::{GeohashError, Result};
use crate::range::GeohashRange;
use crate::validation::validate_geohash_str;
use crate::{BITS_PER_CHAR, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Compass direction of an adjacent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Step applied to the `(latitude, longitude)` ladders.
    fn ladder_offsets(self) -> (i64, i64) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    /// The direction pointing back, e.g. south for north.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// A geohash cell: its text, bounds, packed bits and center coordinate.
///
/// Two geohashes are equal when they denote the same cell, regardless of the
/// point or text used to create them. Ordering follows the Z-order curve, with a cell
/// sorting before all of its descendants.
///
/// # Examples
///
/// ```
/// use geohash_cells::Geohash;
///
/// let cell = Geohash::new(36.51264084, -106.26257842, 5)?;
/// assert_eq!(cell.as_str(), "9wkrt");
/// assert_eq!(cell.precision(), 5);
///
/// let parsed: Geohash = "9WKRT".parse()?;
/// assert_eq!(parsed, cell);
/// assert!(cell.bounding_box().contains(36.51264084, -106.26257842));
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Geohash {
    coordinate: Coordinate,
    text: String,
    bounding_box: BoundingBox,
    bits: LatLonBits,
}

impl Geohash {
    /// Encode a latitude/longitude at `precision` characters.
    ///
    /// The cell keeps its center, not the encoded point, as its coordinate.
    pub fn new(latitude: f64, longitude: f64, precision: u8) -> Result<Self> {
        codec::encode(latitude, longitude, precision).map(Self::from_lat_lon_bits)
    }

    pub fn from_coordinate(coordinate: Coordinate, precision: u8) -> Result<Self> {
        Self::new(coordinate.latitude(), coordinate.longitude(), precision)
    }

    /// Parse geohash text, accepting either case.
    ///
    /// The stored text is lowercase and the coordinate is the cell center.
    pub fn parse(text: &str) -> Result<Self> {
        let (bounding_box, bits) = codec::decode_str(text)?;
        Ok(Self {
            coordinate: bounding_box.center(),
            text: text.to_ascii_lowercase(),
            bounding_box,
            bits,
        })
    }

    /// Rebuild a cell from its packed 64-bit form (see [`Geohash::bits`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cells::Geohash;
    ///
    /// let cell: Geohash = "mgu3".parse()?;
    /// assert_eq!(Geohash::from_bits(cell.bits())?, cell);
    /// assert!(Geohash::from_bits(0).is_err());
    /// # Ok::<(), geohash_cells::GeohashError>(())
    /// ```
    pub fn from_bits(bits: u64) -> Result<Self> {
        LatLonBits::from_combined(bits).map(Self::from_lat_lon_bits)
    }

    /// Cell at `ordinal` on the Z-order curve of `precision`, wrapping past the end.
    pub fn from_ordinal(ordinal: u64, precision: u8) -> Result<Self> {
        let precision = crate::validation::validate_precision(precision as usize)?;
        Ok(Self::at_ordinal(ordinal, precision))
    }

    pub(crate) fn at_ordinal(ordinal: u64, precision: u8) -> Self {
        Self::from_lat_lon_bits(LatLonBits::from_ordinal(ordinal, precision))
    }

    pub(crate) fn from_lat_lon_bits(bits: LatLonBits) -> Self {
        let bounding_box = codec::decode_bounding_box(&bits);
        Self {
            coordinate: bounding_box.center(),
            text: codec::decode_string(&bits),
            bounding_box,
            bits,
        }
    }

    /// Center of the cell's bounding box.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.bits.precision()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Packed form: interleaved bits left aligned, precision in the low 4 bits.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits.combined_bits()
    }

    #[inline]
    pub fn lat_lon_bits(&self) -> &LatLonBits {
        &self.bits
    }

    /// Position on the Z-order curve among cells of the same precision.
    #[inline]
    pub fn ord(&self) -> u64 {
        self.bits.ordinal()
    }

    /// The adjacent cell in `direction`.
    ///
    /// Each axis wraps independently: east of the last column is the first
    /// column, and north of the top row is the bottom row.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cells::{Direction, Geohash};
    ///
    /// let cell: Geohash = "w18md".parse()?;
    /// assert_eq!(cell.neighbor_at(Direction::North).as_str(), "w18mf");
    /// assert_eq!(cell.neighbor_at(Direction::West).as_str(), "w18m9");
    /// # Ok::<(), geohash_cells::GeohashError>(())
    /// ```
    pub fn neighbor_at(&self, direction: Direction) -> Geohash {
        let (lat_step, lon_step) = direction.ladder_offsets();
        let bits = LatLonBits::from_ladders_unchecked(
            self.bits.lat_bits().wrapping_add_signed(lat_step),
            self.bits.lon_bits().wrapping_add_signed(lon_step),
            self.precision(),
        );
        Self::from_lat_lon_bits(bits)
    }

    /// The eight adjacent cells clockwise from north, optionally followed by this cell.
    pub fn surrounding_geohashes(&self, include_self: bool) -> SmallVec<[Geohash; 9]> {
        let mut cells: SmallVec<[Geohash; 9]> = Direction::ALL
            .iter()
            .map(|&direction| self.neighbor_at(direction))
            .collect();
        if include_self {
            cells.push(self.clone());
        }
        cells
    }

    /// Next cell on the Z-order curve; the last cell wraps to the first.
    pub fn next(&self) -> Geohash {
        self.advance(1)
    }

    /// Previous cell on the Z-order curve; the first cell wraps to the last.
    pub fn previous(&self) -> Geohash {
        self.retreat(1)
    }

    /// Move `steps` cells along the Z-order curve, wrapping at either end.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cells::Geohash;
    ///
    /// let cell: Geohash = "9q".parse()?;
    /// assert_eq!(cell.advance(33).retreat(33), cell);
    /// assert_eq!(cell.advance(-33), cell.retreat(33));
    /// # Ok::<(), geohash_cells::GeohashError>(())
    /// ```
    pub fn advance(&self, steps: i64) -> Geohash {
        Self::at_ordinal(self.ord().wrapping_add(steps as u64), self.precision())
    }

    /// Move `steps` cells backward along the Z-order curve; the inverse of [`Geohash::advance`].
    pub fn retreat(&self, steps: i64) -> Geohash {
        Self::at_ordinal(self.ord().wrapping_sub(steps as u64), self.precision())
    }

    /// Signed number of steps from this cell to `other` along the Z-order curve.
    pub fn steps_to(&self, other: &Geohash) -> Result<i64> {
        self.check_same_precision(other)?;
        Ok(other.ord() as i64 - self.ord() as i64)
    }

    /// Whether `other` is this cell or lies inside it.
    pub fn contains(&self, other: &Geohash) -> bool {
        let precision = self.precision();
        if other.precision() < precision {
            return false;
        }
        let shift = insignificant_bits(precision);
        self.bits() >> shift == other.bits() >> shift
    }

    /// Whether `text` names this cell or one inside it. Case is ignored.
    pub fn contains_str(&self, text: &str) -> bool {
        validate_geohash_str(text).is_ok()
            && text
                .get(..self.text.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&self.text))
    }

    /// Whether `coordinate` lies within the cell bounds, edges included.
    pub fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        self.bounding_box.contains_coordinate(coordinate)
    }

    /// Same as [`Geohash::contains_coordinate`] for raw latitude/longitude.
    pub fn contains_point(&self, latitude: f64, longitude: f64) -> bool {
        self.bounding_box.contains(latitude, longitude)
    }

    /// The enclosing cell one character shorter, `None` at precision 1.
    pub fn parent(&self) -> Option<Geohash> {
        let precision = self.precision();
        (precision > 1).then(|| Self::at_ordinal(self.ord() >> BITS_PER_CHAR, precision - 1))
    }

    /// The 32 cells one character longer, in alphabet order. Empty at maximum precision.
    pub fn children(&self) -> Vec<Geohash> {
        self.children_range()
            .map(|range| range.iter().collect())
            .unwrap_or_default()
    }

    /// Children as a range from the `0` child to the `z` child.
    pub fn children_range(&self) -> Option<GeohashRange> {
        let precision = self.precision();
        if precision >= MAX_PRECISION {
            return None;
        }
        let first = self.ord() << BITS_PER_CHAR;
        let last = first | ((1 << BITS_PER_CHAR) - 1);
        Some(GeohashRange::new_unchecked(
            Self::at_ordinal(first, precision + 1),
            Self::at_ordinal(last, precision + 1),
        ))
    }

    /// Range walking forward from this cell to `end`, both included.
    pub fn range_to(&self, end: &Geohash) -> Result<GeohashRange> {
        GeohashRange::new(self.clone(), end.clone())
    }

    pub(crate) fn check_same_precision(&self, other: &Geohash) -> Result<()> {
        if self.precision() != other.precision() {
            return Err(GeohashError::PrecisionMismatch {
                left: self.precision(),
                right: other.precision(),
            });
        }
        Ok(())
    }
}

impl PartialEq for Geohash {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for Geohash {}

impl Hash for Geohash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl Ord for Geohash {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (self.precision(), other.precision());
        if left == right {
            return self.ord().cmp(&other.ord());
        }
        // compare the shared prefix; an ancestor sorts first
        let shift = insignificant_bits(left.min(right));
        (self.bits() >> shift)
            .cmp(&(other.bits() >> shift))
            .then(left.cmp(&right))
    }
}

impl PartialOrd for Geohash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Geohash {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for Geohash {
    type Err = GeohashError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl TryFrom<&str> for Geohash {
    type Error = GeohashError;

    fn try_from(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl TryFrom<String> for Geohash {
    type Error = GeohashError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(&text)
    }
}

impl From<Geohash> for String {
    fn from(geohash: Geohash) -> Self {
        geohash.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gh(text: &str) -> Geohash {
        text.parse().unwrap()
    }

    #[test]
    fn test_encode_reference_point() {
        let cell = Geohash::new(36.51264084, -106.26257842, 12).unwrap();
        assert_eq!(cell.as_str(), "9wkrtyvvw3wd");
        assert_eq!(cell.precision(), 12);
        assert_eq!(cell.bits(), 5_703_101_922_691_578_060);
        assert_eq!(cell.coordinate(), cell.bounding_box().center());
        assert!(cell.contains_point(36.51264084, -106.26257842));
    }

    #[test]
    fn test_every_prefix_contains_the_point() {
        let (lat, lon) = (9.426, 90.461);
        let full = Geohash::new(lat, lon, 12).unwrap();
        for precision in 1..=12u8 {
            let cell = Geohash::new(lat, lon, precision).unwrap();
            assert_eq!(cell.as_str(), &full.as_str()[..precision as usize]);
            assert!(cell.contains_point(lat, lon));
            assert!(cell.contains(&full));
        }
        assert_eq!(Geohash::new(lat, lon, 5).unwrap().as_str(), "w18md");
    }

    #[test]
    fn test_parse_normalizes_case_and_uses_center() {
        let cell = gh("W18MD");
        assert_eq!(cell.as_str(), "w18md");
        assert_eq!(cell, gh("w18md"));

        let bbox = cell.bounding_box();
        assert_eq!(bbox.min_lat(), 9.404296875);
        assert_eq!(bbox.min_lon(), 90.439453125);
        assert_eq!(bbox.max_lat(), 9.4482421875);
        assert_eq!(bbox.max_lon(), 90.4833984375);
        assert_eq!(cell.coordinate(), bbox.center());
    }

    #[test]
    fn test_coordinate_is_cell_center() {
        let encoded = Geohash::new(36.51264084, -106.26257842, 3).unwrap();
        assert_eq!(encoded.coordinate(), Coordinate::new(35.859375, -106.171875).unwrap());

        let point = Coordinate::new(9.41, 90.44).unwrap();
        let mut cells = vec![
            encoded.clone(),
            Geohash::from_coordinate(point, 5).unwrap(),
            gh("W18MD"),
            Geohash::from_bits(encoded.bits()).unwrap(),
            Geohash::from_ordinal(1000, 4).unwrap(),
            encoded.neighbor_at(Direction::SouthWest),
            encoded.parent().unwrap(),
            encoded.next(),
            encoded.advance(-7),
        ];
        cells.extend(encoded.children());
        for cell in cells {
            assert_eq!(cell.coordinate(), cell.bounding_box().center(), "{cell}");
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            Geohash::new(0.0, 0.0, 13).unwrap_err(),
            GeohashError::InvalidPrecision(13)
        );
        assert!(Geohash::new(90.5, 0.0, 5).is_err());
        assert!("".parse::<Geohash>().is_err());
        assert!("9wkrtyvvw3wdx".parse::<Geohash>().is_err());
        assert_eq!(
            "9wa".parse::<Geohash>().unwrap_err(),
            GeohashError::InvalidCharacter {
                character: 'a',
                position: 2
            }
        );
    }

    #[test]
    fn test_equality_ignores_source_point() {
        let a = Geohash::new(9.41, 90.44, 5).unwrap();
        let b = Geohash::new(9.44, 90.48, 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.coordinate(), b.coordinate());
        assert_eq!(a.coordinate(), gh(a.as_str()).coordinate());

        let mut set = rustc_hash::FxHashSet::default();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_neighbors_of_reference_cell() {
        let cell = gh("9wkrtyvvw3wd");
        let expected = [
            "9wkrtyvvw3we",
            "9wkrtyvvw3wg",
            "9wkrtyvvw3wf",
            "9wkrtyvvw3wc",
            "9wkrtyvvw3w9",
            "9wkrtyvvw3w3",
            "9wkrtyvvw3w6",
            "9wkrtyvvw3w7",
        ];
        for (direction, text) in Direction::ALL.iter().zip(expected) {
            assert_eq!(cell.neighbor_at(*direction).as_str(), text, "{direction:?}");
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        for text in ["9wkrtyvvw3wd", "w18md", "0", "z", "b", "u4pruydqqvj"] {
            let cell = gh(text);
            for direction in Direction::ALL {
                let there = cell.neighbor_at(direction);
                assert_eq!(there.precision(), cell.precision());
                assert_eq!(there.neighbor_at(direction.opposite()), cell, "{text} {direction:?}");
            }
        }
    }

    #[test]
    fn test_neighbors_wrap_per_axis() {
        assert_eq!(gh("z").neighbor_at(Direction::North).as_str(), "p");
        assert_eq!(gh("z").neighbor_at(Direction::East).as_str(), "b");
        assert_eq!(gh("0").neighbor_at(Direction::South).as_str(), "b");
        assert_eq!(gh("0").neighbor_at(Direction::West).as_str(), "p");
        assert_eq!(gh("0").neighbor_at(Direction::SouthWest).as_str(), "z");
    }

    #[test]
    fn test_surrounding_geohashes() {
        let cell = gh("w18md");
        let ring = cell.surrounding_geohashes(false);
        let texts: Vec<&str> = ring.iter().map(Geohash::as_str).collect();
        assert_eq!(
            texts,
            ["w18mf", "w18mg", "w18me", "w18m7", "w18m6", "w18m3", "w18m9", "w18mc"]
        );

        let with_self = cell.surrounding_geohashes(true);
        assert_eq!(with_self.len(), 9);
        assert_eq!(with_self[8], cell);
        assert!(!with_self.spilled());
    }

    #[test]
    fn test_next_previous_wrap() {
        let cell = gh("9wkrtyvvw3wd");
        assert_eq!(cell.next().as_str(), "9wkrtyvvw3we");
        assert_eq!(cell.previous().as_str(), "9wkrtyvvw3wc");
        assert_eq!(cell.next().previous(), cell);

        assert_eq!(gh("z").next().as_str(), "0");
        assert_eq!(gh("0").previous().as_str(), "z");
        assert_eq!(gh("zzzzzzzzzzzz").next().as_str(), "000000000000");
    }

    #[test]
    fn test_advance_and_steps_to() {
        let start = gh("u4pruydqqvj");
        let end = start.advance(1000);
        assert_eq!(end.as_str(), "u4pruydqrut");
        assert_eq!(start.steps_to(&end).unwrap(), 1000);
        assert_eq!(end.steps_to(&start).unwrap(), -1000);
        assert_eq!(end.retreat(1000), start);

        assert_eq!(gh("9q").retreat(33).as_str(), "8p");
        assert_eq!(gh("9q").advance(-33).as_str(), "8p");

        assert_eq!(
            start.steps_to(&gh("u4")),
            Err(GeohashError::PrecisionMismatch { left: 11, right: 2 })
        );
    }

    #[test]
    fn test_contains() {
        let parent = gh("9wkr");
        assert!(parent.contains(&parent));
        assert!(parent.contains(&gh("9wkrtyvvw3wd")));
        assert!(!parent.contains(&gh("9wkq")));
        assert!(!parent.contains(&gh("9wk")));

        assert!(parent.contains_str("9wkrt"));
        assert!(parent.contains_str("9WKRT"));
        assert!(parent.contains_str("9wkr"));
        assert!(!parent.contains_str("9wk"));
        assert!(!parent.contains_str("9wkra"));
        assert!(!parent.contains_str("9wq8"));

        let point = Coordinate::new(36.51264084, -106.26257842).unwrap();
        assert!(parent.contains_coordinate(&point));
        assert!(!gh("9wkq").contains_coordinate(&point));
    }

    #[test]
    fn test_parent() {
        let cell = gh("9wkrtyvvw3wd");
        let parent = cell.parent().unwrap();
        assert_eq!(parent.as_str(), "9wkrtyvvw3w");
        assert!(parent.contains(&cell));
        assert!(gh("9").parent().is_none());
        assert_eq!(gh("9w").parent(), Some(gh("9")));
    }

    #[test]
    fn test_children() {
        let cell = gh("9wk");
        let children = cell.children();
        assert_eq!(children.len(), 32);
        assert_eq!(children[0].as_str(), "9wk0");
        assert_eq!(children[31].as_str(), "9wkz");
        for (child, character) in children.iter().zip(crate::GEOHASH_ALPHABET.chars()) {
            assert!(child.as_str().ends_with(character));
            assert_eq!(child.parent().as_ref(), Some(&cell));
        }

        assert!(gh("9wkrtyvvw3wd").children().is_empty());
        assert!(gh("9wkrtyvvw3wd").children_range().is_none());
    }

    #[test]
    fn test_ordering() {
        // Same precision follows the curve, which for equal length is the text order
        let mut cells = vec![gh("9q"), gh("0z"), gh("zz"), gh("b0"), gh("9p")];
        cells.sort();
        let texts: Vec<&str> = cells.iter().map(Geohash::as_str).collect();
        assert_eq!(texts, ["0z", "9p", "9q", "b0", "zz"]);

        // An ancestor sorts before its descendants
        assert!(gh("9q") < gh("9q0"));
        assert!(gh("9q") < gh("9qz"));
        assert!(gh("9qz") < gh("9r"));
        assert!(gh("9q") > gh("9p8"));
        assert_eq!(gh("9q").cmp(&gh("9Q")), Ordering::Equal);
    }

    #[test]
    fn test_bits_round_trip() {
        let cell = gh("9wkrtyvvw3wd");
        let rebuilt = Geohash::from_bits(cell.bits()).unwrap();
        assert_eq!(rebuilt, cell);
        assert_eq!(rebuilt.as_str(), cell.as_str());

        assert_eq!(Geohash::from_bits(0), Err(GeohashError::InvalidPrecision(0)));
        assert_eq!(Geohash::from_ordinal(32, 1).unwrap(), gh("0"));
        assert!(Geohash::from_ordinal(0, 0).is_err());
    }

    #[test]
    fn test_string_conversions() {
        let cell = gh("mgu3");
        assert_eq!(cell.to_string(), "mgu3");
        assert_eq!(String::from(cell.clone()), "mgu3");
        assert_eq!(Geohash::try_from("MGU3".to_string()).unwrap(), cell);
        assert_eq!(Geohash::try_from("mgu3").unwrap(), cell);
    }

    #[test]
    fn test_serde_as_text() {
        let cell = gh("w18md");
        assert_eq!(serde_json::to_string(&cell).unwrap(), "\"w18md\"");
        let back: Geohash = serde_json::from_str("\"W18MD\"").unwrap();
        assert_eq!(back, cell);
        assert!(serde_json::from_str::<Geohash>("\"w18mi\"").is_err());

        let direction: Direction = serde_json::from_str("\"north_east\"").unwrap();
        assert_eq!(direction, Direction::NorthEast);
    }
}
