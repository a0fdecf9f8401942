//! Bit-level geohash codec.
//!
//! A cell is represented by a single `u64`:
//!
//! ```text
//!  63                                             4 3      0
//! +-----------------------------------------------+--------+
//! | interleaved lon/lat bits, left aligned, zero  | prec.  |
//! | padded below precision * 5 significant bits   | (1-12) |
//! +-----------------------------------------------+--------+
//! ```
//!
//! The first (most significant) bit is a longitude bit, then latitude and
//! longitude alternate. Alongside the packed word the codec keeps the two
//! de-interleaved "ladders" right aligned, so that stepping to a neighboring
//! cell is a single increment or decrement on one axis.

use crate::bbox::BoundingBox;
use crate::error::{GeohashError, Result};
use crate::validation::{validate_coordinate, validate_geohash_str, validate_precision};
use crate::{
    BITS_PER_CHAR, GEOHASH_ALPHABET, LATITUDE_MAX, LATITUDE_MIN, LONGITUDE_MAX, LONGITUDE_MIN,
};
use once_cell::sync::Lazy;

/// Width of the packed word.
const WORD_BITS: u32 = u64::BITS;

/// Low bits reserved for the precision tag.
const PRECISION_MASK: u64 = 0xF;

/// Char -> 5-bit value, both cases accepted.
static DECODE_TABLE: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, byte) in GEOHASH_ALPHABET.bytes().enumerate() {
        table[byte as usize] = Some(value as u8);
        table[byte.to_ascii_uppercase() as usize] = Some(value as u8);
    }
    table
});

/// Look up the 5-bit value of a geohash character, case-insensitively.
pub(crate) fn char_value(character: char) -> Option<u8> {
    if character.is_ascii() {
        DECODE_TABLE[character as usize]
    } else {
        None
    }
}

#[inline]
pub(crate) const fn significant_bits(precision: u8) -> u32 {
    precision as u32 * BITS_PER_CHAR
}

/// Number of bits below the significant span, precision tag included.
#[inline]
pub(crate) const fn insignificant_bits(precision: u8) -> u32 {
    WORD_BITS - significant_bits(precision)
}

/// Longitude ladder width; longitude takes the extra bit when the span is odd.
#[inline]
pub(crate) const fn lon_width(precision: u8) -> u32 {
    significant_bits(precision).div_ceil(2)
}

#[inline]
pub(crate) const fn lat_width(precision: u8) -> u32 {
    significant_bits(precision) / 2
}

#[inline]
const fn low_mask(width: u32) -> u64 {
    if width >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Precision stored in the tag, validated.
fn tag_precision(combined_bits: u64) -> Result<u8> {
    validate_precision((combined_bits & PRECISION_MASK) as usize)
}

/// The packed form of a geohash cell together with its per-axis bit ladders.
///
/// # Examples
///
/// ```
/// use geohash_cells::codec::LatLonBits;
///
/// let bits = LatLonBits::from_ladders(13, 25, 2)?;
/// assert_eq!(bits.precision(), 2);
///
/// let reparsed = LatLonBits::from_combined(bits.combined_bits())?;
/// assert_eq!(reparsed, bits);
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatLonBits {
    lat_bits: u64,
    lon_bits: u64,
    combined_bits: u64,
}

impl LatLonBits {
    /// Combine right-aligned latitude and longitude ladders.
    ///
    /// Bits above each ladder's width are discarded, so ladders that over- or
    /// underflowed by one step wrap around their own axis.
    pub fn from_ladders(lat_bits: u64, lon_bits: u64, precision: u8) -> Result<Self> {
        let precision = validate_precision(precision as usize)?;
        Ok(Self::from_ladders_unchecked(lat_bits, lon_bits, precision))
    }

    /// Parse the packed 64-bit form.
    ///
    /// Fails when the precision tag is outside 1..=12. Padding bits between the
    /// significant span and the tag are cleared.
    pub fn from_combined(combined_bits: u64) -> Result<Self> {
        let precision = tag_precision(combined_bits)?;
        Ok(Self::from_combined_unchecked(combined_bits, precision))
    }

    /// `precision` must already be validated.
    pub(crate) fn from_ladders_unchecked(lat_bits: u64, lon_bits: u64, precision: u8) -> Self {
        Self {
            lat_bits: lat_bits & low_mask(lat_width(precision)),
            lon_bits: lon_bits & low_mask(lon_width(precision)),
            combined_bits: interleave_bits(lat_bits, lon_bits, precision),
        }
    }

    fn from_combined_unchecked(combined_bits: u64, precision: u8) -> Self {
        let span = low_mask(significant_bits(precision)) << insignificant_bits(precision);
        let combined_bits = (combined_bits & span) | precision as u64;
        let (lat_bits, lon_bits) = split_bits(combined_bits, precision);
        Self {
            lat_bits,
            lon_bits,
            combined_bits,
        }
    }

    /// Cell at `ordinal` within the Z-order space of an already validated `precision`.
    ///
    /// Ordinals beyond the space wrap modulo `2^(precision * 5)`.
    pub(crate) fn from_ordinal(ordinal: u64, precision: u8) -> Self {
        Self::from_combined_unchecked(
            (ordinal << insignificant_bits(precision)) | precision as u64,
            precision,
        )
    }

    /// Latitude ladder, right aligned ("odd" bits of the interleaving).
    #[inline]
    pub fn lat_bits(&self) -> u64 {
        self.lat_bits
    }

    /// Longitude ladder, right aligned ("even" bits of the interleaving).
    #[inline]
    pub fn lon_bits(&self) -> u64 {
        self.lon_bits
    }

    #[inline]
    pub fn combined_bits(&self) -> u64 {
        self.combined_bits
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        (self.combined_bits & PRECISION_MASK) as u8
    }

    /// Position of the cell in the Z-order space of its precision.
    #[inline]
    pub fn ordinal(&self) -> u64 {
        self.combined_bits >> insignificant_bits(self.precision())
    }
}

/// Interleave latitude and longitude ladders into the packed form, longitude first.
///
/// Only the low `lat_width`/`lon_width` bits of each ladder are read.
pub fn interleave(lat_bits: u64, lon_bits: u64, precision: u8) -> Result<u64> {
    let precision = validate_precision(precision as usize)?;
    Ok(interleave_bits(lat_bits, lon_bits, precision))
}

fn interleave_bits(lat_bits: u64, lon_bits: u64, precision: u8) -> u64 {
    let significant = significant_bits(precision);

    let mut bits = 0u64;
    for index in 0..significant {
        let shift = (significant - (index + 1)) / 2;
        let ladder = if index % 2 == 0 { lon_bits } else { lat_bits };
        bits = (bits << 1) | ((ladder >> shift) & 1);
    }

    (bits << insignificant_bits(precision)) | precision as u64
}

/// Split the packed form into right-aligned `(lat_bits, lon_bits)` ladders.
pub fn split(combined_bits: u64) -> Result<(u64, u64)> {
    let precision = tag_precision(combined_bits)?;
    Ok(split_bits(combined_bits, precision))
}

fn split_bits(combined_bits: u64, precision: u8) -> (u64, u64) {
    let mut lat_bits = 0u64;
    let mut lon_bits = 0u64;
    for index in 0..significant_bits(precision) {
        let bit = (combined_bits >> (WORD_BITS - (index + 1))) & 1;
        if index % 2 == 0 {
            lon_bits = (lon_bits << 1) | bit;
        } else {
            lat_bits = (lat_bits << 1) | bit;
        }
    }
    (lat_bits, lon_bits)
}

/// Running state of the alternating lon/lat bisection.
struct Bisection {
    lat: [f64; 2],
    lon: [f64; 2],
    lat_bits: u64,
    lon_bits: u64,
    even: bool,
}

impl Bisection {
    fn new() -> Self {
        Self {
            lat: [LATITUDE_MIN, LATITUDE_MAX],
            lon: [LONGITUDE_MIN, LONGITUDE_MAX],
            lat_bits: 0,
            lon_bits: 0,
            even: true,
        }
    }

    /// Midpoint of the axis the next bit refines.
    fn mid(&self) -> f64 {
        let range = if self.even { &self.lon } else { &self.lat };
        (range[0] + range[1]) / 2.0
    }

    fn push(&mut self, bit: bool) {
        let mid = self.mid();
        let (range, ladder) = if self.even {
            (&mut self.lon, &mut self.lon_bits)
        } else {
            (&mut self.lat, &mut self.lat_bits)
        };
        if bit {
            range[0] = mid;
        } else {
            range[1] = mid;
        }
        *ladder = (*ladder << 1) | bit as u64;
        self.even = !self.even;
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new_unchecked(self.lat[0], self.lon[0], self.lat[1], self.lon[1])
    }
}

/// Encode a coordinate at the given precision.
///
/// # Examples
///
/// ```
/// use geohash_cells::codec::{decode_string, encode};
///
/// let bits = encode(36.51264084, -106.26257842, 12)?;
/// assert_eq!(decode_string(&bits), "9wkrtyvvw3wd");
/// # Ok::<(), geohash_cells::GeohashError>(())
/// ```
pub fn encode(latitude: f64, longitude: f64, precision: u8) -> Result<LatLonBits> {
    validate_coordinate(latitude, longitude)?;
    let precision = validate_precision(precision as usize)?;
    Ok(encode_unchecked(latitude, longitude, precision))
}

/// Encode values already known to be in range.
pub(crate) fn encode_unchecked(latitude: f64, longitude: f64, precision: u8) -> LatLonBits {
    let mut bisection = Bisection::new();
    for _ in 0..significant_bits(precision) {
        let value = if bisection.even { longitude } else { latitude };
        bisection.push(value >= bisection.mid());
    }
    LatLonBits::from_ladders_unchecked(bisection.lat_bits, bisection.lon_bits, precision)
}

/// Bounds of the cell described by `bits`.
pub fn decode_bounding_box(bits: &LatLonBits) -> BoundingBox {
    let mut bisection = Bisection::new();
    for index in 0..significant_bits(bits.precision()) {
        let mask = 1u64 << (WORD_BITS - (index + 1));
        bisection.push(bits.combined_bits() & mask != 0);
    }
    bisection.bounding_box()
}

/// Base-32 text of the cell described by `bits`.
pub fn decode_string(bits: &LatLonBits) -> String {
    let alphabet = GEOHASH_ALPHABET.as_bytes();
    let mut remaining = bits.combined_bits();
    let mut text = String::with_capacity(bits.precision() as usize);
    for _ in 0..bits.precision() {
        let position = (remaining >> (WORD_BITS - BITS_PER_CHAR)) as usize;
        text.push(alphabet[position] as char);
        remaining <<= BITS_PER_CHAR;
    }
    text
}

/// Parse geohash text into its bounds and bits in a single pass.
pub fn decode_str(text: &str) -> Result<(BoundingBox, LatLonBits)> {
    validate_geohash_str(text)?;

    let mut bisection = Bisection::new();
    let mut precision = 0u8;
    for (position, character) in text.chars().enumerate() {
        let value = char_value(character).ok_or(GeohashError::InvalidCharacter {
            character,
            position,
        })?;
        for shift in (0..BITS_PER_CHAR).rev() {
            bisection.push((value >> shift) & 1 == 1);
        }
        precision += 1;
    }

    let bits = LatLonBits::from_ladders_unchecked(bisection.lat_bits, bisection.lon_bits, precision);
    Ok((bisection.bounding_box(), bits))
}

/// Maximum latitude error (half a cell's height) at `precision`.
pub fn approx_lat_error(precision: u8) -> f64 {
    max_lat_size_at(precision) / 2.0
}

/// Maximum longitude error (half a cell's width) at `precision`.
pub fn approx_lon_error(precision: u8) -> f64 {
    max_lon_size_at(precision) / 2.0
}

/// Height in degrees of a cell at `precision`.
pub fn max_lat_size_at(precision: u8) -> f64 {
    180.0 / 2f64.powi(lat_width(precision) as i32)
}

/// Width in degrees of a cell at `precision`.
pub fn max_lon_size_at(precision: u8) -> f64 {
    360.0 / 2f64.powi(lon_width(precision) as i32)
}
