//! Conversion of raw caliper words into millimeters.
//!
//! Raw words are 24-bit two's-complement counts at 20480 increments per inch. Word 0
//! is the absolute position since power-up (modulo 5 mm it is absolute even across
//! power cycles). Word 1 is the negative of what the display shows, so it is negated
//! here to give the displayed value.
//!
//! ## Functions
//!
//! - [`sign_extend`]: 24-bit raw word to signed increments
//! - [`to_millimeters`]: raw word to millimeters
//! - [`from_millimeters`]: millimeters back to a raw word
//! - [`convert`]: both words of a frame to a [`Measurement`]

use core::fmt;

use libm::round;

use crate::consts::{WORD_MASK, WORD_MODULUS, WORD_SIGN_BIT, WORDS_PER_FRAME};

/// Physical readings of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Measurement {
    /// Position relative to where the caliper was powered on (word 0).
    pub absolute_mm: f64,
    /// The value on the caliper's display (word 1, negated).
    pub display_mm: f64,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mm={:7.3}  mm(disp)={:7.3}",
            self.absolute_mm, self.display_mm
        )
    }
}

/// Interprets the low 24 bits of `raw` as a two's-complement count.
pub const fn sign_extend(raw: u32) -> i32 {
    let value = (raw & WORD_MASK) as i32;
    if raw & WORD_SIGN_BIT != 0 {
        value - WORD_MODULUS
    } else {
        value
    }
}

/// Converts a raw word to millimeters.
pub fn to_millimeters(raw: u32, scale_mm: f64) -> f64 {
    f64::from(sign_extend(raw)) * scale_mm
}

/// Converts millimeters back to the raw word that encodes them.
///
/// The value is rounded to the nearest increment and wrapped into 24 bits.
pub fn from_millimeters(mm: f64, scale_mm: f64) -> u32 {
    let increments = round(mm / scale_mm) as i32;
    (increments as u32) & WORD_MASK
}

/// Converts the two words of a frame.
///
/// Word 1 is negated, following the caliper's convention.
pub fn convert(words: [u32; WORDS_PER_FRAME], scale_mm: f64) -> Measurement {
    Measurement {
        absolute_mm: to_millimeters(words[0], scale_mm),
        display_mm: -to_millimeters(words[1], scale_mm),
    }
}
