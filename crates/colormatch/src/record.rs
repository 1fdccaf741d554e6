#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

use crate::core::{from_channels, to_channels, to_lab, Lab, MAX_RGB};
use crate::error::{OutOfBoundsError, RecordError};
use crate::Float;

/// A named 24-bit sRGB color.
///
/// Color records are the unit of exchange between this crate and the code
/// decoding hex literals, catalogs, or documents into colors. Every record has
/// a non-empty name and an RGB value in `0..=0xffffff`, which is validated
/// upon construction. Names need not be unique within a list of records.
///
/// Two records are equal if both their names and RGB values are equal.
///
/// ```
/// # use colormatch::ColorRecord;
/// # use colormatch::error::RecordError;
/// let red = ColorRecord::new("Red", 0xdd0000)?;
/// assert_eq!(red.name(), "Red");
/// assert_eq!(red.channels(), [0xdd, 0, 0]);
/// assert_eq!(red.hex(), "0xDD0000");
/// # Ok::<(), RecordError>(())
/// ```
#[cfg_attr(
    feature = "pyffi",
    pyclass(eq, frozen, hash, module = "colormatch")
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UncheckedRecord")
)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorRecord {
    name: String,
    rgb: u32,
}

impl ColorRecord {
    /// Create a new color record.
    ///
    /// This function fails if the name is empty or the RGB value does not fit
    /// into 24 bits.
    pub fn new(name: impl Into<String>, rgb: u32) -> Result<Self, RecordError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RecordError::EmptyName);
        } else if MAX_RGB < rgb {
            return Err(OutOfBoundsError::new(rgb, 0..=MAX_RGB).into());
        }

        Ok(Self { name, rgb })
    }

    /// Create a new color record from a non-empty name and 24-bit value.
    pub(crate) fn from_parts(name: String, rgb: u32) -> Self {
        debug_assert!(!name.is_empty() && rgb <= MAX_RGB, "invalid color record");
        Self { name, rgb }
    }

    /// Create a new color record from its three channels.
    pub fn from_channels(name: impl Into<String>, r: u8, g: u8, b: u8) -> Result<Self, RecordError> {
        Self::new(name, from_channels(r, g, b))
    }

    /// Get the 8-bit red, green, and blue channels.
    pub fn channels(&self) -> [u8; 3] {
        to_channels(self.rgb)
    }

    /// Get the channels as floating point numbers in `0..=1`.
    pub fn components(&self) -> [Float; 3] {
        let [r, g, b] = self.channels();
        [r as Float / 255.0, g as Float / 255.0, b as Float / 255.0]
    }

    /// Convert this record's color to CIELAB.
    pub fn to_lab(&self) -> Lab {
        to_lab(self.rgb)
    }
}

#[cfg_attr(feature = "pyffi", pymethods)]
impl ColorRecord {
    /// Create a new color record. <i class=python-only>Python only!</i>
    #[cfg(feature = "pyffi")]
    #[new]
    pub fn py_new(name: String, rgb: u32) -> PyResult<Self> {
        Ok(Self::new(name, rgb)?)
    }

    /// Get the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the 24-bit RGB value.
    pub fn rgb(&self) -> u32 {
        self.rgb
    }

    /// Get the 8-bit red channel.
    pub fn red(&self) -> u8 {
        self.channels()[0]
    }

    /// Get the 8-bit green channel.
    pub fn green(&self) -> u8 {
        self.channels()[1]
    }

    /// Get the 8-bit blue channel.
    pub fn blue(&self) -> u8 {
        self.channels()[2]
    }

    /// Format the RGB value as `0xRRGGBB`.
    pub fn hex(&self) -> String {
        format!("0x{:06X}", self.rgb)
    }

    #[cfg(feature = "pyffi")]
    pub fn __repr__(&self) -> String {
        format!("ColorRecord({:?}, {})", self.name, self.hex())
    }
}

impl std::fmt::Display for ColorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.hex())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedRecord {
    name: String,
    rgb: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedRecord> for ColorRecord {
    type Error = RecordError;

    fn try_from(value: UncheckedRecord) -> Result<Self, Self::Error> {
        Self::new(value.name, value.rgb)
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// The best match for an original color.
///
/// A match result combines the original color, the specification color with
/// the smallest perceptual distance, and that distance.
#[cfg_attr(feature = "pyffi", pyclass(frozen, module = "colormatch"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    original: ColorRecord,
    #[cfg_attr(feature = "serde", serde(rename = "match"))]
    matched: ColorRecord,
    distance: Float,
}

impl MatchResult {
    pub(crate) fn new(original: ColorRecord, matched: ColorRecord, distance: Float) -> Self {
        Self {
            original,
            matched,
            distance,
        }
    }

    /// Get the original color.
    pub fn original(&self) -> &ColorRecord {
        &self.original
    }

    /// Get the closest specification color.
    pub fn matched(&self) -> &ColorRecord {
        &self.matched
    }

    /// Consume this result and return the closest specification color.
    pub fn into_matched(self) -> ColorRecord {
        self.matched
    }
}

#[cfg_attr(feature = "pyffi", pymethods)]
impl MatchResult {
    /// Get the perceptual distance between original and match.
    pub fn distance(&self) -> Float {
        self.distance
    }

    /// Get the original color. <i class=python-only>Python only!</i>
    #[cfg(feature = "pyffi")]
    #[getter(original)]
    pub fn py_original(&self) -> ColorRecord {
        self.original.clone()
    }

    /// Get the closest specification color. <i class=python-only>Python only!</i>
    #[cfg(feature = "pyffi")]
    #[getter(matched)]
    pub fn py_matched(&self) -> ColorRecord {
        self.matched.clone()
    }

    #[cfg(feature = "pyffi")]
    pub fn __str__(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Result for color named `{}`: Original {}; Match {}",
            self.original.name,
            self.original.hex(),
            self.matched.hex()
        )
    }
}

#[cfg(test)]
mod test {
    use super::{ColorRecord, MatchResult};
    use crate::error::RecordError;

    #[test]
    fn test_record_validation() {
        assert_eq!(
            ColorRecord::new("", 0x000000),
            Err(RecordError::EmptyName),
            "empty names are rejected"
        );
        assert!(
            matches!(
                ColorRecord::new("Ultra", 0x1000000),
                Err(RecordError::OutOfBounds(_))
            ),
            "RGB values beyond 24 bits are rejected"
        );
        assert!(ColorRecord::new("White", 0xffffff).is_ok(), "white is valid");
    }

    #[test]
    fn test_record_channels() -> Result<(), RecordError> {
        let color = ColorRecord::from_channels("Teal", 0x12, 0x80, 0x80)?;
        assert_eq!(color.rgb(), 0x128080, "channels combine");
        assert_eq!(
            [color.red(), color.green(), color.blue()],
            [0x12, 0x80, 0x80],
            "channels extract"
        );
        assert_eq!(color.hex(), "0x128080", "hex formatting");
        assert_eq!(color.to_string(), "Teal (0x128080)", "display");
        assert_eq!(color.components()[0], 18.0 / 255.0, "red component");
        Ok(())
    }

    #[test]
    fn test_match_result_display() -> Result<(), RecordError> {
        let result = MatchResult::new(
            ColorRecord::new("Red", 0xdd0000)?,
            ColorRecord::new("Spec3", 0xdd0000)?,
            0.0,
        );
        assert_eq!(
            result.to_string(),
            "Result for color named `Red`: Original 0xDD0000; Match 0xDD0000",
            "presentation of match result"
        );
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() -> Result<(), serde_json::Error> {
        let record: ColorRecord = serde_json::from_str(r#"{"name": "Red", "rgb": 14483456}"#)?;
        assert_eq!(record.rgb(), 0xdd0000, "record deserializes");

        let invalid = serde_json::from_str::<ColorRecord>(r#"{"name": "", "rgb": 0}"#);
        assert!(invalid.is_err(), "invalid record is rejected");

        let json = serde_json::to_string(&record)?;
        assert_eq!(json, r#"{"name":"Red","rgb":14483456}"#, "record serializes");
        Ok(())
    }
}
