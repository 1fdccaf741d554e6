use crate::Float;

/// The largest valid 24-bit RGB value.
pub(crate) const MAX_RGB: u32 = 0xff_ff_ff;

/// Extract the 8-bit red, green, and blue channels from the 24-bit value.
///
/// The value is masked to 24 bits first, so that no channel ever reads
/// outside `0..=255`.
#[inline]
pub(crate) fn to_channels(rgb: u32) -> [u8; 3] {
    let rgb = rgb & MAX_RGB;
    [
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
    ]
}

/// Combine 8-bit channels into a 24-bit value.
#[inline]
pub(crate) const fn from_channels(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Convert the given 24-bit RGB coordinates to floating point coordinates.
#[inline]
pub(crate) fn from_24bit(r: u8, g: u8, b: u8) -> [Float; 3] {
    [r as Float / 255.0, g as Float / 255.0, b as Float / 255.0]
}

// --------------------------------------------------------------------------------------------------------------------

/// Convert coordinates from gamma-corrected sRGB to linear sRGB, scaled by 100.
fn rgb_to_linear_rgb(value: &[Float; 3]) -> [Float; 3] {
    #[inline]
    fn convert(value: Float) -> Float {
        let linear = if value <= 0.04045 {
            value / 12.92
        } else {
            ((value + 0.055) / 1.055).powf(2.4)
        };
        linear * 100.0
    }

    [convert(value[0]), convert(value[1]), convert(value[2])]
}

// http://www.easyrgb.com/en/math.php, four significant digits.

#[rustfmt::skip]
const LINEAR_SRGB_TO_XYZ: [[Float; 3]; 3] = [
    [ 0.4124, 0.3576, 0.1805 ],
    [ 0.2126, 0.7152, 0.0722 ],
    [ 0.0193, 0.1192, 0.9505 ],
];

/// Convert coordinates for linear sRGB to XYZ.
///
/// The products are rounded before summing, i.e., there is no `mul_add`.
fn linear_srgb_to_xyz(value: &[Float; 3]) -> [Float; 3] {
    let [row1, row2, row3] = &LINEAR_SRGB_TO_XYZ;
    let [r, g, b] = *value;

    [
        (r * row1[0]) + (g * row1[1]) + (b * row1[2]),
        (r * row2[0]) + (g * row2[1]) + (b * row2[2]),
        (r * row3[0]) + (g * row3[1]) + (b * row3[2]),
    ]
}

/// The D65 reference white.
const REFERENCE_WHITE: [Float; 3] = [95.047, 100.0, 108.883];

/// Convert coordinates for XYZ to CIELAB.
fn xyz_to_lab(value: &[Float; 3]) -> [Float; 3] {
    #[inline]
    fn f(t: Float) -> Float {
        if t > 0.008856 {
            t.powf(1.0 / 3.0)
        } else {
            (7.787 * t) + (16.0 / 116.0)
        }
    }

    let x = f(value[0] / REFERENCE_WHITE[0]);
    let y = f(value[1] / REFERENCE_WHITE[1]);
    let z = f(value[2] / REFERENCE_WHITE[2]);

    [(116.0 * y) - 16.0, 500.0 * (x - y), 200.0 * (y - z)]
}

// --------------------------------------------------------------------------------------------------------------------

/// A color in CIELAB.
///
/// Lightness L ranges `0..=100`, whereas a and b have no fixed bounds but
/// stay within roughly `-128..=128` for sRGB colors. There is no public
/// constructor; use [`to_lab`] or [`ColorRecord::to_lab`](crate::ColorRecord::to_lab).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    coordinates: [Float; 3],
}

impl Lab {
    #[inline]
    pub(crate) const fn new(l: Float, a: Float, b: Float) -> Self {
        Self {
            coordinates: [l, a, b],
        }
    }

    /// Get the lightness L.
    #[inline]
    pub const fn l(&self) -> Float {
        self.coordinates[0]
    }

    /// Get the red/green coordinate a.
    #[inline]
    pub const fn a(&self) -> Float {
        self.coordinates[1]
    }

    /// Get the blue/yellow coordinate b.
    #[inline]
    pub const fn b(&self) -> Float {
        self.coordinates[2]
    }

    /// Compute the chroma, i.e., the distance from the achromatic axis.
    #[inline]
    pub fn chroma(&self) -> Float {
        (self.a().powi(2) + self.b().powi(2)).sqrt()
    }

    /// Get all three coordinates.
    #[inline]
    pub const fn as_array(&self) -> &[Float; 3] {
        &self.coordinates
    }
}

impl AsRef<[Float; 3]> for Lab {
    fn as_ref(&self) -> &[Float; 3] {
        &self.coordinates
    }
}

/// Convert a 24-bit sRGB value to CIELAB.
///
/// The conversion goes through normalized and linearized sRGB as well as XYZ
/// with the D65 illuminant. It is total: Bits beyond the lower 24 are
/// ignored.
///
/// ```
/// # use colormatch::to_lab;
/// let black = to_lab(0x000000);
/// assert_eq!(black.as_array(), &[0.0, 0.0, 0.0]);
/// ```
pub fn to_lab(rgb: u32) -> Lab {
    let [r, g, b] = to_channels(rgb);
    let linear = rgb_to_linear_rgb(&from_24bit(r, g, b));
    let [l, a, b] = xyz_to_lab(&linear_srgb_to_xyz(&linear));
    Lab::new(l, a, b)
}
