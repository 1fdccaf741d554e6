#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

use super::Lab;
use crate::{ColorRecord, Float};

/// Replace not-a-number with zero.
#[inline]
fn nan_to_zero(value: Float) -> Float {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Compute Delta-E with the CIE94 formula.
///
/// The scale factors for chroma and hue are based on the chroma of the first
/// color only, so the result is *not* symmetric. The radicand for ΔH may come
/// out slightly negative due to floating point error; it is clamped to zero.
/// Any term that still evaluates to not-a-number contributes zero.
#[allow(non_snake_case)]
pub(crate) fn delta_e_cie94(lab1: &Lab, lab2: &Lab) -> Float {
    const K_L: Float = 1.0;
    const K_C: Float = 1.0;
    const K_H: Float = 1.0;
    const K_1: Float = 0.045;
    const K_2: Float = 0.015;

    let [L1, a1, b1] = *lab1.as_array();
    let [L2, a2, b2] = *lab2.as_array();

    let ΔL = L1 - L2;
    let Δa = a1 - a2;
    let Δb = b1 - b2;

    let C1 = (a1.powi(2) + b1.powi(2)).sqrt();
    let C2 = (a2.powi(2) + b2.powi(2)).sqrt();
    let ΔC = C1 - C2;

    let ΔH = (Δa.powi(2) + Δb.powi(2) - ΔC.powi(2)).max(0.0).sqrt();

    let S_L = 1.0;
    let S_C = 1.0 + K_1 * C1;
    let S_H = 1.0 + K_2 * C1;

    let P1 = nan_to_zero((ΔL / (K_L * S_L)).powi(2));
    let P2 = nan_to_zero((ΔC / (K_C * S_C)).powi(2));
    let P3 = nan_to_zero((ΔH / (K_H * S_H)).powi(2));

    (P1 + P2 + P3).sqrt()
}

/// Compute the hue angle in degrees `0..360`.
///
/// The hue of a color on the achromatic axis is undefined; it is zero here,
/// which also sidesteps `atan2(0, 0)`.
#[inline]
fn hue_angle(a: Float, b: Float) -> Float {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    }
}

/// Compute Delta-E with the CIEDE2000 formula.
///
/// This function follows [Sharma et al.
/// 2005](https://hajim.rochester.edu/ece/sites/gsharma/ciede2000/ciede2000noteCRNA.pdf),
/// including the handling of zero chroma when computing the hue difference
/// and the mean hue.
#[allow(non_snake_case)]
pub(crate) fn delta_e_ciede2000(lab1: &Lab, lab2: &Lab) -> Float {
    const K_L: Float = 1.0;
    const K_C: Float = 1.0;
    const K_H: Float = 1.0;
    const POW25_7: Float = 6_103_515_625.0; // 25⁷

    let [L1, a1, b1] = *lab1.as_array();
    let [L2, a2, b2] = *lab2.as_array();

    // Rotate a.
    let C1ab = (a1.powi(2) + b1.powi(2)).sqrt();
    let C2ab = (a2.powi(2) + b2.powi(2)).sqrt();
    let Cab_mean_pow7 = ((C1ab + C2ab) / 2.0).powi(7);
    let G = 0.5 * (1.0 - (Cab_mean_pow7 / (Cab_mean_pow7 + POW25_7)).sqrt());

    let a1_ = (1.0 + G) * a1;
    let a2_ = (1.0 + G) * a2;

    let C1_ = (a1_.powi(2) + b1.powi(2)).sqrt();
    let C2_ = (a2_.powi(2) + b2.powi(2)).sqrt();
    let h1_ = hue_angle(a1_, b1);
    let h2_ = hue_angle(a2_, b2);

    // Differences
    let ΔL_ = L2 - L1;
    let ΔC_ = C2_ - C1_;

    let C1_C2_ = C1_ * C2_;
    let Δh_ = if C1_C2_ == 0.0 {
        0.0
    } else {
        let Δh = h2_ - h1_;
        if 180.0 < Δh {
            Δh - 360.0
        } else if Δh < -180.0 {
            Δh + 360.0
        } else {
            Δh
        }
    };
    let ΔH_ = 2.0 * C1_C2_.sqrt() * (Δh_ / 2.0).to_radians().sin();

    // Means
    let L_mean = (L1 + L2) / 2.0;
    let C_mean = (C1_ + C2_) / 2.0;
    let h_sum = h1_ + h2_;
    let h_mean = if C1_C2_ == 0.0 {
        h_sum
    } else if (h1_ - h2_).abs() <= 180.0 {
        h_sum / 2.0
    } else if h_sum < 360.0 {
        (h_sum + 360.0) / 2.0
    } else {
        (h_sum - 360.0) / 2.0
    };

    // Weights
    let T = 1.0 - 0.17 * (h_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_mean).to_radians().cos()
        + 0.32 * (3.0 * h_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_mean - 63.0).to_radians().cos();

    let Δθ = 30.0 * (-((h_mean - 275.0) / 25.0).powi(2)).exp();
    let C_mean_pow7 = C_mean.powi(7);
    let R_C = 2.0 * (C_mean_pow7 / (C_mean_pow7 + POW25_7)).sqrt();
    let L_offset = (L_mean - 50.0).powi(2);
    let S_L = 1.0 + (0.015 * L_offset) / (20.0 + L_offset).sqrt();
    let S_C = 1.0 + 0.045 * C_mean;
    let S_H = 1.0 + 0.015 * C_mean * T;
    let R_T = -(2.0 * Δθ).to_radians().sin() * R_C;

    let P1 = ΔL_ / (K_L * S_L);
    let P2 = ΔC_ / (K_C * S_C);
    let P3 = ΔH_ / (K_H * S_H);

    nan_to_zero(P1.powi(2) + P2.powi(2) + P3.powi(2) + R_T * P2 * P3)
        .max(0.0)
        .sqrt()
}

// --------------------------------------------------------------------------------------------------------------------

/// A choice of perceptual distance metric.
///
/// Both metrics compute Delta-E, i.e., the perceived difference between two
/// colors, from their CIELAB coordinates. Smaller is more similar and a color
/// always has distance zero to itself.
///
/// Neither metric is assumed to be symmetric. In particular,
/// [`DistanceMetric::Cie94`] weighs chroma and hue differences by the chroma
/// of the *first* color only. That is a known deviation from the symmetric
/// variant found in some textbooks, retained because match rankings depend on
/// it.
#[cfg_attr(
    feature = "pyffi",
    pyclass(eq, eq_int, frozen, hash, module = "colormatch")
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    /// The CIE94 formula for graphic arts.
    ///
    /// The chroma and hue weights use the first color's chroma only, so this
    /// metric is not symmetric.
    #[default]
    Cie94,
    /// The CIEDE2000 formula.
    Ciede2000,
}

#[cfg_attr(feature = "pyffi", pymethods)]
impl DistanceMetric {
    /// Get this metric's name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cie94 => "CIE94",
            Self::Ciede2000 => "CIEDE2000",
        }
    }
}

impl DistanceMetric {
    /// Compute the perceived difference between the two CIELAB colors.
    ///
    /// ```
    /// # use colormatch::{to_lab, DistanceMetric};
    /// let red = to_lab(0xdd0000);
    /// let redder = to_lab(0xfa0000);
    /// let green = to_lab(0x009000);
    ///
    /// let metric = DistanceMetric::Ciede2000;
    /// assert_eq!(metric.delta_e(&red, &red), 0.0);
    /// assert!(metric.delta_e(&red, &redder) < metric.delta_e(&red, &green));
    /// ```
    pub fn delta_e(&self, lab1: &Lab, lab2: &Lab) -> Float {
        match self {
            Self::Cie94 => delta_e_cie94(lab1, lab2),
            Self::Ciede2000 => delta_e_ciede2000(lab1, lab2),
        }
    }

    /// Compute the perceived difference between the two color records.
    pub fn distance(&self, record1: &ColorRecord, record2: &ColorRecord) -> Float {
        self.delta_e(&record1.to_lab(), &record2.to_lab())
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = crate::error::UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cie94" => Ok(Self::Cie94),
            "ciede2000" | "de2000" => Ok(Self::Ciede2000),
            _ => Err(crate::error::UnknownMetricError::new(s)),
        }
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// Find the candidate color closest to the origin.
///
/// This function compares the origin to every candidate color, computing the
/// distance metric with the given function, and returns the index of the
/// closest candidate color as well as its distance. It returns `None` if there
/// are no candidates. On ties, the earliest candidate wins.
pub(crate) fn find_closest<'c, C, F>(
    origin: &Lab,
    candidates: C,
    mut compute_distance: F,
) -> Option<(usize, Float)>
where
    C: IntoIterator<Item = &'c Lab>,
    F: FnMut(&Lab, &Lab) -> Float,
{
    let mut min_distance = Float::INFINITY;
    let mut min_index = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let distance = compute_distance(origin, candidate);
        if distance < min_distance || min_index.is_none() {
            min_distance = distance;
            min_index = Some(index);
        }
    }

    min_index.map(|index| (index, min_distance))
}
