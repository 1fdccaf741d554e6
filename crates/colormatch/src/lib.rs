//! # Color Match
//!
//! Colormatch replaces ad-hoc colors with the closest colors from a
//! specification palette, as judged by human perception.
#![cfg_attr(
    not(feature = "pyffi"),
    doc = " This version of the API documentation **covers native Rust interfaces
only**."
)]
#![cfg_attr(
    feature = "pyffi",
    doc = " This version of the API documentation **covers both Rust and Python
interfaces**."
)]
//!
//!
//! ## 1. Overview
//!
//! Colormatch's main abstractions are:
//!
//!   * [`ColorRecord`] is a **named 24-bit sRGB color**. Records are validated
//!     upon construction, so that every record has a non-empty name and an RGB
//!     value in `0..=0xffffff`.
//!   * [`to_lab`] converts RGB values to the **CIELAB color space** by way of
//!     linear sRGB and XYZ with the D65 reference white. The resulting [`Lab`]
//!     coordinates are the input to the perceptual distance metrics.
//!   * [`DistanceMetric`] selects between the **CIE94 and CIEDE2000** formulas
//!     for computing the perceived difference ΔE between two colors.
//!   * [`Matcher`] finds the **closest specification color** for every
//!     original color, on large inputs in parallel, producing one
//!     [`MatchResult`] per original. Its [`Options`](opt::Options) can also be
//!     read from the environment.
//!   * The [`registry`] module turns matches into **named color resources**,
//!     collapsing duplicates and reporting names that conflict with existing
//!     resources.
//!   * The [`document`] module provides a **typed document model** with a
//!     pre-order traversal of color definitions, extraction of their colors,
//!     and an XML [`DocumentSink`](document::DocumentSink).
//!   * [`DocumentRewriter`] **replaces color definitions with references** to
//!     named color resources by positional correspondence and merges the
//!     resources into the document.
//!
//!
//! ## 2. Matching and Rewriting
//!
//! The complete workflow extracts a document's colors, matches them against
//! the specification palette, and rewrites the document so that it references
//! the palette's names.
//!
//! ```
//! # use colormatch::{find_matches, rewrite, ColorRecord, DistanceMetric, MatchResult};
//! # use colormatch::document::{extract_colors, Element, XmlWriter};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut root = Element::new("document").with_child(
//!     Element::new("label").with_child(
//!         Element::new("color")
//!             .with_attribute("key", "textColor")
//!             .with_attribute("red", "0.86666666666666667")
//!             .with_attribute("green", "0")
//!             .with_attribute("blue", "0")
//!             .with_attribute("alpha", "1")
//!             .with_attribute("colorSpace", "calibratedRGB"),
//!     ),
//! );
//! let specs = [
//!     ColorRecord::new("Spec1", 0x009000)?,
//!     ColorRecord::new("Spec2", 0xfa0000)?,
//!     ColorRecord::new("Spec3", 0xdd0000)?,
//! ];
//!
//! // 1. Extract the document's colors
//! let originals = extract_colors(&root);
//!
//! // 2. Match them against the specification colors
//! let matches = find_matches(&originals, &specs, DistanceMetric::Cie94)?;
//! assert_eq!(matches[0].matched().name(), "Spec3");
//!
//! // 3. Rewrite the document
//! let matched: Vec<_> = matches.into_iter().map(MatchResult::into_matched).collect();
//! let mut writer = XmlWriter::new(Vec::new());
//! let report = rewrite(&mut root, &matched, &mut writer)?;
//! assert_eq!(report.substituted, 1);
//! assert_eq!(report.resources[0].name(), "Spec3");
//! # Ok(())
//! # }
//! ```
//!
//! Rewriting relies on the Nth color definition corresponding to the Nth
//! match. [`extract_colors`](document::extract_colors) and
//! [`DocumentRewriter`] use the same traversal, so matches computed from the
//! extracted colors line up with the document, as long as the document does
//! not change in between.
//!
//!
//! ## 3. Perceptual Distance
//!
//! CIE94 uses the first color's chroma for its chroma and hue weights. Hence
//! [`DistanceMetric::Cie94`] is not symmetric, i.e., the distance from the
//! original to a specification color may differ from the distance in the
//! other direction. Matching always measures from the original.
//! [`DistanceMetric::Ciede2000`] is the more recent and more accurate formula.
//!
//!
//! ## 4. Optional Features
//!
//!   * `serde` enables serialization for records, match results, metrics,
//!     and resources. Deserializing a record validates it.
//!   * `pyffi` exposes records, match results, metrics, and matching to
//!     Python.
//!
//! Log messages are emitted with [tracing](https://docs.rs/tracing).
#![cfg_attr(
    feature = "pyffi",
    doc = "Items that are only available in Python are decorated with <i
    class=python-only>Python only!</i>."
)]

/// The floating point type in use.
pub type Float = f64;

/// [`Float`]'s bits.
pub type Bits = u64;

mod core;
pub mod document;
pub mod error;
mod matcher;
pub mod opt;
mod record;
pub mod registry;
mod rewrite;
mod util;

#[doc(hidden)]
pub use core::to_eq_bits;

pub use core::{to_lab, DistanceMetric, Lab};
pub use matcher::{find_matches, Matcher};
pub use record::{ColorRecord, MatchResult};
pub use rewrite::{
    rewrite, DocumentRewriter, MatchCursor, RewriteOutcome, RewritePhase, RewriteReport,
};

#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

/// Find the best match for every original color. <i class=python-only>Python
/// only!</i>
#[cfg(feature = "pyffi")]
#[pyfunction]
#[pyo3(name = "find_matches", signature = (originals, specs, metric = DistanceMetric::Cie94))]
fn py_find_matches(
    originals: Vec<ColorRecord>,
    specs: Vec<ColorRecord>,
    metric: DistanceMetric,
) -> PyResult<Vec<MatchResult>> {
    Ok(find_matches(&originals, &specs, metric)?)
}

#[doc(hidden)]
#[cfg(feature = "pyffi")]
#[pymodule]
pub fn colormatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_find_matches, m)?)?;

    m.add_class::<ColorRecord>()?;
    m.add_class::<DistanceMetric>()?;
    m.add_class::<MatchResult>()?;

    Ok(())
}
