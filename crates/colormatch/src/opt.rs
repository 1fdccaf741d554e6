//! Helper module with the options for matching colors.
//!
//! This module provides the options for a [`Matcher`](crate::Matcher) and the
//! corresponding builder.
//!
//!
//! # Example
//!
//! ```
//! # use colormatch::DistanceMetric;
//! # use colormatch::opt::Options;
//! let options = Options::builder()
//!     .metric(DistanceMetric::Ciede2000)
//!     .parallel_threshold(1_000)
//!     .build();
//!
//! assert_eq!(options.metric(), DistanceMetric::Ciede2000);
//! assert_eq!(options.parallel_threshold(), 1_000);
//! ```

use crate::util::{Env, Environment};
use crate::DistanceMetric;

/// The environment variable selecting the distance metric.
pub const METRIC_VARIABLE: &str = "COLORMATCH_METRIC";

/// The environment variable setting the parallel threshold.
pub const PARALLEL_THRESHOLD_VARIABLE: &str = "COLORMATCH_PARALLEL_THRESHOLD";

#[derive(Clone, Debug)]
struct OptionData {
    metric: DistanceMetric,
    parallel_threshold: usize,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            metric: DistanceMetric::Cie94,
            parallel_threshold: 256,
        }
    }
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set the distance metric.
    pub fn metric(&mut self, metric: DistanceMetric) -> &mut Self {
        self.0.metric = metric;
        self
    }

    /// Set the minimum number of original colors for matching in parallel.
    ///
    /// Zero disables parallel matching altogether.
    pub fn parallel_threshold(&mut self, threshold: usize) -> &mut Self {
        self.0.parallel_threshold = threshold;
        self
    }

    /// Instantiate the options.
    pub fn build(&self) -> Options {
        Options(self.0.clone())
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Instantiate the default options but with the given metric.
    pub fn with_metric(metric: DistanceMetric) -> Options {
        Self::builder().metric(metric).build()
    }

    /// Instantiate the options from the process environment.
    ///
    /// This method reads [`METRIC_VARIABLE`] and
    /// [`PARALLEL_THRESHOLD_VARIABLE`]. Missing variables leave the defaults
    /// in place, as do malformed values, which are also logged.
    pub fn from_environment() -> Options {
        Self::from_env(&Env::default())
    }

    pub(crate) fn from_env(env: &impl Environment) -> Options {
        let mut builder = Self::builder();

        if let Some(value) = env.read_non_empty(METRIC_VARIABLE) {
            match value.parse::<DistanceMetric>() {
                Ok(metric) => {
                    builder.metric(metric);
                }
                Err(error) => tracing::warn!(variable = METRIC_VARIABLE, %error, "ignoring"),
            }
        }

        if let Some(value) = env.read_non_empty(PARALLEL_THRESHOLD_VARIABLE) {
            match value.parse::<usize>() {
                Ok(threshold) => {
                    builder.parallel_threshold(threshold);
                }
                Err(error) => {
                    tracing::warn!(variable = PARALLEL_THRESHOLD_VARIABLE, %error, "ignoring")
                }
            }
        }

        builder.build()
    }

    /// Get the distance metric.
    pub fn metric(&self) -> DistanceMetric {
        self.0.metric
    }

    /// Get the minimum number of original colors for matching in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.0.parallel_threshold
    }

    /// Determine whether to match the given number of original colors in
    /// parallel.
    pub fn is_parallel(&self, originals: usize) -> bool {
        self.0.parallel_threshold != 0 && self.0.parallel_threshold <= originals
    }
}
