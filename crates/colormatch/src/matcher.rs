use rayon::prelude::*;

use crate::core::{find_closest, Lab};
use crate::error::MatchError;
use crate::opt::Options;
use crate::{ColorRecord, DistanceMetric, MatchResult};

/// A matcher of original colors against specification colors.
///
/// For every original color, a matcher determines the specification color
/// with the smallest perceptual distance. On ties, the earliest specification
/// color wins. Results are in the same order as the original colors, no
/// matter whether they were computed sequentially or in parallel.
///
/// ```
/// # use colormatch::{ColorRecord, DistanceMetric, Matcher};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let originals = [ColorRecord::new("Red", 0xdd0000)?];
/// let specs = [
///     ColorRecord::new("Spec1", 0x009000)?,
///     ColorRecord::new("Spec2", 0xfa0000)?,
///     ColorRecord::new("Spec3", 0xdd0000)?,
/// ];
///
/// let matches = Matcher::new(DistanceMetric::Cie94).find_matches(&originals, &specs)?;
/// assert_eq!(matches[0].matched().name(), "Spec3");
/// assert_eq!(matches[0].distance(), 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    options: Options,
}

impl Matcher {
    /// Create a new matcher with the given metric and otherwise default
    /// options.
    pub fn new(metric: DistanceMetric) -> Self {
        Self::with_options(Options::with_metric(metric))
    }

    /// Create a new matcher with the given options.
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Get this matcher's distance metric.
    pub fn metric(&self) -> DistanceMetric {
        self.options.metric()
    }

    /// Find the best match for every original color.
    ///
    /// This method rejects empty lists of original or specification colors
    /// before doing any work.
    pub fn find_matches(
        &self,
        originals: &[ColorRecord],
        specs: &[ColorRecord],
    ) -> Result<Vec<MatchResult>, MatchError> {
        if originals.is_empty() {
            return Err(MatchError::NoOriginals);
        } else if specs.is_empty() {
            return Err(MatchError::NoSpecifications);
        }

        let spec_labs: Vec<Lab> = specs.iter().map(ColorRecord::to_lab).collect();
        let parallel = self.options.is_parallel(originals.len());
        tracing::debug!(
            originals = originals.len(),
            specs = specs.len(),
            metric = %self.metric(),
            parallel,
            "matching colors"
        );

        let results = if parallel {
            originals
                .par_iter()
                .map(|original| self.best_match(original, specs, &spec_labs))
                .collect::<Vec<_>>()
        } else {
            originals
                .iter()
                .map(|original| self.best_match(original, specs, &spec_labs))
                .collect::<Vec<_>>()
        };

        results.into_iter().collect()
    }

    /// Find the best match for a single original color.
    pub fn find_match(
        &self,
        original: &ColorRecord,
        specs: &[ColorRecord],
    ) -> Result<MatchResult, MatchError> {
        if specs.is_empty() {
            return Err(MatchError::NoSpecifications);
        }

        let spec_labs: Vec<Lab> = specs.iter().map(ColorRecord::to_lab).collect();
        self.best_match(original, specs, &spec_labs)
    }

    fn best_match(
        &self,
        original: &ColorRecord,
        specs: &[ColorRecord],
        spec_labs: &[Lab],
    ) -> Result<MatchResult, MatchError> {
        let metric = self.metric();
        let (index, distance) =
            find_closest(&original.to_lab(), spec_labs, |lab1, lab2| {
                metric.delta_e(lab1, lab2)
            })
            .ok_or(MatchError::NoSpecifications)?;

        let matched = &specs[index];
        tracing::debug!(
            original = %original,
            matched = %matched,
            distance,
            "found closest specification color"
        );

        Ok(MatchResult::new(original.clone(), matched.clone(), distance))
    }
}

/// Find the best match for every original color with the given metric.
///
/// This function is a shorthand for [`Matcher::find_matches`] with otherwise
/// default options.
pub fn find_matches(
    originals: &[ColorRecord],
    specs: &[ColorRecord],
    metric: DistanceMetric,
) -> Result<Vec<MatchResult>, MatchError> {
    Matcher::new(metric).find_matches(originals, specs)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::RecordError;
    use rand::Rng;

    fn specs() -> Result<Vec<ColorRecord>, RecordError> {
        [
            ("Spec1", 0x009000),
            ("Spec2", 0xfa0000),
            ("Spec3", 0xdd0000),
            ("Spec4", 0x00c000),
            ("Spec5", 0x0000d0),
            ("Spec6", 0x0000c9),
            ("Spec7", 0x0000a9),
        ]
        .into_iter()
        .map(|(name, rgb)| ColorRecord::new(name, rgb))
        .collect()
    }

    fn best(
        rgb: u32,
        specs: &[ColorRecord],
        metric: DistanceMetric,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let originals = [ColorRecord::new("Red", rgb)?];
        let matches = find_matches(&originals, specs, metric)?;
        Ok(matches[0].matched().name().to_string())
    }

    #[test]
    fn test_scenarios() -> Result<(), Box<dyn std::error::Error>> {
        let specs = specs()?;

        for metric in [DistanceMetric::Cie94, DistanceMetric::Ciede2000] {
            assert_eq!(best(0xdd0000, &specs[..3], metric)?, "Spec3", "{} red", metric);
            assert_eq!(best(0x00a000, &specs[..3], metric)?, "Spec1", "{} green", metric);
            assert_eq!(best(0xdd0000, &specs, metric)?, "Spec3", "{} red, all", metric);
            assert_eq!(best(0x00a000, &specs, metric)?, "Spec1", "{} green, all", metric);
            assert_eq!(best(0x0000f1, &specs, metric)?, "Spec5", "{} blue, all", metric);
        }

        let originals = [ColorRecord::new("Red", 0xdd0000)?];
        let matches = find_matches(&originals, &specs, DistanceMetric::Cie94)?;
        assert_eq!(matches[0].distance(), 0.0, "exact match has distance zero");
        assert_eq!(matches[0].original(), &originals[0], "original is retained");
        Ok(())
    }

    #[test]
    fn test_preconditions() -> Result<(), RecordError> {
        let red = [ColorRecord::new("Red", 0xdd0000)?];
        let matcher = Matcher::default();

        assert_eq!(
            matcher.find_matches(&red, &[]),
            Err(MatchError::NoSpecifications),
            "empty specs are rejected"
        );
        assert_eq!(
            matcher.find_matches(&[], &red),
            Err(MatchError::NoOriginals),
            "empty originals are rejected"
        );
        assert_eq!(
            matcher.find_match(&red[0], &[]),
            Err(MatchError::NoSpecifications),
            "empty specs are rejected for single color"
        );
        Ok(())
    }

    #[test]
    fn test_tie_break() -> Result<(), RecordError> {
        let originals = [ColorRecord::new("Gray", 0x808080)?];
        let specs = [
            ColorRecord::new("A", 0x0000ff)?,
            ColorRecord::new("B", 0x0000ff)?,
        ];

        for _ in 0..10 {
            for metric in [DistanceMetric::Cie94, DistanceMetric::Ciede2000] {
                let matches = find_matches(&originals, &specs, metric);
                assert_eq!(
                    matches.map(|m| m[0].matched().name().to_string()).ok().as_deref(),
                    Some("A"),
                    "earliest specification wins ties with {}",
                    metric
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_order_and_parallelism() -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = rand::rng();
        let originals = (0..300)
            .map(|index| ColorRecord::new(format!("C{}", index), rng.random_range(0..=0xffffff)))
            .collect::<Result<Vec<_>, _>>()?;
        let specs = (0..40)
            .map(|index| ColorRecord::new(format!("S{}", index), rng.random_range(0..=0xffffff)))
            .collect::<Result<Vec<_>, _>>()?;

        let sequential = Matcher::with_options(
            Options::builder().parallel_threshold(0).build(),
        )
        .find_matches(&originals, &specs)?;
        let parallel = Matcher::with_options(
            Options::builder().parallel_threshold(1).build(),
        )
        .find_matches(&originals, &specs)?;

        assert_eq!(sequential.len(), originals.len(), "one result per original");
        for (result, original) in sequential.iter().zip(originals.iter()) {
            assert_eq!(result.original(), original, "results are in input order");
        }
        assert_eq!(sequential, parallel, "parallel matching yields the same results");
        Ok(())
    }
}
