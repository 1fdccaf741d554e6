//! Utility module for turning matched colors into named color resources.

use std::collections::HashSet;

use crate::{ColorRecord, Float};

/// A named color resource.
///
/// A named color resource declares a color value under a stable, symbolic
/// name, so that color definitions in a document can reference the name
/// instead of embedding the color's components.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedColorResource {
    name: String,
    rgb: u32,
}

impl NamedColorResource {
    /// Get the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the 24-bit RGB value.
    pub fn rgb(&self) -> u32 {
        self.rgb
    }

    /// Get the red, green, blue, and alpha components in `0..=1`.
    ///
    /// Alpha is always one, i.e., resources are fully opaque.
    pub fn components(&self) -> [Float; 4] {
        let [r, g, b] = crate::core::to_channels(self.rgb);
        [
            r as Float / 255.0,
            g as Float / 255.0,
            b as Float / 255.0,
            1.0,
        ]
    }
}

impl From<&ColorRecord> for NamedColorResource {
    fn from(value: &ColorRecord) -> Self {
        Self {
            name: value.name().to_string(),
            rgb: value.rgb(),
        }
    }
}

/// The named color resources to insert into a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceSet {
    /// The resources, in order of first appearance and unique by name.
    pub resources: Vec<NamedColorResource>,
    /// The names that were not turned into resources, because the document
    /// already has a resource with the name or because an earlier match with
    /// the same name has a different color. Each name appears at most once.
    pub conflicts: Vec<String>,
}

/// Build the named color resources for the given matches.
///
/// This function first collapses identical matches, i.e., matches with the
/// same name and RGB value, into one. It then skips matches whose name is
/// amongst the existing names or has already been claimed by an earlier match
/// with a different RGB value, recording the name as a conflict instead.
/// Conflicts are not fatal; it is up to the caller to decide what to do
/// about them.
///
/// ```
/// # use std::collections::HashSet;
/// # use colormatch::ColorRecord;
/// # use colormatch::registry::build_resources;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matches = [
///     ColorRecord::new("A", 0xff0000)?,
///     ColorRecord::new("B", 0x00ff00)?,
///     ColorRecord::new("B", 0x00ff00)?,
/// ];
/// let existing = HashSet::from(["A".to_string()]);
///
/// let set = build_resources(&matches, &existing);
/// assert_eq!(set.resources.len(), 1);
/// assert_eq!(set.resources[0].name(), "B");
/// assert_eq!(set.conflicts, vec!["A".to_string()]);
/// # Ok(())
/// # }
/// ```
pub fn build_resources<'m, M>(matches: M, existing_names: &HashSet<String>) -> ResourceSet
where
    M: IntoIterator<Item = &'m ColorRecord>,
{
    let mut seen: HashSet<&ColorRecord> = HashSet::new();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut set = ResourceSet::default();

    for record in matches {
        if !seen.insert(record) {
            continue;
        }

        let name = record.name();
        if existing_names.contains(name) {
            tracing::warn!(name, "document already has a resource with the name");
        } else if claimed.contains(name) {
            tracing::warn!(name, rgb = %record.hex(), "name already used for another color");
        } else {
            claimed.insert(name);
            set.resources.push(NamedColorResource::from(record));
            continue;
        }

        if reported.insert(name) {
            set.conflicts.push(name.to_string());
        }
    }

    set
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::RecordError;

    fn record(name: &str, rgb: u32) -> Result<ColorRecord, RecordError> {
        ColorRecord::new(name, rgb)
    }

    #[test]
    fn test_dedup_preserves_order() -> Result<(), RecordError> {
        let matches = [
            record("C", 0x0000ff)?,
            record("A", 0xff0000)?,
            record("C", 0x0000ff)?,
            record("B", 0x00ff00)?,
        ];

        let set = build_resources(&matches, &HashSet::new());
        let names: Vec<_> = set.resources.iter().map(NamedColorResource::name).collect();
        assert_eq!(names, ["C", "A", "B"], "first-seen order");
        assert!(set.conflicts.is_empty(), "no conflicts");
        Ok(())
    }

    #[test]
    fn test_dedup_idempotence() -> Result<(), RecordError> {
        let matches = [
            record("A", 0xff0000)?,
            record("B", 0x00ff00)?,
            record("A", 0xff0000)?,
        ];
        let deduped = [record("A", 0xff0000)?, record("B", 0x00ff00)?];

        let twice = build_resources(matches.iter().chain(matches.iter()), &HashSet::new());
        let once = build_resources(&deduped, &HashSet::new());
        assert_eq!(
            twice.resources.len(),
            once.resources.len(),
            "duplicates do not add resources"
        );
        assert_eq!(twice, once, "same resources either way");
        Ok(())
    }

    #[test]
    fn test_collision_with_existing() -> Result<(), RecordError> {
        let matches = [record("A", 0xff0000)?, record("B", 0x00ff00)?, record("A", 0xff0000)?];
        let existing = HashSet::from(["A".to_string()]);

        let set = build_resources(&matches, &existing);
        assert!(
            set.resources.iter().all(|resource| resource.name() != "A"),
            "existing name is not redeclared"
        );
        assert_eq!(set.resources.len(), 1, "only B is declared");
        assert_eq!(set.conflicts, ["A"], "existing name is reported once");
        Ok(())
    }

    #[test]
    fn test_same_name_different_color() -> Result<(), RecordError> {
        let matches = [
            record("A", 0xff0000)?,
            record("A", 0xfe0000)?,
            record("A", 0xfd0000)?,
        ];

        let set = build_resources(&matches, &HashSet::new());
        assert_eq!(set.resources.len(), 1, "name is declared once");
        assert_eq!(set.resources[0].rgb(), 0xff0000, "first color wins");
        assert_eq!(set.conflicts, ["A"], "later colors are reported once");
        Ok(())
    }

    #[test]
    fn test_components() -> Result<(), RecordError> {
        let resource = NamedColorResource::from(&record("Orange", 0xff8000)?);
        assert_eq!(
            resource.components(),
            [1.0, 128.0 / 255.0, 0.0, 1.0],
            "components with opaque alpha"
        );
        Ok(())
    }
}
