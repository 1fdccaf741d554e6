use std::collections::HashSet;

use crate::document::{
    walk, ColorEncoding, DocumentSink, Element, Visitor, COLOR_TAG, KEY_ATTRIBUTE,
    NAMED_COLOR_TAG, NAME_ATTRIBUTE, RESOURCES_TAG,
};
use crate::error::{RewriteError, RewriteErrorKind};
use crate::registry::{build_resources, NamedColorResource, ResourceSet};
use crate::ColorRecord;

/// The phases of rewriting a document.
///
/// A rewrite progresses strictly forward, from scanning for color
/// definitions, to substituting references for them, to merging named color
/// resources into the document, to being done. If a rewrite fails, the
/// rewriter stays in the phase that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewritePhase {
    /// Looking for the first color definition.
    Scanning,
    /// Replacing color definitions with references.
    Substituting,
    /// Adding named color resources and storing the document.
    ResourceMerging,
    /// Finished successfully.
    Done,
}

/// A cursor over matches.
///
/// The cursor hands out matches strictly in order, one per color definition.
/// Running out of matches is an error, and so is having matches left over
/// once all color definitions have been visited.
#[derive(Clone, Debug)]
pub struct MatchCursor<'m> {
    matches: &'m [ColorRecord],
    position: usize,
}

impl<'m> MatchCursor<'m> {
    /// Create a new cursor positioned before the first match.
    pub fn new(matches: &'m [ColorRecord]) -> Self {
        Self {
            matches,
            position: 0,
        }
    }

    /// Get the number of matches consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the number of matches not yet consumed.
    pub fn remaining(&self) -> usize {
        self.matches.len() - self.position
    }

    /// Get the matches consumed so far.
    pub fn consumed(&self) -> &'m [ColorRecord] {
        &self.matches[..self.position]
    }

    /// Consume the next match.
    pub fn next_match(&mut self) -> Result<&'m ColorRecord, RewriteError> {
        let record = self
            .matches
            .get(self.position)
            .ok_or(RewriteErrorKind::InsufficientMatches {
                position: self.position,
                available: self.matches.len(),
            })?;

        self.position += 1;
        Ok(record)
    }

    /// Ensure that all matches have been consumed, returning their number.
    pub fn finish(&self) -> Result<usize, RewriteError> {
        if self.position < self.matches.len() {
            return Err(RewriteErrorKind::InsufficientColorNodes {
                consumed: self.position,
                available: self.matches.len(),
            }
            .into());
        }

        Ok(self.position)
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// The report of a successful rewrite.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// The number of color definitions replaced by references.
    pub substituted: usize,
    /// The named color resources added to the document.
    pub resources: Vec<NamedColorResource>,
    /// The names not added to the document because of conflicts.
    pub conflicts: Vec<String>,
}

/// The outcome of rewriting a document.
pub type RewriteOutcome = Result<RewriteReport, RewriteError>;

/// A rewriter of documents.
///
/// A document rewriter replaces every color definition in a document with a
/// reference to a named color resource and then adds the resources to the
/// document's resource container. It relies on **positional
/// correspondence**: The Nth color definition, in the order produced by
/// [`walk`], is replaced by a reference to the Nth match. It is the caller's
/// responsibility to produce the matches from the same document, e.g., with
/// [`extract_colors`](crate::document::extract_colors).
///
/// A rewriter processes exactly one document. If rewriting fails, the
/// document may be partially rewritten and should be discarded.
#[derive(Debug)]
pub struct DocumentRewriter<'m> {
    cursor: MatchCursor<'m>,
    phase: RewritePhase,
    started: bool,
}

impl<'m> DocumentRewriter<'m> {
    /// Create a new document rewriter for the given matches.
    pub fn new(matches: &'m [ColorRecord]) -> Self {
        Self {
            cursor: MatchCursor::new(matches),
            phase: RewritePhase::Scanning,
            started: false,
        }
    }

    /// Get the current phase.
    pub fn phase(&self) -> RewritePhase {
        self.phase
    }

    /// Get the match cursor.
    pub fn cursor(&self) -> &MatchCursor<'m> {
        &self.cursor
    }

    /// Rewrite the document with the given root and store it in the sink.
    ///
    /// Names of matches that already are resources in the document do not
    /// cause an error. They are listed as conflicts in the report instead.
    pub fn rewrite<S>(&mut self, root: &mut Element, sink: &mut S) -> RewriteOutcome
    where
        S: DocumentSink + ?Sized,
    {
        if self.started {
            return Err(RewriteErrorKind::AlreadyStarted.into());
        }
        self.started = true;

        walk(root, self)?;
        let substituted = self.cursor.finish()?;

        self.phase = RewritePhase::ResourceMerging;
        let ResourceSet {
            resources,
            conflicts,
        } = self.merge_resources(root);

        if let Err(error) = sink.store(root) {
            tracing::error!(%error, "could not store rewritten document");
            return Err(RewriteError::serialize(error));
        }

        self.phase = RewritePhase::Done;
        tracing::info!(
            substituted,
            resources = resources.len(),
            conflicts = conflicts.len(),
            "rewrote document"
        );

        Ok(RewriteReport {
            substituted,
            resources,
            conflicts,
        })
    }

    fn merge_resources(&self, root: &mut Element) -> ResourceSet {
        let container = root.child_or_insert(RESOURCES_TAG);
        let existing: HashSet<String> = container
            .children()
            .iter()
            .filter_map(|child| child.attributes().get(NAME_ATTRIBUTE))
            .map(str::to_string)
            .collect();

        let set = build_resources(self.cursor.consumed(), &existing);
        for resource in set.resources.iter() {
            container.push(declare(resource));
        }

        set
    }
}

impl Visitor for DocumentRewriter<'_> {
    type Error = RewriteError;

    fn visit_color(
        &mut self,
        element: &mut Element,
        encoding: ColorEncoding,
    ) -> Result<(), Self::Error> {
        self.phase = RewritePhase::Substituting;
        let record = self.cursor.next_match()?;
        tracing::trace!(
            position = self.cursor.position() - 1,
            rgb = format_args!("0x{:06X}", encoding.to_rgb()),
            name = record.name(),
            "substituting color reference"
        );

        let attributes = element.attributes_mut();
        attributes.retain(|name, _| name == KEY_ATTRIBUTE);
        attributes.set(NAME_ATTRIBUTE, record.name());
        Ok(())
    }

    fn skip_color(&mut self, element: &Element) {
        tracing::warn!(
            attributes = ?element.attributes(),
            "leaving color with unsupported encoding as is"
        );
    }
}

/// Create the element declaring the named color resource.
fn declare(resource: &NamedColorResource) -> Element {
    let [red, green, blue, _] = resource.components();
    let color = Element::new(COLOR_TAG)
        .with_attribute("red", format!("{:?}", red))
        .with_attribute("green", format!("{:?}", green))
        .with_attribute("blue", format!("{:?}", blue))
        .with_attribute("alpha", "1")
        .with_attribute("colorSpace", "custom")
        .with_attribute("customColorSpace", "sRGB");

    Element::new(NAMED_COLOR_TAG)
        .with_attribute(NAME_ATTRIBUTE, resource.name())
        .with_child(color)
}

/// Rewrite the document with the given matches and store it in the sink.
///
/// This function is a shorthand for creating a [`DocumentRewriter`] and
/// invoking its [`rewrite`](DocumentRewriter::rewrite) method.
///
/// ```
/// # use colormatch::{rewrite, ColorRecord};
/// # use colormatch::document::{Element, XmlWriter};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut root = Element::new("document").with_child(
///     Element::new("color")
///         .with_attribute("key", "textColor")
///         .with_attribute("white", "0")
///         .with_attribute("colorSpace", "calibratedWhite"),
/// );
/// let matches = [ColorRecord::new("Ink", 0x000000)?];
///
/// let mut writer = XmlWriter::new(Vec::new());
/// let report = rewrite(&mut root, &matches, &mut writer)?;
/// assert_eq!(report.substituted, 1);
/// assert_eq!(report.resources[0].name(), "Ink");
/// assert_eq!(root.children()[0].attributes().get("name"), Some("Ink"));
/// # Ok(())
/// # }
/// ```
pub fn rewrite<S>(root: &mut Element, matches: &[ColorRecord], sink: &mut S) -> RewriteOutcome
where
    S: DocumentSink + ?Sized,
{
    DocumentRewriter::new(matches).rewrite(root, sink)
}
