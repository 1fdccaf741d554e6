use super::{Attributes, Element, NodeKind, COLOR_TAG};
use crate::core::from_channels;
use crate::ColorRecord;

/// The encoding of a color definition.
///
/// Components are in `0..=1` and single precision, just like in the
/// documents themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorEncoding {
    /// A gray level.
    White(f32),
    /// Red, green, and blue components.
    Rgb([f32; 3]),
}

impl ColorEncoding {
    /// Recognize the color encoded by the attributes.
    ///
    /// This function recognizes calibrated white and generic gamma 2.2 gray
    /// levels as well as calibrated RGB, sRGB, and Display P3 colors. It
    /// returns `None` for other color spaces and for missing or malformed
    /// components.
    pub fn from_attributes(attributes: &Attributes) -> Option<Self> {
        let space = attributes.get("colorSpace");
        let custom = attributes.get("customColorSpace");
        let component = |name: &str| attributes.get(name)?.trim().parse::<f32>().ok();

        if space == Some("calibratedWhite") || custom == Some("genericGamma22GrayColorSpace") {
            Some(Self::White(component("white")?))
        } else if space == Some("calibratedRGB")
            || custom == Some("sRGB")
            || custom == Some("displayP3")
        {
            Some(Self::Rgb([
                component("red")?,
                component("green")?,
                component("blue")?,
            ]))
        } else {
            None
        }
    }

    /// Convert this encoding to a 24-bit RGB value.
    ///
    /// Each component is scaled by 255 and truncated, with out-of-range
    /// values clamped to the 8-bit range.
    pub fn to_rgb(&self) -> u32 {
        match *self {
            Self::White(level) => {
                let level = to_channel(level);
                from_channels(level, level, level)
            }
            Self::Rgb([r, g, b]) => from_channels(to_channel(r), to_channel(g), to_channel(b)),
        }
    }
}

fn to_channel(component: f32) -> u8 {
    // Float to int casts saturate and map NaN to zero.
    (component * 255.0).trunc() as u8
}

// --------------------------------------------------------------------------------------------------------------------

/// An iterator over color definitions.
///
/// The iterator yields color definitions in the same order as [`walk`]
/// visits them.
///
/// [`walk`]: super::walk
#[derive(Debug)]
pub struct ColorDefinitions<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for ColorDefinitions<'a> {
    type Item = (&'a Element, ColorEncoding);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(element) = self.stack.pop() {
            let kind = element.kind();
            if kind == NodeKind::ResourceContainer {
                continue;
            }

            self.stack.extend(element.children().iter().rev());

            match kind {
                NodeKind::ColorDefinition(encoding) => return Some((element, encoding)),
                _ if element.tag() == COLOR_TAG => {
                    tracing::warn!(
                        attributes = ?element.attributes(),
                        "skipping color with unsupported encoding"
                    );
                }
                _ => (),
            }
        }

        None
    }
}

impl std::iter::FusedIterator for ColorDefinitions<'_> {}

/// Iterate over the color definitions of the tree rooted in the element.
pub fn color_definitions(root: &Element) -> ColorDefinitions<'_> {
    ColorDefinitions { stack: vec![root] }
}

/// Extract the colors defined by the tree rooted in the element.
///
/// The resulting records are named after their ordinal position, starting
/// with `"0"`. Hence, the Nth record corresponds to the Nth color definition
/// rewritten by [`DocumentRewriter`](crate::DocumentRewriter).
///
/// ```
/// # use colormatch::document::{extract_colors, Element};
/// let root = Element::new("document").with_child(
///     Element::new("color")
///         .with_attribute("key", "backgroundColor")
///         .with_attribute("white", "1")
///         .with_attribute("colorSpace", "calibratedWhite"),
/// );
///
/// let colors = extract_colors(&root);
/// assert_eq!(colors.len(), 1);
/// assert_eq!(colors[0].name(), "0");
/// assert_eq!(colors[0].rgb(), 0xffffff);
/// ```
pub fn extract_colors(root: &Element) -> Vec<ColorRecord> {
    let colors: Vec<_> = color_definitions(root)
        .enumerate()
        .map(|(index, (_, encoding))| ColorRecord::from_parts(index.to_string(), encoding.to_rgb()))
        .collect();

    tracing::debug!(count = colors.len(), "extracted colors from document");
    colors
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::{walk, Visitor, NAMED_COLOR_TAG, RESOURCES_TAG};

    fn rgb(space: (&str, &str), red: &str, green: &str, blue: &str) -> Element {
        Element::new(COLOR_TAG)
            .with_attribute("key", "textColor")
            .with_attribute("red", red)
            .with_attribute("green", green)
            .with_attribute("blue", blue)
            .with_attribute("alpha", "1")
            .with_attribute(space.0, space.1)
    }

    #[test]
    fn test_encodings() {
        let attributes: Attributes = [
            ("white", "0.33333333333333331"),
            ("alpha", "1"),
            ("customColorSpace", "genericGamma22GrayColorSpace"),
            ("colorSpace", "custom"),
        ]
        .into_iter()
        .collect();
        let encoding = ColorEncoding::from_attributes(&attributes);
        assert!(matches!(encoding, Some(ColorEncoding::White(_))), "gray level");
        assert_eq!(encoding.map(|e| e.to_rgb()), Some(0x555555), "gray level to RGB");

        let p3 = rgb(("customColorSpace", "displayP3"), "1", "0.5", "0");
        assert_eq!(
            ColorEncoding::from_attributes(p3.attributes()).map(|e| e.to_rgb()),
            Some(0xff7f00),
            "Display P3 components truncate"
        );

        let partial: Attributes = [("red", "1"), ("colorSpace", "calibratedRGB")]
            .into_iter()
            .collect();
        assert_eq!(ColorEncoding::from_attributes(&partial), None, "missing components");

        let catalog: Attributes = [("catalog", "System"), ("colorSpace", "catalog")]
            .into_iter()
            .collect();
        assert_eq!(ColorEncoding::from_attributes(&catalog), None, "catalog color");
    }

    #[test]
    fn test_single_precision() {
        // 0.6 * 255 is 152.99999999999997 in double precision
        assert_eq!(ColorEncoding::Rgb([0.6, 0.0, 0.0]).to_rgb(), 0x990000);
        assert_eq!(ColorEncoding::White(1.5).to_rgb(), 0xffffff, "clamped high");
        assert_eq!(ColorEncoding::White(-0.5).to_rgb(), 0x000000, "clamped low");
    }

    fn sample() -> Element {
        let srgb = ("customColorSpace", "sRGB");
        Element::new("document")
            .with_child(
                Element::new("objects")
                    .with_child(
                        Element::new("view")
                            .with_child(rgb(srgb, "1", "0", "0"))
                            .with_child(
                                Element::new("label").with_child(rgb(
                                    ("colorSpace", "calibratedRGB"),
                                    "0",
                                    "0.62745098039215685",
                                    "0",
                                )),
                            ),
                    )
                    .with_child(Element::new(COLOR_TAG).with_attribute("systemColor", "labelColor"))
                    .with_child(rgb(srgb, "0", "0", "0.94509803921568625")),
            )
            .with_child(
                Element::new(RESOURCES_TAG)
                    .with_child(Element::new(NAMED_COLOR_TAG).with_child(rgb(srgb, "1", "1", "1"))),
            )
    }

    #[test]
    fn test_extract_colors() {
        let colors = extract_colors(&sample());
        let pairs: Vec<_> = colors.iter().map(|c| (c.name(), c.rgb())).collect();
        assert_eq!(
            pairs,
            [("0", 0xff0000), ("1", 0x00a000), ("2", 0x0000f1)],
            "colors in document order without resources"
        );
    }

    struct Recorder(Vec<ColorEncoding>);

    impl Visitor for Recorder {
        type Error = ();

        fn visit_color(&mut self, _: &mut Element, encoding: ColorEncoding) -> Result<(), ()> {
            self.0.push(encoding);
            Ok(())
        }
    }

    #[test]
    fn test_same_order_as_walk() {
        let mut root = sample();
        let iterated: Vec<_> = color_definitions(&root).map(|(_, e)| e).collect();

        let mut recorder = Recorder(Vec::new());
        assert_eq!(walk(&mut root, &mut recorder), Ok(()), "walk succeeds");
        assert_eq!(iterated, recorder.0, "iterator and walk agree");
    }
}
