use std::io::{self, Write};

use super::Element;

/// A destination for documents.
///
/// A document sink persists a document tree, e.g., by serializing it to a
/// file. Storing may fail, in which case the sink reports an I/O error.
pub trait DocumentSink {
    /// Store the document with the given root element.
    fn store(&mut self, root: &Element) -> io::Result<()>;
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn store(&mut self, root: &Element) -> io::Result<()> {
        (**self).store(root)
    }
}

/// A writer of documents as XML text.
///
/// The writer emits an XML declaration, followed by the elements indented by
/// four spaces per level. It preserves attribute order, escapes attribute
/// values, and closes elements without children right away.
///
/// ```
/// # use colormatch::document::{DocumentSink, Element, XmlWriter};
/// # fn main() -> std::io::Result<()> {
/// let root = Element::new("resources").with_child(
///     Element::new("namedColor").with_attribute("name", "Salt & Pepper"),
/// );
///
/// let mut writer = XmlWriter::new(Vec::new());
/// writer.store(&root)?;
/// assert_eq!(
///     String::from_utf8_lossy(&writer.into_inner()),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <resources>\n    \
///          <namedColor name=\"Salt &amp; Pepper\"/>\n\
///      </resources>\n"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    writer: W,
}

impl<W: Write> XmlWriter<W> {
    /// Create a new XML writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume this XML writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_element(&mut self, element: &Element, depth: usize) -> io::Result<()> {
        let indent = depth * 4;
        write!(self.writer, "{:indent$}<{}", "", element.tag())?;
        for (name, value) in element.attributes().iter() {
            write!(self.writer, " {}=\"", name)?;
            self.write_escaped(value)?;
            self.writer.write_all(b"\"")?;
        }

        if element.children().is_empty() {
            return self.writer.write_all(b"/>\n");
        }

        self.writer.write_all(b">\n")?;
        for child in element.children() {
            self.write_element(child, depth + 1)?;
        }
        writeln!(self.writer, "{:indent$}</{}>", "", element.tag())
    }

    fn write_escaped(&mut self, text: &str) -> io::Result<()> {
        let mut start = 0;
        for (index, c) in text.char_indices() {
            let replacement = match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&apos;",
                '\n' => "&#10;",
                '\r' => "&#13;",
                '\t' => "&#9;",
                _ => continue,
            };

            self.writer.write_all(text[start..index].as_bytes())?;
            self.writer.write_all(replacement.as_bytes())?;
            start = index + c.len_utf8();
        }

        self.writer.write_all(text[start..].as_bytes())
    }
}

impl<W: Write> DocumentSink for XmlWriter<W> {
    fn store(&mut self, root: &Element) -> io::Result<()> {
        self.writer
            .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
        self.write_element(root, 0)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nested() -> io::Result<()> {
        let root = Element::new("document")
            .with_attribute("type", "com.apple.InterfaceBuilder3.CocoaTouch.XIB")
            .with_attribute("version", "3.0")
            .with_child(
                Element::new("objects").with_child(
                    Element::new("color")
                        .with_attribute("key", "textColor")
                        .with_attribute("name", "<Spec>"),
                ),
            );

        let mut writer = XmlWriter::new(Vec::new());
        writer.store(&root)?;
        let text = String::from_utf8_lossy(&writer.into_inner()).into_owned();

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<document type=\"com.apple.InterfaceBuilder3.CocoaTouch.XIB\" version=\"3.0\">\n",
            "    <objects>\n",
            "        <color key=\"textColor\" name=\"&lt;Spec&gt;\"/>\n",
            "    </objects>\n",
            "</document>\n",
        );
        assert_eq!(text, expected, "XML text");
        Ok(())
    }

    #[test]
    fn test_escaping() -> io::Result<()> {
        let mut writer = XmlWriter::new(Vec::new());
        writer.write_escaped("Ünïcödé 'quoted' \"twice\" & more")?;
        assert_eq!(
            String::from_utf8_lossy(&writer.into_inner()),
            "Ünïcödé &apos;quoted&apos; &quot;twice&quot; &amp; more",
            "escaped text"
        );
        Ok(())
    }

    #[test]
    fn test_escaping_whitespace() -> io::Result<()> {
        let root = Element::new("string").with_attribute("value", "line 1\r\nline 2\tend");

        let mut writer = XmlWriter::new(Vec::new());
        writer.store(&root)?;
        let text = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        assert!(
            text.contains("value=\"line 1&#13;&#10;line 2&#9;end\""),
            "line breaks and tabs survive normalization: {}",
            text
        );
        Ok(())
    }
}
