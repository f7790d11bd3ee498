//! Image resource identifiers.

use std::fmt;
use std::rc::Rc;

/// Built-in placeholder: a 1x1 transparent GIF.
pub const DEFAULT_PLACEHOLDER: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

/// Identifier of an image resource (URL, path or data URI). Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageSource(Rc<str>);

impl ImageSource {
    pub fn new(source: impl AsRef<str>) -> Self {
        Self(Rc::from(source.as_ref()))
    }

    pub fn default_placeholder() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }

    /// Decorative inline SVG: a solid `fill` rectangle with the given intrinsic size.
    ///
    /// Reserving the final aspect ratio avoids layout shift when the target loads.
    pub fn vector_placeholder(width: u32, height: u32, fill: &str) -> Self {
        let fill = escape_xml_attribute(fill);
        let svg = format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' \
             viewBox='0 0 {width} {height}'><rect width='100%' height='100%' fill='{fill}'/></svg>"
        );
        Self::new(format!("data:image/svg+xml,{}", encode_svg(&svg)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }
}

fn escape_xml_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn encode_svg(svg: &str) -> String {
    let mut encoded = String::with_capacity(svg.len() + 32);
    for ch in svg.chars() {
        match ch {
            '<' => encoded.push_str("%3C"),
            '>' => encoded.push_str("%3E"),
            '#' => encoded.push_str("%23"),
            '%' => encoded.push_str("%25"),
            '"' => encoded.push_str("%22"),
            ' ' => encoded.push_str("%20"),
            other => encoded.push(other),
        }
    }
    encoded
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::default_placeholder()
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl AsRef<str> for ImageSource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ImageSource {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ImageSource {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageSource").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_placeholder_is_transparent_gif() {
        assert_eq!(ImageSource::default(), DEFAULT_PLACEHOLDER);
        assert!(ImageSource::default().is_data_uri());
    }

    #[test]
    fn vector_placeholder_is_escaped_svg() {
        let source = ImageSource::vector_placeholder(16, 9, "#e5e7eb");
        let uri = source.as_str();
        assert!(uri.starts_with("data:image/svg+xml,%3Csvg"));
        assert!(uri.contains("viewBox='0%200%2016%209'"));
        assert!(uri.contains("fill='%23e5e7eb'"));
        assert!(!uri.contains('<') && !uri.contains('#'));
    }

    #[test]
    fn vector_placeholder_fill_cannot_close_the_attribute() {
        let source = ImageSource::vector_placeholder(4, 4, "red' onload='x");
        let uri = source.as_str();
        assert!(uri.contains("fill='red&apos;%20onload=&apos;x'/%3E"));
        assert!(!uri.contains("fill='red'"));
    }
}
