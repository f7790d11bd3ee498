//! Display attributes forwarded to the rendered image element.
//!
//! The widget never interprets these. They are typed so only attributes the
//! image primitive accepts can be expressed; `srcset` is deliberately absent
//! because it would start a load before the element becomes visible.

use indexmap::IndexMap;
use std::borrow::Cow;

/// Image decoding hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decoding {
    Sync,
    Async,
    Auto,
}

impl Decoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Decoding::Sync => "sync",
            Decoding::Async => "async",
            Decoding::Auto => "auto",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossOrigin {
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            CrossOrigin::Anonymous => "anonymous",
            CrossOrigin::UseCredentials => "use-credentials",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferrerPolicy {
    NoReferrer,
    NoReferrerWhenDowngrade,
    Origin,
    OriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            ReferrerPolicy::Origin => "origin",
            ReferrerPolicy::OriginWhenCrossOrigin => "origin-when-cross-origin",
            ReferrerPolicy::SameOrigin => "same-origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            ReferrerPolicy::UnsafeUrl => "unsafe-url",
        }
    }
}

/// Pass-through attributes of the rendered image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageAttributes {
    /// Accessible text. Always rendered, empty by default.
    pub alt: String,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub class: Option<String>,
    pub id: Option<String>,
    pub sizes: Option<String>,
    pub decoding: Option<Decoding>,
    pub cross_origin: Option<CrossOrigin>,
    pub referrer_policy: Option<ReferrerPolicy>,
    data: IndexMap<String, String>,
}

impl ImageAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    pub fn decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = Some(decoding);
        self
    }

    pub fn cross_origin(mut self, cross_origin: CrossOrigin) -> Self {
        self.cross_origin = Some(cross_origin);
        self
    }

    pub fn referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.referrer_policy = Some(policy);
        self
    }

    /// Adds a `data-*` attribute. The `data-` prefix is optional in `name`.
    ///
    /// Names that are not valid custom data attribute names are dropped with a
    /// warning.
    pub fn data(mut self, name: &str, value: impl Into<String>) -> Self {
        let suffix = name.strip_prefix("data-").unwrap_or(name);
        if !is_valid_data_suffix(suffix) {
            log::warn!("ignoring invalid data attribute name {name:?}");
            return self;
        }
        self.data.insert(format!("data-{suffix}"), value.into());
        self
    }

    pub fn data_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// All attributes as `(name, value)` pairs in a stable order, `alt` first.
    pub fn pairs(&self) -> Vec<(Cow<'static, str>, Cow<'_, str>)> {
        let mut pairs: Vec<(Cow<'static, str>, Cow<'_, str>)> =
            Vec::with_capacity(10 + self.data.len());
        pairs.push((Cow::Borrowed("alt"), Cow::Borrowed(self.alt.as_str())));
        let optional: [(&'static str, Option<Cow<'_, str>>); 9] = [
            ("title", self.title.as_deref().map(Cow::Borrowed)),
            ("width", self.width.map(|width| Cow::Owned(width.to_string()))),
            ("height", self.height.map(|height| Cow::Owned(height.to_string()))),
            ("class", self.class.as_deref().map(Cow::Borrowed)),
            ("id", self.id.as_deref().map(Cow::Borrowed)),
            ("sizes", self.sizes.as_deref().map(Cow::Borrowed)),
            ("decoding", self.decoding.map(|d| Cow::Borrowed(d.as_str()))),
            (
                "crossorigin",
                self.cross_origin.map(|c| Cow::Borrowed(c.as_str())),
            ),
            (
                "referrerpolicy",
                self.referrer_policy.map(|p| Cow::Borrowed(p.as_str())),
            ),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                pairs.push((Cow::Borrowed(name), value));
            }
        }
        for (name, value) in &self.data {
            pairs.push((Cow::Owned(name.clone()), Cow::Borrowed(value.as_str())));
        }
        pairs
    }
}

fn is_valid_data_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(attributes: &ImageAttributes) -> Vec<String> {
        attributes
            .pairs()
            .into_iter()
            .map(|(name, _)| name.into_owned())
            .collect()
    }

    #[test]
    fn alt_is_always_present() {
        let attributes = ImageAttributes::new();
        let pairs = attributes.pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "alt");
        assert_eq!(pairs[0].1, "");
    }

    #[test]
    fn pairs_follow_declaration_order() {
        let attributes = ImageAttributes::new()
            .alt("cat")
            .data("row", "3")
            .size(320, 240)
            .decoding(Decoding::Async)
            .referrer_policy(ReferrerPolicy::NoReferrer);
        assert_eq!(
            names(&attributes),
            ["alt", "width", "height", "decoding", "referrerpolicy", "data-row"]
        );
    }

    #[test]
    fn data_names_are_normalised_and_validated() {
        let attributes = ImageAttributes::new()
            .data("data-gallery", "a")
            .data("index", "1")
            .data("Bad Name", "x")
            .data("", "y");
        let data: Vec<_> = attributes.data_attributes().collect();
        assert_eq!(data, [("data-gallery", "a"), ("data-index", "1")]);
    }
}
