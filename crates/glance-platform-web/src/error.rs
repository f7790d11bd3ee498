use core::fmt;

/// Error type produced by the web adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// No `window` or `document` (e.g. running outside of a browser).
    DomUnavailable,
    /// Wrapper around JavaScript exceptions.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(WebError::DomUnavailable.to_string(), "DOM is not available");
        assert_eq!(
            WebError::Js("boom".into()).to_string(),
            "JavaScript error: boom"
        );
    }
}
