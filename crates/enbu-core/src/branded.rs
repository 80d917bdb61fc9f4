//! Newtype wrappers that keep selector/url/path/key/script strings from being
//! swapped for one another at any internal API boundary. Construction always
//! goes through a validator; the only other way to get an instance is
//! `substituted`, used exclusively by the env expander after `${VAR}`
//! replacement (the expanded result is not re-validated; see DESIGN.md).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{kind}: {raw:?}")]
pub struct BrandError {
    pub kind: BrandErrorKind,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BrandErrorKind {
    #[error("css selector must be non-empty and start with one of a-z A-Z # . [ : *")]
    InvalidCss,
    #[error("xpath selector must be non-empty and start with '/'")]
    InvalidXpath,
    #[error("value must be non-empty")]
    Empty,
}

macro_rules! branded_string {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// Rebuilds the value from an already-expanded string without
            /// re-running the constructor's validator.
            pub fn substituted(raw: String) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

branded_string!(CssSelector, "A validated CSS selector string.");
branded_string!(XpathSelector, "A validated XPath selector string (must start with `/`).");
branded_string!(
    InteractableText,
    "A text match against an element of interactive role (button, link, textbox)."
);
branded_string!(
    ElementRef,
    "An opaque `@eN` handle returned from a prior `snapshot` step."
);
branded_string!(Url, "A non-empty URL string passed to the driver's `open` verb.");
branded_string!(FilePath, "A non-empty file path string, e.g. an upload source or screenshot destination.");
branded_string!(KeyboardKey, "A non-empty keyboard key name, e.g. `Enter` or `Tab`.");
branded_string!(JsExpression, "A non-empty JavaScript expression passed to the driver's `eval` verb.");

impl CssSelector {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        let raw = raw.into();
        let starts_ok = raw
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || matches!(c, '#' | '.' | '[' | ':' | '*'))
            .unwrap_or(false);
        if raw.is_empty() || !starts_ok {
            return Err(BrandError {
                kind: BrandErrorKind::InvalidCss,
                raw,
            });
        }
        Ok(Self(raw))
    }
}

impl XpathSelector {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.starts_with('/') {
            return Err(BrandError {
                kind: BrandErrorKind::InvalidXpath,
                raw,
            });
        }
        Ok(Self(raw))
    }
}

/// Constructs a non-empty branded value, the shared rule for every kind
/// except css/xpath (which have their own syntactic checks above).
fn require_non_empty(raw: String) -> Result<String, BrandError> {
    if raw.trim().is_empty() {
        return Err(BrandError {
            kind: BrandErrorKind::Empty,
            raw,
        });
    }
    Ok(raw)
}

impl InteractableText {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

impl ElementRef {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

impl Url {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

impl FilePath {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

impl KeyboardKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

impl JsExpression {
    pub fn new(raw: impl Into<String>) -> Result<Self, BrandError> {
        require_non_empty(raw.into()).map(Self)
    }
}

/// Tagged selector kind attached to most commands (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Css(CssSelector),
    Xpath(XpathSelector),
    InteractableText(InteractableText),
    Ref(ElementRef),
}

impl Selector {
    /// True for selector kinds the auto-wait engine polls before dispatch
    /// (§4.5): interactive text matches and refs, not css/xpath.
    pub fn requires_auto_wait(&self) -> bool {
        matches!(self, Selector::InteractableText(_) | Selector::Ref(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selector::Css(v) => v.as_str(),
            Selector::Xpath(v) => v.as_str(),
            Selector::InteractableText(v) => v.as_str(),
            Selector::Ref(v) => v.as_str(),
        }
    }

    pub fn kind_tag(&self) -> &'static str {
        match self {
            Selector::Css(_) => "css",
            Selector::Xpath(_) => "xpath",
            Selector::InteractableText(_) => "text",
            Selector::Ref(_) => "ref",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_css_selector_accepts_recognized_prefixes() {
        for raw in ["#id", ".class", "button", "[data-x]", ":root", "*"] {
            assert!(CssSelector::new(raw).is_ok(), "expected {raw} to be valid css");
        }
    }

    #[test]
    fn unit_css_selector_rejects_empty_and_unrecognized_prefix() {
        assert!(CssSelector::new("").is_err());
        let err = CssSelector::new("1foo").unwrap_err();
        assert_eq!(err.kind, BrandErrorKind::InvalidCss);
        assert_eq!(err.raw, "1foo");
    }

    #[test]
    fn unit_xpath_selector_requires_leading_slash() {
        assert!(XpathSelector::new("/html/body").is_ok());
        assert!(XpathSelector::new("html/body").is_err());
        assert!(XpathSelector::new("").is_err());
    }

    #[test]
    fn unit_non_empty_branded_values_reject_blank_strings() {
        assert!(Url::new("").is_err());
        assert!(Url::new("   ").is_err());
        assert!(Url::new("https://example.com").is_ok());
    }

    #[test]
    fn regression_substituted_bypasses_validation_for_expanded_templates() {
        // Pre-expansion "${BASE}" passed the non-empty check; post-expansion
        // with an empty BASE it would no longer pass `Url::new`, but the env
        // expander must not re-reject it (§4.4, open question (a)).
        let url = Url::substituted(String::new());
        assert_eq!(url.as_str(), "");
    }

    #[test]
    fn functional_selector_requires_auto_wait_matches_spec_kinds() {
        let css = Selector::Css(CssSelector::new("#x").unwrap());
        let text = Selector::InteractableText(InteractableText::new("Login").unwrap());
        let reference = Selector::Ref(ElementRef::new("@e1").unwrap());
        let xpath = Selector::Xpath(XpathSelector::new("/a").unwrap());

        assert!(!css.requires_auto_wait());
        assert!(!xpath.requires_auto_wait());
        assert!(text.requires_auto_wait());
        assert!(reference.requires_auto_wait());
    }
}
