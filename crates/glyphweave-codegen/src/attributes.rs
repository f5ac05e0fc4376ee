//! JSX attribute formatting
//!
//! Serializes descriptor attribute maps into `key="value"` pairs. React
//! expects camel-cased prop names, except for the `data-*` and `aria-*`
//! namespaces which it passes through to the DOM verbatim.

use std::borrow::Cow;

use glyphweave_core::Attributes;
use heck::ToLowerCamelCase;

/// Key prefixes emitted without renaming
pub const PROTECTED_PREFIXES: [&str; 2] = ["data", "aria"];

/// Helper for generating JSX attribute lists
pub struct AttributeCodegen;

impl AttributeCodegen {
    /// Format an attribute map as a space-joined `key="value"` list
    ///
    /// Input order is preserved and an empty map yields an empty string.
    pub fn format(attrs: &Attributes) -> String {
        let mut code = String::new();

        for (index, (key, value)) in attrs.iter().enumerate() {
            if index > 0 {
                code.push(' ');
            }
            code.push_str(&format!("{}=\"{}\"", Self::prop_name(key), value));
        }

        code
    }

    /// JSX prop name for a descriptor attribute key
    pub fn prop_name(key: &str) -> Cow<'_, str> {
        if Self::should_transform(key) {
            Cow::Owned(key.to_lower_camel_case())
        } else {
            Cow::Borrowed(key)
        }
    }

    fn should_transform(key: &str) -> bool {
        PROTECTED_PREFIXES
            .iter()
            .all(|prefix| !key.starts_with(prefix))
    }
}
