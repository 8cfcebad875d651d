#![forbid(unsafe_code)]

//! The option record shown in a dropdown.

use std::fmt;
use std::hash::{Hash, Hasher};

/// One selectable entry.
///
/// Two options are the same option when their `value`s match; the label is
/// presentation only.
#[derive(Debug, Clone)]
pub struct SelectOption {
    label: String,
    value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Identity key.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PartialEq for SelectOption {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SelectOption {}

impl Hash for SelectOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
