//! Display metadata for the two membership classes.
//!
//! Thin glue for external display: a name and a resource locator per class.
//! Owner-gating of mutations is applied by the issuer, which holds the
//! authority.

use std::collections::HashMap;

use lodge_types::TokenClass;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for one class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub name: String,
    pub uri: String,
}

/// Maps each class to its display metadata. Both classes are always present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataRegistry {
    entries: HashMap<TokenClass, ClassMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            TokenClass::Standard,
            ClassMetadata {
                name: "Standard Membership".to_string(),
                uri: String::new(),
            },
        );
        entries.insert(
            TokenClass::Genesis,
            ClassMetadata {
                name: "Genesis Membership".to_string(),
                uri: String::new(),
            },
        );
        Self { entries }
    }

    pub fn metadata(&self, class: TokenClass) -> &ClassMetadata {
        // Both classes are inserted at construction and never removed.
        &self.entries[&class]
    }

    pub fn uri(&self, class: TokenClass) -> &str {
        &self.metadata(class).uri
    }

    pub fn set_uri(&mut self, class: TokenClass, uri: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(&class) {
            entry.uri = uri.into();
        }
    }

    pub fn set_name(&mut self, class: TokenClass, name: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(&class) {
            entry.name = name.into();
        }
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}
