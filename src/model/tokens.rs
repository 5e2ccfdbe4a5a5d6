/// Design token data model
///
/// Tokens are the named, reusable design values declared by the design file.
/// Any of the three groups may be missing entirely.

use serde::{Deserialize, Serialize};

/// One named design value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenRecord {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// The token set supplied alongside the component tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignTokenSet {
    pub colors: Vec<TokenRecord>,
    pub typography: Vec<TokenRecord>,
    pub spacing: Vec<TokenRecord>,
}

impl DesignTokenSet {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.typography.is_empty() && self.spacing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.colors.len() + self.typography.len() + self.spacing.len()
    }

    /// All token names across the three groups, for convention matching
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.colors
            .iter()
            .chain(&self.typography)
            .chain(&self.spacing)
            .map(|t| t.name.as_str())
    }
}
