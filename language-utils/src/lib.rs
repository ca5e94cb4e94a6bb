pub mod text_cleanup;

use std::fmt;

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd,
)]
#[serde(transparent)]
pub struct LanguageId(pub String);

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd,
)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A language as stored alongside the user's words.
///
/// Users can add their own languages next to the built-in ones, so this is
/// plain data rather than a closed enum.
#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd,
)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    pub id: LanguageId,
    /// BCP 47 / ISO 639-1 style code, e.g. `fr` or `pt-BR`. Used as the
    /// speech synthesis locale.
    pub code: String,
    /// Display name, e.g. "French".
    pub name: String,
    #[serde(default)]
    pub is_system: bool,
}

impl LanguageDescriptor {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            id: LanguageId(code.to_string()),
            code: code.to_string(),
            name: name.to_string(),
            is_system: false,
        }
    }
}

impl fmt::Display for LanguageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
