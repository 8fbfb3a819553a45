//! Speaker names and the frozen role set.

use serde::{Deserialize, Serialize};

/// A normalized speaker name.
///
/// Normalization trims the raw label, strips markup and punctuation from both
/// ends (`**Mina**`, `[Mina]`, `Mina.`) and collapses inner whitespace.
///
/// # Examples
///
/// ```
/// use troupe_core::RoleName;
///
/// assert_eq!(RoleName::new("  **Old   Kim** ").as_str(), "Old Kim");
/// assert_eq!(RoleName::new("(Mina)"), RoleName::new("Mina"));
/// assert_eq!(format!("{}", RoleName::new("Mina")), "Mina");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Normalize a raw speaker label.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
        Self(crate::collapse_whitespace(trimmed))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if normalization left nothing behind.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RoleName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The closed set of legitimate speakers, in order of first appearance.
///
/// Built once from the original script and never extended afterwards.
///
/// # Examples
///
/// ```
/// use troupe_core::{RoleName, RoleSet};
///
/// let roles: RoleSet = ["Mina", "Joon", "Mina"].into_iter().map(RoleName::new).collect();
/// assert_eq!(roles.len(), 2);
/// assert!(roles.contains(&RoleName::new("Joon")));
/// assert!(!roles.contains(&RoleName::new("Ghost")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    roles: Vec<RoleName>,
}

impl RoleSet {
    /// Create an empty role set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role if it is not present yet. Returns true if it was added.
    pub(crate) fn insert(&mut self, role: RoleName) -> bool {
        if role.is_empty() || self.contains(&role) {
            return false;
        }
        self.roles.push(role);
        true
    }

    /// Membership test.
    pub fn contains(&self, role: &RoleName) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Position of a role in first-appearance order.
    pub fn position(&self, role: &RoleName) -> Option<usize> {
        self.roles.iter().position(|r| r == role)
    }

    /// Roles in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter()
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True if the script had no attributed dialogue.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Comma-separated names, for prompts and logs.
    pub fn joined(&self) -> String {
        self.roles
            .iter()
            .map(RoleName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<RoleName> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleName>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a RoleName;
    type IntoIter = std::slice::Iter<'a, RoleName>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}
