use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Compact letter display supplied by the caller: groups sharing a letter are
/// not distinguishable from each other.
///
/// Letters typically come from a multi-group test run outside this tool
/// (e.g. a one-way ANOVA with post-hoc comparisons), so they are taken as
/// given and never derived from the p-value computed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignificanceLetters(BTreeMap<String, String>);

impl SignificanceLetters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, group: &str, letter: &str) -> Self {
        self.0.insert(group.to_string(), letter.to_string());
        self
    }

    pub fn letter_for(&self, group: &str) -> Result<&str, RenderError> {
        self.0
            .get(group)
            .map(String::as_str)
            .ok_or_else(|| RenderError::MissingLetter(group.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignificanceLetters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SignificanceLetters(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
