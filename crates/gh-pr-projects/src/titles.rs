//! Desired project titles

use crate::error::AssignError;
use std::collections::HashSet;

/// The set of project titles a pull request should be assigned to
///
/// Keeps the caller's order for logging; membership is what matters.
/// Duplicates are rejected on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredTitles {
    titles: Vec<String>,
}

impl DesiredTitles {
    /// Parse a whitespace-separated list of titles
    ///
    /// Leading, trailing and repeated whitespace is ignored, so an empty or
    /// blank input yields an empty set.
    pub fn parse(input: &str) -> Result<Self, AssignError> {
        Self::from_titles(input.split_whitespace())
    }

    /// Build the set from individual titles
    pub fn from_titles<I, S>(titles: I) -> Result<Self, AssignError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();

        for title in titles {
            let title = title.into();
            if !seen.insert(title.clone()) {
                return Err(AssignError::DuplicateTitle(title));
            }
            collected.push(title);
        }

        Ok(Self { titles: collected })
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}
