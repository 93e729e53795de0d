//! Filter to leave specific items out of the results.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use std::collections::HashSet;

/// Removes candidates by name, e.g. the item the diner is already looking at.
pub struct ExcludeItemsFilter {
    names: HashSet<String>,
}

impl ExcludeItemsFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for ExcludeItemsFilter {
    fn name(&self) -> &str {
        "ExcludeItemsFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &UserContext) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !self.names.contains(&candidate.item.name))
            .collect())
    }
}
