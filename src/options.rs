use std::collections::HashSet;

use clap::ValueEnum;

use crate::error::{GedtreeError, Result};
use crate::parser::normalize_xref;

/// Where a couple's marriage is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MarriagePlacement {
    /// In the options of the family container.
    #[default]
    Family,
    /// In the block of the person the tree is walking through.
    Proband,
    /// In the block of the partner joined through a union.
    Spouse,
}

/// Everything a single tree rendering needs to know besides the graph.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub root: String,
    pub ancestors: u32,
    pub descendants: u32,
    pub marriage: MarriagePlacement,
    pub ignore: HashSet<String>,
    pub floruit: bool,
    pub debug: bool,
}

impl TreeOptions {
    pub fn new(root: &str) -> Self {
        Self {
            root: normalize_xref(root),
            ancestors: 0,
            descendants: 0,
            marriage: MarriagePlacement::default(),
            ignore: HashSet::new(),
            floruit: false,
            debug: false,
        }
    }

    pub fn with_ancestors(mut self, generations: u32) -> Self {
        self.ancestors = generations;
        self
    }

    pub fn with_descendants(mut self, generations: u32) -> Self {
        self.descendants = generations;
        self
    }

    pub fn with_marriage(mut self, placement: MarriagePlacement) -> Self {
        self.marriage = placement;
        self
    }

    pub fn with_floruit(mut self, floruit: bool) -> Self {
        self.floruit = floruit;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn ignoring<I, S>(mut self, xrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore
            .extend(xrefs.into_iter().map(|x| normalize_xref(x.as_ref())));
        self
    }

    pub fn is_ignored(&self, xref: &str) -> bool {
        self.ignore.contains(xref.trim_matches('@'))
    }

    /// A tree needs at least one generation in some direction.
    pub fn validate(&self) -> Result<()> {
        if self.ancestors == 0 && self.descendants == 0 {
            return Err(GedtreeError::NoGenerations);
        }
        Ok(())
    }
}
