//! # gedtree
//!
//! Turns a genealogical record graph into genealogytree markup: an
//! ancestor, descendant or sandclock tree around one proband, ready to be
//! typeset with LaTeX.

pub mod error;
pub mod options;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use error::{GedtreeError, Result};
pub use options::{MarriagePlacement, TreeOptions};
pub use parser::{load_genealogy, GedcomParser, Genealogy, RecordGraph};
pub use renderer::{render_tree, TreeRenderer};
