use std::fmt;

use tracing::debug;

use crate::options::TreeOptions;
use crate::renderer::components::IndentationHelper;

/// Prefix on every traversal diagnostic line.
pub const TRACE_MARKER: &str = "%%";

/// Configuration context for rendering operations
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub depth: usize,
    pub options: &'a TreeOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a TreeOptions) -> Self {
        Self { depth: 0, options }
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            options: self.options,
        }
    }

    pub fn deeper(&self) -> Self {
        self.with_depth(self.depth + 1)
    }

    /// One tab per nesting level.
    pub fn indent(&self) -> String {
        IndentationHelper::indent_for_depth(self.depth)
    }

    /// Debug line on the diagnostic stream, indented like the tree.
    pub fn trace(&self, message: impl fmt::Display) {
        if !self.options.debug {
            return;
        }
        debug!("{}{} {}", TRACE_MARKER, self.indent(), message);
    }
}

/// Container node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Parent,
    Child,
    Union,
    Sandclock,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Parent => "parent",
            NodeKind::Child => "child",
            NodeKind::Union => "union",
            NodeKind::Sandclock => "sandclock",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-letter individual block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonKind {
    /// `g`: the individual a container is built around.
    Proband,
    Parent,
    Child,
}

impl PersonKind {
    pub fn label(&self) -> &'static str {
        match self {
            PersonKind::Proband => "g",
            PersonKind::Parent => "p",
            PersonKind::Child => "c",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an individual appears in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// On the line of descent or ascent being walked.
    Principal,
    /// Partner attached through a union.
    Spouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ancestors,
    Descendants,
}

impl Direction {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Direction::Ancestors => NodeKind::Parent,
            Direction::Descendants => NodeKind::Child,
        }
    }

    /// Kind of a person reached on the last generation.
    pub fn leaf(&self) -> PersonKind {
        match self {
            Direction::Ancestors => PersonKind::Parent,
            Direction::Descendants => PersonKind::Child,
        }
    }
}

/// Note attached to a birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthNote {
    OutOfWedlock,
    Stillborn,
}

impl fmt::Display for BirthNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthNote::OutOfWedlock => f.write_str("out of wedlock"),
            BirthNote::Stillborn => f.write_str("stillborn"),
        }
    }
}
