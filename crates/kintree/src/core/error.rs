//! Error types for the layout pipeline

use thiserror::Error;

/// Errors surfaced by the layout pipeline
///
/// The pipeline either returns a complete layout or fails outright; there is
/// no partial result. Rank conflicts on contradictory input graphs are not
/// errors: they are reported through the diagnostic log and resolved by
/// keeping the first assignment.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("no links supplied; cannot lay out a tree around '{focus}'")]
    EmptyGraph { focus: String },

    #[error("unknown link type '{value}' (expected 'partner' or 'child')")]
    UnknownLinkType { value: String },
}

impl LayoutError {
    /// Create an empty-graph error for the given focus person
    pub fn empty_graph(focus: impl Into<String>) -> Self {
        Self::EmptyGraph {
            focus: focus.into(),
        }
    }

    /// Create an unknown-link-type error
    pub fn unknown_link_type(value: impl Into<String>) -> Self {
        Self::UnknownLinkType {
            value: value.into(),
        }
    }
}
