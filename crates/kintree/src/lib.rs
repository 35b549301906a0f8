//! Kintree - Layered layout for family trees
//!
//! Works out a layout for a family tree that is as readable and as
//! aesthetically pleasing as possible:
//! - parents centered over their children
//! - as compact as possible
//! - as few crossing lines as possible
//! - people kept next to their partners
//!
//! The input is a list of typed links (`partner` and `child`) between opaque
//! person ids plus a focus person; the output is a position for every person
//! and the connector lines to draw. Rendering, panning and data management
//! are the caller's business.
//!
//! # Quick Start
//!
//! ```rust
//! use kintree::{layout, Link};
//!
//! let links = vec![
//!     Link::partner("marge", "homer"),
//!     Link::child("marge", "bart"),
//!     Link::child("homer", "bart"),
//! ];
//! let result = layout("bart", &links).unwrap();
//! assert_eq!(result.nodes.len(), 3);
//! assert!(!result.lines.is_empty());
//! ```
//!
//! # Custom layout parameters
//!
//! All spacing values are opaque rendering units owned by the presentation
//! layer:
//!
//! ```rust
//! use kintree::{LayoutConfig, Link, TreeLayout};
//!
//! let links = vec![Link::child("a", "b")];
//! let engine = TreeLayout::with_config(LayoutConfig {
//!     node_width: 40.0,
//!     rank_height: 60.0,
//!     ..LayoutConfig::default()
//! });
//! let result = engine.layout("a", &links).unwrap();
//! assert!(result.nodes["b"].y > result.nodes["a"].y);
//! ```

pub mod core;
pub mod layout;

pub use crate::core::{
    LayoutConfig, LayoutError, LayoutResult, LineSegment, Link, LinkKind, Point,
};
pub use crate::layout::TreeLayout;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        LayoutConfig, LayoutError, LayoutResult, LineSegment, Link, LinkKind, Point,
    };
    pub use crate::layout::TreeLayout;
}

/// Compute a family-tree layout with the default parameters
///
/// This is the simplest entry point; use [`TreeLayout::with_config`] to
/// control spacing, rank height and the shuffle seed.
///
/// # Arguments
/// * `focus` - The person the tree is laid out around; must be referenced by
///   at least one link
/// * `links` - The relationship graph; must be non-empty
///
/// # Returns
/// * `Ok(LayoutResult)` - Positions for every referenced person plus the
///   connector lines
/// * `Err` - If the link list is empty
pub fn layout(focus: &str, links: &[Link]) -> anyhow::Result<LayoutResult> {
    TreeLayout::new().layout(focus, links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_simple_family() {
        let links = vec![
            Link::partner("dad", "mum"),
            Link::child("dad", "kid"),
            Link::child("mum", "kid"),
        ];
        let result = layout("kid", &links).unwrap();

        assert_eq!(result.nodes.len(), 3);
        assert!(result.nodes["kid"].y > result.nodes["dad"].y);
        assert_eq!(result.nodes["dad"].y, result.nodes["mum"].y);
        assert!(result.lines.iter().any(|l| l.kind == LinkKind::Partner));
        assert!(result.lines.iter().any(|l| l.kind == LinkKind::Child));
    }

    #[test]
    fn test_layout_empty_links_fails() {
        assert!(layout("nobody", &[]).is_err());
    }

    #[test]
    fn test_layout_scales_with_config() {
        let links = vec![Link::child("a", "b")];
        let tall = TreeLayout::with_config(LayoutConfig {
            rank_height: 200.0,
            ..LayoutConfig::default()
        });
        let result = tall.layout("a", &links).unwrap();
        assert_eq!(result.nodes["a"].y, 100.0);
        assert_eq!(result.nodes["b"].y, 300.0);
    }
}
