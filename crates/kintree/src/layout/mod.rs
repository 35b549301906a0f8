//! The family-tree layout pipeline
//!
//! Works in four stages, each a pure function of the previous stage's output:
//!
//! 1. Rank assignment ([`rank`]): which generation each person belongs to,
//!    found by a breadth-first walk from the focus person.
//! 2. Vertex ordering ([`ordering`]): the left-to-right order within each
//!    generation, minimizing line crossings while keeping couples together.
//! 3. Coordinates ([`coords`]): concrete x positions from a greedy recursive
//!    top-left layout with a compaction pass.
//! 4. Lines ([`lines`]): the connector segments to draw between people.
//!
//! [`TreeLayout`] composes the stages; the stage functions themselves are
//! exported for unit-level verification only and are not a stable API.

pub mod coords;
pub(crate) mod graph;
pub mod lines;
pub mod ordering;
pub mod rank;

use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, span, Level};

use crate::core::{LayoutConfig, LayoutResult, Link, Point};

/// Ranks from top to bottom, each the left-to-right sequence of person ids.
pub type Order = Vec<Vec<String>>;

/// The layout pipeline, configured once and reusable across invocations.
///
/// Every call recomputes the full layout from the given links; nothing is
/// cached between calls, so independent invocations are safe to run
/// concurrently.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    config: LayoutConfig,
}

impl TreeLayout {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute positions and connector lines for the tree around `focus`.
    ///
    /// Every person referenced by `links` gets exactly one entry in the
    /// result's node map. Fails on an empty link list.
    pub fn layout(&self, focus: &str, links: &[Link]) -> Result<LayoutResult> {
        let layout_span = span!(
            Level::INFO,
            "layout",
            focus,
            link_count = links.len()
        );
        let _enter = layout_span.enter();

        let order = ordering::ordering(focus, links, self.config.seed)?;
        let xcoords = coords::xcoordinates(&order, links, self.config.couple_spacing());

        let unit = self.config.node_width + self.config.min_h_spacing;
        let mut nodes: HashMap<String, Point> = HashMap::new();
        for (rank, row) in order.iter().enumerate() {
            for id in row {
                nodes.insert(
                    id.clone(),
                    Point {
                        x: xcoords[id.as_str()] * unit + self.config.node_width / 2.0,
                        y: rank as f64 * self.config.rank_height
                            + self.config.rank_height / 2.0,
                    },
                );
            }
        }

        let lines = lines::get_lines(&order, links, &nodes, self.config.line_v_spacing);

        info!(
            node_count = nodes.len(),
            line_count = lines.len(),
            "layout completed"
        );
        Ok(LayoutResult { nodes, lines })
    }
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod testdata {
    //! Shared fixtures mirroring the scenarios the pipeline was built
    //! against; used by the rank and ordering unit tests.

    use super::Order;
    use crate::core::Link;

    pub fn rows(rows: &[&[&str]]) -> Order {
        rows.iter()
            .map(|row| row.iter().map(|id| id.to_string()).collect())
            .collect()
    }

    pub fn sorted_rows(order: &[Vec<String>]) -> Vec<Vec<String>> {
        order
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.sort();
                row
            })
            .collect()
    }

    pub struct Scenario {
        pub title: &'static str,
        pub order: Order,
        pub bfs_order: Option<Order>,
        pub median_order: Option<Order>,
        pub crossings: usize,
        pub links: Vec<Link>,
    }

    pub fn scenarios() -> Vec<Scenario> {
        vec![
            //   a
            //   |
            //   b
            Scenario {
                title: "1x1 no crossings",
                order: rows(&[&["a"], &["b"]]),
                bfs_order: None,
                median_order: None,
                crossings: 0,
                links: vec![Link::child("a", "b")],
            },
            //   a b
            //   | |
            //   c-d
            Scenario {
                title: "2x2 no crossings",
                order: rows(&[&["a", "b"], &["c", "d"]]),
                bfs_order: None,
                median_order: None,
                crossings: 0,
                links: vec![
                    Link::child("a", "c"),
                    Link::child("b", "d"),
                    Link::partner("c", "d"),
                ],
            },
            //    a   b
            //   /|   |\
            //  c d - e f
            Scenario {
                title: "2x4 no crossings",
                order: rows(&[&["a", "b"], &["c", "d", "e", "f"]]),
                bfs_order: None,
                median_order: None,
                crossings: 0,
                links: vec![
                    Link::child("a", "c"),
                    Link::child("a", "d"),
                    Link::child("b", "e"),
                    Link::child("b", "f"),
                    Link::partner("d", "e"),
                ],
            },
            //   a-b
            //    x
            //   c d
            Scenario {
                title: "2x2 with crossover",
                order: rows(&[&["a", "b"], &["c", "d"]]),
                bfs_order: Some(rows(&[&["a", "b"], &["d", "c"]])),
                median_order: Some(rows(&[&["a", "b"], &["d", "c"]])),
                crossings: 1,
                links: vec![
                    Link::child("a", "d"),
                    Link::child("b", "c"),
                    Link::partner("a", "b"),
                ],
            },
            //   a  b
            //    \ |\
            //     \| \
            //      X  |
            //     /|  |
            //    c d--e
            Scenario {
                title: "double crossover",
                order: rows(&[&["a", "b"], &["c", "d", "e"]]),
                bfs_order: Some(rows(&[&["a", "b"], &["e", "c", "d"]])),
                // The median order takes the d-e partner relation into account.
                median_order: Some(rows(&[&["a", "b"], &["c", "d", "e"]])),
                crossings: 2,
                links: vec![
                    Link::child("a", "e"),
                    Link::child("b", "c"),
                    Link::child("b", "d"),
                    Link::partner("d", "e"),
                ],
            },
            //   a b c
            //    \| |
            //     + |
            //   d-e |
            //    \_/
            Scenario {
                title: "shared child crossover",
                order: rows(&[&["a", "b", "c"], &["d", "e"]]),
                bfs_order: Some(rows(&[&["a", "b", "c"], &["e", "d"]])),
                median_order: Some(rows(&[&["a", "b", "c"], &["d", "e"]])),
                crossings: 2,
                links: vec![
                    Link::child("a", "e"),
                    Link::child("b", "e"),
                    Link::child("c", "d"),
                    Link::partner("d", "e"),
                ],
            },
        ]
    }
}
