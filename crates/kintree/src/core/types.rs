//! Data model for the family-tree layout
//!
//! Links are the only input to the pipeline; points and line segments are its
//! only output. Everything in between (rank tables, orders, coordinate maps)
//! is rebuilt from scratch on every invocation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LayoutError;

/// Relationship type carried by a [`Link`] and echoed on [`LineSegment`]s
///
/// The set of relationship types is closed: anything other than `partner` or
/// `child` in serialized input is rejected during deserialization, which is
/// the unrecoverable input error of the layout contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A couple; the origin is conventionally placed left of the target
    Partner,
    /// Parent to child; the origin is the parent
    Child,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Partner => write!(f, "partner"),
            LinkKind::Child => write!(f, "child"),
        }
    }
}

impl FromStr for LinkKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partner" => Ok(LinkKind::Partner),
            "child" => Ok(LinkKind::Child),
            other => Err(LayoutError::unknown_link_type(other)),
        }
    }
}

/// A typed relationship between two people
///
/// Serialized form:
/// `{"origin": "...", "target": "...", "type": "partner"|"child"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub origin: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

impl Link {
    /// Create a partner link; `origin` is placed left of `target`
    pub fn partner(origin: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            kind: LinkKind::Partner,
        }
    }

    /// Create a parent-to-child link
    pub fn child(origin: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            kind: LinkKind::Child,
        }
    }
}

/// Final position of one person, in rendering units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One straight line to draw, in rendering units
///
/// Partner lines connect two people directly. Child lines come in stalks and
/// crossbars produced by the router; consumers draw each segment as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

impl LineSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, kind: LinkKind) -> Self {
        Self { x1, y1, x2, y2, kind }
    }
}

/// Numeric layout parameters, in rendering units
///
/// These are opaque scale factors owned by the presentation layer; the
/// pipeline never interprets them beyond arithmetic. `seed` drives the
/// link shuffle used by the ordering retry loop, so a fixed configuration
/// yields a reproducible layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal space allotted to one person box
    pub node_width: f64,
    /// Minimum horizontal gap between neighbouring boxes
    pub min_h_spacing: f64,
    /// Horizontal gap between the boxes of a couple (fits the partner line)
    pub partner_h_spacing: f64,
    /// Vertical distance between generations
    pub rank_height: f64,
    /// Vertical distance between stacked child-line crossbars
    pub line_v_spacing: f64,
    /// Seed for the ordering retry shuffle
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 100.0,
            min_h_spacing: 10.0,
            partner_h_spacing: 50.0,
            rank_height: 90.0,
            line_v_spacing: 10.0,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    /// Spacing multiplier between partners, relative to plain neighbours
    pub fn couple_spacing(&self) -> f64 {
        (self.node_width + self.partner_h_spacing) / (self.node_width + self.min_h_spacing)
    }
}

/// The complete output of one layout invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Position for every person referenced by the input links
    pub nodes: HashMap<String, Point>,
    /// Partner lines and routed child connectors
    pub lines: Vec<LineSegment>,
}
