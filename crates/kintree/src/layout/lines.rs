//! Connector line routing
//!
//! Partners get one straight line between their boxes. Parent/child bundles
//! are routed as stalks and crossbars: a stalk down from each parent (one
//! shared stalk from the midpoint for an actual couple), a horizontal
//! crossbar, and a stalk down to each child. Bundles with the same children
//! are merged so co-parents who are not a couple share one crossbar, and
//! horizontally overlapping bundles get stacked at distinct heights so they
//! stay distinguishable.

use std::collections::HashMap;

use tracing::{debug, span, Level};

use super::graph::{adjacent_group_by, partner_groups, partners_by_origin};
use crate::core::{Link, LineSegment, LinkKind, Point};

/// One parent/child bundle: stalk origins above, stalk targets below, and
/// the horizontal extent of its crossbar.
#[derive(Debug, Clone)]
struct Connection {
    minx: f64,
    maxx: f64,
    originxs: Vec<f64>,
    targetxs: Vec<f64>,
}

/// Route all lines for a laid-out order.
pub fn get_lines(
    order: &[Vec<String>],
    links: &[Link],
    coords: &HashMap<String, Point>,
    line_v_spacing: f64,
) -> Vec<LineSegment> {
    let lines_span = span!(Level::DEBUG, "get_lines");
    let _enter = lines_span.enter();

    let partner_lookup = partners_by_origin(links);
    let mut lines: Vec<LineSegment> = Vec::new();

    for link in links.iter().filter(|link| link.kind == LinkKind::Partner) {
        let (Some(origin), Some(target)) = (coords.get(&link.origin), coords.get(&link.target))
        else {
            continue;
        };
        lines.push(LineSegment::new(
            origin.x,
            origin.y,
            target.x,
            target.y,
            LinkKind::Partner,
        ));
    }

    for rows in order.windows(2) {
        let (parent_row, child_row) = (&rows[0], &rows[1]);
        let (Some(first_parent), Some(first_child)) = (parent_row.first(), child_row.first())
        else {
            continue;
        };

        let mut connections: Vec<Connection> = Vec::new();
        for group in partner_groups(parent_row, links, true) {
            // Groups are of size one or two; a run of three or more
            // co-parents keeps only its first pair of stalk origins.
            let left = group[0].as_str();
            let right = group.get(1).map(|id| id.as_str());

            let left_children = children_of(left, links);
            let (target_sets, origin_sets) = match right {
                Some(right) => {
                    let right_children = children_of(right, links);

                    // Children of both parents hang from the center.
                    let center_children: Vec<&str> = left_children
                        .iter()
                        .copied()
                        .filter(|child| right_children.contains(child))
                        .collect();

                    let lx = coords[left].x;
                    let rx = coords[right].x;
                    // A real couple gets one stalk from the middle of the
                    // partner line; defacto co-parents get one stalk each.
                    let actual_partners = partner_lookup
                        .get(left)
                        .map_or(false, |link| link.target == right);
                    let center_origins = if actual_partners {
                        vec![(lx + rx) / 2.0]
                    } else {
                        vec![lx, rx]
                    };

                    (
                        vec![
                            minus(&left_children, &center_children),
                            center_children.clone(),
                            minus(&right_children, &center_children),
                        ],
                        vec![vec![lx], center_origins, vec![rx]],
                    )
                }
                None => (vec![left_children], vec![vec![coords[left].x]]),
            };

            for (target_ids, originxs) in target_sets.into_iter().zip(origin_sets) {
                if target_ids.is_empty() {
                    continue;
                }
                let targetxs: Vec<f64> = target_ids.iter().map(|id| coords[*id].x).collect();
                let minx = originxs
                    .iter()
                    .chain(&targetxs)
                    .fold(f64::INFINITY, |a, &b| a.min(b));
                let maxx = originxs
                    .iter()
                    .chain(&targetxs)
                    .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                connections.push(Connection {
                    minx,
                    maxx,
                    originxs,
                    targetxs,
                });
            }
        }

        // Adjacent bundles aiming at the same children (parents who are not
        // partnered but share the exact same children) become one bundle.
        let merged: Vec<Connection> =
            adjacent_group_by(&connections, |a, b| a.targetxs == b.targetxs)
                .into_iter()
                .map(|bundle| Connection {
                    minx: bundle.iter().map(|c| c.minx).fold(f64::INFINITY, f64::min),
                    maxx: bundle
                        .iter()
                        .map(|c| c.maxx)
                        .fold(f64::NEG_INFINITY, f64::max),
                    originxs: union(bundle.iter().map(|c| &c.originxs)),
                    targetxs: union(bundle.iter().map(|c| &c.targetxs)),
                })
                .collect();

        // Overlapping crossbars fan out around the midpoint between rows.
        let stacked = adjacent_group_by(&merged, |a, b| a.maxx >= b.minx);

        let origin_y = coords[first_parent.as_str()].y;
        let target_y = coords[first_child.as_str()].y;
        let mid_y = (origin_y + target_y) / 2.0;

        for bundle_group in stacked {
            let size = bundle_group.len();
            for (index, connection) in bundle_group.iter().enumerate() {
                let y = mid_y
                    - ((size - 1) as f64 / 2.0 - index as f64) * line_v_spacing;
                for &originx in &connection.originxs {
                    lines.push(LineSegment::new(originx, origin_y, originx, y, LinkKind::Child));
                }
                lines.push(LineSegment::new(
                    connection.minx,
                    y,
                    connection.maxx,
                    y,
                    LinkKind::Child,
                ));
                for &targetx in &connection.targetxs {
                    lines.push(LineSegment::new(targetx, y, targetx, target_y, LinkKind::Child));
                }
            }
        }
    }

    debug!(line_count = lines.len(), "routed lines");
    lines
}

/// Children of one parent, in link-list order.
fn children_of<'a>(parent: &str, links: &'a [Link]) -> Vec<&'a str> {
    links
        .iter()
        .filter(|link| link.kind == LinkKind::Child && link.origin == parent)
        .map(|link| link.target.as_str())
        .collect()
}

/// `a` without the elements of `b`, keeping order.
fn minus<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<&'a str> {
    a.iter().copied().filter(|id| !b.contains(id)).collect()
}

/// Union of several x lists, deduplicated, keeping first-seen order.
fn union<'a>(lists: impl Iterator<Item = &'a Vec<f64>>) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for list in lists {
        for &x in list {
            if !out.contains(&x) {
                out.push(x);
            }
        }
    }
    out
}
