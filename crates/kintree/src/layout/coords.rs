//! Horizontal coordinate assignment
//!
//! Greedy recursive layout starting from the top left: every partner group is
//! laid out over the contiguous span of its children in the row below, each
//! subtree is pushed as far left as already-placed siblings allow, and a
//! follow-up pass pulls groups back toward the centroid of their children to
//! close gaps the greedy pass left open.
//!
//! Positions are in abstract units of one node width plus minimum spacing;
//! the caller scales them into rendering units.

use std::collections::HashMap;

use tracing::{debug, span, trace, Level};

use super::graph::{children_by_origin, link_pairs, partner_groups, partners_by_origin};
use super::Order;
use crate::core::Link;

/// Synthetic root injected as a parent of every person so every rank has a
/// parent-group context, even the top one. Stripped before returning.
const PHANTOM: &str = "__phantom__";

/// Compute an x position for every person in the order.
///
/// `couple_spacing` is the gap between partners relative to the unit gap
/// between plain neighbours (see `LayoutConfig::couple_spacing`).
pub fn xcoordinates(
    order: &[Vec<String>],
    links: &[Link],
    couple_spacing: f64,
) -> HashMap<String, f64> {
    let coords_span = span!(Level::DEBUG, "xcoordinates", couple_spacing);
    let _enter = coords_span.enter();

    let mut aug_links: Vec<Link> = links.to_vec();
    let mut aug_order: Order = Vec::with_capacity(order.len());
    for row in order {
        for id in row {
            aug_links.push(Link::child(PHANTOM, id.clone()));
        }
        let mut aug_row = row.clone();
        aug_row.push(PHANTOM.to_string());
        aug_order.push(aug_row);
    }
    aug_links.push(Link::child(PHANTOM, PHANTOM));

    let placements = layout_subtree(aug_order.clone(), &aug_links, couple_spacing);

    let mut xcoords: HashMap<String, f64> = HashMap::new();
    for (row, positions) in aug_order.iter().zip(&placements) {
        for (id, &x) in row.iter().zip(positions) {
            xcoords.insert(id.clone(), x);
        }
    }

    let mut xcoords = compact_left(&aug_order, xcoords, &aug_links);
    xcoords.remove(PHANTOM);

    debug!(node_count = xcoords.len(), "assigned x coordinates");
    xcoords
}

/// Positions for `nodes` centered around `center`, with per-pair spacing.
fn centered_on(
    center: f64,
    nodes: &[String],
    spacing_for: impl Fn(&str, &str) -> f64,
) -> Vec<f64> {
    let mut spacing = vec![0.0];
    for pair in nodes.windows(2) {
        spacing.push(spacing_for(&pair[0], &pair[1]));
    }
    let total: f64 = spacing.iter().sum();

    let mut x = center - total / 2.0;
    nodes
        .iter()
        .zip(&spacing)
        .map(|(_, &width)| {
            x += width;
            x
        })
        .collect()
}

/// Recursively lay out `order[0]` and everything below it.
///
/// Returns one position row per input row; rows other than the first may be
/// partial (only the leftmost entries that belong to this subtree).
fn layout_subtree(order: Order, links: &[Link], couple_spacing: f64) -> Vec<Vec<f64>> {
    let partner_lookup = partners_by_origin(links);
    let pairs = link_pairs(links);

    let mut rows = order;
    if rows.is_empty() {
        return Vec::new();
    }
    let row = rows.remove(0);
    let mut remaining = rows;

    if remaining.is_empty() {
        // Leaf rank: position equals index.
        return vec![(0..row.len()).map(|i| i as f64).collect()];
    }

    let mut results: Vec<Vec<f64>> = vec![Vec::new(); remaining.len() + 1];
    let mut minx: Vec<f64> = vec![0.0; remaining.len() + 1];

    for group in partner_groups(&row, links, true) {
        trace!(group = ?group, "layout subtree");

        let is_child = |id: &str| {
            group
                .iter()
                .any(|parent| pairs.contains(&(parent.as_str(), id)))
        };

        // The group's span of children in the next row, extended past any
        // partners trailing the last child so couples stay with the span.
        let child_row = &remaining[0];
        let first_child = child_row.iter().position(|id| is_child(id));
        let last_child = child_row.iter().rposition(|id| is_child(id));
        let (children, first_child_index, trailing_partners) = match (first_child, last_child) {
            (Some(first), Some(mut last)) => {
                let mut trailing = 0;
                while last + 1 < child_row.len() {
                    match partner_lookup.get(child_row[last].as_str()) {
                        Some(link) if link.target == child_row[last + 1] => {
                            last += 1;
                            trailing += 1;
                        }
                        _ => break,
                    }
                }
                (child_row[..=last].to_vec(), first, trailing)
            }
            _ => (Vec::new(), 0, 0),
        };

        let mut placements: Vec<Vec<f64>>;
        if children.is_empty() {
            placements = vec![Vec::new(); remaining.len()];
        } else {
            let mut sub_order = Vec::with_capacity(remaining.len());
            sub_order.push(children);
            sub_order.extend(remaining[1..].iter().cloned());
            placements = layout_subtree(sub_order, links, couple_spacing);

            // The recursion placed a prefix of each deeper row; consume it.
            for (rem, placed) in remaining.iter_mut().zip(&placements) {
                rem.drain(..placed.len());
            }
        }

        // Center the group over its children, ignoring nodes before the
        // first real child and any trailing partners.
        let center = match placements.first() {
            Some(positions) if !positions.is_empty() => {
                let min = positions[first_child_index..]
                    .iter()
                    .fold(f64::INFINITY, |a, &b| a.min(b));
                let upto = positions.len() - trailing_partners;
                let max = positions[..upto]
                    .iter()
                    .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                (max - min) / 2.0 + min
            }
            _ => 0.0,
        };

        let group_positions = centered_on(center, &group, |a, b| {
            match partner_lookup.get(a) {
                Some(link) if link.target == b => couple_spacing,
                _ => 1.0,
            }
        });
        placements.insert(0, group_positions);

        // Fit the subtree as far left as previously placed siblings allow.
        let plusx = minx
            .iter()
            .zip(&placements)
            .map(|(&mx, placed)| match placed.first() {
                Some(&first) => mx - first,
                None => f64::NEG_INFINITY,
            })
            .fold(f64::NEG_INFINITY, f64::max);

        for (res, placed) in results.iter_mut().zip(&placements) {
            res.extend(placed.iter().map(|&p| p + plusx));
        }

        // Next subtree must start right of everything placed so far; child
        // rows get an extra margin so non-siblings aren't flush together.
        minx = results
            .iter()
            .enumerate()
            .map(|(index, res)| match res.last() {
                Some(&last) => last + if index == 0 { 1.0 } else { 1.1 },
                None => 0.0,
            })
            .collect();
    }

    results
}

/// Close gaps the greedy pass left: pull each group left toward the centroid
/// of its children, bounded by the previous group in the row.
fn compact_left(
    order: &[Vec<String>],
    mut xcoords: HashMap<String, f64>,
    links: &[Link],
) -> HashMap<String, f64> {
    let child_lookup = children_by_origin(links);

    let mut improvement = true;
    while improvement {
        improvement = false;
        for row in order {
            let groups = partner_groups(row, links, true);
            for pair in groups.windows(2) {
                let (prev_group, group) = (&pair[0], &pair[1]);
                let Some(prev_last) = prev_group.last() else {
                    continue;
                };
                let min = xcoords[prev_last.as_str()] + 1.1;

                // Only groups with common children get pulled; everyone else
                // is positioned by their own parents.
                let Some(first_children) = child_lookup.get(group[0].as_str()) else {
                    continue;
                };
                let children: Vec<&str> = first_children
                    .iter()
                    .copied()
                    .filter(|child| {
                        group[1..].iter().all(|parent| {
                            child_lookup
                                .get(parent.as_str())
                                .map_or(false, |theirs| theirs.contains(child))
                        })
                    })
                    .collect();
                if children.is_empty() {
                    continue;
                }

                let center = children
                    .iter()
                    .map(|child| xcoords[*child])
                    .sum::<f64>()
                    / children.len() as f64;
                let first = xcoords[group[0].as_str()];
                let group_width = match group.last() {
                    Some(last) => xcoords[last.as_str()] - first,
                    None => 0.0,
                };
                let newx = (center - group_width / 2.0).max(min);
                if newx < first {
                    let change = newx - first;
                    for id in group {
                        if let Some(x) = xcoords.get_mut(id.as_str()) {
                            *x += change;
                        }
                    }
                    improvement = true;
                }
            }
        }
    }

    xcoords
}
