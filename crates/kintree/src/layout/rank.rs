//! Generation (rank) assignment
//!
//! Breadth-first walk from the focus person assigning an integer generation
//! to every reachable node, then again from an arbitrary unranked node until
//! every person referenced by the links has a rank. Ranks are normalized so
//! each walk's minimum lands at row zero, which merges disconnected trees
//! into the same top-down band.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use super::graph::walk_links;
use super::Order;
use crate::core::{LayoutError, Link, LinkKind};

/// Assign a generation to every person referenced by `links`.
///
/// Returns the rank buckets from top to bottom; the order of people within a
/// bucket is not significant at this stage. Fails when `links` is empty,
/// since there is no rank context to place `focus` in.
///
/// A person reachable through two paths that disagree about their generation
/// keeps the first assignment; the conflict is reported through the log and
/// the walk continues. Contradictory graphs (someone being both ancestor and
/// descendant of the same person) therefore produce a layout, just not one
/// that can honour every link.
pub fn assign_ranks(focus: &str, links: &[Link]) -> Result<Order> {
    if links.is_empty() {
        return Err(LayoutError::empty_graph(focus).into());
    }

    let assign_span = span!(Level::DEBUG, "assign_ranks", focus);
    let _enter = assign_span.enter();

    let mut ranks: Order = Vec::new();
    let mut start = focus;
    loop {
        rank_component(start, links, &mut ranks);

        // Links may reference trees that the walk so far never touched;
        // restart from the first unranked link origin until none remain.
        let ranked: HashSet<&str> = ranks
            .iter()
            .flatten()
            .map(|id| id.as_str())
            .collect();
        match links
            .iter()
            .map(|link| link.origin.as_str())
            .find(|origin| !ranked.contains(origin))
        {
            Some(next) => {
                trace!(next, "found disconnected tree");
                start = next;
            }
            None => break,
        }
    }

    debug!(rank_count = ranks.len(), "assigned ranks");
    Ok(ranks)
}

/// Walk one connected component from `start` and merge its rows into `ranks`.
fn rank_component(start: &str, links: &[Link], ranks: &mut Order) {
    let mut node_rank: HashMap<&str, i64> = HashMap::new();
    let mut rank_nodes: HashMap<i64, Vec<&str>> = HashMap::new();
    let mut min_rank = 0i64;

    node_rank.insert(start, 0);
    rank_nodes.insert(0, vec![start]);

    walk_links(
        &[start],
        links,
        |link, current, other, reverse| {
            let r = match link.kind {
                LinkKind::Child => node_rank[current] + if reverse { -1 } else { 1 },
                LinkKind::Partner => node_rank[current],
            };
            match node_rank.get(other) {
                None => {
                    trace!(current, other, kind = %link.kind, rank = r, "ranked");
                    node_rank.insert(other, r);
                    rank_nodes.entry(r).or_default().push(other);
                    min_rank = min_rank.min(r);
                }
                Some(&assigned) if assigned != r => {
                    warn!(
                        node = other,
                        assigned,
                        conflicting = r,
                        "conflicting rank assignment; keeping the first"
                    );
                }
                Some(_) => {}
            }
        },
        |_| {},
    );

    let mut r = min_rank;
    while let Some(bucket) = rank_nodes.get(&r) {
        let index = (r - min_rank) as usize;
        if ranks.len() <= index {
            ranks.push(Vec::new());
        }
        ranks[index].extend(bucket.iter().map(|id| id.to_string()));
        r += 1;
    }
}
