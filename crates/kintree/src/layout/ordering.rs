//! Vertex ordering (left-to-right order within each generation)
//!
//! Based on the ordering phase of "A Technique for Drawing Directed Graphs"
//! (Gansner et al., TSE 1993, section 3), with simplifications and extra
//! rules for the restricted shape of family graphs: partners are kept
//! adjacent throughout, and links that form a closed parent/child bundle are
//! not counted as crossings.
//!
//! The top-level [`ordering`] run is iterative: a breadth-first seed order is
//! improved by alternating weighted-median and transposition passes, tried
//! from both a top-first and a bottom-first seed, and retried with a shuffled
//! link list when no crossing-free order is found.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, span, trace, Level};

use super::graph::{link_pairs, partners_by_origin, partners_by_target, walk_links};
use super::rank::assign_ranks;
use super::Order;
use crate::core::Link;

const ORDERING_ITERATIONS: usize = 6;
const ORDERING_ATTEMPTS: usize = 5;

/// Count the edge crossings of a proposed order.
///
/// For each pair of neighbouring ranks, every pair of links whose endpoints
/// are ordered inconsistently between the two rows counts once per distinct
/// crossed target. Links that are mutually interlinked (both `a→d` and `c→b`
/// exist alongside `a→b` and `c→d`, typically several siblings shared by two
/// parents) are not counted: they are drawn as one merged bundle later.
///
/// This is quadratic in the rank sizes, which is fine at family-tree scale.
pub fn crossings(order: &[Vec<String>], links: &[Link]) -> usize {
    let pairs = link_pairs(links);
    let mut count = 0;

    for rows in order.windows(2) {
        let (row_a, row_b) = (&rows[0], &rows[1]);

        // Links that span these two rows, with their endpoint indices.
        let mut row_links: Vec<(usize, usize, &Link)> = Vec::new();
        for link in links {
            let Some(origin_index) = row_a.iter().position(|id| id == &link.origin) else {
                continue;
            };
            let Some(target_index) = row_b.iter().position(|id| id == &link.target) else {
                continue;
            };
            row_links.push((origin_index, target_index, link));
        }

        for (index, &(origin_a, target_a, link_a)) in row_links.iter().enumerate() {
            let mut crossed: HashSet<&str> = HashSet::new();
            for &(origin_b, target_b, link_b) in &row_links[index + 1..] {
                let inconsistent = (origin_a > origin_b && target_a < target_b)
                    || (origin_a < origin_b && target_a > target_b);
                if !inconsistent {
                    continue;
                }
                let interlinked = pairs
                    .contains(&(link_a.origin.as_str(), link_b.target.as_str()))
                    && pairs.contains(&(link_b.origin.as_str(), link_a.target.as_str()));
                if !interlinked {
                    crossed.insert(link_b.target.as_str());
                }
            }
            count += crossed.len();
        }
    }

    count
}

/// Stable-sort every row by the given weights; ids without a weight sink to
/// the end of their row while keeping their relative order.
fn sort_by_weights(ranks: &[Vec<String>], weights: &HashMap<&str, f64>) -> Order {
    ranks
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.sort_by(|a, b| {
                let wa = weights.get(a.as_str()).copied().unwrap_or(f64::INFINITY);
                let wb = weights.get(b.as_str()).copied().unwrap_or(f64::INFINITY);
                wa.partial_cmp(&wb).unwrap_or(std::cmp::Ordering::Equal)
            });
            row
        })
        .collect()
}

/// Seed order: breadth-first weights starting from the whole first (or last)
/// rank, each row sorted by visitation order.
pub fn breadth_first_order(ranks: &[Vec<String>], links: &[Link], from_bottom: bool) -> Order {
    let start_row = if from_bottom {
        ranks.last()
    } else {
        ranks.first()
    };
    let Some(start_row) = start_row else {
        return Vec::new();
    };

    let start: Vec<&str> = start_row.iter().map(|id| id.as_str()).collect();
    let mut weights: HashMap<&str, f64> = HashMap::new();
    walk_links(
        &start,
        links,
        |_, _, _, _| {},
        |node| {
            if !weights.contains_key(node) {
                let next = weights.len() as f64;
                weights.insert(node, next);
            }
        },
    );

    sort_by_weights(ranks, &weights)
}

/// Place couples next to each other.
///
/// The target of a partner link gets the origin's weight plus one half, so
/// partners end up adjacent with the link's origin on the left.
pub fn cupid(order: &[Vec<String>], links: &[Link]) -> Order {
    let partner_links = partners_by_origin(links);

    let mut weights: HashMap<&str, f64> = HashMap::new();
    for row in order {
        for (position, id) in row.iter().enumerate() {
            if !weights.contains_key(id.as_str()) {
                weights.insert(id.as_str(), position as f64);
            }
            if let Some(partner) = partner_links.get(id.as_str()) {
                let weight = weights[id.as_str()] + 0.5;
                weights.insert(partner.target.as_str(), weight);
            }
        }
    }

    sort_by_weights(order, &weights)
}

/// Sort the weighted items of a row into ascending weight order without
/// moving any unweighted item.
///
/// Bubble passes repeat until stable. With `swap_when_equal`, ties are also
/// swapped (once per pass, without counting as progress); alternating this
/// between sweeps helps the median phase escape plateaus.
pub fn partial_weight_sort(
    items: &[String],
    weights: &HashMap<&str, f64>,
    swap_when_equal: bool,
) -> Vec<String> {
    let mut items = items.to_vec();

    let mut changed = true;
    while changed {
        changed = false;
        let Some(mut first) = items.iter().position(|id| weights.contains_key(id.as_str()))
        else {
            break;
        };
        while let Some(second) = items
            .iter()
            .skip(first + 1)
            .position(|id| weights.contains_key(id.as_str()))
            .map(|offset| first + 1 + offset)
        {
            let first_weight = weights[items[first].as_str()];
            let second_weight = weights[items[second].as_str()];
            if first_weight > second_weight {
                items.swap(first, second);
                changed = true;
            } else if swap_when_equal && first_weight == second_weight {
                items.swap(first, second);
            }
            first = second;
        }
    }

    items
}

/// Positions in the adjacent row of the nodes linked to `node`.
fn adj_positions(node: &str, adjacent: &[String], pairs: &HashSet<(&str, &str)>) -> Vec<usize> {
    adjacent
        .iter()
        .enumerate()
        .filter(|(_, adj)| pairs.contains(&(adj.as_str(), node)))
        .map(|(position, _)| position)
        .collect()
}

/// Weighted median of a sorted list of neighbour positions.
///
/// See [TDDG] section 3: the even case with four or more neighbours is
/// interpolated toward the side whose neighbours sit closer together.
fn median_value(positions: &[usize], pack_weighted: bool) -> Option<f64> {
    let len = positions.len();
    let mid = len / 2;

    if len == 0 {
        return None;
    }
    if len % 2 == 1 {
        return Some(positions[mid] as f64);
    }
    if len == 2 {
        return Some((positions[0] + positions[1]) as f64 / 2.0);
    }
    if pack_weighted {
        let left = (positions[mid - 1] - positions[0]) as f64;
        let right = (positions[len - 1] - positions[mid]) as f64;
        return Some(
            (positions[mid - 1] as f64 * right + positions[mid] as f64 * left) / (left + right),
        );
    }
    Some((positions[mid - 1] + positions[mid]) as f64 / 2.0)
}

/// One weighted-median sweep over all ranks.
///
/// Each rank is reordered by the median position of its neighbours in the
/// adjacent, already-swept rank. Partners in the same rank share a median
/// (the left partner's value wins when both have one); nodes without
/// neighbours keep their position.
pub fn wmedian(
    order: &[Vec<String>],
    links: &[Link],
    top_to_bottom: bool,
    swap_when_equal: bool,
) -> Order {
    let partner_links = partners_by_origin(links);
    let pairs: HashSet<(&str, &str)> = links
        .iter()
        .map(|link| {
            if top_to_bottom {
                (link.origin.as_str(), link.target.as_str())
            } else {
                (link.target.as_str(), link.origin.as_str())
            }
        })
        .collect();

    let mut order: Order = order.to_vec();
    let sweep: Vec<(usize, usize)> = if top_to_bottom {
        (1..order.len()).map(|row| (row, row - 1)).collect()
    } else {
        (0..order.len().saturating_sub(1))
            .rev()
            .map(|row| (row, row + 1))
            .collect()
    };

    for (current, adjacent) in sweep {
        let mut medians: HashMap<&str, f64> = HashMap::new();
        for id in &order[current] {
            if let Some(median) =
                median_value(&adj_positions(id, &order[adjacent], &pairs), true)
            {
                medians.insert(id.as_str(), median);
            }
        }

        // Partners move as one: both get the same weight, and when both have
        // a median of their own the left partner's value wins.
        for id in &order[current] {
            let Some(partner) = partner_links.get(id.as_str()) else {
                continue;
            };
            let target = partner.target.as_str();
            if !order[current].iter().any(|other| other == target) {
                continue;
            }
            match (medians.get(id.as_str()).copied(), medians.get(target).copied()) {
                (Some(median), _) => {
                    medians.insert(target, median);
                }
                (None, Some(median)) => {
                    medians.insert(id.as_str(), median);
                }
                (None, None) => {}
            }
        }

        let sorted = partial_weight_sort(&order[current], &medians, swap_when_equal);
        order[current] = sorted;
    }

    order
}

/// Local search: try swapping every adjacent pair within every rank and keep
/// any swap that does not worsen the crossing count.
///
/// A swap next to a couple carries the couple as a unit so partners never get
/// separated. With `swap_when_equal`, ties are kept too (without counting as
/// an improvement), which shakes loose some plateaus as suggested by [TDDG].
pub fn transpose(order: &[Vec<String>], links: &[Link], swap_when_equal: bool) -> Order {
    let left_partner = partners_by_origin(links);
    let right_partner = partners_by_target(links);

    let mut order: Order = order.to_vec();
    let mut best_crossings = crossings(&order, links);
    trace!(crossings = best_crossings, "before transpose");

    let mut improved = true;
    while improved {
        improved = false;
        for row_index in 0..order.len() {
            let mut row = order[row_index].clone();
            for i in 0..row.len().saturating_sub(1) {
                let mut new_row = row.clone();
                if left_partner.contains_key(new_row[i + 1].as_str()) && i + 2 < new_row.len() {
                    // The pair at i+1,i+2 is a couple: swap past both members.
                    new_row.swap(i, i + 1);
                    new_row.swap(i + 1, i + 2);
                } else if right_partner.contains_key(new_row[i].as_str()) && i > 0 {
                    // The pair at i-1,i is a couple: move i+1 before both.
                    new_row.swap(i, i + 1);
                    new_row.swap(i - 1, i);
                } else {
                    new_row.swap(i, i + 1);
                }

                let mut new_order = order.clone();
                new_order[row_index] = new_row.clone();
                let c = crossings(&new_order, links);
                if c < best_crossings {
                    best_crossings = c;
                    improved = true;
                    row = new_row;
                    order[row_index] = row.clone();
                } else if c == best_crossings && swap_when_equal {
                    row = new_row;
                    order[row_index] = row.clone();
                }
            }
        }
    }

    order
}

/// Order the rows of a ranked graph, starting from one breadth-first seed.
///
/// Runs a fixed number of median/transpose/cupid rounds, alternating the
/// sweep direction each round and the tie-swapping mode every two rounds,
/// and returns the best order seen.
pub fn assign_row_order(ranks: &[Vec<String>], links: &[Link], from_bottom: bool) -> Order {
    let mut order = breadth_first_order(ranks, links, from_bottom);
    order = cupid(&order, links);

    let mut best = order.clone();
    let mut best_crossings = crossings(&best, links);
    trace!(crossings = best_crossings, from_bottom, "seed order");

    for iteration in 0..ORDERING_ITERATIONS {
        let top_to_bottom = iteration % 2 == 0;
        let swap_when_equal = (iteration / 2) % 2 == 0;
        order = wmedian(&order, links, top_to_bottom, swap_when_equal);
        order = transpose(&order, links, swap_when_equal);
        order = cupid(&order, links);
        let c = crossings(&order, links);
        if c < best_crossings {
            trace!(crossings = c, iteration, "better order found");
            best_crossings = c;
            best = order.clone();
        }
    }

    best
}

/// Compute the full left-to-right ordering for the graph around `focus`.
///
/// Tries both breadth-first seeds; when neither reaches zero crossings the
/// link list is shuffled (perturbing every tie-break downstream) and the
/// whole attempt repeats, up to a fixed budget. The `seed` makes the shuffle
/// reproducible. This is a heuristic escape from local optima, not a global
/// minimum search.
pub fn ordering(focus: &str, links: &[Link], seed: u64) -> Result<Order> {
    let ordering_span = span!(Level::DEBUG, "ordering", focus);
    let _enter = ordering_span.enter();

    let ranks = assign_ranks(focus, links)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut working: Vec<Link> = links.to_vec();
    let mut best: Option<Order> = None;
    let mut best_crossings = usize::MAX;

    for attempt in 0..ORDERING_ATTEMPTS {
        for from_bottom in [true, false] {
            let order = assign_row_order(&ranks, &working, from_bottom);
            let c = crossings(&order, &working);
            if c < best_crossings {
                best_crossings = c;
                best = Some(order);
            }
            if best_crossings == 0 {
                break;
            }
        }
        if best_crossings == 0 {
            break;
        }
        debug!(attempt, crossings = best_crossings, "no crossing-free order; reshuffling");
        working.shuffle(&mut rng);
    }

    debug!(crossings = best_crossings, "ordering finished");
    Ok(best.unwrap_or_default())
}
