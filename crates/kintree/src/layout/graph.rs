//! Link indexing and traversal helpers shared by the layout stages
//!
//! Every index here is transient: rebuilt from the link list by each stage
//! invocation and dropped when the stage returns. At family-tree scale this
//! is cheaper than keeping any persistent structure in sync.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::{Link, LinkKind};

/// Lookup from a person to the partner link they originate.
///
/// When a person originates several partner links the later link wins; the
/// ordering heuristics only ever track one partner per person.
pub(crate) fn partners_by_origin(links: &[Link]) -> HashMap<&str, &Link> {
    links
        .iter()
        .filter(|link| link.kind == LinkKind::Partner)
        .map(|link| (link.origin.as_str(), link))
        .collect()
}

/// Lookup from a person to the partner link that targets them.
pub(crate) fn partners_by_target(links: &[Link]) -> HashMap<&str, &Link> {
    links
        .iter()
        .filter(|link| link.kind == LinkKind::Partner)
        .map(|link| (link.target.as_str(), link))
        .collect()
}

/// Lookup from a parent to their children, in link-list order.
pub(crate) fn children_by_origin(links: &[Link]) -> HashMap<&str, Vec<&str>> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in links.iter().filter(|link| link.kind == LinkKind::Child) {
        children
            .entry(link.origin.as_str())
            .or_default()
            .push(link.target.as_str());
    }
    children
}

/// Set of `(origin, target)` pairs for constant-time membership tests.
pub(crate) fn link_pairs(links: &[Link]) -> HashSet<(&str, &str)> {
    links
        .iter()
        .map(|link| (link.origin.as_str(), link.target.as_str()))
        .collect()
}

/// Breadth-first walk over the links, treating them as undirected edges.
///
/// `link_fn` is called for every link incident to a dequeued node, with the
/// node it was reached from, the node at the other end, and whether the link
/// is being walked against its direction. `node_fn` is called once per node
/// in visitation order.
///
/// Links where the node is the target are followed before links where it is
/// the origin, each set in input-list order; this fixes the breadth-first
/// tie-breaking that downstream ordering heuristics depend on.
pub(crate) fn walk_links<'a>(
    start: &[&'a str],
    links: &'a [Link],
    mut link_fn: impl FnMut(&'a Link, &'a str, &'a str, bool),
    mut node_fn: impl FnMut(&'a str),
) {
    let mut by_origin: HashMap<&str, Vec<&'a Link>> = HashMap::new();
    let mut by_target: HashMap<&str, Vec<&'a Link>> = HashMap::new();
    for link in links {
        by_origin.entry(link.origin.as_str()).or_default().push(link);
        by_target.entry(link.target.as_str()).or_default().push(link);
    }

    let mut queue: VecDeque<&'a str> = start.iter().copied().collect();
    let mut seen: HashSet<&'a str> = start.iter().copied().collect();

    while let Some(current) = queue.pop_front() {
        node_fn(current);
        let incident = by_target
            .get(current)
            .into_iter()
            .flatten()
            .chain(by_origin.get(current).into_iter().flatten());
        for &link in incident {
            let (other, reverse) = if link.origin == current {
                (link.target.as_str(), false)
            } else {
                (link.origin.as_str(), true)
            };
            link_fn(link, current, other, reverse);
            if seen.insert(other) {
                queue.push_back(other);
            }
        }
    }
}

/// Split a list into runs of adjacent elements that belong together.
///
/// `same_group` is asked whether the next element continues the run started
/// by the current run's last element.
pub(crate) fn adjacent_group_by<T: Clone>(
    list: &[T],
    mut same_group: impl FnMut(&T, &T) -> bool,
) -> Vec<Vec<T>> {
    let mut groups: Vec<Vec<T>> = Vec::new();
    for item in list {
        let extends_run = groups
            .last()
            .and_then(|group| group.last())
            .map_or(false, |last| same_group(last, item));
        if extends_run {
            if let Some(group) = groups.last_mut() {
                group.push(item.clone());
            }
        } else {
            groups.push(vec![item.clone()]);
        }
    }
    groups
}

/// Group a rank's people into partners, assuming partners are adjacent.
///
/// With `include_defacto` the grouping also joins "defacto partners": two
/// neighbours who are not a couple but whose children overlap such that the
/// right person's children are all shared with the left person.
pub(crate) fn partner_groups(
    people: &[String],
    links: &[Link],
    include_defacto: bool,
) -> Vec<Vec<String>> {
    let partner_lookup = partners_by_origin(links);
    let child_lookup = children_by_origin(links);

    adjacent_group_by(people, |a, b| {
        if partner_lookup
            .get(a.as_str())
            .map_or(false, |link| link.target == *b)
        {
            return true;
        }
        if !include_defacto {
            return false;
        }
        match (child_lookup.get(a.as_str()), child_lookup.get(b.as_str())) {
            (Some(of_a), Some(of_b)) => of_b.iter().all(|child| of_a.contains(child)),
            _ => false,
        }
    })
}
