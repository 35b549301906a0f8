//! Integration tests for the public API

use std::collections::HashSet;

use kintree::layout::ordering::{crossings, cupid, ordering, transpose};
use kintree::{layout, LayoutConfig, Link, LinkKind, TreeLayout};

/// A three-sided, four-generation family: the focus person's own household,
/// his parents with half-siblings from another partner, his brother's
/// family, his partner's family, and his grandparents' generation, plus one
/// completely disconnected little tree.
fn extended_family() -> Vec<Link> {
    vec![
        // A disconnected tree of its own.
        Link::partner("dadb", "mumb"),
        Link::child("mumb", "sonb"),
        Link::child("dadb", "sonb"),
        Link::child("sonb", "grandchildb"),
        // The focus household.
        Link::partner("tester", "lady"),
        Link::child("tester", "baby"),
        Link::child("tester", "child2"),
        Link::child("tester", "child3"),
        Link::child("tester", "child4"),
        Link::child("tester", "child5"),
        Link::child("lady", "baby"),
        Link::child("lady", "child2"),
        Link::child("lady", "child3"),
        Link::child("lady", "child4"),
        Link::child("lady", "child5"),
        // Parents, brother, half-siblings.
        Link::child("pappa", "tester"),
        Link::child("pappa", "bro"),
        Link::child("momma", "bro"),
        Link::child("momma", "tester"),
        Link::child("otherwoman", "halfbro"),
        Link::child("pappa", "halfbro"),
        Link::child("otherwoman", "halfsis"),
        Link::child("pappa", "halfsis"),
        Link::partner("bro", "sisterinlaw"),
        Link::child("bro", "niece"),
        Link::child("sisterinlaw", "niece"),
        Link::child("bro", "nephew"),
        Link::child("sisterinlaw", "nephew"),
        // The in-laws.
        Link::partner("ladysdad", "ladysmum"),
        Link::child("ladysdad", "lady"),
        Link::child("ladysmum", "lady"),
        Link::child("ladysdad", "ladyssis"),
        Link::child("ladysmum", "ladyssis"),
        Link::partner("seth", "ladyssis"),
        Link::child("seth", "cuzkid"),
        Link::child("ladyssis", "cuzkid"),
        // Grandparents and the aunt's family.
        Link::partner("gramps", "gran"),
        Link::child("gramps", "pappa"),
        Link::child("gran", "pappa"),
        Link::child("gramps", "auntie"),
        Link::child("gran", "auntie"),
        Link::partner("unclejim", "auntie"),
        Link::child("unclejim", "cousin1"),
        Link::child("auntie", "cousin1"),
        Link::child("unclejim", "cousin2"),
        Link::child("auntie", "cousin2"),
    ]
}

fn referenced_ids(links: &[Link]) -> HashSet<String> {
    links
        .iter()
        .flat_map(|link| [link.origin.clone(), link.target.clone()])
        .collect()
}

#[test]
fn test_layout_covers_every_referenced_person() {
    let links = extended_family();
    let ids = referenced_ids(&links);
    assert!(ids.len() >= 30, "fixture should span thirty people");

    let result = layout("tester", &links).unwrap();

    let keys: HashSet<String> = result.nodes.keys().cloned().collect();
    assert_eq!(keys, ids);
    assert!(!result.lines.is_empty());
}

#[test]
fn test_layout_puts_generations_on_rank_rows() {
    let links = extended_family();
    let result = layout("tester", &links).unwrap();

    // y positions are rank_height multiples offset to the row center.
    let config = LayoutConfig::default();
    for point in result.nodes.values() {
        let rank = (point.y - config.rank_height / 2.0) / config.rank_height;
        assert!(
            (rank - rank.round()).abs() < 1e-9,
            "y position {} is not on a rank row",
            point.y
        );
    }

    // Partners share a generation; children sit exactly one below.
    assert_eq!(result.nodes["tester"].y, result.nodes["lady"].y);
    assert_eq!(
        result.nodes["baby"].y - result.nodes["tester"].y,
        config.rank_height
    );
    assert_eq!(
        result.nodes["tester"].y - result.nodes["pappa"].y,
        config.rank_height
    );
}

#[test]
fn test_layout_is_deterministic_for_a_seed() {
    let links = extended_family();
    let engine = TreeLayout::with_config(LayoutConfig {
        seed: 7,
        ..LayoutConfig::default()
    });
    let first = engine.layout("tester", &links).unwrap();
    let second = engine.layout("tester", &links).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_layout_result_serializes() {
    let links = vec![Link::child("a", "b")];
    let result = layout("a", &links).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let parsed: kintree::LayoutResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

#[test]
fn test_partner_lines_connect_partner_positions() {
    let links = extended_family();
    let result = layout("tester", &links).unwrap();

    let tester = result.nodes["tester"];
    let lady = result.nodes["lady"];
    assert!(result
        .lines
        .iter()
        .filter(|l| l.kind == LinkKind::Partner)
        .any(|l| {
            (l.x1 == tester.x && l.x2 == lady.x) || (l.x1 == lady.x && l.x2 == tester.x)
        }));
}

#[test]
fn test_crossing_free_order_is_a_fixed_point() {
    // Once an order has zero crossings, further improvement passes must not
    // make it worse.
    let links = vec![
        Link::child("a", "c"),
        Link::child("b", "d"),
        Link::partner("c", "d"),
    ];
    let order = ordering("a", &links, 0).unwrap();
    assert_eq!(crossings(&order, &links), 0);

    let improved = cupid(&transpose(&order, &links, false), &links);
    assert_eq!(crossings(&improved, &links), 0);
}

#[test]
fn test_single_link_graph() {
    let links = vec![Link::child("a", "b")];
    let result = layout("a", &links).unwrap();
    assert_eq!(result.nodes.len(), 2);
    assert_eq!(result.nodes["a"].x, result.nodes["b"].x);
}
