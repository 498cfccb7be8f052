// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for predictive properties.
//!
//! Most scenarios tag (1,1,2) in the 4 × 2 × 3 lattice and check which nodes inherit the tag.

mod common;

use common::{all_nodes, dominates, example_lattice, HEIGHTS};
use sparse_lattice::{Direction, Lattice, LatticeConfig, LatticeError, PredictiveProperty};

const TAGGED: [usize; 3] = [1, 1, 2];

#[test]
fn test_up_property() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::with_label(Direction::Up, "up");
    lattice.put_property(&TAGGED, &p).unwrap();

    assert!(lattice.has_property(&[2, 1, 2], &p).unwrap());
    assert!(lattice.has_property(&TAGGED, &p).unwrap());
    assert!(!lattice.has_property(&[0, 1, 2], &p).unwrap());
    assert!(!lattice.has_property(&[2, 0, 2], &p).unwrap());

    for node in all_nodes(&HEIGHTS) {
        assert_eq!(
            lattice.has_property(&node, &p).unwrap(),
            dominates(&node, &TAGGED),
            "{:?}",
            node
        );
    }
}

#[test]
fn test_down_property() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::with_label(Direction::Down, "down");
    lattice.put_property(&TAGGED, &p).unwrap();

    assert!(lattice.has_property(&[0, 1, 2], &p).unwrap());
    assert!(lattice.has_property(&[0, 0, 0], &p).unwrap());
    assert!(!lattice.has_property(&[2, 1, 2], &p).unwrap());

    for node in all_nodes(&HEIGHTS) {
        assert_eq!(
            lattice.has_property(&node, &p).unwrap(),
            dominates(&TAGGED, &node),
            "{:?}",
            node
        );
    }
}

#[test]
fn test_both_property() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Both);
    lattice.put_property(&TAGGED, &p).unwrap();

    for node in all_nodes(&HEIGHTS) {
        let expected = dominates(&node, &TAGGED) || dominates(&TAGGED, &node);
        assert_eq!(lattice.has_property(&node, &p).unwrap(), expected, "{:?}", node);
    }
}

#[test]
fn test_both_put_where_property_holds_changes_nothing() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Both);
    lattice.put_property(&[1, 1, 1], &p).unwrap();

    let nodes = all_nodes(&HEIGHTS);
    let before: Vec<bool> = nodes
        .iter()
        .map(|node| lattice.has_property(node, &p).unwrap())
        .collect();
    let generators = lattice.generator_count(&p);

    // (2,1,2) holds upward, so its down-closure is not added
    lattice.put_property(&[2, 1, 2], &p).unwrap();
    assert!(lattice.contains(&[2, 1, 2]).unwrap());
    assert!(!lattice.has_property(&[2, 0, 0], &p).unwrap());
    assert_eq!(lattice.generator_count(&p), generators);
    for (node, held) in nodes.iter().zip(before) {
        assert_eq!(lattice.has_property(node, &p).unwrap(), held, "{:?}", node);
    }
}

#[test]
fn test_none_property() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::None);
    lattice.put_property(&TAGGED, &p).unwrap();

    for node in all_nodes(&HEIGHTS) {
        assert_eq!(lattice.has_property(&node, &p).unwrap(), node == TAGGED);
    }
    lattice.remove_property(&TAGGED, &p).unwrap();
    assert!(!lattice.has_property(&TAGGED, &p).unwrap());
    assert_eq!(lattice.generator_count(&p), 0);
}

#[test]
fn test_put_is_idempotent() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Up);
    lattice.put_property(&TAGGED, &p).unwrap();
    let generation = lattice.generation();

    lattice.put_property(&TAGGED, &p).unwrap();
    assert!(!lattice.is_modified_since(generation));
    lattice.put_property(&[3, 1, 2], &p).unwrap();
    assert_eq!(lattice.generator_count(&p), 1);

    // A smaller node replaces the generator it implies
    lattice.put_property(&[0, 1, 0], &p).unwrap();
    assert_eq!(lattice.generator_count(&p), 1);
    lattice.put_property(&[2, 0, 0], &p).unwrap();
    assert_eq!(lattice.generator_count(&p), 2);
}

#[test]
fn test_every_put_is_recorded() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Up);
    lattice.put_property(&TAGGED, &p).unwrap();
    lattice.put_property(&[3, 1, 2], &p).unwrap();

    // Covered puts are still recorded, though they add no generator
    assert!(lattice.contains(&[3, 1, 2]).unwrap());
    assert!(!lattice.contains_data(&[3, 1, 2]).unwrap());
    assert_eq!(
        lattice.list_nodes().collect::<Vec<_>>(),
        vec![TAGGED.to_vec(), vec![3, 1, 2]]
    );
}

#[test]
fn test_remove_up_clears_generators_above() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Up);
    lattice.put_property(&[1, 1, 2], &p).unwrap();
    lattice.put_property(&[3, 0, 0], &p).unwrap();

    lattice.remove_property(&[1, 0, 1], &p).unwrap();
    assert!(!lattice.has_property(&[1, 1, 2], &p).unwrap());
    assert!(lattice.has_property(&[3, 0, 0], &p).unwrap());
    assert!(lattice.has_property(&[3, 1, 2], &p).unwrap());
    assert_eq!(lattice.generator_count(&p), 1);

    // A generator below the removed node keeps the property there
    lattice.put_property(&[0, 0, 0], &p).unwrap();
    lattice.remove_property(&[3, 1, 2], &p).unwrap();
    assert!(lattice.has_property(&[3, 1, 2], &p).unwrap());
}

#[test]
fn test_remove_down_clears_generators_below() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Down);
    lattice.put_property(&[1, 1, 2], &p).unwrap();
    lattice.put_property(&[3, 0, 0], &p).unwrap();

    lattice.remove_property(&[2, 1, 2], &p).unwrap();
    assert!(!lattice.has_property(&[1, 1, 2], &p).unwrap());
    assert!(lattice.has_property(&[0, 0, 0], &p).unwrap());
    assert_eq!(lattice.generator_count(&p), 1);

    lattice.remove_property(&[3, 1, 2], &p).unwrap();
    assert!(!lattice.has_property(&[0, 0, 0], &p).unwrap());
    assert_eq!(lattice.generator_count(&p), 0);
}

#[test]
fn test_remove_unknown_property_is_noop() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Both);
    let generation = lattice.generation();
    lattice.remove_property(&TAGGED, &p).unwrap();
    assert!(!lattice.has_property(&TAGGED, &p).unwrap());
    assert!(!lattice.is_modified_since(generation));
    assert_eq!(lattice.properties().count(), 0);
}

#[test]
fn test_has_any_property() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let first = PredictiveProperty::new(Direction::None);
    let second = PredictiveProperty::new(Direction::None);
    let up = PredictiveProperty::new(Direction::Up);

    lattice.put_property(&[0, 0, 0], &first).unwrap();
    lattice.put_property(&[3, 0, 0], &second).unwrap();
    lattice.put_property(&[2, 1, 0], &up).unwrap();

    assert!(lattice.has_any_property(&[0, 0, 0]).unwrap());
    assert!(lattice.has_any_property(&[3, 0, 0]).unwrap());
    assert!(lattice.has_any_property(&[3, 1, 2]).unwrap());
    assert!(!lattice.has_any_property(&[1, 1, 2]).unwrap());

    let registered: Vec<&PredictiveProperty> = lattice.properties().collect();
    assert_eq!(registered, vec![&first, &second, &up]);
}

#[test]
fn test_properties_are_independent() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let a = PredictiveProperty::with_label(Direction::Up, "same");
    let b = PredictiveProperty::with_label(Direction::Up, "same");
    lattice.put_property(&TAGGED, &a).unwrap();
    assert!(lattice.has_property(&TAGGED, &a).unwrap());
    assert!(!lattice.has_property(&TAGGED, &b).unwrap());
    assert!(lattice.has_property(&TAGGED, &a.clone()).unwrap());
}

#[test]
fn test_compaction_is_transparent() {
    let config = LatticeConfig::default().with_compaction_threshold(0.99);
    let mut lattice: Lattice<usize, ()> =
        Lattice::from_heights_with_config(&[5, 5, 5], config).unwrap();
    let mut reference: Lattice<usize, ()> =
        Lattice::from_heights_with_config(&[5, 5, 5], config.with_compaction_threshold(0.0))
            .unwrap();
    let p = PredictiveProperty::new(Direction::Down);

    let nodes = all_nodes(&[5, 5, 5]);
    for (index, node) in nodes.iter().enumerate() {
        for target in [&mut lattice, &mut reference] {
            if index % 3 == 0 {
                target.remove_property(node, &p).unwrap();
            } else {
                target.put_property(node, &p).unwrap();
            }
        }
    }

    for node in &nodes {
        assert_eq!(
            lattice.has_property(node, &p).unwrap(),
            reference.has_property(node, &p).unwrap(),
            "{:?}",
            node
        );
    }
    assert_eq!(lattice.generator_count(&p), reference.generator_count(&p));

    let compacted = lattice.property_statistics(&p);
    assert_eq!(compacted.len(), 1);
    assert!(compacted[0].compactions > 0);
    assert_eq!(reference.property_statistics(&p)[0].compactions, 0);
}

#[test]
fn test_identifier_and_vector_forms_agree() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let up = PredictiveProperty::new(Direction::Up);
    let down = PredictiveProperty::new(Direction::Down);
    lattice.put_property_id(11, &up).unwrap();
    lattice.put_property(&[0, 1, 0], &down).unwrap();

    for (id, node) in all_nodes(&HEIGHTS).iter().enumerate() {
        let id = id as u64;
        assert_eq!(
            lattice.has_property_id(id, &up).unwrap(),
            lattice.has_property(node, &up).unwrap()
        );
        assert_eq!(
            lattice.has_any_property_id(id).unwrap(),
            lattice.has_any_property(node).unwrap()
        );
    }
    assert_eq!(
        lattice.put_property_id(24, &up).unwrap_err(),
        LatticeError::IdentifierOutOfRange {
            id: 24,
            num_nodes: 24
        }
    );
}

#[test]
fn test_stale_cursor() {
    let mut lattice: Lattice<usize, ()> = example_lattice();
    let p = PredictiveProperty::new(Direction::Up);
    lattice.put_property(&TAGGED, &p).unwrap();

    let mut cursor = lattice.cursor();
    assert_eq!(cursor.next_node(&lattice).unwrap(), Some(TAGGED.to_vec()));
    lattice.put_property(&[0, 0, 0], &p).unwrap();
    assert!(matches!(
        cursor.next_node(&lattice),
        Err(LatticeError::StaleCursor { .. })
    ));

    let mut fresh = lattice.cursor();
    assert_eq!(fresh.next_node(&lattice).unwrap(), Some(vec![0, 0, 0]));
}
