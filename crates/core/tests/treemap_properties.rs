//! Property tests over random acyclic record sets.
//!
//! 1. Every linked record's parent resolves to the record that named it.
//! 2. Internal values equal the sum of their descendant leaves.
//! 3. Child tiles sit inside their parent and siblings do not overlap.
//! 4. Tile area is proportional to value.

use std::collections::HashMap;

use proptest::prelude::*;
use zoomtree_core::aggregate::{accumulate, normalize};
use zoomtree_core::hierarchy::build;
use zoomtree_core::layout::LayoutEngine;
use zoomtree_core::{NodeId, Record, Scalar, Tree};

/// Parent choices index strictly earlier records, so the input is acyclic.
/// Ids start at 1 since a `0` parent means no parent.
fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>(), 1u32..1000), 1..40).prop_map(
        |spec| {
            spec.into_iter()
                .enumerate()
                .map(|(i, (pick, is_root, value))| {
                    let parent = if i == 0 || is_root {
                        None
                    } else {
                        Some(Scalar::Int(pick.index(i) as i64 + 1))
                    };
                    Record::new(i as i64 + 1, parent, &format!("n{i}"))
                        .with_value(&value.to_string())
                        .with_index(i)
                })
                .collect()
        },
    )
}

fn prepared(records: &[Record]) -> Tree {
    let mut tree = normalize(&build(records.to_vec())).expect("at least one root");
    accumulate(&mut tree);
    tree
}

fn by_key(tree: &Tree) -> HashMap<String, NodeId> {
    tree.nodes
        .iter()
        .filter_map(|n| n.key.clone().map(|k| (k, n.id)))
        .collect()
}

fn leaf_sum(tree: &Tree, id: NodeId) -> f64 {
    tree.descendants(id)
        .into_iter()
        .filter(|d| tree.node(*d).is_leaf())
        .map(|d| tree.node(d).value().unwrap_or(0.0))
        .sum()
}

// 1. Hierarchy round-trip

proptest! {
    #[test]
    fn parent_links_round_trip(records in records_strategy()) {
        let tree = prepared(&records);
        let keys = by_key(&tree);
        prop_assert_eq!(keys.len(), records.len());
        for r in &records {
            let id = keys[&r.key()];
            match r.parent_key() {
                Some(pk) => prop_assert_eq!(tree.parent(id), Some(keys[&pk])),
                None => {
                    let p = tree.parent(id);
                    prop_assert!(p.is_none() || tree.node(p.unwrap()).key.is_none());
                }
            }
        }
    }
}

// 2. Aggregation

proptest! {
    #[test]
    fn internal_values_sum_leaves(records in records_strategy()) {
        let tree = prepared(&records);
        for n in &tree.nodes {
            if !n.is_leaf() {
                let v = n.value().expect("aggregated");
                prop_assert!((v - leaf_sum(&tree, n.id)).abs() < 1e-6);
            }
        }
    }
}

// 3. Containment and non-overlap

proptest! {
    #[test]
    fn tiles_nest_without_overlap(
        records in records_strategy(),
        w in 50.0f64..2000.0,
        h in 50.0f64..2000.0,
    ) {
        let tree = prepared(&records);
        let engine = LayoutEngine::new(w, h);
        let layout = engine.layout(&tree, tree.root, engine.bounds());
        for id in &layout.order {
            let parent = layout.rect(*id).unwrap();
            let kids: Vec<NodeId> = layout.children_of(*id).collect();
            let eps = 1e-9 * (1.0 + parent.w.max(parent.h));
            for (i, a) in kids.iter().enumerate() {
                let ra = layout.rect(*a).unwrap();
                prop_assert!(parent.contains_rect(&ra, eps), "{:?} outside {:?}", ra, parent);
                for b in &kids[i + 1..] {
                    let rb = layout.rect(*b).unwrap();
                    prop_assert!(ra.overlap_area(&rb) <= eps * parent.area().max(1.0));
                }
            }
        }
    }
}

// 4. Area proportionality

proptest! {
    #[test]
    fn area_tracks_value(records in records_strategy()) {
        let tree = prepared(&records);
        let engine = LayoutEngine::new(1060.0, 580.0);
        let layout = engine.layout(&tree, tree.root, engine.bounds());
        for id in &layout.order {
            let parent = layout.rect(*id).unwrap();
            let total = tree.weight(*id);
            if parent.area() <= 0.0 || total <= 0.0 {
                continue;
            }
            for c in layout.children_of(*id) {
                let share = layout.rect(c).unwrap().area() / parent.area();
                let expected = tree.weight(c) / total;
                prop_assert!((share - expected).abs() < 1e-6, "share {} expected {}", share, expected);
            }
        }
    }
}
