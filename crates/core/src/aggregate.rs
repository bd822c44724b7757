use crate::escape::unescape;
use crate::hierarchy::Forest;
use crate::model::{NodeId, NodeKind, Scalar, Tree, TreeNode};

/// Name given to the wrapper root when the input has several natural roots.
pub const SYNTHETIC_ROOT: &str = "Top";

/// Turn a linked forest into the typed tree.
///
/// Unescapes names, parses leaf values and row indices, and marks internal
/// nodes as pending aggregation. Returns `None` when there is nothing to show.
pub fn normalize(forest: &Forest) -> Option<Tree> {
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(forest.records.len() + 1);
    let root = match forest.roots.as_slice() {
        [] => return None,
        [only] => {
            push_subtrees(forest, &[*only], None, &mut nodes);
            NodeId(0)
        }
        many => {
            let root = NodeId(0);
            nodes.push(TreeNode {
                id: root,
                key: None,
                parent: None,
                name: SYNTHETIC_ROOT.to_string(),
                kind: NodeKind::Internal {
                    children: Vec::new(),
                    value: None,
                },
            });
            push_subtrees(forest, many, Some(root), &mut nodes);
            root
        }
    };
    let tree = Tree { root, nodes };
    let bad = tree.malformed_leaves();
    if !bad.is_empty() {
        tracing::warn!(count = bad.len(), "leaf values that are not numbers");
    }
    Some(tree)
}

/// Append the subtrees under `tops` in pre-order, attaching each node to its
/// parent's child list. Only a parentless node is the tree root.
fn push_subtrees(forest: &Forest, tops: &[usize], parent: Option<NodeId>, nodes: &mut Vec<TreeNode>) {
    let mut stack: Vec<(usize, Option<NodeId>)> = tops.iter().rev().map(|&slot| (slot, parent)).collect();
    while let Some((slot, parent)) = stack.pop() {
        let record = &forest.records[slot];
        let id = NodeId(nodes.len() as u64);
        let kind = if forest.has_children(slot) {
            stack.extend(forest.children[slot].iter().rev().map(|&c| (c, Some(id))));
            NodeKind::Internal {
                children: Vec::new(),
                value: None,
            }
        } else {
            let value = record.value.as_ref().map_or(f64::NAN, parse_float);
            let index = match parent {
                Some(_) => record.index.as_ref().and_then(parse_int),
                None => None,
            };
            NodeKind::Leaf { value, index }
        };
        if let Some(p) = parent {
            if let NodeKind::Internal { children, .. } = &mut nodes[p.0 as usize].kind {
                children.push(id);
            }
        }
        nodes.push(TreeNode {
            id,
            key: Some(record.key()),
            parent,
            name: unescape(&record.name),
            kind,
        });
    }
}

fn parse_float(raw: &Scalar) -> f64 {
    match raw {
        Scalar::Int(i) => *i as f64,
        Scalar::Float(f) => *f,
        Scalar::Text(s) => parse_float_prefix(s),
        Scalar::Bool(_) => f64::NAN,
    }
}

/// Longest leading decimal number, like `parseFloat`: `"12abc"` is 12,
/// `"1,000"` is 1. Only the spelled-out `Infinity` is infinite; anything
/// without a numeric prefix is NaN.
fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if b[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    let int_end = digits_from(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa || frac_end > end + 1 {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return f64::NAN;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Leading-digits integer parse: `"12abc"` reads as 12, `"x"` as nothing.
fn parse_int(raw: &Scalar) -> Option<usize> {
    match raw {
        Scalar::Int(i) => usize::try_from(*i).ok(),
        Scalar::Float(f) if f.is_finite() && *f >= 0.0 => Some(f.trunc() as usize),
        Scalar::Text(s) => {
            let s = s.trim_start();
            let digits = s.bytes().take_while(u8::is_ascii_digit).count();
            s[..digits].parse().ok()
        }
        _ => None,
    }
}

/// Fill in every internal value bottom-up and return the root's total.
pub fn accumulate(tree: &mut Tree) -> f64 {
    let order = tree.descendants(tree.root);
    for &id in order.iter().rev() {
        let sum = match &tree.nodes[id.0 as usize].kind {
            NodeKind::Leaf { .. } => continue,
            NodeKind::Internal { children, .. } => children
                .iter()
                .map(|c| tree.nodes[c.0 as usize].value().unwrap_or(f64::NAN))
                .fold(0.0, |acc, v| acc + v),
        };
        if let NodeKind::Internal { value, .. } = &mut tree.nodes[id.0 as usize].kind {
            *value = Some(sum);
        }
    }
    tree.node(tree.root).value().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;
    use crate::model::Record;

    fn rec(id: i64, parent: Option<i64>, name: &str, value: Option<&str>) -> Record {
        let r = Record::new(id, parent.map(Scalar::Int), name);
        match value {
            Some(v) => r.with_value(v),
            None => r,
        }
    }

    fn scenario_a() -> Vec<Record> {
        vec![
            rec(1, None, "A", None),
            rec(2, Some(1), "leaf1", Some("3")).with_index(0),
            rec(3, Some(1), "leaf2", Some("7")).with_index(1),
        ]
    }

    #[test]
    fn single_root_is_not_wrapped() {
        let tree = normalize(&build(scenario_a())).unwrap();
        let root = tree.node(tree.root);
        assert_eq!(root.name, "A");
        assert_eq!(root.key.as_deref(), Some("1"));
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.value(), None);
    }

    #[test]
    fn several_roots_get_a_top_wrapper() {
        let tree = normalize(&build(vec![
            rec(1, None, "A", Some("1")),
            rec(2, None, "B", Some("2")),
        ]))
        .unwrap();
        let root = tree.node(tree.root);
        assert_eq!(root.name, SYNTHETIC_ROOT);
        assert_eq!(root.key, None);
        let names: Vec<&str> = root
            .children()
            .iter()
            .map(|c| tree.node(*c).name.as_str())
            .collect();
        assert_eq!(names, ["A", "B"]);
        assert!(root
            .children()
            .iter()
            .all(|c| tree.parent(*c) == Some(tree.root)));
    }

    #[test]
    fn no_roots_means_nothing() {
        assert!(normalize(&build(Vec::new())).is_none());
    }

    #[test]
    fn accumulate_sums_leaves() {
        let mut tree = normalize(&build(scenario_a())).unwrap();
        assert_eq!(accumulate(&mut tree), 10.0);
        assert_eq!(tree.node(tree.root).value(), Some(10.0));
        let leaves: Vec<f64> = tree
            .node(tree.root)
            .children()
            .iter()
            .filter_map(|c| tree.node(*c).value())
            .collect();
        assert_eq!(leaves, [3.0, 7.0]);
    }

    #[test]
    fn nested_sums_and_indices() {
        let mut tree = normalize(&build(vec![
            rec(1, None, "A", None),
            rec(2, Some(1), "B", None),
            rec(3, Some(2), "x", Some("1.5")).with_index(4),
            rec(4, Some(2), "y", Some("-0.5")).with_index(5),
            rec(5, Some(1), "z", Some("2")).with_index(6),
        ]))
        .unwrap();
        assert_eq!(accumulate(&mut tree), 3.0);
        let b = tree.node(tree.root).children()[0];
        assert_eq!(tree.node(b).value(), Some(1.0));
        let x = tree.node(b).children()[0];
        assert_eq!(tree.node(x).index(), Some(4));
    }

    #[test]
    fn malformed_value_is_nan_not_corrected() {
        let mut tree = normalize(&build(vec![
            rec(1, None, "A", None),
            rec(2, Some(1), "bad", Some("abc")),
            rec(3, Some(1), "ok", Some("1")),
        ]))
        .unwrap();
        assert_eq!(tree.malformed_leaves().len(), 1);
        assert!(accumulate(&mut tree).is_nan());
    }

    #[test]
    fn names_are_unescaped() {
        let tree = normalize(&build(vec![rec(1, None, "A &amp; B", Some("1"))])).unwrap();
        assert_eq!(tree.node(tree.root).name, "A & B");
    }

    #[test]
    fn value_parses_leading_number() {
        let f = |s: &str| parse_float(&Scalar::Text(s.into()));
        assert_eq!(f("12abc"), 12.0);
        assert_eq!(f("1,000"), 1.0);
        assert_eq!(f("  -2.5e2x"), -250.0);
        assert_eq!(f(".5"), 0.5);
        assert_eq!(f("3e"), 3.0);
        assert_eq!(f("-Infinity"), f64::NEG_INFINITY);
        assert!(f("inf").is_nan());
        assert!(f("infinity").is_nan());
        assert!(f("").is_nan());
        assert!(f("-.").is_nan());
    }

    #[test]
    fn prefixed_values_sum_like_numbers() {
        let mut tree = normalize(&build(vec![
            rec(1, None, "A", None),
            rec(2, Some(1), "x", Some("12abc")),
            rec(3, Some(1), "y", Some("1,000")),
        ]))
        .unwrap();
        assert!(tree.malformed_leaves().is_empty());
        assert_eq!(accumulate(&mut tree), 13.0);
    }

    #[test]
    fn deep_chain_builds_and_sums() {
        let depth = 100_000;
        let mut records = vec![rec(1, None, "n1", None)];
        for i in 2..=depth {
            let value = (i == depth).then_some("5");
            records.push(rec(i, Some(i - 1), "n", value));
        }
        let mut tree = normalize(&build(records)).unwrap();
        assert_eq!(tree.len(), depth as usize);
        assert_eq!(accumulate(&mut tree), 5.0);
        assert_eq!(tree.node(NodeId(1)).value(), Some(5.0));
    }

    #[test]
    fn index_parses_leading_digits() {
        assert_eq!(parse_int(&Scalar::Text("12abc".into())), Some(12));
        assert_eq!(parse_int(&Scalar::Text(" 7".into())), Some(7));
        assert_eq!(parse_int(&Scalar::Text("x1".into())), None);
        assert_eq!(parse_int(&Scalar::Int(-1)), None);
    }

    #[test]
    fn root_leaf_has_no_index() {
        let tree = normalize(&build(vec![rec(1, None, "solo", Some("4")).with_index(3)])).unwrap();
        assert_eq!(tree.node(tree.root).index(), None);
        assert_eq!(tree.node(tree.root).value(), Some(4.0));
    }
}
