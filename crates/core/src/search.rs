use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::{NodeId, Tree};

/// Internal node whose dotted path best matches `query`.
///
/// An exact path match wins outright; otherwise the highest fuzzy score,
/// shallower nodes first on ties.
pub fn find_group(tree: &Tree, query: &str) -> Option<NodeId> {
    let m = SkimMatcherV2::default();
    let mut best: Option<(i64, usize, NodeId)> = None;
    for id in tree.descendants(tree.root) {
        if tree.node(id).is_leaf() {
            continue;
        }
        let path = tree.path_name(id);
        if path == query {
            return Some(id);
        }
        let Some(score) = m.fuzzy_match(&path, query) else {
            continue;
        };
        let depth = tree.ancestors(id).len();
        let better = match best {
            None => true,
            Some((s, d, _)) => score > s || (score == s && depth < d),
        };
        if better {
            best = Some((score, depth, id));
        }
    }
    best.map(|(_, _, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::normalize;
    use crate::hierarchy::build;
    use crate::model::{Record, Scalar};

    fn tree() -> Tree {
        let p = |i| Some(Scalar::Int(i));
        normalize(&build(vec![
            Record::new(1, None, "Sales"),
            Record::new(2, p(1), "Europe"),
            Record::new(3, p(2), "France").with_value("1"),
            Record::new(4, p(1), "Asia"),
            Record::new(5, p(4), "Japan").with_value("2"),
        ]))
        .unwrap()
    }

    #[test]
    fn exact_path_wins() {
        let t = tree();
        let id = find_group(&t, "Sales.Europe").unwrap();
        assert_eq!(t.node(id).name, "Europe");
    }

    #[test]
    fn fuzzy_finds_groups_only() {
        let t = tree();
        let id = find_group(&t, "asia").unwrap();
        assert_eq!(t.node(id).name, "Asia");
        assert_eq!(find_group(&t, "zzz"), None);
    }
}
