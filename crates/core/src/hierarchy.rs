use std::collections::HashMap;

use crate::model::Record;

/// Records linked into parent/child lists, still in their raw form.
///
/// Slots are numbered by the first appearance of each id; a later record with
/// the same id replaces the slot's content but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub records: Vec<Record>,
    pub children: Vec<Vec<usize>>,
    pub roots: Vec<usize>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn has_children(&self, slot: usize) -> bool {
        self.children.get(slot).is_some_and(|c| !c.is_empty())
    }
}

/// Link a flat record list into a forest.
///
/// Lenient by policy: duplicate ids overwrite, dangling parents make a root,
/// nothing is reported as an error.
pub fn build(records: impl IntoIterator<Item = Record>) -> Forest {
    let mut slot_by_key: HashMap<String, usize> = HashMap::new();
    let mut slots: Vec<Record> = Vec::new();

    for record in records {
        let key = record.key();
        match slot_by_key.get(&key) {
            Some(&slot) => {
                tracing::debug!(id = %key, "duplicate record id, keeping the later one");
                slots[slot] = record;
            }
            None => {
                slot_by_key.insert(key, slots.len());
                slots.push(record);
            }
        }
    }

    let mut children = vec![Vec::new(); slots.len()];
    let mut roots = Vec::new();
    for (slot, record) in slots.iter().enumerate() {
        match record.parent_key() {
            Some(pk) => match slot_by_key.get(&pk) {
                Some(&p) if p == slot => {
                    tracing::debug!(id = %pk, "record names itself as parent, dropped");
                }
                Some(&p) => children[p].push(slot),
                None => {
                    tracing::debug!(id = %record.key(), parent = %pk, "dangling parent, treating as root");
                    roots.push(slot);
                }
            },
            None => roots.push(slot),
        }
    }

    Forest {
        records: slots,
        children,
        roots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;

    fn rec(id: i64, parent: Option<i64>, name: &str) -> Record {
        Record::new(id, parent.map(Scalar::Int), name)
    }

    #[test]
    fn links_children_in_input_order() {
        let f = build(vec![
            rec(1, None, "A"),
            rec(2, Some(1), "b"),
            rec(3, Some(1), "c"),
            rec(4, Some(3), "d"),
        ]);
        assert_eq!(f.roots, vec![0]);
        assert_eq!(f.children[0], vec![1, 2]);
        assert_eq!(f.children[2], vec![3]);
        assert!(f.has_children(2));
        assert!(!f.has_children(1));
    }

    #[test]
    fn child_before_parent_still_links() {
        let f = build(vec![rec(2, Some(1), "b"), rec(1, None, "A")]);
        assert_eq!(f.roots, vec![1]);
        assert_eq!(f.children[1], vec![0]);
    }

    #[test]
    fn duplicate_id_last_write_wins() {
        let f = build(vec![rec(1, None, "first"), rec(2, None, "B"), rec(1, None, "second")]);
        assert_eq!(f.records.len(), 2);
        assert_eq!(f.records[0].name, "second");
        assert_eq!(f.roots, vec![0, 1]);
    }

    #[test]
    fn dangling_parent_becomes_root() {
        let f = build(vec![rec(1, None, "A"), rec(2, Some(99), "lost")]);
        assert_eq!(f.roots, vec![0, 1]);
    }

    #[test]
    fn self_parent_is_orphaned() {
        let f = build(vec![rec(1, None, "A"), rec(2, Some(2), "loop")]);
        assert_eq!(f.roots, vec![0]);
        assert!(f.children.iter().all(|c| !c.contains(&1)));
    }

    #[test]
    fn two_record_cycle_is_unreachable() {
        let f = build(vec![rec(1, None, "A"), rec(2, Some(3), "B"), rec(3, Some(2), "C")]);
        assert_eq!(f.roots, vec![0]);
        assert_eq!(f.children[1], vec![2]);
        assert_eq!(f.children[2], vec![1]);

        let tree = crate::aggregate::normalize(&f).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root).name, "A");
    }

    #[test]
    fn cycle_alone_has_no_root() {
        let f = build(vec![rec(1, Some(2), "A"), rec(2, Some(1), "B")]);
        assert!(f.is_empty());
        assert!(crate::aggregate::normalize(&f).is_none());
    }

    #[test]
    fn empty_input_has_no_roots() {
        assert!(build(Vec::new()).is_empty());
    }
}
