use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl Default for NodeId {
    fn default() -> Self {
        NodeId(0)
    }
}

/// A JSON scalar that may arrive as either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

/// One row of the flat input hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Scalar,
    #[serde(default)]
    pub parent: Option<Scalar>,
    pub name: String,
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub index: Option<Scalar>,
}

impl Record {
    pub fn new(id: impl Into<Scalar>, parent: Option<Scalar>, name: &str) -> Self {
        Self {
            id: id.into(),
            parent,
            name: name.to_string(),
            value: None,
            index: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(Scalar::Text(value.to_string()));
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(Scalar::Int(index as i64));
        self
    }

    pub fn key(&self) -> String {
        self.id.as_text()
    }

    /// Parent key, with empty strings treated as "no parent".
    /// Parent id, if any. Falsy parents (`""`, `0`, `false`) mark a root.
    pub fn parent_key(&self) -> Option<String> {
        match self.parent.as_ref()? {
            Scalar::Int(0) | Scalar::Bool(false) => None,
            Scalar::Float(f) if *f == 0.0 || f.is_nan() => None,
            p => Some(p.as_text()).filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf {
        value: f64,
        index: Option<usize>,
    },
    /// `value` stays `None` until aggregation has run.
    Internal {
        children: Vec<NodeId>,
        value: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub key: Option<String>,
    pub parent: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Internal { children, .. } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Leaf value, or the aggregated sum for internal nodes.
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Leaf { value, .. } => Some(value),
            NodeKind::Internal { value, .. } => value,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Leaf { index, .. } => index,
            NodeKind::Internal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tree {
    pub root: NodeId,
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Node value with pending or malformed values read as zero, the way the
    /// layout weighs siblings.
    pub fn weight(&self, id: NodeId) -> f64 {
        match self.get(id).and_then(TreeNode::value) {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// Dotted name path from the root, e.g. `Top.A.B`.
    pub fn path_name(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .map(|a| self.node(a).name.as_str())
            .collect();
        if let Some(n) = self.get(id) {
            names.push(&n.name);
        }
        names.join(".")
    }

    /// Leaves whose value could not be parsed.
    pub fn malformed_leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf { value, .. } if value.is_nan()))
            .map(|n| n.id)
            .collect()
    }

    /// Pre-order walk starting at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let Some(n) = self.get(cur) {
                stack.extend(n.children().iter().rev().copied());
            }
        }
        out
    }
}
