//! Arena-backed record trees.
//!
//! A [`Record`] is one fetched content item. Its nodes live in a flat arena
//! and refer to their children by [`NodeId`], so a node's identity is its
//! index rather than its value. Records decoded from JSON are always trees,
//! but the low-level constructors allow a child to point back at an
//! ancestor, which is how self-referencing content is modeled.

use serde_json::{Number, Value};

/// Fallback display title when a record has no name, title or slug.
pub const UNTITLED: &str = "Untitled";

/// Fallback slug when a record has none.
pub const NO_SLUG: &str = "N/A";

/// Stable identity of a node within one [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single value in a record tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// JSON `null`
    Null,
    /// Boolean leaf
    Bool(bool),
    /// Numeric leaf
    Number(Number),
    /// String leaf
    String(String),
    /// Ordered list of children
    Array(Vec<NodeId>),
    /// Ordered field-name to child mapping
    Object(Vec<(String, NodeId)>),
}

/// One fetched content item.
#[derive(Debug, Clone)]
pub struct Record {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Record {
    /// Create a record whose root is the given node.
    #[must_use]
    pub fn with_root(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Build a record from a decoded JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let mut record = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = record.insert_json(value);
        record.root = root;
        record
    }

    fn insert_json(&mut self, value: &Value) -> NodeId {
        let node = match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => Node::Number(n.clone()),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(items) => {
                let children = items.iter().map(|item| self.insert_json(item)).collect();
                Node::Array(children)
            }
            Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(key, item)| (key.clone(), self.insert_json(item)))
                    .collect();
                Node::Object(fields)
            }
        };
        self.push(node)
    }

    /// Append a node to the arena and return its id.
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Id of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Make another node the root.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this record.
    pub fn set_root(&mut self, id: NodeId) {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        self.root = id;
    }

    /// Look up a node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this record.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to a node, used to link children after insertion.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this record.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Top-level field of an object root.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Node> {
        match self.node(self.root) {
            Node::Object(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, id)| self.node(*id)),
            _ => None,
        }
    }

    /// Top-level string field, ignoring empty strings.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        match self.field(name) {
            Some(Node::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Display title: `name`, then `title`, then `slug`, then `"Untitled"`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.str_field("name")
            .or_else(|| self.str_field("title"))
            .or_else(|| self.str_field("slug"))
            .unwrap_or(UNTITLED)
    }

    /// Slug, or `"N/A"` when absent.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.str_field("slug").unwrap_or(NO_SLUG)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

impl From<&Value> for Record {
    fn from(value: &Value) -> Self {
        Self::from_json(value)
    }
}
