//! Arena-backed markup tree.
//!
//! Elements live in a flat `Vec` and refer to each other by [`NodeId`].
//! Hoisting the children of a nested group or dropping a property element is
//! an index splice on the parent's child list, never a deep copy.
//!
//! # Module Structure
//!
//! ```text
//! markup/
//! ├── mod.rs     # Document, Element, Attr (this file)
//! ├── parse.rs   # text -> Document (quick-xml reader)
//! └── write.rs   # Document -> text (quick-xml writer)
//! ```
//!
//! Names are kept exactly as written (`x:Key`, `sys:Double`). The dialect only
//! ever uses three namespaces, bound to fixed prefixes, so lookups compare
//! qualified names and [`Element::local_name`] is used where a prefix may
//! vary between writers.

mod parse;
mod write;

pub use parse::parse;
pub use write::write;

/// Default (presentation) namespace.
pub const NS_PRESENTATION: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";
/// Namespace bound to the `x` prefix.
pub const NS_XAML: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
/// Namespace bound to the `sys` prefix (numeric primitives).
pub const NS_SYSTEM: &str = "clr-namespace:System;assembly=mscorlib";

/// Identity-key attribute name.
pub const KEY_ATTR: &str = "x:Key";

/// Index of an element inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single attribute. Order inside an element is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element record. Structure (parent/children) is owned by the [`Document`].
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    /// Text content (only used by leaf resource entries like `<Color>`).
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: append an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(name, value));
        self
    }

    /// Builder: set text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Name without its prefix (`sys:Double` -> `Double`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Replace the value of an existing attribute or append a new one.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr::new(name, value)),
        }
    }
}

/// Strip the prefix of a qualified name.
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Markup document: an arena of elements plus the root index.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root is `root`.
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// Add a detached element to the arena.
    pub fn add(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            parent: None,
            children: Vec::new(),
            ..element
        });
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Children whose local name equals `name`.
    pub fn children_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).local_name() == name)
            .collect()
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at `index` in the child list of `parent`.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `node` immediately before `sibling`. No-op if `sibling` is detached.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        if let Some((parent, pos)) = self.position(sibling) {
            self.insert_at(parent, pos, node);
        }
    }

    /// Insert `node` immediately after `sibling`. No-op if `sibling` is detached.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        if let Some((parent, pos)) = self.position(sibling) {
            self.insert_at(parent, pos + 1, node);
        }
    }

    /// Remove `id` from its parent. The record stays in the arena, unreachable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Replace `child` in its parent's child list by its own children.
    pub fn unwrap_into_parent(&mut self, child: NodeId) {
        let Some((parent, pos)) = self.position(child) else {
            return;
        };
        let grandchildren = std::mem::take(&mut self.nodes[child.0].children);
        for &gc in &grandchildren {
            self.nodes[gc.0].parent = Some(parent);
        }
        let children = &mut self.nodes[parent.0].children;
        children.remove(pos);
        for (offset, gc) in grandchildren.into_iter().enumerate() {
            children.insert(pos + offset, gc);
        }
        self.nodes[child.0].parent = None;
    }

    /// Parent and index of `id` in the parent's child list.
    fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[id.0].parent?;
        let pos = self.nodes[parent.0].children.iter().position(|&c| c == id)?;
        Some((parent, pos))
    }

    /// All descendants of `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its descendants in document order.
    pub fn descendants_and_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        out.extend(self.descendants(id));
        out
    }

    /// Value of the identity key of `id`, if any.
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.get(id).attr(KEY_ATTR)
    }

    /// Keys of every reachable element, in document order.
    pub fn keys(&self) -> Vec<&str> {
        self.descendants_and_self(self.root)
            .into_iter()
            .filter_map(|id| self.key(id))
            .collect()
    }
}
