//! Arena-backed labeled tree.
//!
//! Nodes are addressed by [`NodeId`] handles into the owning
//! [`DescriptorTree`]. There is no way to remove a node or an attribute,
//! so everything built on this type can only add structure.
//!
//! Besides elements the arena holds the text, comments and processing
//! instructions of a document as content nodes, so a parsed skeleton can
//! be written back without losing them. Element navigation
//! ([`DescriptorTree::children`], [`DescriptorTree::find_children`], ...)
//! only ever yields elements.

/// Handle to a node inside a [`DescriptorTree`].
///
/// Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A tagged element with attributes and children.
    Element,
    /// Character data; the node's value is the unescaped text.
    Text,
    /// `<!--value-->`.
    Comment,
    /// `<?value?>`.
    Instruction,
    /// `<!DOCTYPE value>`; only found before the root element.
    Doctype,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    /// Tag for elements, content for everything else.
    value: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A rooted, ordered tree of tagged nodes with string attributes.
///
/// Equality is structural: two trees are equal when their documents are,
/// regardless of the order nodes were created in.
#[derive(Debug, Clone)]
pub struct DescriptorTree {
    nodes: Vec<Node>,
    /// Comments, instructions and doctype before the root element.
    prologue: Vec<NodeId>,
    /// Comments and instructions after the root element.
    epilogue: Vec<NodeId>,
}

/// Tag without its namespace prefix (`jbds:module` -> `module`).
pub fn local_name(tag: &str) -> &str {
    tag.rsplit_once(':').map_or(tag, |(_, local)| local)
}

/// `local` in the namespace prefix of `tag` (`jbds:deployment`, `module`
/// -> `jbds:module`); unprefixed when `tag` has no prefix.
pub fn prefixed_like(tag: &str, local: &str) -> String {
    match tag.rsplit_once(':') {
        Some((prefix, _)) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

impl DescriptorTree {
    /// Create a tree holding only a root node.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element, root_tag)],
            prologue: Vec::new(),
            epilogue: Vec::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root and content nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kind of a node.
    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.0].kind
    }

    /// Tag of an element as written (prefix included), or the content of
    /// any other node.
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    /// Content of a text, comment, instruction or doctype node.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        let node = &self.nodes[node.0];
        match node.kind {
            NodeKind::Element => None,
            _ => Some(node.value.as_str()),
        }
    }

    /// Tag of a node without namespace prefix.
    pub fn local_tag(&self, node: NodeId) -> &str {
        local_name(self.tag(node))
    }

    /// Every child of a node in document order, content nodes included.
    pub fn contents(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0].children.iter().copied()
    }

    /// Element children of a node in document order.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.contents(node).filter(move |&c| self.kind(c) == NodeKind::Element)
    }

    /// Children whose local tag is `tag`.
    pub fn find_children<'a>(
        &'a self,
        node: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(node).filter(move |&c| self.local_tag(c) == tag)
    }

    /// First child with local tag `tag` and, if given, attribute `key == value`.
    pub fn find_child(
        &self,
        node: NodeId,
        tag: &str,
        filter: Option<(&str, &str)>,
    ) -> Option<NodeId> {
        self.find_children(node, tag).find(|&child| match filter {
            Some((key, value)) => self.attribute(child, key) == Some(value),
            None => true,
        })
    }

    /// All elements below `node` (depth first, document order) with local tag `tag`.
    pub fn descendants_with_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).collect();
        stack.reverse();

        while let Some(current) = stack.pop() {
            if self.local_tag(current) == tag {
                found.push(current);
            }
            let mut next: Vec<NodeId> = self.children(current).collect();
            next.reverse();
            stack.extend(next);
        }

        found
    }

    /// Append a new element to `node`.
    pub fn create_child(&mut self, node: NodeId, tag: &str) -> NodeId {
        let id = self.push_node(NodeKind::Element, tag);
        self.nodes[node.0].children.push(id);
        id
    }

    /// Insert a new element before all existing content of `node`.
    pub fn create_first_child(&mut self, node: NodeId, tag: &str) -> NodeId {
        let id = self.push_node(NodeKind::Element, tag);
        self.nodes[node.0].children.insert(0, id);
        id
    }

    /// Append a comment, instruction or text node to `node`.
    ///
    /// Text following a text node extends it instead.
    pub fn append_content(&mut self, node: NodeId, kind: NodeKind, value: &str) -> NodeId {
        if kind == NodeKind::Text {
            if let Some(&last) = self.nodes[node.0].children.last() {
                if self.kind(last) == NodeKind::Text {
                    self.nodes[last.0].value.push_str(value);
                    return last;
                }
            }
        }
        let id = self.push_node(kind, value);
        self.nodes[node.0].children.push(id);
        id
    }

    fn push_node(&mut self, kind: NodeKind, value: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, value));
        id
    }

    /// Attribute value of a node.
    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes of a node in insertion order.
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        &self.nodes[node.0].attributes
    }

    /// Set an attribute, replacing an existing value for the same key.
    pub fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) {
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Text directly inside a node, all text children joined.
    pub fn text(&self, node: NodeId) -> Option<String> {
        let mut text: Option<String> = None;
        for child in self.contents(node) {
            if self.kind(child) == NodeKind::Text {
                text.get_or_insert_with(String::new)
                    .push_str(&self.nodes[child.0].value);
            }
        }
        text
    }

    /// Append text content to a node.
    pub fn append_text(&mut self, node: NodeId, text: &str) {
        self.append_content(node, NodeKind::Text, text);
    }

    /// Nodes outside the root element: `(before, after)`.
    pub fn outer_contents(&self) -> (&[NodeId], &[NodeId]) {
        (&self.prologue, &self.epilogue)
    }

    /// Add a comment, instruction or doctype outside the root element.
    pub fn push_outer(&mut self, kind: NodeKind, value: &str, after_root: bool) -> NodeId {
        let id = self.push_node(kind, value);
        if after_root {
            self.epilogue.push(id);
        } else {
            self.prologue.push(id);
        }
        id
    }

    fn same_node(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (left, right) = (&self.nodes[a.0], &other.nodes[b.0]);
        left.kind == right.kind
            && left.value == right.value
            && left.attributes == right.attributes
            && left.children.len() == right.children.len()
    }
}

impl PartialEq for DescriptorTree {
    fn eq(&self, other: &Self) -> bool {
        if self.prologue.len() != other.prologue.len()
            || self.epilogue.len() != other.epilogue.len()
        {
            return false;
        }

        let mut pending = vec![(self.root(), other.root())];
        pending.extend(self.prologue.iter().copied().zip(other.prologue.iter().copied()));
        pending.extend(self.epilogue.iter().copied().zip(other.epilogue.iter().copied()));

        while let Some((a, b)) = pending.pop() {
            if !self.same_node(a, other, b) {
                return false;
            }
            pending.extend(self.contents(a).zip(other.contents(b)));
        }
        true
    }
}

impl Eq for DescriptorTree {}
