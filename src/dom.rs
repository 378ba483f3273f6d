//! Filepath: src/dom.rs
//! Tagged-tree document model shared by every format strategy.
//!
//! A `Node` carries its own content plus an ordered list of children; a
//! `Link` is a directed edge between two *named* nodes. Everything
//! downstream (scorer, allocator, compressor) only ever sees this shape,
//! never the format that produced it.

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node
{
    /// Raw text for this node. May be empty for pure containers.
    pub content: String,

    /// Tag from a closed per-format enumeration, or one of the universal
    /// tags `document`, `section`, `line`, `chunk`.
    pub node_type: String,

    /// Unique target identifier. Only named nodes may be link endpoints.
    pub name: Option<String>,

    /// Ordered children; order is the traversal order.
    pub children: Vec<Node>,

    /// When true, content is pre-optimized and must be tail-truncated only.
    pub atomic: bool,

    /// 1-based line number in the originating file, for source-mapped formats.
    pub source_line: Option<usize>,
}

impl Node
{
    /// Build a leaf node with no name, no children, not atomic.
    pub fn new(
        content: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self
    {
        Self {
            content: content.into(),
            node_type: node_type.into(),
            name: None,
            children: Vec::new(),
            atomic: false,
            source_line: None,
        }
    }

    #[must_use]
    pub fn with_name(
        mut self,
        name: impl Into<String>,
    ) -> Self
    {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn atomic(mut self) -> Self
    {
        self.atomic = true;
        self
    }

    #[must_use]
    pub fn with_source_line(
        mut self,
        line: usize,
    ) -> Self
    {
        self.source_line = Some(line);
        self
    }

    pub fn add_child(
        &mut self,
        child: Node,
    )
    {
        self.children.push(child);
    }

    #[must_use]
    pub fn is_named(&self) -> bool
    {
        self.name.is_some()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool
    {
        self.children.is_empty()
    }

    /// Pre-order walk over this node and all descendants.
    pub fn iter_preorder(&self) -> PreorderIter<'_>
    {
        PreorderIter { stack: vec![self] }
    }

    /// Find the first named descendant (including self) with a matching name.
    #[must_use]
    pub fn find_named(
        &self,
        target: &str,
    ) -> Option<&Node>
    {
        self.iter_preorder()
            .find(|n| n.name.as_deref() == Some(target))
    }
}

pub struct PreorderIter<'a>
{
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreorderIter<'a>
{
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node>
    {
        let node = self.stack.pop()?;

        // Push children in reverse so traversal order matches child order.
        for child in node.children.iter().rev()
        {
            self.stack.push(child);
        }

        Some(node)
    }
}

/// A directed edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link
{
    pub source: String,
    pub target: String,
}

impl Link
{
    /// Construct a link between two named nodes.
    ///
    /// # Panics
    /// Panics if either endpoint is anonymous. This is a programmer error,
    /// not a recoverable runtime condition: linking through an anonymous
    /// node is an invariant violation with no sensible fallback.
    #[must_use]
    pub fn new(
        source: &Node,
        target: &Node,
    ) -> Self
    {
        assert!(source.is_named(), "link source must be a named node");
        assert!(target.is_named(), "link target must be a named node");

        Self {
            source: source.name.clone().expect("checked above"),
            target: target.name.clone().expect("checked above"),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn leaf_defaults()
    {
        let n = Node::new("hello", "line");
        assert!(n.is_leaf());
        assert!(!n.is_named());
        assert!(!n.atomic);
    }

    #[test]
    fn builder_chain()
    {
        let n = Node::new("x", "function")
            .with_name("foo")
            .atomic()
            .with_source_line(42);
        assert_eq!(n.name.as_deref(), Some("foo"));
        assert!(n.atomic);
        assert_eq!(n.source_line, Some(42));
    }

    #[test]
    fn preorder_visits_self_then_children_in_order()
    {
        let mut root = Node::new("", "document").with_name("root");
        root.add_child(Node::new("a", "line").with_name("a"));
        root.add_child(Node::new("b", "line").with_name("b"));

        let names: Vec<_> = root.iter_preorder().filter_map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["root", "a", "b"]);
    }

    #[test]
    fn find_named_descends() {
        let mut root = Node::new("", "document").with_name("root");
        let mut section = Node::new("", "section").with_name("s1");
        section.add_child(Node::new("x", "line").with_name("needle"));
        root.add_child(section);

        assert!(root.find_named("needle").is_some());
        assert!(root.find_named("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "link source must be a named node")]
    fn link_rejects_anonymous_source()
    {
        let a = Node::new("x", "line");
        let b = Node::new("y", "line").with_name("b");
        let _ = Link::new(&a, &b);
    }

    #[test]
    fn link_between_named_nodes()
    {
        let a = Node::new("x", "line").with_name("a");
        let b = Node::new("y", "line").with_name("b");
        let link = Link::new(&a, &b);
        assert_eq!(link.source, "a");
        assert_eq!(link.target, "b");
    }
}
