use crate::crawler::{Request, Submission};
use crate::document::Node;
use scraper::ElementRef;
use std::ops::Deref;

/// An ordered group of nodes, usually the result of one search
#[derive(Debug, Clone, Default)]
pub struct NodeSet<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> NodeSet<'a> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Wraps raw elements as nodes of `request`, keeping their order
    pub fn wrap<I>(elements: I, request: &'a Request) -> Self
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        elements
            .into_iter()
            .map(|element| Node::new(element, request))
            .collect()
    }

    /// Returns one value per node that carries the attribute
    ///
    /// Nodes without the attribute contribute nothing, so the result may be
    /// shorter than the set. Order follows the set.
    pub fn attr(&self, name: &str) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|node| node.attr(name))
            .map(str::to_string)
            .collect()
    }

    /// Queues the `href` of every node, in set order
    ///
    /// Each node queues through its own request, so a set mixing nodes from
    /// different requests still queues each link on the right engine.
    pub fn queue(&self) -> Vec<Submission> {
        self.nodes.iter().filter_map(Node::queue).collect()
    }

    pub fn push(&mut self, node: Node<'a>) {
        self.nodes.push(node);
    }
}

impl<'a> Deref for NodeSet<'a> {
    type Target = [Node<'a>];

    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

impl<'a> FromIterator<Node<'a>> for NodeSet<'a> {
    fn from_iter<T: IntoIterator<Item = Node<'a>>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for NodeSet<'a> {
    type Item = Node<'a>;
    type IntoIter = std::vec::IntoIter<Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b NodeSet<'a> {
    type Item = &'b Node<'a>;
    type IntoIter = std::slice::Iter<'b, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
