//! DOM Tree (arena-based allocation)

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node; elements hang below it.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree, document node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let child_node = self.get(child).ok_or(DomError::NotFound(child))?;
        if child_node.parent.is_valid() {
            return Err(DomError::AlreadyAttached { child });
        }
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.ancestors_inclusive(parent).any(|id| id == child) {
            return Err(DomError::HierarchyRequest { child });
        }

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Create an element and append it to `parent` in one step
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(name);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Set an attribute on an element node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let elem = self
            .get_mut(id)
            .and_then(Node::as_element_mut)
            .ok_or(DomError::NotFound(id))?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Borrow an element as a lightweight handle
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        let data = self.get(id)?.as_element()?;
        Some(ElementRef {
            tree: self,
            id,
            data,
        })
    }

    /// Direct children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::successors(Some(first).filter(|c| c.is_valid()), move |&c| {
            Some(self.nodes[c.index()].next_sibling).filter(|n| n.is_valid())
        })
    }

    /// `id` followed by its ancestors up to the document node
    fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id).filter(|n| n.is_valid()), move |&n| {
            Some(self.nodes[n.index()].parent).filter(|p| p.is_valid())
        })
    }

    /// Pre-order walk of the subtree rooted at `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            root: id,
            next: first,
        }
    }

    /// Concatenated text of every text node below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.nodes[n.index()].as_text())
            .collect()
    }

    /// All elements with the given tag name, in document order
    pub fn elements_by_tag<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.descendants(NodeId::ROOT)
            .filter_map(|id| self.element(id))
            .filter(move |e| e.tag_name().eq_ignore_ascii_case(name))
    }
}

/// Pre-order iterator that follows sibling and parent links, no stack needed
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }
        let node = &self.tree.nodes[current.index()];
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

/// Borrowed handle to an element node
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    #[inline]
    pub fn data(&self) -> &'a ElementData {
        self.data
    }

    /// Lowercase tag name
    #[inline]
    pub fn tag_name(&self) -> &'a str {
        &self.data.name
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data.get_attr(name)
    }

    /// Closest ancestor that is an element (None below the document node)
    pub fn parent_element(&self) -> Option<ElementRef<'a>> {
        let parent = self.tree.get(self.id)?.parent;
        self.tree.element(parent)
    }

    /// Child elements, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id).filter_map(move |c| tree.element(c))
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
