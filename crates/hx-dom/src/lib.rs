//! hx DOM - element tree
//!
//! Arena-allocated element tree consumed by the style resolver.
//! Nodes are addressed by [`NodeId`] and never move once created.

mod node;
mod tree;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Descendants, DomTree, ElementRef};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tree manipulation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    #[error("node {child:?} already has a parent")]
    AlreadyAttached { child: NodeId },
    #[error("cannot append {child:?} to itself or one of its descendants")]
    HierarchyRequest { child: NodeId },
}
