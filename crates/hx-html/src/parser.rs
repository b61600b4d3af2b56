//! HTML5 Parser implementation
//!
//! Parses into html5ever's RcDom, then copies the element structure into
//! our arena tree. The copy walks an explicit stack so deeply nested
//! markup cannot exhaust the call stack.

use crate::HtmlError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use hx_dom::{DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    keep_comments: bool,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Also copy comment nodes into the tree
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parse an HTML document
    pub fn parse(&self, html: &str) -> Result<DomTree, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut tree = DomTree::new();
        self.convert(&dom.document, &mut tree)?;

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(tree)
    }

    fn convert(&self, document: &Handle, tree: &mut DomTree) -> Result<(), HtmlError> {
        let mut stack: Vec<(Handle, NodeId)> = Vec::new();
        Self::push_children(document, NodeId::ROOT, &mut stack);

        while let Some((handle, parent)) = stack.pop() {
            match &handle.data {
                RcNodeData::Element { name, attrs, .. } => {
                    let id = tree.create_element(&name.local);
                    for attr in attrs.borrow().iter() {
                        tree.set_attr(id, &attr.name.local, &attr.value)?;
                    }
                    tree.append_child(parent, id)?;
                    Self::push_children(&handle, id, &mut stack);
                }
                RcNodeData::Text { contents } => {
                    let text = contents.borrow();
                    if !text.trim().is_empty() {
                        let id = tree.create_text(&text);
                        tree.append_child(parent, id)?;
                    }
                }
                RcNodeData::Comment { contents } if self.keep_comments => {
                    let id = tree.create_comment(contents);
                    tree.append_child(parent, id)?;
                }
                RcNodeData::Document => Self::push_children(&handle, parent, &mut stack),
                // Doctype and processing instructions carry no styling
                _ => {}
            }
        }
        Ok(())
    }

    /// Push children in reverse so they pop in document order
    fn push_children(handle: &Handle, parent: NodeId, stack: &mut Vec<(Handle, NodeId)>) {
        let children = handle.children.borrow();
        stack.extend(children.iter().rev().map(|c| (c.clone(), parent)));
    }
}
