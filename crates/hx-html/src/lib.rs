//! hx HTML Parser
//!
//! HTML5 parsing built on html5ever, producing an [`hx_dom::DomTree`].

mod parser;

pub use parser::HtmlParser;

use hx_dom::DomTree;

/// Parse an HTML string into an element tree
pub fn parse(html: &str) -> Result<DomTree, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tree: {0}")]
    Dom(#[from] hx_dom::DomError),
}
