//! hx CSS - cascaded style resolution
//!
//! Computes one effective [`Style`] per element by cascading, lowest
//! priority first:
//! 1. the parent's resolved style
//! 2. the tag rule (`td`)
//! 3. class rules (`.total`, then `td.total`, per class in attribute order)
//! 4. the inline `style` attribute
//!
//! Results are memoized per document in a [`StyleMap`].

mod config;
mod declaration;
mod element;
mod fingerprint;
mod merge;
pub mod properties;
mod rules;
mod shared;
mod style;
mod style_map;
mod translate;

pub use config::{InlineErrorPolicy, ResolverConfig};
pub use declaration::{Declaration, DeclarationParser, InlineStyleParser};
pub use element::StyledElement;
pub use fingerprint::{fingerprint, KeyId, StyleKey};
pub use merge::merge_styles;
pub use rules::{is_simple_selector, RuleTable};
pub use shared::SharedStyleMap;
pub use style::Style;
pub use style_map::{CacheStats, ComputedStyles, StyleMap};
pub use translate::{DeclarationTranslator, PropertyTranslator};

/// CSS error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    Stylesheet { line: u32, message: String },

    #[error("Invalid declaration at {line}:{column}: {message}")]
    Declaration {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Failed to serialize CSS: {0}")]
    Serialize(String),

    #[error("Style cache exhausted: more distinct element keys than ids")]
    TooManyStyles,

    #[error("Invalid inline style on <{element}>: {style:?}")]
    InlineStyle {
        element: String,
        style: String,
        #[source]
        source: Box<CssError>,
    },
}
