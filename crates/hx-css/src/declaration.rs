//! Inline declaration parsing
//!
//! Splits `style="..."` text into property/value pairs. The resolver only
//! sees the [`DeclarationParser`] trait; [`InlineStyleParser`] is the
//! lightningcss-backed default.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::stylesheet::ParserOptions;

use crate::CssError;

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercase property name
    pub property: String,
    /// Serialized value
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Turns raw inline style text into an ordered list of declarations
pub trait DeclarationParser {
    fn parse(&self, text: &str) -> Result<Vec<Declaration>, CssError>;
}

impl<F> DeclarationParser for F
where
    F: Fn(&str) -> Result<Vec<Declaration>, CssError>,
{
    fn parse(&self, text: &str) -> Result<Vec<Declaration>, CssError> {
        self(text)
    }
}

/// Declaration parser using lightningcss
///
/// Declarations come back in source order, with `!important` ones after
/// the normal ones. Malformed text is an error rather than being skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyleParser;

impl InlineStyleParser {
    pub fn new() -> Self {
        Self
    }
}

impl DeclarationParser for InlineStyleParser {
    fn parse(&self, text: &str) -> Result<Vec<Declaration>, CssError> {
        let block = DeclarationBlock::parse_string(text, ParserOptions::default()).map_err(|e| {
            CssError::Declaration {
                line: e.location.line,
                column: e.location.column,
                message: format!("{:?}", e.kind),
            }
        })?;
        declarations_from_block(&block)
    }
}

/// Flatten a parsed block, normal declarations first
pub(crate) fn declarations_from_block(
    block: &DeclarationBlock<'_>,
) -> Result<Vec<Declaration>, CssError> {
    block
        .declarations
        .iter()
        .chain(block.important_declarations.iter())
        .map(convert_property)
        .collect()
}

fn convert_property(property: &Property<'_>) -> Result<Declaration, CssError> {
    let value = property
        .value_to_css_string(PrinterOptions::default())
        .map_err(|e| CssError::Serialize(e.to_string()))?;
    let name = property.property_id().name().to_ascii_lowercase();
    Ok(Declaration {
        property: name,
        value,
    })
}
