//! Declaration translation
//!
//! Converts one parsed declaration into a one-property [`Style`], coercing
//! the raw value into the property's domain.

use crate::declaration::Declaration;
use crate::properties::{Color, ColorProperty, PropertyKey, StringProperty};
use crate::Style;

/// Maps a declaration onto the typed property set
pub trait DeclarationTranslator {
    /// Returns an empty style for unknown properties or unusable values
    fn translate(&self, declaration: &Declaration) -> Style;
}

impl<F> DeclarationTranslator for F
where
    F: Fn(&Declaration) -> Style,
{
    fn translate(&self, declaration: &Declaration) -> Style {
        self(declaration)
    }
}

/// Default translator for the exporter's property set
///
/// A `border-color` with two to four values is spread over the four
/// `border-*-color` sides in CSS box order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTranslator;

impl PropertyTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl DeclarationTranslator for PropertyTranslator {
    fn translate(&self, declaration: &Declaration) -> Style {
        let name = declaration.property.trim().to_ascii_lowercase();
        let value = declaration.value.trim();
        let mut style = Style::new();

        if value.is_empty() {
            tracing::trace!("Ignoring empty value for {}", name);
            return style;
        }

        match PropertyKey::from_name(&name) {
            Some(PropertyKey::Color(ColorProperty::BorderColor))
                if value.contains(char::is_whitespace) =>
            {
                match border_sides(value) {
                    Some(sides) => {
                        for (property, color) in BORDER_SIDES.into_iter().zip(sides) {
                            style.set_color(property, color);
                        }
                    }
                    None => tracing::trace!("Unparseable colors {:?} for {}", value, name),
                }
            }
            Some(PropertyKey::Color(property)) => match Color::parse(value) {
                Some(color) => style.set_color(property, color),
                None => tracing::trace!("Unparseable color {:?} for {}", value, name),
            },
            Some(PropertyKey::String(property)) => {
                style.set_string(property, normalize_keyword(property, value));
            }
            Some(PropertyKey::Integer(property)) => match parse_integer(value) {
                Some(n) => style.set_integer(property, n),
                None => tracing::trace!("Unparseable integer {:?} for {}", value, name),
            },
            None => tracing::trace!("Ignoring unsupported property {}", name),
        }
        style
    }
}

const BORDER_SIDES: [ColorProperty; 4] = [
    ColorProperty::BorderTopColor,
    ColorProperty::BorderRightColor,
    ColorProperty::BorderBottomColor,
    ColorProperty::BorderLeftColor,
];

/// Expand a 1-4 value color list into top, right, bottom, left
fn border_sides(value: &str) -> Option<[Color; 4]> {
    let colors = split_components(value)
        .into_iter()
        .map(Color::parse)
        .collect::<Option<Vec<_>>>()?;
    match colors.as_slice() {
        &[all] => Some([all; 4]),
        &[vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        &[top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        &[top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => None,
    }
}

/// Whitespace-separated components, keeping `rgb(1, 2, 3)` whole
fn split_components(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// Keywords are case-insensitive; font families keep their case
fn normalize_keyword(property: StringProperty, value: &str) -> String {
    match property {
        StringProperty::FontFamily => value.to_string(),
        _ => value.to_ascii_lowercase(),
    }
}

/// Leading integer of a value, units and fraction dropped (`"12.5px"` -> 12)
fn parse_integer(value: &str) -> Option<i32> {
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclarationParser, InlineStyleParser};
    use crate::merge_styles;
    use crate::properties::IntegerProperty;

    fn translate(property: &str, value: &str) -> Style {
        PropertyTranslator.translate(&Declaration::new(property, value))
    }

    #[test]
    fn test_color_values() {
        assert_eq!(translate("color", "#fff").color(ColorProperty::Color), Some(Color::WHITE));
        assert_eq!(
            translate("background-color", "blue").color(ColorProperty::BackgroundColor),
            Some(Color::BLUE)
        );
        assert!(translate("color", "not-a-color").is_empty());
    }

    #[test]
    fn test_alpha_colors_from_inline_parser() {
        let declarations = InlineStyleParser
            .parse("color: transparent; background-color: rgba(255,0,0,.2)")
            .unwrap();
        let parts: Vec<Style> = declarations.iter().map(|d| PropertyTranslator.translate(d)).collect();
        let style = merge_styles(&parts);

        assert_eq!(style.color(ColorProperty::Color), Some(Color::TRANSPARENT));
        assert_eq!(
            style.color(ColorProperty::BackgroundColor),
            Some(Color::rgba(255, 0, 0, 51))
        );
    }

    #[test]
    fn test_border_color_sides() {
        let style = translate("border-color", "red #00f");
        assert_eq!(style.color(ColorProperty::BorderTopColor), Some(Color::RED));
        assert_eq!(style.color(ColorProperty::BorderRightColor), Some(Color::BLUE));
        assert_eq!(style.color(ColorProperty::BorderBottomColor), Some(Color::RED));
        assert_eq!(style.color(ColorProperty::BorderLeftColor), Some(Color::BLUE));
        assert!(!style.contains(ColorProperty::BorderColor));

        let style = translate("border-color", "rgb(0, 0, 0) white red");
        assert_eq!(style.color(ColorProperty::BorderTopColor), Some(Color::BLACK));
        assert_eq!(style.color(ColorProperty::BorderLeftColor), Some(Color::WHITE));
        assert_eq!(style.color(ColorProperty::BorderBottomColor), Some(Color::RED));

        assert_eq!(
            translate("border-color", "red").color(ColorProperty::BorderColor),
            Some(Color::RED)
        );
        assert!(translate("border-color", "red blurple").is_empty());
        assert!(translate("border-color", "red red red red red").is_empty());
    }

    #[test]
    fn test_keyword_values() {
        assert_eq!(
            translate("font-weight", "BOLD").string(StringProperty::FontWeight),
            Some("bold")
        );
        assert_eq!(
            translate("font-family", "Courier New").string(StringProperty::FontFamily),
            Some("Courier New")
        );
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(translate("font-size", "12").integer(IntegerProperty::FontSize), Some(12));
        assert_eq!(translate("width", "40px").integer(IntegerProperty::Width), Some(40));
        assert_eq!(translate("height", "12.5pt").integer(IntegerProperty::Height), Some(12));
        assert_eq!(translate("width", "-3px").integer(IntegerProperty::Width), Some(-3));
        assert!(translate("width", "auto").is_empty());
    }

    #[test]
    fn test_unknown_property_is_empty() {
        assert!(translate("z-index", "3").is_empty());
        assert!(translate("color", "   ").is_empty());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("007"), Some(7));
        assert_eq!(parse_integer("+5em"), Some(5));
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer(".5"), None);
    }
}
