//! Style value
//!
//! A [`Style`] maps property keys to typed values. Once a style is handed
//! out (shared behind an `Arc`) it is never mutated; the setters below are
//! for building fresh values only.

use std::collections::HashMap;

use crate::properties::{
    Color, ColorProperty, IntegerProperty, PropertyKey, PropertyValue, StringProperty,
};

/// Set of typed property values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    properties: HashMap<PropertyKey, PropertyValue>,
}

impl Style {
    pub const BOLD_FONT_WEIGHT: &'static str = "bold";
    pub const ITALIC_FONT_STYLE: &'static str = "italic";
    pub const TEXT_DECORATION_UNDERLINE: &'static str = "underline";

    /// Empty style
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, property: ColorProperty, color: Color) -> Self {
        self.set_color(property, color);
        self
    }

    pub fn with_string(mut self, property: StringProperty, value: impl Into<String>) -> Self {
        self.set_string(property, value);
        self
    }

    pub fn with_integer(mut self, property: IntegerProperty, value: i32) -> Self {
        self.set_integer(property, value);
        self
    }

    pub fn set_color(&mut self, property: ColorProperty, color: Color) {
        self.properties
            .insert(PropertyKey::Color(property), PropertyValue::Color(color));
    }

    pub fn set_string(&mut self, property: StringProperty, value: impl Into<String>) {
        self.properties.insert(
            PropertyKey::String(property),
            PropertyValue::String(value.into()),
        );
    }

    pub fn set_integer(&mut self, property: IntegerProperty, value: i32) {
        self.properties
            .insert(PropertyKey::Integer(property), PropertyValue::Integer(value));
    }

    /// Raw insert; callers guarantee `key` and `value` share a domain
    pub(crate) fn insert(&mut self, key: PropertyKey, value: PropertyValue) {
        self.properties.insert(key, value);
    }

    /// Get the raw value for a key
    pub fn get(&self, key: impl Into<PropertyKey>) -> Option<&PropertyValue> {
        self.properties.get(&key.into())
    }

    pub fn color(&self, property: ColorProperty) -> Option<Color> {
        match self.properties.get(&PropertyKey::Color(property)) {
            Some(PropertyValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn string(&self, property: StringProperty) -> Option<&str> {
        match self.properties.get(&PropertyKey::String(property)) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, property: IntegerProperty) -> Option<i32> {
        match self.properties.get(&PropertyKey::Integer(property)) {
            Some(PropertyValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn contains(&self, key: impl Into<PropertyKey>) -> bool {
        self.properties.contains_key(&key.into())
    }

    /// Number of properties set
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over every property (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_bold(&self) -> bool {
        self.string(StringProperty::FontWeight)
            .is_some_and(|w| w == Self::BOLD_FONT_WEIGHT || w.parse::<u16>().is_ok_and(|n| n >= 600))
    }

    pub fn is_italic(&self) -> bool {
        self.string(StringProperty::FontStyle) == Some(Self::ITALIC_FONT_STYLE)
    }

    pub fn is_underlined(&self) -> bool {
        self.string(StringProperty::TextDecoration)
            .is_some_and(|d| d.split_ascii_whitespace().any(|t| t == Self::TEXT_DECORATION_UNDERLINE))
    }
}
