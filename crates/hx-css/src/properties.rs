//! Style Property Definitions
//!
//! The closed set of properties the exporter understands, split by the
//! type of value they carry: colors, keywords/strings and integers.

macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $css:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every property of this kind, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Look up a property by its (lowercase) CSS name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($css => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// CSS name of the property
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $css),+
                }
            }
        }
    };
}

property_enum! {
    /// Color-valued properties
    ColorProperty {
        Color => "color",
        BackgroundColor => "background-color",
        BorderColor => "border-color",
        BorderTopColor => "border-top-color",
        BorderRightColor => "border-right-color",
        BorderBottomColor => "border-bottom-color",
        BorderLeftColor => "border-left-color",
    }
}

property_enum! {
    /// Keyword or free-text properties
    StringProperty {
        FontWeight => "font-weight",
        FontStyle => "font-style",
        FontFamily => "font-family",
        TextAlign => "text-align",
        VerticalAlign => "vertical-align",
        TextDecoration => "text-decoration",
        WhiteSpace => "white-space",
        BorderWidth => "border-width",
        BorderTopWidth => "border-top-width",
        BorderRightWidth => "border-right-width",
        BorderBottomWidth => "border-bottom-width",
        BorderLeftWidth => "border-left-width",
        BorderStyle => "border-style",
        BorderTopStyle => "border-top-style",
        BorderRightStyle => "border-right-style",
        BorderBottomStyle => "border-bottom-style",
        BorderLeftStyle => "border-left-style",
    }
}

property_enum! {
    /// Integer-valued properties (units are dropped)
    IntegerProperty {
        FontSize => "font-size",
        Width => "width",
        Height => "height",
    }
}

/// Property key - one variant per value domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    Color(ColorProperty),
    String(StringProperty),
    Integer(IntegerProperty),
}

impl PropertyKey {
    /// Parse a property name into a key
    pub fn from_name(name: &str) -> Option<Self> {
        ColorProperty::from_name(name)
            .map(Self::Color)
            .or_else(|| StringProperty::from_name(name).map(Self::String))
            .or_else(|| IntegerProperty::from_name(name).map(Self::Integer))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Color(p) => p.name(),
            Self::String(p) => p.name(),
            Self::Integer(p) => p.name(),
        }
    }
}

impl From<ColorProperty> for PropertyKey {
    fn from(p: ColorProperty) -> Self {
        Self::Color(p)
    }
}

impl From<StringProperty> for PropertyKey {
    fn from(p: StringProperty) -> Self {
        Self::String(p)
    }
}

impl From<IntegerProperty> for PropertyKey {
    fn from(p: IntegerProperty) -> Self {
        Self::Integer(p)
    }
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Color(Color),
    String(String),
    Integer(i32),
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any supported notation: hex, `rgb()`/`rgba()` or a name
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        let lower = value.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return Self::from_rgb_args(args.strip_suffix(')')?);
        }
        Self::from_name(&lower)
    }

    /// Parse a hex color (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            4 => Some(Self::rgba(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                channel(3..4)? * 17,
            )),
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Comma- or space-separated `r g b [a]` arguments
    fn from_rgb_args(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_ascii_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let (rgb, alpha) = match parts.as_slice() {
            [r, g, b] => ([*r, *g, *b], None),
            [r, g, b, a] => ([*r, *g, *b], Some(*a)),
            _ => return None,
        };
        let channel = |s: &str| -> Option<u8> {
            match s.strip_suffix('%') {
                Some(pct) => Some((pct.parse::<f32>().ok()?.clamp(0.0, 100.0) * 2.55).round() as u8),
                None => Some(s.parse::<f32>().ok()?.clamp(0.0, 255.0).round() as u8),
            }
        };
        let a = match alpha {
            Some(s) => match s.strip_suffix('%') {
                Some(pct) => (pct.parse::<f32>().ok()?.clamp(0.0, 100.0) * 2.55).round() as u8,
                None => (s.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            },
            None => 255,
        };
        Some(Self::rgba(channel(rgb[0])?, channel(rgb[1])?, channel(rgb[2])?, a))
    }

    /// Parse a named color
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::BLUE,
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" | "aqua" => Self::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "lightgray" | "lightgrey" => Self::rgb(211, 211, 211),
            "darkgray" | "darkgrey" => Self::rgb(169, 169, 169),
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "navy" => Self::rgb(0, 0, 128),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            _ => return None,
        })
    }
}
