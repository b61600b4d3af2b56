//! Style merging
//!
//! Combines an ordered list of styles into one. Priority is positional:
//! later styles override earlier ones key by key.

use crate::Style;

/// Merge styles in increasing priority order (last write wins per key)
pub fn merge_styles<'a, I>(styles: I) -> Style
where
    I: IntoIterator<Item = &'a Style>,
{
    let mut merged = Style::new();
    for style in styles {
        for (key, value) in style.iter() {
            merged.insert(key, value.clone());
        }
    }
    merged
}
