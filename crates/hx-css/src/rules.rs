//! Rule table
//!
//! Read-only mapping from selector text to [`Style`]. Only three selector
//! shapes are understood: `tag`, `.class` and `tag.class`. Stylesheets are
//! parsed with lightningcss and every other selector is skipped.

use std::collections::HashMap;

use hx_dom::DomTree;
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::declaration::declarations_from_block;
use crate::translate::{DeclarationTranslator, PropertyTranslator};
use crate::{merge_styles, CssError, Style};

/// Selector -> style table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: HashMap<String, Style>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stylesheet text with the default translator
    pub fn from_css(css: &str) -> Result<Self, CssError> {
        let mut table = Self::new();
        table.add_stylesheet(css, &PropertyTranslator)?;
        Ok(table)
    }

    /// Build from every `<style>` element of a document, in document order
    pub fn from_document(tree: &DomTree) -> Result<Self, CssError> {
        let css = tree
            .elements_by_tag("style")
            .map(|style| tree.text_content(style.id()))
            .collect::<Vec<_>>()
            .join("\n");
        Self::from_css(&css)
    }

    /// Set the style for a selector, replacing any previous one
    pub fn insert(&mut self, selector: &str, style: Style) {
        self.rules.insert(selector.trim().to_lowercase(), style);
    }

    /// Exact lookup; keys are stored lowercase
    pub fn get(&self, selector: &str) -> Option<&Style> {
        self.rules.get(selector)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Parse a stylesheet and merge its simple-selector rules into the table
    ///
    /// A selector that appears again later in the sheet is merged over its
    /// earlier style, so later declarations win.
    pub fn add_stylesheet<T: DeclarationTranslator>(
        &mut self,
        css: &str,
        translator: &T,
    ) -> Result<(), CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| {
            CssError::Stylesheet {
                line: e.loc.as_ref().map_or(0, |l| l.line),
                message: e.kind.to_string(),
            }
        })?;

        let mut added = 0usize;
        for rule in stylesheet.rules.0.iter() {
            let CssRule::Style(style_rule) = rule else {
                // Media queries, keyframes, font faces etc. are not modeled
                continue;
            };

            let selectors = style_rule
                .selectors
                .to_css_string(PrinterOptions::default())
                .map_err(|e| CssError::Serialize(e.to_string()))?;

            let declarations = declarations_from_block(&style_rule.declarations)?;
            let parts: Vec<Style> = declarations.iter().map(|d| translator.translate(d)).collect();
            let style = merge_styles(&parts);

            for selector in selectors.split(',').map(str::trim) {
                if !is_simple_selector(selector) {
                    tracing::trace!("Skipping unsupported selector {:?}", selector);
                    continue;
                }
                let key = selector.to_lowercase();
                let merged = match self.rules.get(&key) {
                    Some(existing) => merge_styles([existing, &style]),
                    None => style.clone(),
                };
                self.rules.insert(key, merged);
                added += 1;
            }
        }

        tracing::debug!("Loaded {} rules ({} selectors in table)", added, self.rules.len());
        Ok(())
    }
}

impl<S: AsRef<str>> FromIterator<(S, Style)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (S, Style)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (selector, style) in iter {
            table.insert(selector.as_ref(), style);
        }
        table
    }
}

/// `tag`, `.class` or `tag.class`
pub fn is_simple_selector(selector: &str) -> bool {
    fn is_ident(s: &str) -> bool {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    }

    match selector.split_once('.') {
        Some((tag, class)) => (tag.is_empty() || is_ident(tag)) && is_ident(class),
        None => is_ident(selector),
    }
}
