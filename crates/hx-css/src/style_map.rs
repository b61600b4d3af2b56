//! Style Map - per-document style resolver
//!
//! Resolves an element's effective style by merging, lowest priority
//! first, the parent's resolved style, the tag rule, the class rules and
//! the inline style. Two caches make repeated resolution cheap:
//! - resolved styles, keyed by [`StyleKey`] (element content plus parent key)
//! - merged inline styles, keyed by the raw `style` attribute text
//!
//! A `StyleMap` is one resolution session. It borrows the rule table for
//! its whole life, so it cannot outlive the document's rules, and its
//! caches are dropped with it.

use std::collections::HashMap;
use std::sync::Arc;

use hx_dom::{DomTree, NodeId};

use crate::declaration::{DeclarationParser, InlineStyleParser};
use crate::fingerprint::{KeyId, StyleKey};
use crate::translate::{DeclarationTranslator, PropertyTranslator};
use crate::{
    merge_styles, CssError, InlineErrorPolicy, ResolverConfig, RuleTable, Style, StyledElement,
};

/// Style resolver for one document
pub struct StyleMap<'r, P = InlineStyleParser, T = PropertyTranslator> {
    rules: &'r RuleTable,
    parser: P,
    translator: T,
    config: ResolverConfig,
    /// Canonical id per distinct key
    keys: HashMap<StyleKey, KeyId>,
    /// Resolved style per key id; `None` until computed
    resolved: Vec<Option<Arc<Style>>>,
    resolved_count: usize,
    inline_cache: HashMap<String, Arc<Style>>,
    empty: Arc<Style>,
    hits: u64,
    misses: u64,
}

/// One resolved level of an ancestor chain
struct Resolved {
    key: KeyId,
    fingerprint: u64,
    style: Arc<Style>,
}

impl<'r> StyleMap<'r> {
    /// Start a session with the default parser and translator
    pub fn new(rules: &'r RuleTable) -> Self {
        Self::with_config(rules, ResolverConfig::default())
    }

    pub fn with_config(rules: &'r RuleTable, config: ResolverConfig) -> Self {
        Self::with_collaborators(rules, InlineStyleParser, PropertyTranslator, config)
    }
}

impl<'r, P, T> StyleMap<'r, P, T>
where
    P: DeclarationParser,
    T: DeclarationTranslator,
{
    /// Start a session with custom declaration parser and translator
    pub fn with_collaborators(
        rules: &'r RuleTable,
        parser: P,
        translator: T,
        config: ResolverConfig,
    ) -> Self {
        tracing::debug!(
            "Starting style session with {} rules ({:?} on inline errors)",
            rules.len(),
            config.inline_error_policy
        );
        Self {
            rules,
            parser,
            translator,
            keys: HashMap::with_capacity(config.cache_capacity),
            resolved: Vec::with_capacity(config.cache_capacity),
            resolved_count: 0,
            inline_cache: HashMap::with_capacity(config.inline_cache_capacity),
            empty: Arc::new(Style::new()),
            hits: 0,
            misses: 0,
            config,
        }
    }

    /// Rule table this session resolves against
    pub fn rules(&self) -> &'r RuleTable {
        self.rules
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Effective style of `element`
    ///
    /// Ancestors are collected first and resolved root-first, each level
    /// keyed by its own content plus its parent's key. Deep trees never
    /// recurse.
    pub fn get_style_for_element<E: StyledElement>(
        &mut self,
        element: &E,
    ) -> Result<Arc<Style>, CssError> {
        let mut ancestors = Vec::new();
        let mut cursor = element.parent_element();
        while let Some(parent) = cursor {
            cursor = parent.parent_element();
            ancestors.push(parent);
        }

        let mut parent: Option<Resolved> = None;
        for ancestor in ancestors.iter().rev() {
            parent = Some(self.resolve_one(ancestor, parent.as_ref())?);
        }
        Ok(self.resolve_one(element, parent.as_ref())?.style)
    }

    /// Resolve every element of `tree` in one top-down pass
    ///
    /// Each element reuses its parent's key, so a document costs one
    /// key computation per element.
    pub fn resolve_tree(&mut self, tree: &DomTree) -> Result<ComputedStyles, CssError> {
        let mut levels: Vec<Option<Resolved>> = Vec::new();
        levels.resize_with(tree.len(), || None);
        let mut styles = HashMap::new();

        for id in tree.descendants(tree.root()) {
            let Some(element) = tree.element(id) else {
                continue;
            };
            let parent = element
                .parent_element()
                .and_then(|p| levels[p.id().index()].as_ref());
            let resolved = self.resolve_one(&element, parent)?;
            styles.insert(id, Arc::clone(&resolved.style));
            levels[id.index()] = Some(resolved);
        }

        tracing::debug!("Resolved {} elements", styles.len());
        Ok(ComputedStyles { styles })
    }

    /// Merged inline style of `element`
    ///
    /// An element without a `style` attribute gets an empty style. Identical
    /// attribute text resolves once per session whatever element carries it.
    pub fn resolve_inline<E: StyledElement>(&mut self, element: &E) -> Result<Arc<Style>, CssError> {
        let Some(text) = element.style_attr() else {
            return Ok(Arc::clone(&self.empty));
        };
        if let Some(cached) = self.inline_cache.get(text) {
            return Ok(Arc::clone(cached));
        }

        let style = match self.parser.parse(text) {
            Ok(declarations) => {
                let parts: Vec<Style> = declarations
                    .iter()
                    .map(|d| self.translator.translate(d))
                    .collect();
                merge_styles(&parts)
            }
            Err(err) => match self.config.inline_error_policy {
                InlineErrorPolicy::Propagate => return Err(err),
                InlineErrorPolicy::Describe => {
                    return Err(CssError::InlineStyle {
                        element: element.describe(),
                        style: text.to_string(),
                        source: Box::new(err),
                    });
                }
                InlineErrorPolicy::Skip => {
                    tracing::warn!(
                        "Ignoring invalid inline style {:?} on <{}>: {}",
                        text,
                        element.describe(),
                        err
                    );
                    Style::new()
                }
            },
        };

        let style = Arc::new(style);
        self.inline_cache.insert(text.to_string(), Arc::clone(&style));
        Ok(style)
    }

    /// Cache statistics so far
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resolved: self.resolved_count,
            inline: self.inline_cache.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// End the session, dropping both caches
    pub fn finish(self) -> CacheStats {
        let stats = self.stats();
        tracing::debug!(
            "Style session finished: {} styles, {} inline, hit rate {:.1}%",
            stats.resolved,
            stats.inline,
            stats.hit_rate() * 100.0
        );
        stats
    }

    fn resolve_one<E: StyledElement>(
        &mut self,
        element: &E,
        parent: Option<&Resolved>,
    ) -> Result<Resolved, CssError> {
        let key = StyleKey::new(element, parent.map(|p| (p.key, p.fingerprint)));
        let fingerprint = key.fingerprint();
        let id = self.intern(key)?;

        if let Some(style) = &self.resolved[id.index()] {
            self.hits += 1;
            tracing::trace!("Style cache hit for <{}>", element.tag_name());
            return Ok(Resolved {
                key: id,
                fingerprint,
                style: Arc::clone(style),
            });
        }

        self.misses += 1;
        tracing::trace!("Style cache miss for <{}>", element.tag_name());
        let style = Arc::new(self.compute(element, parent.map(|p| &*p.style))?);
        self.resolved[id.index()] = Some(Arc::clone(&style));
        self.resolved_count += 1;
        Ok(Resolved {
            key: id,
            fingerprint,
            style,
        })
    }

    fn intern(&mut self, key: StyleKey) -> Result<KeyId, CssError> {
        if let Some(&id) = self.keys.get(&key) {
            return Ok(id);
        }
        let id = KeyId::new(self.resolved.len()).ok_or(CssError::TooManyStyles)?;
        self.resolved.push(None);
        self.keys.insert(key, id);
        Ok(id)
    }

    /// Merge inherited < tag < class < tag.class < inline
    fn compute<E: StyledElement>(
        &mut self,
        element: &E,
        inherited: Option<&Style>,
    ) -> Result<Style, CssError> {
        let inline = match element.style_attr() {
            Some(_) => Some(self.resolve_inline(element)?),
            None => None,
        };

        let rules = self.rules;
        let tag = element.tag_name().to_lowercase();
        let mut candidates: Vec<&Style> = Vec::with_capacity(4);
        candidates.extend(inherited);
        candidates.extend(rules.get(&tag));

        if let Some(classes) = element.class_attr() {
            for class in classes.split_whitespace() {
                let class = class.to_lowercase();
                candidates.extend(rules.get(&format!(".{class}")));
                candidates.extend(rules.get(&format!("{tag}.{class}")));
            }
        }

        candidates.extend(inline.as_deref());
        Ok(merge_styles(candidates))
    }
}

impl<P, T> std::fmt::Debug for StyleMap<'_, P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleMap")
            .field("rules", &self.rules.len())
            .field("config", &self.config)
            .field("resolved", &self.resolved_count)
            .field("inline", &self.inline_cache.len())
            .finish()
    }
}

/// Resolved styles of a whole tree, by node
#[derive(Debug, Clone, Default)]
pub struct ComputedStyles {
    styles: HashMap<NodeId, Arc<Style>>,
}

impl ComputedStyles {
    pub fn get(&self, id: NodeId) -> Option<&Arc<Style>> {
        self.styles.get(&id)
    }

    /// Number of elements resolved
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Arc<Style>)> {
        self.styles.iter().map(|(id, style)| (*id, style))
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Distinct resolved styles
    pub resolved: usize,
    /// Distinct inline style texts
    pub inline: usize,
    /// Element lookups answered from cache (ancestors included)
    pub hits: u64,
    /// Element lookups that had to merge
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
