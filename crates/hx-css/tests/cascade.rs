//! Cascade tests for hx-css
//!
//! Override order, inheritance, caching and inline error handling,
//! exercised through the public resolver API.

use std::sync::Arc;

use hx_css::properties::{Color, ColorProperty, IntegerProperty, StringProperty};
use hx_css::{
    fingerprint, CssError, Declaration, InlineErrorPolicy, ResolverConfig, RuleTable, Style,
    StyleMap,
};
use hx_dom::{DomTree, NodeId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Append `tag` under `parent` with the given attributes
fn add(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = tree.append_element(parent, tag).unwrap();
    for (name, value) in attrs {
        tree.set_attr(id, name, value).unwrap();
    }
    id
}

fn resolve(rules: &RuleTable, tree: &DomTree, id: NodeId) -> anyhow::Result<Arc<Style>> {
    let mut map = StyleMap::new(rules);
    Ok(map.get_style_for_element(&tree.element(id).unwrap())?)
}

fn weight(value: &str) -> Style {
    Style::new().with_string(StringProperty::FontWeight, value)
}

// ============================================================================
// BASELINE AND OVERRIDE ORDER
// ============================================================================

#[test]
fn test_empty_baseline() -> anyhow::Result<()> {
    let rules: RuleTable = [("p", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    let div = add(&mut tree, NodeId::ROOT, "div", &[]);

    assert!(resolve(&rules, &tree, div)?.is_empty());
    Ok(())
}

#[test]
fn test_override_order() -> anyhow::Result<()> {
    init_tracing();
    let full: RuleTable = [("span", weight("100")), (".c", weight("200"))]
        .into_iter()
        .collect();
    let tag_only: RuleTable = [("span", weight("100"))].into_iter().collect();

    let mut tree = DomTree::new();
    let with_inline = add(&mut tree, NodeId::ROOT, "span", &[("class", "c"), ("style", "font-weight: 300")]);
    let without_inline = add(&mut tree, NodeId::ROOT, "span", &[("class", "c")]);

    let font_weight = |style: Arc<Style>| style.string(StringProperty::FontWeight).map(str::to_owned);
    assert_eq!(font_weight(resolve(&full, &tree, with_inline)?).as_deref(), Some("300"));
    assert_eq!(font_weight(resolve(&full, &tree, without_inline)?).as_deref(), Some("200"));
    assert_eq!(font_weight(resolve(&tag_only, &tree, without_inline)?).as_deref(), Some("100"));
    Ok(())
}

#[test]
fn test_tag_qualified_class_beats_plain_class() -> anyhow::Result<()> {
    let rules: RuleTable = [
        (
            "td.total",
            Style::new().with_color(ColorProperty::Color, Color::BLUE),
        ),
        (
            ".total",
            Style::new()
                .with_color(ColorProperty::Color, Color::RED)
                .with_string(StringProperty::TextAlign, "right"),
        ),
    ]
    .into_iter()
    .collect();

    let mut tree = DomTree::new();
    let td = add(&mut tree, NodeId::ROOT, "td", &[("class", "total")]);
    let style = resolve(&rules, &tree, td)?;

    assert_eq!(style.color(ColorProperty::Color), Some(Color::BLUE));
    assert_eq!(style.string(StringProperty::TextAlign), Some("right"));
    Ok(())
}

#[test]
fn test_later_class_token_wins() -> anyhow::Result<()> {
    let rules: RuleTable = [
        (
            ".a",
            Style::new()
                .with_integer(IntegerProperty::Width, 1)
                .with_string(StringProperty::TextAlign, "center"),
        ),
        (".b", Style::new().with_integer(IntegerProperty::Width, 2)),
    ]
    .into_iter()
    .collect();

    let mut tree = DomTree::new();
    let ab = add(&mut tree, NodeId::ROOT, "div", &[("class", "a b")]);
    let ba = add(&mut tree, NodeId::ROOT, "div", &[("class", "b   a")]);

    let style = resolve(&rules, &tree, ab)?;
    assert_eq!(style.integer(IntegerProperty::Width), Some(2));
    assert_eq!(style.string(StringProperty::TextAlign), Some("center"));

    let style = resolve(&rules, &tree, ba)?;
    assert_eq!(style.integer(IntegerProperty::Width), Some(1));
    assert_eq!(style.string(StringProperty::TextAlign), Some("center"));
    Ok(())
}

#[test]
fn test_class_tokens_case_folded() -> anyhow::Result<()> {
    let rules: RuleTable = [("td.total", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    let td = add(&mut tree, NodeId::ROOT, "TD", &[("class", " Total ")]);

    assert!(resolve(&rules, &tree, td)?.is_bold());
    Ok(())
}

// ============================================================================
// INHERITANCE
// ============================================================================

#[test]
fn test_inheritance_fallback() -> anyhow::Result<()> {
    let rules: RuleTable = [
        (
            ".warn",
            Style::new()
                .with_color(ColorProperty::Color, Color::RED)
                .with_string(StringProperty::FontStyle, "italic"),
        ),
        ("em", Style::new().with_color(ColorProperty::Color, Color::BLUE)),
    ]
    .into_iter()
    .collect();

    let mut tree = DomTree::new();
    let div = add(&mut tree, NodeId::ROOT, "div", &[("class", "warn")]);
    let span = add(&mut tree, div, "span", &[]);
    let em = add(&mut tree, span, "em", &[]);
    let inline = add(&mut tree, span, "b", &[("style", "color: #fff")]);

    let style = resolve(&rules, &tree, span)?;
    assert_eq!(style.color(ColorProperty::Color), Some(Color::RED));

    let style = resolve(&rules, &tree, em)?;
    assert_eq!(style.color(ColorProperty::Color), Some(Color::BLUE));
    assert!(style.is_italic(), "grandparent value still inherited");

    let style = resolve(&rules, &tree, inline)?;
    assert_eq!(style.color(ColorProperty::Color), Some(Color::WHITE));
    Ok(())
}

#[test]
fn test_deep_tree_resolves_without_recursion() -> anyhow::Result<()> {
    let rules: RuleTable = [("section", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    let mut cursor = add(&mut tree, NodeId::ROOT, "section", &[]);
    for depth in 0..5_000 {
        let width = (depth % 7).to_string();
        cursor = add(&mut tree, cursor, "div", &[("width", width.as_str())]);
    }

    let mut map = StyleMap::new(&rules);
    let style = map.get_style_for_element(&tree.element(cursor).unwrap())?;
    assert!(style.is_bold());
    assert_eq!(map.stats().resolved, 5_001);
    Ok(())
}

// ============================================================================
// CACHING
// ============================================================================

#[test]
fn test_cache_idempotence() -> anyhow::Result<()> {
    let rules: RuleTable = [("td", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    let tr = add(&mut tree, NodeId::ROOT, "tr", &[]);
    let td = add(&mut tree, tr, "td", &[("style", "text-align: center")]);
    let th = add(&mut tree, tr, "th", &[("class", "x"), ("style", "text-align: center")]);

    let mut map = StyleMap::new(&rules);
    let first = map.get_style_for_element(&tree.element(td).unwrap())?;
    let second = map.get_style_for_element(&tree.element(td).unwrap())?;
    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));

    let td_inline = map.resolve_inline(&tree.element(td).unwrap())?;
    let th_inline = map.resolve_inline(&tree.element(th).unwrap())?;
    assert!(Arc::ptr_eq(&td_inline, &th_inline));
    assert_eq!(td_inline.string(StringProperty::TextAlign), Some("center"));
    assert_eq!(map.stats().inline, 1);
    Ok(())
}

#[test]
fn test_identical_subtrees_share_entries() -> anyhow::Result<()> {
    let rules: RuleTable = [(".num", Style::new().with_string(StringProperty::TextAlign, "right"))]
        .into_iter()
        .collect();

    let build = || {
        let mut tree = DomTree::new();
        let table = add(&mut tree, NodeId::ROOT, "table", &[("width", "100")]);
        let td = add(&mut tree, table, "td", &[("class", "num")]);
        (tree, td)
    };
    let (first_tree, first_td) = build();
    let (second_tree, second_td) = build();

    let mut map = StyleMap::new(&rules);
    let a = map.get_style_for_element(&first_tree.element(first_td).unwrap())?;
    let b = map.get_style_for_element(&second_tree.element(second_td).unwrap())?;

    assert!(Arc::ptr_eq(&a, &b));
    let stats = map.stats();
    assert_eq!((stats.resolved, stats.misses, stats.hits), (2, 2, 2));
    Ok(())
}

#[test]
fn test_same_element_under_different_parents() -> anyhow::Result<()> {
    let rules: RuleTable = [(".bold", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    let plain = add(&mut tree, NodeId::ROOT, "div", &[]);
    let bold = add(&mut tree, NodeId::ROOT, "div", &[("class", "bold")]);
    let under_plain = add(&mut tree, plain, "span", &[]);
    let under_bold = add(&mut tree, bold, "span", &[]);

    let mut map = StyleMap::new(&rules);
    assert!(!map.get_style_for_element(&tree.element(under_plain).unwrap())?.is_bold());
    assert!(map.get_style_for_element(&tree.element(under_bold).unwrap())?.is_bold());
    Ok(())
}

#[test]
fn test_colliding_fingerprints_resolve_separately() -> anyhow::Result<()> {
    let rules: RuleTable = [(".aa", weight("bold"))].into_iter().collect();
    let mut tree = DomTree::new();
    // "Aa" and "BB" hash to the same class contribution
    let a = add(&mut tree, NodeId::ROOT, "td", &[("class", "Aa")]);
    let b = add(&mut tree, NodeId::ROOT, "td", &[("class", "BB")]);
    let a = tree.element(a).unwrap();
    let b = tree.element(b).unwrap();
    assert_eq!(fingerprint(&a), fingerprint(&b));

    let mut map = StyleMap::new(&rules);
    assert!(map.get_style_for_element(&a)?.is_bold());
    assert!(!map.get_style_for_element(&b)?.is_bold());
    assert_eq!(map.stats().resolved, 2);
    Ok(())
}

// ============================================================================
// END-TO-END SCENARIO
// ============================================================================

#[test]
fn test_highlight_scenario() -> anyhow::Result<()> {
    init_tracing();
    let rules: RuleTable = [
        (
            "div",
            Style::new()
                .with_string(StringProperty::FontWeight, Style::BOLD_FONT_WEIGHT)
                .with_color(ColorProperty::BackgroundColor, Color::RED),
        ),
        (
            ".highlight",
            Style::new().with_string(StringProperty::BorderWidth, "thin"),
        ),
        (
            "div.highlight",
            Style::new().with_color(ColorProperty::BackgroundColor, Color::BLUE),
        ),
    ]
    .into_iter()
    .collect();

    let mut tree = DomTree::new();
    let div = add(
        &mut tree,
        NodeId::ROOT,
        "div",
        &[
            ("class", "highlight"),
            ("style", "color:white;border-width:thick;font-size:12"),
        ],
    );

    let style = resolve(&rules, &tree, div)?;
    let expected = Style::new()
        .with_color(ColorProperty::BackgroundColor, Color::BLUE)
        .with_string(StringProperty::FontWeight, "bold")
        .with_string(StringProperty::BorderWidth, "thick")
        .with_color(ColorProperty::Color, Color::WHITE)
        .with_integer(IntegerProperty::FontSize, 12);
    assert_eq!(*style, expected);
    Ok(())
}

// ============================================================================
// INLINE ERRORS
// ============================================================================

fn broken_tree() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let td = add(&mut tree, NodeId::ROOT, "td", &[("class", "total"), ("style", "color red")]);
    let span = add(&mut tree, td, "span", &[]);
    (tree, td, span)
}

fn total_rules() -> RuleTable {
    [(".total", weight("bold"))].into_iter().collect()
}

#[test]
fn test_malformed_inline_propagates_by_default() {
    let rules = total_rules();
    let (tree, td, span) = broken_tree();
    assert_eq!(ResolverConfig::default().inline_error_policy, InlineErrorPolicy::Propagate);

    let mut map = StyleMap::new(&rules);
    let err = map.get_style_for_element(&tree.element(td).unwrap()).unwrap_err();
    assert!(matches!(err, CssError::Declaration { .. }), "{err:?}");

    // Descendants abort too, and nothing was cached along the way
    let err = map.get_style_for_element(&tree.element(span).unwrap()).unwrap_err();
    assert!(matches!(err, CssError::Declaration { .. }), "{err:?}");
    assert_eq!(map.stats().resolved, 0);
    assert_eq!(map.stats().inline, 0);
}

#[test]
fn test_malformed_inline_described() {
    let rules = total_rules();
    let (tree, td, _) = broken_tree();

    let config = ResolverConfig::default().with_inline_error_policy(InlineErrorPolicy::Describe);
    let mut map = StyleMap::with_config(&rules, config);
    let err = map.get_style_for_element(&tree.element(td).unwrap()).unwrap_err();

    match err {
        CssError::InlineStyle { element, style, source } => {
            assert_eq!(element, "td.total");
            assert_eq!(style, "color red");
            assert!(matches!(*source, CssError::Declaration { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_inline_skipped() -> anyhow::Result<()> {
    init_tracing();
    let rules = total_rules();
    let (tree, td, span) = broken_tree();

    let config = ResolverConfig::default().with_inline_error_policy(InlineErrorPolicy::Skip);
    let mut map = StyleMap::with_config(&rules, config);

    let style = map.get_style_for_element(&tree.element(span).unwrap())?;
    assert!(style.is_bold());
    assert!(!style.contains(ColorProperty::Color));

    assert!(map.get_style_for_element(&tree.element(td).unwrap())?.is_bold());
    assert_eq!(map.stats().inline, 1);
    Ok(())
}

// ============================================================================
// CUSTOM COLLABORATORS
// ============================================================================

#[test]
fn test_custom_parser_and_translator() -> anyhow::Result<()> {
    let parser = |text: &str| -> Result<Vec<Declaration>, CssError> {
        Ok(text
            .split(';')
            .filter_map(|item| item.split_once('='))
            .map(|(name, value)| Declaration::new(name.trim(), value.trim()))
            .collect())
    };
    let translator = |decl: &Declaration| match decl.value.parse() {
        Ok(n) if decl.property == "w" => Style::new().with_integer(IntegerProperty::Width, n),
        _ => Style::new(),
    };

    let rules = RuleTable::new();
    let mut tree = DomTree::new();
    let col = add(&mut tree, NodeId::ROOT, "col", &[("style", "w=1; w=2; junk")]);

    let mut map = StyleMap::with_collaborators(&rules, parser, translator, ResolverConfig::default());
    let style = map.get_style_for_element(&tree.element(col).unwrap())?;
    assert_eq!(style.integer(IntegerProperty::Width), Some(2));
    assert_eq!(style.len(), 1);
    Ok(())
}
