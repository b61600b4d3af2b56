//! Element access for the resolver
//!
//! The resolver never touches a concrete tree. It reads elements through
//! [`StyledElement`], which the `hx-dom` handle implements.

use hx_dom::ElementRef;

/// The parts of an element that can influence its style
pub trait StyledElement: Sized {
    /// Tag name as written; the resolver lowercases it
    fn tag_name(&self) -> &str;

    /// Raw `class` attribute
    fn class_attr(&self) -> Option<&str>;

    /// Raw `style` attribute
    fn style_attr(&self) -> Option<&str>;

    /// Raw `width` attribute
    fn width_attr(&self) -> Option<&str>;

    /// Parent element, `None` for the root
    fn parent_element(&self) -> Option<Self>;

    /// Short label for diagnostics, e.g. `td.total`
    fn describe(&self) -> String {
        let tag = self.tag_name().to_lowercase();
        match self.class_attr().map(str::split_whitespace) {
            Some(classes) => classes.fold(tag, |mut label, class| {
                label.push('.');
                label.push_str(class);
                label
            }),
            None => tag,
        }
    }
}

impl StyledElement for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        ElementRef::tag_name(self)
    }

    fn class_attr(&self) -> Option<&str> {
        self.attr("class")
    }

    fn style_attr(&self) -> Option<&str> {
        self.attr("style")
    }

    fn width_attr(&self) -> Option<&str> {
        self.attr("width")
    }

    fn parent_element(&self) -> Option<Self> {
        ElementRef::parent_element(self)
    }
}
