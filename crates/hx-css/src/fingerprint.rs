//! Element fingerprints and cache keys
//!
//! A fingerprint folds every input that can change an element's resolved
//! style into one integer: tag, class text, inline text, width text and the
//! parent's fingerprint. Parents contribute their fingerprint, not their
//! identity, so identical subtrees built separately still share keys.
//!
//! The fingerprint is only a hash. The resolution cache is keyed by
//! [`StyleKey`], which compares every field, so two elements that happen
//! to share a fingerprint can never be handed each other's style.

use std::hash::{Hash, Hasher};

use crate::StyledElement;

const SEED: u64 = 7;
const MULTIPLIER: u64 = 31;

/// Content fingerprint of an element and its ancestor chain
pub fn fingerprint<E: StyledElement>(element: &E) -> u64 {
    let mut ancestors = Vec::new();
    let mut cursor = element.parent_element();
    while let Some(parent) = cursor {
        cursor = parent.parent_element();
        ancestors.push(parent);
    }

    let parent = ancestors
        .iter()
        .rev()
        .fold(0, |parent, ancestor| own_fingerprint(ancestor, parent));
    own_fingerprint(element, parent)
}

/// Fingerprint of one element given its parent's (0 for the root)
pub(crate) fn own_fingerprint<E: StyledElement>(element: &E, parent: u64) -> u64 {
    let tag = element.tag_name().to_lowercase();
    [
        text_hash(&tag),
        field_hash(element.class_attr()),
        field_hash(element.style_attr()),
        field_hash(element.width_attr()),
        parent,
    ]
    .into_iter()
    .fold(SEED, |acc, part| {
        acc.wrapping_mul(MULTIPLIER).wrapping_add(part)
    })
}

fn text_hash(text: &str) -> u64 {
    text.bytes().fold(0, |h, b| {
        h.wrapping_mul(MULTIPLIER).wrapping_add(u64::from(b))
    })
}

fn field_hash(field: Option<&str>) -> u64 {
    field.map_or(0, text_hash)
}

/// Dense id handed out once per distinct [`StyleKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u32);

impl KeyId {
    /// `None` once the index no longer fits in 32 bits
    pub(crate) fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural cache key for one element in context
///
/// The parent is referenced by its [`KeyId`]. Ids are canonical per
/// distinct key, so comparing ids compares whole ancestor chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleKey {
    tag: Box<str>,
    class: Option<Box<str>>,
    inline: Option<Box<str>>,
    width: Option<Box<str>>,
    parent: Option<KeyId>,
    fingerprint: u64,
}

impl StyleKey {
    /// Build the key for `element`; `parent` is the parent's id and fingerprint
    pub fn new<E: StyledElement>(element: &E, parent: Option<(KeyId, u64)>) -> Self {
        let fingerprint = own_fingerprint(element, parent.map_or(0, |(_, fp)| fp));
        Self {
            tag: element.tag_name().to_lowercase().into_boxed_str(),
            class: element.class_attr().map(Into::into),
            inline: element.style_attr().map(Into::into),
            width: element.width_attr().map(Into::into),
            parent: parent.map(|(id, _)| id),
            fingerprint,
        }
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[inline]
    pub fn parent(&self) -> Option<KeyId> {
        self.parent
    }
}

impl Hash for StyleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}
