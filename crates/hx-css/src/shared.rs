//! Thread-safe style map
//!
//! Wraps a [`StyleMap`] in a mutex held across the whole
//! lookup-compute-store sequence, so concurrent callers resolving the same
//! key always observe a single stored style.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::declaration::{DeclarationParser, InlineStyleParser};
use crate::translate::{DeclarationTranslator, PropertyTranslator};
use crate::{CacheStats, CssError, Style, StyleMap, StyledElement};

/// Style map shareable between threads
#[derive(Debug)]
pub struct SharedStyleMap<'r, P = InlineStyleParser, T = PropertyTranslator> {
    inner: Mutex<StyleMap<'r, P, T>>,
}

impl<'r, P, T> SharedStyleMap<'r, P, T>
where
    P: DeclarationParser,
    T: DeclarationTranslator,
{
    pub fn new(map: StyleMap<'r, P, T>) -> Self {
        Self {
            inner: Mutex::new(map),
        }
    }

    pub fn get_style_for_element<E: StyledElement>(
        &self,
        element: &E,
    ) -> Result<Arc<Style>, CssError> {
        self.lock().get_style_for_element(element)
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Recover the single-threaded map
    pub fn into_inner(self) -> StyleMap<'r, P, T> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // Caches are only written after a style is fully computed, so a
    // panicking holder cannot leave a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, StyleMap<'r, P, T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<'r, P, T> From<StyleMap<'r, P, T>> for SharedStyleMap<'r, P, T>
where
    P: DeclarationParser,
    T: DeclarationTranslator,
{
    fn from(map: StyleMap<'r, P, T>) -> Self {
        Self::new(map)
    }
}
