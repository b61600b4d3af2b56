//! Resolver Configuration

/// What to do when inline style text fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineErrorPolicy {
    /// Return the parser's error unchanged, aborting the resolution
    #[default]
    Propagate,
    /// Return [`CssError::InlineStyle`](crate::CssError::InlineStyle) naming the element
    Describe,
    /// Log a warning and treat the inline style as empty
    Skip,
}

/// Resolver configuration options
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Handling of malformed `style` attributes
    pub inline_error_policy: InlineErrorPolicy,

    /// Initial capacity of the resolved-style cache
    pub cache_capacity: usize,

    /// Initial capacity of the inline-style cache
    pub inline_cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            inline_error_policy: InlineErrorPolicy::default(),
            cache_capacity: 4096,
            inline_cache_capacity: 256,
        }
    }
}

impl ResolverConfig {
    pub fn with_inline_error_policy(mut self, policy: InlineErrorPolicy) -> Self {
        self.inline_error_policy = policy;
        self
    }
}
