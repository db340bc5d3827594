//! Config field path used to point diagnostics at a key.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config key, e.g. `site.domain`.
///
/// Sections declare their paths as associated constants:
///
/// ```ignore
/// impl SiteConfig {
///     pub const DOMAIN: FieldPath = FieldPath::new("site.domain");
/// }
///
/// diag.error(SiteConfig::DOMAIN, "must be a bare host name");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("[{}]", self.0).cyan())
    }
}
