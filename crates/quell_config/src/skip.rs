//! Glob-based file exclusion.

use glob::Pattern;
use quell_report::SkipPolicy;

use crate::error::ConfigError;

/// One `+pattern` or `-pattern` entry.
#[derive(Clone, Debug)]
struct SkipRule {
    pattern: Pattern,
    include: bool,
}

/// Ordered include/exclude glob list.
///
/// `-pattern` excludes matching paths and `+pattern` keeps them. The first
/// matching rule decides; a path no rule matches is kept. A pattern with no
/// sign excludes. `*` matches across `/`.
#[derive(Clone, Debug, Default)]
pub struct SkipList {
    rules: Vec<SkipRule>,
}

impl SkipList {
    /// Compiles `patterns` in order.
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|raw| {
                let raw = raw.as_ref().trim();
                let (include, glob) = match raw.as_bytes().first() {
                    Some(b'+') => (true, &raw[1..]),
                    Some(b'-') => (false, &raw[1..]),
                    _ => (false, raw),
                };
                let pattern = Pattern::new(glob.trim()).map_err(|e| {
                    ConfigError::ValidationError(format!("invalid skip pattern '{raw}': {e}"))
                })?;
                Ok(SkipRule { pattern, include })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(Self { rules })
    }

    /// Returns `true` if the list has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if `path` is excluded.
    pub fn should_skip(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .is_some_and(|rule| !rule.include)
    }
}

impl SkipPolicy for SkipList {
    fn should_skip(&self, path: &str) -> bool {
        SkipList::should_skip(self, path)
    }
}
