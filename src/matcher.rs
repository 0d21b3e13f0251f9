use crate::error::OptionsResult;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

pub type UrlPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides whether an intercepted request URL belongs to a route.
#[derive(Clone)]
pub enum UrlMatcher {
    /// Shell-style wildcard pattern (`*`, `?`, `[...]`, backslash escapes).
    Glob(GlobMatcher),
    /// Unanchored regular expression search.
    Regex(Regex),
    Predicate(UrlPredicate),
}

impl UrlMatcher {
    /// URLs are not paths: every wildcard crosses `/`, and `**` anywhere
    /// behaves like `*`.
    pub fn glob(pattern: &str) -> OptionsResult<Self> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .backslash_escape(true)
            .build()?;
        Ok(UrlMatcher::Glob(glob.compile_matcher()))
    }

    pub fn regex(regex: Regex) -> Self {
        UrlMatcher::Regex(regex)
    }

    pub fn regex_str(regex: &str) -> OptionsResult<Self> {
        Ok(UrlMatcher::Regex(Regex::new(regex)?))
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        UrlMatcher::Predicate(Arc::new(predicate))
    }

    pub fn matches(&self, url: &str) -> bool {
        let matched = match self {
            UrlMatcher::Glob(pattern) => pattern.is_match(url),
            UrlMatcher::Regex(regex) => regex.is_match(url),
            UrlMatcher::Predicate(predicate) => predicate(url),
        };
        trace!("{:?} against {} -> {}", self, url, matched);
        matched
    }
}

impl From<Regex> for UrlMatcher {
    fn from(regex: Regex) -> Self {
        UrlMatcher::Regex(regex)
    }
}

impl TryFrom<&str> for UrlMatcher {
    type Error = crate::error::OptionsError;

    fn try_from(pattern: &str) -> Result<Self, Self::Error> {
        UrlMatcher::glob(pattern)
    }
}

impl TryFrom<String> for UrlMatcher {
    type Error = crate::error::OptionsError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        UrlMatcher::glob(&pattern)
    }
}

impl fmt::Debug for UrlMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlMatcher::Glob(pattern) => f.debug_tuple("Glob").field(&pattern.glob().glob()).finish(),
            UrlMatcher::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            UrlMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
