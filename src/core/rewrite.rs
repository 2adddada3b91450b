//! Attribute rewriting pipeline
//!
//! A [`RewriterChain`] is an ordered list of [`ReplaceAttr`] functions. Each
//! one receives the group path and the attribute produced by the previous
//! function, so registering `a` then `b` yields `b(a(x))`. The empty chain is
//! the identity.

use super::attr::{is_zero_time, Attr, Value, SOURCE_KEY, TIME_KEY};
use super::timestamp::TimestampFormat;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A pure function transforming one attribute
///
/// The first argument is the path of groups the attribute is nested in.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/// Wrap a closure as a [`ReplaceAttr`]
pub fn replace_attr<F>(f: F) -> ReplaceAttr
where
    F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered composition of rewriters
#[derive(Clone, Default)]
pub struct RewriterChain {
    steps: Vec<ReplaceAttr>,
}

impl RewriterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rewriter; it runs after every rewriter already registered
    pub fn push(&mut self, rewriter: ReplaceAttr) {
        self.steps.push(rewriter);
    }

    pub fn extend<I: IntoIterator<Item = ReplaceAttr>>(&mut self, rewriters: I) {
        self.steps.extend(rewriters);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run `attr` through every rewriter in registration order
    pub fn apply(&self, groups: &[String], attr: Attr) -> Attr {
        self.steps.iter().fold(attr, |acc, step| step(groups, acc))
    }
}

impl fmt::Debug for RewriterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriterChain")
            .field("len", &self.steps.len())
            .finish()
    }
}

fn dependency_cache_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.cargo/(?:registry/src/[^/]+|git/checkouts)/(.*)$")
            .expect("dependency cache regex must compile")
    })
}

/// Last segment of a qualified function path
///
/// `my_crate::handlers::get_user` becomes `get_user`, `pkg/sub.Handler`
/// becomes `Handler`.
pub fn base_function_name(function: &str) -> &str {
    function
        .rsplit(|c: char| c == '/' || c == '.' || c == ':')
        .next()
        .unwrap_or(function)
}

fn trim_separators(dir: &str) -> &str {
    dir.trim_matches(|c: char| c == '/' || c == '\\')
}

/// Rewriter for the call-site attribute
///
/// Splits the raw file path into `directory` and `file`, trims the function
/// to its bare name and shortens dependency-cache directories
/// (`~/.cargo/registry/src/<index>/serde-1.0.0/src` becomes
/// `serde-1.0.0/src`). With `depth = Some(n)` only the last `n` directory
/// components are kept. Any other attribute is returned unchanged.
pub fn source_rewriter(depth: Option<usize>) -> ReplaceAttr {
    replace_attr(move |_groups, attr| {
        if attr.key != SOURCE_KEY {
            return attr;
        }
        let mut src = match attr.value {
            Value::Source(src) => src,
            other => {
                return Attr {
                    key: attr.key,
                    value: other,
                }
            }
        };

        if src.directory.is_empty() {
            let normalized = src.file.replace('\\', "/");
            if let Some((dir, file)) = normalized.rsplit_once('/') {
                src.directory = trim_separators(dir).to_string();
                src.file = file.to_string();
            }
        }
        src.function = base_function_name(&src.function).to_string();

        let cached = dependency_cache_pattern()
            .captures(&src.directory)
            .map(|caps| trim_separators(&caps[1]).to_string());
        if let Some(dir) = cached {
            src.directory = dir;
        }

        if let Some(depth) = depth {
            let parts: Vec<&str> = src.directory.split('/').filter(|p| !p.is_empty()).collect();
            let keep = parts.len().min(depth);
            src.directory = parts[parts.len() - keep..].join("/");
        }

        Attr {
            key: attr.key,
            value: Value::Source(src),
        }
    })
}

/// Rewriter formatting the built-in timestamp
///
/// Only non-zero `time` values are touched; the zero sentinel passes
/// through so downstream encoders can still omit it. A custom format that
/// cannot be rendered leaves the value unchanged.
pub fn time_rewriter(format: TimestampFormat) -> ReplaceAttr {
    replace_attr(move |_groups, attr| {
        if attr.key != TIME_KEY {
            return attr;
        }
        if let Value::Time(t) = &attr.value {
            if !is_zero_time(t) {
                if let Some(formatted) = format.try_format(t) {
                    return Attr {
                        key: attr.key,
                        value: Value::String(formatted),
                    };
                }
            }
        }
        attr
    })
}
