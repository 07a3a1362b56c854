//! Call-scoped description of a failure site.
//!
//! A [`DiagnosticContext`] lives for one termination call and is never
//! stored. The shape of its optional details is checked when the context is
//! built: an interleaved token list must hold 2, 4 or 6 tokens, and typed
//! pair arrays only exist for 1 to 3 pairs.

use std::borrow::Cow;

use thiserror::Error;

use crate::value::{IntoValue, Value};
use crate::version::VERSION_TAG;

/// Upper bound on name/value pairs in the bracketed form.
pub const MAX_PAIRS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("expected 2, 4 or 6 interleaved name/value tokens, got {0}")]
    TokenCount(usize),
}

/// Source location of the failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> Site<'a> {
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }
}

/// Captures the caller's `file!()` and `line!()`.
#[macro_export]
macro_rules! site {
    () => {
        $crate::Site::new(file!(), line!())
    };
}

/// A single `name: value` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair<'a> {
    pub name: Value<'a>,
    pub value: Value<'a>,
}

impl<'a> Pair<'a> {
    pub fn new(name: impl IntoValue<'a>, value: impl IntoValue<'a>) -> Self {
        Self {
            name: name.into_value(),
            value: value.into_value(),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Fixed-size pair arrays accepted by [`Details::pairs`]: `[Pair; 1]`,
/// `[Pair; 2]` and `[Pair; 3]`. Any other length does not implement this
/// trait and fails to compile.
///
/// ```
/// use terminus_core::{Details, Pair};
///
/// let details = Details::pairs([Pair::new("a", 1), Pair::new("b", 2), Pair::new("c", 3)]);
/// assert!(matches!(details, Details::Pairs(_)));
/// ```
///
/// Four pairs are rejected:
///
/// ```compile_fail
/// use terminus_core::{Details, Pair};
///
/// let _ = Details::pairs([
///     Pair::new("a", 1),
///     Pair::new("b", 2),
///     Pair::new("c", 3),
///     Pair::new("d", 4),
/// ]);
/// ```
///
/// So is an empty array:
///
/// ```compile_fail
/// use terminus_core::{Details, Pair};
///
/// let empty: [Pair<'static>; 0] = [];
/// let _ = Details::pairs(empty);
/// ```
pub trait PairArray<'a>: sealed::Sealed {
    fn into_pairs(self) -> Vec<Pair<'a>>;
}

macro_rules! impl_pair_array {
    ($($n:literal),+) => {
        $(
            impl sealed::Sealed for [Pair<'_>; $n] {}

            impl<'a> PairArray<'a> for [Pair<'a>; $n] {
                fn into_pairs(self) -> Vec<Pair<'a>> {
                    self.into()
                }
            }
        )+
    };
}

impl_pair_array!(1, 2, 3);

/// 1 to 3 pairs, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct PairList<'a>(Vec<Pair<'a>>);

impl<'a> PairList<'a> {
    pub fn as_slice(&self) -> &[Pair<'a>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Optional context attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Details<'a> {
    #[default]
    None,
    /// Rendered as ` [name: value, ...]`.
    Pairs(PairList<'a>),
    /// Rendered as ` with <names> = (v1, v2, ...). `. Names and values are
    /// zipped by position only; keeping them aligned is up to the caller.
    Named {
        names: Cow<'a, str>,
        values: Vec<Value<'a>>,
    },
}

impl<'a> Details<'a> {
    pub fn pairs<P: PairArray<'a>>(pairs: P) -> Self {
        Details::Pairs(PairList(pairs.into_pairs()))
    }

    /// Build pairs from a flat `name, value, name, value, ...` list.
    pub fn from_tokens<I>(tokens: I) -> Result<Self, ContextError>
    where
        I: IntoIterator,
        I::Item: IntoValue<'a>,
    {
        let tokens: Vec<Value<'a>> = tokens.into_iter().map(IntoValue::into_value).collect();
        let count = tokens.len();
        if count == 0 || count % 2 != 0 || count > MAX_PAIRS * 2 {
            return Err(ContextError::TokenCount(count));
        }

        let mut iter = tokens.into_iter();
        let mut pairs = Vec::with_capacity(count / 2);
        while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
            pairs.push(Pair { name, value });
        }
        Ok(Details::Pairs(PairList(pairs)))
    }

    pub fn named<I>(names: impl Into<Cow<'a, str>>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoValue<'a>,
    {
        Details::Named {
            names: names.into(),
            values: values.into_iter().map(IntoValue::into_value).collect(),
        }
    }
}

/// Everything the formatter needs for one diagnostic line.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticContext<'a> {
    pub site: Site<'a>,
    pub version: &'a str,
    pub message: &'a str,
    pub details: Details<'a>,
}

impl<'a> DiagnosticContext<'a> {
    pub fn new(message: &'a str, site: Site<'a>) -> Self {
        Self {
            site,
            version: VERSION_TAG,
            message,
            details: Details::None,
        }
    }

    pub fn with_details(mut self, details: Details<'a>) -> Self {
        self.details = details;
        self
    }

    pub fn with_pairs<P: PairArray<'a>>(self, pairs: P) -> Self {
        self.with_details(Details::pairs(pairs))
    }

    pub fn with_tokens<I>(self, tokens: I) -> Result<Self, ContextError>
    where
        I: IntoIterator,
        I::Item: IntoValue<'a>,
    {
        Ok(self.with_details(Details::from_tokens(tokens)?))
    }

    pub fn with_named<I>(self, names: impl Into<Cow<'a, str>>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoValue<'a>,
    {
        self.with_details(Details::named(names, values))
    }

    /// Replace the build tag. Used by hosts that embed this crate under
    /// their own version string.
    pub fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: usize) -> Vec<Value<'static>> {
        (0..n).map(|i| Value::Int(i as i64)).collect()
    }

    #[test]
    fn test_token_counts_accepted() {
        for (count, pairs) in [(2, 1), (4, 2), (6, 3)] {
            match Details::from_tokens(tokens(count)).unwrap() {
                Details::Pairs(list) => assert_eq!(list.len(), pairs),
                other => panic!("unexpected details: {other:?}"),
            }
        }
    }

    #[test]
    fn test_token_counts_rejected() {
        for count in [0, 1, 3, 5, 7, 8] {
            assert_eq!(
                Details::from_tokens(tokens(count)),
                Err(ContextError::TokenCount(count))
            );
        }
    }

    #[test]
    fn test_tokens_pair_in_order() {
        let details = Details::from_tokens(["expected", "5", "actual", "7"]).unwrap();
        let Details::Pairs(list) = details else {
            panic!("expected pairs");
        };
        assert_eq!(list.as_slice()[0], Pair::new("expected", "5"));
        assert_eq!(list.as_slice()[1], Pair::new("actual", "7"));
    }

    #[test]
    fn test_typed_pairs() {
        let ctx = DiagnosticContext::new("bad", Site::new("a.rs", 1))
            .with_pairs([Pair::new("x", 1), Pair::new("y", 2.5)]);
        let Details::Pairs(list) = &ctx.details else {
            panic!("expected pairs");
        };
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_named_is_not_cross_checked() {
        let ctx = DiagnosticContext::new("bad", Site::new("a.rs", 1))
            .with_named("a, b, c", [1, 2]);
        match ctx.details {
            Details::Named { names, values } => {
                assert_eq!(names, "a, b, c");
                assert_eq!(values.len(), 2);
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn test_default_version_tag() {
        let ctx = DiagnosticContext::new("bad", site!());
        assert_eq!(ctx.version, VERSION_TAG);
        assert!(ctx.site.file.ends_with("context.rs"));
    }
}
