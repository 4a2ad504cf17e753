//! Parser combinators.
//!
//! A parser is any `Fn(&str, usize) -> Outcome<T>`: it looks at the input
//! starting at a byte offset and either produces a value together with the
//! offset just past what it consumed, or a [`Failure`].
//!
//! Choice is ordered and only falls through on failures that consumed
//! nothing. A failure that consumed input commits the enclosing choice unless
//! it was wrapped in [`attempt`], which rewinds the failure to where the
//! attempt started. Positions only move by whole characters.

use crate::span::Span;
use std::fmt;

/// A parse failure: what was expected, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Description of the expected input, e.g. `"\"/>\""` or `any`.
    pub expected: String,
    /// Byte offset where the failure was detected.
    pub position: usize,
}

impl Failure {
    /// Create a new failure.
    pub fn new(expected: impl Into<String>, position: usize) -> Self {
        Self {
            expected: expected.into(),
            position,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} at offset {}", self.expected, self.position)
    }
}

impl std::error::Error for Failure {}

/// The result of running a parser: a value and the next position.
pub type Outcome<T> = Result<(T, usize), Failure>;

#[inline]
fn next_char(input: &str, position: usize) -> Option<char> {
    input.get(position..).and_then(|rest| rest.chars().next())
}

// =============================================================================
// Primitives
// =============================================================================

/// Match one exact character.
pub fn literal_char(expected: char) -> impl Fn(&str, usize) -> Outcome<Span> {
    move |input: &str, position: usize| match next_char(input, position) {
        Some(c) if c == expected => {
            let next = position + c.len_utf8();
            Ok((Span::new(position, next), next))
        }
        _ => Err(Failure::new(format!("\"{expected}\""), position)),
    }
}

/// Match an exact string.
pub fn literal_string(expected: &'static str) -> impl Fn(&str, usize) -> Outcome<Span> {
    move |input: &str, position: usize| {
        let matched = input
            .get(position..)
            .is_some_and(|rest| rest.starts_with(expected));
        if matched {
            let next = position + expected.len();
            Ok((Span::new(position, next), next))
        } else {
            Err(Failure::new(format!("\"{expected}\""), position))
        }
    }
}

/// Match one character satisfying `predicate`.
pub fn char_class(
    description: &'static str,
    predicate: impl Fn(char) -> bool,
) -> impl Fn(&str, usize) -> Outcome<Span> {
    move |input: &str, position: usize| match next_char(input, position) {
        Some(c) if predicate(c) => {
            let next = position + c.len_utf8();
            Ok((Span::new(position, next), next))
        }
        _ => Err(Failure::new(description, position)),
    }
}

/// Match any single character.
pub fn any_char(input: &str, position: usize) -> Outcome<Span> {
    match next_char(input, position) {
        Some(c) => {
            let next = position + c.len_utf8();
            Ok((Span::new(position, next), next))
        }
        None => Err(Failure::new("any", position)),
    }
}

/// Match one character, provided none of `delimiters` starts here.
pub fn exclude(delimiters: &'static [&'static str]) -> impl Fn(&str, usize) -> Outcome<Span> {
    move |input: &str, position: usize| {
        let rest = input.get(position..).unwrap_or_default();
        let Some(c) = rest.chars().next() else {
            let listed = delimiters
                .iter()
                .map(|delimiter| format!("\"{delimiter}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Failure::new(format!("not {listed}"), position));
        };

        if let Some(delimiter) = delimiters.iter().find(|d| rest.starts_with(**d)) {
            return Err(Failure::new(format!("not \"{delimiter}\""), position));
        }

        let next = position + c.len_utf8();
        Ok((Span::new(position, next), next))
    }
}

/// Succeed only at the end of the input.
pub fn end_of_input(input: &str, position: usize) -> Outcome<Span> {
    if position >= input.len() {
        Ok((Span::empty(position), position))
    } else {
        Err(Failure::new("end of input", position))
    }
}

// =============================================================================
// Sequencing
// =============================================================================

/// A tuple of parsers run one after another.
pub trait Sequence {
    /// Tuple of the parsers' values.
    type Output;

    /// Run every parser in order, stopping at the first failure.
    fn parse_sequence(&self, input: &str, position: usize) -> Outcome<Self::Output>;
}

macro_rules! impl_sequence {
    ($($parser:ident $value:ident $binding:ident $index:tt),+) => {
        impl<$($parser, $value),+> Sequence for ($($parser,)+)
        where
            $($parser: Fn(&str, usize) -> Outcome<$value>),+
        {
            type Output = ($($value,)+);

            fn parse_sequence(&self, input: &str, position: usize) -> Outcome<Self::Output> {
                let next = position;
                $(let ($binding, next) = (self.$index)(input, next)?;)+
                Ok((($($binding,)+), next))
            }
        }
    };
}

impl_sequence!(P0 V0 v0 0, P1 V1 v1 1);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4, P5 V5 v5 5);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4, P5 V5 v5 5, P6 V6 v6 6);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4, P5 V5 v5 5, P6 V6 v6 6, P7 V7 v7 7);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4, P5 V5 v5 5, P6 V6 v6 6, P7 V7 v7 7, P8 V8 v8 8);
impl_sequence!(P0 V0 v0 0, P1 V1 v1 1, P2 V2 v2 2, P3 V3 v3 3, P4 V4 v4 4, P5 V5 v5 5, P6 V6 v6 6, P7 V7 v7 7, P8 V8 v8 8, P9 V9 v9 9);

/// Run a tuple of parsers in order and collect their values.
pub fn sequence<S: Sequence>(parsers: S) -> impl Fn(&str, usize) -> Outcome<S::Output> {
    move |input: &str, position: usize| parsers.parse_sequence(input, position)
}

/// Run `first` then `second`.
pub fn and<A, B>(
    first: impl Fn(&str, usize) -> Outcome<A>,
    second: impl Fn(&str, usize) -> Outcome<B>,
) -> impl Fn(&str, usize) -> Outcome<(A, B)> {
    move |input: &str, position: usize| {
        let (a, next) = first(input, position)?;
        let (b, next) = second(input, next)?;
        Ok(((a, b), next))
    }
}

// =============================================================================
// Choice
// =============================================================================

/// Try `first`; if it fails without consuming input, try `second`.
pub fn or_else<T>(
    first: impl Fn(&str, usize) -> Outcome<T>,
    second: impl Fn(&str, usize) -> Outcome<T>,
) -> impl Fn(&str, usize) -> Outcome<T> {
    move |input: &str, position: usize| match first(input, position) {
        Err(failure) if failure.position == position => second(input, position),
        outcome => outcome,
    }
}

/// Run `parser`, rewinding any failure to the starting position.
pub fn attempt<T>(parser: impl Fn(&str, usize) -> Outcome<T>) -> impl Fn(&str, usize) -> Outcome<T> {
    move |input: &str, position: usize| {
        parser(input, position).map_err(|failure| Failure {
            position,
            ..failure
        })
    }
}

/// A tuple of parsers producing the same type, tried in order.
pub trait Alternatives<T> {
    /// Return the first success, or the furthest non-consuming failure.
    fn parse_first(&self, input: &str, position: usize) -> Outcome<T>;
}

macro_rules! impl_alternatives {
    ($($parser:ident $index:tt),+) => {
        impl<T, $($parser),+> Alternatives<T> for ($($parser,)+)
        where
            $($parser: Fn(&str, usize) -> Outcome<T>),+
        {
            fn parse_first(&self, input: &str, position: usize) -> Outcome<T> {
                let mut furthest: Option<Failure> = None;
                $(
                    match (self.$index)(input, position) {
                        Err(failure) if failure.position == position => match &furthest {
                            Some(kept) if kept.position >= failure.position => {}
                            _ => furthest = Some(failure),
                        },
                        outcome => return outcome,
                    }
                )+
                Err(furthest.unwrap_or_else(|| Failure::new("alternatives", position)))
            }
        }
    };
}

impl_alternatives!(P0 0, P1 1);
impl_alternatives!(P0 0, P1 1, P2 2);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10, P11 11);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10, P11 11, P12 12);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10, P11 11, P12 12, P13 13);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10, P11 11, P12 12, P13 13, P14 14);
impl_alternatives!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7, P8 8, P9 9, P10 10, P11 11, P12 12, P13 13, P14 14, P15 15);

/// Ordered choice over a tuple of parsers.
pub fn first_of<T, A: Alternatives<T>>(alternatives: A) -> impl Fn(&str, usize) -> Outcome<T> {
    move |input: &str, position: usize| alternatives.parse_first(input, position)
}

// =============================================================================
// Repetition
// =============================================================================

/// Run `parser` until it fails without consuming input.
///
/// A success that consumes nothing also ends the loop.
pub fn zero_or_more<T>(
    parser: impl Fn(&str, usize) -> Outcome<T>,
) -> impl Fn(&str, usize) -> Outcome<Vec<T>> {
    move |input: &str, position: usize| {
        let mut values = Vec::new();
        let next = repeat(&parser, input, position, &mut values)?;
        Ok((values, next))
    }
}

/// Like [`zero_or_more`], but the first run must succeed.
pub fn one_or_more<T>(
    parser: impl Fn(&str, usize) -> Outcome<T>,
) -> impl Fn(&str, usize) -> Outcome<Vec<T>> {
    move |input: &str, position: usize| {
        let (value, next) = parser(input, position)?;
        let mut values = vec![value];
        if next == position {
            return Ok((values, next));
        }
        let next = repeat(&parser, input, next, &mut values)?;
        Ok((values, next))
    }
}

fn repeat<T>(
    parser: &impl Fn(&str, usize) -> Outcome<T>,
    input: &str,
    mut position: usize,
    values: &mut Vec<T>,
) -> Result<usize, Failure> {
    loop {
        match parser(input, position) {
            Ok((value, next)) => {
                values.push(value);
                if next == position {
                    return Ok(position);
                }
                position = next;
            }
            Err(failure) if failure.position == position => return Ok(position),
            Err(failure) => return Err(failure),
        }
    }
}

/// `Some(value)`, or `None` if `parser` fails without consuming input.
pub fn optional<T>(
    parser: impl Fn(&str, usize) -> Outcome<T>,
) -> impl Fn(&str, usize) -> Outcome<Option<T>> {
    move |input: &str, position: usize| match parser(input, position) {
        Ok((value, next)) => Ok((Some(value), next)),
        Err(failure) if failure.position == position => Ok((None, position)),
        Err(failure) => Err(failure),
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Turn a parser's value into something else, usually a tree node.
pub fn typed<T, U>(
    parser: impl Fn(&str, usize) -> Outcome<T>,
    build: impl Fn(T) -> U,
) -> impl Fn(&str, usize) -> Outcome<U> {
    move |input: &str, position: usize| {
        let (value, next) = parser(input, position)?;
        Ok((build(value), next))
    }
}

/// Discard a parser's value and return the span it consumed.
pub fn spanned<T>(parser: impl Fn(&str, usize) -> Outcome<T>) -> impl Fn(&str, usize) -> Outcome<Span> {
    move |input: &str, position: usize| {
        let (_, next) = parser(input, position)?;
        Ok((Span::new(position, next), next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_char() {
        let a = literal_char('a');
        assert_eq!(a("abc", 0), Ok((Span::new(0, 1), 1)));
        assert_eq!(a("abc", 1), Err(Failure::new("\"a\"", 1)));
        assert_eq!(a("", 0), Err(Failure::new("\"a\"", 0)));
    }

    #[test]
    fn test_literal_string() {
        let close = literal_string("/>");
        assert_eq!(close("a/>", 1), Ok((Span::new(1, 3), 3)));
        assert_eq!(close("a/", 1).unwrap_err().expected, "\"/>\"");
    }

    #[test]
    fn test_multibyte_positions() {
        assert_eq!(any_char("é!", 0), Ok((Span::new(0, 2), 2)));
        assert_eq!(literal_char('é')("xé", 1), Ok((Span::new(1, 3), 3)));
        assert_eq!(any_char("é", 2), Err(Failure::new("any", 2)));
    }

    #[test]
    fn test_char_class() {
        let digit = char_class("digit", |c| c.is_ascii_digit());
        assert!(digit("7", 0).is_ok());
        assert_eq!(digit("x", 0), Err(Failure::new("digit", 0)));
    }

    #[test]
    fn test_exclude() {
        let plain = exclude(&["{", "*/"]);
        assert_eq!(plain("a*/", 0), Ok((Span::new(0, 1), 1)));
        assert_eq!(plain("a*/", 1), Err(Failure::new("not \"*/\"", 1)));
        // A lone '*' is not the delimiter.
        assert!(plain("*a", 0).is_ok());
        assert_eq!(plain("", 0), Err(Failure::new("not \"{\", \"*/\"", 0)));
    }

    #[test]
    fn test_end_of_input() {
        assert!(end_of_input("ab", 2).is_ok());
        assert_eq!(end_of_input("ab", 1), Err(Failure::new("end of input", 1)));
    }

    #[test]
    fn test_sequence_propagates_first_failure() {
        let tag = sequence((literal_char('<'), literal_string("div"), literal_char('>')));
        let ((open, name, close), next) = tag("<div>", 0).unwrap();
        assert_eq!(open, Span::new(0, 1));
        assert_eq!(name, Span::new(1, 4));
        assert_eq!(close, Span::new(4, 5));
        assert_eq!(next, 5);

        let failure = tag("<dig>", 0).unwrap_err();
        assert_eq!(failure.position, 1);
        assert_eq!(failure.expected, "\"div\"");
    }

    #[test]
    fn test_or_else_only_on_non_consuming_failure() {
        let arrow = or_else(literal_string("=>"), literal_char('='));
        assert_eq!(arrow("=", 0), Ok((Span::new(0, 1), 1)));

        let consuming = or_else(
            and(literal_char('a'), literal_char('b')),
            and(literal_char('a'), literal_char('c')),
        );
        assert_eq!(consuming("ac", 0), Err(Failure::new("\"b\"", 1)));

        let rewound = or_else(
            attempt(and(literal_char('a'), literal_char('b'))),
            and(literal_char('a'), literal_char('c')),
        );
        assert!(rewound("ac", 0).is_ok());
    }

    #[test]
    fn test_attempt_resets_position() {
        let ab = attempt(sequence((literal_char('a'), literal_char('b'))));
        assert_eq!(ab("ax", 0), Err(Failure::new("\"b\"", 0)));
    }

    #[test]
    fn test_first_of() {
        let choice = first_of((literal_char('x'), literal_char('y'), literal_char('z')));
        assert_eq!(choice("z", 0), Ok((Span::new(0, 1), 1)));
        // Ties keep the earliest alternative's expectation.
        assert_eq!(choice("w", 0), Err(Failure::new("\"x\"", 0)));

        let committed = first_of((
            spanned(and(literal_char('a'), literal_char('b'))),
            literal_string("ac"),
        ));
        assert_eq!(committed("ac", 0).unwrap_err().position, 1);
    }

    #[test]
    fn test_zero_or_more() {
        let digits = zero_or_more(char_class("digit", |c| c.is_ascii_digit()));
        let (values, next) = digits("12a", 0).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(next, 2);
        assert_eq!(digits("a", 0), Ok((Vec::new(), 0)));

        let pairs = zero_or_more(and(literal_char('a'), literal_char('b')));
        assert_eq!(pairs("aba", 0), Err(Failure::new("\"b\"", 3)));
    }

    #[test]
    fn test_zero_or_more_stops_on_empty_success() {
        let nothing = zero_or_more(optional(literal_char('x')));
        let (values, next) = nothing("abc", 0).unwrap();
        assert_eq!(values, vec![None]);
        assert_eq!(next, 0);
    }

    #[test]
    fn test_one_or_more() {
        let word = one_or_more(char_class("letter", char::is_alphabetic));
        assert_eq!(word("ab1", 0).unwrap().1, 2);
        assert_eq!(word("1", 0), Err(Failure::new("letter", 0)));
    }

    #[test]
    fn test_optional() {
        let sign = optional(literal_char('-'));
        assert_eq!(sign("-1", 0), Ok((Some(Span::new(0, 1)), 1)));
        assert_eq!(sign("1", 0), Ok((None, 0)));

        let pair = optional(and(literal_char('a'), literal_char('b')));
        assert_eq!(pair("ac", 0), Err(Failure::new("\"b\"", 1)));
    }

    #[test]
    fn test_typed_and_spanned() {
        let length = typed(one_or_more(any_char), |chars| chars.len());
        assert_eq!(length("abc", 0), Ok((3, 3)));

        let word = spanned(one_or_more(char_class("letter", char::is_alphabetic)));
        assert_eq!(word("hi there", 0), Ok((Span::new(0, 2), 2)));
    }
}
