//! Tokenizes a pattern into an [ast::Regex].
//!
//! Patterns are byte strings. Each byte is widened to a `char` and paired
//! with its offset in the pattern before being handed to the parser, so
//! every character the parser sees maps back to exactly one pattern byte.

use parcel::parsers::character::expect_character;
use parcel::prelude::v1::*;

use crate::ast;
use crate::CompileError;

/// Parses a pattern, represented as offset-tagged characters, into its AST.
///
/// # Example
///
/// ```
/// use bre_compiler::{ast, parse};
///
/// let input: Vec<(usize, char)> = "^a".chars().enumerate().collect();
///
/// assert_eq!(
///     Ok(ast::Regex::StartOfLineAnchored(ast::Expression(vec![ast::Token::new(
///         1,
///         ast::ExpressionItem::Char(ast::Char(b'a'))
///     )]))),
///     parse(&input)
/// );
/// ```
pub fn parse(input: &[(usize, char)]) -> Result<ast::Regex, CompileError> {
    match parse_prefix(input) {
        (regex, None) => Ok(regex),
        (_, Some(e)) => Err(e),
    }
}

/// Parses as much of the pattern as is well formed, returning it along with
/// the error that stopped parsing short of the end, if any.
pub(crate) fn parse_prefix(input: &[(usize, char)]) -> (ast::Regex, Option<CompileError>) {
    match regex().parse(input) {
        Ok(MatchStatus::Match {
            remainder, inner, ..
        }) if remainder.is_empty() => (inner, None),
        Ok(MatchStatus::Match {
            remainder, inner, ..
        }) => (inner, Some(unparsed_remainder(remainder))),
        Ok(MatchStatus::NoMatch(remainder)) => (empty(), Some(unparsed_remainder(remainder))),
        Err(e) => (empty(), Some(CompileError::Undefined(e.to_string()))),
    }
}

fn empty() -> ast::Regex {
    ast::Regex::Unanchored(ast::Expression(vec![]))
}

/// Classifies why parsing stopped short of the end of the pattern.
fn unparsed_remainder(remainder: &[(usize, char)]) -> CompileError {
    match remainder {
        [(offset, '['), ..] => CompileError::MalformedClass { offset: *offset },
        [(_, '\\'), (offset, '\0'), ..] => CompileError::EmbeddedNul { offset: *offset },
        [(offset, '\\')] => CompileError::TrailingBackslash { offset: *offset },
        [(offset, '\0'), ..] => CompileError::EmbeddedNul { offset: *offset },
        [(offset, c), ..] => {
            CompileError::Undefined(format!("unexpected {:?} at offset {}", c, offset))
        }
        [] => CompileError::Undefined("unexpected end of pattern".to_string()),
    }
}

fn regex<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Regex> {
    parcel::join(
        parcel::optional(start_of_line_anchor()).map(|anchor| anchor.is_some()),
        expression(),
    )
    .map(|(anchored, expression)| match anchored {
        true => ast::Regex::StartOfLineAnchored(expression),
        false => ast::Regex::Unanchored(expression),
    })
}

fn start_of_line_anchor<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::StartOfLineAnchor> {
    expect_character('^').map(|_| ast::StartOfLineAnchor)
}

fn expression<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Expression> {
    parcel::zero_or_more(token()).map(ast::Expression)
}

fn token<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Token> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(offset, _)) => expression_item()
            .map(move |item| ast::Token::new(offset, item))
            .parse(input),
        None => Ok(MatchStatus::NoMatch(input)),
    }
}

fn expression_item<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::ExpressionItem> {
    parcel::or(bracket_expression().map(Into::into), || {
        parcel::or(escape_sequence(), || {
            parcel::or(
                expect_character('.').map(|_| ast::ExpressionItem::AnyCharacter),
                || {
                    parcel::or(expect_character('*').map(|_| ast::ExpressionItem::Star), || {
                        parcel::or(
                            expect_character('$').map(|_| ast::ExpressionItem::EndOfLine),
                            || character().map(Into::into),
                        )
                    })
                },
            )
        })
    })
}

// Escapes

/// Parses a backslash and the byte it escapes into a group delimiter, a
/// backreference or a literal.
fn escape_sequence<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::ExpressionItem> {
    move |input: &'a [(usize, char)]| match input.get(0..2) {
        Some(&[(start, '\\'), (end, escaped)]) if escaped != '\0' => {
            let item = match escaped {
                '(' => ast::ExpressionItem::GroupOpen,
                ')' => ast::ExpressionItem::GroupClose,
                '1'..='9' => ast::Backreference(as_byte(escaped) - b'0').into(),
                _ => ast::Char(as_byte(escaped)).into(),
            };

            Ok(MatchStatus::Match {
                span: start..end + 1,
                remainder: &input[2..],
                inner: item,
            })
        }
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

// Bracket Expressions

/// Parses a `[...]` or `[^...]` expression. The first member is always taken
/// literally, allowing `]` to be a member when it comes first.
fn bracket_expression<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::BracketExpression> {
    parcel::join(
        parcel::right(parcel::join(
            expect_character('['),
            parcel::optional(expect_character('^')).map(|negation| negation.is_some()),
        )),
        parcel::left(parcel::join(
            parcel::join(
                pattern_byte(),
                parcel::zero_or_more(pattern_byte().predicate(|c| *c != ']')),
            ),
            expect_character(']'),
        )),
    )
    .map(|(negated, (first, rest))| {
        let items = std::iter::once(first).chain(rest).map(as_byte).collect();

        match negated {
            true => ast::BracketExpression::NegatedItems(items),
            false => ast::BracketExpression::Items(items),
        }
    })
}

// Terminals

fn character<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Char> {
    pattern_byte()
        .predicate(|c| !['[', '\\'].contains(c))
        .map(|c| ast::Char(as_byte(c)))
}

/// Matches any single pattern byte other than NUL.
fn pattern_byte<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(pos, next)) if next != '\0' => Ok(MatchStatus::Match {
            span: pos..pos + 1,
            remainder: &input[1..],
            inner: next,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

/// Narrows a pattern character back to the byte it was widened from.
fn as_byte(c: char) -> u8 {
    // pattern input is produced from bytes, so every char is in 0..=255.
    u8::try_from(c).unwrap_or(b'?')
}
