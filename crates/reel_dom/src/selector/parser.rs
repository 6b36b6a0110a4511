//! Selector parser
//!
//! Parses the structural subset of CSS selectors the document supports:
//!
//! - Type and universal selectors: `button`, `*`
//! - `#id`, `.class`
//! - Attribute selectors: `[disabled]`, `[data-index="3"]`, `[type=button]`
//! - Descendant (whitespace) and child (`>`) combinators
//! - Selector lists: `.a, .b > .c`

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, value, verify},
    error::{context, VerboseError},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    Finish, IResult,
};

use crate::error::{DomError, Result};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub(crate) selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators, stored left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub(crate) head: CompoundSelector,
    pub(crate) tail: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// A run of simple selectors that all apply to one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// `None` for `*` or when no type selector is given
    pub(crate) tag: Option<String>,
    pub(crate) parts: Vec<SimpleSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = all_consuming(delimited(multispace0, selector_list, multispace0))(text).finish();

        match parsed {
            Ok((_, selectors)) => Ok(Self { selectors }),
            Err(err) => {
                let remaining = err.errors.first().map(|(input, _)| *input).unwrap_or(text);
                let position = text.len() - remaining.len();
                tracing::debug!("selector parse failed at {}: {:?}", position, text);
                Err(DomError::InvalidSelector {
                    selector: text.to_string(),
                    position,
                })
            }
        }
    }

    /// Individual selectors in the list
    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }
}

impl ComplexSelector {
    /// The compound selector the matched element itself must satisfy
    pub(crate) fn subject(&self) -> &CompoundSelector {
        self.tail.last().map(|(_, c)| c).unwrap_or(&self.head)
    }
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn type_selector(input: &str) -> ParseResult<'_, Option<String>> {
    alt((
        value(None, tag("*")),
        map(identifier, |name: &str| Some(name.to_ascii_lowercase())),
    ))(input)
}

fn quoted(input: &str) -> ParseResult<'_, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
    ))(input)
}

fn attribute(input: &str) -> ParseResult<'_, SimpleSelector> {
    context(
        "attribute selector",
        map(
            delimited(
                char('['),
                tuple((
                    delimited(multispace0, identifier, multispace0),
                    opt(preceded(
                        terminated(char('='), multispace0),
                        alt((quoted, identifier)),
                    )),
                )),
                preceded(multispace0, char(']')),
            ),
            |(name, value): (&str, Option<&str>)| SimpleSelector::Attribute {
                name: name.to_ascii_lowercase(),
                value: value.map(str::to_string),
            },
        ),
    )(input)
}

fn simple_selector(input: &str) -> ParseResult<'_, SimpleSelector> {
    alt((
        map(preceded(char('#'), identifier), |id: &str| {
            SimpleSelector::Id(id.to_string())
        }),
        map(preceded(char('.'), identifier), |class: &str| {
            SimpleSelector::Class(class.to_string())
        }),
        attribute,
    ))(input)
}

fn compound_selector(input: &str) -> ParseResult<'_, CompoundSelector> {
    context(
        "compound selector",
        alt((
            map(
                pair(type_selector, many0(simple_selector)),
                |(tag, parts)| CompoundSelector { tag, parts },
            ),
            map(
                verify(many0(simple_selector), |parts: &Vec<SimpleSelector>| {
                    !parts.is_empty()
                }),
                |parts| CompoundSelector { tag: None, parts },
            ),
        )),
    )(input)
}

fn combinator(input: &str) -> ParseResult<'_, Combinator> {
    alt((
        value(
            Combinator::Child,
            delimited(multispace0, char('>'), multispace0),
        ),
        value(Combinator::Descendant, multispace1),
    ))(input)
}

fn complex_selector(input: &str) -> ParseResult<'_, ComplexSelector> {
    map(
        pair(
            compound_selector,
            many0(pair(combinator, compound_selector)),
        ),
        |(head, tail)| ComplexSelector { head, tail },
    )(input)
}

fn selector_list(input: &str) -> ParseResult<'_, Vec<ComplexSelector>> {
    separated_list1(
        delimited(multispace0, char(','), multispace0),
        complex_selector,
    )(input)
}
