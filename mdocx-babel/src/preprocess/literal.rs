//! Parser for macro definition lines.
//!
//! A definition is a mapping literal with quoted string keys and values:
//!
//! ```text
//! {'__project__': 'Apollo'}
//! {"__version__": "1.2", '__codename__': 'it\'s'}
//! ```
//!
//! Both quote styles are accepted, `\\`, `\'`, `\"`, `\n`, `\t` and `\r` are
//! unescaped, any other escape is kept as written. A trailing comma is allowed.
//! An empty mapping is not a definition.

use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{all_consuming, opt},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair, separated_pair, terminated},
    IResult,
};

/// Parse one definition line into its `(key, value)` pairs, in source order.
pub fn parse_mapping_literal(line: &str) -> Option<Vec<(String, String)>> {
    all_consuming(delimited(multispace0, mapping, multispace0))(line)
        .ok()
        .map(|(_, entries)| entries)
}

fn mapping(input: &str) -> IResult<&str, Vec<(String, String)>> {
    delimited(
        pair(char('{'), multispace0),
        terminated(
            separated_list1(delimited(multispace0, char(','), multispace0), entry),
            opt(pair(multispace0, char(','))),
        ),
        pair(multispace0, char('}')),
    )(input)
}

fn entry(input: &str) -> IResult<&str, (String, String)> {
    separated_pair(
        quoted_string,
        delimited(multispace0, char(':'), multispace0),
        quoted_string,
    )(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    alt((quoted('\''), quoted('"')))(input)
}

fn quoted(quote: char) -> impl Fn(&str) -> IResult<&str, String> {
    move |input: &str| {
        let (mut rest, _) = char(quote)(input)?;
        let mut out = String::new();
        loop {
            let mut chars = rest.chars();
            match chars.next() {
                None => return Err(nom::Err::Error(Error::new(rest, ErrorKind::Char))),
                Some(c) if c == quote => return Ok((chars.as_str(), out)),
                Some('\\') => {
                    match chars.next() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                        Some(other) => {
                            out.push('\\');
                            out.push(other);
                        }
                        None => return Err(nom::Err::Error(Error::new(rest, ErrorKind::Char))),
                    }
                    rest = chars.as_str();
                }
                Some(c) => {
                    out.push(c);
                    rest = chars.as_str();
                }
            }
        }
    }
}
