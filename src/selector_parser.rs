// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use indexmap::IndexSet;
use nom::bytes::complete::tag;
use nom::bytes::complete::take_until;
use nom::character::complete::multispace0;
use nom::sequence::delimited;
use nom::IResult;
use nom::Parser;

use crate::constants::*;
use crate::error::Error;
use crate::error::Result;
use crate::util::url_decode;
use crate::JsonParseOptions;
use crate::JsonPointer;

/// Parses a field selector string into its pointers.
///
/// ```text
/// selector := term (',' term)*
/// term     := path ('(' selector ')')?
/// ```
///
/// A grouped term prefixes every pointer of its inner selector with its path.
/// Terms holding a `{{ placeholder }}` are taken literally. Duplicate
/// pointers are dropped, the first occurrence keeps its position.
pub(crate) fn parse_field_selector(
    selector: &str,
    options: &JsonParseOptions,
) -> Result<IndexSet<JsonPointer>> {
    if selector.is_empty() {
        return Err(Error::field_selector(
            selector,
            "The field selector must not be empty.",
        ));
    }
    let decoded = if options.is_apply_url_decoding() {
        Cow::Owned(url_decode(selector).map_err(|reason| {
            Error::field_selector(
                selector,
                format!(
                    "The field selector could not be URL-decoded: {reason}. \
                     Make sure it is properly URL-encoded."
                ),
            )
        })?)
    } else {
        Cow::Borrowed(selector)
    };

    let opening = decoded.matches(GROUP_OPEN).count();
    let closing = decoded.matches(GROUP_CLOSE).count();
    if opening != closing {
        return Err(Error::field_selector(
            selector,
            format!(
                "The field selector contains {opening} opening but {closing} closing \
                 parentheses. Make sure every opening parenthesis is closed."
            ),
        ));
    }

    let mut pointers = IndexSet::new();
    collect_pointers(&decoded, &JsonPointer::empty(), &mut pointers)?;
    tracing::trace!(selector, count = pointers.len(), "parsed field selector");
    Ok(pointers)
}

fn collect_pointers(
    input: &str,
    prefix: &JsonPointer,
    pointers: &mut IndexSet<JsonPointer>,
) -> Result<()> {
    for term in split_terms(input) {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        match group_bounds(term) {
            Some((open, close)) if !contains_placeholder(term) => {
                let trailing = term[close + 1..].trim();
                if !trailing.is_empty() {
                    return Err(Error::field_selector(
                        term,
                        format!(
                            "Unexpected <{trailing}> after the closing parenthesis. \
                             Separate further fields with a comma."
                        ),
                    ));
                }
                let group = prefix.append(&JsonPointer::of(term[..open].trim())?);
                let inner = &term[open + 1..close];
                if inner.trim().is_empty() {
                    pointers.insert(group);
                } else {
                    collect_pointers(inner, &group, pointers)?;
                }
            }
            _ => {
                pointers.insert(prefix.append(&JsonPointer::of(term)?));
            }
        }
    }
    Ok(())
}

/// Splits at the commas outside of parentheses and placeholders.
fn split_terms(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut terms = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(PLACEHOLDER_OPEN.as_bytes()) {
            if let Ok((rest, _)) = placeholder(&input[i..]) {
                i = input.len() - rest.len();
                continue;
            }
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                terms.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    terms.push(&input[start..]);
    terms
}

/// Positions of the first `(` and the last `)` of a grouped term. A term is
/// grouped when its first `(` comes before its first `)`.
fn group_bounds(term: &str) -> Option<(usize, usize)> {
    let open = term.find(GROUP_OPEN)?;
    let first_close = term.find(GROUP_CLOSE)?;
    let close = term.rfind(GROUP_CLOSE)?;
    if open < first_close {
        Some((open, close))
    } else {
        None
    }
}

fn placeholder(input: &str) -> IResult<&str, &str> {
    delimited(
        (tag(PLACEHOLDER_OPEN), multispace0),
        take_until(PLACEHOLDER_CLOSE),
        tag(PLACEHOLDER_CLOSE),
    )
    .parse(input)
}

fn contains_placeholder(term: &str) -> bool {
    term.match_indices(PLACEHOLDER_OPEN).any(|(i, _)| {
        matches!(placeholder(&term[i..]), Ok((_, name)) if !name.trim().is_empty())
    })
}
