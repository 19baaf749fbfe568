//! Scored fuzzy matching for filterable lists.
//!
//! [`is_match`] is the gate: every query character must appear in the
//! candidate, in order, case-insensitively. [`score`] is strictly a ranking
//! signal layered on top of that gate.

use crate::choice::Choice;

/// One point per matched character.
const MATCH_POINT: u32 = 1;
/// Extra points when the previous candidate character also matched.
const STREAK_BONUS: u32 = 4;
/// Extra points for matching the very first candidate character.
const START_BONUS: u32 = 8;
/// Extra points for matching right after a separator (`-`, `_`, `/`, space…).
const BOUNDARY_BONUS: u32 = 6;

/// True when `query` is a case-insensitive subsequence of `candidate`.
/// The empty query matches everything.
pub fn is_match(query: &str, candidate: &str) -> bool {
    let mut wanted = query.chars().flat_map(char::to_lowercase);
    let mut next = wanted.next();
    for c in candidate.chars().flat_map(char::to_lowercase) {
        match next {
            Some(w) if w == c => next = wanted.next(),
            Some(_) => {}
            None => return true,
        }
    }
    next.is_none()
}

/// Relevance score for ranking; 0 when the query does not match at all.
///
/// Consecutive matches, a match at index 0, and matches right after a
/// word boundary all score above a scattered match of the same characters.
pub fn score(query: &str, candidate: &str) -> u32 {
    if query.is_empty() || !is_match(query, candidate) {
        return 0;
    }
    let wanted: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let mut cursor = 0;
    let mut total = 0;
    let mut prev_matched = false;
    let mut prev_char: Option<char> = None;
    for c in candidate.chars().flat_map(char::to_lowercase) {
        if cursor < wanted.len() && wanted[cursor] == c {
            total += MATCH_POINT;
            if prev_matched {
                total += STREAK_BONUS;
            }
            match prev_char {
                None => total += START_BONUS,
                Some(p) if !p.is_alphanumeric() => total += BOUNDARY_BONUS,
                Some(_) => {}
            }
            cursor += 1;
            prev_matched = true;
        } else {
            prev_matched = false;
        }
        prev_char = Some(c);
    }
    total
}

/// Keeps the choices whose label, stringified value, or hint match `query`,
/// ranked by the best of those three scores (stable, descending). An empty
/// query returns the input order untouched.
pub fn filter<T>(choices: Vec<Choice<T>>, query: &str) -> Vec<Choice<T>> {
    if query.is_empty() {
        return choices;
    }
    let mut ranked: Vec<(u32, Choice<T>)> = choices
        .into_iter()
        .filter_map(|choice| {
            let best = [
                Some(choice.label.as_str()),
                Some(choice.value_text.as_str()),
                choice.hint.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|text| is_match(query, text))
            .map(|text| score(query, text))
            .max()?;
            Some((best, choice))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().map(|(_, choice)| choice).collect()
}
