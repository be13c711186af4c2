//! Fuzzy string matching for catalog lookups
//!
//! Scores are percentages in `0.0..=100.0`. Three scorers are available and
//! [`best_match`] runs several of them against a candidate list, keeping the
//! highest score that clears the caller's cutoff.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use rapidfuzz::fuzz;

/// Similarity scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorer {
    /// Whole-string Indel similarity
    Ratio,
    /// Best alignment of the shorter string inside the longer one
    PartialRatio,
    /// Set-based comparison of whitespace separated tokens
    TokenSetRatio,
}

impl Scorer {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Scorer::Ratio => ratio(a, b),
            Scorer::PartialRatio => partial_ratio(a, b),
            Scorer::TokenSetRatio => token_set_ratio(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scorer::Ratio => "ratio",
            Scorer::PartialRatio => "partial_ratio",
            Scorer::TokenSetRatio => "token_set_ratio",
        }
    }
}

/// Every scorer, in tie-breaking order
pub const ALL_SCORERS: [Scorer; 3] = [Scorer::Ratio, Scorer::PartialRatio, Scorer::TokenSetRatio];

/// A candidate that cleared the cutoff
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub value: &'a str,
    pub index: usize,
    pub score: f64,
    pub scorer: Scorer,
}

/// Indel similarity: `200 * lcs / (len(a) + len(b))`
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    100.0 * fuzz::ratio(a.chars(), b.chars())
}

/// Highest [`ratio`] of the shorter string against any window of the longer one.
///
/// Windows hanging over either edge of the longer string are considered too,
/// so a query that only overlaps the start or end of a candidate still scores.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let m = short.len();
    let n = long.len();
    let mut best = 0.0_f64;

    let windows = (1..m)
        .map(|len| &long[..len])
        .chain((0..=n - m).map(|start| &long[start..start + m]))
        .chain((n - m + 1..n).map(|start| &long[start..]));

    for window in windows {
        let score =
            100.0 * indel::normalized_similarity(short.iter().copied(), window.iter().copied());
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// Token set similarity.
///
/// Returns 100 when the token sets intersect and one is contained in the
/// other, and 0 when either side has no tokens.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let combined_ab = join_non_empty(&sect, &diff_ab.join(" "));
    let combined_ba = join_non_empty(&sect, &diff_ba.join(" "));

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// Best candidate for a single scorer, or `None` if nothing reaches `cutoff`.
///
/// The first candidate wins ties.
pub fn extract_one<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    scorer: Scorer,
    cutoff: f64,
) -> Option<FuzzyMatch<'a>> {
    let mut best: Option<FuzzyMatch<'a>> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let value = candidate.as_ref();
        let score = scorer.score(query, value);

        if score < cutoff {
            continue;
        }

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch {
                value,
                index,
                score,
                scorer,
            });
            if score >= 100.0 {
                break;
            }
        }
    }

    best
}

/// Run each scorer independently and return the overall highest match.
///
/// Ties go to the scorer listed first.
pub fn best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    scorers: &[Scorer],
    cutoff: f64,
) -> Option<FuzzyMatch<'a>> {
    scorers
        .iter()
        .filter_map(|scorer| extract_one(query, candidates, *scorer, cutoff))
        .fold(None, |best, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
}

fn join_non_empty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}
