//! Approximate string scoring for test labels
//!
//! Scores are integers in `[0, 100]` built on the InDel ratio from
//! `rapidfuzz`, combined the way a weighted ratio does: the plain ratio is
//! always considered, token-based ratios are discounted, and when the two
//! strings differ a lot in length the partial (best-window) variants take
//! over from the full-string ones.

use rapidfuzz::fuzz;
use std::collections::BTreeSet;

/// Discount applied to token-based ratios
const TOKEN_SCALE: f64 = 0.95;

/// Length ratio from which partial matching is used
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which partial scores are discounted harder
const LONG_LENGTH_RATIO: f64 = 8.0;

const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Lowercases, replaces non-alphanumerics with spaces and trims
pub fn full_process(s: &str) -> String {
    let mapped: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.trim().to_string()
}

/// Weighted similarity of two labels in `[0, 100]`
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = full_process(a);
    let p2 = full_process(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let c1: Vec<char> = p1.chars().collect();
    let c2: Vec<char> = p2.chars().collect();
    let base = ratio(&c1, &c2);

    let (short, long) = if c1.len() <= c2.len() {
        (c1.len(), c2.len())
    } else {
        (c2.len(), c1.len())
    };
    let length_ratio = long as f64 / short as f64;

    let score = if length_ratio < PARTIAL_LENGTH_RATIO {
        base.max(token_sort_ratio(&p1, &p2, false) * TOKEN_SCALE)
            .max(token_set_ratio(&p1, &p2, false) * TOKEN_SCALE)
    } else {
        let scale = if length_ratio > LONG_LENGTH_RATIO {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        base.max(partial_ratio(&c1, &c2) * scale)
            .max(token_sort_ratio(&p1, &p2, true) * TOKEN_SCALE * scale)
            .max(token_set_ratio(&p1, &p2, true) * TOKEN_SCALE * scale)
    };

    score.round().clamp(0.0, 100.0) as u8
}

/// Best-scoring choice for `query`
///
/// Ties keep the earliest choice. Returns `None` for an empty choice list.
pub fn best_match<'a, I>(query: &str, choices: I) -> Option<(&'a str, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u8)> = None;
    for choice in choices {
        let score = weighted_ratio(query, choice);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((choice, score));
        }
        if score == 100 {
            break;
        }
    }
    best
}

/// InDel ratio of two char sequences in `[0, 100]`
fn ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    fuzz::ratio(a.iter().copied(), b.iter().copied()) * 100.0
}

/// Best ratio of the shorter sequence against every same-length window of the longer
fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }
    if short.len() == long.len() {
        return ratio(short, long);
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        best = best.max(ratio(short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn text_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, partial: bool) -> f64 {
    text_ratio(&sorted_tokens(a), &sorted_tokens(b), partial)
}

fn token_set_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let t1: BTreeSet<&str> = a.split_whitespace().collect();
    let t2: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let sect = join(t1.intersection(&t2).copied().collect());
    let diff1 = join(t1.difference(&t2).copied().collect());
    let diff2 = join(t2.difference(&t1).copied().collect());

    let combined1 = format!("{} {}", sect, diff1).trim().to_string();
    let combined2 = format!("{} {}", sect, diff2).trim().to_string();

    text_ratio(&sect, &combined1, partial)
        .max(text_ratio(&sect, &combined2, partial))
        .max(text_ratio(&combined1, &combined2, partial))
}
