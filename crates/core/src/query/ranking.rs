//! Result ordering.
//!
//! Word units and raw references share the lexicographic and count orders
//! (both ascending, each breaking ties with the other key). Relevance only
//! applies to raw references, where it reflects what tends to matter when
//! reading code:
//!
//! 1. functions before structs, structs before variables;
//! 2. function declarations before calls, and among declarations the one
//!    with more recorded calls first;
//! 3. among variables of the same name, the declaration first;
//! 4. otherwise the name decides.

use super::model::WordMatch;
use super::options::RankBy;
use crate::model::Reference;
use std::cmp::Ordering;

/// Total relevance order: `Greater` means `a` is more relevant than `b`.
pub fn relevance(a: &Reference, b: &Reference) -> Ordering {
    use Reference::*;

    match (a, b) {
        (Function(fa), Function(fb)) => match (fa.is_decl, fb.is_decl) {
            (true, true) => fa.calls.len().cmp(&fb.calls.len()),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => Ordering::Equal,
        },
        (Function(_), _) => Ordering::Greater,
        (_, Function(_)) => Ordering::Less,
        (Struct(_), Variable(_)) => Ordering::Greater,
        (Variable(_), Struct(_)) => Ordering::Less,
        (Variable(va), Variable(vb)) => {
            if va.name == vb.name {
                va.is_decl.cmp(&vb.is_decl)
            } else {
                vb.name.cmp(&va.name)
            }
        }
        (Struct(sa), Struct(sb)) => sb.name.cmp(&sa.name),
    }
}

fn by_word_then_count(a: (&str, usize), b: (&str, usize)) -> Ordering {
    a.0.cmp(b.0).then(a.1.cmp(&b.1))
}

fn by_count_then_word(a: (&str, usize), b: (&str, usize)) -> Ordering {
    a.1.cmp(&b.1).then(a.0.cmp(b.0))
}

/// Sorts raw references in place. `occurrences` gives the total number of
/// indexed occurrences of a word, which is the count key for a reference.
/// Relevance sorts the most relevant first. The sort is stable.
pub fn sort_references<F>(refs: &mut [&Reference], rank_by: RankBy, occurrences: F)
where
    F: Fn(&str) -> usize,
{
    match rank_by {
        RankBy::Lexicographic => refs.sort_by(|a, b| {
            by_word_then_count(
                (a.name(), occurrences(a.name())),
                (b.name(), occurrences(b.name())),
            )
        }),
        RankBy::Count => refs.sort_by(|a, b| {
            by_count_then_word(
                (a.name(), occurrences(a.name())),
                (b.name(), occurrences(b.name())),
            )
        }),
        RankBy::Relevance => refs.sort_by(|a, b| relevance(b, a)),
    }
}

/// Sorts word units in place. Word units carry no declaration data, so
/// relevance falls back to the lexicographic order.
pub fn sort_word_matches(units: &mut [WordMatch], rank_by: RankBy) {
    match rank_by {
        RankBy::Lexicographic | RankBy::Relevance => units.sort_by(|a, b| {
            by_word_then_count((a.word.as_str(), a.count), (b.word.as_str(), b.count))
        }),
        RankBy::Count => units.sort_by(|a, b| {
            by_count_then_word((a.word.as_str(), a.count), (b.word.as_str(), b.count))
        }),
    }
}
