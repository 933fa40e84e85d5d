//! Offset-safe specifier rewriting
//!
//! Edits are matched by resolved identity rather than by text, so `./util`,
//! `./util/index` and `../src/util` written in the same file are all found
//! when `./util` is renamed.

use crate::services::resolution::{FileIdentity, SpecifierResolver};
use std::collections::HashSet;
use std::path::Path;
use tsmove_foundation::{ImportReference, MoveError, MoveResult, Replacement, Span, TextEdit};

/// Edits turning every reference that resolves like `old` into `new`.
///
/// `resolve_from` is the path specifiers are interpreted against; it differs
/// from the file's current location only while rewriting a moved file.
pub fn compute_edits(
    resolver: &SpecifierResolver,
    resolve_from: &Path,
    references: &[ImportReference],
    replacements: &[Replacement],
) -> Vec<TextEdit> {
    let resolved: Vec<Option<FileIdentity>> = references
        .iter()
        .map(|r| resolver.resolve(resolve_from, &r.specifier))
        .collect();

    let mut claimed: HashSet<Span> = HashSet::new();
    let mut edits = Vec::new();

    for replacement in replacements {
        if replacement.is_noop() {
            continue;
        }
        let Some(wanted) = resolver.resolve(resolve_from, &replacement.old) else {
            continue;
        };

        for (reference, identity) in references.iter().zip(&resolved) {
            if identity.as_ref() != Some(&wanted) || !claimed.insert(reference.span) {
                continue;
            }
            if reference.specifier != replacement.new {
                edits.push(TextEdit::new(reference.span, replacement.new.clone()));
            }
        }
    }

    edits
}

/// Apply non-overlapping edits in any order.
///
/// Edits are sorted by start and applied left to right; each is shifted by
/// the length delta accumulated so far.
pub fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> MoveResult<String> {
    edits.sort_by_key(|e| e.span.start);

    if let Some(pair) = edits.windows(2).find(|w| w[0].span.overlaps(&w[1].span) || w[0].span.end > w[1].span.start) {
        return Err(MoveError::internal(format!(
            "Overlapping edits at {} and {}",
            pair[0].span, pair[1].span
        )));
    }

    let mut result = text.to_string();
    let mut delta: isize = 0;
    for edit in &edits {
        let start = shift(edit.span.start, delta)?;
        let end = shift(edit.span.end, delta)?;
        if end > result.len() || !result.is_char_boundary(start) || !result.is_char_boundary(end) {
            return Err(MoveError::internal(format!(
                "Edit span {} does not fit a text of {} bytes",
                edit.span,
                text.len()
            )));
        }
        result.replace_range(start..end, &edit.new_text);
        delta += edit.length_delta();
    }

    Ok(result)
}

fn shift(offset: usize, delta: isize) -> MoveResult<usize> {
    offset
        .checked_add_signed(delta)
        .ok_or_else(|| MoveError::internal(format!("Edit offset {} shifted below zero", offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn reference(text: &str, specifier: &str) -> ImportReference {
        let start = text.find(specifier).unwrap();
        ImportReference::new(specifier, Span::new(start, start + specifier.len()))
    }

    #[test]
    fn test_matches_by_identity_not_text() {
        let text = "import a from './util';\nimport b from '../src/util/index';\nimport c from './other';\n";
        let refs = vec![
            reference(text, "./util"),
            reference(text, "../src/util/index"),
            reference(text, "./other"),
        ];
        let resolver = SpecifierResolver::default();

        let edits = compute_edits(
            &resolver,
            Path::new("/src/a.ts"),
            &refs,
            &[Replacement::new("./util/index", "./shared/util")],
        );
        let result = apply_edits(text, edits).unwrap();

        assert_eq!(
            result,
            "import a from './shared/util';\nimport b from './shared/util';\nimport c from './other';\n"
        );
    }

    #[test]
    fn test_noop_and_unresolvable_pairs_are_skipped() {
        let text = "import a from './a';\nimport r from 'react';\n";
        let refs = vec![reference(text, "./a"), reference(text, "react")];
        let resolver = SpecifierResolver::default();

        let edits = compute_edits(
            &resolver,
            Path::new("/src/x.ts"),
            &refs,
            &[Replacement::new("./a", "./a"), Replacement::new("react", "preact")],
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_span_is_claimed_once() {
        let text = "import a from './a';\n";
        let refs = vec![reference(text, "./a")];
        let resolver = SpecifierResolver::default();

        let edits = compute_edits(
            &resolver,
            Path::new("/src/x.ts"),
            &refs,
            &[Replacement::new("./a", "./b"), Replacement::new("./a.ts", "./c")],
        );
        assert_eq!(edits, vec![TextEdit::new(refs[0].span, "./b")]);
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let edits = vec![
            TextEdit::new(Span::new(0, 4), "x"),
            TextEdit::new(Span::new(2, 6), "y"),
        ];
        assert!(apply_edits("abcdefgh", edits).is_err());
    }

    #[test]
    fn test_out_of_range_edit_is_rejected() {
        let edits = vec![TextEdit::new(Span::new(2, 20), "x")];
        assert!(apply_edits("abc", edits).is_err());
    }

    /// Disjoint spans over `len` bytes plus their replacement texts
    fn disjoint_edits(len: usize) -> impl Strategy<Value = Vec<TextEdit>> {
        proptest::collection::btree_set(0..=len, 0..12)
            .prop_flat_map(|cuts| {
                let cuts: Vec<usize> = cuts.into_iter().collect();
                let spans: Vec<Span> = cuts
                    .chunks_exact(2)
                    .map(|pair| Span::new(pair[0], pair[1]))
                    .collect();
                let texts = proptest::collection::vec("[a-z/.]{0,8}", spans.len());
                (Just(spans), texts)
            })
            .prop_map(|(spans, texts)| {
                spans
                    .into_iter()
                    .zip(texts)
                    .map(|(span, text)| TextEdit::new(span, text))
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }

    proptest! {
        #[test]
        fn prop_edits_land_on_original_spans(
            text in "[ -~]{0,64}",
            seed_edits in disjoint_edits(64),
        ) {
            let edits: Vec<TextEdit> = seed_edits
                .into_iter()
                .filter(|e| e.span.end <= text.len())
                .collect();

            // expected result built back to front, where no shifting is needed
            let mut expected = text.clone();
            let mut by_start = edits.clone();
            by_start.sort_by_key(|e| std::cmp::Reverse(e.span.start));
            for edit in &by_start {
                expected.replace_range(edit.span.start..edit.span.end, &edit.new_text);
            }

            prop_assert_eq!(apply_edits(&text, edits).unwrap(), expected);
        }
    }
}
