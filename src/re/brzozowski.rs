//! Derivative-driven DFA construction
//!
//! The exploration skeleton mirrors the subset construction, but states are
//! keyed by canonical regexes and the successor of a state under a symbol is
//! its Brzozowski derivative. A state accepts iff its regex matches the
//! empty string.

use std::collections::VecDeque;

use super::Regex;
use crate::{
    alphabet::Alphabet,
    dfa::{builder::DfaBuilder, Dfa},
};

pub(super) fn build(re: &Regex, alphabet: Alphabet) -> Dfa {
    let syms: Vec<char> = alphabet.iter().collect();
    let mut builder = DfaBuilder::default();

    let start = re.clone();
    builder.lookup_update(start.clone());
    let mut q: VecDeque<Regex> = [start.clone()].into();

    // Canonicalization bounds the set of residuals, so the exploration
    // reaches a fixed point.
    while let Some(key) = q.pop_front() {
        for &sym in &syms {
            let next = key.derivative(sym);
            if let Some(new) = builder.add_transition(key.clone(), sym, next) {
                q.push_back(new);
            }
        }
    }

    let dfa = builder.into_dfa(alphabet, &start, Regex::matches_empty);
    tracing::debug!(dfa_states = dfa.state_count(), "built derivative DFA");
    dfa
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::re::{self, Regex};

    fn sym(s: &str) -> Regex { Regex::sym(s.chars()) }

    // True iff iterated derivation of `re` visits at most `cap` distinct
    // residuals. Guards the property tests against pathological regexes
    // whose residual sets blow up.
    fn residuals_within(re: &Regex, syms: &[char], cap: usize) -> bool {
        let mut seen = BTreeSet::new();
        let mut q = vec![re.clone()];
        while let Some(r) = q.pop() {
            if !seen.insert(r.clone()) {
                continue;
            }
            if seen.len() > cap {
                return false;
            }
            for &c in syms {
                q.push(r.derivative(c));
            }
        }
        true
    }

    #[test]
    fn literal_sequence() {
        let dfa = sym("a").cat(sym("b")).compile_brzozowski().unwrap();
        assert_eq!(dfa.decide("ab"), Some(true));
        assert_eq!(dfa.decide("a"), Some(false));
        assert_eq!(dfa.decide("b"), Some(false));
        assert_eq!(dfa.decide(""), Some(false));
        assert_eq!(dfa.decide("abc"), None);
    }

    #[test]
    fn starred_pair() {
        let r = sym("a").cat(sym("b")).star();
        for dfa in [r.compile().unwrap(), r.compile_brzozowski().unwrap()] {
            assert_eq!(dfa.decide("abab"), Some(true));
            assert_eq!(dfa.decide("aba"), Some(false));
            assert_eq!(dfa.decide(""), Some(true));
        }
    }

    #[test]
    fn derivative_states_are_shared() {
        // a* derives to itself, so the raw exploration is a single state.
        let r = sym("a").star();
        let dfa = super::build(&r, r.alphabet().unwrap());
        assert_eq!(dfa.state_count(), 1);

        // a|a keeps its duplicate branches, but residuals are keyed by
        // value: r itself, Nil|Nil, and the bottom sink.
        let r = sym("a").dis(sym("a"));
        let dfa = super::build(&r, r.alphabet().unwrap());
        assert_eq!(dfa.state_count(), 3);
    }

    proptest! {
        // The Thompson automaton over-approximates concatenation (see
        // Nfa::concat), so across pipelines the derivative DFA's language
        // is contained in the Thompson DFA's, with identical decidability.
        #[test]
        fn thompson_contains_brzozowski(
            r in re::re(5, 24, 3, prop::char::range('a', 'c')),
            ws in prop::collection::vec(
                prop::collection::vec(prop::char::range('a', 'd'), 0..8),
                0..8,
            ),
        ) {
            prop_assume!(r.alphabet().is_ok());
            prop_assume!(residuals_within(&r, &['a', 'b', 'c'], 256));

            let thompson = r.compile().unwrap();
            let brzozowski = r.compile_brzozowski().unwrap();
            for w in ws {
                let w: String = w.into_iter().collect();
                let t = thompson.decide(&w);
                let b = brzozowski.decide(&w);
                prop_assert_eq!(t.is_none(), b.is_none(), "w = {:?}", &w);
                if b == Some(true) {
                    prop_assert_eq!(t, Some(true), "w = {:?}", &w);
                }
            }
        }

        // On concatenation-free regexes the pipelines agree exactly.
        #[test]
        fn pipelines_agree_without_concatenation(
            r in cat_free(),
            ws in prop::collection::vec(
                prop::collection::vec(prop::char::range('a', 'd'), 0..8),
                0..8,
            ),
        ) {
            prop_assume!(r.alphabet().is_ok());
            prop_assume!(residuals_within(&r, &['a', 'b', 'c'], 256));

            let thompson = r.compile().unwrap();
            let brzozowski = r.compile_brzozowski().unwrap();
            for w in ws {
                let w: String = w.into_iter().collect();
                prop_assert_eq!(
                    thompson.decide(&w),
                    brzozowski.decide(&w),
                    "w = {:?}",
                    &w,
                );
            }
        }

        // cw is accepted exactly when the derivative by c accepts w.
        #[test]
        fn derivative_law(
            r in re::re(5, 24, 3, prop::char::range('a', 'c')),
            c in prop::char::range('a', 'c'),
            w in prop::collection::vec(prop::char::range('a', 'c'), 0..6),
        ) {
            prop_assume!(r.alphabet().is_ok());
            prop_assume!(residuals_within(&r, &['a', 'b', 'c'], 256));

            let dfa = r.compile_brzozowski().unwrap();
            let suffix: String = w.into_iter().collect();
            let mut full = c.to_string();
            full.push_str(&suffix);

            if let Some(accepted) = dfa.decide(&full) {
                let residual = suffix
                    .chars()
                    .fold(r.derivative(c), |r, c| r.derivative(c));
                prop_assert_eq!(accepted, residual.matches_empty());
            }
        }
    }

    fn cat_free() -> impl Strategy<Value = Regex> {
        let leaf = prop_oneof![
            4 => prop::collection::btree_set(prop::char::range('a', 'c'), 1..=2)
                .prop_map(Regex::Sym),
            1 => Just(Regex::Nil),
            1 => Just(Regex::BOTTOM),
        ];
        leaf.prop_recursive(5, 24, 3, |s| {
            prop_oneof![
                (s.clone(), s.clone()).prop_map(|(l, r)| l.dis(r)),
                s.prop_map(Regex::star),
            ]
        })
    }
}
