//! Thompson's construction

use super::Regex;
use crate::{alphabet::Alphabet, nfa::Nfa};

/// Translates a regex into an ε-NFA by folding the primitive combinators
/// over the tree. Every fragment carries the full alphabet of the top-level
/// regex, not just the symbols it mentions.
pub(super) struct NfaBuilder<'a> {
    alphabet: &'a Alphabet,
}

impl NfaBuilder<'_> {
    pub fn build(re: &Regex, alphabet: &Alphabet) -> Nfa {
        let nfa = NfaBuilder { alphabet }.build_in(re);
        // The recognition loop only sees empty-string acceptance on the
        // start state itself, so mark it for nullable regexes.
        let nfa = if re.matches_empty() {
            nfa.accepting_nil()
        } else {
            nfa
        };
        tracing::debug!(states = nfa.state_count(), "built Thompson NFA");
        nfa
    }

    fn build_in(&self, re: &Regex) -> Nfa {
        match re {
            Regex::Sym(syms) if syms.is_empty() => Nfa::bottom(self.alphabet.clone()),
            Regex::Sym(syms) => syms
                .iter()
                .map(|&sym| Nfa::literal(sym))
                .reduce(Nfa::union)
                .unwrap_or_else(|| unreachable!())
                .with_alphabet(self.alphabet.clone()),
            Regex::Nil => Nfa::nil(self.alphabet.clone()),
            Regex::Dis(l, r) => self.build_in(l).union(self.build_in(r)),
            Regex::Cat(l, r) => self.build_in(l).concat(self.build_in(r)),
            Regex::Star(r) => self.build_in(r).kleene(),
        }
    }
}
