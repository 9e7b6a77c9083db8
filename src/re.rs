//! Canonical regular expressions and the compilation entry points

use std::collections::BTreeSet;

use nfa_builder::NfaBuilder;

use crate::{alphabet::Alphabet, dfa::Dfa, nfa::Nfa};

mod brzozowski;
mod derivative;
mod nfa_builder;

/// The symbol set of a [`Regex::Sym`] node.
pub type SymbolSet = BTreeSet<char>;

/// Produced by the compilation entry points when a regex contains no symbols
/// and therefore defines no alphabet to build an automaton over.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("regex contains no symbols to derive an alphabet from")]
pub struct NoSymbols;

/// A regular expression over `char` symbols, kept in canonical form.
///
/// All producers of `Regex` values must go through the builder methods
/// ([`dis`](Self::dis), [`cat`](Self::cat), [`star`](Self::star),
/// [`sym`](Self::sym)); the rewrite rules they apply keep the set of iterated
/// derivatives finite, which the derivative-driven DFA construction depends
/// on. Assembling variants directly may produce automata for a different
/// language than the one written down.
///
/// The empty symbol set matches nothing and doubles as the void regex
/// [`Regex::BOTTOM`]; [`Regex::Nil`] matches exactly the empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Regex {
    /// One symbol drawn from the set
    Sym(SymbolSet),
    /// The empty string
    Nil,
    /// Union of two languages
    Dis(Box<Regex>, Box<Regex>),
    /// Concatenation of two languages
    Cat(Box<Regex>, Box<Regex>),
    /// Kleene closure
    Star(Box<Regex>),
}

impl Regex {
    /// The regex matching no strings at all.
    pub const BOTTOM: Self = Self::Sym(SymbolSet::new());

    /// Builds a symbol-set leaf. An empty set yields [`Regex::BOTTOM`].
    pub fn sym(syms: impl IntoIterator<Item = char>) -> Self {
        Self::Sym(syms.into_iter().collect())
    }

    #[must_use]
    pub fn is_bottom(&self) -> bool { matches!(self, Self::Sym(s) if s.is_empty()) }

    /// Union, absorbing [`Regex::BOTTOM`] on either side.
    #[must_use]
    pub fn dis(self, rhs: Self) -> Self {
        if self.is_bottom() {
            rhs
        } else if rhs.is_bottom() {
            self
        } else {
            Self::Dis(self.into(), rhs.into())
        }
    }

    /// Concatenation. [`Regex::BOTTOM`] annihilates, [`Regex::Nil`] is the
    /// identity.
    #[must_use]
    pub fn cat(self, rhs: Self) -> Self {
        if self.is_bottom() || rhs.is_bottom() {
            Self::BOTTOM
        } else if matches!(self, Self::Nil) {
            rhs
        } else if matches!(rhs, Self::Nil) {
            self
        } else {
            Self::Cat(self.into(), rhs.into())
        }
    }

    /// Kleene closure. Stars of [`Regex::BOTTOM`] and [`Regex::Nil`] collapse
    /// to [`Regex::Nil`], and nested stars collapse to one.
    #[must_use]
    pub fn star(self) -> Self {
        match self {
            Self::Nil => Self::Nil,
            s if s.is_bottom() => Self::Nil,
            s @ Self::Star(_) => s,
            s => Self::Star(s.into()),
        }
    }

    /// Does this regex match the empty string?
    #[must_use]
    pub fn matches_empty(&self) -> bool {
        match self {
            Self::Cat(l, r) => l.matches_empty() && r.matches_empty(),
            Self::Dis(l, r) => l.matches_empty() || r.matches_empty(),
            Self::Sym(_) => false,
            Self::Star(_) | Self::Nil => true,
        }
    }

    /// [`Regex::Nil`] if this regex matches the empty string, else
    /// [`Regex::BOTTOM`].
    #[must_use]
    pub(crate) fn delta(&self) -> Self {
        if self.matches_empty() {
            Self::Nil
        } else {
            Self::BOTTOM
        }
    }

    /// The set of symbols appearing in the regex, or [`NoSymbols`] if there
    /// are none.
    pub fn alphabet(&self) -> Result<Alphabet, NoSymbols> {
        fn collect(re: &Regex, into: &mut SymbolSet) {
            match re {
                Regex::Sym(s) => into.extend(s.iter().copied()),
                Regex::Nil => (),
                Regex::Dis(l, r) | Regex::Cat(l, r) => {
                    collect(l, into);
                    collect(r, into);
                },
                Regex::Star(r) => collect(r, into),
            }
        }

        let mut syms = SymbolSet::new();
        collect(self, &mut syms);
        Alphabet::new(syms).ok_or(NoSymbols)
    }

    /// Thompson pipeline: builds the ε-NFA, determinizes it by subset
    /// construction, and minimizes the result.
    pub fn compile(&self) -> Result<Dfa, NoSymbols> {
        Ok(self.compile_nfa()?.compile().optimize())
    }

    /// Thompson's construction alone, producing the ε-NFA.
    pub fn compile_nfa(&self) -> Result<Nfa, NoSymbols> {
        let alphabet = self.alphabet()?;
        Ok(NfaBuilder::build(self, &alphabet))
    }

    /// Brzozowski pipeline: builds a DFA directly by iterated derivatives,
    /// then minimizes it.
    pub fn compile_brzozowski(&self) -> Result<Dfa, NoSymbols> {
        let alphabet = self.alphabet()?;
        Ok(brzozowski::build(self, alphabet).optimize())
    }
}

#[cfg(any(test, feature = "proptest"))]
pub use prop::*;

#[cfg(any(test, feature = "proptest"))]
mod prop {
    use proptest::prelude::*;

    use super::Regex;

    /// Strategy producing canonical regex trees with symbols drawn from
    /// `chr`.
    pub fn re(
        depth: u32,
        tree_size: u32,
        branch_size: u32,
        chr: impl Strategy<Value = char> + 'static,
    ) -> impl Strategy<Value = Regex> {
        let leaf = prop_oneof![
            4 => prop::collection::btree_set(chr, 1..=2).prop_map(Regex::Sym),
            1 => Just(Regex::Nil),
            1 => Just(Regex::BOTTOM),
        ];
        leaf.prop_recursive(depth, tree_size, branch_size, |s| {
            prop_oneof![
                (s.clone(), s.clone()).prop_map(|(l, r)| l.dis(r)),
                (s.clone(), s.clone()).prop_map(|(l, r)| l.cat(r)),
                s.prop_map(Regex::star),
            ]
        })
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{NoSymbols, Regex};

    fn sym(s: &str) -> Regex { Regex::sym(s.chars()) }

    #[test]
    fn disjunction_absorbs_bottom() {
        let a = sym("a");
        assert_eq!(Regex::BOTTOM.dis(a.clone()), a);
        assert_eq!(a.clone().dis(Regex::BOTTOM), a);
        assert_eq!(
            a.clone().dis(a.clone()),
            Regex::Dis(a.clone().into(), a.into()),
        );
    }

    #[test]
    fn concatenation_rules() {
        let a = sym("a");
        assert_eq!(Regex::BOTTOM.cat(a.clone()), Regex::BOTTOM);
        assert_eq!(a.clone().cat(Regex::BOTTOM), Regex::BOTTOM);
        assert_eq!(Regex::Nil.cat(a.clone()), a);
        assert_eq!(a.clone().cat(Regex::Nil), a);
    }

    #[test]
    fn star_collapses() {
        let a = sym("a");
        assert_eq!(Regex::BOTTOM.star(), Regex::Nil);
        assert_eq!(Regex::Nil.star(), Regex::Nil);
        assert_eq!(a.clone().star().star(), a.star());
    }

    #[test]
    fn empty_symbol_set_is_bottom() {
        assert!(Regex::sym(std::iter::empty()).is_bottom());
        assert_eq!(Regex::sym(std::iter::empty()), Regex::BOTTOM);
    }

    #[test]
    fn nullability() {
        assert!(Regex::Nil.matches_empty());
        assert!(!sym("a").matches_empty());
        assert!(sym("a").star().matches_empty());
        assert!(sym("a").star().cat(sym("b").star()).matches_empty());
        assert!(!sym("a").cat(sym("b").star()).matches_empty());
        assert!(sym("a").dis(Regex::Nil).matches_empty());
    }

    #[test]
    fn alphabet_is_the_symbol_set() {
        let re = sym("a").cat(sym("cb").dis(sym("a")).star());
        let alpha = re.alphabet().unwrap();
        assert_eq!(alpha.iter().collect::<Vec<_>>(), ['a', 'b', 'c']);
    }

    #[test]
    fn alphabet_needs_symbols() {
        assert!(matches!(Regex::Nil.alphabet(), Err(NoSymbols)));
        assert!(matches!(Regex::Nil.star().compile(), Err(NoSymbols)));
    }

    proptest! {
        #[test]
        fn empty_string_decisions_follow_nullability(
            r in super::re(5, 24, 3, prop::char::range('a', 'c')),
        ) {
            prop_assume!(r.alphabet().is_ok());

            let nfa = r.compile_nfa().unwrap();
            prop_assert_eq!(nfa.decide(""), Some(r.matches_empty()));
        }
    }
}
