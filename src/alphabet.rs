//! Symbol alphabets of automata

use std::collections::BTreeSet;

/// A non-empty set of input symbols, iterated in `char` order.
///
/// Every automaton carries the alphabet it is defined over; transition labels
/// are always members of it. The iteration order fixes the tie-breaking order
/// used for state numbering, so two runs over the same input produce
/// identical automata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(BTreeSet<char>);

impl Alphabet {
    /// Builds an alphabet from the given symbols, or `None` if there are
    /// none.
    pub fn new(syms: impl IntoIterator<Item = char>) -> Option<Self> {
        let syms: BTreeSet<_> = syms.into_iter().collect();
        (!syms.is_empty()).then_some(Self(syms))
    }

    /// The one-symbol alphabet.
    #[must_use]
    pub fn single(sym: char) -> Self { Self([sym].into()) }

    #[must_use]
    pub fn contains(&self, sym: char) -> bool { self.0.contains(&sym) }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ { self.0.iter().copied() }

    /// The union of two alphabets.
    #[must_use]
    pub fn unioned(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub(crate) fn is_superset(&self, other: &Self) -> bool { self.0.is_superset(&other.0) }
}
