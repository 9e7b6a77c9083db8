//! Brzozowski derivatives over the canonical regex tree

use super::Regex;

impl Regex {
    /// The Brzozowski derivative: the regex matching exactly those `w` such
    /// that `sym · w` matches `self`.
    ///
    /// Results are built through the canonicalizing constructors, so
    /// repeatedly deriving a regex visits a bounded set of residuals and
    /// structural equality on them is meaningful.
    #[must_use]
    pub fn derivative(&self, sym: char) -> Self {
        match self {
            Self::Sym(s) if s.contains(&sym) => Self::Nil,
            Self::Sym(_) | Self::Nil => Self::BOTTOM,
            Self::Dis(l, r) => l.derivative(sym).dis(r.derivative(sym)),
            Self::Cat(l, r) => l
                .derivative(sym)
                .cat(r.as_ref().clone())
                .dis(l.delta().cat(r.derivative(sym))),
            Self::Star(r) => r.derivative(sym).cat(self.clone()),
        }
    }
}
