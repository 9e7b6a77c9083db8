//! Worklist solver for reachability closures

use std::collections::{BTreeSet, VecDeque};

/// Computes least fixed points of a successor relation.
///
/// The worklist allocation is reused across calls, so a single builder can
/// serve many closure queries during one construction pass.
#[derive(Debug)]
pub struct ClosureBuilder<T>(VecDeque<T>);

impl<T> Default for ClosureBuilder<T> {
    #[inline]
    fn default() -> Self { Self(VecDeque::new()) }
}

impl<T> ClosureBuilder<T> {
    #[inline]
    pub fn seed<I: IntoIterator<Item = T>>(&mut self, it: I) {
        assert!(self.0.is_empty());
        self.0.extend(it);
    }
}

impl<T: Clone + Ord> ClosureBuilder<T> {
    /// Drains the worklist into `set`, enqueueing the successors of every
    /// element newly added to `set`. Terminates once no new elements appear.
    pub fn solve<I: IntoIterator<Item = T>>(
        &mut self,
        set: &mut BTreeSet<T>,
        mut succ: impl FnMut(&T) -> I,
    ) {
        while let Some(el) = self.0.pop_front() {
            if set.insert(el.clone()) {
                self.0.extend(succ(&el));
            }
        }
    }
}
