//! Subset construction

use std::{
    collections::{BTreeSet, VecDeque},
    rc::Rc,
};

use super::{Nfa, Node};
use crate::{
    closure_builder::ClosureBuilder,
    dfa::{builder::DfaBuilder, Dfa},
};

/// Determinizes an NFA by exploring the ε-closed state sets reachable from
/// the closure of the start state.
pub(super) struct SubsetBuilder<'a> {
    nfa: &'a Nfa,
    closure: ClosureBuilder<usize>,
}

impl<'a> SubsetBuilder<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            closure: ClosureBuilder::default(),
        }
    }

    fn solve_closure(&mut self, set: &mut BTreeSet<usize>) {
        self.closure.solve(set, |n| {
            self.nfa.get(*n).into_iter().flat_map(Node::nil_edges)
        });
    }

    pub fn build(&mut self) -> Dfa {
        let syms: Vec<char> = self.nfa.alphabet().iter().collect();
        let mut builder = DfaBuilder::default();

        let mut start = BTreeSet::new();
        self.closure.seed([self.nfa.start()]);
        self.solve_closure(&mut start);
        let start = Rc::new(start);

        builder.lookup_update(Rc::clone(&start));
        let mut q: VecDeque<_> = [Rc::clone(&start)].into();

        // Every state set is explored exactly once: add_transition hands a
        // key back only on first allocation. Termination is bounded by the
        // number of distinct state sets.
        while let Some(key) = q.pop_front() {
            for &sym in &syms {
                let mut next = BTreeSet::new();
                self.closure.seed(self.nfa.step(&key, sym));
                self.solve_closure(&mut next);

                if let Some(new) = builder.add_transition(Rc::clone(&key), sym, Rc::new(next)) {
                    q.push_back(new);
                }
            }
        }

        let dfa = builder.into_dfa(self.nfa.alphabet().clone(), &start, |key| {
            !key.is_disjoint(self.nfa.accept())
        });
        tracing::debug!(
            nfa_states = self.nfa.state_count(),
            dfa_states = dfa.state_count(),
            "determinized NFA"
        );
        dfa
    }
}
