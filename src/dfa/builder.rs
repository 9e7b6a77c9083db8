//! Incremental DFA assembly shared by the subset and derivative pipelines

use std::{
    collections::{BTreeMap, BTreeSet},
    hash::Hash,
};

use hashbrown::HashMap;

use super::{Dfa, Node};
use crate::alphabet::Alphabet;

/// Build state for an exploration keyed by `K`: the next state number to
/// allocate, the key → state correspondence, and the transition map under
/// construction.
///
/// Keys compare by value, so two separately computed but equal keys land on
/// the same DFA state. A builder is owned by exactly one construction call
/// and consumed by [`DfaBuilder::into_dfa`].
#[derive(Debug)]
pub(crate) struct DfaBuilder<K> {
    fresh: usize,
    corr: HashMap<K, usize>,
    nodes: BTreeMap<usize, Node>,
}

impl<K> Default for DfaBuilder<K> {
    fn default() -> Self {
        Self {
            fresh: 0,
            corr: HashMap::new(),
            nodes: BTreeMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> DfaBuilder<K> {
    /// The DFA state for `key`, allocated on first sight. The flag is true
    /// iff the key was new.
    pub fn lookup_update(&mut self, key: K) -> (usize, bool) {
        let Self {
            fresh,
            corr,
            nodes,
        } = self;

        let mut new = false;
        let state = *corr.entry(key).or_insert_with(|| {
            new = true;
            let state = *fresh;
            *fresh += 1;
            nodes.insert(state, Node::default());
            state
        });
        (state, new)
    }

    /// Records the transition `key --sym--> next`, allocating DFA states for
    /// both keys as needed. Returns `next` iff it was newly allocated, so
    /// exploration recurses into each key exactly once.
    pub fn add_transition(&mut self, key: K, sym: char, next: K) -> Option<K> {
        let (from, _) = self.lookup_update(key);
        let (to, new) = self.lookup_update(next.clone());
        self.nodes.get_mut(&from).unwrap().0.insert(sym, to);
        new.then_some(next)
    }

    /// Finishes the build. Accepting states are those whose key satisfies
    /// `accepting`.
    pub fn into_dfa(self, alphabet: Alphabet, start: &K, accepting: impl Fn(&K) -> bool) -> Dfa {
        let Self {
            fresh: _,
            corr,
            nodes,
        } = self;

        let accept: BTreeSet<usize> = corr
            .iter()
            .filter(|&(k, _)| accepting(k))
            .map(|(_, &state)| state)
            .collect();
        let start = *corr
            .get(start)
            .unwrap_or_else(|| unreachable!("start key never allocated"));

        Dfa {
            alphabet,
            nodes,
            start,
            accept,
        }
    }
}
