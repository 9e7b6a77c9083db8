//! DFA minimization
//!
//! Two phases run in order: unreachable states are pruned away, then Moore
//! partition refinement merges indistinguishable states and renumbers the
//! classes contiguously from zero.

use std::collections::{BTreeMap, BTreeSet};

use super::{Dfa, Node};

pub(super) fn run(dfa: &Dfa) -> Dfa {
    let pruned = prune(dfa.clone());
    let out = refine(&pruned).unwrap_or(pruned);
    tracing::debug!(
        from = dfa.state_count(),
        to = out.state_count(),
        "minimized DFA"
    );
    out
}

/// Repeatedly removes every non-start state with no incoming edge from a
/// *distinct* state, together with its outgoing edges. A state whose only
/// incoming edge is its own loop counts as orphaned.
fn prune(mut dfa: Dfa) -> Dfa {
    loop {
        let reached: BTreeSet<usize> = dfa
            .nodes
            .iter()
            .flat_map(|(&n, node)| node.0.values().copied().filter(move |&to| to != n))
            .collect();
        let orphans: Vec<usize> = dfa
            .nodes
            .keys()
            .copied()
            .filter(|&n| n != dfa.start && !reached.contains(&n))
            .collect();

        if orphans.is_empty() {
            break dfa;
        }
        for n in orphans {
            dfa.nodes.remove(&n);
            dfa.accept.remove(&n);
        }
    }
}

/// Moore partition refinement. Starting from the accepting/non-accepting
/// split, blocks are refined by transition signatures (the block index of
/// every successor, in alphabet order, with `None` for a dead transition)
/// until the partition is stable, then each class becomes one state of the
/// output.
///
/// Returns `None` if an accept state is missing from the final class
/// mapping, in which case the caller keeps the unrefined automaton.
fn refine(dfa: &Dfa) -> Option<Dfa> {
    let syms: Vec<char> = dfa.alphabet.iter().collect();

    let (accepting, rejecting): (BTreeSet<usize>, BTreeSet<usize>) =
        dfa.nodes.keys().partition(|n| dfa.accept.contains(n));
    let mut blocks: Vec<BTreeSet<usize>> = [accepting, rejecting]
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    // Splitting is monotone in the block count, so an unchanged count means
    // the partition is stable.
    loop {
        let index: BTreeMap<usize, usize> = blocks
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.iter().map(move |&n| (n, i)))
            .collect();

        let mut next = Vec::new();
        for block in &blocks {
            let mut split: BTreeMap<Vec<Option<usize>>, BTreeSet<usize>> = BTreeMap::new();
            for &n in block {
                let signature = syms
                    .iter()
                    .map(|&sym| dfa.nodes[&n].get(sym).map(|to| index[&to]))
                    .collect();
                split.entry(signature).or_default().insert(n);
            }
            next.extend(split.into_values());
        }

        let stable = next.len() == blocks.len();
        blocks = next;
        if stable {
            break;
        }
    }

    // Classes are numbered by their least member, which keeps the output
    // contiguous from zero and stable across runs.
    blocks.sort_by_key(|b| b.first().copied());
    let class_of: BTreeMap<usize, usize> = blocks
        .iter()
        .enumerate()
        .flat_map(|(i, b)| b.iter().map(move |&n| (n, i)))
        .collect();

    let accept = dfa
        .accept
        .iter()
        .map(|n| class_of.get(n).copied())
        .collect::<Option<BTreeSet<usize>>>()?;
    let start = class_of
        .get(&dfa.start)
        .copied()
        .unwrap_or_else(|| unreachable!("start state unmapped after refinement"));

    let nodes = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            // All members of a block share a signature, so any
            // representative yields the same remapped edges.
            let rep = block.first().unwrap_or_else(|| unreachable!());
            let edges = dfa.nodes[rep]
                .0
                .iter()
                .map(|(&sym, to)| {
                    (
                        sym,
                        class_of.get(to).copied().unwrap_or_else(|| {
                            unreachable!("transition target unmapped after refinement")
                        }),
                    )
                })
                .collect();
            (i, Node(edges))
        })
        .collect();

    Some(Dfa {
        alphabet: dfa.alphabet.clone(),
        nodes,
        start,
        accept,
    })
}
