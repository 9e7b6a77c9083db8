//! Nondeterministic finite automata with ε-transitions

use std::collections::{btree_map, BTreeMap, BTreeSet};

use self::dfa_builder::SubsetBuilder;
use crate::{alphabet::Alphabet, closure_builder::ClosureBuilder, dfa::Dfa, dot};

mod dfa_builder;

/// The outgoing edges of one NFA state, keyed by input symbol. `None` is ε.
/// The map is sparse: an absent symbol has no successors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node(BTreeMap<Option<char>, BTreeSet<usize>>);

impl Node {
    #[inline]
    pub fn edges(&self) -> btree_map::Iter<'_, Option<char>, BTreeSet<usize>> { self.0.iter() }

    #[inline]
    #[must_use]
    pub fn get(&self, input: Option<char>) -> Option<&BTreeSet<usize>> { self.0.get(&input) }

    pub(crate) fn nil_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.get(None).into_iter().flatten().copied()
    }

    fn shifted(self, by: usize) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|(i, outs)| (i, outs.into_iter().map(|n| n + by).collect()))
                .collect(),
        )
    }
}

/// An NFA over a finite `char` alphabet, with integer states.
///
/// Every state referenced by an edge or by the accept set is present in the
/// node map, and every labeled edge carries a symbol of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    alphabet: Alphabet,
    nodes: BTreeMap<usize, Node>,
    start: usize,
    accept: BTreeSet<usize>,
}

impl Nfa {
    /// Creates an automaton containing only `start`, with no accepts.
    #[must_use]
    pub fn new(alphabet: Alphabet, start: usize) -> Self {
        let mut me = Self {
            alphabet,
            nodes: BTreeMap::new(),
            start,
            accept: BTreeSet::new(),
        };
        assert!(me.insert(start).is_none());
        me
    }

    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet { &self.alphabet }

    #[inline]
    #[must_use]
    pub fn start(&self) -> usize { self.start }

    #[inline]
    #[must_use]
    pub fn accept(&self) -> &BTreeSet<usize> { &self.accept }

    #[inline]
    pub fn states(&self) -> impl Iterator<Item = usize> + '_ { self.nodes.keys().copied() }

    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize { self.nodes.len() }

    #[inline]
    #[must_use]
    pub fn get(&self, node: usize) -> Option<&Node> { self.nodes.get(&node) }

    /// Inserts a state, returning its previous node if it already existed.
    pub fn insert(&mut self, node: usize) -> Option<Node> {
        self.nodes.insert(node, Node::default())
    }

    /// Connects `from` to `to`. Both states must exist, and a labeled edge
    /// must carry a symbol of the alphabet. Returns whether the edge is new.
    pub fn connect(&mut self, from: usize, to: usize, by: Option<char>) -> bool {
        assert!(self.nodes.contains_key(&to));
        assert!(by.map_or(true, |sym| self.alphabet.contains(sym)));
        self.nodes
            .get_mut(&from)
            .unwrap()
            .0
            .entry(by)
            .or_default()
            .insert(to)
    }

    /// Marks an existing state as accepting.
    pub fn push_accept(&mut self, node: usize) {
        assert!(self.nodes.contains_key(&node));
        self.accept.insert(node);
    }

    fn extend_shifted(&mut self, nodes: BTreeMap<usize, Node>, by: usize) {
        self.nodes
            .extend(nodes.into_iter().map(|(n, node)| (n + by, node.shifted(by))));
    }

    pub(crate) fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        assert!(alphabet.is_superset(&self.alphabet));
        self.alphabet = alphabet;
        self
    }
}

/// The primitive automata and combinators used by Thompson's construction.
/// All of them allocate states `0..n`, with start `0` and (except for
/// [`Nfa::bottom`]) a single accept state `n - 1`.
impl Nfa {
    /// Two states recognizing exactly the one-symbol string `sym`.
    #[must_use]
    pub fn literal(sym: char) -> Self {
        let mut me = Self::new(Alphabet::single(sym), 0);
        me.insert(1);
        me.connect(0, 1, Some(sym));
        me.push_accept(1);
        me
    }

    /// One state that is both start and accept: the empty-string language.
    #[must_use]
    pub fn nil(alphabet: Alphabet) -> Self {
        let mut me = Self::new(alphabet, 0);
        me.push_accept(0);
        me
    }

    /// One state, no edges, no accepts: the empty language.
    #[must_use]
    pub fn bottom(alphabet: Alphabet) -> Self { Self::new(alphabet, 0) }

    /// Adds the start state to the accept set, admitting the empty string.
    #[must_use]
    pub fn accepting_nil(mut self) -> Self {
        self.accept.insert(self.start);
        self
    }

    /// A fresh start with ε-edges to both operand starts, and a fresh shared
    /// accept fed by ε-edges from both operand accepts. The first operand's
    /// states are shifted by 1, the second's by one past the first.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let Self {
            alphabet: l_alpha,
            nodes: l_nodes,
            start: l_start,
            accept: l_accept,
        } = self;
        let Self {
            alphabet: r_alpha,
            nodes: r_nodes,
            start: r_start,
            accept: r_accept,
        } = other;
        let (l_shift, r_shift) = (1, l_nodes.len() + 1);
        let tail = l_nodes.len() + r_nodes.len() + 1;

        let mut me = Self::new(l_alpha.unioned(&r_alpha), 0);
        me.extend_shifted(l_nodes, l_shift);
        me.extend_shifted(r_nodes, r_shift);
        me.insert(tail);

        me.connect(0, l_start + l_shift, None);
        me.connect(0, r_start + r_shift, None);
        for &a in &l_accept {
            me.connect(a + l_shift, tail, None);
        }
        for &a in &r_accept {
            me.connect(a + r_shift, tail, None);
        }
        me.push_accept(tail);
        me
    }

    /// A fresh start with ε-edges to *both* operand starts, ε-edges from the
    /// first operand's accepts into the second operand's start, and the
    /// second operand's accepts as the accept set.
    ///
    /// The edge from the fresh start to the second operand's start makes the
    /// first operand skippable, so the automaton recognizes a superset of
    /// the concatenated language. Recognition tests pin this behavior; the
    /// derivative pipeline recognizes the concatenation exactly.
    #[must_use]
    pub fn concat(self, other: Self) -> Self {
        let Self {
            alphabet: l_alpha,
            nodes: l_nodes,
            start: l_start,
            accept: l_accept,
        } = self;
        let Self {
            alphabet: r_alpha,
            nodes: r_nodes,
            start: r_start,
            accept: r_accept,
        } = other;
        let (l_shift, r_shift) = (1, l_nodes.len() + 1);

        let mut me = Self::new(l_alpha.unioned(&r_alpha), 0);
        me.extend_shifted(l_nodes, l_shift);
        me.extend_shifted(r_nodes, r_shift);

        me.connect(0, l_start + l_shift, None);
        me.connect(0, r_start + r_shift, None);
        for &a in &l_accept {
            me.connect(a + l_shift, r_start + r_shift, None);
        }
        for &a in &r_accept {
            me.push_accept(a + r_shift);
        }
        me
    }

    /// A fresh start with ε-edges to the shifted operand start and to a
    /// fresh accept; the operand's accepts gain ε-edges back to the operand
    /// start and forward to the fresh accept.
    ///
    /// The operand must have at least two states; the primitives and
    /// combinators above always satisfy this.
    #[must_use]
    pub fn kleene(self) -> Self {
        let Self {
            alphabet,
            nodes,
            start,
            accept,
        } = self;
        let tail = nodes.len() + 1;

        let mut me = Self::new(alphabet, 0);
        me.extend_shifted(nodes, 1);
        me.insert(tail);

        me.connect(0, start + 1, None);
        me.connect(0, tail, None);
        for &a in &accept {
            me.connect(a + 1, start + 1, None);
            me.connect(a + 1, tail, None);
        }
        me.push_accept(tail);
        me
    }
}

impl Nfa {
    /// All states reachable from `states` by one edge labeled `sym`.
    #[must_use]
    pub fn step(&self, states: &BTreeSet<usize>, sym: char) -> BTreeSet<usize> {
        states
            .iter()
            .filter_map(|n| self.nodes.get(n))
            .filter_map(|node| node.get(Some(sym)))
            .flatten()
            .copied()
            .collect()
    }

    /// The least superset of `states` closed under ε-edges.
    #[must_use]
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut closure = BTreeSet::new();
        let mut builder = ClosureBuilder::default();
        builder.seed(states);
        builder.solve(&mut closure, |n| {
            self.nodes.get(n).into_iter().flat_map(Node::nil_edges)
        });
        closure
    }

    /// Runs the automaton over `input`, or `None` if a symbol falls outside
    /// the alphabet.
    ///
    /// The state set starts as `{start}` *without* ε-closure; closure is
    /// applied only after each symbol step. An automaton whose start
    /// reaches an accept only through ε-edges rejects the empty string
    /// ([`Nfa::accepting_nil`] is the designated fix where that matters),
    /// and a start whose out-edges are all ε reaches nothing at all.
    /// Determinizing with [`Nfa::compile`] closes the start set and
    /// recognizes the full language.
    #[must_use]
    pub fn decide(&self, input: &str) -> Option<bool> {
        let mut states: BTreeSet<usize> = [self.start].into();
        for sym in input.chars() {
            if !self.alphabet.contains(sym) {
                return None;
            }
            states = self.epsilon_closure(self.step(&states, sym));
        }
        Some(!states.is_disjoint(&self.accept))
    }

    /// Determinizes the automaton by subset construction. The result is not
    /// minimized.
    #[must_use]
    pub fn compile(&self) -> Dfa { SubsetBuilder::new(self).build() }

    /// Renders the automaton as a Graphviz graph.
    #[must_use]
    pub fn dot(&self) -> dot::Graph {
        let mut graph = dot::Graph::default();
        for (&n, node) in &self.nodes {
            graph.state(n.to_string(), self.accept.contains(&n));
            for (input, outs) in node.edges() {
                let label = input.map_or_else(|| "ϵ".to_owned(), |sym| sym.to_string());
                for &to in outs {
                    graph.transition(n.to_string(), to.to_string(), label.clone());
                }
            }
        }
        graph.mark_start(self.start.to_string());
        graph
    }
}
