//! Graphviz rendering of automata

use std::fmt::{self, Display};

use indexmap::IndexMap;

/// A directed graph in Graphviz dot form, with insertion-ordered nodes and
/// edges so the rendering is stable across runs.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<(String, String), Vec<Option<String>>>,
}

#[derive(Debug, Default)]
struct Node {
    style: Option<&'static str>,
    shape: Option<&'static str>,
    label: Option<String>,
    peripheries: Option<u8>,
}

impl Graph {
    /// Adds an automaton state; accepting states are drawn with a doubled
    /// border.
    pub(crate) fn state(&mut self, id: String, accept: bool) {
        let node = self.nodes.entry(id).or_default();
        if accept {
            node.peripheries = Some(2);
        }
    }

    /// Adds a labeled edge, creating its endpoints as plain states if
    /// needed.
    pub(crate) fn transition(&mut self, from: String, to: String, label: String) {
        self.state(from.clone(), false);
        self.state(to.clone(), false);
        self.edges.entry((from, to)).or_default().push(Some(label));
    }

    /// Points an invisible marker node at the start state.
    pub(crate) fn mark_start(&mut self, to: String) {
        let node = self.nodes.entry("_start".into()).or_default();
        node.style = Some("invis");
        node.shape = Some("point");
        node.label = Some(String::new());
        self.edges.entry(("_start".into(), to)).or_default().push(None);
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("digraph {")?;

        for (id, Node { style, shape, label, peripheries }) in &self.nodes {
            write!(f, "{id:?}")?;

            let mut attrs = Vec::new();
            if let Some(style) = style {
                attrs.push(format!("style={style:?}"));
            }
            if let Some(shape) = shape {
                attrs.push(format!("shape={shape:?}"));
            }
            if let Some(label) = label {
                attrs.push(format!("label={label:?}"));
            }
            if let Some(peripheries) = peripheries {
                attrs.push(format!("peripheries={peripheries}"));
            }
            if !attrs.is_empty() {
                write!(f, "[{}]", attrs.join(","))?;
            }
            f.write_str(";")?;
        }

        for ((from, to), edges) in &self.edges {
            for label in edges {
                write!(f, "{from:?}->{to:?}")?;
                if let Some(label) = label {
                    write!(f, "[label={label:?}]")?;
                }
                f.write_str(";")?;
            }
        }

        f.write_str("}")
    }
}
