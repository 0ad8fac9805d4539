#![forbid(unsafe_code)]

//! Step graph: the ordered stops of a tour.
//!
//! Steps live in an arena ([`StepGraph`]) and refer to each other by
//! [`StepId`]. A top-level step may own an ordered list of sub-steps; a
//! sub-step records its parent as an id, so there is no ownership cycle
//! between parents and children.
//!
//! # Invariants
//!
//! - Every name in a graph is unique.
//! - A step is either top-level (`parent == None`) or a sub-step whose parent
//!   is a top-level step and lists it exactly once in `sub_steps`.
//! - After construction only the `hidden` flag and the namespace prefix of the
//!   names change.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or walking a step graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepGraphError {
    /// A tour needs at least one top-level step.
    #[error("step graph has no top-level steps")]
    Empty,
    /// Two steps share the same name.
    #[error("duplicate step name `{0}`")]
    DuplicateName(String),
    /// The parent id does not belong to this graph.
    #[error("unknown parent step id {0}")]
    UnknownParent(usize),
    /// Sub-steps may only hang off top-level steps.
    #[error("step `{0}` is itself a sub-step and cannot own sub-steps")]
    NestedSubStep(String),
    /// Step names must not be empty.
    #[error("step names must not be empty")]
    EmptyName,
}

/// Index of a step inside its [`StepGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    /// The raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A step name, optionally prefixed with a tour namespace.
///
/// The local part is what the tour author wrote; the full name is
/// `namespace + "." + local` once the tour has been namespaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepName(String);

impl StepName {
    /// Create a name from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build `namespace.local`.
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self(format!("{namespace}.{local}"))
    }

    /// The full name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StepName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One stop in a tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    local: String,
    name: StepName,
    hidden: bool,
    parent: Option<StepId>,
    sub_steps: Vec<StepId>,
}

impl Step {
    /// Full (possibly namespaced) name.
    #[inline]
    pub fn name(&self) -> &StepName {
        &self.name
    }

    /// Name as written by the tour author, without namespace.
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Whether the sequencer skips this step.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Owning top-level step, if this is a sub-step.
    #[inline]
    pub fn parent(&self) -> Option<StepId> {
        self.parent
    }

    /// Ordered sub-steps.
    #[inline]
    pub fn sub_steps(&self) -> &[StepId] {
        &self.sub_steps
    }

    #[inline]
    pub fn has_sub_steps(&self) -> bool {
        !self.sub_steps.is_empty()
    }

    #[inline]
    pub fn is_sub_step(&self) -> bool {
        self.parent.is_some()
    }
}

/// Arena of steps plus the ordered list of top-level steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepGraph {
    nodes: Vec<Step>,
    top_level: Vec<StepId>,
    namespace: Option<String>,
}

impl StepGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fluent builder.
    pub fn builder() -> StepGraphBuilder {
        StepGraphBuilder::default()
    }

    /// Append a top-level step.
    pub fn push_step(&mut self, name: &str, hidden: bool) -> Result<StepId, StepGraphError> {
        let id = self.insert(name, hidden, None)?;
        self.top_level.push(id);
        Ok(id)
    }

    /// Append a sub-step to `parent`.
    pub fn push_sub_step(
        &mut self,
        parent: StepId,
        name: &str,
        hidden: bool,
    ) -> Result<StepId, StepGraphError> {
        let owner = self
            .nodes
            .get(parent.0)
            .ok_or(StepGraphError::UnknownParent(parent.0))?;
        if owner.is_sub_step() {
            return Err(StepGraphError::NestedSubStep(owner.local.clone()));
        }
        let id = self.insert(name, hidden, Some(parent))?;
        self.nodes[parent.0].sub_steps.push(id);
        Ok(id)
    }

    fn insert(
        &mut self,
        local: &str,
        hidden: bool,
        parent: Option<StepId>,
    ) -> Result<StepId, StepGraphError> {
        if local.is_empty() {
            return Err(StepGraphError::EmptyName);
        }
        if self.nodes.iter().any(|step| step.local == local) {
            return Err(StepGraphError::DuplicateName(local.to_owned()));
        }
        let name = match &self.namespace {
            Some(ns) => StepName::namespaced(ns, local),
            None => StepName::new(local),
        };
        let id = StepId(self.nodes.len());
        self.nodes.push(Step {
            local: local.to_owned(),
            name,
            hidden,
            parent,
            sub_steps: Vec::new(),
        });
        Ok(id)
    }

    /// Prefix every step name with `namespace.`.
    ///
    /// Calling this again replaces the previous prefix.
    pub fn namespace(&mut self, namespace: &str) {
        for step in &mut self.nodes {
            step.name = StepName::namespaced(namespace, &step.local);
        }
        self.namespace = Some(namespace.to_owned());
    }

    /// The current namespace prefix, if any.
    pub fn current_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Look up a step by id.
    #[inline]
    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.nodes.get(id.0)
    }

    /// Look up a step by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph. Ids are only minted by
    /// the graph itself, so this indicates mixing graphs.
    #[inline]
    pub fn step(&self, id: StepId) -> &Step {
        &self.nodes[id.0]
    }

    /// Find a step by its full name.
    pub fn find(&self, name: &str) -> Option<StepId> {
        self.nodes
            .iter()
            .position(|step| step.name.as_str() == name)
            .map(StepId)
    }

    /// Find a step by its local (un-namespaced) name.
    pub fn find_local(&self, local: &str) -> Option<StepId> {
        self.nodes
            .iter()
            .position(|step| step.local == local)
            .map(StepId)
    }

    /// Ordered top-level steps.
    #[inline]
    pub fn top_level(&self) -> &[StepId] {
        &self.top_level
    }

    /// Total number of steps, sub-steps included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Change the hidden flag of a step. Returns `false` for an unknown id.
    pub fn set_hidden(&mut self, id: StepId, hidden: bool) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(step) => {
                step.hidden = hidden;
                true
            }
            None => false,
        }
    }

    /// Iterate over all steps in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StepId, &Step)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, step)| (StepId(index), step))
    }
}

#[derive(Debug, Clone)]
struct PendingStep {
    name: String,
    hidden: bool,
    sub_steps: Vec<(String, bool)>,
}

/// Fluent builder for [`StepGraph`].
///
/// Errors are collected and reported by [`StepGraphBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct StepGraphBuilder {
    steps: Vec<PendingStep>,
}

impl StepGraphBuilder {
    /// Add a visible top-level step.
    #[must_use]
    pub fn step(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PendingStep {
            name: name.into(),
            hidden: false,
            sub_steps: Vec::new(),
        });
        self
    }

    /// Add a hidden top-level step.
    #[must_use]
    pub fn hidden_step(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PendingStep {
            name: name.into(),
            hidden: true,
            sub_steps: Vec::new(),
        });
        self
    }

    /// Add a top-level step with visible sub-steps.
    #[must_use]
    pub fn step_with_sub_steps<I, S>(mut self, name: impl Into<String>, sub_steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(PendingStep {
            name: name.into(),
            hidden: false,
            sub_steps: sub_steps.into_iter().map(|s| (s.into(), false)).collect(),
        });
        self
    }

    /// Build the graph.
    pub fn build(self) -> Result<StepGraph, StepGraphError> {
        let mut graph = StepGraph::new();
        for pending in self.steps {
            let parent = graph.push_step(&pending.name, pending.hidden)?;
            for (sub, hidden) in pending.sub_steps {
                graph.push_sub_step(parent, &sub, hidden)?;
            }
        }
        Ok(graph)
    }
}
