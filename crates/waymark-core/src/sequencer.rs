#![forbid(unsafe_code)]

//! Step sequencer: walks a [`StepGraph`] forward and backward.
//!
//! [`TourGuide`] tracks two cursors:
//! - `current`: index into the top-level step list.
//! - `active`: the focused step, either `top_level[current]` or one of its
//!   sub-steps.
//!
//! Top-level moves skip hidden steps. Sub-step moves walk the active step's
//! siblings. Every move at a boundary is a no-op that returns the active step
//! unchanged; there is no terminal state.

use crate::step::{Step, StepGraph, StepGraphError, StepId};

/// Cursor over a step graph.
#[derive(Debug, Clone)]
pub struct TourGuide {
    graph: StepGraph,
    current: usize,
    active: StepId,
}

impl TourGuide {
    /// Create a guide positioned on the first visible top-level step.
    ///
    /// If every top-level step is hidden the guide starts on the first one.
    pub fn new(graph: StepGraph) -> Result<Self, StepGraphError> {
        let Some(&first) = graph.top_level().first() else {
            return Err(StepGraphError::Empty);
        };
        let current = graph
            .top_level()
            .iter()
            .position(|id| !graph.step(*id).is_hidden())
            .unwrap_or(0);
        let active = graph.top_level().get(current).copied().unwrap_or(first);
        Ok(Self {
            graph,
            current,
            active,
        })
    }

    /// The underlying graph.
    #[inline]
    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    /// Change a step's hidden flag. Returns `false` for an id from another
    /// graph.
    ///
    /// Hiding the active step does not move the cursor; the next move skips
    /// it.
    pub fn set_hidden(&mut self, id: StepId, hidden: bool) -> bool {
        self.graph.set_hidden(id, hidden)
    }

    /// Index of the current top-level step.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Id of the focused step.
    #[inline]
    pub fn active_step(&self) -> StepId {
        self.active
    }

    /// The focused step.
    #[inline]
    pub fn active(&self) -> &Step {
        self.graph.step(self.active)
    }

    /// The top-level step at `current`.
    ///
    /// The guide owns its graph and only ever changes hidden flags, so
    /// `current` always indexes a live top-level step.
    #[inline]
    pub fn current_step(&self) -> StepId {
        self.graph.top_level()[self.current]
    }

    /// Advance to the next visible top-level step.
    pub fn next_step(&mut self) -> StepId {
        let top = self.graph.top_level();
        let found = (self.current + 1..top.len()).find(|&i| !self.graph.step(top[i]).is_hidden());
        if let Some(index) = found {
            self.current = index;
            self.active = top[index];
        }
        self.active
    }

    /// Move back to the previous visible top-level step.
    pub fn previous_step(&mut self) -> StepId {
        let top = self.graph.top_level();
        let found = (0..self.current)
            .rev()
            .find(|&i| !self.graph.step(top[i]).is_hidden());
        if let Some(index) = found {
            self.current = index;
            self.active = top[index];
        }
        self.active
    }

    /// Enter the active step's sub-steps, or move to the next sibling.
    ///
    /// Past the last sibling this is a no-op.
    pub fn next_sub_step(&mut self) -> StepId {
        let step = self.graph.step(self.active);
        if let Some(&first) = step.sub_steps().first() {
            self.active = first;
        } else if let Some(parent) = step.parent() {
            let siblings = self.graph.step(parent).sub_steps();
            if let Some(pos) = siblings.iter().position(|id| *id == self.active)
                && let Some(&next) = siblings.get(pos + 1)
            {
                self.active = next;
            }
        }
        self.active
    }

    /// Move to the previous sibling, or to the parent from the first sibling.
    ///
    /// On a top-level step this is a no-op.
    pub fn previous_sub_step(&mut self) -> StepId {
        let Some(parent) = self.graph.step(self.active).parent() else {
            return self.active;
        };
        let siblings = self.graph.step(parent).sub_steps();
        self.active = match siblings.iter().position(|id| *id == self.active) {
            Some(pos) if pos > 0 => siblings[pos - 1],
            _ => parent,
        };
        self.active
    }

    /// Jump from a sub-step straight back to its parent.
    pub fn go_to_parent(&mut self) -> StepId {
        if let Some(parent) = self.graph.step(self.active).parent() {
            self.active = parent;
        }
        self.active
    }

    /// Whether no visible top-level step follows the current one.
    pub fn is_last(&self) -> bool {
        let top = self.graph.top_level();
        !(self.current + 1..top.len()).any(|i| !self.graph.step(top[i]).is_hidden())
    }

    /// Whether no visible top-level step precedes the current one.
    pub fn is_first(&self) -> bool {
        let top = self.graph.top_level();
        !(0..self.current).any(|i| !self.graph.step(top[i]).is_hidden())
    }
}
