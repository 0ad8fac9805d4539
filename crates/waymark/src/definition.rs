#![forbid(unsafe_code)]

//! JSON tour definitions.
//!
//! A [`TourDefinition`] describes a tour's steps and their per-step
//! configuration in one document:
//!
//! ```json
//! {
//!   "namespace": "onboarding",
//!   "steps": [
//!     { "name": "search", "position": "below-start", "text": "Find anything." },
//!     { "name": "filters", "sub_steps": [{ "name": "date" }, { "name": "owner" }] }
//!   ]
//! }
//! ```
//!
//! The graph comes from [`TourDefinition::to_graph`]; the host builds each
//! anchor's [`StepConfig`] from [`TourDefinition::step_config`].

use serde::{Deserialize, Serialize};
use waymark_core::step::{StepGraph, StepName};
use waymark_layout::{ConnectionPositions, NubbinPosition, OverlayPosition};
use waymark_runtime::{OverlayFactory, Placement, StepConfig, StepContent, TourController};

use crate::{Error, Result};

/// A whole tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TourDefinition {
    /// Prefix applied to every step name when the tour starts.
    pub namespace: String,
    pub steps: Vec<StepDefinition>,
}

/// One step and the configuration of its anchor.
///
/// `connections` wins over `position` when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepDefinition {
    pub name: String,
    pub hidden: bool,
    pub sub_steps: Vec<StepDefinition>,
    pub position: Option<String>,
    pub connections: Option<ConnectionPositions>,
    pub nubbin: Option<String>,
    pub title: Option<String>,
    pub text: String,
    pub next_is_hide: bool,
    pub back_is_disabled: bool,
    pub next_is_disabled: bool,
    pub should_register: bool,
}

impl Default for StepDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            hidden: false,
            sub_steps: Vec::new(),
            position: None,
            connections: None,
            nubbin: None,
            title: None,
            text: String::new(),
            next_is_hide: false,
            back_is_disabled: false,
            next_is_disabled: false,
            should_register: true,
        }
    }
}

impl StepDefinition {
    /// Build the anchor configuration for this step.
    ///
    /// Unknown position or nubbin names are configuration errors.
    pub fn to_config(&self) -> Result<StepConfig> {
        let placement = match (&self.connections, &self.position) {
            (Some(connections), _) => Placement::Custom(connections.clone()),
            (None, Some(position)) => Placement::Named(position.parse::<OverlayPosition>()?),
            (None, None) => Placement::default(),
        };
        let nubbin = match &self.nubbin {
            Some(nubbin) => nubbin.parse::<NubbinPosition>()?,
            None => NubbinPosition::default(),
        };
        let mut content = StepContent::new(self.text.clone());
        if let Some(title) = &self.title {
            content = content.title(title.clone());
        }

        Ok(StepConfig::default()
            .placement(placement)
            .nubbin(nubbin)
            .content(content)
            .should_register(self.should_register)
            .next_is_hide(self.next_is_hide)
            .back_is_disabled(self.back_is_disabled)
            .next_is_disabled(self.next_is_disabled))
    }
}

impl TourDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: Self = serde_json::from_str(json)?;
        tracing::debug!(
            namespace = %definition.namespace,
            steps = definition.steps.len(),
            "tour definition parsed"
        );
        Ok(definition)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the (un-namespaced) step graph.
    ///
    /// Sub-steps of sub-steps are rejected.
    pub fn to_graph(&self) -> Result<StepGraph> {
        let mut graph = StepGraph::new();
        for step in &self.steps {
            let parent = graph.push_step(&step.name, step.hidden)?;
            for sub in &step.sub_steps {
                graph.push_sub_step(parent, &sub.name, sub.hidden)?;
                if !sub.sub_steps.is_empty() {
                    return Err(waymark_core::StepGraphError::NestedSubStep(sub.name.clone()).into());
                }
            }
        }
        Ok(graph)
    }

    /// Find a step (top-level or sub-step) by its local name.
    pub fn step(&self, local: &str) -> Option<&StepDefinition> {
        self.steps.iter().find_map(|step| {
            if step.name == local {
                Some(step)
            } else {
                step.sub_steps.iter().find(|sub| sub.name == local)
            }
        })
    }

    /// The anchor configuration for the step with local name `local`.
    pub fn step_config(&self, local: &str) -> Result<StepConfig> {
        self.step(local)
            .ok_or_else(|| Error::UnknownStep(local.to_owned()))?
            .to_config()
    }

    /// The name a host registers the anchor for `local` under.
    pub fn anchor_name(&self, local: &str) -> StepName {
        StepName::namespaced(&self.namespace, local)
    }

    /// Start this tour on `controller`.
    pub fn start<F: OverlayFactory>(&self, controller: &mut TourController<F>) -> Result<()> {
        controller.start(&self.namespace, self.to_graph()?)?;
        Ok(())
    }
}
