#![forbid(unsafe_code)]

//! Core: geometry, step graph, step sequencing, and the anchor registry.
//!
//! # Role in Waymark
//! `waymark-core` holds the plain data every other crate builds on. Nothing
//! here performs I/O or knows about overlays; the layout engine
//! (`waymark-layout`) consumes [`geometry`] and the lifecycle controller
//! (`waymark-runtime`) drives [`sequencer::TourGuide`] and owns an
//! [`registry::AnchorRegistry`].
//!
//! # Primary responsibilities
//! - **Geometry**: document-space rectangles, points, sizes, margins.
//! - **StepGraph**: arena of steps with optional one-level sub-steps.
//! - **TourGuide**: forward/backward cursor over the graph.
//! - **AnchorRegistry**: step name to host handle, with an explicit policy
//!   for duplicate registrations.

pub mod geometry;
pub mod registry;
pub mod sequencer;
pub mod step;

pub use geometry::{Point, Rect, ScrollOffset, Sides, Size};
pub use registry::{AnchorRegistry, Registration, RegistrationPolicy};
pub use sequencer::TourGuide;
pub use step::{Step, StepGraph, StepGraphBuilder, StepGraphError, StepId, StepName};
