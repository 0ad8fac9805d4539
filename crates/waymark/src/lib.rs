#![forbid(unsafe_code)]

//! Waymark public facade crate.
//!
//! Waymark runs guided tours: a sequence of steps, each pointing an overlay
//! at an element of the host application. This crate re-exports the types a
//! host needs from the internal crates, unifies their errors, and (with the
//! `serde` feature, on by default) loads tours from JSON.
//!
//! ```ignore
//! use waymark::prelude::*;
//!
//! let tour = TourDefinition::from_json(json)?;
//! let mut controller = TourController::new(my_factory, TourOptions::default());
//! controller.register_anchor(tour.anchor_name("search"), handle);
//! tour.start(&mut controller)?;
//! ```

use thiserror::Error;

#[cfg(feature = "serde")]
pub mod definition;

// --- Core re-exports -------------------------------------------------------

pub use waymark_core::geometry::{Point, Rect, ScrollOffset, Sides, Size};
pub use waymark_core::registry::{AnchorRegistry, Registration, RegistrationPolicy};
pub use waymark_core::sequencer::TourGuide;
pub use waymark_core::step::{Step, StepGraph, StepGraphBuilder, StepGraphError, StepId, StepName};

// --- Layout re-exports -----------------------------------------------------

pub use waymark_layout::{
    AppliedPosition, ConnectedPositionStrategy, ConnectionPosition, ConnectionPositions,
    Direction, HorizontalConnection, LayoutError, LayoutInput, LayoutOptions, NubbinPosition,
    NubbinSide, OverlayFit, OverlayPosition, OverlayStyle, PlacementTier, VerticalConnection,
};

// --- Runtime re-exports ----------------------------------------------------

pub use waymark_runtime::{
    AnchorElement, AnchorHandle, Backdrop, CloseKind, EventSource, Overlay, OverlayFactory,
    Placement, StepConfig, StepContent, StepControls, TourController, TourError, TourEvent,
    TourEventKind, TourOptions, TourState, WindowCutout,
};

#[cfg(feature = "serde")]
pub use definition::{StepDefinition, TourDefinition};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Waymark hosts.
///
/// Every variant is a configuration problem; running tours never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("step graph error: {0}")]
    Graph(#[from] StepGraphError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tour definition has no step named `{0}`")]
    UnknownStep(String),
}

impl From<TourError> for Error {
    fn from(err: TourError) -> Self {
        match err {
            TourError::Graph(err) => Self::Graph(err),
            TourError::Layout(err) => Self::Layout(err),
        }
    }
}

/// Standard result type for Waymark APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorElement, AnchorHandle, Backdrop, CloseKind, Error, EventSource, NubbinPosition,
        Overlay, OverlayFactory, OverlayPosition, Rect, Result, Size, StepConfig, StepContent,
        StepGraph, StepName, TourController, TourEvent, TourEventKind, TourOptions, TourState,
    };

    #[cfg(feature = "serde")]
    pub use crate::{StepDefinition, TourDefinition};

    pub use crate::{core, layout, runtime};
}

pub use waymark_core as core;
pub use waymark_layout as layout;
pub use waymark_runtime as runtime;
