#![forbid(unsafe_code)]

//! Connected-position layout for anchored overlays.
//!
//! # Role in Waymark
//! `waymark-layout` decides where a tour overlay goes relative to its anchor.
//! It is pure geometry: inputs are rectangles and sizes from
//! `waymark-core`, outputs are an [`AppliedPosition`] with a final rectangle
//! and the inline offsets a host writes onto its overlay element.
//!
//! # Primary responsibilities
//! - **Connections**: [`ConnectionPosition`] pairs an anchor point with an
//!   overlay point, plus offset and ranking weight.
//! - **Named positions**: [`OverlayPosition`] expands `below`, `after`, ... into
//!   ranked candidate lists; [`NubbinPosition`] picks the arrow edge.
//! - **Strategy**: [`ConnectedPositionStrategy`] scans candidates through the
//!   fit / flexible / push / fallback tiers, with optional locking.

use thiserror::Error;

pub mod connection;
pub mod position;
pub mod strategy;

pub use connection::{
    ConnectionPosition, ConnectionPositions, Direction, HorizontalConnection, VerticalConnection,
};
pub use position::{NubbinPosition, NubbinSide, OverlayPosition};
pub use strategy::{
    AppliedPosition, ConnectedPositionStrategy, LayoutInput, LayoutOptions, OverlayFit,
    OverlayStyle, PlacementTier,
};
pub use waymark_core::geometry::{Point, Rect, Sides, Size};

/// Configuration errors raised while building candidate lists.
///
/// Placement itself never fails; these only surface while parsing or
/// validating positions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("a connected position strategy needs at least one candidate")]
    NoCandidates,
    #[error("invalid {axis} connection `{value}`")]
    InvalidConnection { axis: &'static str, value: String },
    #[error("candidate offset must be finite (got {x}, {y})")]
    InvalidOffset { x: f64, y: f64 },
    #[error("candidate weight must be positive and finite (got {0})")]
    InvalidWeight(f64),
    #[error("unknown overlay position `{0}`")]
    UnknownPosition(String),
    #[error("unknown nubbin position `{0}`")]
    UnknownNubbin(String),
}
