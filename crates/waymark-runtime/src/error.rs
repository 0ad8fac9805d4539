#![forbid(unsafe_code)]

use thiserror::Error;
use waymark_core::step::StepGraphError;
use waymark_layout::LayoutError;

/// Configuration errors surfaced by the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TourError {
    #[error("invalid step graph: {0}")]
    Graph(#[from] StepGraphError),
    #[error("invalid placement: {0}")]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, TourError>;
