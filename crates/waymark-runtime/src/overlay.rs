#![forbid(unsafe_code)]

//! Host overlay contract.
//!
//! The controller never renders anything itself. It drives an [`Overlay`]
//! created by the host's [`OverlayFactory`] and waits for the host to report
//! when show and hide transitions have finished (see
//! [`TourController::overlay_shown`](crate::TourController::overlay_shown)).

use std::time::Duration;

use waymark_core::geometry::Rect;
use waymark_core::step::StepName;
use waymark_layout::{AppliedPosition, ConnectionPosition, NubbinSide};

use crate::anchor::AnchorHandle;
use crate::config::{StepContent, StepControls};

/// One floating panel attached to an anchor.
pub trait Overlay {
    /// Start showing after `delay`.
    fn show(&mut self, delay: Duration);

    /// Start hiding after `delay`.
    fn hide(&mut self, delay: Duration);

    /// Whether the overlay is currently on screen.
    ///
    /// Checked right after `show`/`hide`: a host that transitions instantly
    /// reports the new state here and never needs to call back.
    fn is_visible(&self) -> bool;

    fn set_content(&mut self, content: &StepContent, controls: StepControls);

    /// The ranked candidates the overlay will be placed with.
    fn set_position(&mut self, candidates: &[ConnectionPosition]);

    /// Current rendered rectangle; only its size is used for layout.
    fn measure_current_rect(&self) -> Rect;

    /// Write the engine's result onto the overlay.
    fn apply_placement(&mut self, placement: &AppliedPosition, nubbin: Option<NubbinSide>);

    /// Drop any styling the overlay put on its host.
    fn clear_host_styling(&mut self) {}
}

/// Creates and destroys overlays.
pub trait OverlayFactory {
    type Overlay: Overlay;

    /// Create the overlay for `step`, anchored to `anchor`.
    fn attach(&mut self, step: &StepName, anchor: &AnchorHandle) -> Self::Overlay;

    /// Destroy an overlay once it has finished hiding.
    fn detach(&mut self, overlay: Self::Overlay) {
        drop(overlay);
    }
}
