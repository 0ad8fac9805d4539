#![forbid(unsafe_code)]

//! Recording fakes for the Waymark host contracts.
//!
//! Integration tests drive a real [`TourController`] against these fakes
//! and then assert on what the "host" saw:
//!
//! - [`FakeAnchor`]: an anchor element with a settable rectangle that counts
//!   activations.
//! - [`FakeOverlayFactory`] / [`FakeOverlay`]: overlays that record every
//!   call into a shared [`OverlayLedger`]. In [`ShowMode::Deferred`] show and
//!   hide stay pending until the test settles them, which exercises the
//!   asynchronous half of the show/hide protocol.
//! - [`FakeBackdrop`]: records window updates into a [`BackdropLog`].

pub mod anchor;
pub mod backdrop;
pub mod overlay;

pub use anchor::FakeAnchor;
pub use backdrop::{BackdropCall, BackdropLog, FakeBackdrop};
pub use overlay::{
    FakeOverlay, FakeOverlayFactory, OverlayLedger, OverlayRecord, Pending, Settled,
    SharedLedger, ShowMode,
};

use waymark_runtime::{OverlayFactory, TourController};

/// Complete every pending show/hide and deliver the matching notifications
/// until nothing is pending.
///
/// Returns the total number of transitions completed.
pub fn settle<F: OverlayFactory>(controller: &mut TourController<F>, ledger: &SharedLedger) -> usize {
    let mut total = 0;
    loop {
        let settled = ledger.borrow_mut().settle();
        if settled.is_empty() {
            return total;
        }
        total += settled.hidden + settled.shown;
        if settled.hidden > 0 {
            controller.overlay_hidden();
        }
        if settled.shown > 0 {
            controller.overlay_shown();
        }
    }
}
