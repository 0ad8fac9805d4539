#![forbid(unsafe_code)]

//! Tour runtime: the overlay lifecycle controller and its host contracts.
//!
//! # Role in Waymark
//! `waymark-runtime` is where a tour actually runs. The host application
//! provides anchors ([`AnchorElement`]), an [`OverlayFactory`], and
//! optionally a [`Backdrop`]; [`TourController`] sequences the steps, waits
//! for anchors that are not mounted yet, places overlays with the
//! `waymark-layout` engine, and publishes [`TourEvent`]s.
//!
//! Everything runs on the host's event-loop thread. Asynchronous host work
//! (paint, hide animations, late anchor mounts) is reported back through
//! explicit calls such as [`TourController::overlay_shown`] and
//! [`TourController::register_anchor`].

pub mod anchor;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod overlay;
pub mod window;

pub use anchor::{AnchorElement, AnchorHandle};
pub use config::{
    BeforeActivate, Placement, StepConfig, StepContent, StepControls, TourOptions,
};
pub use controller::{TourController, TourState};
pub use error::{Result, TourError};
pub use event::{CloseKind, EventBus, EventSource, TourEvent, TourEventKind};
pub use overlay::{Overlay, OverlayFactory};
pub use window::{Backdrop, WindowCutout};
