#![forbid(unsafe_code)]

//! Overlay lifecycle controller.
//!
//! [`TourController`] owns the step sequencer, the anchor registry, and the
//! single active overlay. It turns navigation commands into an explicit
//! show/hide protocol with the host:
//!
//! ```text
//!   Idle ──start──▶ Starting ──▶ AwaitingAnchor(step) ──register──▶ Showing(step)
//!                        │                                              │
//!                        └──────────── anchor known ───────────────────▶│
//!                                                                       │ next/back/close/pause
//!                                                                       ▼
//!                          Idle / Paused(step) / next step ◀──── Hiding(step)
//! ```
//!
//! # Invariants
//!
//! - At most one overlay exists. A new one is attached only after the
//!   previous one reported that it finished hiding and was detached.
//! - At most one anchor wait is pending; it is the `AwaitingAnchor` state
//!   itself, so any navigation replaces it.
//! - Navigation without a running tour, and navigation that does not move
//!   the cursor, changes nothing and emits nothing.
//! - Once `close` is in flight, navigation is ignored until the tour is gone.
//! - The layout candidate is locked only after the overlay has been measured
//!   on screen.
//!
//! # Two-phase show/hide
//!
//! After `Overlay::show` the controller needs the overlay's rendered size.
//! If `is_visible()` already reports `true`, the overlay is placed at once;
//! otherwise the host calls [`TourController::overlay_shown`] when it has
//! painted. Hiding mirrors this with [`TourController::overlay_hidden`].
//! When a step's anchor was already registered at the time it became current
//! (and the step is not a sub-step), the overlay is also placed right after
//! `show`, before the shown notification.

use std::sync::mpsc;

use waymark_core::geometry::Rect;
use waymark_core::registry::{AnchorRegistry, Registration};
use waymark_core::sequencer::TourGuide;
use waymark_core::step::{StepGraph, StepId, StepName};
use waymark_layout::{AppliedPosition, ConnectedPositionStrategy, LayoutInput};

use crate::anchor::AnchorHandle;
use crate::config::{StepConfig, StepControls, TourOptions};
use crate::error::Result;
use crate::event::{CloseKind, EventBus, EventSource, TourEvent, TourEventKind};
use crate::overlay::{Overlay, OverlayFactory};
use crate::window::{Backdrop, WindowCutout};

/// Where the controller is in the show/hide protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TourState {
    /// No tour.
    #[default]
    Idle,
    /// A tour was (re)started and its first step is not resolved yet.
    Starting,
    /// The active step has no registered anchor yet.
    AwaitingAnchor(StepName),
    /// The step's overlay is attached.
    Showing(StepName),
    /// The step's overlay is hiding; the next action runs once it is gone.
    Hiding(StepName),
    /// The tour is running but nothing is shown.
    Paused(StepName),
}

impl TourState {
    /// The step this state refers to.
    pub fn step(&self) -> Option<&StepName> {
        match self {
            Self::Idle | Self::Starting => None,
            Self::AwaitingAnchor(step)
            | Self::Showing(step)
            | Self::Hiding(step)
            | Self::Paused(step) => Some(step),
        }
    }
}

/// What to do once the current overlay has finished hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterHide {
    ShowActive,
    Pause,
    Close { kind: CloseKind, source: EventSource },
}

struct ActiveOverlay<O> {
    step: StepName,
    anchor: AnchorHandle,
    overlay: O,
    strategy: ConnectedPositionStrategy,
    awaiting_shown: bool,
    placed: bool,
    hiding: bool,
}

/// The tour navigation state machine.
pub struct TourController<F: OverlayFactory> {
    factory: F,
    options: TourOptions,
    registry: AnchorRegistry<AnchorHandle>,
    backdrop: Option<Box<dyn Backdrop>>,
    events: EventBus,
    guide: Option<TourGuide>,
    state: TourState,
    active: Option<ActiveOverlay<F::Overlay>>,
    after_hide: Option<AfterHide>,
    window: Option<WindowCutout>,
    last_placement: Option<AppliedPosition>,
    viewport: Rect,
}

impl<F: OverlayFactory> TourController<F> {
    pub fn new(factory: F, options: TourOptions) -> Self {
        Self {
            factory,
            registry: AnchorRegistry::new(options.registration_policy),
            backdrop: None,
            events: EventBus::new(),
            guide: None,
            state: TourState::Idle,
            active: None,
            after_hide: None,
            window: None,
            last_placement: None,
            viewport: options.viewport,
            options,
        }
    }

    /// Attach a backdrop. Without one, window updates are skipped.
    #[must_use]
    pub fn with_backdrop(mut self, backdrop: Box<dyn Backdrop>) -> Self {
        self.backdrop = Some(backdrop);
        self
    }

    pub fn set_backdrop(&mut self, backdrop: Option<Box<dyn Backdrop>>) {
        if let Some(old) = self.backdrop.as_mut()
            && self.window.take().is_some()
        {
            old.clear_window();
        }
        self.backdrop = backdrop;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> &TourState {
        &self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.guide.is_some()
    }

    /// Name of the sequencer's active step.
    pub fn active_step_name(&self) -> Option<&StepName> {
        self.guide.as_ref().map(|guide| guide.active().name())
    }

    pub fn guide(&self) -> Option<&TourGuide> {
        self.guide.as_ref()
    }

    #[inline]
    pub fn current_window(&self) -> Option<&WindowCutout> {
        self.window.as_ref()
    }

    #[inline]
    pub fn last_placement(&self) -> Option<&AppliedPosition> {
        self.last_placement.as_ref()
    }

    /// Whether an overlay is attached (showing or hiding).
    #[inline]
    pub fn has_overlay(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    #[inline]
    pub fn registry(&self) -> &AnchorRegistry<AnchorHandle> {
        &self.registry
    }

    #[inline]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    #[inline]
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Receive every lifecycle event.
    pub fn subscribe(&mut self) -> mpsc::Receiver<TourEvent> {
        self.events.subscribe()
    }

    /// Receive lifecycle events for one step.
    pub fn subscribe_step(&mut self, step: StepName) -> mpsc::Receiver<TourEvent> {
        self.events.subscribe_step(step)
    }

    // ------------------------------------------------------------------
    // Tour lifecycle
    // ------------------------------------------------------------------

    /// Start a tour over `graph`, prefixing every step with `namespace`.
    ///
    /// A running tour is replaced: its overlay hides first and the new
    /// tour's first step shows afterwards.
    pub fn start(&mut self, namespace: &str, mut graph: StepGraph) -> Result<()> {
        graph.namespace(namespace);
        let guide = TourGuide::new(graph)?;
        let first = guide.active().name().clone();
        let restarting = self.guide.is_some();
        self.guide = Some(guide);
        self.state = TourState::Starting;

        tracing::debug!(namespace, step = %first, restarting, "tour started");
        self.events.emit(TourEvent::new(
            Some(TourEventKind::Start),
            first,
            EventSource::Manual,
        ));

        self.request_show();
        if self.active.as_ref().is_some_and(|active| active.hiding) {
            // A pending close belongs to the old tour.
            self.after_hide = Some(AfterHide::ShowActive);
            self.state = TourState::Starting;
        }
        Ok(())
    }

    /// End the tour. The window goes away at once; the event is emitted
    /// after the overlay has hidden.
    pub fn close(&mut self, source: EventSource, kind: CloseKind) {
        if self.guide.is_none() {
            tracing::trace!(?kind, "close ignored: no active tour");
            return;
        }
        self.clear_window();
        self.hide_active(AfterHide::Close { kind, source });
    }

    /// Hide the current overlay but keep the tour position.
    pub fn pause(&mut self) {
        if self.guide.is_none() || matches!(self.state, TourState::Paused(_)) {
            return;
        }
        if matches!(self.after_hide, Some(AfterHide::Close { .. })) {
            return;
        }
        self.hide_active(AfterHide::Pause);
    }

    /// Show the active step again after a pause.
    pub fn resume(&mut self) {
        let Some(step) = self.active_step_name().cloned() else {
            return;
        };
        match self.state {
            TourState::Paused(_) => {
                self.events
                    .emit(TourEvent::new(None, step, EventSource::Manual));
                self.request_show();
            }
            TourState::Hiding(_) if self.after_hide == Some(AfterHide::Pause) => {
                self.events
                    .emit(TourEvent::new(None, step, EventSource::Manual));
                self.after_hide = Some(AfterHide::ShowActive);
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn next(&mut self, source: EventSource) {
        self.navigate(TourEventKind::Next, source, TourGuide::next_step);
    }

    pub fn back(&mut self, source: EventSource) {
        self.navigate(TourEventKind::Back, source, TourGuide::previous_step);
    }

    pub fn next_sub_step(&mut self, source: EventSource) {
        self.navigate(TourEventKind::Next, source, TourGuide::next_sub_step);
    }

    pub fn previous_sub_step(&mut self, source: EventSource) {
        self.navigate(TourEventKind::Back, source, TourGuide::previous_sub_step);
    }

    pub fn go_to_parent(&mut self, source: EventSource) {
        self.navigate(TourEventKind::Back, source, TourGuide::go_to_parent);
    }

    fn navigate(
        &mut self,
        kind: TourEventKind,
        source: EventSource,
        step_fn: fn(&mut TourGuide) -> StepId,
    ) {
        if matches!(self.after_hide, Some(AfterHide::Close { .. })) {
            tracing::trace!(?kind, "navigation ignored: tour is closing");
            return;
        }
        let Some(guide) = self.guide.as_mut() else {
            tracing::trace!(?kind, "navigation ignored: no active tour");
            return;
        };

        let config = self
            .registry
            .get(guide.active().name())
            .map(|handle| &handle.config);
        let blocked = source == EventSource::Overlay
            && match kind {
                TourEventKind::Next => config.is_some_and(|c| c.next_is_disabled),
                TourEventKind::Back => config.is_some_and(|c| c.back_is_disabled),
                _ => false,
            };
        if blocked {
            tracing::debug!(?kind, step = %guide.active().name(), "navigation disabled for step");
            return;
        }
        let hide_instead = kind == TourEventKind::Next && config.is_some_and(|c| c.next_is_hide);

        let before = guide.active_step();
        let after = step_fn(guide);
        if before == after {
            tracing::trace!(?kind, step = %guide.active().name(), "navigation at boundary");
            return;
        }
        let step = guide.graph().step(after).name().clone();

        tracing::debug!(?kind, step = %step, ?source, hide_instead, "navigated");
        self.events
            .emit(TourEvent::new(Some(kind), step, source));

        if hide_instead {
            self.hide_active(AfterHide::Pause);
        } else {
            self.request_show();
        }
    }

    /// Toggle a step's hidden flag by full name. Returns `false` when no
    /// tour is running or the name is unknown.
    pub fn set_step_hidden(&mut self, name: &str, hidden: bool) -> bool {
        let Some(guide) = self.guide.as_mut() else {
            return false;
        };
        let Some(id) = guide.graph().find(name) else {
            return false;
        };
        guide.set_hidden(id, hidden)
    }

    // ------------------------------------------------------------------
    // Host notifications
    // ------------------------------------------------------------------

    /// Register the anchor for `name`. Satisfies a pending wait for it.
    pub fn register_anchor(&mut self, name: StepName, handle: AnchorHandle) -> Registration {
        if !handle.config.should_register {
            tracing::debug!(step = %name, "anchor opted out of registration");
            return Registration::Ignored;
        }
        let outcome = self.registry.register(name.clone(), handle);
        if !outcome.is_stored() {
            return outcome;
        }

        let waiting = matches!(&self.state, TourState::AwaitingAnchor(step) if *step == name);
        if waiting && self.active.is_none() {
            if let Some(anchor) = self.registry.get(&name).cloned() {
                self.show_step(name, anchor, false);
            }
        } else if outcome == Registration::Replaced
            && let Some(anchor) = self.registry.get(&name).cloned()
            && let Some(active) = self.active.as_mut()
            && active.step == name
            && !active.hiding
        {
            active.anchor.element.set_active(false);
            anchor.element.set_active(true);
            active.anchor = anchor;
            if active.placed {
                self.place_and_cut();
            }
        }
        outcome
    }

    /// Remove the anchor for `name`. If its overlay is shown, the overlay
    /// hides and the step waits for a new registration.
    pub fn unregister_anchor(&mut self, name: &StepName) -> Option<AnchorHandle> {
        let removed = self.registry.unregister(name)?;
        let shown = self
            .active
            .as_ref()
            .is_some_and(|active| active.step == *name && !active.hiding);
        if shown {
            tracing::warn!(step = %name, "anchor unregistered while its overlay is shown");
            self.hide_active(AfterHide::ShowActive);
        }
        Some(removed)
    }

    /// The host finished showing the current overlay.
    pub fn overlay_shown(&mut self) {
        let Some(active) = self.active.as_mut() else {
            tracing::trace!("shown notification without an overlay");
            return;
        };
        if !active.awaiting_shown {
            return;
        }
        active.awaiting_shown = false;
        tracing::debug!(step = %active.step, "overlay shown");
        self.place_and_cut();
    }

    /// The host finished hiding the current overlay.
    pub fn overlay_hidden(&mut self) {
        if self.active.as_ref().is_some_and(|active| active.hiding) {
            self.finish_hide();
        } else {
            tracing::trace!("hidden notification without a hiding overlay");
        }
    }

    /// The viewport changed size or scrolled. Grants the layout engine one
    /// fresh scan.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.options.viewport = viewport;
        if let Some(active) = self.active.as_mut()
            && active.placed
            && !active.hiding
        {
            active.strategy.notify_viewport_resized();
            self.place_and_cut();
        }
    }

    /// The anchor for `name` moved; re-place with the locked candidate.
    pub fn anchor_moved(&mut self, name: &StepName) {
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.step == *name && active.placed && !active.hiding)
        {
            self.place_and_cut();
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn request_show(&mut self) {
        if self.active.is_some() {
            self.hide_active(AfterHide::ShowActive);
            return;
        }
        let Some(guide) = self.guide.as_ref() else {
            return;
        };
        let step = guide.active();
        let name = step.name().clone();
        let synchronous = !step.is_sub_step();

        match self.registry.get(&name).cloned() {
            Some(anchor) => self.show_step(name, anchor, synchronous),
            None => {
                tracing::debug!(step = %name, "waiting for anchor registration");
                self.state = TourState::AwaitingAnchor(name);
            }
        }
    }

    fn controls(&self, config: &StepConfig) -> StepControls {
        let (is_first, is_last) = self
            .guide
            .as_ref()
            .map_or((true, true), |guide| (guide.is_first(), guide.is_last()));
        StepControls {
            back_disabled: config.back_is_disabled,
            next_disabled: config.next_is_disabled,
            is_first,
            is_last,
        }
    }

    fn show_step(&mut self, name: StepName, anchor: AnchorHandle, synchronous: bool) {
        debug_assert!(self.active.is_none(), "previous overlay still attached");

        anchor.element.set_active(true);
        if let Some(hook) = &anchor.config.before_activate {
            hook(&name);
        }
        self.clear_window();

        let candidates = anchor.config.placement.candidates();
        let controls = self.controls(&anchor.config);
        let mut overlay = self.factory.attach(&name, &anchor);
        overlay.set_content(&anchor.config.content, controls);
        overlay.set_position(candidates.as_slice());
        overlay.show(self.options.show_delay);
        let visible = overlay.is_visible();

        tracing::debug!(step = %name, synchronous, visible, "overlay attached");
        self.active = Some(ActiveOverlay {
            step: name.clone(),
            anchor,
            overlay,
            strategy: ConnectedPositionStrategy::new(candidates, self.options.layout),
            awaiting_shown: !visible,
            placed: false,
            hiding: false,
        });
        self.state = TourState::Showing(name);

        if synchronous || visible {
            self.place_and_cut();
        }
    }

    fn place_and_cut(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.hiding {
            return;
        }
        let anchor_rect = active.anchor.element.bounding_rect();
        let input = LayoutInput::new(
            anchor_rect,
            active.overlay.measure_current_rect().size(),
            self.viewport,
        );
        let applied = active.strategy.apply(&input);
        // Sizes measured before the host painted are provisional; the
        // shown notification gets a full scan with the real size.
        if !active.awaiting_shown {
            active.strategy.set_locked(true);
        }
        let nubbin = active.anchor.config.nubbin.resolve(&applied.position);
        active.overlay.apply_placement(&applied, nubbin);
        active.placed = true;
        self.last_placement = Some(applied);

        let cutout = WindowCutout::new(self.viewport, anchor_rect, self.options.window_buffer);
        self.set_window(cutout);
    }

    fn set_window(&mut self, cutout: WindowCutout) {
        let Some(backdrop) = self.backdrop.as_mut() else {
            return;
        };
        backdrop.set_window(&cutout);
        self.window = Some(cutout);
    }

    fn clear_window(&mut self) {
        if self.window.take().is_some()
            && let Some(backdrop) = self.backdrop.as_mut()
        {
            backdrop.clear_window();
        }
    }

    fn hide_active(&mut self, then: AfterHide) {
        let Some(active) = self.active.as_mut() else {
            self.after_hidden(then);
            return;
        };
        if active.hiding {
            // A close already in flight is not downgraded.
            if !matches!(self.after_hide, Some(AfterHide::Close { .. })) {
                self.after_hide = Some(then);
            }
            return;
        }

        active.hiding = true;
        active.awaiting_shown = false;
        active.anchor.element.set_active(false);
        active.overlay.hide(self.options.hide_delay);
        active.overlay.clear_host_styling();
        let done = !active.overlay.is_visible();
        let step = active.step.clone();

        tracing::debug!(step = %step, "overlay hiding");
        self.after_hide = Some(then);
        self.state = TourState::Hiding(step);
        if done {
            self.finish_hide();
        }
    }

    fn finish_hide(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        tracing::debug!(step = %active.step, "overlay detached");
        self.factory.detach(active.overlay);
        if let Some(then) = self.after_hide.take() {
            self.after_hidden(then);
        }
    }

    fn after_hidden(&mut self, then: AfterHide) {
        match then {
            AfterHide::ShowActive => self.request_show(),
            AfterHide::Pause => {
                self.clear_window();
                if let Some(step) = self.active_step_name().cloned() {
                    tracing::debug!(step = %step, "tour paused");
                    self.state = TourState::Paused(step);
                }
            }
            AfterHide::Close { kind, source } => self.finish_close(kind, source),
        }
    }

    fn finish_close(&mut self, kind: CloseKind, source: EventSource) {
        self.clear_window();
        self.state = TourState::Idle;
        self.last_placement = None;
        let Some(guide) = self.guide.take() else {
            return;
        };
        let step = guide.active().name().clone();
        tracing::debug!(?kind, step = %step, "tour closed");
        self.events
            .emit(TourEvent::new(Some(kind.into()), step, source));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use waymark_core::geometry::Size;
    use waymark_layout::{ConnectionPosition, NubbinSide};

    use super::*;
    use crate::anchor::AnchorElement;
    use crate::config::StepContent;

    struct Element(Rect, Cell<bool>);

    impl AnchorElement for Element {
        fn bounding_rect(&self) -> Rect {
            self.0
        }
        fn set_active(&self, active: bool) {
            self.1.set(active);
        }
    }

    #[derive(Default)]
    struct Shared {
        visible: usize,
        attached: usize,
    }

    struct InstantOverlay {
        shared: Rc<RefCell<Shared>>,
        visible: bool,
    }

    impl Overlay for InstantOverlay {
        fn show(&mut self, _delay: Duration) {
            self.visible = true;
            self.shared.borrow_mut().visible += 1;
        }
        fn hide(&mut self, _delay: Duration) {
            if self.visible {
                self.visible = false;
                self.shared.borrow_mut().visible -= 1;
            }
        }
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn set_content(&mut self, _content: &StepContent, _controls: StepControls) {}
        fn set_position(&mut self, _candidates: &[ConnectionPosition]) {}
        fn measure_current_rect(&self) -> Rect {
            Rect::from_size(100.0, 40.0)
        }
        fn apply_placement(&mut self, _placement: &AppliedPosition, _nubbin: Option<NubbinSide>) {}
    }

    #[derive(Default)]
    struct Factory(Rc<RefCell<Shared>>);

    impl OverlayFactory for Factory {
        type Overlay = InstantOverlay;

        fn attach(&mut self, _step: &StepName, _anchor: &AnchorHandle) -> InstantOverlay {
            self.0.borrow_mut().attached += 1;
            InstantOverlay {
                shared: Rc::clone(&self.0),
                visible: false,
            }
        }

        fn detach(&mut self, _overlay: InstantOverlay) {
            self.0.borrow_mut().attached -= 1;
        }
    }

    fn controller() -> TourController<Factory> {
        let options = TourOptions::default().viewport(Rect::viewport(
            Size::new(800.0, 600.0),
            Default::default(),
        ));
        TourController::new(Factory::default(), options)
    }

    fn graph() -> StepGraph {
        StepGraph::builder().step("a").step("b").build().unwrap()
    }

    fn anchor(y: f64) -> (Rc<Element>, AnchorHandle) {
        let element = Rc::new(Element(Rect::new(100.0, y, 80.0, 20.0), Cell::new(false)));
        let handle = AnchorHandle::with_defaults(element.clone());
        (element, handle)
    }

    #[test]
    fn navigation_without_tour_is_noop() {
        let mut c = controller();
        c.next(EventSource::Manual);
        c.back(EventSource::Manual);
        c.close(EventSource::Manual, CloseKind::Close);
        assert_eq!(c.state(), &TourState::Idle);
        assert!(!c.is_running());
    }

    #[test]
    fn empty_graph_is_config_error() {
        let mut c = controller();
        assert!(c.start("t", StepGraph::new()).is_err());
        assert!(!c.is_running());
    }

    #[test]
    fn waits_then_shows_on_registration() {
        let mut c = controller();
        c.start("t", graph()).unwrap();
        assert_eq!(c.state(), &TourState::AwaitingAnchor(StepName::new("t.a")));
        assert_eq!(c.factory().0.borrow().attached, 0);

        let (element, handle) = anchor(100.0);
        c.register_anchor(StepName::new("t.a"), handle);
        assert_eq!(c.state(), &TourState::Showing(StepName::new("t.a")));
        assert!(element.1.get());
        assert_eq!(c.factory().0.borrow().visible, 1);
        assert!(c.last_placement().is_some());
    }

    #[test]
    fn next_swaps_overlays() {
        let mut c = controller();
        let (a, ha) = anchor(100.0);
        let (_b, hb) = anchor(300.0);
        c.register_anchor(StepName::new("t.a"), ha);
        c.register_anchor(StepName::new("t.b"), hb);
        c.start("t", graph()).unwrap();
        c.next(EventSource::Manual);
        assert_eq!(c.state(), &TourState::Showing(StepName::new("t.b")));
        assert!(!a.1.get());
        let shared = c.factory().0.borrow();
        assert_eq!(shared.visible, 1);
        assert_eq!(shared.attached, 1);
    }

    #[test]
    fn close_emits_after_hide_and_goes_idle() {
        let mut c = controller();
        let events = c.subscribe();
        let (_a, ha) = anchor(100.0);
        c.register_anchor(StepName::new("t.a"), ha);
        c.start("t", graph()).unwrap();
        c.close(EventSource::Overlay, CloseKind::Complete);
        assert_eq!(c.state(), &TourState::Idle);
        let kinds: Vec<_> = events.try_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [Some(TourEventKind::Start), Some(TourEventKind::Complete)]
        );
        assert_eq!(c.factory().0.borrow().attached, 0);
    }

    #[test]
    fn tour_state_step() {
        assert_eq!(TourState::Idle.step(), None);
        let name = StepName::new("t.a");
        assert_eq!(TourState::Paused(name.clone()).step(), Some(&name));
    }
}
