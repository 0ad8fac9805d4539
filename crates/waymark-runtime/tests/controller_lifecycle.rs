#![forbid(unsafe_code)]

//! End-to-end controller scenarios against the harness fakes.
//!
//! Run:
//!   cargo test -p waymark-runtime --test controller_lifecycle

use std::cell::RefCell;
use std::rc::Rc;

use waymark_core::geometry::{Rect, ScrollOffset, Size};
use waymark_core::registry::{Registration, RegistrationPolicy};
use waymark_core::step::{StepGraph, StepName};
use waymark_harness::{
    BackdropLog, FakeAnchor, FakeBackdrop, FakeOverlayFactory, SharedLedger, ShowMode, settle,
};
use waymark_layout::{NubbinSide, OverlayPosition, PlacementTier};
use waymark_runtime::{
    CloseKind, EventSource, StepConfig, StepContent, TourController, TourEventKind, TourOptions,
    TourState,
};

const NS: &str = "tour";

fn name(local: &str) -> StepName {
    StepName::namespaced(NS, local)
}

fn viewport() -> Rect {
    Rect::viewport(Size::new(800.0, 600.0), ScrollOffset::default())
}

struct Rig {
    controller: TourController<FakeOverlayFactory>,
    ledger: SharedLedger,
    backdrop: BackdropLog,
}

fn rig(mode: ShowMode) -> Rig {
    rig_with(mode, TourOptions::default().viewport(viewport()))
}

fn rig_with(mode: ShowMode, options: TourOptions) -> Rig {
    rig_from(FakeOverlayFactory::new(mode), options)
}

fn rig_from(factory: FakeOverlayFactory, options: TourOptions) -> Rig {
    let ledger = factory.ledger();
    let (backdrop, log) = FakeBackdrop::boxed();
    let controller = TourController::new(factory, options).with_backdrop(backdrop);
    Rig {
        controller,
        ledger,
        backdrop: log,
    }
}

fn scenario_graph() -> StepGraph {
    StepGraph::builder()
        .step("a")
        .step_with_sub_steps("b", ["b1", "b2"])
        .step("c")
        .build()
        .unwrap()
}

fn register_all(rig: &mut Rig, locals: &[&str]) -> Vec<Rc<FakeAnchor>> {
    locals
        .iter()
        .enumerate()
        .map(|(i, local)| {
            let anchor = FakeAnchor::new(Rect::new(100.0, 60.0 + 80.0 * i as f64, 120.0, 30.0));
            rig.controller
                .register_anchor(name(local), anchor.handle(StepConfig::default()));
            anchor
        })
        .collect()
}

fn active(rig: &Rig) -> &str {
    rig.controller
        .active_step_name()
        .map(StepName::as_str)
        .unwrap_or("")
}

#[test]
fn walkthrough_with_sub_steps() {
    let mut rig = rig(ShowMode::Immediate);
    register_all(&mut rig, &["a", "b", "b1", "b2", "c"]);
    rig.controller.start(NS, scenario_graph()).unwrap();
    assert_eq!(active(&rig), "tour.a");

    rig.controller.next(EventSource::Manual);
    assert_eq!(active(&rig), "tour.b");
    rig.controller.next_sub_step(EventSource::Manual);
    assert_eq!(active(&rig), "tour.b1");
    rig.controller.next_sub_step(EventSource::Manual);
    assert_eq!(active(&rig), "tour.b2");
    rig.controller.go_to_parent(EventSource::Manual);
    assert_eq!(active(&rig), "tour.b");
    rig.controller.next(EventSource::Manual);
    assert_eq!(active(&rig), "tour.c");
    rig.controller.next(EventSource::Manual);
    assert_eq!(active(&rig), "tour.c");

    assert_eq!(rig.controller.state(), &TourState::Showing(name("c")));
    let ledger = rig.ledger.borrow();
    assert_eq!(ledger.max_visible(), 1);
    assert_eq!(ledger.max_attached(), 1);
    assert_eq!(ledger.visible_count(), 1);
}

#[test]
fn late_anchor_shows_exactly_once() {
    let mut rig = rig(ShowMode::Immediate);
    rig.controller
        .start(NS, StepGraph::builder().step("x").build().unwrap())
        .unwrap();
    assert_eq!(rig.controller.state(), &TourState::AwaitingAnchor(name("x")));
    assert_eq!(rig.ledger.borrow().records().len(), 0);

    let anchor = FakeAnchor::new(Rect::new(50.0, 50.0, 100.0, 20.0));
    rig.controller
        .register_anchor(name("x"), anchor.handle(StepConfig::default()));
    // A second registration under the same name changes nothing.
    let again = FakeAnchor::new(Rect::new(400.0, 400.0, 100.0, 20.0));
    assert_eq!(
        rig.controller
            .register_anchor(name("x"), again.handle(StepConfig::default())),
        Registration::Ignored
    );

    assert_eq!(rig.ledger.borrow().times_shown("tour.x"), 1);
    assert_eq!(rig.ledger.borrow().records().len(), 1);
    assert_eq!(anchor.activations(), 1);
    assert_eq!(again.activations(), 0);
}

#[test]
fn navigation_cancels_pending_wait() {
    let mut rig = rig(ShowMode::Immediate);
    let graph = StepGraph::builder().step("a").step("b").build().unwrap();
    rig.controller.start(NS, graph).unwrap();
    assert_eq!(rig.controller.state(), &TourState::AwaitingAnchor(name("a")));

    rig.controller.next(EventSource::Manual);
    assert_eq!(rig.controller.state(), &TourState::AwaitingAnchor(name("b")));

    let a = FakeAnchor::new(Rect::new(0.0, 0.0, 10.0, 10.0));
    rig.controller
        .register_anchor(name("a"), a.handle(StepConfig::default()));
    assert_eq!(rig.ledger.borrow().records().len(), 0);
    assert_eq!(a.activations(), 0);
}

#[test]
fn deferred_overlays_never_overlap() {
    let mut rig = rig(ShowMode::Deferred);
    register_all(&mut rig, &["a", "b", "b1", "b2", "c"]);
    rig.controller.start(NS, scenario_graph()).unwrap();
    settle(&mut rig.controller, &rig.ledger);
    assert_eq!(rig.ledger.borrow().visible_count(), 1);

    rig.controller.next(EventSource::Manual);
    // The old overlay is still hiding; the new one must not exist yet.
    assert_eq!(rig.controller.state(), &TourState::Hiding(name("a")));
    assert_eq!(rig.ledger.borrow().records().len(), 1);

    settle(&mut rig.controller, &rig.ledger);
    assert_eq!(rig.controller.state(), &TourState::Showing(name("b")));
    assert_eq!(rig.ledger.borrow().records().len(), 2);
    assert_eq!(rig.ledger.borrow().max_visible(), 1);
    assert_eq!(rig.ledger.borrow().max_attached(), 1);
}

#[test]
fn sync_path_places_before_shown_sub_step_waits() {
    let mut rig = rig(ShowMode::Deferred);
    register_all(&mut rig, &["a", "b", "b1", "b2", "c"]);
    rig.controller.start(NS, scenario_graph()).unwrap();

    // Anchor known and top-level: placed and windowed right after show.
    assert_eq!(rig.ledger.borrow().latest().unwrap().placements.len(), 1);
    assert!(rig.backdrop.current().is_some());
    settle(&mut rig.controller, &rig.ledger);

    rig.controller.next(EventSource::Manual);
    settle(&mut rig.controller, &rig.ledger);
    rig.controller.next_sub_step(EventSource::Manual);
    // Old overlay hides, then the sub-step overlay is attached but not placed.
    let hidden = rig.ledger.borrow_mut().settle();
    assert_eq!(hidden.hidden, 1);
    rig.controller.overlay_hidden();
    assert_eq!(rig.controller.state(), &TourState::Showing(name("b1")));
    assert!(rig.ledger.borrow().latest().unwrap().placements.is_empty());
    assert!(rig.backdrop.current().is_none());

    settle(&mut rig.controller, &rig.ledger);
    assert_eq!(rig.ledger.borrow().latest().unwrap().placements.len(), 1);
    assert!(rig.backdrop.current().is_some());
}

#[test]
fn events_follow_navigation() {
    let mut rig = rig(ShowMode::Immediate);
    register_all(&mut rig, &["a", "b", "b1", "b2", "c"]);
    let events = rig.controller.subscribe();
    let only_c = rig.controller.subscribe_step(name("c"));

    rig.controller.start(NS, scenario_graph()).unwrap();
    rig.controller.back(EventSource::Manual);
    rig.controller.next(EventSource::Directive);
    rig.controller.next(EventSource::Overlay);
    rig.controller.close(EventSource::Overlay, CloseKind::Complete);

    let all: Vec<_> = events.try_iter().collect();
    let kinds: Vec<_> = all.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            Some(TourEventKind::Start),
            Some(TourEventKind::Next),
            Some(TourEventKind::Next),
            Some(TourEventKind::Complete),
        ]
    );
    assert_eq!(all[1].source, EventSource::Directive);
    assert_eq!(all[3].step, name("c"));

    let scoped: Vec<_> = only_c.try_iter().collect();
    assert_eq!(scoped.len(), 2);
    assert!(!rig.controller.is_running());
}

#[test]
fn close_removes_window_before_overlay_hides() {
    let mut rig = rig(ShowMode::Deferred);
    register_all(&mut rig, &["a"]);
    let events = rig.controller.subscribe();
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();
    settle(&mut rig.controller, &rig.ledger);
    assert!(rig.controller.current_window().is_some());

    rig.controller.close(EventSource::Manual, CloseKind::Close);
    assert!(rig.controller.current_window().is_none());
    assert!(rig.backdrop.current().is_none());
    assert_eq!(rig.controller.state(), &TourState::Hiding(name("a")));
    assert!(rig.controller.is_running());
    let before: Vec<_> = events.try_iter().map(|e| e.kind).collect();
    assert_eq!(before, [Some(TourEventKind::Start)]);

    settle(&mut rig.controller, &rig.ledger);
    assert_eq!(rig.controller.state(), &TourState::Idle);
    let after: Vec<_> = events.try_iter().map(|e| e.kind).collect();
    assert_eq!(after, [Some(TourEventKind::Close)]);
}

#[test]
fn navigation_during_close_is_ignored() {
    let mut rig = rig(ShowMode::Deferred);
    register_all(&mut rig, &["a", "b"]);
    let events = rig.controller.subscribe();
    rig.controller
        .start(NS, StepGraph::builder().step("a").step("b").build().unwrap())
        .unwrap();
    settle(&mut rig.controller, &rig.ledger);

    rig.controller.close(EventSource::Manual, CloseKind::Close);
    rig.controller.next(EventSource::Manual);
    rig.controller.back(EventSource::Manual);
    assert_eq!(rig.controller.state(), &TourState::Hiding(name("a")));
    settle(&mut rig.controller, &rig.ledger);

    assert_eq!(rig.controller.state(), &TourState::Idle);
    let seen: Vec<_> = events.try_iter().map(|e| (e.kind, e.step)).collect();
    assert_eq!(
        seen,
        [
            (Some(TourEventKind::Start), name("a")),
            (Some(TourEventKind::Close), name("a")),
        ]
    );
    assert_eq!(rig.ledger.borrow().times_shown("tour.b"), 0);
}

#[test]
fn close_while_waiting_for_anchor() {
    let mut rig = rig(ShowMode::Immediate);
    rig.controller
        .start(NS, StepGraph::builder().step("never").build().unwrap())
        .unwrap();
    rig.controller.close(EventSource::Manual, CloseKind::Close);
    assert_eq!(rig.controller.state(), &TourState::Idle);
}

#[test]
fn pause_and_resume() {
    let mut rig = rig(ShowMode::Immediate);
    register_all(&mut rig, &["a", "b"]);
    let events = rig.controller.subscribe();
    rig.controller
        .start(NS, StepGraph::builder().step("a").step("b").build().unwrap())
        .unwrap();

    rig.controller.pause();
    assert_eq!(rig.controller.state(), &TourState::Paused(name("a")));
    assert_eq!(rig.ledger.borrow().visible_count(), 0);
    assert!(rig.controller.is_running());

    rig.controller.resume();
    assert_eq!(rig.controller.state(), &TourState::Showing(name("a")));
    assert_eq!(rig.ledger.borrow().times_shown("tour.a"), 2);
    let last = events.try_iter().last().unwrap();
    assert_eq!(last.kind, None);
}

#[test]
fn next_is_hide_defers_next_step_until_resume() {
    let mut rig = rig(ShowMode::Immediate);
    let a = FakeAnchor::new(Rect::new(100.0, 100.0, 50.0, 20.0));
    let b = FakeAnchor::new(Rect::new(100.0, 300.0, 50.0, 20.0));
    rig.controller
        .register_anchor(name("a"), a.handle(StepConfig::default().next_is_hide(true)));
    rig.controller
        .register_anchor(name("b"), b.handle(StepConfig::default()));
    rig.controller
        .start(NS, StepGraph::builder().step("a").step("b").build().unwrap())
        .unwrap();

    rig.controller.next(EventSource::Manual);
    assert_eq!(rig.controller.state(), &TourState::Paused(name("b")));
    assert_eq!(rig.ledger.borrow().times_shown("tour.b"), 0);

    rig.controller.resume();
    assert_eq!(rig.controller.state(), &TourState::Showing(name("b")));
    assert_eq!(rig.ledger.borrow().times_shown("tour.b"), 1);
}

#[test]
fn disabled_buttons_block_overlay_navigation_only() {
    let mut rig = rig(ShowMode::Immediate);
    let a = FakeAnchor::new(Rect::new(100.0, 100.0, 50.0, 20.0));
    let b = FakeAnchor::new(Rect::new(100.0, 300.0, 50.0, 20.0));
    rig.controller.register_anchor(
        name("a"),
        a.handle(StepConfig::default().next_is_disabled(true)),
    );
    rig.controller
        .register_anchor(name("b"), b.handle(StepConfig::default()));
    rig.controller
        .start(NS, StepGraph::builder().step("a").step("b").build().unwrap())
        .unwrap();

    rig.controller.next(EventSource::Overlay);
    assert_eq!(active(&rig), "tour.a");
    rig.controller.next(EventSource::Manual);
    assert_eq!(active(&rig), "tour.b");

    let controls = rig.ledger.borrow().records()[0].controls.unwrap();
    assert!(controls.next_disabled);
    assert!(controls.is_first);
    assert!(!controls.is_last);
}

#[test]
fn unregistering_shown_anchor_waits_again() {
    let mut rig = rig(ShowMode::Immediate);
    register_all(&mut rig, &["a"]);
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();

    assert!(rig.controller.unregister_anchor(&name("a")).is_some());
    assert_eq!(rig.controller.state(), &TourState::AwaitingAnchor(name("a")));
    assert_eq!(rig.ledger.borrow().visible_count(), 0);

    let again = FakeAnchor::new(Rect::new(10.0, 10.0, 50.0, 20.0));
    rig.controller
        .register_anchor(name("a"), again.handle(StepConfig::default()));
    assert_eq!(rig.controller.state(), &TourState::Showing(name("a")));
    assert_eq!(rig.ledger.borrow().times_shown("tour.a"), 2);
}

#[test]
fn placement_uses_step_config() {
    let mut rig = rig(ShowMode::Immediate);
    // Near the bottom: below cannot fit, so the flip is chosen.
    let anchor = FakeAnchor::new(Rect::new(300.0, 540.0, 100.0, 30.0));
    let config = StepConfig::default()
        .placement(OverlayPosition::Below)
        .content(StepContent::new("Save your work").title("Save"));
    rig.controller
        .register_anchor(name("save"), anchor.handle(config));
    rig.controller
        .start(NS, StepGraph::builder().step("save").build().unwrap())
        .unwrap();

    let placement = *rig.controller.last_placement().unwrap();
    assert_eq!(placement.index, 1);
    assert_eq!(placement.tier, PlacementTier::Fit);
    let ledger = rig.ledger.borrow();
    let record = ledger.latest().unwrap();
    assert_eq!(record.nubbins.last(), Some(&Some(NubbinSide::Bottom)));
    assert_eq!(
        record.content.as_ref().unwrap().title.as_deref(),
        Some("Save")
    );
    assert_eq!(record.candidates.len(), 4);
}

#[test]
fn placement_rescans_once_overlay_is_painted() {
    // Measures 0x0 until the first paint, 120x100 after.
    let factory = FakeOverlayFactory::new(ShowMode::Deferred)
        .with_size(Size::new(120.0, 100.0))
        .with_unpainted_size(Size::new(0.0, 0.0));
    let mut rig = rig_from(factory, TourOptions::default().viewport(viewport()));
    let anchor = FakeAnchor::new(Rect::new(300.0, 470.0, 100.0, 30.0));
    let config = StepConfig::default().placement(OverlayPosition::Below);
    rig.controller
        .register_anchor(name("save"), anchor.handle(config));
    rig.controller
        .start(NS, StepGraph::builder().step("save").build().unwrap())
        .unwrap();
    assert_eq!(rig.controller.last_placement().unwrap().index, 0);

    settle(&mut rig.controller, &rig.ledger);
    let painted = *rig.controller.last_placement().unwrap();
    assert_eq!(painted.index, 1);
    assert_eq!(painted.tier, PlacementTier::Fit);
    assert!(!painted.reused);
    assert!(painted.fit.is_completely_within_viewport);

    anchor.set_rect(Rect::new(300.0, 460.0, 100.0, 30.0));
    rig.controller.anchor_moved(&name("save"));
    let moved = *rig.controller.last_placement().unwrap();
    assert!(moved.reused);
    assert_eq!(moved.index, 1);
    assert_eq!(moved.tier, PlacementTier::Fit);
}

#[test]
fn window_tracks_anchor_and_viewport() {
    let mut rig = rig(ShowMode::Immediate);
    let anchors = register_all(&mut rig, &["a"]);
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();
    let first = rig.backdrop.current().unwrap();
    assert_eq!(first.hole, Some(Rect::new(96.0, 56.0, 128.0, 38.0)));

    anchors[0].set_rect(Rect::new(200.0, 200.0, 120.0, 30.0));
    rig.controller.anchor_moved(&name("a"));
    let moved = rig.backdrop.current().unwrap();
    assert_eq!(moved.hole, Some(Rect::new(196.0, 196.0, 128.0, 38.0)));

    let scrolled = Rect::viewport(Size::new(800.0, 600.0), ScrollOffset::new(0.0, 150.0));
    rig.controller.set_viewport(scrolled);
    assert_eq!(rig.backdrop.current().unwrap().outer, scrolled);
    assert!(!rig.controller.last_placement().unwrap().reused);
}

#[test]
fn restart_replaces_running_tour() {
    let mut rig = rig(ShowMode::Deferred);
    register_all(&mut rig, &["a"]);
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();
    settle(&mut rig.controller, &rig.ledger);

    let other = FakeAnchor::new(Rect::new(10.0, 10.0, 40.0, 20.0));
    rig.controller
        .register_anchor(StepName::namespaced("second", "z"), other.handle(StepConfig::default()));
    rig.controller
        .start("second", StepGraph::builder().step("z").build().unwrap())
        .unwrap();
    assert_eq!(rig.controller.state(), &TourState::Starting);

    settle(&mut rig.controller, &rig.ledger);
    assert_eq!(
        rig.controller.state(),
        &TourState::Showing(StepName::namespaced("second", "z"))
    );
    assert_eq!(rig.ledger.borrow().max_visible(), 1);
}

#[test]
fn last_wins_policy_reanchors_shown_step() {
    let options = TourOptions::default()
        .viewport(viewport())
        .registration_policy(RegistrationPolicy::LastWins);
    let mut rig = rig_with(ShowMode::Immediate, options);
    let first = FakeAnchor::new(Rect::new(10.0, 10.0, 40.0, 20.0));
    rig.controller
        .register_anchor(name("a"), first.handle(StepConfig::default()));
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();

    let second = FakeAnchor::new(Rect::new(300.0, 300.0, 40.0, 20.0));
    let outcome = rig
        .controller
        .register_anchor(name("a"), second.handle(StepConfig::default()));
    assert_eq!(outcome, Registration::Replaced);
    assert!(!first.is_active());
    assert!(second.is_active());
    assert_eq!(
        rig.backdrop.current().unwrap().hole,
        Some(Rect::new(296.0, 296.0, 48.0, 28.0))
    );
}

#[test]
fn hidden_steps_are_skipped_at_runtime() {
    let mut rig = rig(ShowMode::Immediate);
    register_all(&mut rig, &["a", "b", "c"]);
    rig.controller
        .start(NS, StepGraph::builder().step("a").step("b").step("c").build().unwrap())
        .unwrap();
    assert!(rig.controller.set_step_hidden("tour.b", true));
    assert!(!rig.controller.set_step_hidden("tour.nope", true));
    rig.controller.next(EventSource::Manual);
    assert_eq!(active(&rig), "tour.c");
}

#[test]
fn before_activate_hook_runs_once_per_show() {
    let mut rig = rig(ShowMode::Immediate);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let anchor = FakeAnchor::new(Rect::new(10.0, 10.0, 40.0, 20.0));
    let config = StepConfig::default().before_activate(move |step| {
        sink.borrow_mut().push(step.to_string());
    });
    rig.controller.register_anchor(name("a"), anchor.handle(config));
    rig.controller
        .start(NS, StepGraph::builder().step("a").build().unwrap())
        .unwrap();
    assert_eq!(*seen.borrow(), ["tour.a"]);
}

#[test]
fn opted_out_anchor_is_not_registered() {
    let mut rig = rig(ShowMode::Immediate);
    let anchor = FakeAnchor::new(Rect::new(10.0, 10.0, 40.0, 20.0));
    let outcome = rig.controller.register_anchor(
        name("a"),
        anchor.handle(StepConfig::default().should_register(false)),
    );
    assert_eq!(outcome, Registration::Ignored);
    assert!(rig.controller.registry().is_empty());
}
