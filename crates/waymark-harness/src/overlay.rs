#![forbid(unsafe_code)]

//! Fake overlays and the ledger they report into.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use waymark_core::geometry::{Rect, Size};
use waymark_core::step::StepName;
use waymark_layout::{AppliedPosition, ConnectionPosition, NubbinSide};
use waymark_runtime::{AnchorHandle, Overlay, OverlayFactory, StepContent, StepControls};

/// How fake overlays complete show/hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    /// `show`/`hide` take effect before they return.
    #[default]
    Immediate,
    /// `show`/`hide` stay pending until [`OverlayLedger::settle`].
    Deferred,
}

/// A transition waiting to be settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Show,
    Hide,
}

/// Everything one overlay went through.
#[derive(Debug, Clone)]
pub struct OverlayRecord {
    pub step: StepName,
    pub attached: bool,
    pub visible: bool,
    pub pending: Option<Pending>,
    pub show_calls: usize,
    pub hide_calls: usize,
    /// Transitions from hidden to visible.
    pub times_visible: usize,
    pub content: Option<StepContent>,
    pub controls: Option<StepControls>,
    pub candidates: Vec<ConnectionPosition>,
    pub placements: Vec<AppliedPosition>,
    pub nubbins: Vec<Option<NubbinSide>>,
    pub styling_cleared: bool,
}

impl OverlayRecord {
    fn new(step: StepName) -> Self {
        Self {
            step,
            attached: true,
            visible: false,
            pending: None,
            show_calls: 0,
            hide_calls: 0,
            times_visible: 0,
            content: None,
            controls: None,
            candidates: Vec::new(),
            placements: Vec::new(),
            nubbins: Vec::new(),
            styling_cleared: false,
        }
    }
}

/// Transitions completed by one [`OverlayLedger::settle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settled {
    pub shown: usize,
    pub hidden: usize,
}

impl Settled {
    pub fn is_empty(&self) -> bool {
        self.shown == 0 && self.hidden == 0
    }
}

/// Shared record of every overlay a factory created.
#[derive(Debug, Default)]
pub struct OverlayLedger {
    records: Vec<OverlayRecord>,
    max_visible: usize,
    max_attached: usize,
}

pub type SharedLedger = Rc<RefCell<OverlayLedger>>;

impl OverlayLedger {
    pub fn records(&self) -> &[OverlayRecord] {
        &self.records
    }

    /// The most recently attached overlay.
    pub fn latest(&self) -> Option<&OverlayRecord> {
        self.records.last()
    }

    pub fn visible_count(&self) -> usize {
        self.records.iter().filter(|r| r.visible).count()
    }

    pub fn attached_count(&self) -> usize {
        self.records.iter().filter(|r| r.attached).count()
    }

    /// Highest number of overlays ever visible at once.
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Highest number of overlays ever attached at once.
    pub fn max_attached(&self) -> usize {
        self.max_attached
    }

    /// How many times an overlay for `step` became visible.
    pub fn times_shown(&self, step: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.step.as_str() == step)
            .map(|r| r.times_visible)
            .sum()
    }

    pub fn has_pending(&self) -> bool {
        self.records.iter().any(|r| r.pending.is_some())
    }

    /// Complete every pending transition.
    pub fn settle(&mut self) -> Settled {
        let mut settled = Settled::default();
        for id in 0..self.records.len() {
            match self.records[id].pending.take() {
                Some(Pending::Show) => {
                    self.set_visible(id, true);
                    settled.shown += 1;
                }
                Some(Pending::Hide) => {
                    self.set_visible(id, false);
                    settled.hidden += 1;
                }
                None => {}
            }
        }
        if !settled.is_empty() {
            tracing::trace!(shown = settled.shown, hidden = settled.hidden, "ledger settled");
        }
        settled
    }

    fn attach(&mut self, step: StepName) -> usize {
        self.records.push(OverlayRecord::new(step));
        self.max_attached = self.max_attached.max(self.attached_count());
        self.records.len() - 1
    }

    fn set_visible(&mut self, id: usize, visible: bool) {
        let record = &mut self.records[id];
        if visible && !record.visible {
            record.times_visible += 1;
        }
        record.visible = visible;
        self.max_visible = self.max_visible.max(self.visible_count());
    }
}

/// Overlay that records into an [`OverlayLedger`].
#[derive(Debug)]
pub struct FakeOverlay {
    id: usize,
    ledger: SharedLedger,
    mode: ShowMode,
    size: Size,
    unpainted: Option<Size>,
}

impl FakeOverlay {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Overlay for FakeOverlay {
    fn show(&mut self, _delay: Duration) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.records[self.id].show_calls += 1;
        match self.mode {
            ShowMode::Immediate => ledger.set_visible(self.id, true),
            ShowMode::Deferred => ledger.records[self.id].pending = Some(Pending::Show),
        }
    }

    fn hide(&mut self, _delay: Duration) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.records[self.id].hide_calls += 1;
        let visible = ledger.records[self.id].visible;
        match self.mode {
            ShowMode::Immediate => {
                ledger.records[self.id].pending = None;
                ledger.set_visible(self.id, false);
            }
            ShowMode::Deferred if visible => {
                ledger.records[self.id].pending = Some(Pending::Hide);
            }
            // Never became visible: cancelling the show is instant.
            ShowMode::Deferred => ledger.records[self.id].pending = None,
        }
    }

    fn is_visible(&self) -> bool {
        self.ledger.borrow().records[self.id].visible
    }

    fn set_content(&mut self, content: &StepContent, controls: StepControls) {
        let mut ledger = self.ledger.borrow_mut();
        let record = &mut ledger.records[self.id];
        record.content = Some(content.clone());
        record.controls = Some(controls);
    }

    fn set_position(&mut self, candidates: &[ConnectionPosition]) {
        self.ledger.borrow_mut().records[self.id].candidates = candidates.to_vec();
    }

    fn measure_current_rect(&self) -> Rect {
        let size = match self.unpainted {
            Some(size) if !self.is_visible() => size,
            _ => self.size,
        };
        Rect::from_size(size.width, size.height)
    }

    fn apply_placement(&mut self, placement: &AppliedPosition, nubbin: Option<NubbinSide>) {
        let mut ledger = self.ledger.borrow_mut();
        let record = &mut ledger.records[self.id];
        record.placements.push(*placement);
        record.nubbins.push(nubbin);
    }

    fn clear_host_styling(&mut self) {
        self.ledger.borrow_mut().records[self.id].styling_cleared = true;
    }
}

/// Factory producing [`FakeOverlay`]s that share one ledger.
#[derive(Debug)]
pub struct FakeOverlayFactory {
    ledger: SharedLedger,
    mode: ShowMode,
    size: Size,
    unpainted: Option<Size>,
}

impl FakeOverlayFactory {
    pub fn new(mode: ShowMode) -> Self {
        Self {
            ledger: SharedLedger::default(),
            mode,
            size: Size::new(120.0, 60.0),
            unpainted: None,
        }
    }

    /// Size every new overlay reports from `measure_current_rect`.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Size reported while an overlay is not yet visible, as a host would
    /// before its first paint.
    #[must_use]
    pub fn with_unpainted_size(mut self, size: Size) -> Self {
        self.unpainted = Some(size);
        self
    }

    pub fn ledger(&self) -> SharedLedger {
        Rc::clone(&self.ledger)
    }

    pub fn set_mode(&mut self, mode: ShowMode) {
        self.mode = mode;
    }
}

impl OverlayFactory for FakeOverlayFactory {
    type Overlay = FakeOverlay;

    fn attach(&mut self, step: &StepName, _anchor: &AnchorHandle) -> FakeOverlay {
        let id = self.ledger.borrow_mut().attach(step.clone());
        FakeOverlay {
            id,
            ledger: Rc::clone(&self.ledger),
            mode: self.mode,
            size: self.size,
            unpainted: self.unpainted,
        }
    }

    fn detach(&mut self, overlay: FakeOverlay) {
        let mut ledger = self.ledger.borrow_mut();
        let record = &mut ledger.records[overlay.id];
        record.attached = false;
        record.visible = false;
        record.pending = None;
    }
}
