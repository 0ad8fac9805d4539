#![forbid(unsafe_code)]

//! Lifecycle events and their fan-out.
//!
//! Every user-visible navigation action produces one [`TourEvent`]. The
//! [`EventBus`] hands a copy to each subscriber over an `mpsc` channel;
//! step-scoped subscribers only receive events for their own step. A
//! subscriber whose receiver was dropped is pruned on the next emit.

use std::sync::mpsc;

use waymark_core::step::StepName;
use web_time::Instant;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourEventKind {
    Start,
    Next,
    Back,
    Close,
    Complete,
}

/// How a tour ends: a plain close or a completed walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseKind {
    Close,
    Complete,
}

impl From<CloseKind> for TourEventKind {
    fn from(value: CloseKind) -> Self {
        match value {
            CloseKind::Close => Self::Close,
            CloseKind::Complete => Self::Complete,
        }
    }
}

/// Who asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventSource {
    /// A declarative trigger in the host markup.
    Directive,
    /// A button on the overlay itself.
    Overlay,
    /// A direct API call.
    #[default]
    Manual,
}

/// One lifecycle event.
#[derive(Debug, Clone)]
pub struct TourEvent {
    /// `None` for events with no navigation meaning (resuming a paused tour).
    pub kind: Option<TourEventKind>,
    pub step: StepName,
    pub source: EventSource,
    pub at: Instant,
}

impl TourEvent {
    pub fn new(kind: Option<TourEventKind>, step: StepName, source: EventSource) -> Self {
        Self {
            kind,
            step,
            source,
            at: Instant::now(),
        }
    }
}

struct Subscriber {
    step: Option<StepName>,
    sender: mpsc::Sender<TourEvent>,
}

impl Subscriber {
    fn wants(&self, event: &TourEvent) -> bool {
        self.step.as_ref().is_none_or(|step| *step == event.step)
    }
}

/// Fan-out of lifecycle events to channel subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    pub fn subscribe(&mut self) -> mpsc::Receiver<TourEvent> {
        self.add(None)
    }

    /// Receive only events whose step is `step`.
    pub fn subscribe_step(&mut self, step: StepName) -> mpsc::Receiver<TourEvent> {
        self.add(Some(step))
    }

    fn add(&mut self, step: Option<StepName>) -> mpsc::Receiver<TourEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(Subscriber { step, sender });
        receiver
    }

    /// Deliver `event` to every interested subscriber.
    pub fn emit(&mut self, event: TourEvent) {
        tracing::debug!(
            kind = ?event.kind,
            step = %event.step,
            source = ?event.source,
            "tour event"
        );
        self.subscribers.retain(|subscriber| {
            if !subscriber.wants(&event) {
                return true;
            }
            subscriber.sender.send(event.clone()).is_ok()
        });
    }

    /// Live subscribers (as of the last emit).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
