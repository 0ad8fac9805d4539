#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use waymark_runtime::{Backdrop, WindowCutout};

#[derive(Debug, Clone, PartialEq)]
pub enum BackdropCall {
    Set(WindowCutout),
    Clear,
}

/// Backdrop that records every call.
#[derive(Debug)]
pub struct FakeBackdrop {
    calls: Rc<RefCell<Vec<BackdropCall>>>,
}

impl FakeBackdrop {
    /// A backdrop plus the log it writes to.
    pub fn new() -> (Self, BackdropLog) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            BackdropLog(calls),
        )
    }

    /// Boxed, ready for `TourController::with_backdrop`.
    pub fn boxed() -> (Box<dyn Backdrop>, BackdropLog) {
        let (backdrop, log) = Self::new();
        (Box::new(backdrop), log)
    }
}

impl Backdrop for FakeBackdrop {
    fn set_window(&mut self, window: &WindowCutout) {
        self.calls.borrow_mut().push(BackdropCall::Set(*window));
    }

    fn clear_window(&mut self) {
        self.calls.borrow_mut().push(BackdropCall::Clear);
    }
}

/// Read side of a [`FakeBackdrop`].
#[derive(Debug, Clone)]
pub struct BackdropLog(Rc<RefCell<Vec<BackdropCall>>>);

impl BackdropLog {
    pub fn calls(&self) -> Vec<BackdropCall> {
        self.0.borrow().clone()
    }

    /// The window currently drawn, replaying the log.
    pub fn current(&self) -> Option<WindowCutout> {
        self.0
            .borrow()
            .iter()
            .fold(None, |_, call| match call {
                BackdropCall::Set(window) => Some(*window),
                BackdropCall::Clear => None,
            })
    }

    pub fn set_count(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|call| matches!(call, BackdropCall::Set(_)))
            .count()
    }
}
