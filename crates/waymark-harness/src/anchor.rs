#![forbid(unsafe_code)]

use std::cell::Cell;
use std::rc::Rc;

use waymark_core::geometry::Rect;
use waymark_runtime::{AnchorElement, AnchorHandle, StepConfig};

/// Anchor element with a movable rectangle.
#[derive(Debug)]
pub struct FakeAnchor {
    rect: Cell<Rect>,
    active: Cell<bool>,
    activations: Cell<usize>,
}

impl FakeAnchor {
    pub fn new(rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            rect: Cell::new(rect),
            active: Cell::new(false),
            activations: Cell::new(0),
        })
    }

    /// Build a handle that shares this element.
    pub fn handle(self: &Rc<Self>, config: StepConfig) -> AnchorHandle {
        AnchorHandle::new(Rc::clone(self) as Rc<dyn AnchorElement>, config)
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// How many times the element was switched to active.
    pub fn activations(&self) -> usize {
        self.activations.get()
    }
}

impl AnchorElement for FakeAnchor {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }

    fn set_active(&self, active: bool) {
        if active && !self.active.get() {
            self.activations.set(self.activations.get() + 1);
        }
        self.active.set(active);
    }
}
