#![forbid(unsafe_code)]

//! Host anchor contract.

use std::fmt;
use std::rc::Rc;

use waymark_core::geometry::Rect;

use crate::config::StepConfig;

/// A host element an overlay can attach to.
///
/// Methods take `&self`; hosts keep interior state in `Cell`/`RefCell`.
pub trait AnchorElement {
    /// Current rectangle in document coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Toggle the host's "active step" styling.
    fn set_active(&self, active: bool);
}

/// What the host registers for a step: the element plus the step's config.
#[derive(Clone)]
pub struct AnchorHandle {
    pub element: Rc<dyn AnchorElement>,
    pub config: StepConfig,
}

impl AnchorHandle {
    pub fn new(element: Rc<dyn AnchorElement>, config: StepConfig) -> Self {
        Self { element, config }
    }

    /// Handle with the default step config.
    pub fn with_defaults(element: Rc<dyn AnchorElement>) -> Self {
        Self::new(element, StepConfig::default())
    }
}

impl fmt::Debug for AnchorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorHandle")
            .field("rect", &self.element.bounding_rect())
            .field("config", &self.config)
            .finish()
    }
}
