#![forbid(unsafe_code)]

//! Step and tour configuration.
//!
//! Every field has a documented default; hosts override only what they need
//! through the builder setters.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use waymark_core::geometry::Rect;
use waymark_core::registry::RegistrationPolicy;
use waymark_core::step::StepName;
use waymark_layout::{
    ConnectionPositions, LayoutError, LayoutOptions, NubbinPosition, OverlayPosition,
};

/// Hook invoked with the step name right before its overlay is attached.
pub type BeforeActivate = Rc<dyn Fn(&StepName)>;

/// Text shown in a step's overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepContent {
    pub title: Option<String>,
    pub text: String,
}

impl StepContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: None,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Button state handed to the overlay alongside its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepControls {
    pub back_disabled: bool,
    pub next_disabled: bool,
    /// No visible step precedes this one.
    pub is_first: bool,
    /// No visible step follows this one.
    pub is_last: bool,
}

/// Where a step's overlay goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// A named position, expanded into its ranked candidates.
    Named(OverlayPosition),
    /// An explicit candidate list.
    Custom(ConnectionPositions),
}

impl Default for Placement {
    fn default() -> Self {
        Self::Named(OverlayPosition::Below)
    }
}

impl Placement {
    /// The ranked candidates handed to the layout engine.
    pub fn candidates(&self) -> ConnectionPositions {
        match self {
            Self::Named(name) => name.candidates(),
            Self::Custom(positions) => positions.clone(),
        }
    }
}

impl FromStr for Placement {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::Named)
    }
}

impl From<OverlayPosition> for Placement {
    fn from(value: OverlayPosition) -> Self {
        Self::Named(value)
    }
}

impl From<ConnectionPositions> for Placement {
    fn from(value: ConnectionPositions) -> Self {
        Self::Custom(value)
    }
}

/// Per-step configuration carried by the anchor handle.
///
/// | field | default |
/// |---|---|
/// | `placement` | `Named(Below)` |
/// | `nubbin` | `Auto` |
/// | `content` | empty |
/// | `should_register` | `true` |
/// | `next_is_hide` | `false` |
/// | `back_is_disabled` | `false` |
/// | `next_is_disabled` | `false` |
/// | `before_activate` | none |
#[derive(Clone)]
pub struct StepConfig {
    pub placement: Placement,
    pub nubbin: NubbinPosition,
    pub content: StepContent,
    /// When `false` the anchor never enters the registry.
    pub should_register: bool,
    /// `next` hides the overlay and pauses instead of showing the next step.
    pub next_is_hide: bool,
    pub back_is_disabled: bool,
    pub next_is_disabled: bool,
    pub before_activate: Option<BeforeActivate>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            nubbin: NubbinPosition::Auto,
            content: StepContent::default(),
            should_register: true,
            next_is_hide: false,
            back_is_disabled: false,
            next_is_disabled: false,
            before_activate: None,
        }
    }
}

impl fmt::Debug for StepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepConfig")
            .field("placement", &self.placement)
            .field("nubbin", &self.nubbin)
            .field("content", &self.content)
            .field("should_register", &self.should_register)
            .field("next_is_hide", &self.next_is_hide)
            .field("back_is_disabled", &self.back_is_disabled)
            .field("next_is_disabled", &self.next_is_disabled)
            .field("before_activate", &self.before_activate.is_some())
            .finish()
    }
}

impl StepConfig {
    #[must_use]
    pub fn placement(mut self, placement: impl Into<Placement>) -> Self {
        self.placement = placement.into();
        self
    }

    /// Set the placement from a named position such as `"above-start"`.
    pub fn position(self, name: &str) -> crate::Result<Self> {
        let placement: Placement = name.parse()?;
        Ok(self.placement(placement))
    }

    #[must_use]
    pub fn nubbin(mut self, nubbin: NubbinPosition) -> Self {
        self.nubbin = nubbin;
        self
    }

    #[must_use]
    pub fn content(mut self, content: StepContent) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn should_register(mut self, register: bool) -> Self {
        self.should_register = register;
        self
    }

    #[must_use]
    pub fn next_is_hide(mut self, hide: bool) -> Self {
        self.next_is_hide = hide;
        self
    }

    #[must_use]
    pub fn back_is_disabled(mut self, disabled: bool) -> Self {
        self.back_is_disabled = disabled;
        self
    }

    #[must_use]
    pub fn next_is_disabled(mut self, disabled: bool) -> Self {
        self.next_is_disabled = disabled;
        self
    }

    #[must_use]
    pub fn before_activate(mut self, hook: impl Fn(&StepName) + 'static) -> Self {
        self.before_activate = Some(Rc::new(hook));
        self
    }
}

/// Tour-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourOptions {
    /// Delay passed to `Overlay::show`.
    pub show_delay: Duration,
    /// Delay passed to `Overlay::hide`.
    pub hide_delay: Duration,
    /// How far the window cut-out extends past the anchor.
    pub window_buffer: f64,
    pub registration_policy: RegistrationPolicy,
    pub layout: LayoutOptions,
    /// Visible viewport in document coordinates.
    pub viewport: Rect,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            show_delay: Duration::ZERO,
            hide_delay: Duration::ZERO,
            window_buffer: 4.0,
            registration_policy: RegistrationPolicy::FirstWins,
            layout: LayoutOptions::default().viewport_margin(8.0).can_push(true),
            viewport: Rect::default(),
        }
    }
}

impl TourOptions {
    #[must_use]
    pub fn show_delay(mut self, delay: Duration) -> Self {
        self.show_delay = delay;
        self
    }

    #[must_use]
    pub fn hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    #[must_use]
    pub fn window_buffer(mut self, buffer: f64) -> Self {
        self.window_buffer = buffer;
        self
    }

    #[must_use]
    pub fn registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration_policy = policy;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }
}
