#![forbid(unsafe_code)]

//! Connected-position strategy for anchored overlays.
//!
//! [`ConnectedPositionStrategy`] places an overlay next to an anchor rectangle
//! using a ranked list of [`ConnectionPosition`] candidates. Each layout pass
//! walks the candidates in order and settles on the first tier that succeeds:
//!
//! 1. **Fit**: the first candidate whose overlay lies completely inside the
//!    container is applied immediately.
//! 2. **Flexible**: with flexible dimensions enabled, candidates that satisfy
//!    the minimum width/height inside the space the overlay opens into are
//!    collected; the one with the largest `bounding box area * weight` wins.
//! 3. **Pushed**: with pushing enabled, the candidate with the largest visible
//!    area is translated back inside the container.
//! 4. **Fallback**: otherwise that same candidate is applied as is.
//!
//! Ties always go to the earlier candidate.
//!
//! # Invariants
//!
//! - `apply` always returns a placement; geometry alone never fails it.
//! - The container is shrunk by `viewport_margin` on every side before any
//!   fit test.
//! - Centered axes are written as `left`/`top` offsets, never mirrored.
//!
//! # Locking
//!
//! While locked, `apply` reuses the last applied candidate instead of
//! scanning, so small re-layouts (scrolling, content growth) don't make the
//! overlay jump between sides. [`notify_viewport_resized`] grants exactly one
//! fresh scan under the lock.
//!
//! [`notify_viewport_resized`]: ConnectedPositionStrategy::notify_viewport_resized

use waymark_core::geometry::{Point, Rect, Sides, Size};

use crate::connection::{
    ConnectionPosition, ConnectionPositions, Direction, HorizontalConnection, VerticalConnection,
};

/// Tunables for the strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Gap kept between the overlay and every container edge.
    pub viewport_margin: f64,
    /// Allow the overlay to shrink into the space it opens toward.
    pub flexible_dimensions: bool,
    /// Allow translating the best fallback back on-screen.
    pub can_push: bool,
    /// Minimum width accepted for a flexible fit.
    pub min_width: Option<f64>,
    /// Minimum height accepted for a flexible fit.
    pub min_height: Option<f64>,
    /// Writing direction for start/end mirroring.
    pub direction: Direction,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_margin: 0.0,
            flexible_dimensions: false,
            can_push: false,
            min_width: None,
            min_height: None,
            direction: Direction::Ltr,
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn viewport_margin(mut self, margin: f64) -> Self {
        self.viewport_margin = margin;
        self
    }

    #[must_use]
    pub fn flexible_dimensions(mut self, enabled: bool) -> Self {
        self.flexible_dimensions = enabled;
        self
    }

    #[must_use]
    pub fn can_push(mut self, enabled: bool) -> Self {
        self.can_push = enabled;
        self
    }

    #[must_use]
    pub fn min_width(mut self, width: f64) -> Self {
        self.min_width = Some(width);
        self
    }

    #[must_use]
    pub fn min_height(mut self, height: f64) -> Self {
        self.min_height = Some(height);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Margin actually applied: negative or non-finite values count as zero.
    #[inline]
    pub fn effective_margin(&self) -> f64 {
        if self.viewport_margin.is_finite() {
            self.viewport_margin.max(0.0)
        } else {
            0.0
        }
    }
}

/// Geometry for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    /// The anchor element's rectangle.
    pub anchor: Rect,
    /// The overlay's measured size.
    pub overlay: Size,
    /// The clipping container, usually the viewport in document coordinates.
    pub container: Rect,
}

impl LayoutInput {
    pub const fn new(anchor: Rect, overlay: Size, container: Rect) -> Self {
        Self {
            anchor,
            overlay,
            container,
        }
    }
}

/// How much of a candidate-placed overlay stays inside the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFit {
    pub visible_area: f64,
    pub is_completely_within_viewport: bool,
    pub fits_vertically: bool,
    pub fits_horizontally: bool,
}

/// Which selection tier produced the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementTier {
    Fit,
    Flexible,
    Pushed,
    Fallback,
}

/// Inline geometry that realizes a placement.
///
/// Offsets are measured from the matching container edge: `left` from the
/// container's left edge, `right` from its right edge, and so on. Exactly one
/// of `left`/`right` and one of `top`/`bottom` is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayStyle {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

/// The outcome of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedPosition {
    /// Index of the chosen candidate.
    pub index: usize,
    pub position: ConnectionPosition,
    /// Connection point on the anchor.
    pub origin: Point,
    /// Final overlay rectangle.
    pub overlay_rect: Rect,
    /// Space the overlay may grow into (flexible tier only).
    pub bounding_box: Option<Rect>,
    /// Fit of `overlay_rect` itself, after any push or clamp.
    pub fit: OverlayFit,
    pub tier: PlacementTier,
    /// Produced from the locked position without scanning.
    pub reused: bool,
    /// The chosen candidate differs from the previous pass.
    pub position_changed: bool,
    pub style: OverlayStyle,
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    index: usize,
    position: ConnectionPosition,
    origin: Point,
    point: Point,
    fit: OverlayFit,
    bounding_box: Option<Rect>,
}

/// Stateful placement engine for one overlay.
#[derive(Debug, Clone)]
pub struct ConnectedPositionStrategy {
    positions: ConnectionPositions,
    options: LayoutOptions,
    locked: bool,
    rescan_once: bool,
    last: Option<AppliedPosition>,
}

impl ConnectedPositionStrategy {
    /// Create a strategy over a validated candidate list.
    pub fn new(positions: ConnectionPositions, options: LayoutOptions) -> Self {
        Self {
            positions,
            options,
            locked: false,
            rescan_once: false,
            last: None,
        }
    }

    #[inline]
    pub fn positions(&self) -> &ConnectionPositions {
        &self.positions
    }

    #[inline]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replace the candidate list. The last applied position is forgotten.
    pub fn with_positions(&mut self, positions: ConnectionPositions) {
        self.positions = positions;
        self.last = None;
    }

    /// Replace the options. The last applied position is kept.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock the last applied candidate.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Allow one full scan on the next `apply`, even while locked.
    pub fn notify_viewport_resized(&mut self) {
        self.rescan_once = true;
    }

    /// The most recent placement.
    #[inline]
    pub fn last_position(&self) -> Option<&AppliedPosition> {
        self.last.as_ref()
    }

    /// Forget the last placement.
    pub fn reset(&mut self) {
        self.last = None;
        self.rescan_once = false;
    }

    /// Run a layout pass.
    pub fn apply(&mut self, input: &LayoutInput) -> AppliedPosition {
        if self.locked
            && !self.rescan_once
            && let Some(last) = self.last
        {
            return self.reapply(last.index, last.tier, input);
        }
        self.rescan_once = false;

        let container = input.container.inner(Sides::all(self.options.effective_margin()));
        let mut evaluations: Vec<Evaluation> = Vec::with_capacity(self.positions.len());
        let mut best_flexible: Option<(f64, Evaluation)> = None;

        for (index, position) in self.positions.iter().enumerate() {
            let mut evaluation = self.evaluate(index, position, input, &container);
            tracing::trace!(
                index,
                visible_area = evaluation.fit.visible_area,
                fits_vertically = evaluation.fit.fits_vertically,
                fits_horizontally = evaluation.fit.fits_horizontally,
                "candidate evaluated"
            );

            if evaluation.fit.is_completely_within_viewport {
                return self.commit(&evaluation, PlacementTier::Fit, input, false);
            }

            if let Some(bounding_box) = self.flexible_box(&evaluation, &container) {
                evaluation.bounding_box = Some(bounding_box);
                let score = bounding_box.area() * position.weight;
                if best_flexible.is_none_or(|(best, _)| score > best) {
                    best_flexible = Some((score, evaluation));
                }
                continue;
            }

            evaluations.push(evaluation);
        }

        if let Some((_, evaluation)) = best_flexible {
            return self.commit(&evaluation, PlacementTier::Flexible, input, false);
        }

        // Every candidate landed here, and the list is never empty.
        let mut fallback = evaluations[0];
        for evaluation in &evaluations[1..] {
            if evaluation.fit.visible_area > fallback.fit.visible_area {
                fallback = *evaluation;
            }
        }

        let tier = if self.options.can_push {
            PlacementTier::Pushed
        } else {
            PlacementTier::Fallback
        };
        self.commit(&fallback, tier, input, false)
    }

    /// Re-apply the last candidate without scanning.
    ///
    /// Returns `None` if nothing has been applied yet.
    pub fn reapply_last_position(&mut self, input: &LayoutInput) -> Option<AppliedPosition> {
        let last = self.last?;
        Some(self.reapply(last.index, last.tier, input))
    }

    fn reapply(&mut self, index: usize, tier: PlacementTier, input: &LayoutInput) -> AppliedPosition {
        let container = input.container.inner(Sides::all(self.options.effective_margin()));
        let index = index.min(self.positions.len() - 1);
        let position = self.positions.as_slice()[index];
        let mut evaluation = self.evaluate(index, &position, input, &container);
        if tier == PlacementTier::Flexible {
            evaluation.bounding_box = Some(bounding_box(
                evaluation.origin,
                &position,
                &container,
                self.options.direction,
            ));
        }
        // The locked candidate keeps its slot but not a stale tier.
        let tier = match tier {
            PlacementTier::Flexible => PlacementTier::Flexible,
            _ if evaluation.fit.is_completely_within_viewport => PlacementTier::Fit,
            _ if self.options.can_push => PlacementTier::Pushed,
            _ => PlacementTier::Fallback,
        };
        self.commit(&evaluation, tier, input, true)
    }

    fn evaluate(
        &self,
        index: usize,
        position: &ConnectionPosition,
        input: &LayoutInput,
        container: &Rect,
    ) -> Evaluation {
        let direction = self.options.direction;
        let origin = origin_point(&input.anchor, position, direction);
        let point = overlay_point(origin, input.overlay, position, direction)
            .offset(position.offset_x, position.offset_y);
        let fit = overlay_fit(point, input.overlay, container);
        Evaluation {
            index,
            position: *position,
            origin,
            point,
            fit,
            bounding_box: None,
        }
    }

    fn flexible_box(&self, evaluation: &Evaluation, container: &Rect) -> Option<Rect> {
        if !self.options.flexible_dimensions {
            return None;
        }
        let bounds = bounding_box(
            evaluation.origin,
            &evaluation.position,
            container,
            self.options.direction,
        );
        let fits_vertically = evaluation.fit.fits_vertically
            || self.options.min_height.is_some_and(|min| min <= bounds.height);
        let fits_horizontally = evaluation.fit.fits_horizontally
            || self.options.min_width.is_some_and(|min| min <= bounds.width);
        (fits_vertically && fits_horizontally).then_some(bounds)
    }

    fn commit(
        &mut self,
        evaluation: &Evaluation,
        tier: PlacementTier,
        input: &LayoutInput,
        reused: bool,
    ) -> AppliedPosition {
        let size = input.overlay;
        let container = input.container.inner(Sides::all(self.options.effective_margin()));
        let overlay_rect = match (tier, evaluation.bounding_box) {
            (PlacementTier::Pushed, _) => {
                Rect::from_point_size(push_on_screen(evaluation.point, size, &container), size)
            }
            (PlacementTier::Flexible, Some(bounds)) => clamp_into(evaluation.point, size, &bounds),
            _ => Rect::from_point_size(evaluation.point, size),
        };

        let bounding_box = if tier == PlacementTier::Flexible {
            evaluation.bounding_box
        } else {
            None
        };
        let style = inline_style(
            &overlay_rect,
            bounding_box.as_ref(),
            &evaluation.position,
            &input.container,
            self.options.direction,
        );
        let position_changed = self
            .last
            .as_ref()
            .is_none_or(|last| last.index != evaluation.index);

        let applied = AppliedPosition {
            index: evaluation.index,
            position: evaluation.position,
            origin: evaluation.origin,
            overlay_rect,
            bounding_box,
            fit: overlay_fit(overlay_rect.origin(), overlay_rect.size(), &container),
            tier,
            reused,
            position_changed: position_changed && !reused,
            style,
        };
        tracing::debug!(
            index = applied.index,
            tier = ?applied.tier,
            reused,
            x = overlay_rect.x,
            y = overlay_rect.y,
            "overlay position applied"
        );
        self.last = Some(applied);
        applied
    }
}

/// The exact point on the anchor a candidate connects to.
pub fn origin_point(anchor: &Rect, position: &ConnectionPosition, direction: Direction) -> Point {
    let rtl = direction.is_rtl();
    let x = match position.origin_x {
        HorizontalConnection::Center => anchor.x + anchor.width / 2.0,
        HorizontalConnection::Start if rtl => anchor.right(),
        HorizontalConnection::Start => anchor.left(),
        HorizontalConnection::End if rtl => anchor.left(),
        HorizontalConnection::End => anchor.right(),
    };
    let y = match position.origin_y {
        VerticalConnection::Center => anchor.y + anchor.height / 2.0,
        VerticalConnection::Top => anchor.top(),
        VerticalConnection::Bottom => anchor.bottom(),
    };
    Point::new(x, y)
}

/// Top-left corner of the overlay when its connection point sits on `origin`.
///
/// The candidate's offset is not included.
pub fn overlay_point(
    origin: Point,
    overlay: Size,
    position: &ConnectionPosition,
    direction: Direction,
) -> Point {
    let rtl = direction.is_rtl();
    let dx = match position.overlay_x {
        HorizontalConnection::Center => -overlay.width / 2.0,
        HorizontalConnection::Start if rtl => -overlay.width,
        HorizontalConnection::Start => 0.0,
        HorizontalConnection::End if rtl => 0.0,
        HorizontalConnection::End => -overlay.width,
    };
    let dy = match position.overlay_y {
        VerticalConnection::Center => -overlay.height / 2.0,
        VerticalConnection::Top => 0.0,
        VerticalConnection::Bottom => -overlay.height,
    };
    origin.offset(dx, dy)
}

/// Measure how much of an overlay at `point` overflows `container`.
pub fn overlay_fit(point: Point, overlay: Size, container: &Rect) -> OverlayFit {
    let left = container.left() - point.x;
    let right = point.x + overlay.width - container.right();
    let top = container.top() - point.y;
    let bottom = point.y + overlay.height - container.bottom();

    let visible_width = subtract_overflows(overlay.width, &[left, right]);
    let visible_height = subtract_overflows(overlay.height, &[top, bottom]);
    let fits_horizontally = visible_width == overlay.width;
    let fits_vertically = visible_height == overlay.height;

    OverlayFit {
        visible_area: visible_width * visible_height,
        is_completely_within_viewport: fits_horizontally && fits_vertically,
        fits_vertically,
        fits_horizontally,
    }
}

fn subtract_overflows(length: f64, overflows: &[f64]) -> f64 {
    overflows
        .iter()
        .fold(length, |remaining, overflow| remaining - overflow.max(0.0))
        .max(0.0)
}

/// The space an overlay connected at `origin` can grow into.
///
/// Along each axis the box runs from the origin to the container edge the
/// overlay opens toward; a centered axis gets twice the distance to the
/// nearer edge.
pub fn bounding_box(
    origin: Point,
    position: &ConnectionPosition,
    container: &Rect,
    direction: Direction,
) -> Rect {
    let (top, height) = match position.overlay_y {
        VerticalConnection::Top => (origin.y, container.bottom() - origin.y),
        VerticalConnection::Bottom => (container.top(), origin.y - container.top()),
        VerticalConnection::Center => {
            let reach = (container.bottom() - origin.y)
                .min(origin.y - container.top())
                .max(0.0);
            (origin.y - reach, reach * 2.0)
        }
    };

    let extends_right = match position.overlay_x {
        HorizontalConnection::Start => Some(!direction.is_rtl()),
        HorizontalConnection::End => Some(direction.is_rtl()),
        HorizontalConnection::Center => None,
    };
    let (left, width) = match extends_right {
        Some(true) => (origin.x, container.right() - origin.x),
        Some(false) => (container.left(), origin.x - container.left()),
        None => {
            let reach = (container.right() - origin.x)
                .min(origin.x - container.left())
                .max(0.0);
            (origin.x - reach, reach * 2.0)
        }
    };

    Rect::new(left, top, width.max(0.0), height.max(0.0))
}

/// Translate an overlay at `point` back inside `container`.
///
/// On an axis where the overlay fits, it moves by the smallest amount that
/// brings it fully inside. Where it is larger than the container, its leading
/// edge is pinned to the container's leading edge and the trailing edge
/// overflows.
pub fn push_on_screen(point: Point, overlay: Size, container: &Rect) -> Point {
    Point::new(
        push_axis(point.x, overlay.width, container.left(), container.right()),
        push_axis(point.y, overlay.height, container.top(), container.bottom()),
    )
}

fn push_axis(start: f64, length: f64, low: f64, high: f64) -> f64 {
    if length > high - low {
        return low;
    }
    if start < low {
        low
    } else if start + length > high {
        high - length
    } else {
        start
    }
}

fn clamp_into(point: Point, size: Size, bounds: &Rect) -> Rect {
    let width = size.width.min(bounds.width);
    let height = size.height.min(bounds.height);
    let x = point.x.min(bounds.right() - width).max(bounds.left());
    let y = point.y.min(bounds.bottom() - height).max(bounds.top());
    Rect::new(x, y, width, height)
}

fn inline_style(
    rect: &Rect,
    bounding_box: Option<&Rect>,
    position: &ConnectionPosition,
    container: &Rect,
    direction: Direction,
) -> OverlayStyle {
    let mut style = OverlayStyle::default();

    let from_right = match position.overlay_x {
        HorizontalConnection::End => !direction.is_rtl(),
        HorizontalConnection::Start => direction.is_rtl(),
        HorizontalConnection::Center => false,
    };
    if from_right {
        style.right = Some(container.right() - rect.right());
    } else {
        style.left = Some(rect.left() - container.left());
    }

    if position.overlay_y == VerticalConnection::Bottom {
        style.bottom = Some(container.bottom() - rect.bottom());
    } else {
        style.top = Some(rect.top() - container.top());
    }

    if let Some(bounds) = bounding_box {
        style.max_width = Some(bounds.width);
        style.max_height = Some(bounds.height);
    }
    style
}
