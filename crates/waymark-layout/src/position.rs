#![forbid(unsafe_code)]

//! Named overlay positions and nubbin resolution.
//!
//! [`OverlayPosition`] is the public, human-friendly way to say where an
//! overlay goes. Each name expands to a ranked candidate list for the
//! connected-position engine: the preferred placement, its flip on the same
//! axis, then the remaining sides as fallbacks.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::LayoutError;
use crate::connection::{
    ConnectionPosition, ConnectionPositions, HorizontalConnection as H, VerticalConnection as V,
};

/// Where to place the overlay relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OverlayPosition {
    /// Above the anchor, horizontally centered.
    Above,
    /// Above the anchor, aligned to its start edge.
    AboveStart,
    /// Above the anchor, aligned to its end edge.
    AboveEnd,
    /// Below the anchor, horizontally centered.
    #[default]
    Below,
    /// Below the anchor, aligned to its start edge.
    BelowStart,
    /// Below the anchor, aligned to its end edge.
    BelowEnd,
    /// On the start side of the anchor, vertically centered.
    Before,
    /// On the end side of the anchor, vertically centered.
    After,
}

impl OverlayPosition {
    /// The single connection pair this name stands for.
    pub const fn connection(self) -> ConnectionPosition {
        match self {
            Self::Above => ConnectionPosition::new(H::Center, V::Top, H::Center, V::Bottom),
            Self::AboveStart => ConnectionPosition::new(H::Start, V::Top, H::Start, V::Bottom),
            Self::AboveEnd => ConnectionPosition::new(H::End, V::Top, H::End, V::Bottom),
            Self::Below => ConnectionPosition::new(H::Center, V::Bottom, H::Center, V::Top),
            Self::BelowStart => ConnectionPosition::new(H::Start, V::Bottom, H::Start, V::Top),
            Self::BelowEnd => ConnectionPosition::new(H::End, V::Bottom, H::End, V::Top),
            Self::Before => ConnectionPosition::new(H::Start, V::Center, H::End, V::Center),
            Self::After => ConnectionPosition::new(H::End, V::Center, H::Start, V::Center),
        }
    }

    /// The opposite placement on the same axis.
    pub const fn flip(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::AboveStart => Self::BelowStart,
            Self::AboveEnd => Self::BelowEnd,
            Self::Below => Self::Above,
            Self::BelowStart => Self::AboveStart,
            Self::BelowEnd => Self::AboveEnd,
            Self::Before => Self::After,
            Self::After => Self::Before,
        }
    }

    /// Whether this is an above/below placement.
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::Before | Self::After)
    }

    const fn is_above(self) -> bool {
        matches!(self, Self::Above | Self::AboveStart | Self::AboveEnd)
    }

    /// Ranked candidates: preferred, flipped, then the other sides.
    pub fn candidates(self) -> ConnectionPositions {
        let mut order = vec![self, self.flip()];
        if self.is_vertical() {
            if self.is_above() {
                order.extend([Self::Above, Self::Below]);
            } else {
                order.extend([Self::Below, Self::Above]);
            }
            order.extend([Self::After, Self::Before]);
        } else {
            order.extend([Self::Below, Self::Above]);
        }

        let mut positions: Vec<ConnectionPosition> = Vec::with_capacity(order.len());
        for name in order {
            let connection = name.connection();
            if !positions.contains(&connection) {
                positions.push(connection);
            }
        }
        // Built from constants: never empty, offsets zero, weights one.
        ConnectionPositions::from_trusted(positions)
    }

    /// Canonical string name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::AboveStart => "above-start",
            Self::AboveEnd => "above-end",
            Self::Below => "below",
            Self::BelowStart => "below-start",
            Self::BelowEnd => "below-end",
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl FromStr for OverlayPosition {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" | "top" => Ok(Self::Above),
            "above-start" => Ok(Self::AboveStart),
            "above-end" => Ok(Self::AboveEnd),
            "below" | "bottom" => Ok(Self::Below),
            "below-start" => Ok(Self::BelowStart),
            "below-end" => Ok(Self::BelowEnd),
            "before" | "left" => Ok(Self::Before),
            "after" | "right" => Ok(Self::After),
            other => Err(LayoutError::UnknownPosition(other.to_owned())),
        }
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which overlay edge carries the pointer arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NubbinSide {
    Top,
    Bottom,
    Start,
    End,
}

/// Nubbin preference for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NubbinPosition {
    /// Point at the anchor from whichever edge faces it.
    #[default]
    Auto,
    Top,
    Bottom,
    Start,
    End,
    /// No nubbin.
    None,
}

impl NubbinPosition {
    /// Resolve the preference against the candidate that was applied.
    ///
    /// `Auto` yields `None` when the overlay overlaps its anchor on both axes
    /// (no edge faces the anchor).
    pub fn resolve(self, applied: &ConnectionPosition) -> Option<NubbinSide> {
        match self {
            Self::Top => Some(NubbinSide::Top),
            Self::Bottom => Some(NubbinSide::Bottom),
            Self::Start => Some(NubbinSide::Start),
            Self::End => Some(NubbinSide::End),
            Self::None => None,
            Self::Auto => match (
                applied.origin_y,
                applied.overlay_y,
                applied.origin_x,
                applied.overlay_x,
            ) {
                (V::Bottom, V::Top, _, _) => Some(NubbinSide::Top),
                (V::Top, V::Bottom, _, _) => Some(NubbinSide::Bottom),
                (_, _, H::End, H::Start) => Some(NubbinSide::Start),
                (_, _, H::Start, H::End) => Some(NubbinSide::End),
                _ => None,
            },
        }
    }
}

impl FromStr for NubbinPosition {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "start" | "left" => Ok(Self::Start),
            "end" | "right" => Ok(Self::End),
            "none" => Ok(Self::None),
            other => Err(LayoutError::UnknownNubbin(other.to_owned())),
        }
    }
}
