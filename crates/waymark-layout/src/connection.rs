#![forbid(unsafe_code)]

//! Connection pairs: how an overlay edge lines up with an anchor edge.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Horizontal alignment point. `Start`/`End` follow the writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HorizontalConnection {
    Start,
    Center,
    End,
}

/// Vertical alignment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerticalConnection {
    Top,
    Center,
    Bottom,
}

impl FromStr for HorizontalConnection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => Err(LayoutError::InvalidConnection {
                axis: "horizontal",
                value: other.to_owned(),
            }),
        }
    }
}

impl FromStr for VerticalConnection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => Err(LayoutError::InvalidConnection {
                axis: "vertical",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for HorizontalConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        })
    }
}

impl fmt::Display for VerticalConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        })
    }
}

/// Horizontal writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    #[inline]
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// One candidate placement: an anchor point, the overlay point that is
/// pinned to it, an extra offset, and a weight used to rank flexible fits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionPosition {
    pub origin_x: HorizontalConnection,
    pub origin_y: VerticalConnection,
    pub overlay_x: HorizontalConnection,
    pub overlay_y: VerticalConnection,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset_x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset_y: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f64,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
    1.0
}

impl ConnectionPosition {
    /// Create a candidate with zero offset and weight 1.
    pub const fn new(
        origin_x: HorizontalConnection,
        origin_y: VerticalConnection,
        overlay_x: HorizontalConnection,
        overlay_y: VerticalConnection,
    ) -> Self {
        Self {
            origin_x,
            origin_y,
            overlay_x,
            overlay_y,
            offset_x: 0.0,
            offset_y: 0.0,
            weight: 1.0,
        }
    }

    /// Parse the four axis fields from their string names.
    pub fn parse(
        origin_x: &str,
        origin_y: &str,
        overlay_x: &str,
        overlay_y: &str,
    ) -> Result<Self, LayoutError> {
        Ok(Self::new(
            origin_x.parse()?,
            origin_y.parse()?,
            overlay_x.parse()?,
            overlay_y.parse()?,
        ))
    }

    /// Set the extra offset applied after alignment.
    #[must_use]
    pub const fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set the ranking weight for flexible fits.
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Check numeric fields.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(LayoutError::InvalidOffset {
                x: self.offset_x,
                y: self.offset_y,
            });
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(LayoutError::InvalidWeight(self.weight));
        }
        Ok(())
    }
}

/// A validated, non-empty, ranked list of candidates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConnectionPositions(Vec<ConnectionPosition>);

impl ConnectionPositions {
    /// Validate and wrap a candidate list.
    pub fn new(positions: Vec<ConnectionPosition>) -> Result<Self, LayoutError> {
        if positions.is_empty() {
            return Err(LayoutError::NoCandidates);
        }
        for position in &positions {
            position.validate()?;
        }
        Ok(Self(positions))
    }

    pub(crate) fn from_trusted(positions: Vec<ConnectionPosition>) -> Self {
        debug_assert!(!positions.is_empty());
        Self(positions)
    }

    #[inline]
    pub fn as_slice(&self) -> &[ConnectionPosition] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn first(&self) -> &ConnectionPosition {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConnectionPosition> {
        self.0.iter()
    }
}

impl TryFrom<Vec<ConnectionPosition>> for ConnectionPositions {
    type Error = LayoutError;

    fn try_from(value: Vec<ConnectionPosition>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ConnectionPositions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let positions = Vec::<ConnectionPosition>::deserialize(deserializer)?;
        Self::new(positions).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a ConnectionPositions {
    type Item = &'a ConnectionPosition;
    type IntoIter = std::slice::Iter<'a, ConnectionPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
