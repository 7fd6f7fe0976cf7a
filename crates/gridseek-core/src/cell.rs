//! Cell occupancy: [`CellState`] and the [`Color`] carried by reserved cells.

use std::fmt;

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Occupancy of a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Free,
    Obstacle,
    Start,
    End,
    /// Occupied by something other than an obstacle, e.g. a pre-coloured
    /// cell imported from a map. Never traversable.
    Reserved(Color),
}

impl CellState {
    /// Whether a path may pass through a cell in this state.
    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Free | Self::Start | Self::End)
    }

    /// Whether this state marks a search endpoint.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}
