//! Axes, box sides and rectangles.

use crate::error::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Raw axis constants: 0 is horizontal, 1 vertical.
impl TryFrom<i32> for Axis {
    type Error = ViewError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            other => Err(ViewError::InvalidAxis(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];
}

/// Raw side constants, numbered 1 to 4 from the top, counterclockwise.
impl TryFrom<i32> for Side {
    type Error = ViewError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::Top),
            2 => Ok(Side::Left),
            3 => Ok(Side::Bottom),
            4 => Ok(Side::Right),
            other => Err(ViewError::InvalidSide(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn span(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }

    pub fn origin(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Shrink by the given insets, never below zero size.
    pub fn inset(&self, top: f32, left: f32, bottom: f32, right: f32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    /// Build a rectangle from an offset and span on each axis.
    pub fn from_axes(major: Axis, offset: f32, span: f32, minor_offset: f32, minor_span: f32) -> Rect {
        match major {
            Axis::X => Rect::new(offset, minor_offset, span, minor_span),
            Axis::Y => Rect::new(minor_offset, offset, minor_span, span),
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sides_and_axes() {
        assert_eq!(Side::try_from(1).unwrap(), Side::Top);
        assert_eq!(Side::try_from(4).unwrap(), Side::Right);
        assert!(matches!(Side::try_from(0), Err(ViewError::InvalidSide(0))));
        assert!(matches!(Side::try_from(7), Err(ViewError::InvalidSide(7))));
        assert_eq!(Axis::try_from(1).unwrap(), Axis::Y);
        assert!(matches!(Axis::try_from(2), Err(ViewError::InvalidAxis(2))));
    }

    #[test]
    fn inset_clamps() {
        let r = Rect::new(10.0, 10.0, 20.0, 4.0).inset(3.0, 5.0, 3.0, 5.0);
        assert_eq!(r, Rect::new(15.0, 13.0, 10.0, 0.0));
    }
}
