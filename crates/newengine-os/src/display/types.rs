use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Sub};

/// Integer point in screen space.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Sub for Size {
    type Output = Size;

    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl Div<i32> for Size {
    type Output = Size;

    #[inline]
    fn div(self, rhs: i32) -> Size {
        Size::new(self.width / rhs, self.height / rhs)
    }
}

impl Add<Size> for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Size) -> Point {
        Point::new(self.x + rhs.width, self.y + rhs.height)
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOrientation {
    #[default]
    Landscape,
    Portrait,
    ReverseLandscape,
    ReversePortrait,
    SensorLandscape,
    SensorPortrait,
    Sensor,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderThreadMode {
    Unsafe,
    #[default]
    Safe,
    Separate,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CursorShape {
    #[default]
    Arrow,
    Ibeam,
    PointingHand,
    Cross,
    Wait,
    Busy,
    Drag,
    CanDrop,
    Forbidden,
    Vsize,
    Hsize,
    Bdiagsize,
    Fdiagsize,
    Move,
    Vsplit,
    Hsplit,
    Help,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum MouseMode {
    #[default]
    Visible,
    Hidden,
    Captured,
    Confined,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum LatinKeyboardVariant {
    #[default]
    Qwerty,
    Qwertz,
    Azerty,
    Qzerty,
    Dvorak,
    Neo,
    Colemak,
}
