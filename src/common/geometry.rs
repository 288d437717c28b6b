/// A point in display units, relative to the top-left of the rendered
/// inspection region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, translation: Translation) -> Self {
        Self::new(self.x + translation.width, self.y + translation.height)
    }
}

/// Drag translation in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation {
    pub width: f64,
    pub height: f64,
}

impl Translation {
    pub const ZERO: Translation = Translation {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
