use crate::common::{DisplayPoint, Translation};

/// Drag state of the color picker over the inspection region.
///
/// The pointer is `position + offset`. While a drag is in flight only the
/// offset moves; releasing the drag folds it into the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picker {
    position: DisplayPoint,
    offset: Translation,
    length: f64,
}

impl Picker {
    /// Starts at the center of a square region with side `length`.
    pub fn centered(length: f64) -> Self {
        Self {
            position: DisplayPoint::new(length / 2.0, length / 2.0),
            offset: Translation::ZERO,
            length,
        }
    }

    pub fn pointer(&self) -> DisplayPoint {
        self.position.offset_by(self.offset)
    }

    pub fn position(&self) -> DisplayPoint {
        self.position
    }

    pub fn offset(&self) -> Translation {
        self.offset
    }

    /// Applies the running drag translation, keeping the pointer on
    /// `[0, length]` along both axes. Returns the clamped pointer.
    pub fn drag_changed(&mut self, translation: Translation) -> DisplayPoint {
        self.offset = Translation::new(
            Self::clamp_axis(self.position.x, translation.width, self.length),
            Self::clamp_axis(self.position.y, translation.height, self.length),
        );
        self.pointer()
    }

    pub fn drag_ended(&mut self) -> DisplayPoint {
        self.position = self.pointer();
        self.offset = Translation::ZERO;
        self.position
    }

    fn clamp_axis(position: f64, delta: f64, length: f64) -> f64 {
        let target = position + delta;
        if target < 0.0 {
            -position
        } else if target > length {
            length - position
        } else {
            delta
        }
    }
}
