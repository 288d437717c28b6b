use image::{Rgb, Rgba};

/// One pixel read out of a captured image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample {
    rgba: Rgba<u8>,
}

impl ColorSample {
    pub fn new(rgba: Rgba<u8>) -> Self {
        Self { rgba }
    }

    pub fn rgba(&self) -> Rgba<u8> {
        self.rgba
    }

    /// Drops alpha; this is what the classifier consumes.
    pub fn rgb(&self) -> Rgb<u8> {
        let [r, g, b, _] = self.rgba.0;
        Rgb([r, g, b])
    }

    /// Channels scaled to [0, 1].
    pub fn normalized(&self) -> [f32; 4] {
        self.rgba.0.map(|c| c as f32 / 255.0)
    }

    pub fn hex(&self) -> String {
        let [r, g, b, _] = self.rgba.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl From<Rgba<u8>> for ColorSample {
    fn from(rgba: Rgba<u8>) -> Self {
        Self::new(rgba)
    }
}
