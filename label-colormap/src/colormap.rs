use log::debug;
use rand::Rng;

/// 8-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RGB {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGB {
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Color with channels in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.random::<f32>(),
            g: rng.random::<f32>(),
            b: rng.random::<f32>(),
        }
    }

    pub fn channels(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgb(&self) -> RGB {
        RGB {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
        }
    }
}

// floor(c * 256) keeps [0, 1) inside 0..=255
fn quantize(c: f32) -> u8 {
    (c * 256.0).clamp(0.0, 255.0) as u8
}

/// One color per label value `0..=max_label`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    colors: Vec<Color>,
    rgb: Vec<RGB>,
}

impl ColorTable {
    pub fn random<R: Rng + ?Sized>(max_label: u32, rng: &mut R) -> Self {
        let len = max_label as usize + 1;
        let colors: Vec<Color> = (0..len).map(|_| Color::random(&mut *rng)).collect();
        debug!("Generated {len} random colors");
        Self::from_colors(colors)
    }

    pub fn from_colors(colors: Vec<Color>) -> Self {
        let rgb = colors.iter().map(Color::to_rgb).collect();
        Self { colors, rgb }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, label: u32) -> Option<&Color> {
        self.colors.get(label as usize)
    }

    pub fn rgb(&self, label: u32) -> Option<RGB> {
        self.rgb.get(label as usize).copied()
    }
}
