//! True-color RGB triples

/// 24-bit RGB color with u8 components (0 - 255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from hex color (e.g., 0xFF0000 for red)
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Pack into 0xRRGGBB
    #[inline]
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Tuple form, handy for comparisons against raw tables
    #[inline]
    pub const fn to_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Compute luminance (perceived brightness) in 0.0 - 1.0
    #[inline]
    pub fn luminance(&self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)) / 255.0
    }

    /// Euclidean distance to another color, normalized so that black-to-white is ~1.73
    #[inline]
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = (f32::from(self.r) - f32::from(other.r)) / 255.0;
        let dg = (f32::from(self.g) - f32::from(other.g)) / 255.0;
        let db = (f32::from(self.b) - f32::from(other.b)) / 255.0;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(p: image::Rgb<u8>) -> Self {
        let [r, g, b] = p.0;
        Self::new(r, g, b)
    }
}

impl From<Rgb> for nu_ansi_term::Color {
    fn from(c: Rgb) -> Self {
        nu_ansi_term::Color::Rgb(c.r, c.g, c.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.to_hex())
    }
}
