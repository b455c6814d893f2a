// Color with 8-bit channels and a fractional alpha, rendered as a CSS rgba() string
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    // Accent teal used across the site (#64ffda)
    pub const ACCENT: u32 = 0x64ffda;

    // Created from an unsigned 32 representing 00RRGGBB, fully opaque
    pub fn from_rgb(num: u32) -> Color {
        let r = (num >> 16) as u8;
        let g = (num >> 8) as u8;
        let b = num as u8;

        Color { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Color {
        Color {
            a: a.max(0.0).min(1.0),
            ..self
        }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
