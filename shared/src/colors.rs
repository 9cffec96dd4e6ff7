/// Format an HSL triple as a CSS color string (`hsl(221, 83%, 25%)`).
pub fn hsl_css(h: u16, s: u8, l: u8) -> String {
    format!("hsl({h}, {s}%, {l}%)")
}

/// Format an HSL triple plus alpha as a CSS color string (`hsla(221, 83%, 25%, 0.7)`).
pub fn hsla_css(h: u16, s: u8, l: u8, a: f64) -> String {
    format!("hsla({h}, {s}%, {l}%, {a})")
}

/// Hue/saturation pair shared by every shade of a hazard layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub hue: u16,
    pub saturation: u8,
}

impl Palette {
    pub const fn new(hue: u16, saturation: u8) -> Self {
        Self { hue, saturation }
    }

    pub fn fill(&self, lightness: u8, alpha: f64) -> String {
        hsla_css(self.hue, self.saturation, lightness, alpha)
    }

    pub fn outline(&self, lightness: u8) -> String {
        hsl_css(self.hue, self.saturation, lightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hsl_and_hsla() {
        assert_eq!(hsl_css(221, 83, 15), "hsl(221, 83%, 15%)");
        assert_eq!(hsla_css(221, 83, 25, 0.7), "hsla(221, 83%, 25%, 0.7)");
    }

    #[test]
    fn palette_keeps_hue_and_saturation() {
        let palette = Palette::new(330, 83);
        assert_eq!(palette.fill(45, 0.7), "hsla(330, 83%, 45%, 0.7)");
        assert_eq!(palette.outline(35), "hsl(330, 83%, 35%)");
    }
}
