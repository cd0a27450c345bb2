use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// A colour in hue/saturation/value form.
///
/// `hue` is in degrees `[0, 360)`, `sat` and `val` are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f32,
    pub sat: f32,
    pub val: f32,
}

impl Hsv {
    pub fn new(hue: f32, sat: f32, val: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            sat: sat.clamp(0.0, 1.0),
            val: val.clamp(0.0, 1.0),
        }
    }

    /// Converts an RGBA colour, ignoring alpha.
    pub fn from_color(color: Color32) -> Self {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let sat = if max > 0.0 { delta / max } else { 0.0 };

        Self::new(hue, sat, max)
    }

    /// Converts back to an opaque-or-`alpha` RGBA colour.
    pub fn to_color(self, alpha: u8) -> Color32 {
        let c = self.val * self.sat;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let m = self.val - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Color32::from_rgba_unmultiplied(channel(r), channel(g), channel(b), alpha)
    }
}

/// Mapping between positions on a circular hue/saturation wheel and colours.
///
/// Hue is the angle of the position around the centre (measured from +x),
/// saturation the distance from the centre relative to the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorWheel {
    pub center: Pos2,
    pub radius: f32,
}

impl ColorWheel {
    pub fn new(center: Pos2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        pos.distance(self.center) <= self.radius
    }

    /// Hue and saturation under `pos`. Positions outside the wheel clamp to
    /// full saturation.
    pub fn hue_sat_at(&self, pos: Pos2) -> (f32, f32) {
        let d = pos - self.center;
        let hue = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
        let sat = if self.radius > 0.0 {
            (d.length() / self.radius).min(1.0)
        } else {
            0.0
        };
        (hue, sat)
    }

    pub fn position_of(&self, hue: f32, sat: f32) -> Pos2 {
        let angle = hue.to_radians();
        self.center + Vec2::angled(angle) * (sat.clamp(0.0, 1.0) * self.radius)
    }
}

/// The colour currently selected in the UI, mirrored in HSV so the wheel
/// and the value slider can be driven without round-trip drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSelection {
    color: [u8; 4],
    hsv: Hsv,
}

impl Default for ColorSelection {
    fn default() -> Self {
        Self::from_color(Color32::BLACK)
    }
}

impl ColorSelection {
    pub fn from_color(color: Color32) -> Self {
        Self {
            color: color.to_srgba_unmultiplied(),
            hsv: Hsv::from_color(color),
        }
    }

    pub fn color(&self) -> Color32 {
        let [r, g, b, a] = self.color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Selects `color` unless it is fully transparent, in which case the
    /// current selection is kept. Returns whether the selection changed.
    pub fn pick(&mut self, color: Color32) -> bool {
        if color.a() == 0 {
            return false;
        }
        *self = Self::from_color(color);
        true
    }

    pub fn set_hsv(&mut self, hsv: Hsv) {
        self.hsv = hsv;
        self.color = hsv.to_color(255).to_srgba_unmultiplied();
    }
}
