// Tunables for the particle background.

use crate::color::Color;
use crate::error::{Error, Result};

// Every knob of the particle field. `Default` matches the site's background.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    // Surfaces narrower than this (px) get `mobile_count` particles
    pub mobile_breakpoint: f64,
    pub mobile_count: usize,
    pub desktop_count: usize,
    // Initial velocity per axis is drawn from `[-max_speed, max_speed)`
    pub max_speed: f64,
    // Half-open `[min, max)` range for particle radius
    pub radius_range: (f64, f64),
    // Half-open `[min, max)` range for particle alpha
    pub alpha_range: (f64, f64),
    // 00RRGGBB hue shared by dots and edges
    pub color: u32,
    // Pairs closer than this (px) are linked
    pub link_distance: f64,
    // Edge alpha at zero distance, fading linearly to 0 at `link_distance`
    pub link_opacity: f64,
    pub link_width: f64,
    // Pointer influence radius (px)
    pub repel_radius: f64,
    pub repel_strength: f64,
    // Minimum time between executed frames (ms)
    pub frame_interval_ms: f64,
    // CSS opacity of the whole canvas
    pub canvas_opacity: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            mobile_breakpoint: 768.0,
            mobile_count: 30,
            desktop_count: 50,
            max_speed: 1.0,
            radius_range: (1.0, 3.0),
            alpha_range: (0.1, 0.6),
            color: Color::ACCENT,
            link_distance: 100.0,
            link_opacity: 0.1,
            link_width: 0.5,
            repel_radius: 100.0,
            repel_strength: 0.5,
            frame_interval_ms: 33.0,
            canvas_opacity: 0.5,
        }
    }
}

impl FieldConfig {
    pub fn particle_count(&self, surface_width: f64) -> usize {
        if surface_width < self.mobile_breakpoint {
            self.mobile_count
        } else {
            self.desktop_count
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("link_distance", self.link_distance)?;
        positive("repel_radius", self.repel_radius)?;
        positive("frame_interval_ms", self.frame_interval_ms)?;
        positive("link_width", self.link_width)?;
        if !(self.max_speed >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_speed must not be negative, got {}",
                self.max_speed
            )));
        }
        range("radius_range", self.radius_range)?;
        range("alpha_range", self.alpha_range)?;
        if self.radius_range.0 <= 0.0 {
            return Err(Error::InvalidConfig(
                "radius_range must start above zero".to_owned(),
            ));
        }
        unit("alpha_range.0", self.alpha_range.0)?;
        unit("alpha_range.1", self.alpha_range.1)?;
        unit("link_opacity", self.link_opacity)?;
        unit("canvas_opacity", self.canvas_opacity)?;
        Ok(())
    }

    pub fn particle_color(&self) -> Color {
        Color::from_rgb(self.color)
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn range(name: &str, (min, max): (f64, f64)) -> Result<()> {
    if min < max && min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be a non-empty range, got [{}, {})",
            name, min, max
        )))
    }
}

fn unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )))
    }
}
