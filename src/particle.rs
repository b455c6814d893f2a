// Point particle: position and velocity change every tick, radius and color never do

use crate::color::Color;
use crate::config::FieldConfig;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    radius: f64,
    color: Color,
}

impl Particle {
    pub fn new(
        pos_x: f64,
        pos_y: f64,
        vel_x: f64,
        vel_y: f64,
        radius: f64,
        color: Color,
    ) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            radius,
            color,
        }
    }

    // Uniform position over the surface, uniform velocity, radius and alpha from the config ranges
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Particle {
        let pos_x = rng.gen::<f64>() * width;
        let pos_y = rng.gen::<f64>() * height;
        let vel_x = (rng.gen::<f64>() * 2.0 - 1.0) * config.max_speed;
        let vel_y = (rng.gen::<f64>() * 2.0 - 1.0) * config.max_speed;
        let (min_radius, max_radius) = config.radius_range;
        let radius = rng.gen::<f64>() * (max_radius - min_radius) + min_radius;
        let (min_alpha, max_alpha) = config.alpha_range;
        let alpha = rng.gen::<f64>() * (max_alpha - min_alpha) + min_alpha;
        let color = config.particle_color().with_alpha(alpha);
        Particle::new(pos_x, pos_y, vel_x, vel_y, radius, color)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    // One tick of motion, then wrap back onto the surface
    pub fn advance(&mut self, width: f64, height: f64) {
        self.pos[0] = wrap_axis(self.pos[0] + self.vel[0], width);
        self.pos[1] = wrap_axis(self.pos[1] + self.vel[1], height);
    }
}

// Keeps `0 <= value < extent`. Leaving through the far edge re-enters at 0,
// leaving through the near edge re-enters from the far edge by the overshoot.
pub fn wrap_axis(value: f64, extent: f64) -> f64 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    if value >= extent {
        return 0.0;
    }
    if value >= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn teal() -> Color {
        Color::from_rgb(Color::ACCENT).with_alpha(0.3)
    }

    #[test]
    fn crossing_right_edge_reenters_at_zero() {
        let mut p = Particle::new(799.5, 40.0, 1.0, 0.0, 2.0, teal());
        p.advance(800.0, 600.0);
        assert_eq!(p.pos[0], 0.0);
        assert_eq!(p.pos[1], 40.0);
    }

    #[test]
    fn crossing_bottom_edge_reenters_at_zero() {
        let mut p = Particle::new(10.0, 599.8, 0.0, 0.5, 2.0, teal());
        p.advance(800.0, 600.0);
        assert_eq!(p.pos[1], 0.0);
    }

    #[test]
    fn crossing_left_edge_reenters_from_the_right() {
        let mut p = Particle::new(0.25, 10.0, -1.0, 0.0, 2.0, teal());
        p.advance(800.0, 600.0);
        assert!((p.pos[0] - 799.25).abs() < 1e-9);
        assert!(p.pos[0] < 800.0);
    }

    #[test]
    fn wrap_axis_handles_tiny_negative_overshoot() {
        let v = wrap_axis(-1e-20, 100.0);
        assert!(v >= 0.0 && v < 100.0);
    }

    #[test]
    fn wrap_axis_on_empty_extent_pins_to_origin() {
        assert_eq!(wrap_axis(5.0, 0.0), 0.0);
        assert_eq!(wrap_axis(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn random_particles_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = FieldConfig::default();
        for _ in 0..500 {
            let p = Particle::random(&mut rng, 640.0, 480.0, &config);
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 640.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 480.0);
            assert!(p.vel[0] >= -1.0 && p.vel[0] < 1.0);
            assert!(p.vel[1] >= -1.0 && p.vel[1] < 1.0);
            assert!(p.radius() >= 1.0 && p.radius() < 3.0);
            assert!(p.color().a >= 0.1 && p.color().a < 0.6);
            assert_eq!((p.color().r, p.color().g, p.color().b), (100, 255, 218));
        }
    }
}
