// The particle field: a fixed-size set of wrapping point particles, linked to
// their neighbours by fading lines and pushed away from the pointer.

use crate::config::FieldConfig;
use crate::error::Result;
use crate::particle::Particle;
use crate::renderer::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vecmath::{vec2_len, vec2_square_len, vec2_sub};

// A connective line between particles `a < b`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub opacity: f64,
}

pub struct ParticleField {
    config: FieldConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    // An empty field seeded from the platform's entropy source.
    pub fn new(config: FieldConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: FieldConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(ParticleField {
            config,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
            rng,
        })
    }

    // Discards every particle and seeds a fresh set sized for `width`.
    pub fn init(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let count = self.config.particle_count(self.width);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::random(
                &mut self.rng,
                self.width,
                self.height,
                &self.config,
            ));
        }
        self.particles = particles;
        log::debug!(
            "seeded {} particles on a {}x{} surface",
            count,
            self.width,
            self.height
        );
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    // Moves every particle by its velocity without drawing.
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.advance(width, height);
        }
    }

    // One executed frame: clear, move and draw each particle, then draw the links.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) {
        let (width, height) = (self.width, self.height);
        surface.clear(width, height);
        for particle in &mut self.particles {
            particle.advance(width, height);
            surface.fill_circle(
                particle.pos[0],
                particle.pos[1],
                particle.radius(),
                particle.color(),
            );
        }
        self.draw_edges(surface);
    }

    pub fn draw_edges<S: Surface>(&self, surface: &mut S) {
        let base = self.config.particle_color();
        let line_width = self.config.link_width;
        for edge in self.edges() {
            surface.stroke_line(
                self.particles[edge.a].pos,
                self.particles[edge.b].pos,
                line_width,
                base.with_alpha(edge.opacity),
            );
        }
    }

    // Every unordered pair closer than `link_distance`. The candidate filter
    // compares squared distances; the root is only taken for the opacity.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.particles.len();
        let link_distance = self.config.link_distance;
        let max_square = link_distance * link_distance;
        let link_opacity = self.config.link_opacity;
        let particles = &self.particles;
        (0..n).flat_map(move |a| {
            ((a + 1)..n).filter_map(move |b| {
                let square = vec2_square_len(vec2_sub(particles[a].pos, particles[b].pos));
                if square < max_square {
                    let opacity = link_opacity * (1.0 - square.sqrt() / link_distance);
                    Some(Edge { a, b, opacity })
                } else {
                    None
                }
            })
        })
    }

    // Nudges every particle within `repel_radius` of the pointer away from it.
    // Velocity is never damped, so repeated passes keep adding speed.
    // Returns how many particles were pushed.
    pub fn repel(&mut self, pointer_x: f64, pointer_y: f64) -> usize {
        let radius = self.config.repel_radius;
        let strength = self.config.repel_strength;
        let mut pushed = 0;
        for particle in &mut self.particles {
            let to_pointer = vec2_sub([pointer_x, pointer_y], particle.pos);
            let distance = vec2_len(to_pointer);
            if distance < radius {
                let angle = to_pointer[1].atan2(to_pointer[0]);
                let force = (radius - distance) / radius;
                particle.vel[0] -= angle.cos() * force * strength;
                particle.vel[1] -= angle.sin() * force * strength;
                pushed += 1;
            }
        }
        pushed
    }

    #[cfg(test)]
    pub(crate) fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::renderer::recording::{DrawCall, RecordingSurface};

    fn seeded(seed: u64) -> ParticleField {
        ParticleField::with_rng(FieldConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle::new(x, y, 0.0, 0.0, 2.0, Color::from_rgb(Color::ACCENT).with_alpha(0.3))
    }

    #[test]
    fn count_follows_mobile_breakpoint() {
        let mut field = seeded(1);
        field.init(500.0, 900.0);
        assert_eq!(field.len(), 30);
        field.init(1200.0, 900.0);
        assert_eq!(field.len(), 50);
    }

    #[test]
    fn count_is_stable_across_ticks() {
        let mut field = seeded(2);
        field.init(1024.0, 768.0);
        let mut surface = RecordingSurface::default();
        for _ in 0..20 {
            field.frame(&mut surface);
            field.repel(512.0, 384.0);
        }
        assert_eq!(field.len(), 50);
    }

    #[test]
    fn positions_stay_in_bounds_over_many_ticks() {
        let mut field = seeded(3);
        field.init(320.0, 240.0);
        for tick in 0..2_000 {
            // keep shoving so velocities grow well past the surface size
            field.repel(160.0, 120.0);
            field.repel((tick % 320) as f64, (tick % 240) as f64);
            field.step();
            for p in field.particles() {
                assert!(p.pos[0] >= 0.0 && p.pos[0] < 320.0, "x = {}", p.pos[0]);
                assert!(p.pos[1] >= 0.0 && p.pos[1] < 240.0, "y = {}", p.pos[1]);
            }
        }
    }

    #[test]
    fn resize_reseeds_every_particle() {
        let mut field = seeded(4);
        field.init(500.0, 800.0);
        assert_eq!(field.len(), 30);
        let before: Vec<[f64; 2]> = field.particles().iter().map(|p| p.pos).collect();

        field.init(1200.0, 800.0);
        assert_eq!(field.len(), 50);
        for p in field.particles() {
            assert!(!before.contains(&p.pos));
        }
    }

    #[test]
    fn edges_use_strict_threshold() {
        let mut field = seeded(5);
        field.init(1000.0, 1000.0);
        field.set_particles(vec![
            still(0.0, 0.0),
            still(99.9, 0.0),
            still(0.0, 100.0),
            still(500.0, 500.0),
        ]);
        let edges: Vec<Edge> = field.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 1));
        assert!((edges[0].opacity - 0.1 * (1.0 - 0.999)).abs() < 1e-12);
    }

    #[test]
    fn edges_match_squared_distance_and_are_symmetric() {
        let mut field = seeded(6);
        field.init(400.0, 300.0);
        let edges: Vec<Edge> = field.edges().collect();
        let ps = field.particles();
        for a in 0..ps.len() {
            for b in 0..ps.len() {
                if a == b {
                    continue;
                }
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                let dx = ps[a].pos[0] - ps[b].pos[0];
                let dy = ps[a].pos[1] - ps[b].pos[1];
                let linked = edges.iter().any(|e| e.a == lo && e.b == hi);
                assert_eq!(linked, dx * dx + dy * dy < 10_000.0);
            }
        }
    }

    #[test]
    fn edge_opacity_fades_with_distance() {
        let mut field = seeded(7);
        field.init(1000.0, 1000.0);
        field.set_particles(vec![still(0.0, 0.0), still(0.0, 0.0), still(50.0, 0.0)]);
        let edges: Vec<Edge> = field.edges().collect();
        let touching = edges.iter().find(|e| (e.a, e.b) == (0, 1)).unwrap();
        let halfway = edges.iter().find(|e| (e.a, e.b) == (0, 2)).unwrap();
        assert!((touching.opacity - 0.1).abs() < 1e-12);
        assert!((halfway.opacity - 0.05).abs() < 1e-12);
    }

    #[test]
    fn repel_only_touches_particles_inside_radius() {
        let mut field = seeded(8);
        field.init(1000.0, 1000.0);
        field.set_particles(vec![
            still(150.0, 100.0),
            still(199.0, 100.0),
            still(100.0, 200.0),
            still(300.0, 300.0),
        ]);
        let pushed = field.repel(100.0, 100.0);
        assert_eq!(pushed, 2);

        let ps = field.particles();
        // 50px to the right of the pointer: force 0.5, pushed further right
        assert!((ps[0].vel[0] - 0.25).abs() < 1e-12);
        assert!(ps[0].vel[1].abs() < 1e-12);
        assert!(ps[1].vel[0] > 0.0 && ps[1].vel[0] < 0.01);
        // exactly on the radius: untouched
        assert_eq!(ps[2].vel, [0.0, 0.0]);
        assert_eq!(ps[3].vel, [0.0, 0.0]);
    }

    #[test]
    fn repeated_repel_accumulates_without_damping() {
        let mut field = seeded(9);
        field.init(1000.0, 1000.0);
        field.set_particles(vec![still(110.0, 100.0)]);
        for _ in 0..10 {
            field.repel(100.0, 100.0);
        }
        assert!((field.particles()[0].vel[0] - 4.5).abs() < 1e-9);
    }

    #[test]
    fn frame_clears_then_draws_dots_and_links() {
        let mut field = seeded(10);
        field.init(1000.0, 1000.0);
        field.set_particles(vec![still(10.0, 10.0), still(20.0, 10.0), still(900.0, 900.0)]);
        let mut surface = RecordingSurface::default();
        field.frame(&mut surface);

        assert_eq!(
            surface.calls[0],
            DrawCall::Clear {
                width: 1000.0,
                height: 1000.0
            }
        );
        assert_eq!(surface.clears(), 1);
        assert_eq!(surface.circles(), 3);
        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawCall::Line { from, to, width, color } => {
                assert_eq!(*from, [10.0, 10.0]);
                assert_eq!(*to, [20.0, 10.0]);
                assert_eq!(*width, 0.5);
                assert!((color.a - 0.09).abs() < 1e-12);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FieldConfig {
            repel_radius: -1.0,
            ..FieldConfig::default()
        };
        assert!(ParticleField::with_rng(config, StdRng::seed_from_u64(0)).is_err());
    }
}
