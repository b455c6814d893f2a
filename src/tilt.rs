// Pointer-tracking 3D tilt for project cards. The host feeds pointer
// positions relative to the card box and a frame delta, and applies the
// returned CSS transform.

use wasm_bindgen::prelude::*;
extern crate nalgebra_glm as glm;

// Damped spring chasing a target value
#[derive(Copy, Clone, Debug)]
pub struct Spring {
    pub value: f64,
    pub velocity: f64,
    pub target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
}

impl Spring {
    pub const STIFFNESS: f64 = 100.0;
    pub const DAMPING: f64 = 10.0;
    pub const MASS: f64 = 1.0;
    // Larger frame gaps are split so the integration stays stable
    const MAX_STEP_SECS: f64 = 1.0 / 120.0;
    // Frames longer than this (e.g. a background tab) are clamped
    const MAX_DELTA_SECS: f64 = 0.25;

    pub fn new(value: f64) -> Self {
        Spring::with_params(value, Self::STIFFNESS, Self::DAMPING, Self::MASS)
    }

    pub fn with_params(value: f64, stiffness: f64, damping: f64, mass: f64) -> Self {
        Spring {
            value,
            velocity: 0.0,
            target: value,
            stiffness,
            damping,
            mass,
        }
    }

    // Retunes the spring mid-flight, keeping value and velocity
    pub fn set_params(&mut self, stiffness: f64, damping: f64, mass: f64) {
        self.stiffness = stiffness;
        self.damping = damping;
        self.mass = mass;
    }

    pub fn advance(&mut self, delta_secs: f64) {
        if !(delta_secs > 0.0) {
            return;
        }
        let mut remaining = delta_secs.min(Self::MAX_DELTA_SECS);
        while remaining > 0.0 {
            let dt = remaining.min(Self::MAX_STEP_SECS);
            let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force / self.mass * dt;
            self.value += self.velocity * dt;
            remaining -= dt;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < 1e-3 && self.velocity.abs() < 1e-3
    }
}

#[wasm_bindgen]
pub struct TiltCard {
    tilt_max_deg: f64,
    hover_scale: f64,
    perspective_px: f64,
    x: Spring,
    y: Spring,
    scale: Spring,
    hovered: bool,
}

impl Default for TiltCard {
    fn default() -> Self {
        TiltCard::new(15.0, 1.05, 1000.0)
    }
}

#[wasm_bindgen]
impl TiltCard {
    #[wasm_bindgen(constructor)]
    pub fn new(tilt_max_deg: f64, hover_scale: f64, perspective_px: f64) -> TiltCard {
        TiltCard {
            tilt_max_deg,
            hover_scale,
            perspective_px,
            x: Spring::new(0.0),
            y: Spring::new(0.0),
            scale: Spring::new(1.0),
            hovered: false,
        }
    }

    // Pointer position relative to the card's bounding box
    pub fn pointer_move(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        self.x.target = x / width - 0.5;
        self.y.target = y / height - 0.5;
        self.hovered = true;
        self.scale.target = self.hover_scale;
    }

    pub fn pointer_leave(&mut self) {
        self.x.target = 0.0;
        self.y.target = 0.0;
        self.hovered = false;
        self.scale.target = 1.0;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        let secs = delta_ms / 1000.0;
        self.x.advance(secs);
        self.y.advance(secs);
        self.scale.advance(secs);
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled() && self.scale.is_settled()
    }

    // y in [-0.5, 0.5] maps to [tilt, -tilt]
    pub fn rotate_x_deg(&self) -> f64 {
        -self.y.value * 2.0 * self.tilt_max_deg
    }

    // x in [-0.5, 0.5] maps to [-tilt, tilt]
    pub fn rotate_y_deg(&self) -> f64 {
        self.x.value * 2.0 * self.tilt_max_deg
    }

    pub fn scale(&self) -> f64 {
        self.scale.value
    }

    // Column-major rotateX * rotateY * scale, the layout CSS matrix3d() expects
    pub fn matrix(&self) -> Vec<f32> {
        let rotate_x = (self.rotate_x_deg() as f32).to_radians();
        let rotate_y = (self.rotate_y_deg() as f32).to_radians();
        let s = self.scale() as f32;
        let model = glm::scale(
            &glm::rotate_y(&glm::rotate_x(&glm::Mat4::identity(), rotate_x), rotate_y),
            &glm::vec3(s, s, s),
        );
        model.as_slice().to_vec()
    }

    pub fn transform(&self) -> String {
        // adding 0.0 turns -0.0 into 0.0 so the string stays stable
        let values: Vec<String> = self
            .matrix()
            .iter()
            .map(|v| format!("{:.6}", v + 0.0))
            .collect();
        format!(
            "perspective({}px) matrix3d({})",
            self.perspective_px,
            values.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(card: &mut TiltCard) {
        for _ in 0..600 {
            card.advance(16.0);
        }
    }

    #[test]
    fn rests_flat() {
        let card = TiltCard::default();
        assert_eq!(card.rotate_x_deg(), 0.0);
        assert_eq!(card.rotate_y_deg(), 0.0);
        assert_eq!(card.scale(), 1.0);
        assert!(card.is_settled());
    }

    #[test]
    fn corner_pointer_reaches_full_tilt() {
        let mut card = TiltCard::default();
        // bottom-right corner of a 200x100 card
        card.pointer_move(200.0, 100.0, 200.0, 100.0);
        settle(&mut card);
        assert!((card.rotate_x_deg() + 15.0).abs() < 0.01);
        assert!((card.rotate_y_deg() - 15.0).abs() < 0.01);
        assert!((card.scale() - 1.05).abs() < 1e-3);
        assert!(card.is_hovered());
    }

    #[test]
    fn leaving_springs_back_to_flat() {
        let mut card = TiltCard::default();
        card.pointer_move(0.0, 0.0, 300.0, 300.0);
        settle(&mut card);
        assert!((card.rotate_x_deg() - 15.0).abs() < 0.01);
        card.pointer_leave();
        settle(&mut card);
        assert!(card.rotate_x_deg().abs() < 0.01);
        assert!(card.rotate_y_deg().abs() < 0.01);
        assert!(!card.is_hovered());
        assert!(card.is_settled());
    }

    #[test]
    fn spring_moves_gradually() {
        let mut card = TiltCard::default();
        card.pointer_move(300.0, 150.0, 300.0, 300.0);
        card.advance(16.0);
        let early = card.rotate_y_deg();
        assert!(early > 0.0 && early < 15.0);
    }

    #[test]
    fn empty_box_is_ignored() {
        let mut card = TiltCard::default();
        card.pointer_move(10.0, 10.0, 0.0, 100.0);
        assert!(!card.is_hovered());
    }

    #[test]
    fn spring_survives_huge_frame_gap() {
        let mut spring = Spring::new(0.0);
        spring.target = 1.0;
        spring.advance(60.0);
        assert!(spring.value.is_finite());
    }

    #[test]
    fn stiffer_spring_closes_the_gap_faster() {
        let mut soft = Spring::new(0.0);
        let mut stiff = Spring::with_params(0.0, 200.0, 25.0, 0.5);
        soft.target = 1.0;
        stiff.target = 1.0;
        soft.advance(0.05);
        stiff.advance(0.05);
        assert!(stiff.value > soft.value);
    }

    #[test]
    fn flat_card_matrix_is_identity() {
        let card = TiltCard::default();
        let m = card.matrix();
        let identity = [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        for (a, b) in m.iter().zip(identity.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!(card.transform().starts_with("perspective(1000px) matrix3d(1.000000, "));
        assert!(!card.transform().contains("-0.000000"));
    }

    #[test]
    fn tilted_matrix_rotates_about_y() {
        let mut card = TiltCard::new(30.0, 1.0, 800.0);
        card.pointer_move(100.0, 50.0, 100.0, 100.0);
        settle(&mut card);
        let m = card.matrix();
        let angle = 30f32.to_radians();
        // first column of a pure Y rotation: (cos, 0, -sin, 0)
        assert!((m[0] - angle.cos()).abs() < 1e-3);
        assert!((m[2] + angle.sin()).abs() < 1e-3);
    }
}
