// Spring-driven cursor follower. The host forwards window pointer events and
// a frame delta, and applies the size, background and transform it reports.
// Hovering links/buttons grows the ring; hovering text fields shrinks it to
// a caret.

use crate::color::Color;
use crate::tilt::Spring;
use wasm_bindgen::prelude::*;
use web_sys::Element;

const INTERACTIVE_TAGS: [&str; 2] = ["A", "BUTTON"];
const TEXT_TAGS: [&str; 2] = ["INPUT", "TEXTAREA"];

#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorVariant {
    Default,
    Interactive,
    Text,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VariantStyle {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub background: Option<Color>,
    pub border_width: f64,
    pub border_radius: &'static str,
}

impl CursorVariant {
    pub fn style(self) -> VariantStyle {
        match self {
            CursorVariant::Default => VariantStyle {
                width: 32.0,
                height: 32.0,
                scale: 1.0,
                stiffness: 150.0,
                damping: 20.0,
                mass: 0.5,
                background: Some(Color::from_rgb(Color::ACCENT).with_alpha(0.1)),
                border_width: 2.0,
                border_radius: "50%",
            },
            CursorVariant::Interactive => VariantStyle {
                width: 60.0,
                height: 60.0,
                scale: 1.1,
                stiffness: 200.0,
                damping: 25.0,
                mass: 0.5,
                background: Some(Color::from_rgb(0x415a77).with_alpha(0.4)),
                border_width: 2.0,
                border_radius: "50%",
            },
            CursorVariant::Text => VariantStyle {
                width: 4.0,
                height: 28.0,
                scale: 1.0,
                stiffness: 200.0,
                damping: 25.0,
                mass: 0.5,
                background: None,
                border_width: 0.0,
                border_radius: "2px",
            },
        }
    }

    // Tag names of the hovered element and its ancestors. Text fields win
    // over links and buttons.
    pub fn for_tags<'a, I>(tags: I) -> CursorVariant
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut variant = CursorVariant::Default;
        for tag in tags {
            if TEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return CursorVariant::Text;
            }
            if INTERACTIVE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                variant = CursorVariant::Interactive;
            }
        }
        variant
    }

    fn is_hoverable(tag: &str) -> bool {
        TEXT_TAGS
            .iter()
            .chain(INTERACTIVE_TAGS.iter())
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[wasm_bindgen]
pub struct CursorFollower {
    variant: CursorVariant,
    pointer: [f64; 2],
    x: Spring,
    y: Spring,
    width: Spring,
    height: Spring,
    scale: Spring,
}

impl Default for CursorFollower {
    fn default() -> Self {
        CursorFollower::new()
    }
}

#[wasm_bindgen]
impl CursorFollower {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CursorFollower {
        let style = CursorVariant::Default.style();
        let spring = |value| Spring::with_params(value, style.stiffness, style.damping, style.mass);
        CursorFollower {
            variant: CursorVariant::Default,
            pointer: [0.0, 0.0],
            x: spring(-style.width / 2.0),
            y: spring(-style.height / 2.0),
            width: spring(style.width),
            height: spring(style.height),
            scale: spring(style.scale),
        }
    }

    // Pointer position in viewport coordinates
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = [x, y];
        self.retarget();
    }

    pub fn set_variant(&mut self, variant: CursorVariant) {
        if variant == self.variant {
            return;
        }
        self.variant = variant;
        let style = variant.style();
        for spring in self.springs_mut() {
            spring.set_params(style.stiffness, style.damping, style.mass);
        }
        self.retarget();
    }

    // pointerover: pick the variant from the target and its ancestors
    pub fn pointer_over(&mut self, target: &Element) {
        let tags = ancestor_tags(target);
        self.set_variant(CursorVariant::for_tags(tags.iter().map(String::as_str)));
    }

    // pointerout: fall back to the default ring unless the pointer moved
    // into another link, button or text field
    pub fn pointer_out(&mut self, target: &Element, related: Option<Element>) {
        let leaving = ancestor_tags(target)
            .iter()
            .any(|tag| CursorVariant::is_hoverable(tag));
        let entering = related
            .map(|el| {
                ancestor_tags(&el)
                    .iter()
                    .any(|tag| CursorVariant::is_hoverable(tag))
            })
            .unwrap_or(false);
        if leaving && !entering {
            self.set_variant(CursorVariant::Default);
        }
    }

    pub fn advance(&mut self, delta_ms: f64) {
        let secs = delta_ms / 1000.0;
        for spring in self.springs_mut() {
            spring.advance(secs);
        }
    }

    pub fn variant(&self) -> CursorVariant {
        self.variant
    }

    pub fn left(&self) -> f64 {
        self.x.value
    }

    pub fn top(&self) -> f64 {
        self.y.value
    }

    pub fn width(&self) -> f64 {
        self.width.value
    }

    pub fn height(&self) -> f64 {
        self.height.value
    }

    pub fn scale(&self) -> f64 {
        self.scale.value
    }

    pub fn background(&self) -> String {
        match self.variant.style().background {
            Some(color) => color.to_css(),
            None => "transparent".to_owned(),
        }
    }

    pub fn border_width(&self) -> f64 {
        self.variant.style().border_width
    }

    pub fn border_radius(&self) -> String {
        self.variant.style().border_radius.to_owned()
    }

    pub fn transform(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) scale({:.3})",
            self.x.value + 0.0,
            self.y.value + 0.0,
            self.scale.value
        )
    }
}

impl CursorFollower {
    // Centers the shape of the current variant on the pointer
    fn retarget(&mut self) {
        let style = self.variant.style();
        self.x.target = self.pointer[0] - style.width / 2.0;
        self.y.target = self.pointer[1] - style.height / 2.0;
        self.width.target = style.width;
        self.height.target = style.height;
        self.scale.target = style.scale;
    }

    fn springs_mut(&mut self) -> [&mut Spring; 5] {
        [
            &mut self.x,
            &mut self.y,
            &mut self.width,
            &mut self.height,
            &mut self.scale,
        ]
    }

    pub fn is_settled(&self) -> bool {
        [&self.x, &self.y, &self.width, &self.height, &self.scale]
            .iter()
            .all(|s| s.is_settled())
    }
}

fn ancestor_tags(element: &Element) -> Vec<String> {
    let mut tags = vec![element.tag_name()];
    let mut current = element.parent_element();
    while let Some(el) = current {
        tags.push(el.tag_name());
        current = el.parent_element();
    }
    tags
}
