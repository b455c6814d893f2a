// Counts executed frames and reports frames-per-second once a second

#[derive(Clone, Debug, Default)]
pub struct FrameMeter {
    window_start: Option<f64>,
    frames: u32,
    last_fps: Option<u32>,
}

impl FrameMeter {
    pub const WINDOW_MS: f64 = 1000.0;

    pub fn new() -> Self {
        Self::default()
    }

    // Returns a fresh sample when the current window closes
    pub fn record(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now_ms);
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed < Self::WINDOW_MS {
            return None;
        }
        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = Some(now_ms);
        self.last_fps = Some(fps);
        Some(fps)
    }

    pub fn fps(&self) -> Option<u32> {
        self.last_fps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
