// Caps how often the animation-frame callback does real work

#[derive(Clone, Debug)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_executed: Option<f64>,
}

impl FrameThrottle {
    pub fn new(interval_ms: f64) -> Self {
        FrameThrottle {
            interval_ms,
            last_executed: None,
        }
    }

    // True when at least one interval has passed since the last executed frame.
    // The first frame after a reset always runs.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_executed {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_executed = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_executed = None;
    }
}
