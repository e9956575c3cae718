/// How many simulation updates a host frame should run.
///
/// `PerFrame` couples simulation speed to the display refresh rate: every
/// per-tick increment (orbit phase, spin, camera lerp) is applied once per
/// animation-frame callback. `Fixed` decouples it with an accumulator.
#[derive(Debug, Clone)]
pub enum TickMode {
    PerFrame,
    Fixed(FixedTimestep),
}

impl TickMode {
    pub fn from_fixed_dt(fixed_dt: Option<f32>) -> Self {
        match fixed_dt {
            Some(dt) if dt > 0.0 => TickMode::Fixed(FixedTimestep::new(dt)),
            _ => TickMode::PerFrame,
        }
    }

    /// Number of updates to run for a frame that took `frame_dt` seconds.
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        match self {
            TickMode::PerFrame => 1,
            TickMode::Fixed(ts) => ts.accumulate(frame_dt),
        }
    }
}

/// Fixed timestep accumulator.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Upper bound on catch-up steps after a long stall (tab in background).
    const MAX_STEPS: u32 = 8;

    pub fn new(dt: f32) -> Self {
        Self { dt, accumulator: 0.0 }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
