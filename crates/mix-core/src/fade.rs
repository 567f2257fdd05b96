//! Whole-mix transport fades and how they gate per-frame gain writes.
//!
//! A transport fade owns every source gain until its deadline. The per-frame
//! spatial pass asks [`FadeState::gain_write`] what it may do:
//! nothing while fading out, retarget the running ramp while fading in, or
//! write directly when idle.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FadePhase {
    #[default]
    Idle,
    FadingIn,
    FadingOut,
}

/// How the spatial pass may touch gains this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GainWrite {
    /// A fade-out ramp is running; leave it alone.
    Skip,
    /// Ramp from the instantaneous gain to the new target, ending at this time.
    RampUntil(f64),
    /// No transport fade; write (smoothed) gains immediately.
    Direct,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FadeState {
    pub phase: FadePhase,
    pub deadline: f64,
}

impl FadeState {
    pub fn fade_in(&mut self, now: f64, duration: f64) {
        self.begin(FadePhase::FadingIn, now, duration);
    }

    pub fn fade_out(&mut self, now: f64, duration: f64) {
        self.begin(FadePhase::FadingOut, now, duration);
    }

    fn begin(&mut self, phase: FadePhase, now: f64, duration: f64) {
        self.phase = phase;
        self.deadline = now + duration.max(0.0);
    }

    /// Returns to idle once the deadline has passed, yielding the phase that
    /// just completed.
    pub fn settle(&mut self, now: f64) -> Option<FadePhase> {
        if self.phase != FadePhase::Idle && now >= self.deadline {
            let done = self.phase;
            self.phase = FadePhase::Idle;
            return Some(done);
        }
        None
    }

    pub fn gain_write(&self, now: f64) -> GainWrite {
        match self.phase {
            FadePhase::FadingOut if now < self.deadline => GainWrite::Skip,
            FadePhase::FadingIn if now < self.deadline => GainWrite::RampUntil(self.deadline),
            _ => GainWrite::Direct,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == FadePhase::Idle
    }
}
