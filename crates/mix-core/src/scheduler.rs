//! Cancel-then-schedule wrapper around a host parameter.
//!
//! Every write first cancels what was pending on the node, so a parameter
//! never carries more than one ramp. The last issued schedule is mirrored
//! locally; that lets the engine read the instantaneous value when it needs
//! to start a new ramp from wherever the old one currently is.

use crate::host::{AudioGraphHost, HostError, NodeId};

/// Linear transition from `from` at `start` to `to` at `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    pub from: f32,
    pub to: f32,
    pub start: f64,
    pub end: f64,
}

impl Ramp {
    pub fn value_at(&self, time: f64) -> f32 {
        if time <= self.start {
            return self.from;
        }
        if time >= self.end || self.end <= self.start {
            return self.to;
        }
        let t = ((time - self.start) / (self.end - self.start)) as f32;
        self.from + (self.to - self.from) * t
    }
}

#[derive(Clone, Debug)]
pub struct ScheduledParam {
    node: NodeId,
    schedule: Ramp,
}

impl ScheduledParam {
    pub fn new(node: NodeId, initial: f32) -> Self {
        Self {
            node,
            schedule: Ramp {
                from: initial,
                to: initial,
                start: 0.0,
                end: 0.0,
            },
        }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Value the host is producing at `time`, per the last schedule issued.
    #[inline]
    pub fn value_at(&self, time: f64) -> f32 {
        self.schedule.value_at(time)
    }

    /// The ramp still in flight at `now`, if any.
    pub fn active_ramp(&self, now: f64) -> Option<&Ramp> {
        (self.schedule.end > now && self.schedule.end > self.schedule.start).then_some(&self.schedule)
    }

    /// Replaces any pending automation with a ramp `from -> to` over
    /// `[start, end]`.
    pub fn schedule_ramp<H: AudioGraphHost + ?Sized>(
        &mut self,
        host: &mut H,
        from: f32,
        to: f32,
        start: f64,
        end: f64,
    ) -> Result<(), HostError> {
        host.cancel_scheduled_values(self.node, start)?;
        host.set_value_at_time(self.node, from, start)?;
        host.linear_ramp_to_value_at_time(self.node, to, end)?;
        self.schedule = Ramp {
            from,
            to,
            start,
            end,
        };
        Ok(())
    }

    /// Replaces any pending automation with an immediate value.
    pub fn write<H: AudioGraphHost + ?Sized>(
        &mut self,
        host: &mut H,
        value: f32,
        now: f64,
    ) -> Result<(), HostError> {
        host.cancel_scheduled_values(self.node, now)?;
        host.set_value_at_time(self.node, value, now)?;
        self.schedule = Ramp {
            from: value,
            to: value,
            start: now,
            end: now,
        };
        Ok(())
    }
}
