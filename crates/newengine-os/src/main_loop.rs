use crate::context::HostContext;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct FrameTime {
    /// Seconds since the previous iteration (0 on the first one).
    pub dt_sec: f32,

    /// Seconds since the first iteration.
    pub t_sec: f64,

    pub frame_index: u64,

    pub ticks_usec: u64,
}

impl FrameTime {
    pub(crate) fn first(now_usec: u64) -> Self {
        Self {
            ticks_usec: now_usec,
            ..Self::default()
        }
    }

    pub(crate) fn next(&self, now_usec: u64, start_usec: u64) -> Self {
        Self {
            dt_sec: now_usec.saturating_sub(self.ticks_usec) as f32 / 1_000_000.0,
            t_sec: now_usec.saturating_sub(start_usec) as f64 / 1_000_000.0,
            frame_index: self.frame_index + 1,
            ticks_usec: now_usec,
        }
    }
}

/// Game/editor loop driven by the host.
pub trait MainLoop {
    fn init(&mut self, _host: &mut HostContext) {}

    fn iteration(&mut self, host: &mut HostContext, frame: &FrameTime) -> LoopControl;

    fn finish(&mut self, _host: &mut HostContext) {}
}
