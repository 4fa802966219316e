use std::time::{Duration, Instant};

use newengine_os::{FrameTime, HostContext, LoopControl, MainLoop};

use crate::signals::ShutdownFlag;

/// Default loop of the host binary: keeps the window alive, logs frame rate
/// and stops on Ctrl+C or after an optional frame budget.
pub struct HostLoop {
    shutdown: ShutdownFlag,
    quit_after: Option<u64>,

    fps_last: Instant,
    fps_frames: u32,
    fps_period: Duration,
}

impl HostLoop {
    pub fn new(shutdown: ShutdownFlag, quit_after: Option<u64>) -> Self {
        Self {
            shutdown,
            quit_after,
            fps_last: Instant::now(),
            fps_frames: 0,
            fps_period: Duration::from_secs(1),
        }
    }

    fn frame_tick(&mut self, host: &HostContext, frame: &FrameTime) {
        self.fps_frames += 1;
        let elapsed = self.fps_last.elapsed();
        if elapsed < self.fps_period {
            return;
        }

        let fps = self.fps_frames as f32 / elapsed.as_secs_f32().max(0.0001);
        host.os().print_verbose(format_args!(
            "fps={:.1} dt_ms={:.2} frame={}\n",
            fps,
            frame.dt_sec * 1000.0,
            frame.frame_index
        ));

        self.fps_frames = 0;
        self.fps_last = Instant::now();
    }
}

impl MainLoop for HostLoop {
    fn init(&mut self, host: &mut HostContext) {
        let os = host.os();
        os.print(format_args!(
            "{} on {} ({} cpus, locale {})\n",
            host.config().window.title,
            os.get_name(),
            os.get_processor_count(),
            os.get_locale()
        ));
        if let Some(display) = host.display() {
            os.print_verbose(format_args!(
                "display: {} video={} vsync={}\n",
                display.backend_name(),
                display.get_video_driver_name(display.get_current_video_driver()),
                display.is_vsync_enabled()
            ));
        }
        self.fps_last = Instant::now();
    }

    fn iteration(&mut self, host: &mut HostContext, frame: &FrameTime) -> LoopControl {
        if self.shutdown.is_set() {
            log::info!("host: shutdown requested");
            return LoopControl::Quit;
        }
        if let Some(limit) = self.quit_after {
            if frame.frame_index + 1 >= limit {
                return LoopControl::Quit;
            }
        }

        self.frame_tick(host, frame);
        LoopControl::Continue
    }

    fn finish(&mut self, host: &mut HostContext) {
        host.os()
            .print_verbose(format_args!("host: main loop finished\n"));
    }
}
