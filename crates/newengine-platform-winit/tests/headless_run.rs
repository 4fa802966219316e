use std::sync::Arc;

use parking_lot::Mutex;

use newengine_os::display::Point;
use newengine_os::{FrameTime, HostConfig, HostContext, LoopControl, MainLoop, Phase};
use newengine_platform_winit::{wants_event_loop, DesktopOs};

struct Probe {
    frames: u32,
    log: Arc<Mutex<Vec<String>>>,
}

impl MainLoop for Probe {
    fn init(&mut self, host: &mut HostContext) {
        if let Some(display) = host.display_mut() {
            display.center_window();
        }
        self.log.lock().push("init".into());
    }

    fn iteration(&mut self, host: &mut HostContext, frame: &FrameTime) -> LoopControl {
        self.frames += 1;
        if frame.frame_index == 0 {
            let log = self.log.clone();
            host.deferred()
                .call_deferred(move || log.lock().push("deferred".into()))
                .unwrap();
        }
        if self.frames == 3 {
            LoopControl::Quit
        } else {
            LoopControl::Continue
        }
    }

    fn finish(&mut self, _host: &mut HostContext) {
        self.log.lock().push("finish".into());
    }
}

fn headless_config() -> HostConfig {
    let mut config = HostConfig::default();
    config.display.backend = "headless".into();
    config.window.width = 800;
    config.window.height = 600;
    config.os.low_processor_usage_mode = true;
    config.os.low_processor_usage_mode_sleep_usec = 100;
    config.project.name = "Headless Test".into();
    config
}

#[test]
fn desktop_host_runs_headless_to_completion() {
    let config = headless_config();
    assert!(!wants_event_loop(&config));

    let mut host = HostContext::new(Box::new(DesktopOs::new(&config.project.name)), config);
    host.set_cmdline("newengine", vec!["--headless".into()]).unwrap();
    host.initialize_core().unwrap();
    host.initialize_os().unwrap();

    assert!(host.os().has_feature("pc"));
    assert_eq!(host.os().get_audio_driver_name(0), "Dummy");
    assert_eq!(host.audio().active(), Some(0));
    assert!(host.os().get_splash_tick_msec() <= host.os().get_ticks_msec());

    let display = host.display().unwrap();
    assert_eq!(display.backend_name(), "headless");
    assert!(display.is_vsync_enabled());

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut probe = Probe {
        frames: 0,
        log: log.clone(),
    };
    host.run(&mut probe).unwrap();

    assert_eq!(probe.frames, 3);
    assert_eq!(*log.lock(), vec!["init", "deferred", "finish"]);
    assert_eq!(
        host.display().unwrap().get_window_position(),
        Point::new(560, 240)
    );

    host.finalize_os().unwrap();
    host.finalize_core().unwrap();
    assert_eq!(host.phase(), Phase::CoreFinalized);
}

#[test]
fn unknown_display_backend_fails_initialize_os() {
    let mut config = headless_config();
    config.display.backend = "framebuffer".into();

    let mut host = HostContext::new(Box::new(DesktopOs::new("x")), config);
    host.set_cmdline("newengine", Vec::new()).unwrap();
    host.initialize_core().unwrap();
    assert!(host.initialize_os().is_err());
    assert!(host.display().is_none());
    assert_eq!(host.phase(), Phase::CoreInitialized);
}
