use std::sync::Arc;

use newengine_os::{HostContext, HostError, HostResult, LoopControl, MainLoop};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, WindowAttributes, WindowId},
};

use crate::window_slot::WindowSlot;

struct App<'a> {
    host: &'a mut HostContext,
    main_loop: &'a mut dyn MainLoop,
    slot: WindowSlot,

    started: bool,
    exit_requested: bool,
    finished: bool,
    error: Option<HostError>,
}

impl App<'_> {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> HostResult<()> {
        let cfg = &self.host.config().window;
        let centered = cfg.centered;

        let mut attrs = WindowAttributes::default()
            .with_title(cfg.title.clone())
            .with_inner_size(LogicalSize::new(cfg.width, cfg.height));
        if cfg.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| HostError::Failed(format!("create window: {e}")))?;
        self.slot.set(Arc::new(window));
        log::info!("winit: window created");

        if centered {
            if let Some(display) = self.host.display_mut() {
                display.center_window();
            }
        }
        Ok(())
    }

    #[inline]
    fn request_redraw(&self) {
        if let Some(w) = self.slot.get() {
            w.request_redraw();
        }
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        if self.finished {
            return;
        }
        self.finished = true;

        if self.started {
            self.main_loop.finish(self.host);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: HostError) {
        log::error!("winit: {}", err);
        self.error.get_or_insert(err);
        self.finish(event_loop);
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.slot.is_empty() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
                return;
            }
        }

        if !self.started {
            self.started = true;
            self.main_loop.init(self.host);
        }

        // Kick first frame.
        self.request_redraw();
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.exit_requested = true,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.exit_requested = true,
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if !self.started || self.finished {
            return;
        }

        if self.exit_requested {
            self.finish(event_loop);
            return;
        }

        // Drive the host once per loop iteration.
        match self.host.iteration(self.main_loop) {
            Ok(LoopControl::Continue) => self.request_redraw(),
            Ok(LoopControl::Quit) => self.finish(event_loop),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

/// Runs `main_loop` inside a winit event loop.
///
/// The host must already be past `initialize_os`; the window is created on
/// the first resume and published through `slot` so the winit display backend
/// can reach it. The caller finalizes the host afterwards.
pub fn run_winit_app(
    host: &mut HostContext,
    main_loop: &mut dyn MainLoop,
    slot: WindowSlot,
) -> HostResult<()> {
    let event_loop = EventLoop::new().map_err(|e| HostError::Failed(e.to_string()))?;

    let mut app = App {
        host,
        main_loop,
        slot: slot.clone(),
        started: false,
        exit_requested: false,
        finished: false,
        error: None,
    };

    let run = event_loop
        .run_app(&mut app)
        .map_err(|e| HostError::Failed(e.to_string()));
    let error = app.error.take();
    slot.clear();

    run?;
    error.map_or(Ok(()), Err)
}
