use std::fmt;
use std::sync::Arc;

use crate::config::HostConfig;
use crate::deferred::{DeferredQueue, DeferredSender};
use crate::dialog::{self, ChoiceCallback, TextCallback};
use crate::display::DisplayService;
use crate::drivers::AudioDriverManager;
use crate::error::HostResult;
use crate::lifecycle::{self, Phase};
use crate::main_loop::{FrameTime, LoopControl, MainLoop};
use crate::os::{OsBackend, OsService, OsSetup};

/// Owns the OS and display services for one process run and walks them
/// through the entry contract:
/// `set_cmdline` → `initialize_core` → `initialize_os` → `run`/`iteration`
/// → `finalize_os` → `finalize_core`.
///
/// Every step checks the current [`Phase`] and fails with
/// [`HostError::InvalidState`](crate::HostError::InvalidState) when called out of order.
pub struct HostContext {
    // Field order is drop order: display goes before os.
    display: Option<DisplayService>,
    os: OsService,
    deferred: DeferredQueue,
    audio: Arc<AudioDriverManager>,
    config: HostConfig,
    phase: Phase,

    frame: Option<FrameTime>,
    start_usec: u64,
}

impl HostContext {
    pub fn new(backend: Box<dyn OsBackend>, config: HostConfig) -> Self {
        let audio = Arc::new(AudioDriverManager::new());
        let mut os = OsService::new(backend, audio.clone());

        os.set_low_processor_usage_mode(config.os.low_processor_usage_mode);
        os.set_low_processor_usage_mode_sleep_usec(config.os.low_processor_usage_mode_sleep_usec);
        os.set_verbose_stdout(config.os.verbose_stdout);
        os.set_custom_features(config.project.custom_features.iter().cloned());

        log::info!("host: constructed (backend={})", os.get_name());

        Self {
            display: None,
            os,
            deferred: DeferredQueue::new(),
            audio,
            config,
            phase: Phase::Constructed,
            frame: None,
            start_usec: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[inline]
    pub fn os(&self) -> &OsService {
        &self.os
    }

    #[inline]
    pub fn os_mut(&mut self) -> &mut OsService {
        &mut self.os
    }

    /// `None` before `initialize_os` and after `finalize_os`.
    #[inline]
    pub fn display(&self) -> Option<&DisplayService> {
        self.display.as_ref()
    }

    #[inline]
    pub fn display_mut(&mut self) -> Option<&mut DisplayService> {
        self.display.as_mut()
    }

    #[inline]
    pub fn audio(&self) -> &AudioDriverManager {
        &self.audio
    }

    #[inline]
    pub fn deferred(&self) -> DeferredSender {
        self.deferred.sender()
    }

    /// Runs queued deferred calls now. Returns how many ran.
    #[inline]
    pub fn flush_deferred(&self) -> usize {
        self.deferred.flush()
    }

    // ---- entry contract -----------------------------------------------

    pub fn set_cmdline(&mut self, exec_path: &str, args: Vec<String>) -> HostResult<()> {
        lifecycle::require("set_cmdline", self.phase, Phase::Constructed)?;
        self.os.set_cmdline(exec_path, args);
        self.phase = Phase::CmdlineSet;
        Ok(())
    }

    pub fn initialize_core(&mut self) -> HostResult<()> {
        lifecycle::require("initialize_core", self.phase, Phase::CmdlineSet)?;
        self.os.backend_mut().initialize_core(&self.audio)?;
        self.phase = Phase::CoreInitialized;
        log::info!(
            "host: core initialized ({} audio drivers)",
            self.os.get_audio_driver_count()
        );
        Ok(())
    }

    pub fn initialize_os(&mut self) -> HostResult<()> {
        lifecycle::require("initialize_os", self.phase, Phase::CoreInitialized)?;

        let audio_driver = self.resolve_audio_driver();
        let setup = OsSetup {
            config: &self.config,
            audio: &self.audio,
            audio_driver,
        };
        let backend = match self.os.backend_mut().initialize_os(&setup) {
            Ok(backend) => backend,
            Err(e) => {
                self.audio.close();
                return Err(e);
            }
        };

        let mut display = DisplayService::new(backend, self.deferred.sender());
        if let Err(e) = display.apply_config(&self.config.display) {
            drop(display);
            self.os.backend_mut().finalize_os();
            self.audio.close();
            return Err(e);
        }

        log::info!("host: os initialized (display={})", display.backend_name());
        self.display = Some(display);
        self.os.mark_splash_tick();
        self.phase = Phase::OsInitialized;
        Ok(())
    }

    /// Repeats [`iteration`](Self::iteration) until the loop asks to quit.
    pub fn run(&mut self, main_loop: &mut dyn MainLoop) -> HostResult<()> {
        lifecycle::require("run", self.phase, Phase::OsInitialized)?;

        main_loop.init(self);
        let result = loop {
            match self.iteration(main_loop) {
                Ok(LoopControl::Continue) => continue,
                Ok(LoopControl::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        main_loop.finish(self);
        result
    }

    /// One main-loop step: pump display events, drain deferred calls, run the
    /// loop body, then nap when low-processor mode is on.
    pub fn iteration(&mut self, main_loop: &mut dyn MainLoop) -> HostResult<LoopControl> {
        lifecycle::require("iteration", self.phase, Phase::OsInitialized)?;

        let now = self.os.get_ticks_usec();
        let frame = match &self.frame {
            None => {
                self.start_usec = now;
                FrameTime::first(now)
            }
            Some(prev) => prev.next(now, self.start_usec),
        };
        self.frame = Some(frame.clone());

        if let Some(display) = self.display.as_mut() {
            display.process_events();
        }
        self.deferred.flush();

        let control = main_loop.iteration(self, &frame);

        if self.os.is_in_low_processor_usage_mode() {
            self.os
                .delay_usec(self.os.get_low_processor_usage_mode_sleep_usec());
        }

        Ok(control)
    }

    pub fn finalize_os(&mut self) -> HostResult<()> {
        lifecycle::require("finalize_os", self.phase, Phase::OsInitialized)?;
        self.display = None;
        self.os.backend_mut().finalize_os();
        self.audio.close();
        self.phase = Phase::OsFinalized;
        log::info!("host: os finalized");
        Ok(())
    }

    pub fn finalize_core(&mut self) -> HostResult<()> {
        lifecycle::require("finalize_core", self.phase, Phase::OsFinalized)?;
        self.os.backend_mut().finalize_core();
        self.phase = Phase::CoreFinalized;
        log::info!("host: core finalized");
        Ok(())
    }

    // ---- dialogs --------------------------------------------------------

    /// Choice dialog through the display service, or straight to the console
    /// when no display exists.
    pub fn dialog_show(
        &mut self,
        title: &str,
        description: &str,
        buttons: &[String],
        callback: Option<ChoiceCallback>,
    ) -> HostResult<()> {
        match self.display.as_mut() {
            Some(display) => display.dialog_show(&self.os, title, description, buttons, callback),
            None => dialog::console_choice(
                &self.os,
                &self.deferred.sender(),
                title,
                description,
                buttons,
                callback,
            ),
        }
    }

    pub fn dialog_input_text(
        &mut self,
        title: &str,
        description: &str,
        partial: &str,
        callback: Option<TextCallback>,
    ) -> HostResult<()> {
        match self.display.as_mut() {
            Some(display) => {
                display.dialog_input_text(&self.os, title, description, partial, callback)
            }
            None => dialog::console_input_text(
                &self.os,
                &self.deferred.sender(),
                title,
                description,
                partial,
                callback,
            ),
        }
    }

    fn resolve_audio_driver(&self) -> usize {
        let wanted = &self.config.os.audio_driver;
        if wanted.is_empty() {
            return 0;
        }
        match self.audio.find(wanted) {
            Some(index) => index,
            None => {
                log::warn!("host: audio driver '{}' not registered, using default", wanted);
                0
            }
        }
    }
}

impl Drop for HostContext {
    fn drop(&mut self) {
        if self.phase == Phase::OsInitialized {
            log::warn!("host: dropped while running, finalizing");
            let _ = self.finalize_os();
        }
        match self.phase {
            Phase::CoreInitialized => {
                self.os.backend_mut().finalize_core();
                self.phase = Phase::CoreFinalized;
            }
            Phase::OsFinalized => {
                let _ = self.finalize_core();
            }
            _ => {}
        }
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("phase", &self.phase)
            .field("os", &self.os)
            .field("display", &self.display)
            .finish()
    }
}
