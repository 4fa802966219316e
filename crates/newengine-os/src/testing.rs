//! In-memory backends for unit tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::dialog::{ChoiceCallback, NativeDialogs, TextCallback};
use crate::display::{DisplayBackend, Point, Size};
use crate::drivers::{AudioDriverManager, DummyAudioDriver};
use crate::error::{HostError, HostResult};
use crate::os::{Date, ExecOptions, ExecOutput, OsBackend, OsSetup, ProcessId, Time, TimeZoneInfo};

pub(crate) struct Geometry {
    pub(crate) screens: Vec<(Point, Size)>,
    pub(crate) current_screen: usize,
    pub(crate) window_position: Point,
    pub(crate) window_size: Size,
    pub(crate) fullscreen: bool,
    pub(crate) title: String,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            screens: vec![(Point::new(0, 0), Size::new(1920, 1080))],
            current_screen: 0,
            window_position: Point::default(),
            window_size: Size::new(1024, 600),
            fullscreen: false,
            title: String::new(),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeDisplayState {
    pub(crate) geometry: Arc<Mutex<Geometry>>,
    pub(crate) vsync_calls: Arc<Mutex<Vec<bool>>>,
    pub(crate) native_dialogs: Arc<Mutex<usize>>,
    pub(crate) processed_events: Arc<Mutex<usize>>,
}

pub(crate) struct FakeDisplay {
    state: FakeDisplayState,
    native: bool,
}

impl FakeDisplay {
    pub(crate) fn new() -> (Self, FakeDisplayState) {
        let state = FakeDisplayState::default();
        (
            Self {
                state: state.clone(),
                native: false,
            },
            state,
        )
    }

    pub(crate) fn with_native_dialogs() -> (Self, FakeDisplayState) {
        let (mut display, state) = Self::new();
        display.native = true;
        (display, state)
    }
}

impl DisplayBackend for FakeDisplay {
    fn name(&self) -> &str {
        "fake"
    }

    fn is_window_fullscreen(&self) -> bool {
        self.state.geometry.lock().fullscreen
    }

    fn set_window_fullscreen(&mut self, enabled: bool) {
        self.state.geometry.lock().fullscreen = enabled;
    }

    fn get_screen_count(&self) -> usize {
        self.state.geometry.lock().screens.len()
    }

    fn get_current_screen(&self) -> usize {
        self.state.geometry.lock().current_screen
    }

    fn get_screen_position(&self, screen: usize) -> Point {
        self.state
            .geometry
            .lock()
            .screens
            .get(screen)
            .map(|s| s.0)
            .unwrap_or_default()
    }

    fn get_screen_size(&self, screen: usize) -> Size {
        self.state
            .geometry
            .lock()
            .screens
            .get(screen)
            .map(|s| s.1)
            .unwrap_or_default()
    }

    fn get_window_position(&self) -> Point {
        self.state.geometry.lock().window_position
    }

    fn set_window_position(&mut self, position: Point) {
        self.state.geometry.lock().window_position = position;
    }

    fn get_window_size(&self) -> Size {
        self.state.geometry.lock().window_size
    }

    fn set_window_size(&mut self, size: Size) {
        self.state.geometry.lock().window_size = size;
    }

    fn set_window_title(&mut self, title: &str) {
        self.state.geometry.lock().title = title.to_string();
    }

    fn switch_vsync(&mut self, enabled: bool) {
        self.state.vsync_calls.lock().push(enabled);
    }

    fn process_events(&mut self) {
        *self.state.processed_events.lock() += 1;
    }

    fn native_dialogs(&mut self) -> Option<&mut dyn NativeDialogs> {
        if self.native {
            Some(self)
        } else {
            None
        }
    }
}

impl NativeDialogs for FakeDisplay {
    fn show_choice(
        &mut self,
        _title: &str,
        _description: &str,
        _buttons: &[String],
        _callback: Option<ChoiceCallback>,
    ) -> HostResult<()> {
        *self.state.native_dialogs.lock() += 1;
        Ok(())
    }

    fn input_text(
        &mut self,
        _title: &str,
        _description: &str,
        _partial: &str,
        _callback: TextCallback,
    ) -> HostResult<()> {
        *self.state.native_dialogs.lock() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeOsState {
    pub(crate) events: Arc<Mutex<Vec<&'static str>>>,
    pub(crate) slept_usec: Arc<Mutex<u64>>,
    pub(crate) display: Arc<Mutex<Option<FakeDisplayState>>>,
    /// When set, the clock stops advancing and reads this value.
    pub(crate) pinned_ticks: Arc<Mutex<Option<u64>>>,
}

#[derive(Default)]
pub(crate) struct FakeOs {
    pub(crate) state: FakeOsState,
    env: Mutex<HashMap<String, String>>,
    ticks: Mutex<u64>,
}

impl FakeOs {
    pub(crate) fn new() -> (Self, FakeOsState) {
        let os = Self::default();
        let state = os.state.clone();
        (os, state)
    }
}

impl OsBackend for FakeOs {
    fn name(&self) -> &str {
        "Fake"
    }

    fn initialize_core(&mut self, audio: &AudioDriverManager) -> HostResult<()> {
        self.state.events.lock().push("initialize_core");
        audio.add_driver(Box::new(DummyAudioDriver::default()));
        Ok(())
    }

    fn initialize_os(&mut self, setup: &OsSetup<'_>) -> HostResult<Box<dyn DisplayBackend>> {
        self.state.events.lock().push("initialize_os");
        setup.audio.open(setup.audio_driver)?;
        let (display, display_state) = FakeDisplay::new();
        *self.state.display.lock() = Some(display_state);
        Ok(Box::new(display))
    }

    fn finalize_os(&mut self) {
        self.state.events.lock().push("finalize_os");
    }

    fn finalize_core(&mut self) {
        self.state.events.lock().push("finalize_core");
    }

    fn check_internal_feature_support(&self, feature: &str) -> bool {
        feature == "pc"
    }

    fn alert(&self, _text: &str, _title: &str) {}

    fn get_stdin_string(&self, _block: bool) -> String {
        String::new()
    }

    fn execute(
        &mut self,
        _path: &str,
        _args: &[String],
        _options: ExecOptions,
    ) -> HostResult<ExecOutput> {
        Err(HostError::Unavailable("execute"))
    }

    fn kill(&mut self, _pid: ProcessId) -> HostResult<()> {
        Err(HostError::Unavailable("kill"))
    }

    fn has_environment(&self, var: &str) -> bool {
        self.env.lock().contains_key(var)
    }

    fn get_environment(&self, var: &str) -> String {
        self.env.lock().get(var).cloned().unwrap_or_default()
    }

    fn set_environment(&self, var: &str, value: &str) -> bool {
        self.env.lock().insert(var.to_string(), value.to_string());
        true
    }

    fn get_date(&self, _local: bool) -> Date {
        Date::default()
    }

    fn get_time(&self, _local: bool) -> Time {
        Time::default()
    }

    fn get_time_zone_info(&self) -> TimeZoneInfo {
        TimeZoneInfo {
            bias: 0,
            name: "UTC".into(),
        }
    }

    fn delay_usec(&self, usec: u32) {
        *self.state.slept_usec.lock() += u64::from(usec);
    }

    fn get_ticks_usec(&self) -> u64 {
        if let Some(pinned) = *self.state.pinned_ticks.lock() {
            return pinned;
        }
        let mut ticks = self.ticks.lock();
        *ticks += 1_000;
        *ticks
    }
}
