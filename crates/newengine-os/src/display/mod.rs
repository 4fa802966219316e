//! Window, screen and input-adjacent services.

mod backend;
mod types;

pub use backend::DisplayBackend;
pub use types::{
    CursorShape, LatinKeyboardVariant, MouseMode, Point, Rect, RenderThreadMode,
    ScreenOrientation, Size,
};

use std::fmt;
use std::sync::Arc;

use crate::config::DisplayConfig;
use crate::deferred::DeferredSender;
use crate::dialog::{self, ChoiceCallback, Console, TextCallback};
use crate::error::{HostError, HostResult};

/// Redirects vsync changes to another execution context (usually the render thread).
pub type VsyncSwitch = Arc<dyn Fn(bool) + Send + Sync>;

pub const VIDEO_DRIVERS: [&str; 2] = ["GLES2", "GLES3"];
pub const INVALID_VIDEO_DRIVER: &str = "INVALID VIDEO DRIVER";

#[inline]
pub fn video_driver_index(name: &str) -> Option<usize> {
    VIDEO_DRIVERS.iter().position(|d| d.eq_ignore_ascii_case(name))
}

pub struct DisplayService {
    backend: Box<dyn DisplayBackend>,
    deferred: DeferredSender,

    keep_screen_on: bool,
    no_window: bool,
    orientation: ScreenOrientation,
    render_thread_mode: RenderThreadMode,
    allow_hidpi: bool,
    allow_layered: bool,
    emulate_touch_from_mouse: bool,

    use_vsync: bool,
    vsync_switch: Option<VsyncSwitch>,

    video_driver: usize,
    local_clipboard: String,
}

impl DisplayService {
    pub fn new(backend: Box<dyn DisplayBackend>, deferred: DeferredSender) -> Self {
        Self {
            backend,
            deferred,
            keep_screen_on: true,
            no_window: false,
            orientation: ScreenOrientation::Landscape,
            render_thread_mode: RenderThreadMode::Safe,
            allow_hidpi: false,
            allow_layered: false,
            emulate_touch_from_mouse: false,
            use_vsync: false,
            vsync_switch: None,
            video_driver: 1,
            local_clipboard: String::new(),
        }
    }

    /// Pushes the `[display]` section through the regular setters.
    pub fn apply_config(&mut self, cfg: &DisplayConfig) -> HostResult<()> {
        self.video_driver = video_driver_index(&cfg.video_driver).ok_or_else(|| {
            HostError::InvalidParameter(format!("unknown video driver '{}'", cfg.video_driver))
        })?;
        self.no_window = cfg.no_window;
        self.render_thread_mode = cfg.render_thread_mode;
        self.allow_hidpi = cfg.allow_hidpi;
        self.allow_layered = cfg.allow_layered;
        self.emulate_touch_from_mouse = cfg.emulate_touch_from_mouse;
        self.set_keep_screen_on(cfg.keep_screen_on);
        self.set_screen_orientation(cfg.orientation);
        self.set_use_vsync(cfg.vsync);
        Ok(())
    }

    #[inline]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    // ---- flags --------------------------------------------------------

    #[inline]
    pub fn is_keep_screen_on(&self) -> bool {
        self.keep_screen_on
    }

    pub fn set_keep_screen_on(&mut self, enabled: bool) {
        self.keep_screen_on = enabled;
        self.backend.set_keep_screen_on(enabled);
    }

    #[inline]
    pub fn is_no_window_mode_enabled(&self) -> bool {
        self.no_window
    }

    #[inline]
    pub fn set_no_window_mode(&mut self, enabled: bool) {
        self.no_window = enabled;
    }

    #[inline]
    pub fn get_screen_orientation(&self) -> ScreenOrientation {
        self.orientation
    }

    pub fn set_screen_orientation(&mut self, orientation: ScreenOrientation) {
        self.orientation = orientation;
        self.backend.set_screen_orientation(orientation);
    }

    #[inline]
    pub fn get_render_thread_mode(&self) -> RenderThreadMode {
        self.render_thread_mode
    }

    #[inline]
    pub fn is_hidpi_allowed(&self) -> bool {
        self.allow_hidpi
    }

    #[inline]
    pub fn is_layered_allowed(&self) -> bool {
        self.allow_layered
    }

    // ---- vsync --------------------------------------------------------

    /// Stores the flag, then applies it through the registered switch, or
    /// inline on the backend when none is registered. Exactly one of the two
    /// runs per call.
    pub fn set_use_vsync(&mut self, enabled: bool) {
        self.use_vsync = enabled;
        match &self.vsync_switch {
            Some(switch) => switch(enabled),
            None => self.backend.switch_vsync(enabled),
        }
    }

    #[inline]
    pub fn is_vsync_enabled(&self) -> bool {
        self.use_vsync
    }

    pub fn set_vsync_switch(&mut self, switch: Option<VsyncSwitch>) {
        self.vsync_switch = switch;
    }

    // ---- video drivers ------------------------------------------------

    #[inline]
    pub fn get_video_driver_count(&self) -> usize {
        VIDEO_DRIVERS.len()
    }

    /// Out-of-range indices give [`INVALID_VIDEO_DRIVER`].
    #[inline]
    pub fn get_video_driver_name(&self, index: usize) -> &'static str {
        VIDEO_DRIVERS
            .get(index)
            .copied()
            .unwrap_or(INVALID_VIDEO_DRIVER)
    }

    #[inline]
    pub fn get_current_video_driver(&self) -> usize {
        self.video_driver
    }

    // ---- clipboard ----------------------------------------------------

    /// Native clipboard when the backend has one, the local string otherwise.
    pub fn set_clipboard(&mut self, text: &str) {
        if self.backend.set_clipboard(text).is_err() {
            self.local_clipboard = text.to_string();
        }
    }

    pub fn get_clipboard(&self) -> String {
        self.backend
            .get_clipboard()
            .unwrap_or_else(|_| self.local_clipboard.clone())
    }

    // ---- window -------------------------------------------------------

    pub fn is_window_fullscreen(&self) -> bool {
        self.backend.is_window_fullscreen()
    }

    pub fn set_window_fullscreen(&mut self, enabled: bool) {
        self.backend.set_window_fullscreen(enabled);
    }

    pub fn get_screen_count(&self) -> usize {
        self.backend.get_screen_count()
    }

    pub fn get_current_screen(&self) -> usize {
        self.backend.get_current_screen()
    }

    pub fn get_screen_position(&self, screen: usize) -> Point {
        self.backend.get_screen_position(screen)
    }

    pub fn get_screen_size(&self, screen: usize) -> Size {
        self.backend.get_screen_size(screen)
    }

    pub fn get_window_position(&self) -> Point {
        self.backend.get_window_position()
    }

    pub fn set_window_position(&mut self, position: Point) {
        self.backend.set_window_position(position);
    }

    pub fn get_window_size(&self) -> Size {
        self.backend.get_window_size()
    }

    pub fn set_window_size(&mut self, size: Size) {
        self.backend.set_window_size(size);
    }

    pub fn get_real_window_size(&self) -> Size {
        self.backend.get_real_window_size()
    }

    pub fn set_window_title(&mut self, title: &str) {
        self.backend.set_window_title(title);
    }

    pub fn set_window_minimized(&mut self, enabled: bool) {
        self.backend.set_window_minimized(enabled);
    }

    pub fn is_window_minimized(&self) -> bool {
        self.backend.is_window_minimized()
    }

    pub fn set_window_maximized(&mut self, enabled: bool) {
        self.backend.set_window_maximized(enabled);
    }

    pub fn is_window_maximized(&self) -> bool {
        self.backend.is_window_maximized()
    }

    /// Centers the window on its current screen. Fullscreen windows stay put.
    pub fn center_window(&mut self) {
        if self.backend.is_window_fullscreen() {
            return;
        }

        let screen = self.backend.get_current_screen();
        let origin = self.backend.get_screen_position(screen);
        let screen_size = self.backend.get_screen_size(screen);
        let window_size = self.backend.get_real_window_size();

        self.backend
            .set_window_position(origin + (screen_size - window_size) / 2);
    }

    // ---- input-adjacent ------------------------------------------------

    pub fn has_virtual_keyboard(&self) -> bool {
        self.backend.has_virtual_keyboard()
    }

    pub fn show_virtual_keyboard(&mut self, existing_text: &str, screen_rect: Rect) {
        self.backend.show_virtual_keyboard(existing_text, screen_rect);
    }

    pub fn hide_virtual_keyboard(&mut self) {
        self.backend.hide_virtual_keyboard();
    }

    pub fn get_virtual_keyboard_height(&self) -> i32 {
        self.backend.get_virtual_keyboard_height()
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.backend.set_cursor_shape(shape);
    }

    pub fn get_cursor_shape(&self) -> CursorShape {
        self.backend.get_cursor_shape()
    }

    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.backend.set_mouse_mode(mode);
    }

    pub fn get_mouse_mode(&self) -> MouseMode {
        self.backend.get_mouse_mode()
    }

    pub fn get_latin_keyboard_variant(&self) -> LatinKeyboardVariant {
        self.backend.get_latin_keyboard_variant()
    }

    pub fn has_touchscreen_ui_hint(&self) -> bool {
        self.backend.has_touchscreen_ui_hint() || self.emulate_touch_from_mouse
    }

    pub fn set_emulate_touch_from_mouse(&mut self, enabled: bool) {
        self.emulate_touch_from_mouse = enabled;
    }

    pub fn is_joy_known(&self, device: i32) -> bool {
        self.backend.is_joy_known(device)
    }

    pub fn get_joy_guid(&self, device: i32) -> String {
        self.backend.get_joy_guid(device)
    }

    // ---- native video -------------------------------------------------

    pub fn native_video_play(
        &mut self,
        path: &str,
        volume: f32,
        audio_track: &str,
        subtitle_track: &str,
    ) -> HostResult<()> {
        self.backend
            .native_video_play(path, volume, audio_track, subtitle_track)
    }

    pub fn native_video_is_playing(&self) -> bool {
        self.backend.native_video_is_playing()
    }

    pub fn native_video_pause(&mut self) {
        self.backend.native_video_pause();
    }

    pub fn native_video_unpause(&mut self) {
        self.backend.native_video_unpause();
    }

    pub fn native_video_stop(&mut self) {
        self.backend.native_video_stop();
    }

    // ---- rendering context --------------------------------------------

    pub fn release_rendering_thread(&mut self) {
        self.backend.release_rendering_thread();
    }

    pub fn make_rendering_thread(&mut self) {
        self.backend.make_rendering_thread();
    }

    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }

    pub fn set_context(&mut self, context: i32) {
        self.backend.set_context(context);
    }

    pub fn process_events(&mut self) {
        self.backend.process_events();
    }

    // ---- dialogs ------------------------------------------------------

    /// Native dialog when available, else a console prompt that blocks until
    /// a valid choice is typed. The callback runs on the next deferred flush.
    pub fn dialog_show(
        &mut self,
        console: &dyn Console,
        title: &str,
        description: &str,
        buttons: &[String],
        callback: Option<ChoiceCallback>,
    ) -> HostResult<()> {
        if let Some(native) = self.backend.native_dialogs() {
            return native.show_choice(title, description, buttons, callback);
        }
        dialog::console_choice(console, &self.deferred, title, description, buttons, callback)
    }

    pub fn dialog_input_text(
        &mut self,
        console: &dyn Console,
        title: &str,
        description: &str,
        partial: &str,
        callback: Option<TextCallback>,
    ) -> HostResult<()> {
        if let Some(native) = self.backend.native_dialogs() {
            let Some(callback) = callback else {
                console.report_error(
                    "dialog_input_text",
                    "callback.is_none()",
                    "text input dialog requires a callback",
                );
                return Err(HostError::Failed(
                    "text input dialog requires a callback".into(),
                ));
            };
            return native.input_text(title, description, partial, callback);
        }
        dialog::console_input_text(console, &self.deferred, title, description, partial, callback)
            .inspect_err(|e| log::error!("dialog_input_text: {}", e))
    }
}

impl fmt::Debug for DisplayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayService")
            .field("backend", &self.backend.name())
            .field("use_vsync", &self.use_vsync)
            .field("keep_screen_on", &self.keep_screen_on)
            .field("orientation", &self.orientation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::DeferredQueue;
    use crate::dialog::tests::ScriptedConsole;
    use crate::testing::{FakeDisplay, FakeDisplayState};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (DisplayService, FakeDisplayState, DeferredQueue) {
        let q = DeferredQueue::new();
        let (backend, state) = FakeDisplay::new();
        (DisplayService::new(Box::new(backend), q.sender()), state, q)
    }

    #[test]
    fn test_defaults() {
        let (d, _, _) = service();
        assert!(d.is_keep_screen_on());
        assert!(!d.is_no_window_mode_enabled());
        assert_eq!(d.get_screen_orientation(), ScreenOrientation::Landscape);
        assert_eq!(d.get_render_thread_mode(), RenderThreadMode::Safe);
        assert!(!d.is_hidpi_allowed());
        assert!(!d.is_layered_allowed());
        assert!(!d.is_vsync_enabled());
        assert_eq!(d.get_cursor_shape(), CursorShape::Arrow);
        assert_eq!(d.get_mouse_mode(), MouseMode::Visible);
        assert_eq!(d.get_latin_keyboard_variant(), LatinKeyboardVariant::Qwerty);
        assert!(d.is_joy_known(0));
        assert_eq!(d.get_joy_guid(3), "Default Joypad");
        assert!(!d.has_virtual_keyboard());
        assert_eq!(d.get_virtual_keyboard_height(), 0);
        assert!(!d.native_video_is_playing());
        assert!(!d.has_touchscreen_ui_hint());
    }

    #[test]
    fn test_capability_setters_are_safe_noops() {
        let (mut d, _, _) = service();
        d.set_cursor_shape(CursorShape::Ibeam);
        d.set_mouse_mode(MouseMode::Captured);
        d.show_virtual_keyboard("abc", Rect::default());
        d.hide_virtual_keyboard();
        d.native_video_pause();
        d.native_video_stop();
        d.release_rendering_thread();
        d.make_rendering_thread();
        d.swap_buffers();
        d.set_context(1);
        assert_eq!(d.get_cursor_shape(), CursorShape::Arrow);
        assert_eq!(d.get_mouse_mode(), MouseMode::Visible);
        assert!(matches!(
            d.native_video_play("intro.webm", 1.0, "", ""),
            Err(HostError::Failed(_))
        ));
    }

    #[test]
    fn test_video_driver_table() {
        let (d, _, _) = service();
        assert_eq!(d.get_video_driver_count(), 2);
        assert_eq!(d.get_video_driver_name(0), "GLES2");
        assert_eq!(d.get_video_driver_name(1), "GLES3");
        assert_eq!(d.get_video_driver_name(2), INVALID_VIDEO_DRIVER);
        assert_eq!(video_driver_index("gles2"), Some(0));
        assert_eq!(video_driver_index("Vulkan"), None);
    }

    #[test]
    fn test_clipboard_falls_back_to_local_proxy() {
        let (mut d, _, _) = service();
        assert_eq!(d.get_clipboard(), "");
        d.set_clipboard("copied");
        assert_eq!(d.get_clipboard(), "copied");
    }

    #[test]
    fn test_vsync_inline_without_switch() {
        let (mut d, state, _) = service();
        d.set_use_vsync(true);
        assert!(d.is_vsync_enabled());
        assert_eq!(*state.vsync_calls.lock(), vec![true]);
    }

    #[test]
    fn test_vsync_redirected_through_switch() {
        let (mut d, state, _) = service();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_switch = calls.clone();
        d.set_vsync_switch(Some(Arc::new(move |on| calls_switch.lock().push(on))));

        d.set_use_vsync(true);
        assert_eq!(*calls.lock(), vec![true]);
        assert!(state.vsync_calls.lock().is_empty());
        assert!(d.is_vsync_enabled());

        d.set_vsync_switch(None);
        d.set_use_vsync(false);
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(*state.vsync_calls.lock(), vec![false]);
    }

    #[test]
    fn test_center_window_on_current_screen() {
        let (mut d, state, _) = service();
        state.geometry.lock().window_size = Size::new(800, 600);
        d.center_window();
        assert_eq!(d.get_window_position(), Point::new(560, 240));
    }

    #[test]
    fn test_center_window_uses_screen_origin() {
        let (mut d, state, _) = service();
        {
            let mut g = state.geometry.lock();
            g.screens.push((Point::new(1920, 0), Size::new(1280, 1024)));
            g.current_screen = 1;
            g.window_size = Size::new(641, 401);
        }
        d.center_window();
        assert_eq!(d.get_window_position(), Point::new(1920 + 319, 311));
    }

    #[test]
    fn test_center_window_noop_when_fullscreen() {
        let (mut d, state, _) = service();
        state.geometry.lock().window_position = Point::new(7, 9);
        d.set_window_fullscreen(true);
        d.center_window();
        assert_eq!(d.get_window_position(), Point::new(7, 9));
    }

    #[test]
    fn test_apply_config() {
        let (mut d, state, _) = service();
        let cfg = DisplayConfig {
            orientation: ScreenOrientation::Portrait,
            keep_screen_on: false,
            video_driver: "GLES2".into(),
            emulate_touch_from_mouse: true,
            ..DisplayConfig::default()
        };
        d.apply_config(&cfg).unwrap();
        assert_eq!(d.get_screen_orientation(), ScreenOrientation::Portrait);
        assert!(!d.is_keep_screen_on());
        assert_eq!(d.get_current_video_driver(), 0);
        assert!(d.has_touchscreen_ui_hint());
        assert_eq!(*state.vsync_calls.lock(), vec![true]);

        let bad = DisplayConfig {
            video_driver: "Vulkan".into(),
            ..DisplayConfig::default()
        };
        assert!(matches!(d.apply_config(&bad), Err(HostError::InvalidParameter(_))));
    }

    #[test]
    fn test_dialog_show_console_fallback() {
        let (mut d, _, q) = service();
        let console = ScriptedConsole::with_lines(&["x", "2"]);
        let hits = Arc::new(AtomicUsize::new(usize::MAX));
        let hits_cb = hits.clone();

        d.dialog_show(
            &console,
            "Title",
            "Desc",
            &["Yes".to_string(), "No".to_string()],
            Some(Box::new(move |i| hits_cb.store(i, Ordering::SeqCst))),
        )
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), usize::MAX);
        q.flush();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dialog_input_text_requires_callback() {
        let (mut d, _, _) = service();
        let console = ScriptedConsole::default();
        assert!(matches!(
            d.dialog_input_text(&console, "t", "d", "p", None),
            Err(HostError::Failed(_))
        ));
    }

    #[test]
    fn test_dialogs_prefer_native_backend() {
        let q = DeferredQueue::new();
        let (backend, state) = FakeDisplay::with_native_dialogs();
        let mut d = DisplayService::new(Box::new(backend), q.sender());
        let console = ScriptedConsole::default();

        d.dialog_show(&console, "t", "d", &["A".to_string()], None)
            .unwrap();
        d.dialog_input_text(&console, "t", "d", "p", Some(Box::new(|_, _| {})))
            .unwrap();

        assert_eq!(*state.native_dialogs.lock(), 2);
        assert_eq!(*console.reads.borrow(), 0);
    }
}
