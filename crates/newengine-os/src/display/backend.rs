use crate::dialog::NativeDialogs;
use crate::display::types::{
    CursorShape, LatinKeyboardVariant, MouseMode, Point, Rect, ScreenOrientation, Size,
};
use crate::error::{HostError, HostResult};

/// Display hook set a platform backend hands to the display service.
///
/// Window and screen geometry are required. Every other capability has a
/// default that describes "not supported here".
pub trait DisplayBackend: Send {
    fn name(&self) -> &str;

    fn is_window_fullscreen(&self) -> bool;
    fn set_window_fullscreen(&mut self, enabled: bool);

    fn get_screen_count(&self) -> usize;
    fn get_current_screen(&self) -> usize;
    fn get_screen_position(&self, screen: usize) -> Point;
    fn get_screen_size(&self, screen: usize) -> Size;

    fn get_window_position(&self) -> Point;
    fn set_window_position(&mut self, position: Point);
    fn get_window_size(&self) -> Size;
    fn set_window_size(&mut self, size: Size);
    /// Size including decorations.
    fn get_real_window_size(&self) -> Size {
        self.get_window_size()
    }
    fn set_window_title(&mut self, title: &str);

    /// Applies vsync on the calling thread.
    fn switch_vsync(&mut self, enabled: bool);

    fn set_window_minimized(&mut self, _enabled: bool) {}
    fn is_window_minimized(&self) -> bool {
        false
    }
    fn set_window_maximized(&mut self, _enabled: bool) {}
    fn is_window_maximized(&self) -> bool {
        false
    }

    fn set_clipboard(&mut self, _text: &str) -> HostResult<()> {
        Err(HostError::Unavailable("clipboard"))
    }
    fn get_clipboard(&self) -> HostResult<String> {
        Err(HostError::Unavailable("clipboard"))
    }

    fn has_virtual_keyboard(&self) -> bool {
        false
    }
    fn show_virtual_keyboard(&mut self, _existing_text: &str, _screen_rect: Rect) {}
    fn hide_virtual_keyboard(&mut self) {}
    fn get_virtual_keyboard_height(&self) -> i32 {
        0
    }

    fn set_cursor_shape(&mut self, _shape: CursorShape) {}
    fn get_cursor_shape(&self) -> CursorShape {
        CursorShape::Arrow
    }

    fn set_mouse_mode(&mut self, _mode: MouseMode) {}
    fn get_mouse_mode(&self) -> MouseMode {
        MouseMode::Visible
    }

    fn get_latin_keyboard_variant(&self) -> LatinKeyboardVariant {
        LatinKeyboardVariant::Qwerty
    }

    fn has_touchscreen_ui_hint(&self) -> bool {
        false
    }

    fn is_joy_known(&self, _device: i32) -> bool {
        true
    }
    fn get_joy_guid(&self, _device: i32) -> String {
        "Default Joypad".to_string()
    }

    fn set_keep_screen_on(&mut self, _enabled: bool) {}
    fn set_screen_orientation(&mut self, _orientation: ScreenOrientation) {}

    fn native_video_play(
        &mut self,
        path: &str,
        _volume: f32,
        _audio_track: &str,
        _subtitle_track: &str,
    ) -> HostResult<()> {
        Err(HostError::Failed(format!("native video playback of {path}")))
    }
    fn native_video_is_playing(&self) -> bool {
        false
    }
    fn native_video_pause(&mut self) {}
    fn native_video_unpause(&mut self) {}
    fn native_video_stop(&mut self) {}

    fn release_rendering_thread(&mut self) {}
    fn make_rendering_thread(&mut self) {}
    fn swap_buffers(&mut self) {}
    fn set_context(&mut self, _context: i32) {}
    fn process_events(&mut self) {}

    fn native_dialogs(&mut self) -> Option<&mut dyn NativeDialogs> {
        None
    }
}
