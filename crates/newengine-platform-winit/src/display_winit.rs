use std::sync::Arc;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{CursorGrabMode, CursorIcon, Fullscreen, Window};

use newengine_os::display::{CursorShape, MouseMode, Point, Rect, Size};
use newengine_os::DisplayBackend;

use crate::window_slot::WindowSlot;

/// Display backend over a winit window.
///
/// Before the runner creates the window every query answers with zeros and
/// every command is dropped.
pub struct WinitDisplay {
    slot: WindowSlot,
    cursor: CursorShape,
    mouse_mode: MouseMode,
    vsync: bool,
}

impl WinitDisplay {
    pub fn new(slot: WindowSlot) -> Self {
        Self {
            slot,
            cursor: CursorShape::Arrow,
            mouse_mode: MouseMode::Visible,
            vsync: false,
        }
    }

    /// Vsync state the renderer should present with.
    #[inline]
    pub fn vsync_requested(&self) -> bool {
        self.vsync
    }

    #[inline]
    fn window(&self) -> Option<Arc<Window>> {
        self.slot.get()
    }
}

pub(crate) fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Arrow => CursorIcon::Default,
        CursorShape::Ibeam => CursorIcon::Text,
        CursorShape::PointingHand => CursorIcon::Pointer,
        CursorShape::Cross => CursorIcon::Crosshair,
        CursorShape::Wait => CursorIcon::Wait,
        CursorShape::Busy => CursorIcon::Progress,
        CursorShape::Drag => CursorIcon::Grabbing,
        CursorShape::CanDrop => CursorIcon::Copy,
        CursorShape::Forbidden => CursorIcon::NotAllowed,
        CursorShape::Vsize => CursorIcon::NsResize,
        CursorShape::Hsize => CursorIcon::EwResize,
        CursorShape::Bdiagsize => CursorIcon::NeswResize,
        CursorShape::Fdiagsize => CursorIcon::NwseResize,
        CursorShape::Move => CursorIcon::Move,
        CursorShape::Vsplit => CursorIcon::RowResize,
        CursorShape::Hsplit => CursorIcon::ColResize,
        CursorShape::Help => CursorIcon::Help,
    }
}

#[inline]
fn to_size(size: PhysicalSize<u32>) -> Size {
    Size::new(size.width as i32, size.height as i32)
}

impl DisplayBackend for WinitDisplay {
    fn name(&self) -> &str {
        "winit"
    }

    fn is_window_fullscreen(&self) -> bool {
        self.window().is_some_and(|w| w.fullscreen().is_some())
    }

    fn set_window_fullscreen(&mut self, enabled: bool) {
        if let Some(w) = self.window() {
            w.set_fullscreen(enabled.then_some(Fullscreen::Borderless(None)));
        }
    }

    fn get_screen_count(&self) -> usize {
        self.window()
            .map(|w| w.available_monitors().count())
            .unwrap_or(0)
    }

    fn get_current_screen(&self) -> usize {
        let Some(w) = self.window() else {
            return 0;
        };
        let Some(current) = w.current_monitor() else {
            return 0;
        };
        w.available_monitors()
            .position(|m| m == current)
            .unwrap_or(0)
    }

    fn get_screen_position(&self, screen: usize) -> Point {
        self.window()
            .and_then(|w| w.available_monitors().nth(screen))
            .map(|m| {
                let p = m.position();
                Point::new(p.x, p.y)
            })
            .unwrap_or_default()
    }

    fn get_screen_size(&self, screen: usize) -> Size {
        self.window()
            .and_then(|w| w.available_monitors().nth(screen))
            .map(|m| to_size(m.size()))
            .unwrap_or_default()
    }

    fn get_window_position(&self) -> Point {
        self.window()
            .and_then(|w| w.outer_position().ok())
            .map(|p| Point::new(p.x, p.y))
            .unwrap_or_default()
    }

    fn set_window_position(&mut self, position: Point) {
        if let Some(w) = self.window() {
            w.set_outer_position(PhysicalPosition::new(position.x, position.y));
        }
    }

    fn get_window_size(&self) -> Size {
        self.window()
            .map(|w| to_size(w.inner_size()))
            .unwrap_or_default()
    }

    fn set_window_size(&mut self, size: Size) {
        if let Some(w) = self.window() {
            let _ = w.request_inner_size(PhysicalSize::new(
                size.width.max(1) as u32,
                size.height.max(1) as u32,
            ));
        }
    }

    fn get_real_window_size(&self) -> Size {
        self.window()
            .map(|w| to_size(w.outer_size()))
            .unwrap_or_default()
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(w) = self.window() {
            w.set_title(title);
        }
    }

    fn switch_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
        log::debug!("winit: vsync {}", if enabled { "on" } else { "off" });
    }

    fn set_window_minimized(&mut self, enabled: bool) {
        if let Some(w) = self.window() {
            w.set_minimized(enabled);
        }
    }

    fn is_window_minimized(&self) -> bool {
        self.window()
            .and_then(|w| w.is_minimized())
            .unwrap_or(false)
    }

    fn set_window_maximized(&mut self, enabled: bool) {
        if let Some(w) = self.window() {
            w.set_maximized(enabled);
        }
    }

    fn is_window_maximized(&self) -> bool {
        self.window().is_some_and(|w| w.is_maximized())
    }

    fn has_virtual_keyboard(&self) -> bool {
        false
    }

    // IME stands in for the on-screen keyboard on desktop.
    fn show_virtual_keyboard(&mut self, _existing_text: &str, _screen_rect: Rect) {
        if let Some(w) = self.window() {
            w.set_ime_allowed(true);
        }
    }

    fn hide_virtual_keyboard(&mut self) {
        if let Some(w) = self.window() {
            w.set_ime_allowed(false);
        }
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.cursor = shape;
        if let Some(w) = self.window() {
            w.set_cursor(cursor_icon(shape));
        }
    }

    fn get_cursor_shape(&self) -> CursorShape {
        self.cursor
    }

    fn set_mouse_mode(&mut self, mode: MouseMode) {
        let Some(w) = self.window() else {
            return;
        };

        let (visible, grab) = match mode {
            MouseMode::Visible => (true, CursorGrabMode::None),
            MouseMode::Hidden => (false, CursorGrabMode::None),
            MouseMode::Captured => (false, CursorGrabMode::Locked),
            MouseMode::Confined => (true, CursorGrabMode::Confined),
        };

        w.set_cursor_visible(visible);
        let grabbed = w.set_cursor_grab(grab).or_else(|e| {
            // Not every platform can lock; confining is the closest fallback.
            if grab == CursorGrabMode::Locked {
                w.set_cursor_grab(CursorGrabMode::Confined)
            } else {
                Err(e)
            }
        });

        match grabbed {
            Ok(()) => self.mouse_mode = mode,
            Err(e) => log::warn!("winit: mouse mode {:?} rejected: {}", mode, e),
        }
    }

    fn get_mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }
}
