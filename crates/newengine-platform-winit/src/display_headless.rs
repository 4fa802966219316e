use newengine_os::display::{CursorShape, MouseMode, Point, Size};
use newengine_os::{DisplayBackend, HostResult};

/// Display backend without a window: geometry lives in memory on a single
/// 1920x1080 screen. Used for `no_window` runs and tests.
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    screen_size: Size,
    position: Point,
    size: Size,
    fullscreen: bool,
    minimized: bool,
    maximized: bool,
    title: String,
    clipboard: String,
    vsync: bool,
    cursor: CursorShape,
    mouse_mode: MouseMode,
}

impl HeadlessDisplay {
    pub const SCREEN_SIZE: Size = Size::new(1920, 1080);

    pub fn new(window_size: Size) -> Self {
        Self {
            screen_size: Self::SCREEN_SIZE,
            position: Point::default(),
            size: window_size,
            fullscreen: false,
            minimized: false,
            maximized: false,
            title: String::new(),
            clipboard: String::new(),
            vsync: false,
            cursor: CursorShape::Arrow,
            mouse_mode: MouseMode::Visible,
        }
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn vsync(&self) -> bool {
        self.vsync
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new(Size::new(1024, 600))
    }
}

impl DisplayBackend for HeadlessDisplay {
    fn name(&self) -> &str {
        "headless"
    }

    fn is_window_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_window_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = enabled;
    }

    fn get_screen_count(&self) -> usize {
        1
    }

    fn get_current_screen(&self) -> usize {
        0
    }

    fn get_screen_position(&self, _screen: usize) -> Point {
        Point::default()
    }

    fn get_screen_size(&self, screen: usize) -> Size {
        if screen == 0 {
            self.screen_size
        } else {
            Size::default()
        }
    }

    fn get_window_position(&self) -> Point {
        self.position
    }

    fn set_window_position(&mut self, position: Point) {
        self.position = position;
    }

    fn get_window_size(&self) -> Size {
        if self.fullscreen {
            self.screen_size
        } else {
            self.size
        }
    }

    fn set_window_size(&mut self, size: Size) {
        self.size = size;
    }

    fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn switch_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
    }

    fn set_window_minimized(&mut self, enabled: bool) {
        self.minimized = enabled;
    }

    fn is_window_minimized(&self) -> bool {
        self.minimized
    }

    fn set_window_maximized(&mut self, enabled: bool) {
        self.maximized = enabled;
    }

    fn is_window_maximized(&self) -> bool {
        self.maximized
    }

    fn set_clipboard(&mut self, text: &str) -> HostResult<()> {
        self.clipboard = text.to_string();
        Ok(())
    }

    fn get_clipboard(&self) -> HostResult<String> {
        Ok(self.clipboard.clone())
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.cursor = shape;
    }

    fn get_cursor_shape(&self) -> CursorShape {
        self.cursor
    }

    fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.mouse_mode = mode;
    }

    fn get_mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newengine_os::{DeferredQueue, DisplayService};

    fn service(window: Size) -> DisplayService {
        let q = DeferredQueue::new();
        DisplayService::new(Box::new(HeadlessDisplay::new(window)), q.sender())
    }

    #[test]
    fn test_center_window_on_single_screen() {
        let mut d = service(Size::new(800, 600));
        d.center_window();
        assert_eq!(d.get_window_position(), Point::new(560, 240));
    }

    #[test]
    fn test_center_window_skipped_in_fullscreen() {
        let mut d = service(Size::new(800, 600));
        d.set_window_fullscreen(true);
        d.center_window();
        assert_eq!(d.get_window_position(), Point::default());
        assert_eq!(d.get_window_size(), HeadlessDisplay::SCREEN_SIZE);
    }

    #[test]
    fn test_state_is_remembered() {
        let mut d = service(Size::new(640, 480));
        d.set_cursor_shape(CursorShape::Help);
        d.set_mouse_mode(MouseMode::Hidden);
        d.set_clipboard("kept");
        d.set_window_maximized(true);
        d.set_use_vsync(true);

        assert_eq!(d.get_cursor_shape(), CursorShape::Help);
        assert_eq!(d.get_mouse_mode(), MouseMode::Hidden);
        assert_eq!(d.get_clipboard(), "kept");
        assert!(d.is_window_maximized());
        assert!(d.is_vsync_enabled());
        assert_eq!(d.get_screen_count(), 1);
        assert_eq!(d.get_screen_size(1), Size::default());
    }
}
