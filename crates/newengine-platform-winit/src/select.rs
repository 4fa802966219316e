use newengine_os::display::Size;
use newengine_os::{DisplayBackend, HostConfig, HostError, HostResult};

use crate::display_headless::HeadlessDisplay;
use crate::display_winit::WinitDisplay;
use crate::window_slot::WindowSlot;

/// True when the configuration needs a winit event loop to run.
#[inline]
pub fn wants_event_loop(config: &HostConfig) -> bool {
    !config.display.no_window && config.display.backend == "winit"
}

fn headless(config: &HostConfig) -> HeadlessDisplay {
    let w = &config.window;
    let mut display = HeadlessDisplay::new(Size::new(
        i32::try_from(w.width).unwrap_or(i32::MAX),
        i32::try_from(w.height).unwrap_or(i32::MAX),
    ));
    display.set_window_title(&w.title);
    display.set_window_fullscreen(w.fullscreen);
    display
}

/// Picks the display hook set named by `[display] backend`. `no_window`
/// always gets the headless backend.
pub fn select_display(config: &HostConfig, slot: &WindowSlot) -> HostResult<Box<dyn DisplayBackend>> {
    if config.display.no_window {
        return Ok(Box::new(headless(config)));
    }
    match config.display.backend.as_str() {
        "winit" => Ok(Box::new(WinitDisplay::new(slot.clone()))),
        "headless" => Ok(Box::new(headless(config))),
        other => Err(HostError::Config(format!("unknown display backend '{other}'"))),
    }
}
