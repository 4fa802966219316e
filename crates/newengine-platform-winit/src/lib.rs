//! Desktop backends for the host services: the OS backend, a winit display,
//! a headless display and the winit event-loop runner.

mod app;
mod desktop_os;
mod display_headless;
mod display_winit;
mod power;
mod select;
mod window_slot;

pub use app::run_winit_app;
pub use desktop_os::DesktopOs;
pub use display_headless::HeadlessDisplay;
pub use display_winit::WinitDisplay;
pub use select::{select_display, wants_event_loop};
pub use window_slot::WindowSlot;
