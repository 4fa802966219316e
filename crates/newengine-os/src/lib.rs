//! Host services for NewEngine: the process-level OS service and the display
//! service, owned by a [`HostContext`] that enforces start-up and shut-down
//! order.

pub mod config;
pub mod context;
pub mod deferred;
pub mod dialog;
pub mod display;
pub mod drivers;
pub mod error;
pub mod features;
pub mod lifecycle;
pub mod logger;
pub mod main_loop;
pub mod os;
pub mod render_thread;

#[cfg(test)]
mod testing;

pub use config::{DisplayConfig, HostConfig, OsConfig, ProjectConfig, WindowConfig};
pub use context::HostContext;
pub use deferred::{DeferredQueue, DeferredSender};
pub use dialog::{ChoiceCallback, Console, NativeDialogs, TextCallback};
pub use display::{DisplayBackend, DisplayService, VsyncSwitch};
pub use drivers::{AudioDriver, AudioDriverManager, DriverRegistry, DummyAudioDriver, MidiDriver};
pub use error::{HostError, HostResult};
pub use features::FeatureCallback;
pub use lifecycle::Phase;
pub use logger::{CompositeLogger, ErrorType, Logger, StdLogger};
pub use main_loop::{FrameTime, LoopControl, MainLoop};
pub use os::{LastError, OsBackend, OsService, OsSetup};
pub use render_thread::RenderThread;
