use crate::config::HostConfig;
use crate::display::DisplayBackend;
use crate::drivers::{AudioDriverManager, MidiDriver};
use crate::error::{HostError, HostResult};
use crate::os::types::{
    Date, ExecOptions, ExecOutput, LibraryHandle, PowerState, ProcessId, SymbolAddress, SystemDir,
    Time, TimeZoneInfo,
};

/// What a backend gets when the OS layer initializes.
pub struct OsSetup<'a> {
    pub config: &'a HostConfig,
    pub audio: &'a AudioDriverManager,
    /// Index of the audio driver to open first.
    pub audio_driver: usize,
}

/// Platform hook set behind [`OsService`](crate::os::OsService).
///
/// Required methods have no sane portable answer. Everything else has a
/// default a backend may keep when it lacks the capability.
pub trait OsBackend: Send {
    /// Identity token, also answered by `has_feature`.
    fn name(&self) -> &str;

    /// Registers audio (and other) drivers.
    fn initialize_core(&mut self, audio: &AudioDriverManager) -> HostResult<()>;

    /// Opens the configured audio driver and returns the display hook set.
    fn initialize_os(&mut self, setup: &OsSetup<'_>) -> HostResult<Box<dyn DisplayBackend>>;

    fn finalize_os(&mut self);

    fn finalize_core(&mut self) {}

    fn check_internal_feature_support(&self, feature: &str) -> bool;

    fn alert(&self, text: &str, title: &str);
    fn get_stdin_string(&self, block: bool) -> String;

    fn execute(
        &mut self,
        path: &str,
        args: &[String],
        options: ExecOptions,
    ) -> HostResult<ExecOutput>;
    fn kill(&mut self, pid: ProcessId) -> HostResult<()>;

    fn has_environment(&self, var: &str) -> bool;
    fn get_environment(&self, var: &str) -> String;
    fn set_environment(&self, var: &str, value: &str) -> bool;

    fn get_date(&self, local: bool) -> Date;
    fn get_time(&self, local: bool) -> Time;
    fn get_time_zone_info(&self) -> TimeZoneInfo;

    fn delay_usec(&self, usec: u32);
    /// Monotonic microseconds since the backend started.
    fn get_ticks_usec(&self) -> u64;

    fn get_unix_time(&self) -> u64 {
        0
    }
    fn get_system_time_secs(&self) -> u64 {
        0
    }
    fn get_system_time_msecs(&self) -> u64 {
        0
    }

    fn get_process_id(&self) -> Option<ProcessId> {
        None
    }

    fn shell_open(&mut self, _uri: &str) -> HostResult<()> {
        Err(HostError::Unavailable("shell_open"))
    }

    fn set_cwd(&mut self, path: &str) -> HostResult<()> {
        Err(HostError::CantOpen(path.to_string()))
    }

    fn get_model_name(&self) -> String {
        "GenericDevice".to_string()
    }
    fn get_locale(&self) -> String {
        "en".to_string()
    }
    fn get_processor_count(&self) -> usize {
        1
    }
    fn get_unique_id(&self) -> Option<String> {
        None
    }
    fn can_use_threads(&self) -> bool {
        true
    }
    fn is_userfs_persistent(&self) -> bool {
        true
    }

    fn get_data_path(&self) -> String {
        ".".to_string()
    }
    fn get_config_path(&self) -> String {
        ".".to_string()
    }
    fn get_cache_path(&self) -> String {
        ".".to_string()
    }
    fn get_user_data_dir(&self) -> String {
        ".".to_string()
    }
    fn get_system_dir(&self, _dir: SystemDir) -> String {
        ".".to_string()
    }

    fn move_to_trash(&mut self, path: &str) -> HostResult<()> {
        Err(HostError::Failed(format!("move_to_trash({path}) not supported")))
    }

    fn get_power_state(&self) -> PowerState {
        PowerState::Unknown
    }
    fn get_power_seconds_left(&self) -> i32 {
        -1
    }
    fn get_power_percent_left(&self) -> i32 {
        -1
    }

    fn open_dynamic_library(
        &mut self,
        _path: &str,
        _also_set_library_path: bool,
    ) -> HostResult<LibraryHandle> {
        Err(HostError::Unavailable("dynamic libraries"))
    }
    fn close_dynamic_library(&mut self, _handle: LibraryHandle) -> HostResult<()> {
        Err(HostError::Unavailable("dynamic libraries"))
    }
    fn get_dynamic_library_symbol(
        &self,
        _handle: LibraryHandle,
        _name: &str,
        _optional: bool,
    ) -> HostResult<SymbolAddress> {
        Err(HostError::Unavailable("dynamic libraries"))
    }

    fn request_permission(&mut self, _name: &str) -> bool {
        true
    }

    fn disable_crash_handler(&mut self) {}
    fn is_disable_crash_handler(&self) -> bool {
        false
    }

    fn get_swap_ok_cancel(&self) -> bool {
        false
    }
    fn debug_break(&self) {}
    fn yield_now(&self) {
        std::thread::yield_now();
    }

    fn midi_driver(&mut self) -> Option<&mut dyn MidiDriver> {
        None
    }
}
