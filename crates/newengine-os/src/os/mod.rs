//! Process-level services.

mod backend;
mod types;

pub use backend::{OsBackend, OsSetup};
pub use types::{
    Date, ExecOptions, ExecOutput, LibraryHandle, Month, PowerState, ProcessId, SymbolAddress,
    SystemDir, Time, TimeZoneInfo, Weekday,
};

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::dialog::Console;
use crate::drivers::DriverRegistry;
use crate::error::HostResult;
use crate::features::{FeatureCallback, FeatureResolver};
use crate::logger::{CompositeLogger, ErrorType, Logger, StdLogger};
use crate::report_error;

const UNKNOWN_ERROR: &str = "Unknown Error";

/// Shared last-error slot. Clones refer to the same message.
#[derive(Clone, Default)]
pub struct LastError {
    slot: Arc<Mutex<Option<String>>>,
}

impl LastError {
    /// Replaces the message. `None` stores a generic "Unknown Error".
    pub fn set(&self, message: Option<&str>) {
        *self.slot.lock() = Some(message.unwrap_or(UNKNOWN_ERROR).to_string());
    }

    /// Current message, or `""` when none is set.
    pub fn get(&self) -> String {
        self.slot.lock().clone().unwrap_or_default()
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}

impl fmt::Debug for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LastError").field(&*self.slot.lock()).finish()
    }
}

/// Turns an arbitrary name into something usable as a directory name.
///
/// Backslashes become slashes, surrounding whitespace goes, and characters
/// that are invalid in file names become `-`. With `allow_separator` a plain
/// `/` survives but `..` does not.
pub fn safe_dir_name(name: &str, allow_separator: bool) -> String {
    let mut out = name.replace('\\', "/").trim().to_string();
    for bad in [":", "*", "?", "\"", "<", ">", "|"] {
        out = out.replace(bad, "-");
    }
    if allow_separator {
        out.replace("..", "-")
    } else {
        out.replace('/', "-")
    }
}

/// The OS service: process identity, timing, environment, drivers, features,
/// engine output and the last-error slot, on top of a platform backend.
pub struct OsService {
    backend: Box<dyn OsBackend>,
    audio: Arc<dyn DriverRegistry>,
    logger: CompositeLogger,
    last_error: LastError,
    features: FeatureResolver,

    exec_path: String,
    cmdline: Vec<String>,

    low_processor_usage_mode: bool,
    low_processor_usage_mode_sleep_usec: u32,
    verbose_stdout: bool,
    exit_code: i32,

    restart_on_exit: bool,
    restart_commandline: Vec<String>,

    splash_tick_msec: u64,
}

impl OsService {
    pub fn new(backend: Box<dyn OsBackend>, audio: Arc<dyn DriverRegistry>) -> Self {
        Self {
            backend,
            audio,
            logger: CompositeLogger::new(vec![Box::new(StdLogger)]),
            last_error: LastError::default(),
            features: FeatureResolver::default(),
            exec_path: String::new(),
            cmdline: Vec::new(),
            low_processor_usage_mode: false,
            low_processor_usage_mode_sleep_usec: 10_000,
            verbose_stdout: false,
            exit_code: 0,
            restart_on_exit: false,
            restart_commandline: Vec::new(),
            splash_tick_msec: 0,
        }
    }

    #[inline]
    pub(crate) fn backend_mut(&mut self) -> &mut dyn OsBackend {
        self.backend.as_mut()
    }

    pub(crate) fn set_cmdline(&mut self, exec_path: &str, args: Vec<String>) {
        self.exec_path = exec_path.to_string();
        self.cmdline = args;
    }

    pub(crate) fn mark_splash_tick(&mut self) {
        self.splash_tick_msec = self.get_ticks_msec();
    }

    // ---- output -------------------------------------------------------

    /// Another handle to the composite, for threads that need to print.
    #[inline]
    pub fn logger(&self) -> CompositeLogger {
        self.logger.clone()
    }

    pub fn add_logger(&self, sink: Box<dyn Logger>) {
        self.logger.add_logger(sink);
    }

    #[inline]
    pub fn print(&self, args: fmt::Arguments<'_>) {
        self.logger.logv(args, false);
    }

    #[inline]
    pub fn printerr(&self, args: fmt::Arguments<'_>) {
        self.logger.logv(args, true);
    }

    /// Prints only when verbose stdout is on.
    pub fn print_verbose(&self, args: fmt::Arguments<'_>) {
        if self.verbose_stdout {
            self.logger.logv(args, false);
        }
    }

    pub fn print_error(
        &self,
        function: &str,
        file: &str,
        line: u32,
        code: &str,
        rationale: &str,
        kind: ErrorType,
    ) {
        self.logger
            .log_error(function, file, line, code, rationale, kind);
    }

    // ---- last error ---------------------------------------------------

    #[inline]
    pub fn last_error(&self) -> LastError {
        self.last_error.clone()
    }

    #[inline]
    pub fn set_last_error(&self, message: Option<&str>) {
        self.last_error.set(message);
    }

    #[inline]
    pub fn get_last_error(&self) -> String {
        self.last_error.get()
    }

    #[inline]
    pub fn clear_last_error(&self) {
        self.last_error.clear();
    }

    // ---- features -----------------------------------------------------

    pub fn has_feature(&self, token: &str) -> bool {
        let backend = self.backend.as_ref();
        self.features.resolve(token, backend.name(), |t| {
            backend.check_internal_feature_support(t)
        })
    }

    pub fn set_feature_callback(&mut self, callback: Option<FeatureCallback>) {
        self.features.set_callback(callback);
    }

    pub fn set_custom_features<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.set_custom_features(tokens);
    }

    // ---- drivers ------------------------------------------------------

    #[inline]
    pub fn get_audio_driver_count(&self) -> usize {
        self.audio.count()
    }

    /// Empty string (and an error report) when `index` is out of range.
    pub fn get_audio_driver_name(&self, index: usize) -> String {
        match self.audio.name(index) {
            Some(name) => name,
            None => {
                report_error!(
                    self.logger,
                    "get_audio_driver_name",
                    "index < get_audio_driver_count()",
                    &format!(
                        "audio driver index {} out of range (count {})",
                        index,
                        self.audio.count()
                    )
                );
                String::new()
            }
        }
    }

    pub fn get_connected_midi_inputs(&mut self) -> Vec<String> {
        self.backend
            .midi_driver()
            .map(|m| m.connected_inputs())
            .unwrap_or_default()
    }

    pub fn open_midi_inputs(&mut self) -> HostResult<()> {
        match self.backend.midi_driver() {
            Some(m) => m.open(),
            None => Ok(()),
        }
    }

    pub fn close_midi_inputs(&mut self) {
        if let Some(m) = self.backend.midi_driver() {
            m.close();
        }
    }

    // ---- identity -----------------------------------------------------

    #[inline]
    pub fn get_name(&self) -> &str {
        self.backend.name()
    }

    pub fn get_model_name(&self) -> String {
        self.backend.get_model_name()
    }

    pub fn get_locale(&self) -> String {
        self.backend.get_locale()
    }

    pub fn get_processor_count(&self) -> usize {
        self.backend.get_processor_count()
    }

    /// Empty string (and an error report) when the backend has no stable id.
    pub fn get_unique_id(&self) -> String {
        match self.backend.get_unique_id() {
            Some(id) => id,
            None => {
                report_error!(
                    self.logger,
                    "get_unique_id",
                    "unique id unavailable",
                    "backend does not expose a unique device id"
                );
                String::new()
            }
        }
    }

    pub fn can_use_threads(&self) -> bool {
        self.backend.can_use_threads()
    }

    pub fn is_userfs_persistent(&self) -> bool {
        self.backend.is_userfs_persistent()
    }

    // ---- flags --------------------------------------------------------

    #[inline]
    pub fn is_in_low_processor_usage_mode(&self) -> bool {
        self.low_processor_usage_mode
    }

    #[inline]
    pub fn set_low_processor_usage_mode(&mut self, enabled: bool) {
        self.low_processor_usage_mode = enabled;
    }

    #[inline]
    pub fn get_low_processor_usage_mode_sleep_usec(&self) -> u32 {
        self.low_processor_usage_mode_sleep_usec
    }

    #[inline]
    pub fn set_low_processor_usage_mode_sleep_usec(&mut self, usec: u32) {
        self.low_processor_usage_mode_sleep_usec = usec;
    }

    #[inline]
    pub fn is_stdout_verbose(&self) -> bool {
        self.verbose_stdout
    }

    #[inline]
    pub fn set_verbose_stdout(&mut self, enabled: bool) {
        self.verbose_stdout = enabled;
    }

    #[inline]
    pub fn get_exit_code(&self) -> i32 {
        self.exit_code
    }

    #[inline]
    pub fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }

    // ---- process ------------------------------------------------------

    #[inline]
    pub fn get_executable_path(&self) -> &str {
        &self.exec_path
    }

    #[inline]
    pub fn get_cmdline_args(&self) -> &[String] {
        &self.cmdline
    }

    pub fn get_process_id(&self) -> Option<ProcessId> {
        self.backend.get_process_id()
    }

    pub fn execute(
        &mut self,
        path: &str,
        args: &[String],
        options: ExecOptions,
    ) -> HostResult<ExecOutput> {
        self.backend.execute(path, args, options)
    }

    pub fn kill(&mut self, pid: ProcessId) -> HostResult<()> {
        self.backend.kill(pid)
    }

    pub fn shell_open(&mut self, uri: &str) -> HostResult<()> {
        self.backend.shell_open(uri)
    }

    pub fn set_cwd(&mut self, path: &str) -> HostResult<()> {
        self.backend.set_cwd(path)
    }

    pub fn set_restart_on_exit(&mut self, restart: bool, args: Vec<String>) {
        self.restart_on_exit = restart;
        self.restart_commandline = args;
    }

    #[inline]
    pub fn is_restart_on_exit_set(&self) -> bool {
        self.restart_on_exit
    }

    #[inline]
    pub fn get_restart_on_exit_arguments(&self) -> &[String] {
        &self.restart_commandline
    }

    pub fn alert(&self, text: &str, title: &str) {
        self.backend.alert(text, title);
    }

    pub fn get_stdin_string(&self, block: bool) -> String {
        self.backend.get_stdin_string(block)
    }

    // ---- environment --------------------------------------------------

    pub fn has_environment(&self, var: &str) -> bool {
        self.backend.has_environment(var)
    }

    pub fn get_environment(&self, var: &str) -> String {
        self.backend.get_environment(var)
    }

    pub fn set_environment(&self, var: &str, value: &str) -> bool {
        self.backend.set_environment(var, value)
    }

    // ---- time ---------------------------------------------------------

    #[inline]
    pub fn get_ticks_usec(&self) -> u64 {
        self.backend.get_ticks_usec()
    }

    #[inline]
    pub fn get_ticks_msec(&self) -> u64 {
        self.backend.get_ticks_usec() / 1000
    }

    #[inline]
    pub fn get_splash_tick_msec(&self) -> u64 {
        self.splash_tick_msec
    }

    pub fn delay_usec(&self, usec: u32) {
        self.backend.delay_usec(usec);
    }

    pub fn get_unix_time(&self) -> u64 {
        self.backend.get_unix_time()
    }

    pub fn get_system_time_secs(&self) -> u64 {
        self.backend.get_system_time_secs()
    }

    pub fn get_system_time_msecs(&self) -> u64 {
        self.backend.get_system_time_msecs()
    }

    pub fn get_date(&self, local: bool) -> Date {
        self.backend.get_date(local)
    }

    pub fn get_time(&self, local: bool) -> Time {
        self.backend.get_time(local)
    }

    pub fn get_time_zone_info(&self) -> TimeZoneInfo {
        self.backend.get_time_zone_info()
    }

    // ---- paths --------------------------------------------------------

    pub fn get_data_path(&self) -> String {
        self.backend.get_data_path()
    }

    pub fn get_config_path(&self) -> String {
        self.backend.get_config_path()
    }

    pub fn get_cache_path(&self) -> String {
        self.backend.get_cache_path()
    }

    pub fn get_user_data_dir(&self) -> String {
        self.backend.get_user_data_dir()
    }

    pub fn get_system_dir(&self, dir: SystemDir) -> String {
        self.backend.get_system_dir(dir)
    }

    #[inline]
    pub fn get_engine_dir_name(&self) -> &'static str {
        "newengine"
    }

    #[inline]
    pub fn get_safe_dir_name(&self, name: &str, allow_separator: bool) -> String {
        safe_dir_name(name, allow_separator)
    }

    pub fn move_to_trash(&mut self, path: &str) -> HostResult<()> {
        self.backend.move_to_trash(path)
    }

    // ---- power --------------------------------------------------------

    pub fn get_power_state(&self) -> PowerState {
        self.backend.get_power_state()
    }

    pub fn get_power_seconds_left(&self) -> i32 {
        self.backend.get_power_seconds_left()
    }

    pub fn get_power_percent_left(&self) -> i32 {
        self.backend.get_power_percent_left()
    }

    // ---- misc backend -------------------------------------------------

    pub fn open_dynamic_library(
        &mut self,
        path: &str,
        also_set_library_path: bool,
    ) -> HostResult<LibraryHandle> {
        self.backend.open_dynamic_library(path, also_set_library_path)
    }

    pub fn close_dynamic_library(&mut self, handle: LibraryHandle) -> HostResult<()> {
        self.backend.close_dynamic_library(handle)
    }

    pub fn get_dynamic_library_symbol(
        &self,
        handle: LibraryHandle,
        name: &str,
        optional: bool,
    ) -> HostResult<SymbolAddress> {
        self.backend.get_dynamic_library_symbol(handle, name, optional)
    }

    pub fn request_permission(&mut self, name: &str) -> bool {
        self.backend.request_permission(name)
    }

    pub fn disable_crash_handler(&mut self) {
        self.backend.disable_crash_handler();
    }

    pub fn is_disable_crash_handler(&self) -> bool {
        self.backend.is_disable_crash_handler()
    }

    pub fn get_swap_ok_cancel(&self) -> bool {
        self.backend.get_swap_ok_cancel()
    }

    pub fn debug_break(&self) {
        self.backend.debug_break();
    }

    pub fn yield_now(&self) {
        self.backend.yield_now();
    }
}

impl Console for OsService {
    fn print(&self, args: fmt::Arguments<'_>) {
        OsService::print(self, args);
    }

    fn read_line(&self) -> String {
        self.backend.get_stdin_string(true)
    }

    fn report_error(&self, function: &str, code: &str, rationale: &str) {
        report_error!(self.logger, function, code, rationale);
    }
}

impl fmt::Debug for OsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsService")
            .field("backend", &self.backend.name())
            .field("exec_path", &self.exec_path)
            .field("low_processor_usage_mode", &self.low_processor_usage_mode)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}
