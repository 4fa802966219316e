use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use libloading::Library;

use newengine_os::os::{
    safe_dir_name, Date, ExecOptions, ExecOutput, LibraryHandle, PowerState, ProcessId,
    SymbolAddress, SystemDir, Time, TimeZoneInfo,
};
use newengine_os::{
    AudioDriverManager, DisplayBackend, DummyAudioDriver, HostError, HostResult, OsBackend,
    OsSetup,
};

use crate::power::{self, PowerInfo};
use crate::select::select_display;
use crate::window_slot::WindowSlot;

const OS_NAME: &str = if cfg!(target_os = "macos") {
    "macOS"
} else if cfg!(target_os = "windows") {
    "Windows"
} else {
    "LinuxBSD"
};

/// OS backend for desktop targets, built on std, `dirs` and `libloading`.
pub struct DesktopOs {
    started: Instant,
    project_name: String,
    window_slot: WindowSlot,

    children: HashMap<ProcessId, Child>,
    libraries: HashMap<u64, Library>,
    next_library: u64,

    crash_handler_disabled: bool,
}

impl DesktopOs {
    pub fn new(project_name: &str) -> Self {
        Self {
            started: Instant::now(),
            project_name: project_name.to_string(),
            window_slot: WindowSlot::default(),
            children: HashMap::new(),
            libraries: HashMap::new(),
            next_library: 1,
            crash_handler_disabled: false,
        }
    }

    /// Slot the winit runner fills once the window exists.
    #[inline]
    pub fn window_slot(&self) -> WindowSlot {
        self.window_slot.clone()
    }

    fn unix_now() -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }

    fn power_info(&self) -> PowerInfo {
        if cfg!(target_os = "linux") {
            power::read_power_supply(Path::new(power::SYSFS_POWER_SUPPLY))
        } else {
            PowerInfo::default()
        }
    }
}

fn path_or_dot(path: Option<PathBuf>) -> String {
    path.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

/// `en_US.UTF-8` → `en_US`. Unset, `C` and `POSIX` mean `en`.
pub(crate) fn locale_from_lang(lang: Option<&str>) -> String {
    let Some(lang) = lang else {
        return "en".to_string();
    };
    let base = lang.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        "en".to_string()
    } else {
        base.to_string()
    }
}

/// Moves `path` into a freedesktop trash rooted at `trash`, writing the
/// matching `.trashinfo` record.
pub(crate) fn move_to_trash_in(trash: &Path, path: &Path) -> HostResult<()> {
    let files = trash.join("files");
    let info = trash.join("info");
    fs::create_dir_all(&files)?;
    fs::create_dir_all(&info)?;

    let original = fs::canonicalize(path)
        .map_err(|_| HostError::InvalidParameter(format!("{} does not exist", path.display())))?;
    let file_name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| HostError::InvalidParameter(format!("{} has no file name", path.display())))?;

    let mut name = file_name.clone();
    let mut n = 1;
    while files.join(&name).exists() || info.join(format!("{name}.trashinfo")).exists() {
        n += 1;
        name = format!("{file_name}.{n}");
    }

    let secs = DesktopOs::unix_now().as_secs() as i64;
    let date = Date::from_unix_secs(secs);
    let time = Time::from_unix_secs(secs);
    let record = format!(
        "[Trash Info]\nPath={}\nDeletionDate={:04}-{:02}-{:02}T{:02}:{:02}:{:02}\n",
        original.display(),
        date.year,
        date.month.number(),
        date.day,
        time.hour,
        time.min,
        time.sec
    );
    let info_path = info.join(format!("{name}.trashinfo"));
    fs::write(&info_path, record)?;

    if let Err(e) = fs::rename(&original, files.join(&name)) {
        let _ = fs::remove_file(&info_path);
        return Err(HostError::Failed(format!(
            "move {} to trash: {}",
            original.display(),
            e
        )));
    }
    Ok(())
}

fn try_dialog(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl OsBackend for DesktopOs {
    fn name(&self) -> &str {
        OS_NAME
    }

    fn initialize_core(&mut self, audio: &AudioDriverManager) -> HostResult<()> {
        audio.add_driver(Box::new(DummyAudioDriver::default()));
        Ok(())
    }

    fn initialize_os(&mut self, setup: &OsSetup<'_>) -> HostResult<Box<dyn DisplayBackend>> {
        if let Err(e) = setup.audio.open(setup.audio_driver) {
            log::warn!("desktop: audio unavailable: {}", e);
        }
        select_display(setup.config, &self.window_slot)
    }

    fn finalize_os(&mut self) {
        for (pid, mut child) in self.children.drain() {
            if let Ok(None) = child.try_wait() {
                log::info!("desktop: leaving child process {} running", pid);
            }
        }
    }

    fn finalize_core(&mut self) {
        self.libraries.clear();
    }

    fn check_internal_feature_support(&self, feature: &str) -> bool {
        feature == "pc"
    }

    fn alert(&self, text: &str, title: &str) {
        let shown = if cfg!(target_os = "macos") {
            let script = format!(
                "display alert {:?} message {:?}",
                title, text
            );
            try_dialog("osascript", &["-e", &script])
        } else if cfg!(target_os = "windows") {
            false
        } else {
            try_dialog("zenity", &["--error", "--width", "500", "--title", title, "--text", text])
                || try_dialog("kdialog", &["--title", title, "--error", text])
                || try_dialog("xmessage", &["-center", "-title", title, text])
        };

        if !shown {
            eprintln!("{title}: {text}");
        }
    }

    fn get_stdin_string(&self, block: bool) -> String {
        if !block {
            return String::new();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => line,
            Err(e) => {
                log::warn!("desktop: stdin read failed: {}", e);
                String::new()
            }
        }
    }

    fn execute(
        &mut self,
        path: &str,
        args: &[String],
        options: ExecOptions,
    ) -> HostResult<ExecOutput> {
        let mut cmd = Command::new(path);
        cmd.args(args);

        if options.blocking {
            let out = cmd
                .stdin(Stdio::null())
                .output()
                .map_err(|e| HostError::CantOpen(format!("{path}: {e}")))?;
            let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
            if options.read_stderr {
                output.push_str(&String::from_utf8_lossy(&out.stderr));
            }
            return Ok(ExecOutput {
                pid: None,
                output,
                exit_code: out.status.code(),
            });
        }

        let child = cmd
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| HostError::CantOpen(format!("{path}: {e}")))?;
        let pid = child.id();
        self.children.insert(pid, child);
        Ok(ExecOutput {
            pid: Some(pid),
            ..ExecOutput::default()
        })
    }

    fn kill(&mut self, pid: ProcessId) -> HostResult<()> {
        let mut child = self
            .children
            .remove(&pid)
            .ok_or_else(|| HostError::InvalidParameter(format!("no child process {pid}")))?;
        child
            .kill()
            .map_err(|e| HostError::Failed(format!("kill {pid}: {e}")))?;
        let _ = child.wait();
        Ok(())
    }

    fn has_environment(&self, var: &str) -> bool {
        std::env::var_os(var).is_some()
    }

    fn get_environment(&self, var: &str) -> String {
        std::env::var(var).unwrap_or_default()
    }

    fn set_environment(&self, var: &str, value: &str) -> bool {
        if var.is_empty() || var.contains('=') || var.contains('\0') || value.contains('\0') {
            return false;
        }
        std::env::set_var(var, value);
        true
    }

    // Local time is reported as UTC.
    fn get_date(&self, _local: bool) -> Date {
        Date::from_unix_secs(Self::unix_now().as_secs() as i64)
    }

    fn get_time(&self, _local: bool) -> Time {
        Time::from_unix_secs(Self::unix_now().as_secs() as i64)
    }

    fn get_time_zone_info(&self) -> TimeZoneInfo {
        TimeZoneInfo {
            bias: 0,
            name: "UTC".to_string(),
        }
    }

    fn delay_usec(&self, usec: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(usec)));
    }

    fn get_ticks_usec(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }

    fn get_unix_time(&self) -> u64 {
        Self::unix_now().as_secs()
    }

    fn get_system_time_secs(&self) -> u64 {
        Self::unix_now().as_secs()
    }

    fn get_system_time_msecs(&self) -> u64 {
        Self::unix_now().as_millis() as u64
    }

    fn get_process_id(&self) -> Option<ProcessId> {
        Some(std::process::id())
    }

    fn shell_open(&mut self, uri: &str) -> HostResult<()> {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| HostError::Failed(format!("shell_open({uri}): {e}")))
    }

    fn set_cwd(&mut self, path: &str) -> HostResult<()> {
        std::env::set_current_dir(path).map_err(|_| HostError::CantOpen(path.to_string()))
    }

    fn get_locale(&self) -> String {
        locale_from_lang(std::env::var("LANG").ok().as_deref())
    }

    fn get_processor_count(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    fn get_unique_id(&self) -> Option<String> {
        if !cfg!(target_os = "linux") {
            return None;
        }
        fs::read_to_string("/etc/machine-id")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn get_data_path(&self) -> String {
        path_or_dot(dirs::data_dir())
    }

    fn get_config_path(&self) -> String {
        path_or_dot(dirs::config_dir())
    }

    fn get_cache_path(&self) -> String {
        path_or_dot(dirs::cache_dir())
    }

    fn get_user_data_dir(&self) -> String {
        let project = if self.project_name.trim().is_empty() {
            "[unnamed project]".to_string()
        } else {
            safe_dir_name(&self.project_name, false)
        };
        Path::new(&self.get_data_path())
            .join("newengine")
            .join("app_userdata")
            .join(project)
            .to_string_lossy()
            .into_owned()
    }

    fn get_system_dir(&self, dir: SystemDir) -> String {
        path_or_dot(match dir {
            SystemDir::Desktop => dirs::desktop_dir(),
            SystemDir::Dcim | SystemDir::Pictures => dirs::picture_dir(),
            SystemDir::Documents => dirs::document_dir(),
            SystemDir::Downloads => dirs::download_dir(),
            SystemDir::Movies => dirs::video_dir(),
            SystemDir::Music | SystemDir::Ringtones => dirs::audio_dir(),
        })
    }

    fn move_to_trash(&mut self, path: &str) -> HostResult<()> {
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            return Err(HostError::Failed(format!("move_to_trash({path}) not supported")));
        }
        let Some(data) = dirs::data_dir() else {
            return Err(HostError::Failed("no data directory for the trash".into()));
        };
        move_to_trash_in(&data.join("Trash"), Path::new(path))
    }

    fn get_power_state(&self) -> PowerState {
        self.power_info().state
    }

    fn get_power_seconds_left(&self) -> i32 {
        self.power_info().seconds_left
    }

    fn get_power_percent_left(&self) -> i32 {
        self.power_info().percent_left
    }

    fn open_dynamic_library(
        &mut self,
        path: &str,
        _also_set_library_path: bool,
    ) -> HostResult<LibraryHandle> {
        // Loading runs the library's initializers; the caller vouches for the file.
        let lib = unsafe { Library::new(path) }
            .map_err(|e| HostError::CantOpen(format!("load library '{path}': {e}")))?;
        let id = self.next_library;
        self.next_library += 1;
        self.libraries.insert(id, lib);
        log::info!("desktop: loaded library '{}' as #{}", path, id);
        Ok(LibraryHandle(id))
    }

    fn close_dynamic_library(&mut self, handle: LibraryHandle) -> HostResult<()> {
        let lib = self
            .libraries
            .remove(&handle.0)
            .ok_or_else(|| HostError::InvalidParameter(format!("unknown library #{}", handle.0)))?;
        lib.close()
            .map_err(|e| HostError::Failed(format!("close library #{}: {e}", handle.0)))
    }

    fn get_dynamic_library_symbol(
        &self,
        handle: LibraryHandle,
        name: &str,
        optional: bool,
    ) -> HostResult<SymbolAddress> {
        let lib = self
            .libraries
            .get(&handle.0)
            .ok_or_else(|| HostError::InvalidParameter(format!("unknown library #{}", handle.0)))?;

        let mut bytes = Vec::with_capacity(name.len() + 1);
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);

        // Only the address is read; nothing is called through it here.
        let sym = unsafe { lib.get::<*const ()>(&bytes) };
        match sym {
            Ok(sym) => Ok(SymbolAddress(*sym as usize)),
            Err(e) => {
                if !optional {
                    log::error!("desktop: missing symbol '{}' in #{}: {}", name, handle.0, e);
                }
                Err(HostError::Unavailable("dynamic library symbol"))
            }
        }
    }

    fn disable_crash_handler(&mut self) {
        self.crash_handler_disabled = true;
    }

    fn is_disable_crash_handler(&self) -> bool {
        self.crash_handler_disabled
    }
}
