mod cli;
mod host_loop;
mod signals;

use anyhow::Context;

use newengine_modules_logging::{init_env_logger, FacadeLogger};
use newengine_os::os::ExecOptions;
use newengine_os::{HostConfig, HostContext};
use newengine_platform_winit::{run_winit_app, wants_event_loop, DesktopOs};

use crate::cli::Cli;
use crate::host_loop::HostLoop;
use crate::signals::ShutdownFlag;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse(std::env::args())?;

    let mut config = HostConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if cli.verbose {
        config.os.verbose_stdout = true;
    }
    if cli.headless {
        config.display.no_window = true;
    }

    init_env_logger(config.os.verbose_stdout);

    let os = DesktopOs::new(&config.project.name);
    let slot = os.window_slot();
    let use_event_loop = wants_event_loop(&config);

    let mut host = HostContext::new(Box::new(os), config);
    host.os().add_logger(Box::new(FacadeLogger::errors_only("engine")));

    host.set_cmdline(&cli.exec_path, cli.args.clone())?;
    host.initialize_core()?;
    host.initialize_os()?;

    let shutdown = ShutdownFlag::default();
    if let Err(e) = shutdown.install_ctrlc() {
        log::warn!("ctrl-c handler not installed: {e}");
    }
    let mut main_loop = HostLoop::new(shutdown, cli.quit_after);

    if use_event_loop {
        run_winit_app(&mut host, &mut main_loop, slot)?;
    } else {
        host.run(&mut main_loop)?;
    }

    if host.os().is_restart_on_exit_set() {
        let exec = host.os().get_executable_path().to_string();
        let args = host.os().get_restart_on_exit_arguments().to_vec();
        host.os_mut()
            .execute(&exec, &args, ExecOptions::spawn())
            .context("restarting")?;
    }

    let exit_code = host.os().get_exit_code();
    host.finalize_os()?;
    host.finalize_core()?;
    drop(host);

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
