use crossbeam_channel::{bounded, unbounded, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::display::VsyncSwitch;
use crate::error::{HostError, HostResult};

enum RenderCommand {
    SwitchVsync(bool),
    Sync(Sender<()>),
    Shutdown,
}

/// Named worker that owns the real vsync switch when rendering runs on its
/// own thread. Commands run in the order they were queued.
pub struct RenderThread {
    tx: Sender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn<F>(mut apply_vsync: F) -> HostResult<Self>
    where
        F: FnMut(bool) + Send + 'static,
    {
        let (tx, rx) = unbounded::<RenderCommand>();

        let handle = thread::Builder::new()
            .name("newengine-render".into())
            .spawn(move || {
                log::info!("render: thread started");
                for cmd in rx.iter() {
                    match cmd {
                        RenderCommand::SwitchVsync(enabled) => apply_vsync(enabled),
                        RenderCommand::Sync(ack) => {
                            let _ = ack.send(());
                        }
                        RenderCommand::Shutdown => break,
                    }
                }
                log::info!("render: thread stopped");
            })?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Switch that queues the change for the render thread instead of applying it inline.
    pub fn vsync_switch(&self) -> VsyncSwitch {
        let tx = self.tx.clone();
        Arc::new(move |enabled| {
            if tx.send(RenderCommand::SwitchVsync(enabled)).is_err() {
                log::warn!("render: vsync switch after thread exit");
            }
        })
    }

    /// Blocks until every command queued before this call has run.
    pub fn sync(&self) -> HostResult<()> {
        let (ack_tx, ack_rx) = bounded(1);
        self.tx
            .send(RenderCommand::Sync(ack_tx))
            .map_err(|_| HostError::Failed("render thread is gone".into()))?;
        ack_rx
            .recv()
            .map_err(|_| HostError::Failed("render thread is gone".into()))
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        let _ = self.tx.send(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("render: thread panicked");
            }
        }
    }
}
