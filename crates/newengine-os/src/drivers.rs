//! Driver registries queried by the services.

use parking_lot::Mutex;

use crate::error::{HostError, HostResult};

/// Read side of a driver table: how many drivers exist and what each is called.
pub trait DriverRegistry: Send + Sync {
    fn count(&self) -> usize;
    fn name(&self, index: usize) -> Option<String>;
}

pub trait AudioDriver: Send {
    fn name(&self) -> &str;
    fn init(&mut self) -> HostResult<()>;
    fn finish(&mut self) {}
}

/// Silent driver that always initializes. Registered last so something opens.
#[derive(Debug, Default)]
pub struct DummyAudioDriver {
    active: bool,
}

impl DummyAudioDriver {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AudioDriver for DummyAudioDriver {
    fn name(&self) -> &str {
        "Dummy"
    }

    fn init(&mut self) -> HostResult<()> {
        self.active = true;
        Ok(())
    }

    fn finish(&mut self) {
        self.active = false;
    }
}

#[derive(Default)]
struct AudioInner {
    drivers: Vec<Box<dyn AudioDriver>>,
    active: Option<usize>,
}

/// Dynamic audio driver table. Backends add drivers during `initialize_core`.
#[derive(Default)]
pub struct AudioDriverManager {
    inner: Mutex<AudioInner>,
}

impl AudioDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_driver(&self, driver: Box<dyn AudioDriver>) {
        let mut inner = self.inner.lock();
        log::info!("audio: registered driver '{}'", driver.name());
        inner.drivers.push(driver);
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.inner
            .lock()
            .drivers
            .iter()
            .position(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// Initializes `preferred`, then every other driver in registration order
    /// until one succeeds. Returns the index that opened.
    ///
    /// `preferred` must name a registered driver.
    pub fn open(&self, preferred: usize) -> HostResult<usize> {
        let mut inner = self.inner.lock();
        let count = inner.drivers.len();
        if count == 0 {
            return Err(HostError::Failed("no audio drivers registered".into()));
        }
        if let Some(active) = inner.active {
            return Err(HostError::Failed(format!(
                "audio driver '{}' is already open",
                inner.drivers[active].name()
            )));
        }
        if preferred >= count {
            return Err(HostError::OutOfRange {
                index: preferred,
                count,
            });
        }

        let order = std::iter::once(preferred).chain((0..count).filter(|i| *i != preferred));

        for index in order {
            let driver = &mut inner.drivers[index];
            match driver.init() {
                Ok(()) => {
                    log::info!("audio: opened driver '{}'", driver.name());
                    inner.active = Some(index);
                    return Ok(index);
                }
                Err(e) => {
                    log::warn!("audio: driver '{}' failed to init: {}", driver.name(), e);
                }
            }
        }

        Err(HostError::Failed("no audio driver could be initialized".into()))
    }

    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if let Some(index) = inner.active.take() {
            let driver = &mut inner.drivers[index];
            driver.finish();
            log::info!("audio: closed driver '{}'", driver.name());
        }
    }

    #[inline]
    pub fn active(&self) -> Option<usize> {
        self.inner.lock().active
    }
}

impl DriverRegistry for AudioDriverManager {
    fn count(&self) -> usize {
        self.inner.lock().drivers.len()
    }

    fn name(&self, index: usize) -> Option<String> {
        self.inner
            .lock()
            .drivers
            .get(index)
            .map(|d| d.name().to_string())
    }
}

/// MIDI input transport. Only the port listing and open/close are consumed.
pub trait MidiDriver: Send {
    fn open(&mut self) -> HostResult<()>;
    fn close(&mut self);
    fn connected_inputs(&self) -> Vec<String>;
}
