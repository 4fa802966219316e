use parking_lot::RwLock;
use std::sync::Arc;
use winit::window::Window;

/// The window shared between the winit runner (which creates it) and the
/// display backend (which drives it). Empty until the event loop resumes.
#[derive(Clone, Default)]
pub struct WindowSlot {
    inner: Arc<RwLock<Option<Arc<Window>>>>,
}

impl WindowSlot {
    #[inline]
    pub fn get(&self) -> Option<Arc<Window>> {
        self.inner.read().clone()
    }

    #[inline]
    pub fn set(&self, window: Arc<Window>) {
        *self.inner.write() = Some(window);
    }

    #[inline]
    pub fn clear(&self) -> Option<Arc<Window>> {
        self.inner.write().take()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_none()
    }
}
