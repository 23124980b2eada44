use crate::domain::model::Notice;
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex, MutexGuard};

/// Emits each notice as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(
            operation = ?notice.operation,
            product_id = notice.product_id,
            "{}",
            notice.message
        );
    }
}

/// Collects notices until a consumer drains them for display.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}

/// Delivers each notice to both notifiers.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, notice: Notice) {
        self.0.notify(notice.clone());
        self.1.notify(notice);
    }
}
