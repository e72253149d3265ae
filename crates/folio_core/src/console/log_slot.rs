use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use super::Tone;
use crate::markup::Markup;

/// Anything that can display status lines
pub trait LogSink: Send + Sync {
    fn log(&self, text: Markup, tone: Tone);
}

type Slot = Mutex<Option<(u64, Arc<dyn LogSink>)>>;

/// Single-slot publish/subscribe log handle.
///
/// Publishers hold a clone and call [`LogSlot::log`]. At most one sink is
/// subscribed at a time; the latest subscription replaces the previous one.
/// With no sink attached, lines are dropped.
#[derive(Clone, Default)]
pub struct LogSlot {
    slot: Arc<Slot>,
    next_id: Arc<AtomicU64>,
}

impl LogSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, text: impl Into<Markup>, tone: Tone) {
        let text = text.into();
        // Release the lock before calling out; a sink may publish again.
        let sink = self.slot.lock().as_ref().map(|(_, sink)| sink.clone());
        match sink {
            Some(sink) => sink.log(text, tone),
            None => trace!("no log subscriber, dropping {:?}", text.plain_text()),
        }
    }

    /// Install `sink`. Dropping the returned subscription detaches it, unless a
    /// newer subscription has replaced it in the meantime.
    #[must_use = "the sink is detached when the subscription is dropped"]
    pub fn subscribe(&self, sink: Arc<dyn LogSink>) -> LogSubscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock() = Some((id, sink));
        LogSubscription {
            slot: Arc::downgrade(&self.slot),
            id,
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl std::fmt::Debug for LogSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSlot")
            .field("has_subscriber", &self.has_subscriber())
            .finish()
    }
}

#[derive(Debug)]
pub struct LogSubscription {
    slot: Weak<Slot>,
    id: u64,
}

impl LogSubscription {
    pub fn is_current(&self) -> bool {
        self.slot
            .upgrade()
            .is_some_and(|slot| slot.lock().as_ref().is_some_and(|(id, _)| *id == self.id))
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.upgrade() {
            let mut slot = slot.lock();
            if slot.as_ref().is_some_and(|(id, _)| *id == self.id) {
                *slot = None;
            }
        }
    }
}
