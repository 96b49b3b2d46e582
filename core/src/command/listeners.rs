//! Voice message listeners
//!
//! Observers are told that a voice message was dispatched (e.g. to wake the
//! screen). Notification runs on the application's main context through a
//! `Scheduler`, never inline in the guidance tick. The registry is
//! copy-on-write: notification iterates a snapshot, so listeners may be
//! added or removed at any time, including from inside a callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

/// Observer of dispatched voice messages
pub trait VoiceMessageListener: Send + Sync {
    fn on_voice_message(&self);
}

impl<F> VoiceMessageListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_voice_message(&self) {
        self()
    }
}

/// Work item for the main context
pub type MainTask = Box<dyn FnOnce() + Send>;

/// Runs tasks on the application's main context
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: MainTask);
}

/// Runs tasks immediately on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn schedule(&self, task: MainTask) {
        task()
    }
}

/// Hands tasks to a main loop that drains the paired receiver
#[derive(Debug, Clone)]
pub struct ChannelScheduler {
    sender: mpsc::UnboundedSender<MainTask>,
}

impl ChannelScheduler {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MainTask>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Scheduler for ChannelScheduler {
    fn schedule(&self, task: MainTask) {
        if self.sender.send(task).is_err() {
            tracing::debug!("Main context closed, listener notification dropped");
        }
    }
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Entries = Arc<Vec<(ListenerId, Arc<dyn VoiceMessageListener>)>>;

/// Registry of voice message listeners
#[derive(Clone)]
pub struct VoiceMessageListeners {
    entries: Arc<RwLock<Entries>>,
    next_id: Arc<AtomicU64>,
    scheduler: Arc<dyn Scheduler>,
}

impl std::fmt::Debug for VoiceMessageListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceMessageListeners")
            .field("len", &self.len())
            .finish()
    }
}

impl Default for VoiceMessageListeners {
    fn default() -> Self {
        Self::new(Arc::new(InlineScheduler))
    }
}

impl VoiceMessageListeners {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Arc::new(Vec::new()))),
            next_id: Arc::new(AtomicU64::new(1)),
            scheduler,
        }
    }

    fn snapshot(&self) -> Entries {
        match self.entries.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Vec<(ListenerId, Arc<dyn VoiceMessageListener>)>)) {
        let mut guard = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = (**guard).clone();
        f(&mut next);
        *guard = Arc::new(next);
    }

    pub fn add(&self, listener: Arc<dyn VoiceMessageListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.update(|entries| entries.push((id, listener)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut removed = false;
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed = entries.len() != before;
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schedule a notification of every listener registered right now
    pub fn notify(&self) {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return;
        }
        self.scheduler.schedule(Box::new(move || {
            for (_, listener) in snapshot.iter() {
                listener.on_voice_message();
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Arc<dyn VoiceMessageListener>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let listener: Arc<dyn VoiceMessageListener> = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    #[test]
    fn add_notify_remove() {
        let listeners = VoiceMessageListeners::default();
        let (count, listener) = counter();
        let id = listeners.add(listener);

        listeners.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notification_runs_on_main_context() {
        let (scheduler, mut main_rx) = ChannelScheduler::channel();
        let listeners = VoiceMessageListeners::new(Arc::new(scheduler));
        let (count, listener) = counter();
        listeners.add(listener);

        listeners.notify();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let task = main_rx.try_recv().unwrap();
        task();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removal_inside_callback_is_safe() {
        let listeners = VoiceMessageListeners::default();
        let inner = listeners.clone();
        let id_cell = Arc::new(std::sync::Mutex::new(None::<ListenerId>));
        let cell = Arc::clone(&id_cell);
        let id = listeners.add(Arc::new(move || {
            if let Some(id) = *cell.lock().unwrap() {
                inner.remove(id);
            }
        }));
        *id_cell.lock().unwrap() = Some(id);

        listeners.notify();
        assert!(listeners.is_empty());
    }

    #[test]
    fn snapshot_taken_at_notify_time() {
        let (scheduler, mut main_rx) = ChannelScheduler::channel();
        let listeners = VoiceMessageListeners::new(Arc::new(scheduler));
        let (first, listener) = counter();
        listeners.add(listener);

        listeners.notify();
        let (second, late) = counter();
        listeners.add(late);

        main_rx.try_recv().unwrap()();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }
}
