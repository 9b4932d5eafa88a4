//! Scheduled UI tasks.
//!
//! Timed feedback (the "added to cart" banner and its fade-out) runs as an
//! explicit tokio task owned by a [`ScheduledTask`] handle. Replacing or
//! dropping the handle aborts the task, so a newer notification never gets
//! hidden by an older timer.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a spawned task. The task is aborted on cancel or drop.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawn `future` on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime.
    pub fn spawn<F>(future: F) -> Option<Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        Some(Self {
            handle: runtime.spawn(future),
        })
    }

    /// Abort the task.
    pub fn cancel(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Visibility phase of the notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading,
}

/// The banner currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub phase: NotificationPhase,
}

/// How long a notification stays up, then how long it takes to fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub visible: Duration,
    pub fade: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Notification>,
}

/// Shows one notification at a time.
#[derive(Debug)]
pub struct Notifier {
    timing: NotificationTiming,
    slot: Arc<Mutex<Slot>>,
    task: Option<ScheduledTask>,
}

impl Notifier {
    #[must_use]
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            timing,
            slot: Arc::new(Mutex::new(Slot::default())),
            task: None,
        }
    }

    /// Show `message`, replacing any notification still on screen.
    ///
    /// The banner hides itself after the configured timing. Outside a tokio
    /// runtime it stays until replaced or dismissed.
    pub fn show(&mut self, message: impl Into<String>) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }

        let message = message.into();
        tracing::debug!(%message, "Showing notification");
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.current = Some(Notification {
                message,
                phase: NotificationPhase::Visible,
            });
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let timing = self.timing;
        self.task = ScheduledTask::spawn(async move {
            tokio::time::sleep(timing.visible).await;
            update(&slot, generation, |current| {
                if let Some(n) = current.as_mut() {
                    n.phase = NotificationPhase::Fading;
                }
            });
            tokio::time::sleep(timing.fade).await;
            update(&slot, generation, |current| *current = None);
        });
    }

    /// Hide the current notification immediately.
    pub fn dismiss(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = None;
    }

    /// The notification currently on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }

    #[must_use]
    pub const fn timing(&self) -> NotificationTiming {
        self.timing
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply `f` only if no newer notification has been shown since `generation`.
fn update(slot: &Mutex<Slot>, generation: u64, f: impl FnOnce(&mut Option<Notification>)) {
    let mut slot = lock(slot);
    if slot.generation == generation {
        f(&mut slot.current);
    }
}
