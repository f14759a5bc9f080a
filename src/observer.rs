//! Write-side observation API
//!
//! The [`Observer`] owns the live memory aggregate for a running application:
//! one shared instance is constructed at startup and handed to whatever emits
//! events. Appends are synchronous; persistence is debounced so a burst of
//! activity produces a single write shortly after the burst ends.
//!
//! Typed wrappers (`task_completed`, `mood_set`, ...) exist purely to give
//! call sites a concrete payload shape; they all delegate to [`Observer::observe`].

use crate::event::{Event, EventKind};
use crate::memory::{self, Memory, MemoryStore};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before an observed burst is persisted
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Shared, live view of the behavioral memory
///
/// Cheap to clone; clones share the same underlying state. Appends happen
/// inline on the caller's thread, saves are scheduled on the tokio runtime,
/// so `observe` must be called from within one.
#[derive(Clone)]
pub struct Observer {
    inner: Arc<Inner>,
}

struct Inner {
    memory: RwLock<Memory>,
    store: Arc<dyn MemoryStore>,
    debounce: Duration,
    pending_save: Mutex<Option<JoinHandle<()>>>,
}

impl Observer {
    /// Load memory from `store` and wrap it in a live observer
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self::with_debounce(store, DEFAULT_DEBOUNCE)
    }

    /// Same as [`Observer::new`] with a custom debounce window
    pub fn with_debounce(store: Arc<dyn MemoryStore>, debounce: Duration) -> Self {
        let loaded = memory::load_memory(store.as_ref());
        tracing::info!(
            events = loaded.recent_events.len(),
            "Observer initialized"
        );

        Self {
            inner: Arc::new(Inner {
                memory: RwLock::new(loaded),
                store,
                debounce,
                pending_save: Mutex::new(None),
            }),
        }
    }

    /// Record an event, stamped with the current time
    ///
    /// Appends to the in-memory log and (re)arms the debounced save: any
    /// pending save is cancelled, so N observes within the window collapse
    /// into one write reflecting the state after the Nth.
    pub fn observe(&self, kind: EventKind) {
        let event = Event::now(kind);
        tracing::debug!(event = event.kind.name(), "Observed");

        {
            let mut mem = self.inner.write_memory();
            *mem = memory::add_event(&*mem, event);
        }

        self.schedule_save();
    }

    /// Snapshot of the current memory aggregate
    pub fn memory(&self) -> Memory {
        self.inner.read_memory().clone()
    }

    /// Cancel any pending debounced save and persist immediately
    ///
    /// For shutdown and visibility-change paths where waiting out the
    /// debounce window would lose the tail of the session.
    pub fn flush(&self) {
        if let Some(pending) = self.inner.take_pending() {
            pending.abort();
        }
        let snapshot = self.memory();
        memory::save_memory(self.inner.store.as_ref(), &snapshot);
    }

    /// Replace the memory aggregate through a pure transformation
    ///
    /// Used by the analysis pipeline to write back derived state (pattern
    /// snapshot, score history) through the single writer.
    pub(crate) fn apply<F>(&self, transform: F)
    where
        F: FnOnce(&Memory) -> Memory,
    {
        let mut mem = self.inner.write_memory();
        *mem = transform(&*mem);
    }

    fn schedule_save(&self) {
        let inner = Arc::clone(&self.inner);
        let debounce = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let snapshot = inner.read_memory().clone();
            memory::save_memory(inner.store.as_ref(), &snapshot);
        });

        if let Some(previous) = self.inner.replace_pending(handle) {
            previous.abort();
        }
    }

    // ============================================
    // Typed wrappers
    // ============================================

    pub fn task_created(&self, id: &str, title: &str, category: &str, priority: &str) {
        self.observe(EventKind::TaskCreated {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            priority: priority.into(),
        });
    }

    pub fn task_completed(&self, id: &str, title: &str, duration_minutes: Option<u32>) {
        self.observe(EventKind::TaskCompleted {
            id: id.into(),
            title: title.into(),
            duration_minutes,
        });
    }

    pub fn task_deleted(&self, id: &str) {
        self.observe(EventKind::TaskDeleted { id: id.into() });
    }

    pub fn task_updated(&self, id: &str) {
        self.observe(EventKind::TaskUpdated { id: id.into() });
    }

    pub fn task_moved(&self, id: &str, from: &str, to: &str) {
        self.observe(EventKind::TaskMoved {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn pomodoro_started(&self, task_id: Option<&str>, planned_minutes: u32) {
        self.observe(EventKind::PomodoroStarted {
            task_id: task_id.map(Into::into),
            planned_minutes,
        });
    }

    pub fn pomodoro_completed(
        &self,
        task_id: Option<&str>,
        planned_minutes: Option<u32>,
        actual_minutes: Option<u32>,
    ) {
        self.observe(EventKind::PomodoroCompleted {
            task_id: task_id.map(Into::into),
            planned_minutes,
            actual_minutes,
        });
    }

    pub fn pomodoro_interrupted(&self, task_id: Option<&str>, after_minutes: u32) {
        self.observe(EventKind::PomodoroInterrupted {
            task_id: task_id.map(Into::into),
            after_minutes,
        });
    }

    pub fn weight_added(&self, kilograms: f64) {
        self.observe(EventKind::WeightAdded { kilograms });
    }

    pub fn meal_added(&self, calories: u32, meal: &str) {
        self.observe(EventKind::MealAdded {
            calories,
            meal: meal.into(),
        });
    }

    pub fn water_added(&self, milliliters: u32) {
        self.observe(EventKind::WaterAdded { milliliters });
    }

    pub fn journal_written(&self, mood: Option<f64>, has_content: bool) {
        self.observe(EventKind::JournalWritten { mood, has_content });
    }

    pub fn mood_set(&self, mood: f64) {
        self.observe(EventKind::MoodSet { mood });
    }

    pub fn habit_created(&self, habit_id: &str, name: &str) {
        self.observe(EventKind::HabitCreated {
            habit_id: habit_id.into(),
            name: name.into(),
        });
    }

    pub fn habit_checked(&self, habit_id: &str, name: &str) {
        self.observe(EventKind::HabitChecked {
            habit_id: habit_id.into(),
            name: name.into(),
        });
    }

    pub fn habit_unchecked(&self, habit_id: &str) {
        self.observe(EventKind::HabitUnchecked {
            habit_id: habit_id.into(),
        });
    }

    pub fn book_started(&self, book_id: &str, title: &str) {
        self.observe(EventKind::BookStarted {
            book_id: book_id.into(),
            title: title.into(),
        });
    }

    pub fn book_finished(&self, book_id: &str, title: &str) {
        self.observe(EventKind::BookFinished {
            book_id: book_id.into(),
            title: title.into(),
        });
    }

    pub fn reading_session(&self, book_id: &str, minutes: u32) {
        self.observe(EventKind::ReadingSession {
            book_id: book_id.into(),
            minutes,
        });
    }

    pub fn course_started(&self, course_id: &str, name: &str) {
        self.observe(EventKind::CourseStarted {
            course_id: course_id.into(),
            name: name.into(),
        });
    }

    pub fn course_message(&self, course_id: &str, from_user: bool) {
        self.observe(EventKind::CourseMessage {
            course_id: course_id.into(),
            from_user,
        });
    }

    pub fn flashcard_reviewed(&self, course_id: &str, correct: bool) {
        self.observe(EventKind::FlashcardReviewed {
            course_id: course_id.into(),
            correct,
        });
    }

    pub fn view_changed(&self, from: &str, to: &str) {
        self.observe(EventKind::ViewChanged {
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn app_opened(&self) {
        self.observe(EventKind::AppOpened);
    }

    pub fn app_closed(&self) {
        self.observe(EventKind::AppClosed);
    }
}

impl Inner {
    fn read_memory(&self) -> RwLockReadGuard<'_, Memory> {
        self.memory.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_memory(&self) -> RwLockWriteGuard<'_, Memory> {
        self.memory.write().unwrap_or_else(|e| e.into_inner())
    }

    fn take_pending(&self) -> Option<JoinHandle<()>> {
        self.pending_save
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    fn replace_pending(&self, handle: JoinHandle<()>) -> Option<JoinHandle<()>> {
        self.pending_save
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(handle)
    }
}
