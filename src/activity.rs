//! Logged activities and the activity registry
//!
//! An [`Activity`] freezes everything about an exercise at the moment it is
//! logged, so wrapped exercises come back from the store with the same
//! description and calorie value. [`ActivityRegistry`] keeps an in-memory
//! copy of the store in insertion order and writes to the store first.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::database::ActivityStore;
use crate::error::Result;
use crate::exercise::{Exercise, ExerciseCategory};
use crate::notify::{ListenerId, ListenerList};

/// Snapshot of an exercise's read interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub category: ExerciseCategory,
    pub duration_minutes: u32,
    pub intensity: u8,
    pub description: String,
}

impl ExerciseRecord {
    pub fn capture(exercise: &dyn Exercise) -> Self {
        Self {
            name: exercise.name().to_string(),
            category: exercise.category(),
            duration_minutes: exercise.duration(),
            intensity: exercise.intensity(),
            description: exercise.description(),
        }
    }
}

/// A timestamped record of a performed exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    id: Option<i64>,
    exercise: ExerciseRecord,
    timestamp: DateTime<Utc>,
    calories: f64,
    notes: String,
}

impl Activity {
    pub fn new(exercise: &dyn Exercise) -> Self {
        Self::with_notes(exercise, "")
    }

    /// Capture the exercise now; calories are computed once here and never again
    pub fn with_notes(exercise: &dyn Exercise, notes: impl Into<String>) -> Self {
        Self {
            id: None,
            exercise: ExerciseRecord::capture(exercise),
            timestamp: Utc::now(),
            calories: exercise.calories(),
            notes: notes.into(),
        }
    }

    pub(crate) fn from_stored(
        id: i64,
        exercise: ExerciseRecord,
        timestamp: DateTime<Utc>,
        calories: f64,
        notes: String,
    ) -> Self {
        Self {
            id: Some(id),
            exercise,
            timestamp,
            calories,
            notes,
        }
    }

    /// Identifier assigned by the store, `None` until persisted
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn exercise(&self) -> &ExerciseRecord {
        &self.exercise
    }

    pub fn name(&self) -> &str {
        &self.exercise.name
    }

    pub fn category(&self) -> ExerciseCategory {
        self.exercise.category
    }

    pub fn duration(&self) -> u32 {
        self.exercise.duration_minutes
    }

    pub fn calories(&self) -> f64 {
        self.calories
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Capture time in local time, `yyyy-mm-dd HH:MM`
    pub fn formatted_date(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} - {} ({:.0} cal)",
            self.formatted_date(),
            self.exercise.name,
            self.calories
        )
    }
}

/// Change delivered to activity listeners
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    Added(Activity),
    Cleared { removed: usize },
}

struct ActivityState<S> {
    store: S,
    activities: Vec<Activity>,
}

/// Cache-plus-store collection of logged activities
///
/// Listeners run after the registry lock is released, so with concurrent
/// writers events may arrive in a different order than the writes were
/// persisted.
pub struct ActivityRegistry<S> {
    state: Mutex<ActivityState<S>>,
    listeners: ListenerList<ActivityEvent>,
}

impl<S: ActivityStore> ActivityRegistry<S> {
    /// Registry with an empty cache, whatever the store already holds
    pub fn new(store: S) -> Self {
        Self {
            state: Mutex::new(ActivityState {
                store,
                activities: Vec::new(),
            }),
            listeners: ListenerList::new(),
        }
    }

    /// Registry whose cache is populated from the store
    pub fn load(store: S) -> Self {
        let mut activities = match store.get_all_activities() {
            Ok(activities) => activities,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load activities, starting empty");
                Vec::new()
            }
        };
        // Store returns newest first; the cache is in insertion order
        activities.reverse();

        tracing::info!(count = activities.len(), "Loaded activities");
        Self {
            state: Mutex::new(ActivityState { store, activities }),
            listeners: ListenerList::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ActivityState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the activity, then cache it and notify listeners.
    ///
    /// On a store failure the cache is untouched and no listener runs.
    pub fn add(&self, activity: Activity) -> Result<i64> {
        let stored = {
            let mut state = self.state();
            let id = state.store.save_activity(&activity).map_err(|e| {
                tracing::warn!(error = %e, name = activity.name(), "Activity was not saved");
                e
            })?;

            let stored = Activity {
                id: Some(id),
                ..activity
            };
            state.activities.push(stored.clone());
            stored
        };

        tracing::info!(
            activity_id = stored.id,
            name = stored.name(),
            calories = stored.calories,
            "Activity logged"
        );
        self.listeners.notify(&ActivityEvent::Added(stored.clone()));
        Ok(stored.id.unwrap_or_default())
    }

    /// Copy of the cache in insertion order
    pub fn list(&self) -> Vec<Activity> {
        self.state().activities.clone()
    }

    /// Activities whose category matches `tag`, ignoring case
    pub fn list_by_category(&self, tag: &str) -> Vec<Activity> {
        let tag = tag.trim();
        self.state()
            .activities
            .iter()
            .filter(|a| a.category().as_str().eq_ignore_ascii_case(tag))
            .cloned()
            .collect()
    }

    /// The last `n` activities, newest first
    pub fn recent(&self, n: usize) -> Vec<Activity> {
        self.state().activities.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state().activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total calories according to the store
    pub fn total_calories(&self) -> Result<f64> {
        Ok(self.state().store.total_calories()?)
    }

    /// Total minutes according to the store
    pub fn total_duration(&self) -> Result<u64> {
        Ok(self.state().store.total_duration()?)
    }

    /// Delete every activity from the store, then from the cache
    pub fn clear(&self) -> Result<usize> {
        let removed = {
            let mut state = self.state();
            let removed = state.store.clear_activities().map_err(|e| {
                tracing::warn!(error = %e, "Activities were not cleared");
                e
            })?;
            state.activities.clear();
            removed
        };

        tracing::info!(removed, "Activities cleared");
        self.listeners.notify(&ActivityEvent::Cleared { removed });
        Ok(removed)
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ActivityEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<S> std::fmt::Debug for ActivityRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRegistry")
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::enhancement::Enhance;
    use crate::exercise::create_exercise;
    use std::sync::Arc;

    fn registry() -> ActivityRegistry<Database> {
        ActivityRegistry::new(Database::open_in_memory().unwrap())
    }

    fn log(registry: &ActivityRegistry<Database>, category: &str, name: &str, minutes: u32) -> i64 {
        let exercise = create_exercise(category, name, minutes, None).unwrap();
        registry.add(Activity::new(&exercise)).unwrap()
    }

    #[test]
    fn test_activity_freezes_calories_and_description() {
        let exercise = create_exercise("CARDIO", "Run", 30, Some(6))
            .unwrap()
            .with_music("Upbeat");
        let activity = Activity::with_notes(&exercise, "park loop");

        assert!((activity.calories() - 8.0 * 30.0 * 6.0 / 5.0 * 1.03).abs() < 1e-9);
        assert_eq!(activity.exercise().description, exercise.description());
        assert_eq!(activity.id(), None);
        assert_eq!(activity.notes(), "park loop");
    }

    #[test]
    fn test_summary_format() {
        let exercise = create_exercise("STRENGTH", "Deadlift", 10, None).unwrap();
        let activity = Activity::new(&exercise);
        let summary = activity.summary();

        assert!(summary.ends_with(" - Deadlift (60 cal)"));
        assert_eq!(activity.formatted_date().len(), "2024-01-01 12:00".len());
    }

    #[test]
    fn test_add_assigns_id_and_keeps_insertion_order() {
        let registry = registry();
        let first = log(&registry, "CARDIO", "Run", 30);
        let second = log(&registry, "FLEXIBILITY", "Yoga", 20);

        let list = registry.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id(), Some(first));
        assert_eq!(list[1].id(), Some(second));
        assert_eq!(registry.recent(1)[0].name(), "Yoga");
    }

    #[test]
    fn test_list_is_a_copy() {
        let registry = registry();
        log(&registry, "CARDIO", "Run", 30);

        let mut copy = registry.list();
        copy.clear();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_by_category_ignores_case() {
        let registry = registry();
        log(&registry, "CARDIO", "Run", 30);
        log(&registry, "STRENGTH", "Squat", 20);
        log(&registry, "cardio", "Bike", 15);

        assert_eq!(registry.list_by_category("cardio").len(), 2);
        assert_eq!(registry.list_by_category("Strength").len(), 1);
        assert!(registry.list_by_category("yoga").is_empty());
    }

    #[test]
    fn test_totals_come_from_store() {
        let registry = registry();
        log(&registry, "CARDIO", "Run", 30);
        log(&registry, "STRENGTH", "Squat", 20);

        assert!((registry.total_calories().unwrap() - 360.0).abs() < 1e-9);
        assert_eq!(registry.total_duration().unwrap(), 50);
    }

    #[test]
    fn test_clear_and_listeners() {
        let registry = registry();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = registry.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        log(&registry, "CARDIO", "Run", 30);
        assert_eq!(registry.clear().unwrap(), 1);
        assert!(registry.is_empty());

        assert!(registry.unsubscribe(id));
        log(&registry, "CARDIO", "Run", 30);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ActivityEvent::Added(_)));
        assert_eq!(events[1], ActivityEvent::Cleared { removed: 1 });
    }

    #[test]
    fn test_load_restores_insertion_order() {
        let mut db = Database::open_in_memory().unwrap();
        for (name, minutes) in [("Run", 30), ("Row", 20)] {
            let exercise = create_exercise("CARDIO", name, minutes, None).unwrap();
            db.save_activity(&Activity::new(&exercise)).unwrap();
        }

        let registry = ActivityRegistry::load(db);
        let names: Vec<_> = registry.list().iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names, vec!["Run", "Row"]);
    }
}
