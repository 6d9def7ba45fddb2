use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::activity::{Activity, ExerciseRecord};
use crate::error::DatabaseError;
use crate::exercise::ExerciseCategory;
use crate::goals::FitnessGoal;

/// Persistence operations behind the activity registry
pub trait ActivityStore {
    /// Persist an activity and return its new identifier
    fn save_activity(&mut self, activity: &Activity) -> Result<i64, DatabaseError>;

    /// All activities, newest first
    fn get_all_activities(&self) -> Result<Vec<Activity>, DatabaseError>;

    /// Activities of one category, newest first
    fn get_activities_by_category(
        &self,
        category: ExerciseCategory,
    ) -> Result<Vec<Activity>, DatabaseError>;

    fn total_calories(&self) -> Result<f64, DatabaseError>;

    /// Total minutes across all activities
    fn total_duration(&self) -> Result<u64, DatabaseError>;

    /// Returns false when no activity had that id
    fn delete_activity(&mut self, id: i64) -> Result<bool, DatabaseError>;

    /// Delete every activity, returning how many rows went
    fn clear_activities(&mut self) -> Result<usize, DatabaseError>;
}

/// Persistence operations behind the goal registry
pub trait GoalStore {
    /// Persist a goal and return its new identifier
    fn insert_goal(&mut self, goal: &FitnessGoal) -> Result<i64, DatabaseError>;

    /// Returns false when no goal had that id
    fn delete_goal(&mut self, id: i64) -> Result<bool, DatabaseError>;

    /// Write progress and completion flag; false when no goal had that id
    fn update_goal_progress(&mut self, goal: &FitnessGoal) -> Result<bool, DatabaseError>;

    /// All goals, newest start date first
    fn get_all_goals(&self) -> Result<Vec<FitnessGoal>, DatabaseError>;
}

/// SQLite-backed store
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Database {
    /// Create or open a database at the specified path
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, DatabaseError> {
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Private database living only as long as this handle
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema with tables and indexes
    fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exercise_name TEXT NOT NULL,
                category TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                intensity INTEGER NOT NULL,
                calories REAL NOT NULL,
                description TEXT NOT NULL,
                performed_at TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                goal_type TEXT NOT NULL,
                target_value REAL NOT NULL,
                current_progress REAL NOT NULL DEFAULT 0,
                unit TEXT NOT NULL,
                start_date TEXT NOT NULL,
                target_date TEXT,
                is_completed INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_activities_performed_at ON activities (performed_at);
            CREATE INDEX IF NOT EXISTS idx_activities_category ON activities (category);
            "#,
        )?;

        Ok(())
    }

    fn query_activities(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Activity>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, ActivityRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        // Rows that no longer decode are skipped rather than failing the whole read
        let activities = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match row.into_activity() {
                    Ok(activity) => Some(activity),
                    Err(e) => {
                        tracing::warn!(activity_id = id, error = %e, "Skipping unreadable activity row");
                        None
                    }
                }
            })
            .collect();

        Ok(activities)
    }
}

impl ActivityStore for Database {
    fn save_activity(&mut self, activity: &Activity) -> Result<i64, DatabaseError> {
        let exercise = activity.exercise();
        let rows = self.conn.execute(
            r#"
            INSERT INTO activities (
                exercise_name, category, duration_minutes, intensity,
                calories, description, performed_at, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                exercise.name,
                exercise.category.as_str(),
                exercise.duration_minutes,
                exercise.intensity,
                activity.calories(),
                exercise.description,
                activity.timestamp(),
                activity.notes(),
            ],
        )?;

        if rows == 0 {
            return Err(DatabaseError::Rejected {
                operation: "save_activity".to_string(),
            });
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(activity_id = id, "Activity saved");
        Ok(id)
    }

    fn get_all_activities(&self) -> Result<Vec<Activity>, DatabaseError> {
        self.query_activities(
            "SELECT * FROM activities ORDER BY performed_at DESC, id DESC",
            [],
        )
    }

    fn get_activities_by_category(
        &self,
        category: ExerciseCategory,
    ) -> Result<Vec<Activity>, DatabaseError> {
        self.query_activities(
            "SELECT * FROM activities WHERE category = ?1 ORDER BY performed_at DESC, id DESC",
            params![category.as_str()],
        )
    }

    fn total_calories(&self) -> Result<f64, DatabaseError> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(calories), 0.0) FROM activities",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    fn total_duration(&self) -> Result<u64, DatabaseError> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(duration_minutes), 0) FROM activities",
            [],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as u64)
    }

    fn delete_activity(&mut self, id: i64) -> Result<bool, DatabaseError> {
        let rows = self
            .conn
            .execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn clear_activities(&mut self) -> Result<usize, DatabaseError> {
        let rows = self.conn.execute("DELETE FROM activities", [])?;
        tracing::debug!(rows, "Cleared activities table");
        Ok(rows)
    }
}

impl GoalStore for Database {
    fn insert_goal(&mut self, goal: &FitnessGoal) -> Result<i64, DatabaseError> {
        let rows = self.conn.execute(
            r#"
            INSERT INTO goals (
                name, description, goal_type, target_value, current_progress,
                unit, start_date, target_date, is_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                goal.name(),
                goal.description(),
                goal.goal_type(),
                goal.target_value(),
                goal.current_progress(),
                goal.unit(),
                goal.start_date(),
                goal.target_date(),
                goal.is_completed(),
            ],
        )?;

        if rows == 0 {
            return Err(DatabaseError::Rejected {
                operation: "insert_goal".to_string(),
            });
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn delete_goal(&mut self, id: i64) -> Result<bool, DatabaseError> {
        let rows = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_goal_progress(&mut self, goal: &FitnessGoal) -> Result<bool, DatabaseError> {
        let Some(id) = goal.id() else {
            return Ok(false);
        };

        let rows = self.conn.execute(
            "UPDATE goals SET current_progress = ?1, is_completed = ?2 WHERE id = ?3",
            params![goal.current_progress(), goal.is_completed(), id],
        )?;
        Ok(rows > 0)
    }

    fn get_all_goals(&self) -> Result<Vec<FitnessGoal>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM goals ORDER BY start_date DESC, id DESC")?;

        let goals = stmt
            .query_map([], |row| {
                Ok(FitnessGoal::from_stored(
                    row.get("id")?,
                    row.get("name")?,
                    row.get("description")?,
                    row.get("goal_type")?,
                    row.get("target_value")?,
                    row.get("current_progress")?,
                    row.get("unit")?,
                    row.get::<_, DateTime<Utc>>("start_date")?,
                    row.get::<_, Option<NaiveDate>>("target_date")?,
                    row.get("is_completed")?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }
}

/// Raw activity columns before the category is parsed
struct ActivityRow {
    id: i64,
    name: String,
    category: String,
    duration_minutes: u32,
    intensity: u8,
    calories: f64,
    description: String,
    performed_at: DateTime<Utc>,
    notes: String,
}

impl ActivityRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("exercise_name")?,
            category: row.get("category")?,
            duration_minutes: row.get("duration_minutes")?,
            intensity: row.get("intensity")?,
            calories: row.get("calories")?,
            description: row.get("description")?,
            performed_at: row.get("performed_at")?,
            notes: row.get("notes")?,
        })
    }

    fn into_activity(self) -> Result<Activity, DatabaseError> {
        let category: ExerciseCategory =
            self.category
                .parse()
                .map_err(|e| DatabaseError::CorruptRow {
                    reason: format!("activity {}: {}", self.id, e),
                })?;

        Ok(Activity::from_stored(
            self.id,
            ExerciseRecord {
                name: self.name,
                category,
                duration_minutes: self.duration_minutes,
                intensity: self.intensity,
                description: self.description,
            },
            self.performed_at,
            self.calories,
            self.notes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhancement::Enhance;
    use crate::exercise::{create_exercise, Exercise};
    use tempfile::tempdir;

    fn sample_activity(category: &str, name: &str, minutes: u32) -> Activity {
        let exercise = create_exercise(category, name, minutes, None).unwrap();
        Activity::new(&exercise)
    }

    #[test]
    fn test_activity_round_trip_keeps_frozen_calories() {
        let mut db = Database::open_in_memory().unwrap();

        let exercise = create_exercise("STRENGTH", "Bench Press", 20, Some(7))
            .unwrap()
            .with_equipment("Barbell");
        let activity = Activity::with_notes(&exercise, "felt strong");
        let id = db.save_activity(&activity).unwrap();

        let all = db.get_all_activities().unwrap();
        assert_eq!(all.len(), 1);
        let loaded = &all[0];
        assert_eq!(loaded.id(), Some(id));
        assert!((loaded.calories() - exercise.calories()).abs() < 1e-9);
        assert_eq!(loaded.exercise().description, exercise.description());
        assert_eq!(loaded.notes(), "felt strong");
        assert_eq!(loaded.timestamp(), activity.timestamp());
    }

    #[test]
    fn test_aggregates_and_category_filter() {
        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(db.total_calories().unwrap(), 0.0);
        assert_eq!(db.total_duration().unwrap(), 0);

        db.save_activity(&sample_activity("CARDIO", "Run", 30)).unwrap();
        db.save_activity(&sample_activity("FLEXIBILITY", "Yoga", 20)).unwrap();
        db.save_activity(&sample_activity("CARDIO", "Bike", 10)).unwrap();

        assert!((db.total_calories().unwrap() - (240.0 + 70.0 + 80.0)).abs() < 1e-9);
        assert_eq!(db.total_duration().unwrap(), 60);

        let cardio = db.get_activities_by_category(ExerciseCategory::Cardio).unwrap();
        assert_eq!(cardio.len(), 2);
        assert_eq!(db.get_all_activities().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.save_activity(&sample_activity("CARDIO", "Run", 30)).unwrap();
        db.save_activity(&sample_activity("CARDIO", "Row", 15)).unwrap();

        assert!(db.delete_activity(id).unwrap());
        assert!(!db.delete_activity(id).unwrap());
        assert_eq!(db.clear_activities().unwrap(), 1);
        assert!(db.get_all_activities().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_category_is_skipped() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_activity(&sample_activity("CARDIO", "Run", 30)).unwrap();
        db.conn
            .execute(
                "INSERT INTO activities (exercise_name, category, duration_minutes, intensity, calories, description, performed_at) \
                 VALUES ('Mystery', 'DANCE', 10, 5, 50.0, 'Mystery', '2024-01-01 00:00:00+00:00')",
                [],
            )
            .unwrap();

        let all = db.get_all_activities().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].exercise().name, "Run");
    }

    #[test]
    fn test_goal_persistence() {
        let mut db = Database::open_in_memory().unwrap();
        let mut goal = FitnessGoal::new("Run 100 km", "distance", 100.0, "km");
        let id = db.insert_goal(&goal).unwrap();
        goal.assign_id(id);

        goal.set_progress(120.0);
        assert!(db.update_goal_progress(&goal).unwrap());

        let goals = db.get_all_goals().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id(), Some(id));
        assert!(goals[0].is_completed());
        assert_eq!(goals[0].current_progress(), 120.0);

        assert!(db.delete_goal(id).unwrap());
        assert!(!db.delete_goal(id).unwrap());
        assert!(db.get_all_goals().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fittrack.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.save_activity(&sample_activity("STRENGTH", "Squat", 25)).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let activities = db.get_all_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].duration(), 25);
    }
}
