use csv::Writer;
use std::io::Write;

use super::ExportError;
use crate::activity::Activity;

const HEADER: [&str; 9] = [
    "id",
    "timestamp",
    "name",
    "category",
    "duration_minutes",
    "intensity",
    "calories",
    "description",
    "notes",
];

/// Write one CSV row per activity, with a header row
pub fn write_activities<W: Write>(activities: &[Activity], output: W) -> Result<(), ExportError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for activity in activities {
        let exercise = activity.exercise();
        writer.write_record(&[
            activity.id().map_or(String::new(), |id| id.to_string()),
            activity.timestamp().to_rfc3339(),
            exercise.name.clone(),
            exercise.category.as_str().to_string(),
            exercise.duration_minutes.to_string(),
            exercise.intensity.to_string(),
            format!("{:.2}", activity.calories()),
            exercise.description.clone(),
            activity.notes().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
