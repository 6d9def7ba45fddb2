use std::io::Write;

use super::ExportError;
use crate::activity::Activity;

/// Write activities as a pretty-printed JSON array
pub fn write_activities<W: Write>(activities: &[Activity], mut output: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut output, activities)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::create_exercise;

    #[test]
    fn test_json_round_trip() {
        let exercise = create_exercise("FLEXIBILITY", "Yoga", 40, None).unwrap();
        let activities = vec![Activity::new(&exercise)];

        let mut buffer = Vec::new();
        write_activities(&activities, &mut buffer).unwrap();

        let parsed: Vec<Activity> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, activities);
        assert!(String::from_utf8(buffer).unwrap().contains("\"FLEXIBILITY\""));
    }
}
