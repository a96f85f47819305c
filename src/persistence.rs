// Snapshot Persistence
//
// Serializes a store's current contents to a durable file. The write goes
// to a temporary file in the destination directory and is then renamed over
// the destination, so a concurrent reader never observes a half-written
// snapshot. Called synchronously after every successful mutation; a failed
// write never rolls back the in-memory state (the caller logs and carries
// on, accepting a memory/disk divergence window until the next save).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// On-disk snapshot encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Pretty-printed JSON array, dates in calendar-date text form.
    Json,
    /// CSV with a header row, same column set as the JSON fields.
    Csv,
}

impl SnapshotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Csv => "csv",
        }
    }

    /// Parses a format name as configured, e.g. through the environment.
    pub fn parse(raw: &str) -> Option<SnapshotFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(SnapshotFormat::Json),
            "csv" => Some(SnapshotFormat::Csv),
            _ => None,
        }
    }
}

/// Writes a complete snapshot of `entities` to `path` atomically.
pub fn save<T: Serialize>(entities: &[T], path: &Path, format: SnapshotFormat) -> Result<()> {
    let bytes = match format {
        SnapshotFormat::Json => {
            let mut json = serde_json::to_string_pretty(entities)
                .context("failed to serialize snapshot to JSON")?;
            json.push('\n');
            json.into_bytes()
        }
        SnapshotFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for entity in entities {
                writer
                    .serialize(entity)
                    .context("failed to serialize snapshot row to CSV")?;
            }
            writer
                .into_inner()
                .map_err(|err| anyhow::anyhow!("failed to flush CSV snapshot buffer: {}", err))?
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create snapshot directory {}", parent.display())
            })?;
        }
    }

    // Temp file lives next to the destination so the rename stays on one
    // filesystem and therefore atomic.
    let tmp_path = path.with_extension(format!("{}.tmp", format.extension()));
    fs::write(&tmp_path, &bytes)
        .with_context(|| format!("failed to write snapshot temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move snapshot into place at {}",
            path.display()
        )
    })?;

    Ok(())
}

/// Reads back a JSON snapshot written by [`save`].
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

/// Reads back a CSV snapshot written by [`save`]. A zero-byte file is the
/// valid snapshot of an empty store and yields an empty list.
pub fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;

    let mut entities = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let entity: T = result.with_context(|| {
            format!("failed to parse snapshot {} row {}", path.display(), index + 1)
        })?;
        entities.push(entity);
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Module, Student};
    use chrono::NaiveDate;

    fn students() -> Vec<Student> {
        vec![
            Student::new(
                "Ada",
                "Lovelace",
                "ada@example.com",
                NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            ),
            Student::new(
                "Alan",
                "Turing",
                "alan@example.com",
                NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        save(&students(), &path, SnapshotFormat::Json).unwrap();
        let back: Vec<Student> = load_json(&path).unwrap();
        assert_eq!(back, students());
    }

    #[test]
    fn test_json_snapshot_is_human_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        save(&students(), &path, SnapshotFormat::Json).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"email\": \"ada@example.com\""));
        assert!(text.contains("\"2024-09-01\""));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        save(&students(), &path, SnapshotFormat::Json).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["students.json"]);
    }

    #[test]
    fn test_save_replaces_previous_snapshot_completely() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.json");

        let first = vec![Module::new("Week 1", "Variables"), Module::new("Week 2", "Structs")];
        save(&first, &path, SnapshotFormat::Json).unwrap();

        let second = vec![Module::new("Week 1", "Variables")];
        save(&second, &path, SnapshotFormat::Json).unwrap();

        let back: Vec<Module> = load_json(&path).unwrap();
        assert_eq!(back, second);
    }

    #[test]
    fn test_save_creates_missing_snapshot_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("modules.json");

        save(&[Module::new("Week 1", "Variables")], &path, SnapshotFormat::Json).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_csv_snapshot_has_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        save(&students(), &path, SnapshotFormat::Csv).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "firstName,lastName,email,enrollmentDate"
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        save(&students(), &path, SnapshotFormat::Csv).unwrap();
        let back: Vec<Student> = load_csv(&path).unwrap();
        assert_eq!(back, students());
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        save::<Student>(&[], &path, SnapshotFormat::Json).unwrap();
        let back: Vec<Student> = load_json(&path).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_empty_csv_snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        save::<Student>(&[], &path, SnapshotFormat::Csv).unwrap();
        let back: Vec<Student> = load_csv(&path).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(SnapshotFormat::parse("json"), Some(SnapshotFormat::Json));
        assert_eq!(SnapshotFormat::parse(" CSV "), Some(SnapshotFormat::Csv));
        assert_eq!(SnapshotFormat::parse("yaml"), None);
    }
}
