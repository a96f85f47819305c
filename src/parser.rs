// Bootstrap Source Parsers
//
// One reader per entity kind. Each source is a UTF-8 CSV file with a header
// row whose columns match the entity's constructor fields. Rows deserialize
// through serde into a raw row struct, then build the entity value; a bad
// row fails the whole source (the bootstrap loader isolates that failure
// from the other sources).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::entities::{Course, Instructor, Module, Student};

#[derive(Debug, Deserialize)]
struct StudentRow {
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    email: String,
    #[serde(rename = "enrollmentDate")]
    enrollment_date: String,
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    title: String,
    description: String,
    credits: u32,
    #[serde(rename = "startDate")]
    start_date: String,
}

#[derive(Debug, Deserialize)]
struct InstructorRow {
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    expertise: u32,
}

#[derive(Debug, Deserialize)]
struct ModuleRow {
    title: String,
    content: String,
}

fn parse_date(raw: &str, line: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}' on row {}", raw, line))
}

pub fn load_students(path: &Path) -> Result<Vec<Student>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open student source {}", path.display()))?;

    let mut students = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: StudentRow =
            result.with_context(|| format!("malformed student row {}", index + 1))?;
        let enrolled = parse_date(&row.enrollment_date, index + 1)?;
        students.push(Student::new(row.first_name, row.last_name, row.email, enrolled));
    }
    Ok(students)
}

pub fn load_courses(path: &Path) -> Result<Vec<Course>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open course source {}", path.display()))?;

    let mut courses = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: CourseRow =
            result.with_context(|| format!("malformed course row {}", index + 1))?;
        let starts = parse_date(&row.start_date, index + 1)?;
        courses.push(Course::new(row.title, row.description, row.credits, starts));
    }
    Ok(courses)
}

pub fn load_instructors(path: &Path) -> Result<Vec<Instructor>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open instructor source {}", path.display()))?;

    let mut instructors = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: InstructorRow =
            result.with_context(|| format!("malformed instructor row {}", index + 1))?;
        instructors.push(Instructor::new(row.first_name, row.last_name, row.expertise));
    }
    Ok(instructors)
}

pub fn load_modules(path: &Path) -> Result<Vec<Module>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open module source {}", path.display()))?;

    let mut modules = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: ModuleRow =
            result.with_context(|| format!("malformed module row {}", index + 1))?;
        modules.push(Module::new(row.title, row.content));
    }
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_students_parses_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "students.csv",
            "firstName,lastName,email,enrollmentDate\n\
             Ada,Lovelace,ada@example.com,2024-09-01\n\
             Alan,Turing,alan@example.com,2024-09-02\n",
        );

        let students = load_students(&path).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].email, "ada@example.com");
        assert_eq!(students[1].first_name, "Alan");
        assert_eq!(
            students[0].enrollment_date,
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_load_students_rejects_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "students.csv",
            "firstName,lastName,email,enrollmentDate\n\
             Ada,Lovelace,ada@example.com,not-a-date\n",
        );

        let err = load_students(&path).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_load_courses_parses_credits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "courses.csv",
            "title,description,credits,startDate\n\
             Rust 101,Ownership basics,5,2025-02-01\n",
        );

        let courses = load_courses(&path).unwrap();
        assert_eq!(courses[0].credits, 5);
        assert_eq!(courses[0].title, "Rust 101");
    }

    #[test]
    fn test_load_instructors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "instructors.csv",
            "firstName,lastName,expertise\nGrace,Hopper,5\n",
        );

        let instructors = load_instructors(&path).unwrap();
        assert_eq!(instructors.len(), 1);
        assert_eq!(instructors[0].expertise, 5);
    }

    #[test]
    fn test_load_modules_handles_quoted_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "modules.csv",
            "title,content\nWeek 1,\"Variables, bindings, shadowing\"\n",
        );

        let modules = load_modules(&path).unwrap();
        assert_eq!(modules[0].content, "Variables, bindings, shadowing");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_modules(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to open module source"));
    }
}
