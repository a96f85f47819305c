// Catalog - Lifecycle Manager
//
// The single composition point: owns the four stores, runs the one-time
// parallel bootstrap at construction, and exposes per-kind save operations.
// A Catalog value is built once at process start and handed to every caller
// by reference; "reset" (test isolation) is constructing a fresh Catalog,
// which re-bootstraps from the sources. There is no hidden global instance.

use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::Serialize;

use crate::bootstrap::{self, LoadReport, LoadTask};
use crate::config::{Config, EntityKind};
use crate::entities::{Course, Instructor, Module, Student};
use crate::parser;
use crate::persistence;
use crate::store::{Identified, Store};

pub struct Catalog {
    config: Config,
    students: Store<Student>,
    courses: Store<Course>,
    instructors: Store<Instructor>,
    modules: Store<Module>,
    // One save lock per kind: the snapshot is taken inside the lock, so
    // snapshot order matches file write order and a later write can never
    // carry an older view than an earlier one. Kinds stay independent.
    save_locks: SaveLocks,
}

#[derive(Default)]
struct SaveLocks {
    students: Mutex<()>,
    courses: Mutex<()>,
    instructors: Mutex<()>,
    modules: Mutex<()>,
}

/// Populates a store from parsed source rows. Rows whose identity collides
/// with an earlier row are skipped with a warning; the source stays usable.
fn fill<T>(kind: EntityKind, store: &Store<T>, entities: Vec<T>) -> usize
where
    T: Identified + Clone + PartialEq,
{
    let mut inserted = 0;
    for entity in entities {
        let id = entity.identity();
        if store.add(entity) {
            inserted += 1;
        } else {
            warn!(
                "bootstrap: duplicate {} identity '{}' in source, row skipped",
                kind.plural(),
                id
            );
        }
    }
    inserted
}

impl Catalog {
    /// Builds the four empty stores, loads all sources in parallel, and
    /// blocks until every source has finished or failed. A failed source
    /// leaves its store empty and is reported; the catalog still serves.
    pub fn bootstrap(config: Config) -> (Catalog, LoadReport) {
        let catalog = Catalog {
            config,
            students: Store::new(),
            courses: Store::new(),
            instructors: Store::new(),
            modules: Store::new(),
            save_locks: SaveLocks::default(),
        };

        info!("catalog: loading sources from {}", catalog.config.source_dir.display());
        let report = bootstrap::load_all(vec![
            LoadTask::new(EntityKind::Student.plural(), || {
                let path = catalog.config.source_path(EntityKind::Student);
                let loaded = parser::load_students(&path)?;
                Ok(fill(EntityKind::Student, &catalog.students, loaded))
            }),
            LoadTask::new(EntityKind::Course.plural(), || {
                let path = catalog.config.source_path(EntityKind::Course);
                let loaded = parser::load_courses(&path)?;
                Ok(fill(EntityKind::Course, &catalog.courses, loaded))
            }),
            LoadTask::new(EntityKind::Instructor.plural(), || {
                let path = catalog.config.source_path(EntityKind::Instructor);
                let loaded = parser::load_instructors(&path)?;
                Ok(fill(EntityKind::Instructor, &catalog.instructors, loaded))
            }),
            LoadTask::new(EntityKind::Module.plural(), || {
                let path = catalog.config.source_path(EntityKind::Module);
                let loaded = parser::load_modules(&path)?;
                Ok(fill(EntityKind::Module, &catalog.modules, loaded))
            }),
        ]);

        info!(
            "catalog ready: students={}, courses={}, instructors={}, modules={}",
            catalog.students.size(),
            catalog.courses.size(),
            catalog.instructors.size(),
            catalog.modules.size(),
        );
        for failure in report.failures() {
            warn!(
                "catalog: source '{}' unavailable, serving empty store: {}",
                failure.name,
                failure.result.as_ref().unwrap_err()
            );
        }

        (catalog, report)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn students(&self) -> &Store<Student> {
        &self.students
    }

    pub fn courses(&self) -> &Store<Course> {
        &self.courses
    }

    pub fn instructors(&self) -> &Store<Instructor> {
        &self.instructors
    }

    pub fn modules(&self) -> &Store<Module> {
        &self.modules
    }

    fn save_kind<T>(&self, kind: EntityKind, lock: &Mutex<()>, store: &Store<T>) -> Result<()>
    where
        T: Identified + Clone + PartialEq + Serialize,
    {
        let _guard = lock.lock().unwrap();
        let snapshot = store.get_all();
        let path = self.config.snapshot_path(kind);
        match persistence::save(&snapshot, &path, self.config.snapshot_format) {
            Ok(()) => {
                info!(
                    "saved {} {} to {}",
                    snapshot.len(),
                    kind.plural(),
                    path.display()
                );
                Ok(())
            }
            Err(err) => {
                // In-memory state stays applied; memory and disk may diverge
                // until the next successful save.
                error!("failed to save {}: {:#}", kind.plural(), err);
                Err(err).with_context(|| format!("saving {} snapshot", kind.plural()))
            }
        }
    }

    pub fn save_students(&self) -> Result<()> {
        self.save_kind(EntityKind::Student, &self.save_locks.students, &self.students)
    }

    pub fn save_courses(&self) -> Result<()> {
        self.save_kind(EntityKind::Course, &self.save_locks.courses, &self.courses)
    }

    pub fn save_instructors(&self) -> Result<()> {
        self.save_kind(
            EntityKind::Instructor,
            &self.save_locks.instructors,
            &self.instructors,
        )
    }

    pub fn save_modules(&self) -> Result<()> {
        self.save_kind(EntityKind::Module, &self.save_locks.modules, &self.modules)
    }
}
