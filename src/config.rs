// Configuration
//
// Where the bootstrap sources live, where snapshots get written, and which
// encoding snapshots use. Everything defaults relative to the working
// directory and can be overridden through the environment.

use std::env;
use std::path::{Path, PathBuf};

use log::warn;

use crate::persistence::SnapshotFormat;

pub const SOURCE_DIR_ENV: &str = "CATALOG_DATA_DIR";
pub const SNAPSHOT_DIR_ENV: &str = "CATALOG_SNAPSHOT_DIR";
pub const SNAPSHOT_FORMAT_ENV: &str = "CATALOG_SNAPSHOT_FORMAT";

const DEFAULT_SOURCE_DIR: &str = "data";
const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

/// The four entity kinds the catalog manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Course,
    Instructor,
    Module,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Student,
        EntityKind::Course,
        EntityKind::Instructor,
        EntityKind::Module,
    ];

    /// Plural name, used for source/snapshot file names and log lines.
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Course => "courses",
            EntityKind::Instructor => "instructors",
            EntityKind::Module => "modules",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub snapshot_format: SnapshotFormat,
}

impl Config {
    pub fn new(source_dir: impl Into<PathBuf>, snapshot_dir: impl Into<PathBuf>) -> Self {
        Config {
            source_dir: source_dir.into(),
            snapshot_dir: snapshot_dir.into(),
            snapshot_format: SnapshotFormat::Json,
        }
    }

    pub fn with_snapshot_format(mut self, format: SnapshotFormat) -> Self {
        self.snapshot_format = format;
        self
    }

    /// Reads directories and snapshot format from the environment, falling
    /// back to `data/`, `snapshots/`, and JSON.
    pub fn from_env() -> Self {
        let snapshot_format = match env::var(SNAPSHOT_FORMAT_ENV) {
            Ok(raw) => SnapshotFormat::parse(&raw).unwrap_or_else(|| {
                warn!(
                    "unknown snapshot format '{}' in {}, using json",
                    raw, SNAPSHOT_FORMAT_ENV
                );
                SnapshotFormat::Json
            }),
            Err(_) => SnapshotFormat::Json,
        };

        Config {
            source_dir: env::var_os(SOURCE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            snapshot_dir: env::var_os(SNAPSHOT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_DIR)),
            snapshot_format,
        }
    }

    /// Bootstrap source for one kind, e.g. `data/students.csv`.
    pub fn source_path(&self, kind: EntityKind) -> PathBuf {
        self.source_dir.join(format!("{}.csv", kind.plural()))
    }

    /// Snapshot destination for one kind, e.g. `snapshots/students.json`;
    /// the extension follows the configured format.
    pub fn snapshot_path(&self, kind: EntityKind) -> PathBuf {
        self.snapshot_dir.join(format!(
            "{}.{}",
            kind.plural(),
            self.snapshot_format.extension()
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(Path::new(DEFAULT_SOURCE_DIR), Path::new(DEFAULT_SNAPSHOT_DIR))
    }
}
