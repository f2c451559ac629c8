//! Door content store.
//!
//! # Responsibility
//! - Load and normalize day-indexed content records from a CSV source.
//! - Cache loaded content per source path for the process lifetime.
//!
//! # Invariants
//! - A missing source file is a normal empty-content condition, not an error.
//! - Schema errors are fatal for the load; no partial data is ever returned.
//! - Cached content is immutable; only an explicit reload re-reads the source.

use log::{error, info};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

mod loader;

use crate::model::card::ContentRow;

/// Day-indexed content records, ordered by day.
pub type ContentMap = BTreeMap<u8, ContentRow>;

pub type ContentResult<T> = Result<T, ContentError>;

/// Content-layer error for schema validation and source reading.
#[derive(Debug)]
pub enum ContentError {
    /// Required header columns are absent from the source.
    MissingColumns(Vec<String>),
    /// A `day` cell cannot be parsed as an integer.
    InvalidDay { line: u64, value: String },
    /// The same day appears in more than one row.
    DuplicateDay(u8),
    /// Transport-level CSV read/decode failure.
    Csv(csv::Error),
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumns(names) => {
                write!(f, "content source is missing required columns: {}", names.join(", "))
            }
            Self::InvalidDay { line, value } => {
                write!(f, "content source line {line} has non-integer day value `{value}`")
            }
            Self::DuplicateDay(day) => {
                write!(f, "content source contains more than one row for day {day}")
            }
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for ContentError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

static CONTENT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<ContentMap>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Loads door content for `path`, serving repeated calls from the cache.
///
/// # Contract
/// - The first call per path reads and validates the source; later calls
///   return the same `Arc` without touching the filesystem.
/// - A missing file yields an empty map (all doors render with defaults).
/// - Failed loads are not cached; the next call retries the read.
pub fn load_content(path: impl AsRef<Path>) -> ContentResult<Arc<ContentMap>> {
    let path = path.as_ref();

    {
        let cache = cache_lock();
        if let Some(cached) = cache.get(path) {
            return Ok(Arc::clone(cached));
        }
    }

    let loaded = Arc::new(read_content(path)?);
    cache_lock().insert(path.to_path_buf(), Arc::clone(&loaded));
    Ok(loaded)
}

/// Invalidates the cache entry for `path` and re-reads the source.
pub fn reload_content(path: impl AsRef<Path>) -> ContentResult<Arc<ContentMap>> {
    let path = path.as_ref();
    cache_lock().remove(path);
    load_content(path)
}

/// Reads and validates door content without touching the process cache.
///
/// # Side effects
/// - Reads the source file when present.
/// - Emits `content_load` logging events with row count and duration.
pub fn read_content(path: impl AsRef<Path>) -> ContentResult<ContentMap> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=content_load module=content status=start source={}", path.display());

    if !path.exists() {
        info!(
            "event=content_load module=content status=ok source={} rows=0 reason=source_missing duration_ms={}",
            path.display(),
            started_at.elapsed().as_millis()
        );
        return Ok(ContentMap::new());
    }

    match loader::read_csv_file(path) {
        Ok(rows) => {
            info!(
                "event=content_load module=content status=ok source={} rows={} duration_ms={}",
                path.display(),
                rows.len(),
                started_at.elapsed().as_millis()
            );
            Ok(rows)
        }
        Err(err) => {
            error!(
                "event=content_load module=content status=error source={} duration_ms={} error={}",
                path.display(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn cache_lock() -> MutexGuard<'static, HashMap<PathBuf, Arc<ContentMap>>> {
    // A poisoned cache only means a previous caller panicked mid-insert;
    // the map itself is still a valid cache.
    match CONTENT_CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
