//! CSV parsing and normalization for door content.
//!
//! # Responsibility
//! - Match header columns case-insensitively after trimming.
//! - Coerce and range-check day keys, trim field values.
//!
//! # Invariants
//! - Required columns are `day` and `text`; their absence is a schema error.
//! - At most one row per day survives; duplicates are a schema error.

use super::{ContentError, ContentMap, ContentResult};
use crate::model::card::{is_valid_day, ContentRow};
use csv::StringRecord;
use log::warn;
use std::io::Read;
use std::path::Path;

const COLUMN_DAY: &str = "day";
const COLUMN_TEXT: &str = "text";
const COLUMN_TITLE: &str = "title";
const COLUMN_PERSON: &str = "person";
const COLUMN_IMAGE_URL: &str = "image_url";

struct ColumnLayout {
    day: usize,
    text: usize,
    title: Option<usize>,
    person: Option<usize>,
    image_url: Option<usize>,
}

/// Reads and validates a content CSV file into a day-indexed map.
pub fn read_csv_file(path: &Path) -> ContentResult<ContentMap> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv(reader)
}

fn read_csv<R: Read>(mut reader: csv::Reader<R>) -> ContentResult<ContentMap> {
    let layout = resolve_columns(reader.headers()?)?;
    let mut rows = ContentMap::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());

        let day_cell = field(&record, Some(layout.day));
        let day: u8 = day_cell.parse().map_err(|_| ContentError::InvalidDay {
            line,
            value: day_cell.to_string(),
        })?;

        if !is_valid_day(day) {
            warn!(
                "event=content_load module=content status=skip line={line} day={day} reason=day_out_of_range"
            );
            continue;
        }

        let title = field(&record, layout.title);
        let row = ContentRow {
            day,
            title: (!title.is_empty()).then(|| title.to_string()),
            text: field(&record, Some(layout.text)).to_string(),
            person: field(&record, layout.person).to_string(),
            image_url: field(&record, layout.image_url).to_string(),
        };

        if rows.insert(day, row).is_some() {
            return Err(ContentError::DuplicateDay(day));
        }
    }

    Ok(rows)
}

fn resolve_columns(headers: &StringRecord) -> ContentResult<ColumnLayout> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };

    let day = position(COLUMN_DAY);
    let text = position(COLUMN_TEXT);

    let mut missing = Vec::new();
    if day.is_none() {
        missing.push(COLUMN_DAY.to_string());
    }
    if text.is_none() {
        missing.push(COLUMN_TEXT.to_string());
    }
    if !missing.is_empty() {
        return Err(ContentError::MissingColumns(missing));
    }

    Ok(ColumnLayout {
        day: day.unwrap_or_default(),
        text: text.unwrap_or_default(),
        title: position(COLUMN_TITLE),
        person: position(COLUMN_PERSON),
        image_url: position(COLUMN_IMAGE_URL),
    })
}

fn field<'a>(record: &'a StringRecord, index: Option<usize>) -> &'a str {
    index
        .and_then(|index| record.get(index))
        .map(str::trim)
        .unwrap_or_default()
}
