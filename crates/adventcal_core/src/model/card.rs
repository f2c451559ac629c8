//! Door content record and card view-model.
//!
//! # Responsibility
//! - Define the normalized content row loaded from the external source.
//! - Define the per-render card projection with lock/reveal flags.
//!
//! # Invariants
//! - `day` is the unique key; valid days are `1..=24`.
//! - A `CardViewModel` with `locked == true` always reports `revealed == false`.

use serde::{Deserialize, Serialize};

/// First door day of the calendar.
pub const FIRST_DAY: u8 = 1;

/// Number of doors in the calendar.
pub const DOOR_COUNT: u8 = 24;

/// Returns whether `day` addresses a door of this calendar.
pub fn is_valid_day(day: u8) -> bool {
    (FIRST_DAY..=DOOR_COUNT).contains(&day)
}

/// Default title for a door whose source row has no usable title.
pub fn fallback_title(day: u8) -> String {
    format!("Impulse for day {day}")
}

/// Normalized content for one door, as loaded from the external source.
///
/// Absent optional fields are kept as empty strings so consumers never deal
/// with per-field nullability beyond `title`, which drives the fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    /// Door day, unique key in `1..=24`.
    pub day: u8,
    /// Source title; `None` when the cell was absent or blank.
    pub title: Option<String>,
    /// Hidden message body. Line breaks are significant.
    pub text: String,
    /// Optional attribution.
    pub person: String,
    /// Optional image URL for the door front.
    pub image_url: String,
}

impl ContentRow {
    /// Creates an all-default row for a day absent from the source.
    pub fn empty(day: u8) -> Self {
        Self {
            day,
            title: None,
            text: String::new(),
            person: String::new(),
            image_url: String::new(),
        }
    }
}

/// Visual state of one door, collapsing the lock/reveal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    /// Not yet reachable; activation is rejected.
    Locked,
    /// Open for interaction, message hidden.
    Collapsed,
    /// Open for interaction, message shown.
    Revealed,
}

/// Renderable projection of one door for a single render pass.
///
/// Rebuilt from content + policy + reveal state on every render; never
/// persisted itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardViewModel {
    pub day: u8,
    /// Concrete display title; the fallback rule is already applied.
    pub title: String,
    pub text: String,
    pub person: String,
    pub image_url: String,
    pub locked: bool,
    /// Meaningless for locked doors and forced to `false` there.
    pub revealed: bool,
}

impl CardViewModel {
    /// Builds the view-model for `day` from an optional source row.
    ///
    /// # Contract
    /// - Missing rows project to defaulted fields with the fallback title.
    /// - `revealed` is forced to `false` when the door is locked.
    pub fn project(day: u8, row: Option<&ContentRow>, locked: bool, revealed: bool) -> Self {
        let (title, text, person, image_url) = match row {
            Some(row) => (
                row.title.clone().unwrap_or_else(|| fallback_title(day)),
                row.text.clone(),
                row.person.clone(),
                row.image_url.clone(),
            ),
            None => (
                fallback_title(day),
                String::new(),
                String::new(),
                String::new(),
            ),
        };

        Self {
            day,
            title,
            text,
            person,
            image_url,
            locked,
            revealed: !locked && revealed,
        }
    }

    /// Collapses the lock/reveal flags into the visual state.
    pub fn state(&self) -> CardState {
        if self.locked {
            CardState::Locked
        } else if self.revealed {
            CardState::Revealed
        } else {
            CardState::Collapsed
        }
    }
}
