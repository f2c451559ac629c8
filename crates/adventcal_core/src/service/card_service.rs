//! Card presenter use-case service.
//!
//! # Responsibility
//! - Build the ordered 24-card view-model sequence for one render pass.
//! - Enforce the lock policy on door activation.
//!
//! # Invariants
//! - `build_cards` is idempotent for identical inputs and mutates nothing.
//! - Locked doors never reach the reveal store, on read or write.
//! - Store failures degrade the affected card only; a render pass or an
//!   activation never errors out because persistence is unavailable.

use crate::content::ContentMap;
use crate::model::card::{CardViewModel, DOOR_COUNT, FIRST_DAY};
use crate::policy::is_locked;
use crate::repo::reveal_repo::{RepoResult, RevealRepository};
use log::{debug, warn};

/// Outcome of one door activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The door is locked or out of range; nothing changed.
    Rejected { day: u8 },
    /// The reveal flag flipped.
    Toggled {
        day: u8,
        /// New revealed value after the flip.
        revealed: bool,
        /// Whether the new value reached persistent storage. When `false`
        /// the flip is valid for the current render but will not survive a
        /// restart.
        persisted: bool,
    },
}

/// Presenter facade over a reveal-state repository.
pub struct CardService<R: RevealRepository> {
    repo: R,
}

impl<R: RevealRepository> CardService<R> {
    /// Creates a presenter using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds the full card sequence for one render pass, day ascending.
    ///
    /// # Contract
    /// - Always yields exactly 24 cards, days `1..=24` in order.
    /// - Days absent from `content` project to defaulted fields with the
    ///   fallback title applied.
    /// - `revealed` is read from the store for unlocked doors only; a read
    ///   failure downgrades that single card to not-revealed.
    pub fn build_cards(&self, content: &ContentMap, max_open_day: u8) -> Vec<CardViewModel> {
        (FIRST_DAY..=DOOR_COUNT)
            .map(|day| {
                let locked = is_locked(day, max_open_day);
                let revealed = !locked && self.stored_reveal(day);
                CardViewModel::project(day, content.get(&day), locked, revealed)
            })
            .collect()
    }

    /// Handles a user activation of `day`.
    ///
    /// # Contract
    /// - Locked or out-of-range doors are rejected without touching the
    ///   store; no state changes anywhere.
    /// - Otherwise the reveal flag flips. When the store write fails, the
    ///   flip is still reported for the current render with
    ///   `persisted: false`.
    pub fn activate_card(&self, day: u8, max_open_day: u8) -> Activation {
        if day < FIRST_DAY || day > DOOR_COUNT || is_locked(day, max_open_day) {
            debug!("event=card_activate module=service status=rejected day={day} max_open_day={max_open_day}");
            return Activation::Rejected { day };
        }

        let previous = self.stored_reveal(day);
        match self.repo.toggle(day) {
            Ok(revealed) => Activation::Toggled {
                day,
                revealed,
                persisted: true,
            },
            Err(err) => {
                warn!(
                    "event=card_activate module=service status=degraded day={day} error_code=persistence_unavailable error={err}"
                );
                Activation::Toggled {
                    day,
                    revealed: !previous,
                    persisted: false,
                }
            }
        }
    }

    /// Closes every door again by clearing all reveal records.
    pub fn reset(&self) -> RepoResult<()> {
        self.repo.clear_all()
    }

    fn stored_reveal(&self, day: u8) -> bool {
        match self.repo.is_revealed(day) {
            Ok(revealed) => revealed,
            Err(err) => {
                warn!(
                    "event=reveal_read module=service status=degraded day={day} error_code=persistence_unavailable error={err}"
                );
                false
            }
        }
    }
}
