use adventcal_core::db::open_db_in_memory;
use adventcal_core::{
    max_open_day, Activation, CardService, CardState, ContentMap, ContentRow, RepoError,
    RepoResult, RevealRepository, SqliteRevealRepository,
};
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn content_with(rows: &[ContentRow]) -> ContentMap {
    rows.iter().map(|row| (row.day, row.clone())).collect()
}

fn row(day: u8, text: &str) -> ContentRow {
    ContentRow {
        text: text.to_string(),
        ..ContentRow::empty(day)
    }
}

/// In-memory reveal store that counts toggle calls.
///
/// Implemented on the reference so tests keep hold of the counters while
/// the service owns its repository.
#[derive(Default)]
struct TrackingRepo {
    revealed: RefCell<HashSet<u8>>,
    toggle_calls: Cell<u32>,
}

impl RevealRepository for &TrackingRepo {
    fn is_revealed(&self, day: u8) -> RepoResult<bool> {
        Ok(self.revealed.borrow().contains(&day))
    }

    fn toggle(&self, day: u8) -> RepoResult<bool> {
        self.toggle_calls.set(self.toggle_calls.get() + 1);
        let mut revealed = self.revealed.borrow_mut();
        if revealed.remove(&day) {
            Ok(false)
        } else {
            revealed.insert(day);
            Ok(true)
        }
    }

    fn revealed_days(&self) -> RepoResult<Vec<u8>> {
        let mut days: Vec<u8> = self.revealed.borrow().iter().copied().collect();
        days.sort_unstable();
        Ok(days)
    }

    fn clear_all(&self) -> RepoResult<()> {
        self.revealed.borrow_mut().clear();
        Ok(())
    }
}

/// Reveal store whose every operation fails, simulating unavailable storage.
struct BrokenRepo;

impl BrokenRepo {
    fn unavailable() -> RepoError {
        RepoError::UninitializedConnection {
            expected_version: 1,
            actual_version: 0,
        }
    }
}

impl RevealRepository for BrokenRepo {
    fn is_revealed(&self, _day: u8) -> RepoResult<bool> {
        Err(Self::unavailable())
    }

    fn toggle(&self, _day: u8) -> RepoResult<bool> {
        Err(Self::unavailable())
    }

    fn revealed_days(&self) -> RepoResult<Vec<u8>> {
        Err(Self::unavailable())
    }

    fn clear_all(&self) -> RepoResult<()> {
        Err(Self::unavailable())
    }
}

#[test]
fn build_cards_yields_all_doors_in_order() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);
    let cards = service.build_cards(&ContentMap::new(), 24);

    assert_eq!(cards.len(), 24);
    let days: Vec<u8> = cards.iter().map(|card| card.day).collect();
    assert_eq!(days, (1..=24).collect::<Vec<u8>>());
}

#[test]
fn build_cards_is_idempotent_for_identical_inputs() {
    let content = content_with(&[row(3, "Be bold")]);
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    let first = service.build_cards(&content, 10);
    let second = service.build_cards(&content, 10);
    assert_eq!(first, second);
}

#[test]
fn missing_day_projects_defaults_with_correct_lock_flag() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);
    let cards = service.build_cards(&ContentMap::new(), 10);

    for card in &cards {
        assert_eq!(card.title, format!("Impulse for day {}", card.day));
        assert!(card.text.is_empty());
        assert!(card.person.is_empty());
        assert!(card.image_url.is_empty());
        assert_eq!(card.locked, card.day > 10);
    }
}

// Source has no row for day 5; on 2025-12-10 the door is unlocked and
// renders the default title with empty text.
#[test]
fn scenario_missing_day_on_an_unlocked_date() {
    let content = content_with(&[row(3, "Be bold")]);
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    let open = max_open_day(date(2025, 12, 10));
    let cards = service.build_cards(&content, open);

    let day5 = &cards[4];
    assert!(!day5.locked);
    assert_eq!(day5.title, "Impulse for day 5");
    assert!(day5.text.is_empty());
}

// On 2025-12-01 day 3 is still locked; activation has no effect.
#[test]
fn scenario_locked_day_rejects_activation() {
    let content = content_with(&[row(3, "Be bold")]);
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    let open = max_open_day(date(2025, 12, 1));
    assert_eq!(open, 1);

    let cards = service.build_cards(&content, open);
    assert!(cards[2].locked);

    let outcome = service.activate_card(3, open);
    assert_eq!(outcome, Activation::Rejected { day: 3 });
    assert_eq!(repo.toggle_calls.get(), 0);
    assert!(repo.revealed.borrow().is_empty());
}

// Outside December every door is unlocked regardless of content.
#[test]
fn scenario_non_december_unlocks_everything() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);
    let open = max_open_day(date(2025, 7, 15));
    let cards = service.build_cards(&ContentMap::new(), open);

    assert!(cards.iter().all(|card| !card.locked));
}

// A revealed door stays revealed after the store is rehydrated from disk.
#[test]
fn scenario_reveal_survives_rehydration() {
    let conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteRevealRepository::try_new(&conn).unwrap();
        let service = CardService::new(repo);
        let outcome = service.activate_card(7, 24);
        assert_eq!(
            outcome,
            Activation::Toggled {
                day: 7,
                revealed: true,
                persisted: true
            }
        );
    }

    let repo = SqliteRevealRepository::try_new(&conn).unwrap();
    let service = CardService::new(repo);
    let cards = service.build_cards(&ContentMap::new(), 24);
    assert!(cards[6].revealed);
    assert_eq!(cards[6].state(), CardState::Revealed);
}

#[test]
fn locked_activation_never_reaches_the_store() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    let outcome = service.activate_card(20, 5);
    assert_eq!(outcome, Activation::Rejected { day: 20 });
    assert_eq!(repo.toggle_calls.get(), 0);

    let cards = service.build_cards(&ContentMap::new(), 24);
    assert!(!cards[19].revealed);
}

#[test]
fn out_of_range_activation_does_not_invoke_toggle() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    assert_eq!(service.activate_card(0, 24), Activation::Rejected { day: 0 });
    assert_eq!(
        service.activate_card(25, 24),
        Activation::Rejected { day: 25 }
    );
    assert_eq!(repo.toggle_calls.get(), 0);
}

#[test]
fn unlocked_activation_toggles_back_and_forth() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    assert_eq!(
        service.activate_card(4, 24),
        Activation::Toggled {
            day: 4,
            revealed: true,
            persisted: true
        }
    );
    assert_eq!(
        service.activate_card(4, 24),
        Activation::Toggled {
            day: 4,
            revealed: false,
            persisted: true
        }
    );
}

#[test]
fn locked_doors_ignore_stale_reveal_records() {
    let repo = TrackingRepo::default();
    repo.revealed.borrow_mut().insert(15);
    let service = CardService::new(&repo);

    // Door 15 has a persisted record but is locked on this render.
    let cards = service.build_cards(&ContentMap::new(), 10);
    assert!(cards[14].locked);
    assert!(!cards[14].revealed);
}

#[test]
fn reset_closes_every_door() {
    let repo = TrackingRepo::default();
    let service = CardService::new(&repo);

    service.activate_card(2, 24);
    service.activate_card(9, 24);
    service.reset().unwrap();

    let cards = service.build_cards(&ContentMap::new(), 24);
    assert!(cards.iter().all(|card| !card.revealed));
}

#[test]
fn broken_store_degrades_render_instead_of_failing() {
    let service = CardService::new(BrokenRepo);
    let cards = service.build_cards(&ContentMap::new(), 24);

    assert_eq!(cards.len(), 24);
    assert!(cards.iter().all(|card| !card.revealed));
}

#[test]
fn broken_store_still_flips_for_the_current_render() {
    let service = CardService::new(BrokenRepo);

    let outcome = service.activate_card(4, 24);
    assert_eq!(
        outcome,
        Activation::Toggled {
            day: 4,
            revealed: true,
            persisted: false
        }
    );
}
