//! Domain model for calendar doors.
//!
//! # Responsibility
//! - Define the canonical per-day content record and the derived card
//!   view-model consumed by rendering hosts.
//!
//! # Invariants
//! - Door days are integers in `FIRST_DAY..=DOOR_COUNT`.
//! - View-models are ephemeral projections, rebuilt on every render pass.

pub mod card;
