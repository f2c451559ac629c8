//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate content, policy and reveal state into render-ready cards.
//! - Keep rendering hosts decoupled from storage details.

pub mod card_service;
