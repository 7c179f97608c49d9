//! Domain logic for the bizdesk backend.
//!
//! Everything in this crate is free of I/O: identifiers, the error taxonomy,
//! status enums, section structs with their merge rules, the onboarding step
//! engine, pricing, pagination math and field validation rules.

pub mod client;
pub mod districts;
pub mod error;
pub mod lead;
pub mod listing;
pub mod notes;
pub mod onboarding;
pub mod roles;
pub mod types;
pub mod validation;
