//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the table row
//! - Create / update DTOs consumed by the matching repository
//! - A filter struct for list queries where the entity is listable

pub mod admin;
pub mod client;
pub mod contact;
pub mod dashboard;
pub mod demo;
pub mod onboarding;
