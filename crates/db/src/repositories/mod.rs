//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. List queries take a filter struct
//! from [`crate::models`] carrying pagination and a whitelisted sort.

pub mod admin_repo;
pub mod client_repo;
pub mod contact_repo;
pub mod dashboard_repo;
pub mod demo_repo;
pub mod onboarding_repo;

pub use admin_repo::AdminRepo;
pub use client_repo::ClientRepo;
pub use contact_repo::ContactRepo;
pub use dashboard_repo::DashboardRepo;
pub use demo_repo::DemoRepo;
pub use onboarding_repo::OnboardingRepo;
