//! Dashboard aggregates, with and without a date window.

use bizdesk_core::lead::{CurrentSoftware, DemoBusinessType, DemoStatus};
use bizdesk_db::models::contact::CreateContactMessage;
use bizdesk_db::models::dashboard::DateRange;
use bizdesk_db::models::demo::{CreateDemoRequest, DemoRequest, UpdateDemoRequest};
use bizdesk_db::repositories::{ContactRepo, DashboardRepo, DemoRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn seed_demo(pool: &PgPool, name: &str, business_type: DemoBusinessType) -> DemoRequest {
    DemoRepo::create(
        pool,
        &CreateDemoRequest {
            name: name.to_string(),
            business: format!("{name} Stores"),
            phone: "9876543210".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            business_type,
            current_software: CurrentSoftware::Excel,
            preferred_time: "Evening".to_string(),
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_database_yields_zeros(pool: PgPool) {
    let contacts = DashboardRepo::contact_counts(&pool, DateRange::default())
        .await
        .unwrap();
    assert_eq!(contacts.total_contacts, 0);

    let analytics = DashboardRepo::demo_analytics(&pool, DateRange::default())
        .await
        .unwrap();
    assert_eq!(analytics.total_requests, 0);
    assert_eq!(analytics.total_conversion_value, 0.0);
    assert_eq!(analytics.avg_conversion_value, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_counts_and_conversion_totals(pool: PgPool) {
    ContactRepo::create(
        &pool,
        &CreateContactMessage {
            name: "Bharathi".to_string(),
            email: "bharathi@example.com".to_string(),
            phone: "9876543210".to_string(),
            subject: "Pricing".to_string(),
            message: "What does the yearly plan cost?".to_string(),
        },
    )
    .await
    .unwrap();

    let won = seed_demo(&pool, "Chandra", DemoBusinessType::RetailStore).await;
    let also_won = seed_demo(&pool, "Durga", DemoBusinessType::RetailStore).await;
    seed_demo(&pool, "Elango", DemoBusinessType::Education).await;

    for (demo, value) in [(&won, 10000.0), (&also_won, 20000.0)] {
        DemoRepo::update(
            &pool,
            &demo.id,
            &UpdateDemoRequest {
                status: Some(DemoStatus::Converted),
                conversion_value: Some(value),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let demos = DashboardRepo::demo_counts(&pool, DateRange::default())
        .await
        .unwrap();
    assert_eq!(demos.total_demos, 3);
    assert_eq!(demos.converted_demos, 2);
    assert_eq!(demos.pending_demos, 1);
    assert_eq!(demos.total_conversion_value, 30000.0);

    let analytics = DashboardRepo::demo_analytics(&pool, DateRange::default())
        .await
        .unwrap();
    assert_eq!(analytics.converted_leads, 2);
    assert_eq!(analytics.avg_conversion_value, 15000.0);

    let top = DashboardRepo::top_business_types(&pool, DateRange::default(), 10)
        .await
        .unwrap();
    assert_eq!(top[0].business_type, DemoBusinessType::RetailStore);
    assert_eq!(top[0].count, 2);

    let recent = DashboardRepo::recent_contacts(&pool, DateRange::default(), 5)
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);

    let stats = DashboardRepo::system_stats(&pool).await.unwrap();
    assert_eq!(stats.total_demos, 3);
    assert_eq!(stats.recent_contacts, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_window_requires_both_bounds(pool: PgPool) {
    seed_demo(&pool, "Gowri", DemoBusinessType::Consulting).await;

    let past = Utc::now() - Duration::days(30);
    let also_past = Utc::now() - Duration::days(20);

    let half_open = DateRange::new(Some(past), None);
    let counts = DashboardRepo::demo_counts(&pool, half_open).await.unwrap();
    assert_eq!(counts.total_demos, 1);

    let closed = DateRange::new(Some(past), Some(also_past));
    let counts = DashboardRepo::demo_counts(&pool, closed).await.unwrap();
    assert_eq!(counts.total_demos, 0);
    let recent = DashboardRepo::recent_demos(&pool, closed, 5).await.unwrap();
    assert!(recent.is_empty());
}
