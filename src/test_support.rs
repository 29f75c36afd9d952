//! Shared fixtures for database-backed tests.

use crate::entities::{draw_entity as draws, participant_entity as participants};
use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

/// 内存 SQLite; 单连接, 否则每个连接各自拥有一个空库
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
}

pub async fn seed_draw(
    db: &DatabaseConnection,
    prize_name: &str,
    draw_at: DateTime<Utc>,
    template: Option<&str>,
) -> draws::Model {
    draws::ActiveModel {
        prize_name: Set(prize_name.to_string()),
        draw_at: Set(draw_at),
        winner_email_content: Set(template.map(str::to_string)),
        created_at: Set(fixed_now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_participant(
    db: &DatabaseConnection,
    draw_id: i64,
    full_name: &str,
    phone: &str,
    email: &str,
    lucky_number: &str,
) -> participants::Model {
    participants::ActiveModel {
        draw_id: Set(draw_id),
        full_name: Set(full_name.to_string()),
        phone: Set(phone.to_string()),
        email: Set(email.to_string()),
        lucky_number: Set(lucky_number.to_string()),
        ip_address: Set(Some("127.0.0.1".to_string())),
        created_at: Set(fixed_now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
