use crate::entities::{draw_entity as draws, participant_entity as participants};
use crate::error::{AppError, AppResult};
use crate::models::{DrawStatus, WinnerResponse};
use crate::services::find_draw;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter};

#[derive(Clone)]
pub struct WinnerService {
    pool: DatabaseConnection,
}

impl WinnerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 开奖 (幂等)
    ///
    /// 逻辑:
    /// 1. 已有中奖者直接返回, 不再随机
    /// 2. 未到开奖时间拒绝
    /// 3. 从全部参与者中等概率抽取一人
    /// 4. 条件更新 (where winner_id is null) 写入中奖者, 只有一次写入能成功
    /// 5. 条件更新失败说明已被并发请求开奖, 返回已落库的中奖者
    pub async fn resolve_winner(
        &self,
        draw_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<WinnerResponse> {
        let draw = find_draw(&self.pool, draw_id).await?;

        if let Some(winner) = self.recorded_winner(&draw).await? {
            return Ok(winner);
        }

        if draw.status_at(now) == DrawStatus::Upcoming {
            return Err(AppError::DrawNotStarted);
        }

        let candidates = draw
            .find_related(participants::Entity)
            .all(&self.pool)
            .await?;

        let chosen = {
            let mut rng = rand::thread_rng();
            candidates.choose(&mut rng).cloned()
        }
        .ok_or(AppError::NoParticipants)?;

        if self.record_winner(draw.id, &chosen).await? {
            log::info!(
                "Draw '{}' (ID: {}) has a winner: {} (ID: {}) with number {}",
                draw.prize_name,
                draw.id,
                chosen.full_name,
                chosen.id,
                chosen.lucky_number
            );
            return Ok(WinnerResponse {
                winner_name: chosen.full_name,
                winner_phone: chosen.phone,
                winning_number: chosen.lucky_number,
            });
        }

        // 并发请求已写入中奖者
        log::warn!(
            "Draw {} was resolved concurrently, returning the recorded winner",
            draw.id
        );
        let draw = find_draw(&self.pool, draw_id).await?;
        self.recorded_winner(&draw).await?.ok_or_else(|| {
            AppError::InternalError(format!("Draw {draw_id} lost its winner after resolution"))
        })
    }

    /// Compare-and-set on `winner_id IS NULL`; true when this call recorded the winner.
    pub async fn record_winner(
        &self,
        draw_id: i64,
        winner: &participants::Model,
    ) -> AppResult<bool> {
        let result = draws::Entity::update_many()
            .col_expr(draws::Column::WinnerId, Expr::value(winner.id))
            .col_expr(
                draws::Column::WinningNumber,
                Expr::value(winner.lucky_number.clone()),
            )
            .filter(draws::Column::Id.eq(draw_id))
            .filter(draws::Column::WinnerId.is_null())
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn recorded_winner(&self, draw: &draws::Model) -> AppResult<Option<WinnerResponse>> {
        let Some(winner_id) = draw.winner_id else {
            return Ok(None);
        };

        let winner = participants::Entity::find_by_id(winner_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Winner {winner_id} of draw {} does not exist",
                    draw.id
                ))
            })?;

        Ok(Some(WinnerResponse {
            winner_name: winner.full_name,
            winner_phone: winner.phone,
            winning_number: draw
                .winning_number
                .clone()
                .unwrap_or(winner.lucky_number),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixed_now, seed_draw, seed_participant, setup_db};
    use chrono::Duration;
    use std::collections::HashSet;

    async fn started_draw_with(
        db: &DatabaseConnection,
        count: usize,
    ) -> (draws::Model, Vec<participants::Model>) {
        let draw = seed_draw(db, "VPS Pro", fixed_now() - Duration::minutes(5), None).await;
        let mut list = Vec::new();
        for i in 0..count {
            list.push(
                seed_participant(
                    db,
                    draw.id,
                    &format!("User {i}"),
                    &format!("09{i:08}"),
                    &format!("user{i}@example.com"),
                    &format!("{}", 10_000 + i),
                )
                .await,
            );
        }
        (draw, list)
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let (draw, _) = started_draw_with(&db, 10).await;

        let first = service.resolve_winner(draw.id, fixed_now()).await.unwrap();
        let stored_after_first = draws::Entity::find_by_id(draw.id).one(&db).await.unwrap();

        let second = service
            .resolve_winner(draw.id, fixed_now() + Duration::hours(1))
            .await
            .unwrap();
        let stored_after_second = draws::Entity::find_by_id(draw.id).one(&db).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_after_first, stored_after_second);
    }

    #[tokio::test]
    async fn test_resolve_records_exactly_one_matching_winner() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let (draw, list) = started_draw_with(&db, 25).await;

        let result = service.resolve_winner(draw.id, fixed_now()).await.unwrap();
        let stored = draws::Entity::find_by_id(draw.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        let winners: Vec<&participants::Model> = list
            .iter()
            .filter(|p| Some(p.id) == stored.winner_id)
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(stored.winning_number.as_deref(), Some(winners[0].lucky_number.as_str()));
        assert_eq!(result.winning_number, winners[0].lucky_number);
        assert_eq!(result.winner_name, winners[0].full_name);
        assert_eq!(result.winner_phone, winners[0].phone);
        assert_eq!(stored.status_at(fixed_now()), DrawStatus::Completed);
    }

    #[tokio::test]
    async fn test_resolve_without_participants_leaves_draw_untouched() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let (draw, _) = started_draw_with(&db, 0).await;

        let err = service.resolve_winner(draw.id, fixed_now()).await.unwrap_err();
        assert!(matches!(err, AppError::NoParticipants));

        let stored = draws::Entity::find_by_id(draw.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.winner_id.is_none());
        assert!(stored.winning_number.is_none());
    }

    #[tokio::test]
    async fn test_resolve_unknown_draw() {
        let db = setup_db().await;
        let service = WinnerService::new(db);
        let err = service.resolve_winner(1, fixed_now()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_before_draw_time_is_rejected() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let draw = seed_draw(&db, "VPS", fixed_now() + Duration::hours(1), None).await;
        seed_participant(&db, draw.id, "Lan", "0901234567", "lan@example.com", "12345").await;

        let err = service.resolve_winner(draw.id, fixed_now()).await.unwrap_err();
        assert!(matches!(err, AppError::DrawNotStarted));
    }

    #[tokio::test]
    async fn test_record_winner_only_once() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let (draw, list) = started_draw_with(&db, 2).await;

        assert!(service.record_winner(draw.id, &list[0]).await.unwrap());
        assert!(!service.record_winner(draw.id, &list[1]).await.unwrap());

        // 后续开奖返回第一次写入的中奖者
        let result = service.resolve_winner(draw.id, fixed_now()).await.unwrap();
        assert_eq!(result.winner_name, list[0].full_name);
        assert_eq!(result.winning_number, list[0].lucky_number);
    }

    #[tokio::test]
    async fn test_every_participant_can_win() {
        let db = setup_db().await;
        let service = WinnerService::new(db.clone());
        let mut winners = HashSet::new();

        // 3 名参与者, 60 次独立开奖, 每人都未被选中的概率约为 3 * (2/3)^60
        for _ in 0..60 {
            let (draw, _) = started_draw_with(&db, 3).await;
            let result = service.resolve_winner(draw.id, fixed_now()).await.unwrap();
            winners.insert(result.winning_number);
        }
        assert_eq!(winners.len(), 3);
    }
}
