use crate::entities::{draw_entity as draws, participant_entity as participants};
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminDrawResponse, CreateDrawRequest, DrawResponse, ParticipantListResponse,
    ParticipantResponse,
};
use crate::utils::validate_prize_name;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

/// 按 id 查找抽奖, 不存在返回 NotFound
pub async fn find_draw<C: ConnectionTrait>(conn: &C, draw_id: i64) -> AppResult<draws::Model> {
    draws::Entity::find_by_id(draw_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))
}

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建抽奖 (管理员)
    pub async fn create_draw(
        &self,
        req: CreateDrawRequest,
        now: DateTime<Utc>,
    ) -> AppResult<AdminDrawResponse> {
        validate_prize_name(&req.prize_name)?;
        let template = req
            .winner_email_content
            .filter(|content| !content.trim().is_empty());

        let model = draws::ActiveModel {
            prize_name: Set(req.prize_name.trim().to_string()),
            draw_at: Set(req.draw_at),
            winner_email_content: Set(template),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Admin created a new draw: '{}' (ID: {}) scheduled at {}, status {}",
            model.prize_name,
            model.id,
            model.draw_at,
            model.status_at(now)
        );

        Ok(Self::admin_view(model, now, 0, None))
    }

    /// 抽奖列表 (按开奖时间倒序)
    pub async fn list_draws(&self, now: DateTime<Utc>) -> AppResult<Vec<DrawResponse>> {
        let list = draws::Entity::find()
            .order_by_desc(draws::Column::DrawAt)
            .order_by_desc(draws::Column::Id)
            .all(&self.pool)
            .await?;

        let counts: HashMap<i64, i64> = participants::Entity::find()
            .select_only()
            .column(participants::Column::DrawId)
            .column_as(Expr::col(participants::Column::Id).count(), "participant_count")
            .group_by(participants::Column::DrawId)
            .into_tuple::<(i64, i64)>()
            .all(&self.pool)
            .await?
            .into_iter()
            .collect();

        let winner_ids: Vec<i64> = list.iter().filter_map(|d| d.winner_id).collect();
        let winner_names: HashMap<i64, String> = if winner_ids.is_empty() {
            HashMap::new()
        } else {
            participants::Entity::find()
                .filter(participants::Column::Id.is_in(winner_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|p| (p.id, p.full_name))
                .collect()
        };

        Ok(list
            .into_iter()
            .map(|draw| {
                let count = counts.get(&draw.id).copied().unwrap_or(0) as u64;
                let winner_name = draw.winner_id.and_then(|id| winner_names.get(&id).cloned());
                DrawResponse::from_model(draw, now, count, winner_name)
            })
            .collect())
    }

    pub async fn get_draw(&self, draw_id: i64, now: DateTime<Utc>) -> AppResult<DrawResponse> {
        let draw = find_draw(&self.pool, draw_id).await?;
        let (count, winner_name) = self.summary(&draw).await?;
        Ok(DrawResponse::from_model(draw, now, count, winner_name))
    }

    /// 参与者列表 (管理员), 按 id 升序, 标记中奖者
    pub async fn list_participants(
        &self,
        draw_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<ParticipantListResponse> {
        let draw = find_draw(&self.pool, draw_id).await?;
        let list = draw
            .find_related(participants::Entity)
            .order_by_asc(participants::Column::Id)
            .all(&self.pool)
            .await?;

        let winner_name = draw
            .winner_id
            .and_then(|id| list.iter().find(|p| p.id == id))
            .map(|p| p.full_name.clone());
        let winner_id = draw.winner_id;
        let count = list.len() as u64;

        Ok(ParticipantListResponse {
            draw: Self::admin_view(draw, now, count, winner_name),
            participants: list
                .into_iter()
                .map(|p| ParticipantResponse::from_model(p, winner_id))
                .collect(),
        })
    }

    /// 删除抽奖及其全部参与者
    pub async fn delete_draw(&self, draw_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let draw = find_draw(&txn, draw_id).await?;

        let removed = participants::Entity::delete_many()
            .filter(participants::Column::DrawId.eq(draw.id))
            .exec(&txn)
            .await?;
        draws::Entity::delete_by_id(draw.id).exec(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Admin deleted draw '{}' (ID: {}) with {} participants",
            draw.prize_name,
            draw.id,
            removed.rows_affected
        );
        Ok(())
    }

    async fn summary(&self, draw: &draws::Model) -> AppResult<(u64, Option<String>)> {
        let count = participants::Entity::find()
            .filter(participants::Column::DrawId.eq(draw.id))
            .count(&self.pool)
            .await?;

        let winner_name = match draw.winner_id {
            Some(id) => participants::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .map(|p| p.full_name),
            None => None,
        };

        Ok((count, winner_name))
    }

    fn admin_view(
        draw: draws::Model,
        now: DateTime<Utc>,
        participant_count: u64,
        winner_name: Option<String>,
    ) -> AdminDrawResponse {
        let winner_email_content = draw.winner_email_content.clone();
        AdminDrawResponse {
            draw: DrawResponse::from_model(draw, now, participant_count, winner_name),
            winner_email_content,
        }
    }
}
