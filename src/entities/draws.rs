use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::DrawStatus;

/// 抽奖实体
/// 说明:
/// - status 不落库, 每次读取时由 (now, draw_at, winner_id) 推导
/// - winner_id / winning_number 只会被开奖写入一次
/// - winner_email_content 为中奖邮件模板, 支持 {{full_name}} 等占位符
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "draws")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub prize_name: String,
    /// 计划开奖时间 (UTC)
    pub draw_at: DateTime<Utc>,
    /// 中奖参与者 (participants.id)
    pub winner_id: Option<i64>,
    /// 中奖号码 (中奖者 lucky_number 的快照)
    pub winning_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub winner_email_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn has_winner(&self) -> bool {
        self.winner_id.is_some()
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> DrawStatus {
        DrawStatus::derive(now, self.draw_at, self.has_winner())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
