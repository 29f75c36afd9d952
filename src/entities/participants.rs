use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽奖参与者实体
/// 约束 (见迁移):
/// - (draw_id, email) 唯一
/// - (draw_id, phone) 唯一
/// - (draw_id, lucky_number) 唯一
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub draw_id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// 5 位幸运号码
    pub lucky_number: String,
    /// 注册来源 IP
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::draws::Entity",
        from = "Column::DrawId",
        to = "super::draws::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Draw,
}

impl Related<super::draws::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Draw.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
