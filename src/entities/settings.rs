use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

pub const MAIL_USERNAME_KEY: &str = "MAIL_USERNAME";
pub const MAIL_PASSWORD_KEY: &str = "MAIL_PASSWORD";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
