use crate::entities::participant_entity as participants;
use crate::error::{AppError, AppResult};
use crate::models::{RegisterRequest, RegistrationResponse};
use crate::services::find_draw;
use crate::utils::{
    MAX_LUCKY_NUMBER_ATTEMPTS, generate_unique_lucky_number, validate_email, validate_full_name,
    validate_phone,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr,
};
use std::collections::HashSet;

/// 插入因幸运号码唯一索引冲突 (并发注册) 失败时的重试次数
const MAX_INSERT_ATTEMPTS: usize = 3;

/// SQLite 报告冲突列 (participants.lucky_number), Postgres 报告索引名
/// (idx_participants_draw_lucky_number); 两者都包含该片段
const LUCKY_NUMBER_CONSTRAINT: &str = "lucky_number";

/// 参与者写入失败的分类
#[derive(Debug)]
enum InsertError {
    /// (draw_id, lucky_number) 唯一索引冲突
    LuckyNumberTaken,
    /// email / phone 唯一索引冲突
    Duplicate,
    Database(DbErr),
}

impl InsertError {
    fn classify(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
                if detail.contains(LUCKY_NUMBER_CONSTRAINT) =>
            {
                InsertError::LuckyNumberTaken
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => InsertError::Duplicate,
            _ => InsertError::Database(err),
        }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    pool: DatabaseConnection,
}

impl RegistrationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 报名
    ///
    /// 逻辑:
    /// 1. 校验输入
    /// 2. 抽奖必须处于 Upcoming 状态
    /// 3. 同一抽奖内 email / phone 不可重复
    /// 4. 拒绝采样生成本抽奖内唯一的5位幸运号码 (有上限)
    /// 5. 写入参与者, 唯一索引冲突时按类型映射或重试
    pub async fn register(
        &self,
        draw_id: i64,
        req: RegisterRequest,
        source_ip: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<RegistrationResponse> {
        let full_name = req.full_name.trim().to_string();
        let phone = req.phone.trim().to_string();
        let email = req.email.trim().to_lowercase();
        validate_full_name(&full_name)?;
        validate_phone(&phone)?;
        validate_email(&email)?;

        let draw = find_draw(&self.pool, draw_id).await?;
        if !draw.status_at(now).accepts_registration() {
            return Err(AppError::DrawNotOpen);
        }

        let existing = participants::Entity::find()
            .filter(participants::Column::DrawId.eq(draw.id))
            .filter(
                Condition::any()
                    .add(participants::Column::Email.eq(email.as_str()))
                    .add(participants::Column::Phone.eq(phone.as_str())),
            )
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::DuplicateRegistrant);
        }

        let taken = self.taken_lucky_numbers(draw.id).await?;
        let mut rng = StdRng::from_entropy();
        let participant = self
            .insert_with_fresh_number(
                &mut rng,
                taken,
                participants::ActiveModel {
                    draw_id: Set(draw.id),
                    full_name: Set(full_name),
                    phone: Set(phone),
                    email: Set(email),
                    ip_address: Set(source_ip),
                    created_at: Set(now),
                    ..Default::default()
                },
            )
            .await?;

        log::info!(
            "New participant {} (ID: {}) registered for draw {} with lucky number {}",
            participant.full_name,
            participant.id,
            draw.id,
            participant.lucky_number
        );
        Ok(participant.into())
    }

    /// 分配幸运号码并写入; 号码被并发报名抢占时换号重试
    async fn insert_with_fresh_number<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mut taken: HashSet<String>,
        participant: participants::ActiveModel,
    ) -> AppResult<participants::Model> {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let lucky_number =
                generate_unique_lucky_number(rng, &taken, MAX_LUCKY_NUMBER_ATTEMPTS)
                    .ok_or(AppError::LuckyNumberExhausted)?;

            let mut candidate = participant.clone();
            candidate.lucky_number = Set(lucky_number.clone());

            match self.insert_participant(candidate).await {
                Ok(model) => return Ok(model),
                Err(InsertError::LuckyNumberTaken) => {
                    log::warn!("Lucky number {lucky_number} taken concurrently, retrying");
                    taken.insert(lucky_number);
                }
                Err(InsertError::Duplicate) => return Err(AppError::DuplicateRegistrant),
                Err(InsertError::Database(err)) => return Err(err.into()),
            }
        }

        Err(AppError::LuckyNumberExhausted)
    }

    async fn insert_participant(
        &self,
        participant: participants::ActiveModel,
    ) -> Result<participants::Model, InsertError> {
        participant
            .insert(&self.pool)
            .await
            .map_err(InsertError::classify)
    }

    async fn taken_lucky_numbers(&self, draw_id: i64) -> AppResult<HashSet<String>> {
        let numbers = participants::Entity::find()
            .select_only()
            .column(participants::Column::LuckyNumber)
            .filter(participants::Column::DrawId.eq(draw_id))
            .into_tuple::<String>()
            .all(&self.pool)
            .await?;
        Ok(numbers.into_iter().collect())
    }
}
