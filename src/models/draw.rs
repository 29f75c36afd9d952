use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{draw_entity as draws, participant_entity as participants};

/// 抽奖状态 (不落库, 由时间与是否已开奖推导)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    /// 未到开奖时间, 可报名
    Upcoming,
    /// 已到开奖时间, 等待开奖
    Drawing,
    /// 已产生中奖者
    Completed,
}

impl DrawStatus {
    /// Pure status derivation; a recorded winner always wins over the clock.
    pub fn derive(now: DateTime<Utc>, draw_at: DateTime<Utc>, has_winner: bool) -> Self {
        if has_winner {
            DrawStatus::Completed
        } else if now < draw_at {
            DrawStatus::Upcoming
        } else {
            DrawStatus::Drawing
        }
    }

    pub fn accepts_registration(self) -> bool {
        self == DrawStatus::Upcoming
    }
}

impl std::fmt::Display for DrawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawStatus::Upcoming => write!(f, "upcoming"),
            DrawStatus::Drawing => write!(f, "drawing"),
            DrawStatus::Completed => write!(f, "completed"),
        }
    }
}

/// 创建抽奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateDrawRequest {
    /// 奖品名称
    pub prize_name: String,
    /// 开奖时间 (RFC 3339)
    pub draw_at: DateTime<Utc>,
    /// 中奖邮件模板, 支持 {{full_name}} {{phone}} {{email}} {{prize_name}} {{lucky_number}}
    pub winner_email_content: Option<String>,
}

/// 中奖者摘要 (用于列表展示)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnerSummary {
    pub full_name: String,
    pub winning_number: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub id: i64,
    pub prize_name: String,
    pub draw_at: DateTime<Utc>,
    pub status: DrawStatus,
    pub participant_count: u64,
    pub winner: Option<WinnerSummary>,
    pub created_at: DateTime<Utc>,
}

impl DrawResponse {
    pub fn from_model(
        model: draws::Model,
        now: DateTime<Utc>,
        participant_count: u64,
        winner_name: Option<String>,
    ) -> Self {
        let status = model.status_at(now);
        let winner = match (winner_name, model.winning_number) {
            (Some(full_name), Some(winning_number)) => Some(WinnerSummary {
                full_name,
                winning_number,
            }),
            _ => None,
        };
        DrawResponse {
            id: model.id,
            prize_name: model.prize_name,
            draw_at: model.draw_at,
            status,
            participant_count,
            winner,
            created_at: model.created_at,
        }
    }
}

/// 管理端抽奖详情 (包含邮件模板)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDrawResponse {
    #[serde(flatten)]
    pub draw: DrawResponse,
    pub winner_email_content: Option<String>,
}

/// 报名请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

/// 报名成功响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub participant_id: i64,
    pub draw_id: i64,
    /// 幸运号码
    pub lucky_number: String,
}

impl From<participants::Model> for RegistrationResponse {
    fn from(m: participants::Model) -> Self {
        RegistrationResponse {
            participant_id: m.id,
            draw_id: m.draw_id,
            lucky_number: m.lucky_number,
        }
    }
}

/// 开奖结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WinnerResponse {
    pub winner_name: String,
    pub winner_phone: String,
    pub winning_number: String,
}

/// 参与者 (管理端)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub lucky_number: String,
    pub ip_address: Option<String>,
    pub is_winner: bool,
    pub created_at: DateTime<Utc>,
}

impl ParticipantResponse {
    pub fn from_model(m: participants::Model, winner_id: Option<i64>) -> Self {
        ParticipantResponse {
            is_winner: winner_id == Some(m.id),
            id: m.id,
            full_name: m.full_name,
            phone: m.phone,
            email: m.email,
            lucky_number: m.lucky_number,
            ip_address: m.ip_address,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantListResponse {
    pub draw: AdminDrawResponse,
    pub participants: Vec<ParticipantResponse>,
}

/// 发送中奖邮件结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotifyWinnerResponse {
    pub recipient: String,
    pub subject: String,
}
