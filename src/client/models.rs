//! API Data Transfer Objects
//!
//! Request and response types shared with the backend API.
//! Field names follow the backend's JSON exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// STATS DTOs
// ============================================

/// Reporting window for dashboard statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "3m")]
    ThreeMonths,
}

impl Period {
    /// All periods in selector order
    pub const ALL: [Period; 3] = [Period::SevenDays, Period::ThirtyDays, Period::ThreeMonths];

    /// Query string form (`7d`, `30d`, `3m`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::SevenDays => "7d",
            Period::ThirtyDays => "30d",
            Period::ThreeMonths => "3m",
        }
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            Period::SevenDays => "Последние 7 дней",
            Period::ThirtyDays => "Последние 30 дней",
            Period::ThreeMonths => "Последние 3 месяца",
        }
    }

    /// Lower-case phrase used in "Данные за ..."
    pub fn span_phrase(&self) -> &'static str {
        match self {
            Period::SevenDays => "последние 7 дней",
            Period::ThirtyDays => "последние 30 дней",
            Period::ThreeMonths => "последние 3 месяца",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::SevenDays),
            "30d" => Ok(Period::ThirtyDays),
            "3m" => Ok(Period::ThreeMonths),
            other => Err(format!("Unknown period '{}', expected one of 7d, 30d, 3m", other)),
        }
    }
}

/// Direction of a metric relative to the previous period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Steady,
}

/// A single dashboard card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    /// Metric value (count or percent)
    pub value: f64,
    /// Change against the previous period, in percent
    pub change: f64,
    pub trend: Trend,
    pub description: String,
}

/// The four dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsData {
    pub total_messages: MetricCard,
    pub active_users: MetricCard,
    pub total_dialogs: MetricCard,
    pub growth_rate: MetricCard,
}

/// One point of the activity timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Date as `YYYY-MM-DD`
    pub date: String,
    pub total_messages: u64,
    pub active_users: u64,
}

/// Response of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub period: Period,
    pub metrics: MetricsData,
    pub timeline: Vec<TimelinePoint>,
}

// ============================================
// CHAT DTOs
// ============================================

/// Conversational context of the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// General assistant
    #[default]
    Normal,
    /// Statistics-query assistant exposing the generated SQL
    Admin,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Normal => "normal",
            ChatMode::Admin => "admin",
        }
    }

    /// The other mode
    pub fn toggled(&self) -> Self {
        match self {
            ChatMode::Normal => ChatMode::Admin,
            ChatMode::Admin => ChatMode::Normal,
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(ChatMode::Normal),
            "admin" => Ok(ChatMode::Admin),
            other => Err(format!("Unknown chat mode '{}', expected normal or admin", other)),
        }
    }
}

/// Body of `POST /api/chat/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub mode: ChatMode,
    pub session_id: String,
}

/// Response of `POST /api/chat/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    pub mode: ChatMode,
}

/// Author of a stored history message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Entry of `GET /api/chat/history/{session_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    /// Timestamp exactly as the backend sent it
    pub timestamp: String,
}
