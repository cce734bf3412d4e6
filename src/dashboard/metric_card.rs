//! Metric Card View
//!
//! A single dashboard metric with its value, change and trend.

use maud::{html, Markup};

use crate::client::models::{MetricCard, MetricsData, Trend};
use crate::format::{format_change, format_number, format_percent};

/// How a card's value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    #[default]
    Number,
    Percent,
}

/// Display-ready metric card
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCardView {
    pub title: String,
    pub value: String,
    pub change: String,
    /// Raw change, kept for colouring
    pub change_value: f64,
    pub trend: Trend,
    pub description: String,
}

impl MetricCardView {
    pub fn new(title: impl Into<String>, card: &MetricCard, format: ValueFormat) -> Self {
        let value = match format {
            ValueFormat::Number => format_number(card.value),
            ValueFormat::Percent => format_percent(card.value),
        };

        Self {
            title: title.into(),
            value,
            change: format_change(card.change),
            change_value: card.change,
            trend: card.trend,
            description: card.description.clone(),
        }
    }

    pub fn trend_icon(&self) -> &'static str {
        match self.trend {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Steady => "→",
        }
    }

    pub fn trend_class(&self) -> &'static str {
        match self.trend {
            Trend::Up => "text-green-600",
            Trend::Down => "text-red-600",
            Trend::Steady => "text-gray-600",
        }
    }

    /// Colour of the change figure, by its sign
    pub fn change_class(&self) -> &'static str {
        if self.change_value > 0.0 {
            "text-green-600"
        } else if self.change_value < 0.0 {
            "text-red-600"
        } else {
            "text-gray-600"
        }
    }

    pub fn render_html(&self) -> Markup {
        html! {
            div class="card metric-card" {
                div class="card-header" {
                    h3 class="card-title" { (self.title) }
                    span class=(self.trend_class()) { (self.trend_icon()) }
                }
                div class="card-content" {
                    div class="metric-value" { (self.value) }
                    div class="metric-change" {
                        span class=(self.change_class()) { (self.change) }
                        p class="text-muted" { (self.description) }
                    }
                }
            }
        }
    }

    /// One terminal line: `Title  value  ↑ +12.5%  description`
    pub fn render_text(&self) -> String {
        format!(
            "{:<24} {:>14}  {} {:<8} {}",
            self.title,
            self.value,
            self.trend_icon(),
            self.change,
            self.description
        )
    }
}

/// The dashboard's four cards, in display order
pub fn metric_cards(metrics: &MetricsData) -> Vec<MetricCardView> {
    vec![
        MetricCardView::new("Всего сообщений", &metrics.total_messages, ValueFormat::Number),
        MetricCardView::new("Активные пользователи", &metrics.active_users, ValueFormat::Number),
        MetricCardView::new("Всего диалогов", &metrics.total_dialogs, ValueFormat::Number),
        MetricCardView::new("Темп роста", &metrics.growth_rate, ValueFormat::Percent),
    ]
}
