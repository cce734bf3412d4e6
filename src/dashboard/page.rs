//! Dashboard Page
//!
//! Fetches stats at render time and assembles cards, period selector and
//! timeline into a complete HTML document. A failed fetch renders a static
//! error panel instead; it never fails the request.

use maud::{html, Markup};

use super::{layout, metric_cards, MetricCardView, TimelineView};
use crate::client::models::{Period, StatsResponse};
use crate::client::StatsClient;

/// Product name shown in the header and page title
pub const PRODUCT_NAME: &str = "Знайкин Dashboard";

/// Period from a `?period=` value; missing or unknown values give the default
pub fn resolve_period(raw: Option<&str>) -> Period {
    match raw {
        None | Some("") => Period::default(),
        Some(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using {}", e, Period::default());
            Period::default()
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PageContent {
    Stats {
        cards: Vec<MetricCardView>,
        timeline: TimelineView,
    },
    Error {
        message: String,
    },
}

/// The dashboard route's view
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    period: Period,
    content: PageContent,
}

impl DashboardPage {
    pub fn from_stats(period: Period, stats: &StatsResponse) -> Self {
        Self {
            period,
            content: PageContent::Stats {
                cards: metric_cards(&stats.metrics),
                timeline: TimelineView::new(&stats.timeline, period),
            },
        }
    }

    pub fn error(period: Period, message: impl Into<String>) -> Self {
        Self {
            period,
            content: PageContent::Error {
                message: message.into(),
            },
        }
    }

    /// Fetch stats for `period` and build the page
    pub async fn load(client: &StatsClient, period: Period) -> Self {
        match client.get_stats(period).await {
            Ok(stats) => Self::from_stats(period, &stats),
            Err(e) => {
                tracing::error!(error = %e, %period, "Failed to fetch stats");
                Self::error(period, e.to_string())
            }
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn is_error(&self) -> bool {
        matches!(self.content, PageContent::Error { .. })
    }

    pub fn cards(&self) -> &[MetricCardView] {
        match &self.content {
            PageContent::Stats { cards, .. } => cards,
            PageContent::Error { .. } => &[],
        }
    }

    pub fn timeline(&self) -> Option<&TimelineView> {
        match &self.content {
            PageContent::Stats { timeline, .. } => Some(timeline),
            PageContent::Error { .. } => None,
        }
    }

    fn render_period_selector(&self) -> Markup {
        html! {
            nav class="period-selector" {
                @for period in Period::ALL {
                    a class=(if period == self.period { "tab active" } else { "tab" })
                        href=(format!("/?period={}", period.as_str()))
                    {
                        (period.label())
                    }
                }
            }
        }
    }

    fn render_body(&self) -> Markup {
        match &self.content {
            PageContent::Error { message } => html! {
                div class="card error-panel" {
                    h2 class="card-title" { "Ошибка загрузки Dashboard" }
                    p { "Не удалось загрузить статистику. Убедитесь, что API сервер запущен." }
                    p class="text-muted" { "Ошибка: " (message) }
                }
            },
            PageContent::Stats { cards, timeline } => html! {
                div class="metric-grid" {
                    @for card in cards {
                        (card.render_html())
                    }
                }
                div class="card" {
                    div class="card-header" {
                        div {
                            h2 class="card-title" { "Активность пользователей" }
                            p class="text-muted" { "Данные за " (self.period.span_phrase()) }
                        }
                        (self.render_period_selector())
                    }
                    div class="card-content" {
                        (timeline.render_html())
                    }
                }
            },
        }
    }

    /// Complete HTML document
    pub fn render_html(&self) -> Markup {
        layout(PRODUCT_NAME, self.render_body())
    }

    /// Terminal rendering of the same page
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        match &self.content {
            PageContent::Error { message } => {
                lines.push("Ошибка загрузки Dashboard".to_string());
                lines.push(
                    "Не удалось загрузить статистику. Убедитесь, что API сервер запущен."
                        .to_string(),
                );
                lines.push(format!("Ошибка: {}", message));
            }
            PageContent::Stats { cards, timeline } => {
                lines.push(format!("{} | {}", PRODUCT_NAME, self.period.label()));
                lines.push(String::new());
                lines.extend(cards.iter().map(MetricCardView::render_text));
                lines.push(String::new());
                lines.push("Активность пользователей".to_string());
                lines.push(timeline.render_text());
            }
        }

        let mut out = lines.join("\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
