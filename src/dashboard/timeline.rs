//! Timeline Chart View
//!
//! Messages and active users over the selected period, drawn as an inline
//! SVG line chart with a legend and a value table.

use maud::{html, Markup};

use crate::client::models::{Period, TimelinePoint};
use crate::format::{format_chart_date, format_number};

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 350.0;
const CHART_PADDING: f64 = 40.0;

/// Series label and colour, in drawing order
const SERIES: [(&str, &str); 2] = [
    ("Всего сообщений", "#3b82f6"),
    ("Активные пользователи", "#22c55e"),
];

/// Width of the terminal bar for the largest value
const TEXT_BAR_WIDTH: u64 = 30;

/// One chart point with its axis label
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub label: String,
    pub date: String,
    pub total_messages: u64,
    pub active_users: u64,
}

impl TimelineRow {
    fn series(&self, index: usize) -> u64 {
        match index {
            0 => self.total_messages,
            _ => self.active_users,
        }
    }
}

/// Display-ready timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub period: Period,
    pub rows: Vec<TimelineRow>,
}

impl TimelineView {
    pub fn new(points: &[TimelinePoint], period: Period) -> Self {
        let rows = points
            .iter()
            .map(|p| TimelineRow {
                label: format_chart_date(&p.date, period),
                date: p.date.clone(),
                total_messages: p.total_messages,
                active_users: p.active_users,
            })
            .collect();

        Self { period, rows }
    }

    /// Largest value across both series
    pub fn max_value(&self) -> u64 {
        self.rows
            .iter()
            .map(|r| r.total_messages.max(r.active_users))
            .max()
            .unwrap_or(0)
    }

    /// Scale value to chart coordinates
    fn point(&self, index: usize, value: u64) -> (f64, f64) {
        let inner_w = CHART_WIDTH - 2.0 * CHART_PADDING;
        let inner_h = CHART_HEIGHT - 2.0 * CHART_PADDING;
        let step = if self.rows.len() > 1 {
            inner_w / (self.rows.len() - 1) as f64
        } else {
            0.0
        };
        let max = self.max_value().max(1) as f64;

        let x = CHART_PADDING + step * index as f64;
        let y = CHART_HEIGHT - CHART_PADDING - (value as f64 / max) * inner_h;
        (x, y)
    }

    /// Polyline `points` attribute for one series
    fn polyline_points(&self, series: usize) -> String {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let (x, y) = self.point(i, row.series(series));
                format!("{:.1},{:.1}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn render_svg(&self) -> Markup {
        let baseline = CHART_HEIGHT - CHART_PADDING;
        let label_y = baseline + 16.0;

        html! {
            svg class="timeline-chart"
                viewBox=(format!("0 0 {} {}", CHART_WIDTH, CHART_HEIGHT))
                width="100%"
                height=(CHART_HEIGHT)
                role="img"
            {
                line x1=(CHART_PADDING) y1=(baseline) x2=(CHART_WIDTH - CHART_PADDING) y2=(baseline)
                    stroke="#d1d5db" stroke-dasharray="3 3" {}
                text x=(CHART_PADDING - 4.0) y=(CHART_PADDING + 4.0)
                    font-size="11" text-anchor="end" fill="#6b7280"
                {
                    (format_number(self.max_value() as f64))
                }
                @for (series, (name, colour)) in SERIES.iter().enumerate() {
                    polyline fill="none" stroke=(colour) stroke-width="3" points=(self.polyline_points(series)) {
                        title { (name) }
                    }
                }
                @for (i, row) in self.rows.iter().enumerate() {
                    text x=(format!("{:.1}", self.point(i, 0).0)) y=(label_y)
                        font-size="11" text-anchor="middle" fill="#6b7280"
                    {
                        (row.label)
                    }
                }
            }
        }
    }

    /// Chart, legend and value table
    pub fn render_html(&self) -> Markup {
        html! {
            div class="timeline" {
                (self.render_svg())
                ul class="legend" {
                    @for (name, colour) in SERIES {
                        li {
                            span class="legend-dot" style=(format!("background-color: {}", colour)) {}
                            (name)
                        }
                    }
                }
                table class="timeline-table" {
                    thead {
                        tr {
                            th { "Дата" }
                            th { (SERIES[0].0) }
                            th { (SERIES[1].0) }
                        }
                    }
                    tbody {
                        @for row in &self.rows {
                            tr {
                                td title=(row.date) { (row.label) }
                                td { (format_number(row.total_messages as f64)) }
                                td { (format_number(row.active_users as f64)) }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Terminal rendering: one row per point with a bar for messages
    pub fn render_text(&self) -> String {
        let max = u128::from(self.max_value().max(1));
        let mut lines = vec![format!("{:<10} {:>12} {:>12}", "Дата", "Сообщения", "Польз.")];

        lines.extend(self.rows.iter().map(|row| {
            let bar_len = u128::from(row.total_messages) * u128::from(TEXT_BAR_WIDTH) / max;
            format!(
                "{:<10} {:>12} {:>12} {}",
                row.label,
                format_number(row.total_messages as f64),
                format_number(row.active_users as f64),
                "█".repeat(bar_len as usize)
            )
        }));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
