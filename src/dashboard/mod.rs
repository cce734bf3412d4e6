//! Dashboard Views
//!
//! View models built from a [`StatsResponse`](crate::client::StatsResponse)
//! and rendered either as HTML (web service, via `maud`) or plain text
//! (terminal).
//!
//! - [`metric_card`]: the four metric cards
//! - [`timeline`]: the activity chart
//! - [`page`]: the assembled dashboard route, including the error panel
//! - [`chat_panel`]: the assistant panel opened from the floating button

pub mod chat_panel;
pub mod metric_card;
pub mod page;
pub mod timeline;

pub use chat_panel::render_chat_page;
pub use metric_card::{metric_cards, MetricCardView, ValueFormat};
pub use page::{resolve_period, DashboardPage, PRODUCT_NAME};
pub use timeline::{TimelineRow, TimelineView};

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Full document shell shared by every page: header, content and the
/// floating chat button
pub(crate) fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_STYLE)) }
            }
            body {
                header class="site-header" {
                    a class="logo" href="/" { "З" }
                    h1 { (PRODUCT_NAME) }
                }
                main class="container" {
                    (content)
                }
                a class="chat-fab" href="/chat" title="AI Ассистент" { "💬" }
            }
        }
    }
}

const PAGE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
.site-header { display: flex; align-items: center; gap: .5rem; padding: 1rem 1.5rem; border-bottom: 1px solid #e2e8f0; }
.logo { display: inline-flex; width: 2rem; height: 2rem; align-items: center; justify-content: center; border-radius: .375rem; background: #0f172a; color: #fff; font-weight: 600; text-decoration: none; }
.site-header h1 { font-size: 1.25rem; margin: 0; }
.container { max-width: 80rem; margin: 0 auto; padding: 1.5rem; }
.metric-grid { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fit, minmax(14rem, 1fr)); margin-bottom: 1.5rem; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: .75rem; padding: 1rem 1.25rem; }
.card-header { display: flex; justify-content: space-between; align-items: center; }
.card-title { font-size: .875rem; font-weight: 500; margin: 0; }
.metric-value { font-size: 1.5rem; font-weight: 700; }
.metric-change { display: flex; gap: .25rem; align-items: center; font-size: .75rem; }
.metric-change p { margin: 0; }
.text-muted { color: #64748b; }
.text-green-600 { color: #16a34a; }
.text-red-600 { color: #dc2626; }
.text-gray-600 { color: #4b5563; }
.period-selector { display: flex; gap: .25rem; background: #f1f5f9; padding: .25rem; border-radius: .5rem; }
.tab { padding: .25rem .75rem; border-radius: .375rem; color: #334155; text-decoration: none; font-size: .875rem; border: 0; background: transparent; cursor: pointer; }
.tab.active { background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.08); }
.legend { display: flex; gap: 1rem; list-style: none; padding: 0; justify-content: center; font-size: .875rem; }
.legend-dot { display: inline-block; width: .5rem; height: .5rem; border-radius: 9999px; margin-right: .5rem; }
.timeline-table { width: 100%; border-collapse: collapse; font-size: .875rem; }
.timeline-table th, .timeline-table td { text-align: left; padding: .25rem .5rem; border-bottom: 1px solid #f1f5f9; }
.chat-fab { position: fixed; bottom: 1.5rem; right: 1.5rem; width: 3.5rem; height: 3.5rem; display: flex; align-items: center; justify-content: center; border-radius: 9999px; background: linear-gradient(90deg, #60a5fa, #2563eb); color: #fff; font-size: 1.5rem; text-decoration: none; box-shadow: 0 4px 12px rgba(0,0,0,.2); }
.chat-panel { max-width: 40rem; margin: 0 auto; }
.chat-actions { display: flex; gap: .25rem; }
.chat-transcript { display: flex; flex-direction: column; gap: .5rem; margin: 1rem 0; }
.bubble { max-width: 80%; padding: .5rem .75rem; border-radius: .75rem; font-size: .875rem; }
.bubble p { margin: 0; white-space: pre-wrap; }
.bubble-ai { align-self: flex-start; background: #f1f5f9; }
.bubble-user { align-self: flex-end; background: #2563eb; color: #fff; }
.sql { margin-top: .5rem; font-size: .75rem; }
.sql pre { white-space: pre-wrap; background: #0f172a; color: #e2e8f0; padding: .5rem; border-radius: .375rem; }
.error-banner { background: #fef2f2; color: #b91c1c; border: 1px solid #fecaca; padding: .5rem .75rem; border-radius: .5rem; font-size: .875rem; margin-bottom: .5rem; }
.chat-input { display: flex; gap: .5rem; }
.chat-input input { flex: 1; padding: .5rem .75rem; border: 1px solid #cbd5e1; border-radius: .5rem; }
"#;
