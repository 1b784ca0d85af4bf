//! HTML report adapter implementing ReportPort.
//!
//! Renders a presented backtest through an Askama template. Charts are bound
//! to a [`UplotCanvas`] and embedded as uPlot options/data JSON.

use std::fs;
use std::path::Path;

use askama::Template;
use tracing::debug;

use crate::adapters::uplot_canvas::{LiveChart, UplotCanvas};
use crate::domain::chart::CHART_HEIGHT;
use crate::domain::error::TradeplotError;
use crate::domain::format;
use crate::domain::metrics::TradeStats;
use crate::domain::presenter::{MetricCard, Presentation, TradeRow};
use crate::domain::status::Status;
use crate::ports::render_port::{ChartSlot, ChartSlots};
use crate::ports::report_port::ReportPort;

struct ChartView {
    heading: &'static str,
    dom_id: &'static str,
    options_json: String,
    data_json: String,
}

impl ChartView {
    fn from_live(chart: &LiveChart) -> Result<Self, TradeplotError> {
        let (heading, dom_id) = match chart.slot {
            ChartSlot::Price => ("Price", "priceChart"),
            ChartSlot::Equity => ("Equity Curve", "equityChart"),
        };
        Ok(ChartView {
            heading,
            dom_id,
            options_json: script_json(&chart.options)?,
            data_json: script_json(&chart.data)?,
        })
    }
}

/// JSON safe to place inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String, TradeplotError> {
    let text = serde_json::to_string(value).map_err(TradeplotError::render)?;
    Ok(text.replace("</", "<\\/"))
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    status: String,
    status_is_error: bool,
    cards: Vec<MetricCard>,
    charts: Vec<ChartView>,
    chart_height: u32,
    stats: &'a TradeStats,
    win_rate: String,
    gross_pnl: String,
    net_pnl: String,
    total_commission: String,
    largest_win: String,
    largest_loss: String,
    rows: &'a [TradeRow],
}

pub struct HtmlReportAdapter {
    title: String,
    status: Status,
}

impl HtmlReportAdapter {
    /// A report with the idle `Ready` status line.
    pub fn new() -> Self {
        Self {
            title: "Backtest Report".to_string(),
            status: Status::Ready,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn render(&self, presentation: &Presentation) -> Result<String, TradeplotError> {
        let mut canvas = UplotCanvas::new();
        let slots = ChartSlots::new().apply(presentation, &mut canvas)?;
        debug!(charts = slots.live_count(), "charts bound for report");

        let charts = canvas
            .charts()
            .into_iter()
            .map(ChartView::from_live)
            .collect::<Result<Vec<_>, _>>()?;
        slots.clear(&mut canvas);

        let stats = &presentation.stats;
        let template = ReportTemplate {
            title: &self.title,
            status: self.status.to_string(),
            status_is_error: self.status.is_error(),
            cards: presentation.metric_cards(),
            charts,
            chart_height: CHART_HEIGHT,
            stats,
            win_rate: format::percent(stats.win_rate * 100.0),
            gross_pnl: format::dollars(stats.gross_pnl, 2),
            net_pnl: format::dollars(stats.net_pnl, 2),
            total_commission: format::dollars(stats.total_commission, 4),
            largest_win: format::dollars(stats.largest_win, 2),
            largest_loss: format::dollars(stats.largest_loss, 2),
            rows: &presentation.rows,
        };

        template.render().map_err(TradeplotError::render)
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, presentation: &Presentation, output_path: &str) -> Result<(), TradeplotError> {
        let html = self.render(presentation)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        Ok(())
    }
}
