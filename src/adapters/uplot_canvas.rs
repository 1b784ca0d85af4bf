//! Render target that keeps live charts as uPlot option/data JSON.
//!
//! Used by the HTML report: each live chart becomes a `new uPlot(opts, data,
//! el)` call on the page.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::domain::chart::{AxisConfig, ChartConfig, ChartData, SeriesStyle};
use crate::domain::error::TradeplotError;
use crate::ports::render_port::{ChartSlot, RenderTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct LiveChart {
    pub slot: ChartSlot,
    pub title: String,
    pub options: Value,
    pub data: Value,
}

#[derive(Debug, Default)]
pub struct UplotCanvas {
    next_id: u32,
    charts: BTreeMap<ChartId, LiveChart>,
    destroyed: usize,
}

impl UplotCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self, id: ChartId) -> Option<&LiveChart> {
        self.charts.get(&id)
    }

    /// Live charts, price before equity.
    pub fn charts(&self) -> Vec<&LiveChart> {
        let mut charts: Vec<&LiveChart> = self.charts.values().collect();
        charts.sort_by_key(|c| c.slot);
        charts
    }

    pub fn live_count(&self) -> usize {
        self.charts.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    fn live_mut(&mut self, id: ChartId) -> Result<&mut LiveChart, TradeplotError> {
        self.charts
            .get_mut(&id)
            .ok_or_else(|| TradeplotError::render(format!("chart {} is not live", id.0)))
    }
}

impl RenderTarget for UplotCanvas {
    type Handle = ChartId;

    fn create(&mut self, slot: ChartSlot, config: &ChartConfig) -> Result<ChartId, TradeplotError> {
        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.charts.insert(
            id,
            LiveChart {
                slot,
                title: config.title.clone(),
                options: uplot_options(config),
                data: uplot_data(&config.data),
            },
        );
        Ok(id)
    }

    fn set_data(&mut self, handle: &ChartId, data: &ChartData) -> Result<(), TradeplotError> {
        self.live_mut(*handle)?.data = uplot_data(data);
        Ok(())
    }

    fn set_size(&mut self, handle: &ChartId, width: u32, height: u32) -> Result<(), TradeplotError> {
        let chart = self.live_mut(*handle)?;
        chart.options["width"] = json!(width);
        chart.options["height"] = json!(height);
        Ok(())
    }

    fn destroy(&mut self, handle: ChartId) {
        if self.charts.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }
}

/// uPlot `opts` object for a chart. Series 0 is the empty x placeholder.
pub fn uplot_options(config: &ChartConfig) -> Value {
    let mut series = vec![json!({})];
    series.extend(config.series.iter().map(series_options));

    let mut cursor = json!({
        "show": config.cursor.show,
        "drag": {
            "x": config.cursor.drag_x,
            "y": config.cursor.drag_y,
            "setScale": config.cursor.set_scale,
        },
    });
    if let Some(key) = &config.cursor.sync_key {
        cursor["sync"] = json!({ "key": key });
    }

    json!({
        "title": config.title,
        "id": config.id,
        "class": config.class,
        "width": config.width,
        "height": config.height,
        "series": series,
        "axes": config.axes.iter().map(axis_options).collect::<Vec<_>>(),
        "cursor": cursor,
        "legend": { "show": config.legend },
    })
}

fn series_options(style: &SeriesStyle) -> Value {
    let mut points = Map::new();
    points.insert("show".into(), json!(style.points.show));
    if style.points.show {
        points.insert("size".into(), json!(style.points.size));
        points.insert("symbol".into(), json!(style.points.symbol));
        if let Some(fill) = &style.points.fill {
            points.insert("fill".into(), json!(fill));
        }
    }

    let mut series = json!({
        "label": style.label,
        "stroke": style.stroke,
        "width": style.width,
        "spanGaps": style.span_gaps,
        "points": points,
    });
    if let Some(fill) = &style.fill {
        series["fill"] = json!(fill);
    }
    series
}

fn axis_options(axis: &AxisConfig) -> Value {
    let mut options = json!({
        "label": axis.label,
        "labelSize": axis.label_size,
        "stroke": axis.stroke,
        "grid": { "show": true, "stroke": axis.grid_stroke },
        "ticks": { "show": true, "stroke": axis.tick_stroke },
        "scale": axis.scale,
    });
    if !axis.values.is_empty() {
        let values: Vec<Value> = axis
            .values
            .iter()
            .map(|t| json!([t.min_span, t.template, null, null, null, null, null, null, 1]))
            .collect();
        options["values"] = json!(values);
    }
    options
}

/// `[x, y1, y2, ...]` with `null` gaps. Non-finite values also become `null`.
pub fn uplot_data(data: &ChartData) -> Value {
    let mut columns = Vec::with_capacity(data.ys.len() + 1);
    columns.push(json!(data.x));
    columns.extend(data.ys.iter().map(|col| json!(col)));
    Value::Array(columns)
}
