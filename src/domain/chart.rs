//! Chart composition: series, styling and the shared data matrix.
//!
//! A chart is assembled with [`ChartBuilder`] up to its final series count and
//! only then turned into a [`ChartConfig`]. Series indices follow the charting
//! convention where index 0 is the x column, so the first y series is 1, and
//! each later series takes the next free index on the same chart.

use serde::Serialize;

use super::format;
use super::payload::{EquitySample, PriceSample};
use super::round_trip::RoundTripTrade;
use super::time_align::align;

pub const CHART_HEIGHT: u32 = 500;
pub const DEFAULT_CHART_WIDTH: u32 = 1000;
pub const CURSOR_SYNC_KEY: &str = "tradeplot";

/// One logical series in column form: x in epoch seconds, y values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl ChartSeries {
    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn prices(samples: &[PriceSample]) -> Self {
        samples.iter().map(|s| (align(s.time), s.price)).collect()
    }

    pub fn equity(samples: &[EquitySample]) -> Self {
        samples.iter().map(|s| (align(s.time), s.equity)).collect()
    }
}

impl FromIterator<(f64, f64)> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut series = ChartSeries::default();
        for (x, y) in iter {
            series.push(x, y);
        }
        series
    }
}

/// Executions split by direction, each in trade-log order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPoints {
    pub buys: ChartSeries,
    pub sells: ChartSeries,
}

/// Split every entry and exit of the round trips into buy and sell points.
pub fn partition_markers(round_trips: &[RoundTripTrade]) -> MarkerPoints {
    let mut markers = MarkerPoints::default();
    for trade in round_trips.iter().flat_map(|rt| [rt.entry, rt.exit]) {
        let target = if trade.is_buy {
            &mut markers.buys
        } else {
            &mut markers.sells
        };
        target.push(align(trade.time), trade.price);
    }
    markers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSymbol {
    Circle,
    TriangleUp,
    TriangleDown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointStyle {
    pub show: bool,
    pub size: f64,
    pub symbol: PointSymbol,
    pub fill: Option<String>,
}

impl PointStyle {
    pub fn hidden() -> Self {
        PointStyle {
            show: false,
            size: 0.0,
            symbol: PointSymbol::Circle,
            fill: None,
        }
    }

    pub fn marker(symbol: PointSymbol, color: &str) -> Self {
        PointStyle {
            show: true,
            size: 8.0,
            symbol,
            fill: Some(color.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub label: String,
    pub stroke: String,
    pub width: f64,
    pub fill: Option<String>,
    pub points: PointStyle,
    /// Draw the line across rows where this series has no value.
    pub span_gaps: bool,
}

impl SeriesStyle {
    pub fn line(label: &str, stroke: &str, width: f64) -> Self {
        SeriesStyle {
            label: label.to_string(),
            stroke: stroke.to_string(),
            width,
            fill: None,
            points: PointStyle::hidden(),
            span_gaps: true,
        }
    }

    /// Points only, no connecting line.
    pub fn markers(label: &str, color: &str, symbol: PointSymbol) -> Self {
        SeriesStyle {
            label: label.to_string(),
            stroke: color.to_string(),
            width: 0.0,
            fill: None,
            points: PointStyle::marker(symbol, color),
            span_gaps: false,
        }
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }
}

/// Tick label format used once the visible tick spacing reaches `min_span`
/// seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickFormat {
    pub min_span: f64,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub label: String,
    pub label_size: u32,
    pub stroke: String,
    pub grid_stroke: String,
    pub tick_stroke: String,
    pub scale: String,
    pub values: Vec<TickFormat>,
}

impl AxisConfig {
    fn new(label: &str, label_size: u32, scale: &str) -> Self {
        AxisConfig {
            label: label.to_string(),
            label_size,
            stroke: "black".to_string(),
            grid_stroke: "#eee".to_string(),
            tick_stroke: "#ddd".to_string(),
            scale: scale.to_string(),
            values: Vec::new(),
        }
    }

    /// Time axis over epoch seconds: hour, minute and second tick spans.
    pub fn time() -> Self {
        let mut axis = Self::new("Time", 80, "x");
        axis.values = vec![
            TickFormat {
                min_span: 3600.0,
                template: "{HH}:{mm}".to_string(),
            },
            TickFormat {
                min_span: 60.0,
                template: "{HH}:{mm}".to_string(),
            },
            TickFormat {
                min_span: 1.0,
                template: "{HH}:{mm}:{ss}".to_string(),
            },
        ];
        axis
    }

    pub fn value(label: &str) -> Self {
        Self::new(label, 60, "y")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorConfig {
    pub show: bool,
    pub drag_x: bool,
    pub drag_y: bool,
    /// Dragging zooms the x scale.
    pub set_scale: bool,
    pub sync_key: Option<String>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            show: true,
            drag_x: true,
            drag_y: false,
            set_scale: true,
            sync_key: Some(CURSOR_SYNC_KEY.to_string()),
        }
    }
}

/// Column-oriented data matrix: one shared x column plus one column per
/// y series. `ys[i - 1]` holds series index `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub x: Vec<f64>,
    pub ys: Vec<Vec<Option<f64>>>,
}

impl ChartData {
    /// Merge series onto one ascending x column.
    ///
    /// Rows from different series sharing an x collapse into one row; samples
    /// sharing an x within one series keep their own rows. A lone series is
    /// taken as-is.
    pub fn join(series: &[ChartSeries]) -> Self {
        if let [only] = series {
            return ChartData {
                x: only.xs.clone(),
                ys: vec![only.ys.iter().copied().map(Some).collect()],
            };
        }

        let mut points: Vec<(f64, usize, f64)> = series
            .iter()
            .enumerate()
            .flat_map(|(idx, s)| s.xs.iter().zip(&s.ys).map(move |(&x, &y)| (x, idx, y)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut data = ChartData {
            x: Vec::with_capacity(points.len()),
            ys: vec![Vec::with_capacity(points.len()); series.len()],
        };
        for (x, idx, y) in points {
            let same_x = data.x.last().is_some_and(|last| last.total_cmp(&x).is_eq());
            let free = matches!(data.ys[idx].last(), Some(None));
            if !(same_x && free) {
                data.x.push(x);
                for column in &mut data.ys {
                    column.push(None);
                }
            }
            if let Some(cell) = data.ys[idx].last_mut() {
                *cell = Some(y);
            }
        }
        data
    }

    pub fn rows(&self) -> usize {
        self.x.len()
    }

    /// Column for a series index (1-based; 0 is the x column).
    pub fn series(&self, index: usize) -> Option<&[Option<f64>]> {
        index
            .checked_sub(1)
            .and_then(|i| self.ys.get(i))
            .map(Vec::as_slice)
    }
}

/// Everything the renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub title: String,
    pub id: String,
    pub class: String,
    pub width: u32,
    pub height: u32,
    /// Styles for series 1.. (series 0 is the x placeholder).
    pub series: Vec<SeriesStyle>,
    pub axes: Vec<AxisConfig>,
    pub cursor: CursorConfig,
    pub legend: bool,
    pub data: ChartData,
    #[serde(skip)]
    sources: Vec<ChartSeries>,
}

impl ChartConfig {
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Append a series to an already-built chart and rebuild the data matrix.
    ///
    /// Returns the index the series landed on. Push the new `data` to any live
    /// chart through the render target's data replacement.
    pub fn add_series(&mut self, style: SeriesStyle, series: ChartSeries) -> usize {
        self.series.push(style);
        self.sources.push(series);
        self.data = ChartData::join(&self.sources);
        self.series.len()
    }

    pub fn style(&self, index: usize) -> Option<&SeriesStyle> {
        index.checked_sub(1).and_then(|i| self.series.get(i))
    }
}

pub struct ChartBuilder {
    title: String,
    id: String,
    class: String,
    width: u32,
    axes: Vec<AxisConfig>,
    cursor: CursorConfig,
    legend: bool,
    series: Vec<SeriesStyle>,
    sources: Vec<ChartSeries>,
}

impl ChartBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        ChartBuilder {
            title: title.into(),
            id: String::new(),
            class: "my-chart".to_string(),
            width: DEFAULT_CHART_WIDTH,
            axes: Vec::new(),
            cursor: CursorConfig::default(),
            legend: true,
            series: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn axis(mut self, axis: AxisConfig) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn cursor(mut self, cursor: CursorConfig) -> Self {
        self.cursor = cursor;
        self
    }

    /// Add a series and return its index (1 for the first).
    pub fn add_series(&mut self, style: SeriesStyle, series: ChartSeries) -> usize {
        self.series.push(style);
        self.sources.push(series);
        self.series.len()
    }

    /// Like [`add_series`](Self::add_series), skipping empty series.
    pub fn add_series_if_any(&mut self, style: SeriesStyle, series: ChartSeries) -> Option<usize> {
        if series.is_empty() {
            None
        } else {
            Some(self.add_series(style, series))
        }
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn build(self) -> ChartConfig {
        let data = ChartData::join(&self.sources);
        ChartConfig {
            title: self.title,
            id: self.id,
            class: self.class,
            width: self.width,
            height: CHART_HEIGHT,
            series: self.series,
            axes: self.axes,
            cursor: self.cursor,
            legend: self.legend,
            data,
            sources: self.sources,
        }
    }
}

/// Series indices a price chart ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerIndices {
    pub buys: Option<usize>,
    pub sells: Option<usize>,
}

pub fn buy_marker_style() -> SeriesStyle {
    SeriesStyle::markers("Buy", "green", PointSymbol::TriangleUp)
}

pub fn sell_marker_style() -> SeriesStyle {
    SeriesStyle::markers("Sell", "red", PointSymbol::TriangleDown)
}

/// Price line with buy/sell markers. `None` without price samples.
pub fn price_chart(
    samples: &[PriceSample],
    round_trips: &[RoundTripTrade],
    width: u32,
) -> Option<(ChartConfig, MarkerIndices)> {
    if samples.is_empty() {
        return None;
    }

    let mut builder = ChartBuilder::new(format!("Price ({} trades)", round_trips.len()))
        .id("price-chart")
        .width(width)
        .axis(AxisConfig::time())
        .axis(AxisConfig::value("Price ($)"));
    builder.add_series(
        SeriesStyle::line("Price", "blue", 1.0),
        ChartSeries::prices(samples),
    );

    let markers = partition_markers(round_trips);
    let indices = MarkerIndices {
        buys: builder.add_series_if_any(buy_marker_style(), markers.buys),
        sells: builder.add_series_if_any(sell_marker_style(), markers.sells),
    };
    Some((builder.build(), indices))
}

/// Equity curve. `None` without equity samples.
pub fn equity_chart(samples: &[EquitySample], initial_cash: f64, width: u32) -> Option<ChartConfig> {
    if samples.is_empty() {
        return None;
    }

    let mut builder = ChartBuilder::new(format!(
        "Equity Curve (Initial: ${})",
        format::plain(initial_cash)
    ))
    .id("equity-chart")
    .width(width)
    .axis(AxisConfig::time())
    .axis(AxisConfig::value("Equity ($)"));
    builder.add_series(
        SeriesStyle::line("Equity", "green", 2.0).with_fill("rgba(0, 255, 0, 0.1)"),
        ChartSeries::equity(samples),
    );
    Some(builder.build())
}
