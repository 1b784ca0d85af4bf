//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::http_backtest_adapter::HttpBacktestAdapter;
use crate::adapters::json_file_adapter::JsonFileAdapter;
use crate::domain::chart::DEFAULT_CHART_WIDTH;
use crate::domain::error::TradeplotError;
use crate::domain::format;
use crate::domain::hours::{hour_options, HourOption};
use crate::domain::payload::{BacktestRequest, BacktestResult, DEFAULT_INITIAL_CASH};
use crate::domain::presenter::{present, PresentOptions, Presentation};
use crate::domain::status::Status;
use crate::ports::backtest_port::BacktestPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_REPORT_PATH: &str = "report.html";

#[derive(Parser, Debug)]
#[command(name = "tradeplot", about = "Backtest runner and result viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the hours the backtest service has data for
    Hours {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Submit a backtest and write the HTML report
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hour to test (`HH`); overrides [backtest] hour
        #[arg(long)]
        hour: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also keep the raw result payload
        #[arg(long)]
        save_json: Option<PathBuf>,
        /// Also export the trade history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Render a saved result payload
    Render {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print metrics and the trade table of a saved result payload
    Summary {
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Where a run's outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub report: PathBuf,
    pub save_json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Hours { config } => run_hours(config.as_deref()),
        Command::Run {
            config,
            hour,
            output,
            save_json,
            csv,
        } => run_backtest(config.as_deref(), hour.as_deref(), output, save_json, csv),
        Command::Render {
            input,
            config,
            output,
            width,
            csv,
        } => run_render(&input, config.as_deref(), output, width, csv),
        Command::Summary { input } => run_summary(&input),
    }
}

fn fail(err: TradeplotError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradeplotError> {
    FileConfigAdapter::from_file(path).map_err(|e| TradeplotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// The config file when given, otherwise an empty one so every key defaults.
pub fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, TradeplotError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_config(path)
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| TradeplotError::ConfigParse {
            file: "<defaults>".into(),
            reason,
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradeplotError {
    TradeplotError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

/// Backtest submission from `[backtest]` and the strategy's own section.
pub fn build_request(
    config: &dyn ConfigPort,
    hour_override: Option<&str>,
) -> Result<BacktestRequest, TradeplotError> {
    let strategy = config
        .get_string("backtest", "strategy")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| BacktestRequest::BOLLINGER.to_string());
    if strategy != BacktestRequest::BOLLINGER {
        return Err(invalid(
            "backtest",
            "strategy",
            &format!("unknown strategy '{strategy}'"),
        ));
    }

    let period = config.get_int("bollinger", "period", 100);
    if !(2..=i64::from(u32::MAX)).contains(&period) {
        return Err(invalid("bollinger", "period", "must be at least 2"));
    }
    let std_dev = config.get_double("bollinger", "std_dev", 1.0);
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return Err(invalid("bollinger", "std_dev", "must be positive"));
    }

    let mut request = BacktestRequest::bollinger(period as u32, std_dev);

    request.initial_cash = config.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH);
    if !request.initial_cash.is_finite() {
        return Err(invalid("backtest", "initial_cash", "must be a number"));
    }
    request.position_size = config.get_double("backtest", "position_size", request.position_size);
    if !(request.position_size.is_finite() && request.position_size > 0.0) {
        return Err(invalid("backtest", "position_size", "must be positive"));
    }
    request.commission = config.get_double("backtest", "commission", request.commission);
    if !(request.commission.is_finite() && request.commission >= 0.0) {
        return Err(invalid("backtest", "commission", "must not be negative"));
    }

    request.hour = hour_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "hour"))
        .map(|h| h.trim().to_string())
        .unwrap_or_default();

    Ok(request)
}

pub fn chart_width(config: &dyn ConfigPort, width_override: Option<u32>) -> Result<u32, TradeplotError> {
    let width = match width_override {
        Some(w) => i64::from(w),
        None => config.get_int("chart", "width", i64::from(DEFAULT_CHART_WIDTH)),
    };
    u32::try_from(width)
        .ok()
        .filter(|w| *w > 0)
        .ok_or_else(|| invalid("chart", "width", "must be a positive pixel count"))
}

pub fn report_path(config: &dyn ConfigPort, output_override: Option<PathBuf>) -> PathBuf {
    output_override
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
}

/// Fetch the hours listing and turn it into dropdown choices.
pub fn fetch_hours(port: &dyn BacktestPort) -> (Status, Vec<HourOption>) {
    match port.list_hours() {
        Ok(hours) => (Status::HoursLoaded(hours.len()), hour_options(&hours)),
        Err(e) => {
            warn!(error = %e, "hours listing failed");
            (Status::hours_failed(&e), Vec::new())
        }
    }
}

fn run_hours(config_path: Option<&Path>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let backend = match HttpBacktestAdapter::from_config(&config) {
        Ok(b) => b,
        Err(e) => return fail(e),
    };

    let (status, options) = fetch_hours(&backend);
    eprintln!("{status}");
    for option in &options {
        println!("{}\t{}", option.value, option.label);
    }

    if status.is_error() {
        ExitCode::from(3)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_backtest(
    config_path: Option<&Path>,
    hour: Option<&str>,
    output: Option<PathBuf>,
    save_json: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let request = match build_request(&config, hour) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let width = match chart_width(&config, None) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };
    let backend = match HttpBacktestAdapter::from_config(&config) {
        Ok(b) => b,
        Err(e) => return fail(e),
    };

    let outputs = Outputs {
        report: report_path(&config, output),
        save_json,
        csv,
    };
    run_pipeline(&backend, &request, PresentOptions { chart_width: width }, &outputs)
}

/// Submit, present, and write every requested output.
pub fn run_pipeline(
    port: &dyn BacktestPort,
    request: &BacktestRequest,
    options: PresentOptions,
    outputs: &Outputs,
) -> ExitCode {
    eprintln!("{}", Status::Running);
    let result = match port.run_backtest(request) {
        Ok(r) => r,
        Err(e) => {
            let status = Status::backtest_failed(&e);
            eprintln!("{status}");
            return ExitCode::from(&e);
        }
    };
    eprintln!("{}", Status::Completed);

    if let Some(path) = &outputs.save_json {
        if let Err(e) = JsonFileAdapter::save(&result, path) {
            return fail(e);
        }
        eprintln!("Result saved to: {}", path.display());
    }

    write_outputs(&result, options, Status::Completed, outputs)
}

/// Present a result and write the report (with `status`) and optional CSV.
pub fn write_outputs(
    result: &BacktestResult,
    options: PresentOptions,
    status: Status,
    outputs: &Outputs,
) -> ExitCode {
    let presentation = present(result, options);
    print_summary(&presentation);

    let report = outputs.report.to_string_lossy();
    let adapter = HtmlReportAdapter::new().with_status(status);
    if let Err(e) = adapter.write(&presentation, &report) {
        return fail(e);
    }
    eprintln!("\nReport written to: {report}");

    if let Some(path) = &outputs.csv {
        let path = path.to_string_lossy();
        if let Err(e) = CsvAdapter::new().write(&presentation, &path) {
            return fail(e);
        }
        eprintln!("Trades written to: {path}");
    }

    ExitCode::SUCCESS
}

fn run_render(
    input: &Path,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    width: Option<u32>,
    csv: Option<PathBuf>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let width = match chart_width(&config, width) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };
    let result = match JsonFileAdapter::new(input).load() {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let outputs = Outputs {
        report: report_path(&config, output),
        save_json: None,
        csv,
    };
    write_outputs(
        &result,
        PresentOptions { chart_width: width },
        Status::Ready,
        &outputs,
    )
}

fn run_summary(input: &Path) -> ExitCode {
    let result = match JsonFileAdapter::new(input).load() {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let presentation = present(&result, PresentOptions::default());
    print_summary(&presentation);
    print_trades(&presentation);
    ExitCode::SUCCESS
}

/// Metric cards and trade statistics, as printed to stderr.
pub fn summary_lines(presentation: &Presentation) -> Vec<String> {
    let mut lines = vec!["=== Results ===".to_string()];
    for card in presentation.metric_cards() {
        lines.push(format!("{:<18}{}", format!("{}:", card.label), card.value));
    }

    let stats = &presentation.stats;
    if presentation.summary.trade_count > 0 {
        lines.push(String::new());
        lines.push("=== Trades ===".to_string());
        lines.push(format!(
            "{:<18}{} won, {} lost, {} breakeven",
            "Outcome:", stats.trades_won, stats.trades_lost, stats.trades_breakeven
        ));
        lines.push(format!("{:<18}{}", "Win Rate:", format::percent(stats.win_rate * 100.0)));
        lines.push(format!("{:<18}{}", "Gross P/L:", format::dollars(stats.gross_pnl, 2)));
        lines.push(format!(
            "{:<18}{}",
            "Commission:",
            format::dollars(stats.total_commission, 4)
        ));
        lines.push(format!("{:<18}{}", "Largest Win:", format::dollars(stats.largest_win, 2)));
        lines.push(format!("{:<18}{}", "Largest Loss:", format::dollars(stats.largest_loss, 2)));
    }
    lines
}

fn print_summary(presentation: &Presentation) {
    for line in summary_lines(presentation) {
        eprintln!("{line}");
    }
}

fn print_trades(presentation: &Presentation) {
    if presentation.rows.is_empty() {
        return;
    }
    println!(
        "{:<20} {:>12} {:<20} {:>12} {:<6} {:>10} {:>10} {:>12}",
        "Entry Time", "Entry Price", "Exit Time", "Exit Price", "Side", "Quantity", "Commission", "Profit/Loss"
    );
    for row in &presentation.rows {
        println!(
            "{:<20} {:>12} {:<20} {:>12} {:<6} {:>10} {:>10} {:>12}",
            row.entry_time,
            row.entry_price,
            row.exit_time,
            row.exit_price,
            row.side,
            row.quantity,
            row.commission,
            row.profit_loss
        );
    }
}
