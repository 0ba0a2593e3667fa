use std::fmt::Write as _;

use citycast_core::{CurrentView, ForecastCard, HistoricalChart, Notice, Presenter};
use serde_json::json;

/// Writes sections to stdout and notices to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Presenter for TerminalPresenter {
    fn show_current(&self, view: &CurrentView) {
        if self.json {
            println!("{}", json!({ "current": view }));
        } else {
            print!("{}", format_current(view));
        }
    }

    fn show_forecast(&self, cards: &[ForecastCard]) {
        if self.json {
            println!("{}", json!({ "forecast": cards }));
        } else {
            print!("{}", format_forecast(cards));
        }
    }

    fn show_historical(&self, chart: &HistoricalChart) {
        if self.json {
            println!("{}", json!({ "historical": chart }));
        } else {
            print!("{}", format_historical(chart));
        }
    }

    fn notify(&self, notice: Notice) {
        eprintln!("{}", notice.message());
    }
}

pub fn format_current(view: &CurrentView) -> String {
    format!(
        "Current weather\n  \
         Temperature: {} °C\n  \
         Condition:   {}\n  \
         Humidity:    {} %\n  \
         Wind speed:  {} km/h\n\n",
        view.temperature, view.condition, view.humidity, view.wind_speed_kmh
    )
}

pub fn format_forecast(cards: &[ForecastCard]) -> String {
    let mut out = String::from("Forecast\n");
    for card in cards {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "  {:<12} High: {:<8} Low: {:<8} {} ({})",
            card.date, card.high, card.low, card.alt, card.icon_url
        );
    }
    out.push('\n');
    out
}

pub fn format_historical(chart: &HistoricalChart) -> String {
    let mut out = String::from("Historical data\n");
    let _ = write!(out, "  {:<12}", "Date");
    for dataset in &chart.datasets {
        let _ = write!(out, " {:>24}", dataset.label);
    }
    out.push('\n');

    for (i, label) in chart.labels.iter().enumerate() {
        let _ = write!(out, "  {label:<12}");
        for dataset in &chart.datasets {
            match dataset.values.get(i) {
                Some(value) => {
                    let _ = write!(out, " {value:>24.1}");
                }
                None => {
                    let _ = write!(out, " {:>24}", "-");
                }
            }
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
