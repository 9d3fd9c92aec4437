//! Renderer writing text charts to a terminal

use std::collections::BTreeMap;
use std::io::{self, Stdout, Write};

use colored::Colorize;
use tracing::debug;

use super::ascii::{describe_table, line_chart, proportion_chart, value_bounds, x_axis, Canvas};
use super::Renderer;
use crate::analysis::{ConditionCount, Summary, WeeklyAverage};
use crate::data::WeatherTable;
use crate::error::{Error, Result};

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 12;
const BAR_WIDTH: usize = 40;

/// Text renderer over any writer
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }

    /// Chart area size in characters
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(1);
        self.height = height.max(2);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out, "\n{}", title.bold())?;
        writeln!(self.out, "{}", "=".repeat(title.chars().count()))?;
        Ok(())
    }

    fn series(&mut self, title: &str, table: &WeatherTable, values: &[f64]) -> Result<()> {
        let chart = line_chart(values, self.width, self.height)
            .ok_or_else(|| Error::Render(format!("{title}: no values to plot")))?;

        self.heading(title)?;
        write!(self.out, "{chart}")?;
        if let (Some(first), Some(last)) = (table.records().first(), table.records().last()) {
            let width = self.width.min(values.len());
            writeln!(self.out, "{}", x_axis(&first.date_label(), &last.date_label(), width))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn summary(&mut self, summary: &Summary) -> Result<()> {
        self.heading("Summary Statistics")?;
        write!(self.out, "{}", describe_table(&summary.columns))?;

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Average Temperature: {:.2}°C",
            summary.mean_temperature
        )?;
        writeln!(self.out, "Average Humidity: {:.2}%", summary.mean_humidity)?;

        writeln!(self.out, "\nWeather Conditions:")?;
        for entry in &summary.condition_counts {
            writeln!(self.out, "  {:<24} {}", entry.condition, entry.count)?;
        }
        Ok(())
    }

    fn trends(&mut self, table: &WeatherTable) -> Result<()> {
        if table.is_empty() {
            return Err(Error::Render("table is empty".to_string()));
        }
        self.series("Temperature Trend (°C)", table, &table.temperatures())?;
        self.series("Humidity Trend (%)", table, &table.humidities())
    }

    fn conditions(&mut self, counts: &[ConditionCount]) -> Result<()> {
        let total: usize = counts.iter().map(|c| c.count).sum();
        if total == 0 {
            return Err(Error::Render("no weather conditions to plot".to_string()));
        }

        let shares: Vec<(&str, f64)> = counts
            .iter()
            .map(|c| (c.condition.as_str(), c.count as f64 / total as f64))
            .collect();

        self.heading("Weather Conditions Distribution")?;
        write!(self.out, "{}", proportion_chart(&shares, BAR_WIDTH))?;
        Ok(())
    }

    fn rolling(&mut self, table: &WeatherTable) -> Result<()> {
        let columns = table
            .rolling()
            .ok_or_else(|| Error::Render("rolling statistics have not been computed".to_string()))?;

        let temperatures = table.temperatures();
        let k = columns.threshold;
        let bands: Vec<Option<(f64, f64)>> = columns.rows.iter().map(|r| r.band(k)).collect();

        let bounds = value_bounds(
            temperatures
                .iter()
                .copied()
                .chain(bands.iter().flatten().flat_map(|&(lo, hi)| [lo, hi])),
        )
        .ok_or_else(|| Error::Render("no temperatures to plot".to_string()))?;

        let mut canvas = Canvas::new(self.width, self.height, table.len(), bounds.0, bounds.1);
        canvas.fill_band(&bands, '░');
        canvas.plot(&columns.means(), '-');
        let series: Vec<Option<f64>> = temperatures.iter().copied().map(Some).collect();
        canvas.plot(&series, '*');
        for i in columns.outlier_indices() {
            canvas.mark(i, temperatures[i], 'X');
        }

        debug!(
            window = columns.window,
            outliers = columns.outlier_count(),
            "Rendering rolling view"
        );

        self.heading(&format!(
            "Temperature with Rolling Mean (window {})",
            columns.window
        ))?;
        write!(self.out, "{}", canvas.render())?;
        writeln!(
            self.out,
            "{:>8}  * temperature   - rolling mean   ░ ±{}σ band   X outlier",
            "", k
        )?;

        let outliers = table.outliers();
        if outliers.is_empty() {
            writeln!(self.out, "\nNo unusual temperatures detected.")?;
        } else {
            writeln!(
                self.out,
                "\n{}",
                "Unusually High or Low Temperatures Detected:".yellow().bold()
            )?;
            for record in outliers {
                writeln!(
                    self.out,
                    "  {}  {:>7.2}°C",
                    record.date_label(),
                    record.temperature
                )?;
            }
        }
        Ok(())
    }

    fn weekly(&mut self, weekly: &BTreeMap<u32, WeeklyAverage>) -> Result<()> {
        let temperatures: Vec<Option<f64>> =
            weekly.values().map(|w| Some(w.temperature)).collect();
        let humidities: Vec<Option<f64>> = weekly.values().map(|w| Some(w.humidity)).collect();

        let (min, max) = value_bounds(temperatures.iter().chain(&humidities).flatten().copied())
            .ok_or_else(|| Error::Render("no weekly averages to plot".to_string()))?;

        let mut canvas = Canvas::new(self.width, self.height, weekly.len(), min, max);
        canvas.plot(&humidities, 'o');
        canvas.plot(&temperatures, '*');

        self.heading("Weekly Average Trends")?;
        write!(self.out, "{}", canvas.render())?;
        if let (Some(first), Some(last)) = (weekly.keys().next(), weekly.keys().last()) {
            let width = self.width.min(weekly.len());
            writeln!(
                self.out,
                "{}",
                x_axis(&format!("W{first}"), &format!("W{last}"), width)
            )?;
        }

        writeln!(
            self.out,
            "{:>8}  * temperature (°C)   o humidity (%)",
            ""
        )?;

        writeln!(self.out)?;
        for (week, avg) in weekly {
            writeln!(
                self.out,
                "  Week {:>2}: {:>6.2}°C  {:>6.2}%  ({} samples)",
                week, avg.temperature, avg.humidity, avg.samples
            )?;
        }
        Ok(())
    }
}
