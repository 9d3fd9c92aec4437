//! Interactive menu
//!
//! The loop is a small state machine: each line of input becomes a
//! [`Command`], each command maps to one handler, and [`Command::Exit`] (or
//! end of input) moves the session to [`MenuState::Finished`].

use std::fmt;
use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::{error, info};

use crate::analysis::{condition_counts, summarize, weekly_average, RollingDetector};
use crate::chart::Renderer;
use crate::data::WeatherTable;
use crate::error::Result;

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Analyze,
    Visualize,
    WeeklyTrends,
    RollingOutliers,
    Exit,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Analyze,
        Command::Visualize,
        Command::WeeklyTrends,
        Command::RollingOutliers,
        Command::Exit,
    ];

    /// Parse a menu choice ("1" to "5", surrounding whitespace ignored)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Command::Analyze),
            "2" => Some(Command::Visualize),
            "3" => Some(Command::WeeklyTrends),
            "4" => Some(Command::RollingOutliers),
            "5" => Some(Command::Exit),
            _ => None,
        }
    }

    pub fn key(&self) -> u8 {
        match self {
            Command::Analyze => 1,
            Command::Visualize => 2,
            Command::WeeklyTrends => 3,
            Command::RollingOutliers => 4,
            Command::Exit => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Analyze => "Analyze Data",
            Command::Visualize => "Visualize Data",
            Command::WeeklyTrends => "Weekly Average Trends",
            Command::RollingOutliers => "Temperature Rolling Stats and Outliers",
            Command::Exit => "Exit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.key(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Running,
    Finished,
}

/// One interactive session over a loaded table
pub struct Session<R: Renderer> {
    table: WeatherTable,
    detector: RollingDetector,
    renderer: R,
    state: MenuState,
}

impl<R: Renderer> Session<R> {
    pub fn new(table: WeatherTable, renderer: R) -> Self {
        Self {
            table,
            detector: RollingDetector::default(),
            renderer,
            state: MenuState::Running,
        }
    }

    pub fn with_detector(mut self, detector: RollingDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn table(&self) -> &WeatherTable {
        &self.table
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Run the handler for `command`.
    ///
    /// A failing handler leaves the table as it was.
    pub fn dispatch(&mut self, command: Command) -> Result<MenuState> {
        info!(?command, "Menu command");
        match command {
            Command::Analyze => self.analyze()?,
            Command::Visualize => self.visualize()?,
            Command::WeeklyTrends => self.weekly_trends()?,
            Command::RollingOutliers => self.rolling_outliers()?,
            Command::Exit => self.state = MenuState::Finished,
        }
        Ok(self.state)
    }

    fn analyze(&mut self) -> Result<()> {
        let summary = summarize(&self.table);
        self.renderer.summary(&summary)
    }

    fn visualize(&mut self) -> Result<()> {
        self.renderer.trends(&self.table)?;
        self.renderer.conditions(&condition_counts(&self.table))
    }

    fn weekly_trends(&mut self) -> Result<()> {
        if self.table.weeks().is_none() {
            self.table = std::mem::take(&mut self.table).with_iso_weeks();
        }
        let weekly = weekly_average(&self.table);
        self.renderer.weekly(&weekly)
    }

    fn rolling_outliers(&mut self) -> Result<()> {
        let columns = self.detector.compute(&self.table)?;
        self.table = self.table.clone().with_rolling(columns)?;
        self.renderer.rolling(&self.table)
    }

    /// Handle one line of input.
    ///
    /// Invalid choices and failing commands are reported on `out` and the
    /// session keeps running; only write errors on `out` propagate.
    pub fn handle_input<W: Write>(&mut self, input: &str, out: &mut W) -> Result<MenuState> {
        let Some(command) = Command::parse(input) else {
            writeln!(out, "{}", "Invalid choice. Please try again.".yellow())?;
            return Ok(self.state);
        };

        if let Err(e) = self.dispatch(command) {
            error!(?command, error = %e, "Command failed");
            writeln!(out, "{} {}", "Error:".red().bold(), e)?;
        }
        Ok(self.state)
    }

    /// Prompt and dispatch until exit or end of input
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> Result<()> {
        let mut lines = input.lines();

        while self.state == MenuState::Running {
            print_menu(out)?;
            match lines.next() {
                Some(line) => {
                    self.handle_input(&line?, out)?;
                }
                None => self.state = MenuState::Finished,
            }
        }

        writeln!(
            out,
            "\n{}",
            "Thank you for using the Weather Data Analysis Tool!".green()
        )?;
        Ok(())
    }
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", "--- Options ---".cyan().bold())?;
    for command in Command::ALL {
        writeln!(out, "{command}")?;
    }
    write!(out, "Enter your choice: ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use crate::analysis::{ConditionCount, Summary, WeeklyAverage};
    use crate::data::{parse_timestamp, Record};
    use crate::error::Error;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<&'static str>,
        fail: bool,
        outliers: usize,
        weeks: Vec<u32>,
    }

    impl RecordingRenderer {
        fn check(&mut self, call: &'static str) -> Result<()> {
            self.calls.push(call);
            if self.fail {
                Err(Error::Render(format!("{call} unavailable")))
            } else {
                Ok(())
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn summary(&mut self, _summary: &Summary) -> Result<()> {
            self.check("summary")
        }

        fn trends(&mut self, _table: &WeatherTable) -> Result<()> {
            self.check("trends")
        }

        fn conditions(&mut self, _counts: &[ConditionCount]) -> Result<()> {
            self.check("conditions")
        }

        fn rolling(&mut self, table: &WeatherTable) -> Result<()> {
            self.outliers = table.outliers().len();
            self.check("rolling")
        }

        fn weekly(&mut self, weekly: &BTreeMap<u32, WeeklyAverage>) -> Result<()> {
            self.weeks = weekly.keys().copied().collect();
            self.check("weekly")
        }
    }

    fn record(ts: &str, temperature: f64) -> Record {
        Record::new(parse_timestamp(ts).unwrap(), temperature, 50.0, "clear sky")
    }

    fn scenario_table() -> WeatherTable {
        vec![
            record("2024-01-01 00:00:00", 20.0),
            record("2024-01-01 03:00:00", 22.0),
            record("2024-01-08 00:00:00", 21.0),
            record("2024-01-08 03:00:00", 40.0),
        ]
        .into_iter()
        .collect()
    }

    fn session(renderer: RecordingRenderer) -> Session<RecordingRenderer> {
        Session::new(scenario_table(), renderer)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("1"), Some(Command::Analyze));
        assert_eq!(Command::parse(" 4\n"), Some(Command::RollingOutliers));
        assert_eq!(Command::parse("5"), Some(Command::Exit));
        assert_eq!(Command::parse("6"), None);
        assert_eq!(Command::parse("exit"), None);
        assert_eq!(Command::parse(""), None);

        for command in Command::ALL {
            assert_eq!(Command::parse(&command.key().to_string()), Some(command));
        }
        assert_eq!(Command::Visualize.to_string(), "2. Visualize Data");
        assert_eq!(
            Command::RollingOutliers.to_string(),
            "4. Temperature Rolling Stats and Outliers"
        );
    }

    #[test]
    fn test_dispatch_handlers() {
        let mut session = session(RecordingRenderer::default());

        assert_eq!(session.dispatch(Command::Analyze).unwrap(), MenuState::Running);
        assert_eq!(session.dispatch(Command::Visualize).unwrap(), MenuState::Running);
        assert_eq!(
            session.renderer().calls,
            vec!["summary", "trends", "conditions"]
        );

        assert_eq!(session.dispatch(Command::Exit).unwrap(), MenuState::Finished);
        assert_eq!(session.state(), MenuState::Finished);
    }

    #[test]
    fn test_weekly_attaches_weeks() {
        let mut session = session(RecordingRenderer::default());
        session.dispatch(Command::WeeklyTrends).unwrap();

        assert_eq!(session.table().weeks(), Some(&[1, 1, 2, 2][..]));
        assert_eq!(session.renderer().weeks, vec![1, 2]);
    }

    #[test]
    fn test_rolling_attaches_columns() {
        let mut session = session(RecordingRenderer::default());
        session.dispatch(Command::RollingOutliers).unwrap();

        let rolling = session.table().rolling().unwrap();
        assert_eq!(rolling.len(), 4);
        assert_eq!(rolling.window, 3);
        assert_eq!(session.renderer().outliers, 0);
    }

    #[test]
    fn test_rolling_failure_keeps_table() {
        let mut table = scenario_table().into_records();
        table[1].temperature = f64::NAN;
        let table: WeatherTable = table.into_iter().collect();

        let mut session = Session::new(table.clone(), RecordingRenderer::default());
        let result = session.dispatch(Command::RollingOutliers);

        assert!(matches!(
            result,
            Err(Error::Data {
                row: 1,
                column: "temperature"
            })
        ));
        assert!(session.table().rolling().is_none());
        assert!(session.table().weeks().is_none());
        assert_eq!(session.table().len(), 4);

        let bits = |t: &WeatherTable| -> Vec<u64> {
            t.temperatures().iter().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(session.table()), bits(&table));
        assert!(session.renderer().calls.is_empty());
    }

    #[test]
    fn test_handle_input_reports_and_continues() {
        let mut session = session(RecordingRenderer {
            fail: true,
            ..Default::default()
        });
        let mut out = Vec::new();

        assert_eq!(session.handle_input("9", &mut out).unwrap(), MenuState::Running);
        assert_eq!(session.handle_input("1", &mut out).unwrap(), MenuState::Running);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Invalid choice. Please try again."));
        assert!(text.contains("summary unavailable"));
    }

    #[test]
    fn test_run_until_exit() {
        let mut session = session(RecordingRenderer::default());
        let mut out = Vec::new();

        session
            .run(Cursor::new("abc\n1\n5\n3\n"), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(session.state(), MenuState::Finished);
        // input after exit is never read
        assert_eq!(session.renderer().calls, vec!["summary"]);
        assert_eq!(text.matches("Enter your choice: ").count(), 3);
        assert_eq!(text.matches("--- Options ---").count(), 3);
        assert!(text.contains("3. Weekly Average Trends"));
        assert!(text.contains("Invalid choice. Please try again."));
        assert!(text.contains("Thank you for using the Weather Data Analysis Tool!"));
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let mut session = session(RecordingRenderer::default());
        let mut out = Vec::new();

        session.run(Cursor::new("2\n"), &mut out).unwrap();

        assert_eq!(session.state(), MenuState::Finished);
        assert_eq!(session.into_renderer().calls, vec!["trends", "conditions"]);
    }
}
