//! Text charts for terminal output

use crate::analysis::ColumnStats;

const LABEL_WIDTH: usize = 8;

/// Character grid with a labelled value axis.
///
/// X positions are data indices spread evenly across the width; several
/// indices may share a column when there are more points than columns.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    points: usize,
    min: f64,
    max: f64,
    cells: Vec<Vec<char>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, points: usize, min: f64, max: f64) -> Self {
        let width = width.min(points).max(1);
        let height = height.max(2);
        let (min, max) = if (max - min).abs() < 1e-10 {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };

        Self {
            width,
            height,
            points,
            min,
            max,
            cells: vec![vec![' '; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn column(&self, index: usize) -> usize {
        if self.points <= 1 {
            0
        } else {
            (index * (self.width - 1) / (self.points - 1)).min(self.width - 1)
        }
    }

    fn row(&self, value: f64) -> usize {
        let ratio = (self.max - value) / (self.max - self.min);
        let row = (ratio * (self.height - 1) as f64).round().max(0.0) as usize;
        row.min(self.height - 1)
    }

    /// Shade the vertical span between each `(lower, upper)` pair
    pub fn fill_band(&mut self, bands: &[Option<(f64, f64)>], ch: char) {
        for (i, band) in bands.iter().enumerate() {
            let Some((lower, upper)) = band else { continue };
            if !lower.is_finite() || !upper.is_finite() {
                continue;
            }
            let col = self.column(i);
            for row in self.row(*upper)..=self.row(*lower) {
                self.cells[row][col] = ch;
            }
        }
    }

    /// Plot one series; `None` and non-finite values leave gaps
    pub fn plot(&mut self, values: &[Option<f64>], ch: char) {
        for (i, value) in values.iter().enumerate() {
            if let Some(v) = value {
                self.mark(i, *v, ch);
            }
        }
    }

    pub fn mark(&mut self, index: usize, value: f64, ch: char) {
        if value.is_finite() {
            let (row, col) = (self.row(value), self.column(index));
            self.cells[row][col] = ch;
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let mid = (self.height - 1) / 2;
        let step = (self.max - self.min) / (self.height - 1) as f64;

        for (r, row) in self.cells.iter().enumerate() {
            if r == 0 || r == mid || r == self.height - 1 {
                let value = self.max - r as f64 * step;
                out.push_str(&format!("{:>width$.2} ┤", value, width = LABEL_WIDTH));
            } else {
                out.push_str(&format!("{:>width$} │", "", width = LABEL_WIDTH));
            }
            out.push_str(row.iter().collect::<String>().trim_end());
            out.push('\n');
        }
        out.push_str(&format!(
            "{:>width$} └{}\n",
            "",
            "─".repeat(self.width),
            width = LABEL_WIDTH
        ));
        out
    }
}

/// Min and max over the finite values
pub fn value_bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Single-series line chart, `None` when there is nothing finite to draw
pub fn line_chart(values: &[f64], width: usize, height: usize) -> Option<String> {
    let (min, max) = value_bounds(values.iter().copied())?;
    let mut canvas = Canvas::new(width, height, values.len(), min, max);
    let series: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    canvas.plot(&series, '*');
    Some(canvas.render())
}

/// First and last label under a chart of the given width
pub fn x_axis(first: &str, last: &str, width: usize) -> String {
    let pad = width.saturating_sub(first.len() + last.len()).max(1);
    format!(
        "{:>label$}  {}{}{}",
        "",
        first,
        " ".repeat(pad),
        last,
        label = LABEL_WIDTH
    )
}

/// Horizontal bars with one-decimal percentages (shares in [0, 1])
pub fn proportion_chart(shares: &[(&str, f64)], width: usize) -> String {
    let label_width = shares.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();

    for (label, share) in shares {
        let bar_len = (share.clamp(0.0, 1.0) * width as f64).round() as usize;
        out.push_str(&format!(
            "{:>lw$} | {:<bw$} {:>5.1}%\n",
            label,
            "█".repeat(bar_len),
            share * 100.0,
            lw = label_width,
            bw = width
        ));
    }
    out
}

/// `describe()`-style table: one column per numeric column
pub fn describe_table(columns: &[ColumnStats]) -> String {
    let widths: Vec<usize> = columns.iter().map(|c| c.name.len().max(12)).collect();
    let mut out = format!("{:<6}", "");
    for (column, width) in columns.iter().zip(&widths) {
        out.push_str(&format!(" {:>w$}", column.name, w = width));
    }
    out.push('\n');

    let rows: [(&str, fn(&ColumnStats) -> f64); 8] = [
        ("count", |c| c.count as f64),
        ("mean", |c| c.mean),
        ("std", |c| c.std),
        ("min", |c| c.min),
        ("25%", |c| c.q25),
        ("50%", |c| c.median),
        ("75%", |c| c.q75),
        ("max", |c| c.max),
    ];

    for (label, value) in rows {
        out.push_str(&format!("{:<6}", label));
        for (column, width) in columns.iter().zip(&widths) {
            out.push_str(&format!(" {:>w$.6}", value(column), w = width));
        }
        out.push('\n');
    }
    out
}
