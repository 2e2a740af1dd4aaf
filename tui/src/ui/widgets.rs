use ratatui::{
    layout::{Alignment, Constraint},
    style::Modifier,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
};
use regression::{
    format_prediction, FitStats, LinearModel, PerformancePlot, PlotKind, PredictedTable,
};

use crate::state::model::LogLine;

use super::theme::Theme;

const IDEAL_SAMPLES: usize = 90;
const DASH: usize = 3;
const PREDICTION_WIDTH: usize = 8;

fn panel<'a>(title: &'a str, focused: bool) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(title)
        .title_style(Theme::title())
}

pub fn header<'a>(samples: usize) -> Paragraph<'a> {
    let line = Line::from(vec![
        Span::styled("MPG Predictor", Theme::title().add_modifier(Modifier::BOLD)),
        Span::styled("  |  ", Theme::muted()),
        Span::styled(
            format!("linear regression of mpg on hp, wt, disp ({samples} reference cars)"),
            Theme::dim(),
        ),
    ]);

    Paragraph::new(line).block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
}

/// Coefficients and in-sample fit statistics.
pub fn model_panel<'a>(model: &LinearModel, stats: &FitStats) -> Paragraph<'a> {
    let [hp, wt, disp] = model.weights();
    let row = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), Theme::dim()),
            Span::styled(value, Theme::text()),
        ])
    };

    let lines = vec![
        row("intercept", format!("{:.4}", model.intercept())),
        row("hp", format!("{hp:.6}")),
        row("wt", format!("{wt:.6}")),
        row("disp", format!("{disp:.6}")),
        row(
            "fit",
            format!(
                "n={}  mse={:.3}  var={:.3}  R²={:.4}",
                stats.samples(),
                stats.mse(),
                stats.target_variance(),
                stats.r_squared()
            ),
        ),
    ];

    Paragraph::new(lines)
        .block(panel(" Model ", false))
        .wrap(Wrap { trim: true })
}

/// The uploaded rows with their predictions, starting at row `offset`.
///
/// Columns before `first_column` are scrolled out of view, except the
/// prediction column. Predictions are shown rounded; the table keeps the full
/// values for export.
pub fn batch_table<'a>(
    table: &'a PredictedTable,
    offset: usize,
    first_column: usize,
    focused: bool,
) -> Table<'a> {
    let predicted = table.prediction_column();
    let visible = (0..table.headers().len())
        .filter(|&i| i >= first_column || i == predicted)
        .collect::<Vec<_>>();

    let header = Row::new(
        visible
            .iter()
            .map(|&i| {
                let style = if i == predicted {
                    Theme::result()
                } else {
                    Theme::title()
                };
                Cell::from(table.headers()[i].as_str()).style(style)
            })
            .collect::<Vec<_>>(),
    );

    let rows = table
        .records()
        .iter()
        .zip(table.predictions())
        .skip(offset)
        .map(|(record, &value)| {
            Row::new(
                visible
                    .iter()
                    .map(|&i| {
                        if i == predicted {
                            Cell::from(format_prediction(value)).style(Theme::result())
                        } else {
                            Cell::from(record[i].as_str()).style(Theme::text())
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        });

    let widths = visible
        .iter()
        .map(|&i| {
            let header = table.headers()[i].chars().count();
            if i == predicted {
                Constraint::Min(header.max(PREDICTION_WIDTH) as u16)
            } else {
                Constraint::Length(header.clamp(6, 14) as u16)
            }
        })
        .collect::<Vec<_>>();

    let title = format!(
        " Batch Predictions (rows {}-{} of {}) ",
        (offset + 1).min(table.len()),
        table.len(),
        table.len()
    );

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(title)
                .title_style(Theme::title()),
        )
}

/// Placeholder shown in the table area when nothing is loaded.
pub fn empty_table<'a>(focused: bool) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled("No predictions yet.", Theme::dim())),
        Line::from(Span::styled(
            "Upload a CSV with hp, wt and disp columns.",
            Theme::muted(),
        )),
    ])
    .block(panel(" Batch Predictions ", focused))
    .wrap(Wrap { trim: true })
}

/// The most recent log lines that fit in `height` rows.
pub fn logs<'a>(logs: &'a [LogLine], height: u16) -> Paragraph<'a> {
    let visible = usize::from(height.saturating_sub(2));
    let tail = logs.iter().skip(logs.len().saturating_sub(visible));

    let lines = tail
        .map(|l| {
            Line::from(vec![
                Span::styled(format!("[{}] ", l.level), Theme::level(l.level)),
                Span::styled(l.message.as_str(), Theme::text()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines).block(panel(" Events ", false))
}

/// Points of the dashed `y = x` line, or nothing for a line plot.
pub fn ideal_line(plot: &PerformancePlot) -> Vec<(f64, f64)> {
    let PlotKind::Scatter { identity, .. } = plot.kind() else {
        return Vec::new();
    };
    let [(lo, _), (hi, _)] = *identity;
    let step = (hi - lo) / (IDEAL_SAMPLES - 1) as f64;

    (0..IDEAL_SAMPLES)
        .filter(|i| (i / DASH) % 2 == 0)
        .map(|i| {
            let v = lo + step * i as f64;
            (v, v)
        })
        .collect()
}

/// The "Model Performance" chart.
///
/// `ideal` must come from [`ideal_line`] for the same plot.
pub fn chart<'a>(plot: &'a PerformancePlot, ideal: &'a [(f64, f64)]) -> Chart<'a> {
    let datasets = match plot.kind() {
        PlotKind::Scatter { points, .. } => vec![
            Dataset::default()
                .name(plot.series_label())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Theme::series())
                .data(points),
            Dataset::default()
                .name("Ideal")
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Theme::ideal())
                .data(ideal),
        ],
        PlotKind::Line { points } => vec![Dataset::default()
            .name(plot.series_label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::series())
            .data(points)],
    };

    let x_bounds = plot.x_bounds();
    let y_bounds = plot.y_bounds();
    let x_decimals = if plot.is_scatter() { 1 } else { 0 };

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(format!(" {} ", plot.title()))
                .title_style(Theme::title()),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(plot.x_label(), Theme::dim()))
                .style(Theme::muted())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, x_decimals)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(plot.y_label(), Theme::dim()))
                .style(Theme::muted())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, 1)),
        )
}

fn axis_labels<'a>([lo, hi]: [f64; 2], decimals: usize) -> Vec<Span<'a>> {
    [lo, (lo + hi) / 2.0, hi]
        .iter()
        .map(|v| Span::styled(format!("{v:.decimals$}"), Theme::dim()))
        .collect()
}

/// A bordered list with the `selected` entry marked.
pub fn menu<'a>(title: &'a str, items: &[&'a str], selected: usize) -> Paragraph<'a> {
    let lines = items
        .iter()
        .enumerate()
        .flat_map(|(i, label)| {
            let (marker, style) = if i == selected {
                ("▶ ", Theme::focused())
            } else {
                ("  ", Theme::dim())
            };
            [
                Line::from(vec![Span::styled(marker, style), Span::styled(*label, style)]),
                Line::from(""),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines).block(panel(title, false).title_alignment(Alignment::Center))
}

/// One line of `[key] action` pairs.
pub fn hints<'a>(hints: &[(&'a str, &'a str)]) -> Paragraph<'a> {
    let spans = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!("[{key}] "), Theme::accent_cyan()),
                Span::styled(format!("{action}   "), Theme::dim()),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

pub fn error_bar<'a>(msg: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(" ✖ ", Theme::error()),
        Span::styled(msg, Theme::error()),
    ]))
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};
    use regression::{predict_csv, predict_file, Features, Predictor};

    use super::*;

    const MTCARS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/mtcars.csv");

    struct Echo;

    impl Predictor for Echo {
        fn predict_one(&self, f: &Features) -> f64 {
            f.hp
        }
    }

    #[test]
    fn ideal_line_is_dashed_between_extremes() {
        let table =
            predict_csv(&Echo, "hp,wt,disp,mpg\n10,1,1,10\n30,1,1,30\n".as_bytes()).unwrap();
        let plot = PerformancePlot::from_upload(&table);

        let ideal = ideal_line(&plot);

        assert_eq!(ideal.first(), Some(&(10.0, 10.0)));
        assert!(ideal.iter().all(|&(x, y)| x == y && (10.0..=30.0).contains(&x)));
        assert!(ideal.len() < IDEAL_SAMPLES);
    }

    #[test]
    fn line_plot_has_no_ideal_line() {
        let table = predict_csv(&Echo, "hp,wt,disp\n10,1,1\n".as_bytes()).unwrap();
        let plot = PerformancePlot::from_upload(&table);
        assert!(ideal_line(&plot).is_empty());
    }

    struct Constant(f64);

    impl Predictor for Constant {
        fn predict_one(&self, _: &Features) -> f64 {
            self.0
        }
    }

    fn render(table: &PredictedTable, first_column: usize) -> String {
        let mut terminal = Terminal::new(TestBackend::new(72, 12)).unwrap();
        terminal
            .draw(|f| f.render_widget(batch_table(table, 0, first_column, false), f.size()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn wide_table_keeps_the_prediction_readable() {
        let table = predict_file(&Constant(21.123456789), MTCARS).unwrap();
        assert_eq!(table.headers().len(), 13);

        let text = render(&table, 0);

        assert!(text.contains("Predicted MPG"));
        assert!(text.contains("21.12"));
        assert!(!text.contains("21.123"));
        assert!(table.records()[0][12].starts_with("21.123456789"));
    }

    #[test]
    fn scrolled_columns_keep_the_prediction() {
        let table = predict_file(&Constant(9.5), MTCARS).unwrap();

        let text = render(&table, 11);

        assert!(!text.contains("Mazda"));
        assert!(text.contains("carb"));
        assert!(text.contains("Predicted MPG"));
        assert!(text.contains("9.50"));
    }

    #[test]
    fn menu_marks_the_selected_entry() {
        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal
            .draw(|f| f.render_widget(menu(" MENU ", &["Open", "Quit"], 1), f.size()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row = |y: u16| {
            (0..buffer.area.width)
                .map(|x| buffer.get(x, y).symbol())
                .collect::<String>()
        };

        assert!(row(1).contains("  Open"));
        assert!(row(3).contains("▶ Quit"));
    }

    #[test]
    fn axis_labels_span_bounds() {
        let labels = axis_labels([0.0, 10.0], 1);
        let text: Vec<_> = labels.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, ["0.0", "5.0", "10.0"]);
    }
}
