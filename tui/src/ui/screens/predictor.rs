use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use regression::{format_prediction, InputField, ManualInput};

use crate::state::{model::BatchStatus, session::PredictorSession};
use crate::ui::{layout, theme::Theme, widgets};

use super::{menu::MenuState, Action, Screen};

const LABEL_WIDTH: usize = 36;
const PAGE: usize = 10;

/// The widget receiving keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(InputField),
    Predict,
    Upload,
    Table,
    Download,
}

const FOCUS_ORDER: [Focus; 7] = [
    Focus::Field(InputField::Hp),
    Focus::Field(InputField::Wt),
    Focus::Field(InputField::Disp),
    Focus::Predict,
    Focus::Upload,
    Focus::Table,
    Focus::Download,
];

pub struct PredictorState {
    focus: Focus,
    /// Text being edited for each form field, committed on leave.
    buffers: [String; 3],
    upload_path: String,
    table_offset: usize,
    /// First visible table column; the prediction column always stays.
    table_column: usize,
    pub error: Option<String>,
}

impl PredictorState {
    pub fn new(input: &ManualInput) -> Self {
        let mut state = Self {
            focus: FOCUS_ORDER[0],
            buffers: Default::default(),
            upload_path: String::new(),
            table_offset: 0,
            table_column: 0,
            error: None,
        };
        state.sync(input);
        state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn buffer(&self, field: InputField) -> &str {
        &self.buffers[slot(field)]
    }

    fn buffer_mut(&mut self, field: InputField) -> &mut String {
        &mut self.buffers[slot(field)]
    }

    /// Refreshes every buffer from the committed form values.
    fn sync(&mut self, input: &ManualInput) {
        for field in InputField::ALL {
            *self.buffer_mut(field) = input.display_value(field);
        }
    }

    /// Commits the focused field's buffer, restoring it on rejection.
    fn commit(&mut self, session: &mut PredictorSession) {
        let Focus::Field(field) = self.focus else {
            return;
        };

        if let Err(e) = session.set_field(field, self.buffer(field)) {
            log::debug!("rejected {} input: {e}", field.column());
            self.error = Some(e.to_string());
        }
        *self.buffer_mut(field) = session.input().display_value(field);
    }

    fn cycle(&mut self, forward: bool) {
        let pos = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or_default();
        let len = FOCUS_ORDER.len();
        let next = if forward { pos + 1 } else { pos + len - 1 };
        self.focus = FOCUS_ORDER[next % len];
    }
}

fn slot(field: InputField) -> usize {
    match field {
        InputField::Hp => 0,
        InputField::Wt => 1,
        InputField::Disp => 2,
    }
}

pub fn handle_key(
    state: &mut PredictorState,
    key: KeyCode,
    session: &mut PredictorSession,
) -> Action {
    state.error = None;

    match key {
        KeyCode::Esc => {
            state.commit(session);
            return Action::Transition(Screen::Menu(MenuState::new()));
        }
        KeyCode::Tab => {
            state.commit(session);
            state.cycle(true);
            return Action::None;
        }
        KeyCode::BackTab => {
            state.commit(session);
            state.cycle(false);
            return Action::None;
        }
        _ => {}
    }

    match state.focus {
        Focus::Field(field) => handle_field(state, field, key, session),
        Focus::Predict => match key {
            KeyCode::Enter => {
                session.predict_manual();
            }
            KeyCode::Char('r') => {
                session.reset_form();
                state.sync(session.input());
            }
            _ => {}
        },
        Focus::Upload => match key {
            KeyCode::Char(c) => state.upload_path.push(c),
            KeyCode::Backspace => {
                state.upload_path.pop();
            }
            KeyCode::Enter => {
                let path = state.upload_path.trim();
                if path.is_empty() {
                    state.error = Some("enter the path of a CSV file to upload".into());
                } else {
                    session.upload(path);
                    state.table_offset = 0;
                    state.table_column = 0;
                }
            }
            _ => {}
        },
        Focus::Table => {
            let table = session.batch().table();
            let rows = table.map_or(0, |t| t.len());
            let columns = table.map_or(0, |t| t.headers().len());
            let last = rows.saturating_sub(1);
            state.table_column = match key {
                KeyCode::Left => state.table_column.saturating_sub(1),
                KeyCode::Right => (state.table_column + 1).min(columns.saturating_sub(1)),
                _ => state.table_column,
            };
            state.table_offset = match key {
                KeyCode::Up => state.table_offset.saturating_sub(1),
                KeyCode::Down => (state.table_offset + 1).min(last),
                KeyCode::PageUp => state.table_offset.saturating_sub(PAGE),
                KeyCode::PageDown => (state.table_offset + PAGE).min(last),
                KeyCode::Home => 0,
                KeyCode::End => last,
                _ => state.table_offset,
            };
        }
        Focus::Download => {
            if key == KeyCode::Enter {
                if let Err(e) = session.export() {
                    state.error = Some(e);
                }
            }
        }
    }

    Action::None
}

fn handle_field(
    state: &mut PredictorState,
    field: InputField,
    key: KeyCode,
    session: &mut PredictorSession,
) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
            state.buffer_mut(field).push(c);
        }
        KeyCode::Backspace => {
            state.buffer_mut(field).pop();
        }
        KeyCode::Enter => state.commit(session),
        KeyCode::Up | KeyCode::Down => {
            state.commit(session);
            if state.error.is_none() {
                session.step_field(field, if key == KeyCode::Up { 1 } else { -1 });
                *state.buffer_mut(field) = session.input().display_value(field);
            }
        }
        _ => {}
    }
}

pub fn draw(f: &mut Frame, state: &PredictorState, session: &PredictorSession) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let areas = layout::predictor(area);

    f.render_widget(widgets::header(session.stats().samples()), areas.header);
    draw_form(f, areas.form, state, session);
    f.render_widget(
        widgets::model_panel(session.model(), session.stats()),
        areas.model,
    );
    draw_upload(f, areas.upload, state, session);
    draw_download(f, areas.download, state, session);
    f.render_widget(widgets::logs(session.logs(), areas.logs.height), areas.logs);

    let plot = session.plot();
    let ideal = widgets::ideal_line(&plot);
    f.render_widget(widgets::chart(&plot, &ideal), areas.chart);

    let table_focused = state.focus == Focus::Table;
    match session.batch().table() {
        Some(table) => f.render_widget(
            widgets::batch_table(
                table,
                state.table_offset,
                state.table_column,
                table_focused,
            ),
            areas.table,
        ),
        None => f.render_widget(widgets::empty_table(table_focused), areas.table),
    }

    if let Some(msg) = &state.error {
        f.render_widget(widgets::error_bar(msg), areas.error);
    }
    f.render_widget(widgets::hints(hints_for(state.focus())), areas.hints);
}

fn draw_form(f: &mut Frame, area: Rect, state: &PredictorState, session: &PredictorSession) {
    let input = session.input();
    let mut lines = Vec::new();

    for field in InputField::ALL {
        let bounds = input.bounds().get(field);
        let value_style = if state.focus == Focus::Field(field) {
            Theme::focused()
        } else {
            Theme::text()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), Theme::dim()),
            Span::styled(format!(" {:>8} ", state.buffer(field)), value_style),
            Span::styled(
                format!(
                    "  [{:.*}, {:.*}]",
                    field.decimals(),
                    bounds.min(),
                    field.decimals(),
                    bounds.max()
                ),
                Theme::muted(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[ Predict MPG ]",
        if state.focus == Focus::Predict {
            Theme::focused()
        } else {
            Theme::accent_cyan()
        },
    )));
    lines.push(Line::from(""));
    lines.push(match session.result() {
        Some(value) => Line::from(vec![
            Span::styled("Predicted MPG: ", Theme::text()),
            Span::styled(format_prediction(value), Theme::result()),
        ]),
        None => Line::from(Span::styled(
            "press enter on Predict MPG to estimate",
            Theme::muted(),
        )),
    });

    let focused = matches!(state.focus, Focus::Field(_) | Focus::Predict);
    f.render_widget(
        Paragraph::new(lines).block(block(" Manual Input ", focused)),
        area,
    );
}

fn draw_upload(f: &mut Frame, area: Rect, state: &PredictorState, session: &PredictorSession) {
    let focused = state.focus == Focus::Upload;
    let path_style = if focused { Theme::focused() } else { Theme::text() };

    let status = match session.batch() {
        BatchStatus::Idle => Span::styled(
            "CSV with hp, wt, disp (mpg optional)",
            Theme::muted(),
        ),
        BatchStatus::Loaded(table) => Span::styled(
            format!("{} rows predicted", table.len()),
            Theme::result(),
        ),
        BatchStatus::Failed(msg) => Span::styled(msg.as_str(), Theme::error()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("path: ", Theme::dim()),
            Span::styled(format!("{} ", state.upload_path), path_style),
        ]),
        Line::from(status),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block(" Batch Prediction ", focused)),
        area,
    );
}

fn draw_download(f: &mut Frame, area: Rect, state: &PredictorState, session: &PredictorSession) {
    let focused = state.focus == Focus::Download;
    let style = match (focused, session.batch().table().is_some()) {
        (true, _) => Theme::focused(),
        (false, true) => Theme::accent_cyan(),
        (false, false) => Theme::muted(),
    };

    let line = Line::from(vec![
        Span::styled("[ Download Predictions as CSV ]", style),
        Span::styled(
            format!("  -> {}", session.export_path().display()),
            Theme::dim(),
        ),
    ]);

    f.render_widget(Paragraph::new(line).block(block(" Download ", focused)), area);
}

fn block(title: &str, focused: bool) -> Block<'_> {
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

fn hints_for(focus: Focus) -> &'static [(&'static str, &'static str)] {
    match focus {
        Focus::Field(_) => &[
            ("tab", "next"),
            ("↑↓", "step"),
            ("enter", "commit"),
            ("esc", "menu"),
        ],
        Focus::Predict => &[
            ("enter", "predict"),
            ("r", "reset"),
            ("tab", "next"),
            ("esc", "menu"),
        ],
        Focus::Upload => &[("enter", "upload"), ("tab", "next"), ("esc", "menu")],
        Focus::Table => &[
            ("↑↓", "scroll"),
            ("←→", "columns"),
            ("pgup/pgdn", "page"),
            ("tab", "next"),
            ("esc", "menu"),
        ],
        Focus::Download => &[("enter", "save csv"), ("tab", "next"), ("esc", "menu")],
    }
}
