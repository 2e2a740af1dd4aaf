use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::state::session::PredictorSession;
use crate::ui::{layout::centered_rect, theme::Theme, widgets};

use super::{predictor::PredictorState, Action, Screen};

const LOGO: &str = r#"
 ███╗   ███╗██████╗  ██████╗
 ████╗ ████║██╔══██╗██╔════╝
 ██╔████╔██║██████╔╝██║  ███╗
 ██║╚██╔╝██║██╔═══╝ ██║   ██║
 ██║ ╚═╝ ██║██║     ╚██████╔╝
 ╚═╝     ╚═╝╚═╝      ╚═════╝

fuel efficiency predictor
"#;

const MENU_ITEMS: &[&str] = &["Open Predictor", "Quit"];

pub struct MenuState {
    pub selected: usize,
}

impl MenuState {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

pub fn handle_key(state: &mut MenuState, key: KeyCode, session: &PredictorSession) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected < MENU_ITEMS.len() - 1 {
                state.selected += 1;
            }
            Action::None
        }
        KeyCode::Enter => match state.selected {
            0 => Action::Transition(Screen::Predictor(PredictorState::new(session.input()))),
            1 => Action::Quit,
            _ => Action::None,
        },
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &MenuState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let outer = centered_rect(60, 70, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11),
            Constraint::Length(1),
            Constraint::Length(MENU_ITEMS.len() as u16 * 2 + 2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(outer);

    draw_logo(f, chunks[0]);
    draw_menu(f, chunks[2], state);
    f.render_widget(
        widgets::hints(&[("↑↓ / j k", "navigate"), ("enter", "select"), ("q", "quit")]),
        chunks[4],
    );
}

fn draw_logo(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, Theme::accent_cyan())))
        .collect();

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_menu(f: &mut Frame, area: Rect, state: &MenuState) {
    f.render_widget(widgets::menu(" MENU ", MENU_ITEMS, state.selected), area);
}
