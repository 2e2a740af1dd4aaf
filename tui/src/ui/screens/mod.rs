pub mod menu;
pub mod predictor;

use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::state::session::PredictorSession;

pub enum Action {
    None,
    Quit,
    Transition(Screen),
}

pub enum Screen {
    Menu(menu::MenuState),
    Predictor(predictor::PredictorState),
}

impl Screen {
    pub fn draw(&self, f: &mut Frame, session: &PredictorSession) {
        match self {
            Screen::Menu(s) => menu::draw(f, s),
            Screen::Predictor(s) => predictor::draw(f, s, session),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, session: &mut PredictorSession) -> Action {
        match self {
            Screen::Menu(s) => menu::handle_key(s, key, session),
            Screen::Predictor(s) => predictor::handle_key(s, key, session),
        }
    }
}
