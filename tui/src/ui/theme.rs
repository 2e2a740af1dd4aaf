use ratatui::style::{Color, Modifier, Style};

/// Dark dashboard theme.
///
/// Light grey text on black, cyan for focus, with the plot series colored
/// so predictions and the ideal line stay distinguishable.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(0, 0, 0);
    pub const FG: Color = Color::Rgb(220, 220, 220);
    pub const FG_DIM: Color = Color::Rgb(150, 150, 150);
    pub const FG_MUTED: Color = Color::Rgb(85, 85, 85);

    pub const ACCENT_CYAN: Color = Color::Rgb(0, 215, 255);
    pub const ACCENT_ORANGE: Color = Color::Rgb(255, 150, 40);
    pub const ACCENT_GREEN: Color = Color::Rgb(90, 220, 110);
    pub const ACCENT_RED: Color = Color::Rgb(255, 70, 70);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    /// Panel borders.
    pub fn border() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Border of the focused panel.
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_CYAN)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Focused input or button.
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::BG)
            .bg(Self::ACCENT_CYAN)
            .add_modifier(Modifier::BOLD)
    }

    /// The predicted value and the `Predicted MPG` column.
    pub fn result() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent_cyan() -> Style {
        Style::default()
            .fg(Self::ACCENT_CYAN)
            .add_modifier(Modifier::BOLD)
    }

    /// Predicted points in the chart.
    pub fn series() -> Style {
        Style::default().fg(Self::ACCENT_CYAN)
    }

    /// The dashed `y = x` line in the chart.
    pub fn ideal() -> Style {
        Style::default().fg(Self::ACCENT_ORANGE)
    }

    /// Event log level tag.
    pub fn level(level: &str) -> Style {
        match level {
            "ERROR" => Self::error(),
            "WARN" => Style::default().fg(Self::ACCENT_ORANGE),
            _ => Self::dim(),
        }
    }
}
