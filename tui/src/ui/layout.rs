use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the predictor page.
pub struct PredictorAreas {
    pub header: Rect,
    pub form: Rect,
    pub model: Rect,
    pub upload: Rect,
    pub download: Rect,
    pub logs: Rect,
    pub chart: Rect,
    pub table: Rect,
    pub error: Rect,
    pub hints: Rect,
}

/// Computes the predictor page layout.
///
/// The left column holds the manual form, model summary, upload and
/// download controls and the event log; the right column holds the chart
/// above the batch table.
pub fn predictor(area: Rect) -> PredictorAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(cols[1]);

    PredictorAreas {
        header: rows[0],
        form: left[0],
        model: left[1],
        upload: left[2],
        download: left[3],
        logs: left[4],
        chart: right[0],
        table: right[1],
        error: rows[2],
        hints: rows[3],
    }
}

/// A rectangle of the given percentages centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
