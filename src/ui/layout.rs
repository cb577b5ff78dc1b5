use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    /// Present while the recovery input is open
    pub recovery: Option<Rect>,
    pub account: Rect,
    pub transfer: Rect,
    pub history: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect, recovery_open: bool) -> UiAreas {
    let recovery_height = if recovery_open { 3 } else { 0 };
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(recovery_height),
            Constraint::Length(10),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(size);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(vertical[2]);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[4]);

    UiAreas {
        size,
        header: vertical[0],
        recovery: recovery_open.then_some(vertical[1]),
        account: top_chunks[0],
        transfer: top_chunks[1],
        history: vertical[3],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}
