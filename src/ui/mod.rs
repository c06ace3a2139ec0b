pub mod advisors;
pub mod appointment_wizard;
pub mod calendar;
pub mod client_wizard;
pub mod clients;
pub mod components;
pub mod consultations;
pub mod home;
pub mod intake;
pub mod landing;
pub mod login;
pub mod reports;
pub mod search;
pub mod task_wizard;
pub mod tasks;

use tui::layout::{Constraint, Direction, Layout, Rect};

/// Centered popup area, sized as a percentage of the enclosing rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
