use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Day numbers of days that have at least one entry
pub(crate) const ENTRY_DAY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightBlue)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

pub(crate) const ERROR_STYLE: Style = Style::new().fg(Color::LightRed).bg(Color::Black);

pub(crate) const NOTICE_STYLE: Style = Style::new().fg(Color::LightGreen).bg(Color::Black);

pub(crate) mod logform {
    use super::*;

    pub(crate) const FOCUSED_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);

    pub(crate) const UNFOCUSED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const CHOSEN_EMOTION_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);
}
