use crate::calendar::{Calendar, CalendarNavigator, MonthCursor, NavigatorError};
use crate::daydetail::DayDetail;
use crate::help::Help;
use crate::journal::EntryStore;
use crate::logform::{LogForm, LogFormState, LogInput, LogOutput};
use crate::theme::{BASE_STYLE, ERROR_STYLE, NOTICE_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

const SAVED_NOTICE: &str = "Entry saved!";

#[derive(Debug)]
pub(crate) struct App<S> {
    navigator: CalendarNavigator<S>,
    today: Date,
    selected: u8,
    state: AppState,
    status: Option<Status>,
}

impl<S: EntryStore> App<S> {
    pub(crate) fn new(navigator: CalendarNavigator<S>, today: Date) -> App<S> {
        let month = navigator.displayed_month();
        let selected = if MonthCursor::containing(today) == month {
            today.day()
        } else {
            1
        };
        App {
            navigator,
            today,
            selected,
            state: AppState::Calendar,
            status: None,
        }
    }

    /// Shows the outcome of a navigator operation performed before the app
    /// took over
    pub(crate) fn with_result(mut self, result: Result<(), NavigatorError>) -> App<S> {
        self.report(result);
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('s') {
                if !self.handle_log_input(LogInput::Save) {
                    self.beep()?;
                }
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.select_by(-1),
                KeyCode::Char('l') | KeyCode::Right => self.select_by(1),
                KeyCode::Char('k') | KeyCode::Up => self.select_by(-7),
                KeyCode::Char('j') | KeyCode::Down => self.select_by(7),
                KeyCode::Char('[') | KeyCode::PageUp => self.advance(-1),
                KeyCode::Char(']') | KeyCode::PageDown => self.advance(1),
                KeyCode::Char('0') | KeyCode::Home => self.jump_to_today(),
                KeyCode::Char('r') => {
                    let r = self.navigator.reload();
                    self.report(r)
                }
                KeyCode::Enter => {
                    if self.navigator.entries_for_day(self.selected).is_empty() {
                        false
                    } else {
                        self.state = AppState::Viewing(self.selected);
                        true
                    }
                }
                KeyCode::Char('n') => {
                    self.state = AppState::Logging(LogFormState::new());
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping | AppState::Viewing(_) => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Logging(_) => {
                let input = match key {
                    KeyCode::Char(c) => LogInput::Char(c),
                    KeyCode::Backspace | KeyCode::Delete => LogInput::Backspace,
                    KeyCode::Enter => LogInput::Enter,
                    KeyCode::Tab => LogInput::Tab,
                    KeyCode::BackTab => LogInput::BackTab,
                    KeyCode::Left => LogInput::Left,
                    KeyCode::Right => LogInput::Right,
                    KeyCode::Esc => LogInput::Cancel,
                    _ => return false,
                };
                self.handle_log_input(input)
            }
            AppState::Quitting => false,
        }
    }

    fn handle_log_input(&mut self, input: LogInput) -> bool {
        let AppState::Logging(ref mut form) = self.state else {
            return false;
        };
        match form.handle_input(input) {
            LogOutput::Ok => true,
            LogOutput::Invalid => false,
            LogOutput::Cancel => {
                self.state = AppState::Calendar;
                true
            }
            LogOutput::Save => self.save_entry(),
        }
    }

    fn save_entry(&mut self) -> bool {
        let AppState::Logging(ref form) = self.state else {
            return false;
        };
        match form.save(self.navigator.store(), self.navigator.user_id()) {
            Ok(entry) => {
                tracing::info!(
                    timestamp = entry.timestamp(),
                    emotion = entry.emotion(),
                    "saved entry"
                );
                self.state = AppState::Calendar;
                let r = self.navigator.reload();
                if self.report(r) && self.status.is_none() {
                    self.status = Some(Status::Notice(String::from(SAVED_NOTICE)));
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save entry");
                self.status = Some(Status::Error(e.to_string()));
                false
            }
        }
    }

    /// Updates the status line from the outcome of a navigator operation.
    /// Returns `false` if the operation was refused outright.
    fn report(&mut self, result: Result<(), NavigatorError>) -> bool {
        match result {
            Ok(()) => {
                self.status = None;
                self.clamp_selection();
                true
            }
            Err(NavigatorError::StoreUnavailable(e)) => {
                self.status = Some(Status::Error(format!(
                    "{}: {e}; press r to retry",
                    self.navigator.cursor().title()
                )));
                self.clamp_selection();
                true
            }
            Err(e @ NavigatorError::Superseded { .. }) => {
                tracing::debug!(error = %e, "ignoring stale fetch");
                true
            }
            Err(e @ NavigatorError::OutOfTime(_)) => {
                self.status = Some(Status::Error(e.to_string()));
                false
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn select_by(&mut self, delta: i16) -> bool {
        let length = self.navigator.displayed_month().length();
        match u8::try_from(i16::from(self.selected) + delta) {
            Ok(day) if (1..=length).contains(&day) => {
                self.selected = day;
                true
            }
            _ => false,
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .clamp(1, self.navigator.displayed_month().length());
    }

    fn advance(&mut self, delta: i32) -> bool {
        let r = self.navigator.advance(delta);
        self.report(r)
    }

    fn jump_to_today(&mut self) -> bool {
        let cursor = self.navigator.cursor();
        let target = MonthCursor::containing(self.today);
        let delta = (target.year() - cursor.year()) * 12 + i32::from(u8::from(target.month()))
            - i32::from(u8::from(cursor.month()));
        if self.advance(delta) {
            if self.navigator.displayed_month() == target {
                self.selected = self.today.day();
            }
            true
        } else {
            false
        }
    }
}

impl<S: EntryStore> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Calendar::new(&self.navigator, self.today, self.selected).render(cal_area, buf);
        if let Some(ref status) = self.status {
            status.to_line().render(status_area, buf);
        }
        match self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Viewing(day) => {
                DayDetail::new(day, self.navigator.entries_for_day(day)).render(area, buf);
            }
            AppState::Logging(ref mut form) => LogForm.render(cal_area, buf, form),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Viewing(u8),
    Logging(LogFormState),
    Quitting,
}

/// Message shown on the bottom line of the screen
#[derive(Clone, Debug, Eq, PartialEq)]
enum Status {
    Error(String),
    Notice(String),
}

impl Status {
    fn to_line(&self) -> Line<'_> {
        match self {
            Status::Error(msg) => Line::styled(msg.as_str(), ERROR_STYLE),
            Status::Notice(msg) => Line::styled(msg.as_str(), NOTICE_STYLE),
        }
        .centered()
    }
}
