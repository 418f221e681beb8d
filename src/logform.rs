use crate::journal::{Entry, EntryStore, NewEntry, StoreError, UserId, EMOTIONS};
use crate::theme::{
    logform::{CHOSEN_EMOTION_STYLE, FOCUSED_STYLE, UNFOCUSED_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget, Wrap},
};
use thiserror::Error;

const CHAT_REPLY: &str = "AI: How can I help you with that?";

const HINT: &str = "TAB next field · ←/→ choose mood · ENTER send · CTRL-S save · ESC cancel";

/// Height of the notes box, borders included
const NOTES_HEIGHT: u16 = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LogForm;

impl StatefulWidget for LogForm {
    type State = LogFormState;

    /*
     * Daily Log
     * ┌ How are you feeling? ──────────────┐
     * │ 😊 Happy  😢 Sad  😡 Angry  …       │
     * └────────────────────────────────────┘
     * ┌ Chat ──────────────────────────────┐
     * │You: …                              │
     * │AI: How can I help you with that?   │
     * │> _                                 │
     * └────────────────────────────────────┘
     * ┌ Notes ─────────────────────────────┐
     * │                                    │
     * └────────────────────────────────────┘
     * TAB next field · …
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);
        Block::new().style(BASE_STYLE).render(area, buf);
        let [title_area, mood_area, chat_area, notes_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(NOTES_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled("Daily Log", BASE_STYLE.bold()).render(title_area, buf);

        Paragraph::new(state.emotion_line())
            .block(state.block(Field::Emotion, " How are you feeling? "))
            .render(mood_area, buf);

        let chat_block = state.block(Field::Chat, " Chat ");
        let visible = usize::from(chat_block.inner(chat_area).height);
        let mut chat_lines = state
            .chat
            .iter()
            .map(|s| Line::raw(s.as_str()))
            .collect::<Vec<_>>();
        chat_lines.push(Line::raw(format!("> {}", state.message)));
        let skip = chat_lines.len().saturating_sub(visible);
        Paragraph::new(Text::from_iter(chat_lines.into_iter().skip(skip)))
            .block(chat_block)
            .render(chat_area, buf);

        Paragraph::new(state.notes.as_str())
            .wrap(Wrap { trim: false })
            .block(state.block(Field::Notes, " Notes "))
            .render(notes_area, buf);

        Line::styled(HINT, UNFOCUSED_STYLE).render(hint_area, buf);
    }
}

/// The part of the form that receives typed input
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Field {
    #[default]
    Emotion,
    Chat,
    Notes,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Emotion => Field::Chat,
            Field::Chat => Field::Notes,
            Field::Notes => Field::Emotion,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Emotion => Field::Notes,
            Field::Chat => Field::Emotion,
            Field::Notes => Field::Chat,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct LogFormState {
    emotion: Option<usize>,
    focus: Field,
    chat: Vec<String>,
    message: String,
    notes: String,
}

impl LogFormState {
    pub(crate) fn new() -> LogFormState {
        LogFormState::default()
    }

    pub(crate) fn emotion(&self) -> Option<&'static str> {
        self.emotion.and_then(|i| EMOTIONS.get(i).copied())
    }

    fn block(&self, field: Field, title: &'static str) -> Block<'static> {
        Block::bordered().title(title).border_style(if self.focus == field {
            FOCUSED_STYLE
        } else {
            UNFOCUSED_STYLE
        })
    }

    fn emotion_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, &e) in EMOTIONS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if self.emotion == Some(i) {
                CHOSEN_EMOTION_STYLE
            } else {
                Style::new()
            };
            spans.push(Span::styled(e, style));
        }
        Line::from(spans)
    }

    pub(crate) fn handle_input(&mut self, input: LogInput) -> LogOutput {
        match (input, self.focus) {
            (LogInput::Cancel, _) => LogOutput::Cancel,
            (LogInput::Save, _) => LogOutput::Save,
            (LogInput::Tab, _) => {
                self.focus = self.focus.next();
                LogOutput::Ok
            }
            (LogInput::BackTab, _) => {
                self.focus = self.focus.previous();
                LogOutput::Ok
            }
            (LogInput::Right, Field::Emotion) => {
                self.emotion = Some(self.emotion.map_or(0, |i| (i + 1) % EMOTIONS.len()));
                LogOutput::Ok
            }
            (LogInput::Left, Field::Emotion) => {
                self.emotion = Some(
                    self.emotion
                        .map_or(EMOTIONS.len(), |i| if i == 0 { EMOTIONS.len() } else { i })
                        - 1,
                );
                LogOutput::Ok
            }
            (LogInput::Enter, Field::Emotion) => {
                self.focus = Field::Chat;
                LogOutput::Ok
            }
            (LogInput::Char(c), Field::Chat) => {
                self.message.push(c);
                LogOutput::Ok
            }
            (LogInput::Backspace, Field::Chat) => {
                self.message.pop().map_or(LogOutput::Invalid, |_| LogOutput::Ok)
            }
            (LogInput::Enter, Field::Chat) => self.send_message(),
            (LogInput::Char(c), Field::Notes) => {
                self.notes.push(c);
                LogOutput::Ok
            }
            (LogInput::Enter, Field::Notes) => {
                self.notes.push('\n');
                LogOutput::Ok
            }
            (LogInput::Backspace, Field::Notes) => {
                self.notes.pop().map_or(LogOutput::Invalid, |_| LogOutput::Ok)
            }
            _ => LogOutput::Invalid,
        }
    }

    // The chat is a scripted stand-in: every message gets the same reply.
    fn send_message(&mut self) -> LogOutput {
        if self.message.trim().is_empty() {
            return LogOutput::Invalid;
        }
        let message = std::mem::take(&mut self.message);
        self.chat.push(format!("You: {message}"));
        self.chat.push(String::from(CHAT_REPLY));
        LogOutput::Ok
    }

    pub(crate) fn to_new_entry(&self) -> Result<NewEntry, LogError> {
        let emotion = self.emotion().ok_or(LogError::NoEmotion)?;
        Ok(NewEntry {
            emotion: emotion.to_owned(),
            notes: self.notes.clone(),
            chat_log: self.chat.join("\n"),
        })
    }

    pub(crate) fn save<S: EntryStore>(
        &self,
        store: &S,
        user: Option<&UserId>,
    ) -> Result<Entry, LogError> {
        let user = user.ok_or(LogError::NoUser)?;
        let entry = self.to_new_entry()?;
        Ok(store.save_entry(user, entry)?)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LogInput {
    Char(char),
    Backspace,
    Enter,
    Tab,
    BackTab,
    Left,
    Right,
    Save,
    Cancel,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LogOutput {
    Ok,
    Invalid,
    Save,
    Cancel,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum LogError {
    #[error("no user is signed in; start with --user to save entries")]
    NoUser,
    #[error("choose how you are feeling before saving")]
    NoEmotion,
    #[error("could not save entry: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MonthCursor;
    use crate::journal::MemoryStore;
    use time::macros::{date, datetime};

    fn type_str(state: &mut LogFormState, s: &str) {
        for c in s.chars() {
            assert_eq!(state.handle_input(LogInput::Char(c)), LogOutput::Ok);
        }
    }

    #[test]
    fn test_choose_emotion() {
        let mut state = LogFormState::new();
        assert_eq!(state.emotion(), None);
        state.handle_input(LogInput::Right);
        assert_eq!(state.emotion(), Some("😊 Happy"));
        state.handle_input(LogInput::Right);
        assert_eq!(state.emotion(), Some("😢 Sad"));
        state.handle_input(LogInput::Left);
        state.handle_input(LogInput::Left);
        assert_eq!(state.emotion(), Some("😌 Calm"));
        state.handle_input(LogInput::Right);
        assert_eq!(state.emotion(), Some("😊 Happy"));
    }

    #[test]
    fn test_left_from_nothing_picks_last() {
        let mut state = LogFormState::new();
        state.handle_input(LogInput::Left);
        assert_eq!(state.emotion(), Some("😌 Calm"));
    }

    #[test]
    fn test_typing_in_emotion_field_is_invalid() {
        let mut state = LogFormState::new();
        assert_eq!(state.handle_input(LogInput::Char('x')), LogOutput::Invalid);
    }

    #[test]
    fn test_chat() {
        let mut state = LogFormState::new();
        state.handle_input(LogInput::Tab);
        assert_eq!(state.handle_input(LogInput::Enter), LogOutput::Invalid);
        type_str(&mut state, "hello");
        assert_eq!(state.handle_input(LogInput::Backspace), LogOutput::Ok);
        type_str(&mut state, "p");
        assert_eq!(state.handle_input(LogInput::Enter), LogOutput::Ok);
        assert_eq!(
            state.chat,
            ["You: hellp", "AI: How can I help you with that?"]
        );
        assert!(state.message.is_empty());
    }

    #[test]
    fn test_notes() {
        let mut state = LogFormState::new();
        state.handle_input(LogInput::BackTab);
        assert_eq!(state.focus, Field::Notes);
        type_str(&mut state, "slept");
        state.handle_input(LogInput::Enter);
        type_str(&mut state, "well");
        assert_eq!(state.notes, "slept\nwell");
        assert_eq!(state.handle_input(LogInput::Save), LogOutput::Save);
        assert_eq!(state.handle_input(LogInput::Cancel), LogOutput::Cancel);
    }

    #[test]
    fn test_backspace_on_empty_is_invalid() {
        let mut state = LogFormState::new();
        state.handle_input(LogInput::Tab);
        state.handle_input(LogInput::Tab);
        assert_eq!(state.handle_input(LogInput::Backspace), LogOutput::Invalid);
    }

    #[test]
    fn test_save() {
        let store = MemoryStore::with_clock(|| datetime!(2024-03-05 21:45:00));
        let user = UserId::new("ana").unwrap();
        let mut state = LogFormState::new();
        state.handle_input(LogInput::Right);
        state.handle_input(LogInput::Enter);
        type_str(&mut state, "hi");
        state.handle_input(LogInput::Enter);
        state.handle_input(LogInput::Tab);
        type_str(&mut state, "long day");
        let entry = state.save(&store, Some(&user)).unwrap();
        assert_eq!(entry, Entry::new("2024-03-05 21:45:00", "😊 Happy", "long day"));
        assert_eq!(
            state.to_new_entry().unwrap().chat_log,
            "You: hi\nAI: How can I help you with that?"
        );
        let march = MonthCursor::containing(date!(2024 - 03 - 01));
        assert_eq!(store.month_entries(&user, march), Ok(vec![entry]));
    }

    #[test]
    fn test_save_requires_user_and_emotion() {
        let store = MemoryStore::new();
        let user = UserId::new("ana").unwrap();
        let mut state = LogFormState::new();
        assert_eq!(state.save(&store, Some(&user)), Err(LogError::NoEmotion));
        state.handle_input(LogInput::Right);
        assert_eq!(state.save(&store, None), Err(LogError::NoUser));
    }

    #[test]
    fn test_render() {
        let mut state = LogFormState::new();
        state.handle_input(LogInput::Right);
        state.handle_input(LogInput::Tab);
        type_str(&mut state, "hey");
        state.handle_input(LogInput::Enter);
        let area = Rect::new(0, 0, 80, 20);
        let mut buffer = Buffer::empty(area);
        LogForm.render(area, &mut buffer, &mut state);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert!(lines[0].starts_with("Daily Log"));
        assert!(lines[1].contains("How are you feeling?"));
        assert!(lines.iter().any(|ln| ln.contains("│You: hey")));
        assert!(lines.iter().any(|ln| ln.contains("│AI: How can I help you with that?")));
        assert!(lines.iter().any(|ln| ln.contains("│> ")));
        assert!(lines[19].starts_with("TAB next field"));
    }
}
