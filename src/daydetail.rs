use crate::help::popup;
use crate::journal::Entry;
use crate::theme::BASE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::Widget,
};

const DIVIDER_WIDTH: usize = 24;

/// Popup listing every entry logged on one day
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayDetail<'a> {
    day: u8,
    entries: Vec<&'a Entry>,
}

impl<'a> DayDetail<'a> {
    pub(crate) fn new(day: u8, entries: Vec<&'a Entry>) -> Self {
        DayDetail { day, entries }
    }

    fn to_text(&self) -> Text<'a> {
        let mut lines = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::raw("─".repeat(DIVIDER_WIDTH)));
            }
            lines.push(Line::raw(format!("Date: {}", entry.display_timestamp())));
            lines.push(Line::raw(format!("Emotion: {}", entry.emotion())));
            let mut notes = entry.notes_or_placeholder().lines();
            lines.push(Line::raw(format!(
                "Notes: {}",
                notes.next().unwrap_or_default()
            )));
            lines.extend(notes.map(|s| Line::raw(format!("       {s}"))));
            if !entry.chat_log().is_empty() {
                lines.push(Line::raw("Chat:"));
                lines.extend(
                    entry
                        .chat_log()
                        .lines()
                        .map(|s| Line::raw(format!("  {s}"))),
                );
            }
        }
        Text::from(lines)
    }
}

impl Widget for DayDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Day {} ", self.day);
        popup(self.to_text(), &title, BASE_STYLE, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_single_entry() {
        let entry = Entry::new("2024-03-05 10:00:00", "😊 Happy", "");
        let detail = DayDetail::new(5, vec![&entry]);
        assert_eq!(
            plain(&detail.to_text()),
            [
                "Date: 05/03/2024 10:00",
                "Emotion: 😊 Happy",
                "Notes: No notes"
            ]
        );
    }

    #[test]
    fn test_multiple_entries() {
        let morning = Entry::new("2024-03-05 10:00:00", "😊 Happy", "coffee\nsunshine");
        let night = Entry::new("2024-03-05 22:00:00", "😢 Sad", "rain");
        let detail = DayDetail::new(5, vec![&morning, &night]);
        assert_eq!(
            plain(&detail.to_text()),
            [
                "Date: 05/03/2024 10:00",
                "Emotion: 😊 Happy",
                "Notes: coffee",
                "       sunshine",
                "────────────────────────",
                "Date: 05/03/2024 22:00",
                "Emotion: 😢 Sad",
                "Notes: rain",
            ]
        );
    }

    #[test]
    fn test_chat_log() {
        let entry = Entry::new("2024-03-05 10:00:00", "😰 Anxious", "exam")
            .with_chat_log("You: exam tomorrow\nAI: How can I help you with that?");
        let detail = DayDetail::new(5, vec![&entry]);
        assert_eq!(
            plain(&detail.to_text()),
            [
                "Date: 05/03/2024 10:00",
                "Emotion: 😰 Anxious",
                "Notes: exam",
                "Chat:",
                "  You: exam tomorrow",
                "  AI: How can I help you with that?",
            ]
        );
    }

    #[test]
    fn test_render() {
        let entry = Entry::new("2024-03-05 10:00:00", "😌 Calm", "");
        let area = Rect::new(0, 0, 40, 9);
        let mut buffer = Buffer::empty(area);
        DayDetail::new(5, vec![&entry]).render(area, &mut buffer);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert!(lines.iter().any(|ln| ln.contains(" Day 5 ")));
        assert!(lines.iter().any(|ln| ln.contains("│Date: 05/03/2024 10:00│")));
        assert!(lines.iter().any(|ln| ln.contains("│Notes: No notes")));
    }
}
