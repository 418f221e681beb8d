use super::navigator::CalendarNavigator;
use crate::journal::EntryStore;
use crate::theme::{ENTRY_DAY_STYLE, MONTH_STYLE, SELECTED_STYLE, TODAY_STYLE, WEEKDAY_STYLE};
use ratatui::{layout::Flex, prelude::*, widgets::*};
use time::{Date, Weekday};

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = 46;

/// Number of lines taken up by the title, the weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week: the day numbers, then the emotion
/// markers
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Offset of a marker from the left edge of its day
const MARKER_OFFSET: u16 = 1;

const ACS_HLINE: char = '─';

/// Month page showing the navigator's loaded month, with each day's first
/// emotion beneath its number
#[derive(Clone, Copy, Debug)]
pub(crate) struct Calendar<'a, S> {
    navigator: &'a CalendarNavigator<S>,
    today: Date,
    selected: u8,
}

impl<'a, S: EntryStore> Calendar<'a, S> {
    pub(crate) fn new(navigator: &'a CalendarNavigator<S>, today: Date, selected: u8) -> Self {
        Calendar {
            navigator,
            today,
            selected,
        }
    }
}

impl<S: EntryStore> Widget for Calendar<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let grid = self.navigator.month_grid();
        let month = grid.month();
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(&format!("< {} >", month.title()));
        canvas.draw_header(grid.week_start().weekdays());
        for (row, week) in std::iter::zip(0u16.., grid.weeks()) {
            for (col, cell) in std::iter::zip(0u16.., week) {
                let Some(day) = cell.day() else {
                    continue;
                };
                let entries = self.navigator.entries_for_day(day);
                let is_today = month.first_day().replace_day(day).ok() == Some(self.today);
                let style = if day == self.selected {
                    SELECTED_STYLE
                } else if is_today {
                    TODAY_STYLE
                } else if !entries.is_empty() {
                    ENTRY_DAY_STYLE
                } else {
                    Style::new()
                };
                canvas.draw_day(row, col, day, is_today, style);
                if let Some(entry) = entries.first() {
                    canvas.draw_marker(row, col, entry.emoji());
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(Text::raw(title).width()).unwrap_or(u16::MAX);
        self.mvprint(
            0,
            MAIN_WIDTH.saturating_sub(width) / 2,
            title,
            Some(MONTH_STYLE),
        );
    }

    fn draw_header<I: IntoIterator<Item = Weekday>>(&mut self, weekdays: I) {
        let header = weekdays
            .into_iter()
            .map(|wd| format!(" {} ", abbrev(wd)))
            .collect::<Vec<_>>()
            .join("   ");
        self.mvprint(1, 0, header, Some(WEEKDAY_STYLE));
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, col: u16, day: u8, is_today: bool, style: Style) {
        let s = if is_today {
            format!("[{day:2}]")
        } else {
            format!(" {day:2} ")
        };
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            col * DAY_WIDTH,
            s,
            Some(style),
        );
    }

    fn draw_marker(&mut self, week_no: u16, col: u16, marker: &str) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES + 1,
            col * DAY_WIDTH + MARKER_OFFSET,
            marker,
            None,
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

fn abbrev(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Sunday => "Su",
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{NavigatorConfig, WeekStart};
    use crate::journal::{Entry, MemoryStore, UserId};
    use time::macros::date;

    fn navigator(store: &MemoryStore, week_start: WeekStart) -> CalendarNavigator<&MemoryStore> {
        let user = UserId::new("ana").unwrap();
        for (ts, emotion) in [
            ("2024-02-05 10:00:00", "😊 Happy"),
            ("2024-02-05 22:00:00", "😢 Sad"),
            ("2024-02-29 07:15:00", "😌 Calm"),
        ] {
            store.insert(&user, Entry::new(ts, emotion, "")).unwrap();
        }
        let today = date!(2024 - 02 - 14);
        let config = NavigatorConfig {
            week_start,
            ..NavigatorConfig::default()
        };
        let mut nav = CalendarNavigator::new(store, today, config).user(Some(user));
        nav.initialize(today).unwrap();
        nav
    }

    #[test]
    fn test_render_sunday_first() {
        let store = MemoryStore::new();
        let nav = navigator(&store, WeekStart::Sunday);
        let area = Rect::new(0, 0, 46, 13);
        let mut buffer = Buffer::empty(area);
        Calendar::new(&nav, date!(2024 - 02 - 14), 5).render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "              < FEBRUARY 2024 >               ",
            " Su     Mo     Tu     We     Th     Fr     Sa ",
            "──────────────────────────────────────────────",
            "                              1      2      3 ",
            "                                              ",
            "  4      5      6      7      8      9     10 ",
            "        😊                                    ",
            " 11     12     13    [14]    15     16     17 ",
            "                                              ",
            " 18     19     20     21     22     23     24 ",
            "                                              ",
            " 25     26     27     28     29               ",
            "                             😌               ",
        ]);
        expected.set_style(Rect::new(14, 0, 17, 1), MONTH_STYLE);
        expected.set_style(Rect::new(0, 1, 46, 1), WEEKDAY_STYLE);
        expected.set_style(Rect::new(7, 5, 4, 1), SELECTED_STYLE);
        expected.set_style(Rect::new(21, 7, 4, 1), TODAY_STYLE);
        expected.set_style(Rect::new(28, 11, 4, 1), ENTRY_DAY_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_render_monday_first() {
        let store = MemoryStore::new();
        let nav = navigator(&store, WeekStart::Monday);
        let area = Rect::new(0, 0, 46, 13);
        let mut buffer = Buffer::empty(area);
        Calendar::new(&nav, date!(2024 - 02 - 14), 1).render(area, &mut buffer);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert_eq!(lines[1], " Mo     Tu     We     Th     Fr     Sa     Su ");
        assert_eq!(lines[3], "                       1      2      3      4 ");
        assert_eq!(lines[5], "  5      6      7      8      9     10     11 ");
        assert_eq!(buffer[(1, 6)].symbol(), "😊");
        assert!(buffer[(22, 3)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(1, 5)].bg, Color::Gray);
        assert_eq!(buffer[(22, 12)].symbol(), "😌");
    }
}
