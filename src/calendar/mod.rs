mod grid;
mod month;
mod navigator;
mod widget;
pub(crate) use self::grid::WeekStart;
pub(crate) use self::month::MonthCursor;
pub(crate) use self::navigator::{CalendarNavigator, FailurePolicy, NavigatorConfig, NavigatorError};
pub(crate) use self::widget::Calendar;
