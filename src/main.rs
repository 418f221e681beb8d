mod app;
mod calendar;
mod config;
mod daydetail;
mod help;
mod journal;
mod logform;
mod logging;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarNavigator, MonthCursor, NavigatorConfig, WeekStart};
use crate::config::Config;
use crate::journal::{MemoryStore, UserId};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        month: Option<MonthCursor>,
        user: Option<UserId>,
        week_start: Option<WeekStart>,
        config: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut month = None;
        let mut user = None;
        let mut week_start = None;
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('u') | Arg::Long("user") => {
                    let value = parser.value()?.string()?;
                    let id = UserId::new(value)
                        .ok_or_else(|| lexopt::Error::from("user ID must not be blank"))?;
                    user = Some(id);
                }
                Arg::Short('w') | Arg::Long("week-start") => {
                    week_start = Some(parser.value()?.parse::<WeekStart>()?);
                }
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if month.is_none() => {
                    month = Some(value.parse::<MonthCursor>()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            month,
            user,
            week_start,
            config,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                month,
                user,
                week_start,
                config: config_path,
            } => {
                let cfg = Config::load(config_path.as_deref())
                    .context("failed to load configuration")?;
                if let Some(dirs) = config::project_dirs() {
                    let log_path = logging::init(dirs.data_local_dir(), cfg.log_level.as_deref())?;
                    tracing::info!(path = %log_path.display(), "logging initialized");
                }
                tracing::debug!(?cfg, "loaded configuration");
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let user = user.or_else(|| cfg.user.and_then(UserId::new));
                if user.is_none() {
                    tracing::warn!("no user given; entries cannot be loaded or saved");
                }
                let nav_config = NavigatorConfig {
                    week_start: week_start.unwrap_or(cfg.week_start),
                    on_failure: cfg.on_failure,
                };
                let mut navigator =
                    CalendarNavigator::new(MemoryStore::new(), today, nav_config).user(user);
                let r = navigator.initialize(month.map_or(today, MonthCursor::first_day));
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(navigator, today).with_result(r).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: moodlog [<options>] [YYYY-MM]");
                println!();
                println!("Terminal mood journal with a navigable month calendar");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>       Read configuration from the given file");
                println!("  -u, --user <ID>           Show and record entries for the given user");
                println!("  -w, --week-start <DAY>    First column of the calendar: sunday or monday");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
