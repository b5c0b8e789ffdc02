use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use tidelog_db::{Logbook, PersistenceGateway};
use tidelog_logging::{LogEvent, Logger};
use tidelog_sessions::{
    build_day_view, build_grid, export_csv, row_count, summarize, CalendarMonth, DateKey,
    SessionId, SessionInput, SessionStore, StoreError, SummaryWindows, CSV_FILE_NAME,
};

use crate::config::DisplayConfig;
use crate::render::{print_calendar, print_day, print_summary};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new session
    Add {
        /// Date of the session (YYYY-MM-DD or "today")
        date: String,

        #[command(flatten)]
        fields: SessionArgs,
    },

    /// Change a recorded session; fields not given keep their value
    Edit {
        /// Date of the session (YYYY-MM-DD or "today")
        date: String,

        /// Session number as shown by `day`, or an id prefix (`id:` forces an id)
        session: String,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a recorded session
    Delete {
        /// Date of the session (YYYY-MM-DD or "today")
        date: String,

        /// Session number as shown by `day`, or an id prefix (`id:` forces an id)
        session: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show one day's sessions, sorted by time
    Day {
        /// Date to show (default: today)
        date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a month calendar marking days with sessions
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Go back this many months
        #[arg(long, default_value_t = 0, conflicts_with = "next")]
        prev: u32,

        /// Go forward this many months
        #[arg(long, default_value_t = 0)]
        next: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show distance totals for this week, month and year
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export every session as CSV
    Export {
        /// Output file (default: ./water_sports_data.csv)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
}

/// Session fields for `add`; all but notes are required.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Time of day (HH:MM)
    #[arg(short, long)]
    time: String,

    /// Wind speed
    #[arg(short = 's', long, allow_hyphen_values = true)]
    wind_speed: String,

    /// Wind direction (compass code or free text)
    #[arg(short = 'w', long)]
    wind_direction: String,

    /// Tide state
    #[arg(long)]
    tide: String,

    /// Equipment used
    #[arg(short, long)]
    equipment: String,

    /// Distance covered
    #[arg(short, long, allow_hyphen_values = true)]
    distance: String,

    /// Free-form notes
    #[arg(short, long)]
    notes: Option<String>,
}

impl From<SessionArgs> for SessionInput {
    fn from(args: SessionArgs) -> Self {
        Self {
            time_of_day: args.time,
            wind_speed: args.wind_speed,
            wind_direction: args.wind_direction,
            tide: args.tide,
            equipment: args.equipment,
            distance: args.distance,
            notes: args.notes,
        }
    }
}

/// Session fields for `edit`; each replaces the stored value when given.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// New time of day (HH:MM)
    #[arg(short, long)]
    time: Option<String>,

    /// New wind speed
    #[arg(short = 's', long, allow_hyphen_values = true)]
    wind_speed: Option<String>,

    /// New wind direction
    #[arg(short = 'w', long)]
    wind_direction: Option<String>,

    /// New tide state
    #[arg(long)]
    tide: Option<String>,

    /// New equipment
    #[arg(short, long)]
    equipment: Option<String>,

    /// New distance
    #[arg(short, long, allow_hyphen_values = true)]
    distance: Option<String>,

    /// New notes (pass "" to clear)
    #[arg(short, long)]
    notes: Option<String>,
}

impl EditArgs {
    fn apply(self, input: &mut SessionInput) {
        let EditArgs {
            time,
            wind_speed,
            wind_direction,
            tide,
            equipment,
            distance,
            notes,
        } = self;

        if let Some(v) = time {
            input.time_of_day = v;
        }
        if let Some(v) = wind_speed {
            input.wind_speed = v;
        }
        if let Some(v) = wind_direction {
            input.wind_direction = v;
        }
        if let Some(v) = tide {
            input.tide = v;
        }
        if let Some(v) = equipment {
            input.equipment = v;
        }
        if let Some(v) = distance {
            input.distance = v;
        }
        if notes.is_some() {
            input.notes = notes;
        }
    }
}

/// Prefix that forces a reference to be read as an id.
const ID_PREFIX: &str = "id:";

/// Digit strings this long are id prefixes, never positions. The short id
/// shown by `day` is eight hex digits and may contain no letters.
const MIN_NUMERIC_ID_LEN: usize = 8;

/// How a command names one session of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based storage position, as shown by `day` and in CSV exports
    Position(usize),
    /// Full id or a unique prefix of it
    Id(String),
}

impl SessionRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(prefix) = raw.strip_prefix(ID_PREFIX) {
            let prefix = prefix.trim();
            if prefix.is_empty() {
                anyhow::bail!("Session id after {:?} is empty", ID_PREFIX);
            }
            return Ok(SessionRef::Id(prefix.to_string()));
        }

        let raw = raw.trim_start_matches('#');
        if raw.is_empty() {
            anyhow::bail!("Session reference is empty");
        }
        if raw.len() < MIN_NUMERIC_ID_LEN && raw.chars().all(|c| c.is_ascii_digit()) {
            let position: usize = raw.parse().context("Session number is too large")?;
            if position == 0 {
                anyhow::bail!("Session numbers start at 1");
            }
            return Ok(SessionRef::Position(position));
        }
        Ok(SessionRef::Id(raw.to_string()))
    }
}

/// A session reference resolved against the store.
enum Target {
    Index(usize),
    Id(SessionId),
}

fn resolve(store: &SessionStore, date: DateKey, reference: &SessionRef) -> Result<Target> {
    match reference {
        SessionRef::Position(position) => Ok(Target::Index(position - 1)),
        SessionRef::Id(prefix) => {
            let matches: Vec<&SessionId> = store
                .sessions_for(date)
                .iter()
                .map(|s| &s.id)
                .filter(|id| id.as_str().starts_with(prefix.as_str()))
                .collect();
            match matches.as_slice() {
                [id] => Ok(Target::Id((*id).clone())),
                [] => anyhow::bail!("No session on {} has an id starting with {:?}", date, prefix),
                _ => anyhow::bail!(
                    "{} sessions on {} match {:?}; use a longer prefix",
                    matches.len(),
                    date,
                    prefix
                ),
            }
        }
    }
}

/// Parse a date argument, accepting "today".
pub fn parse_date(raw: &str) -> Result<DateKey> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(DateKey::today());
    }
    raw.parse::<DateKey>().map_err(anyhow::Error::from)
}

fn parse_month(raw: &str) -> Result<CalendarMonth> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("Invalid month {:?} (expected YYYY-MM)", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in {:?}", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in {:?}", raw))?;
    CalendarMonth::new(year, month)
        .with_context(|| format!("Month must be between 1 and 12, got {}", month))
}

pub fn handle_command<G: PersistenceGateway>(
    command: Command,
    logbook: &mut Logbook<G>,
    logger: &Logger,
    display: &DisplayConfig,
) -> Result<()> {
    match command {
        Command::Add { date, fields } => {
            let date = parse_date(&date)?;
            let details = SessionInput::from(fields).validate()?;

            let id = logbook.add(date, details).context("Failed to save session")?;
            let position = logbook
                .store()
                .position_of(date, &id)
                .map(|i| i + 1)
                .unwrap_or_default();
            logger.log(&LogEvent::SessionAdded {
                date: date.to_string(),
                position,
                id: id.to_string(),
            });
        }
        Command::Edit {
            date,
            session,
            fields,
        } => {
            let date = parse_date(&date)?;
            let reference = SessionRef::parse(&session)?;
            let target = resolve(logbook.store(), date, &reference)?;

            let sessions = logbook.store().sessions_for(date);
            let index = match &target {
                Target::Index(index) => *index,
                Target::Id(id) => logbook.store().position_of(date, id).unwrap_or(sessions.len()),
            };
            let existing = sessions.get(index).ok_or(StoreError::IndexOutOfRange {
                date,
                index,
                len: sessions.len(),
            })?;
            let mut input = SessionInput::from(&existing.details);
            fields.apply(&mut input);
            let details = input.validate()?;

            let updated = match target {
                Target::Index(index) => logbook.edit(date, index, details),
                Target::Id(id) => logbook.edit_by_id(date, &id, details),
            }
            .context("Failed to update session")?;

            let position = logbook
                .store()
                .position_of(date, &updated.id)
                .map(|i| i + 1)
                .unwrap_or_default();
            logger.log(&LogEvent::SessionUpdated {
                date: date.to_string(),
                position,
                id: updated.id.to_string(),
            });
        }
        Command::Delete { date, session, yes } => {
            let date = parse_date(&date)?;
            let reference = SessionRef::parse(&session)?;
            let target = resolve(logbook.store(), date, &reference)?;

            let position = match &target {
                Target::Index(index) => index + 1,
                Target::Id(id) => logbook
                    .store()
                    .position_of(date, id)
                    .map(|i| i + 1)
                    .unwrap_or_default(),
            };

            let len = logbook.store().sessions_for(date).len();
            if let Target::Index(index) = &target {
                if *index >= len {
                    return Err(StoreError::IndexOutOfRange {
                        date,
                        index: *index,
                        len,
                    }
                    .into());
                }
            }

            if !yes && !confirm_delete(date, position)? {
                println!("{}", "Cancelled.".dimmed());
                return Ok(());
            }

            match target {
                Target::Index(index) => logbook.remove(date, index),
                Target::Id(id) => logbook.remove_by_id(date, &id),
            }
            .context("Failed to delete session")?;

            logger.log(&LogEvent::SessionDeleted {
                date: date.to_string(),
                position,
                date_cleared: logbook.store().sessions_for(date).is_empty(),
            });
        }
        Command::Day { date, json } => {
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => DateKey::today(),
            };
            let view = build_day_view(date, logbook.store());

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_day(&view, display);
            }
        }
        Command::Calendar {
            month,
            prev,
            next,
            json,
        } => {
            let base = match month {
                Some(raw) => parse_month(&raw)?,
                None => CalendarMonth::containing(DateKey::today().date()),
            };
            let offset = i64::from(next) - i64::from(prev);
            let offset = i32::try_from(offset).context("Month offset is too large")?;
            let grid = build_grid(base.shift(offset), logbook.store());

            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print_calendar(&grid);
            }
        }
        Command::Summary { json } => {
            let now = chrono::Local::now().naive_local();
            let summary = summarize(logbook.store(), now);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary.rounded())?);
            } else {
                print_summary(&summary, &SummaryWindows::anchored_at(now), display);
            }
        }
        Command::Export { output, stdout } => {
            let csv = export_csv(logbook.store());
            let rows = row_count(logbook.store());

            if stdout {
                print!("{}", csv);
            } else {
                let path = output.unwrap_or_else(|| PathBuf::from(CSV_FILE_NAME));
                std::fs::write(&path, &csv)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                logger.log(&LogEvent::CsvExported {
                    destination: path.display().to_string(),
                    rows,
                });
            }
        }
    }

    Ok(())
}

fn confirm_delete(date: DateKey, position: usize) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete session #{} on {}?",
            position, date
        ))
        .default(false)
        .interact()
        .context("Could not ask for confirmation; pass --yes to delete without asking")
}
