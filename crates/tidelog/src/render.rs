//! Terminal output for the derived views.

use colored::Colorize;

use tidelog_sessions::{CalendarCell, CalendarGrid, DayView, DistanceSummary, SummaryWindows};

use crate::config::DisplayConfig;

const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

pub fn print_day(view: &DayView, display: &DisplayConfig) {
    println!(
        "{}",
        format!("=== Sessions for {} ===", view.date).bright_blue().bold()
    );

    if view.is_empty() {
        println!("{}", "No sessions recorded.".dimmed());
        return;
    }

    for entry in &view.entries {
        let s = &entry.session;
        let d = &s.details;
        println!();
        println!(
            "{} {}  {}",
            format!("#{}", entry.index + 1).bright_blue(),
            d.time_of_day.bold(),
            format!("({})", s.id.short()).dimmed()
        );
        println!(
            "  {} {} {}",
            "Wind Speed:".dimmed(),
            d.wind_speed,
            display.speed_unit()
        );
        println!("  {} {}", "Wind Direction:".dimmed(), or_none(&d.wind_direction));
        println!("  {} {}", "Tide:".dimmed(), or_none(&d.tide));
        println!("  {} {}", "Equipment:".dimmed(), or_none(&d.equipment));
        println!(
            "  {} {} {}",
            "Distance:".dimmed(),
            d.distance,
            display.distance_unit()
        );
        println!("  {} {}", "Notes:".dimmed(), or_none(&d.notes));
    }

    println!();
    println!(
        "{} {:.1} {}",
        "Total Distance Today:".bold(),
        view.rounded_total(),
        display.distance_unit()
    );
}

pub fn print_calendar(grid: &CalendarGrid) {
    let width = WEEKDAY_HEADER.len();
    println!("{}", format!("{:^width$}", grid.title).bright_blue().bold());
    println!("{}", WEEKDAY_HEADER.dimmed());

    for row in &grid.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                CalendarCell::Blank => "  ".to_string(),
                CalendarCell::Day {
                    day,
                    has_activity: true,
                } => format!("{:>2}", day).bright_cyan().bold().to_string(),
                CalendarCell::Day { day, .. } => format!("{:>2}", day),
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    println!();
    println!("{} {}", "■".bright_cyan(), "days with sessions".dimmed());
}

pub fn print_summary(summary: &DistanceSummary, windows: &SummaryWindows, display: &DisplayConfig) {
    let rounded = summary.rounded();
    let unit = display.distance_unit();

    println!("{}", "=== Distance Summary ===".bright_blue().bold());
    println!(
        "{:<12} {:>8.1} {}  {}",
        "This week:".dimmed(),
        rounded.week,
        unit,
        format!("(since {})", windows.week_start).dimmed()
    );
    println!(
        "{:<12} {:>8.1} {}  {}",
        "This month:".dimmed(),
        rounded.month,
        unit,
        format!("(since {})", windows.month_start).dimmed()
    );
    println!(
        "{:<12} {:>8.1} {}  {}",
        "This year:".dimmed(),
        rounded.year,
        unit,
        format!("(since {})", windows.year_start).dimmed()
    );
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "None"
    } else {
        value
    }
}
