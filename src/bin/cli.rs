use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::str::FromStr;
use ward_calendar::{
    AppConfig, CalendarDate, Clock, Meeting, MeetingDay, Ward, WardRoster, WardUpdate, format_long,
    format_short, load_roster_from_csv, load_roster_from_json, observability, parse_date,
    save_roster_to_csv, save_roster_to_json,
};

const UNABLE_TO_COMPUTE: &str =
    "Unable to calculate next meeting date. Please check the ward information.";

fn cell(av: &AnyValue<'_>) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                widths[ci] = widths[ci].max(cell(av).len());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col.get(row_idx).map(|av| cell(&av)).unwrap_or_default();
            out.push_str(&format!(" {:<width$} |", s, width = widths[ci]));
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

const HELP: &[(&str, &str)] = &[
    ("help", "Show this help"),
    ("list", "List wards with their next meeting"),
    ("show <id>", "Show ward details and recorded meetings"),
    ("next <id>", "Show the next meeting for a ward"),
    ("upcoming <id> [count]", "Show upcoming meetings (default 6)"),
    ("add <id> | <name> | <day> | <time> | <venue> | <start>", "Add a ward"),
    ("remove <id>", "Remove a ward"),
    ("set <id> <field> <value...>", "Update a ward (name|day|time|venue|frequency|start|admin)"),
    ("meeting <id> <YYYY-MM-DD> [cancelled]", "Record a held or cancelled meeting"),
    ("today [YYYY-MM-DD|system]", "Show or pin the date used as today"),
    ("save <json|csv> <path>", "Persist roster to disk"),
    ("load <json|csv> <path>", "Load roster from disk"),
    ("quit|exit", "Exit"),
];

fn print_help() {
    println!("Commands:");
    for (usage, description) in HELP {
        println!("  {usage:<55} {description}");
    }
}

fn print_roster(roster: &WardRoster, today: CalendarDate, count: usize) {
    match roster.upcoming_table(today, count) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error building roster table: {}", e),
    }
}

fn print_ward(ward: &Ward) {
    println!("Ward               : {} ({})", ward.ward_name, ward.id);
    println!("Schedule           : {}", ward.schedule_label());
    println!("Venue              : {}", ward.venue);
    println!("Every              : {} week(s) from {}", ward.frequency_weeks, ward.start_date);
    if let Some(admin) = &ward.ward_admin {
        println!("Ward admin         : {}", admin);
    }
    if ward.meetings.is_empty() {
        println!("Recorded meetings  : none");
        return;
    }
    println!("Recorded meetings  :");
    for meeting in &ward.meetings {
        let status = if meeting.is_cancelled { " [CANCELLED]" } else { "" };
        println!(
            "  {} {} at {}{}",
            format_short(meeting.meeting_date),
            meeting.meeting_time,
            meeting.venue,
            status
        );
        if let Some(agenda) = &meeting.agenda {
            println!("    Agenda: {}", agenda);
        }
        if let Some(notes) = &meeting.notes {
            println!("    Notes : {}", notes);
        }
    }
}

fn print_upcoming(ward: &Ward, count: usize, today: CalendarDate) {
    match ward.upcoming_meetings(count, today) {
        Ok(occurrences) if occurrences.is_empty() => {
            println!("No additional meetings to display.");
        }
        Ok(occurrences) => {
            for occurrence in occurrences {
                let marker = if occurrence.is_next { "next" } else { "    " };
                println!(
                    "  {} {} at {}",
                    marker,
                    format_long(occurrence.date),
                    ward.meeting_time
                );
            }
        }
        Err(e) => println!("{} ({})", UNABLE_TO_COMPUTE, e),
    }
}

fn build_update(field: &str, value: &str) -> Result<WardUpdate, String> {
    let mut update = WardUpdate::default();
    match field {
        "name" => update.ward_name = Some(value.to_string()),
        "day" => {
            update.meeting_day = Some(MeetingDay::from_str(value).map_err(|e| e.to_string())?)
        }
        "time" => update.meeting_time = Some(value.to_string()),
        "venue" => update.venue = Some(value.to_string()),
        "frequency" => {
            update.frequency_weeks =
                Some(value.parse::<u32>().map_err(|_| "Invalid frequency (weeks)".to_string())?)
        }
        "start" => update.start_date = Some(parse_date(value).map_err(|e| e.to_string())?),
        "admin" => update.ward_admin = Some(value.to_string()),
        other => return Err(format!("Unknown field '{other}'")),
    }
    Ok(update)
}

/// `<id> | <name> | <day> | <time> | <venue> | <start>`
fn parse_new_ward(args: &str) -> Result<Ward, String> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    let [id, name, day, time, venue, start] = fields[..] else {
        return Err("Usage: add <id> | <name> | <day> | <time> | <venue> | <start>".to_string());
    };
    let day = MeetingDay::from_str(day).map_err(|e| e.to_string())?;
    let start = parse_date(start).map_err(|e| e.to_string())?;
    Ok(Ward::new(id, name, day, time, venue, start))
}

fn main() {
    let config_path = std::env::var("WARD_CALENDAR_CONFIG").ok();
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            AppConfig::default()
        }
    };
    if let Err(e) = observability::init_tracing(&config.log) {
        eprintln!("Logging disabled: {}", e);
    }

    let mut roster = WardRoster::seeded();
    let mut clock = config.schedule.clock();
    let detail_count = config.schedule.detail_count;

    println!("Ward Calendar (CLI) - type 'help' for commands\n");
    print_roster(&roster, clock.today(), config.schedule.summary_count);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => print_roster(&roster, clock.today(), config.schedule.summary_count),
            "show" | "next" | "upcoming" => {
                let Some(id) = parts.next() else {
                    println!("Usage: {} <id>", cmd);
                    continue;
                };
                let Some(ward) = roster.get(id) else {
                    println!("Ward {id} not found.");
                    continue;
                };
                match cmd {
                    "show" => print_ward(ward),
                    "next" => print_upcoming(ward, 1, clock.today()),
                    _ => {
                        let count = match parts.next().map(str::parse::<usize>) {
                            None => detail_count,
                            Some(Ok(n)) => n,
                            Some(Err(_)) => {
                                println!("Invalid count");
                                continue;
                            }
                        };
                        print_upcoming(ward, count, clock.today());
                    }
                }
            }
            "add" => {
                let args = input.strip_prefix("add").unwrap_or_default();
                match parse_new_ward(args) {
                    Ok(ward) => match roster.create(ward) {
                        Ok(ward) => println!("Added {}.", ward.id),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
            "remove" => match parts.next() {
                Some(id) => match roster.remove(id) {
                    Some(ward) => println!("Removed {}.", ward.id),
                    None => println!("Ward {id} not found."),
                },
                None => println!("Usage: remove <id>"),
            },
            "meeting" => {
                let (Some(id), Some(date)) = (parts.next(), parts.next()) else {
                    println!("Usage: meeting <id> <YYYY-MM-DD> [cancelled]");
                    continue;
                };
                let date = match parse_date(date) {
                    Ok(date) => date,
                    Err(e) => {
                        println!("Invalid date: {}", e);
                        continue;
                    }
                };
                let Some(ward) = roster.get(id) else {
                    println!("Ward {id} not found.");
                    continue;
                };
                let mut meeting = Meeting::new(
                    roster.next_meeting_id(),
                    date,
                    ward.meeting_time.clone(),
                    ward.venue.clone(),
                );
                meeting.is_cancelled = parts.next() == Some("cancelled");
                let meeting_id = meeting.id;
                match roster.record_meeting(id, meeting) {
                    Ok(()) => println!("Recorded meeting {meeting_id} for {id} on {date}."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "set" => {
                let (Some(id), Some(field)) = (parts.next(), parts.next()) else {
                    println!("Usage: set <id> <field> <value...>");
                    continue;
                };
                let value = parts.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    println!("Usage: set <id> <field> <value...>");
                    continue;
                }
                match build_update(field, &value) {
                    Ok(update) => match roster.update(id, update) {
                        Ok(ward) => println!("Updated {}.", ward.id),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
            "today" => match parts.next() {
                None => println!("Today is {}", format_long(clock.today())),
                Some("system") => {
                    clock = Clock::System;
                    println!("Using the system clock.");
                }
                Some(value) => match parse_date(value) {
                    Ok(date) => {
                        clock = Clock::Fixed(date);
                        println!("Today pinned to {}.", date);
                    }
                    Err(e) => println!("Invalid date: {}", e),
                },
            },
            "save" => match (parts.next(), parts.next()) {
                (Some(kind), Some(path)) => {
                    let result = match kind {
                        "json" => save_roster_to_json(&roster, path),
                        "csv" => save_roster_to_csv(&roster, path),
                        _ => {
                            println!("Unknown format '{}'. Use json or csv.", kind);
                            continue;
                        }
                    };
                    match result {
                        Ok(()) => println!("Roster saved to {}.", path),
                        Err(e) => println!("Save error: {}", e),
                    }
                }
                _ => println!("Usage: save <json|csv> <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some(kind), Some(path)) => {
                    let result = match kind {
                        "json" => load_roster_from_json(path),
                        "csv" => load_roster_from_csv(path),
                        _ => {
                            println!("Unknown format '{}'. Use json or csv.", kind);
                            continue;
                        }
                    };
                    match result {
                        Ok(loaded) => {
                            roster = loaded;
                            println!("Roster loaded from {}.", path);
                        }
                        Err(e) => println!("Load error: {}", e),
                    }
                }
                _ => println!("Usage: load <json|csv> <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
