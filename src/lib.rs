pub mod calendar_date;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod observability;
pub mod persistence;
pub mod recurrence;
pub mod roster;
pub mod seed;
pub mod ward;
pub(crate) mod ward_validation;

pub use calendar_date::{CalendarDate, DateInput, parse_date};
pub use clock::Clock;
pub use config::AppConfig;
pub use error::{RecurrenceError, RecurrenceResult};
pub use format::{INVALID_DATE, format_long, format_long_or_fallback, format_short};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteWardStore;
pub use persistence::{
    PersistenceError, WardStore, load_roster_from_csv, load_roster_from_json, save_roster_to_csv,
    save_roster_to_json, validate_wards,
};
pub use recurrence::{DEFAULT_OCCURRENCE_COUNT, Occurrence, ScheduleSpec, project, project_default};
pub use roster::{RosterError, WardRoster};
pub use ward::{Meeting, MeetingDay, Ward, WardUpdate};
pub use ward_validation::WardValidationError;
