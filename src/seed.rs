use crate::calendar_date::CalendarDate;
use crate::ward::{MeetingDay, Ward};
use chrono::NaiveDate;

struct SeedWard {
    id: &'static str,
    name: &'static str,
    day: MeetingDay,
    time: &'static str,
    venue: &'static str,
    start: (i32, u32, u32),
}

const SEED_WARDS: [SeedWard; 12] = [
    SeedWard {
        id: "ward-1",
        name: "Ward 1 (Central)",
        day: MeetingDay::Wednesday,
        time: "5:00 PM",
        venue: "Akinyele Primary School Hall",
        start: (2024, 1, 3),
    },
    SeedWard {
        id: "ward-2",
        name: "Ward 2 (North)",
        day: MeetingDay::Saturday,
        time: "10:00 AM",
        venue: "North Community Outreach Center",
        start: (2024, 1, 6),
    },
    SeedWard {
        id: "ward-3",
        name: "Ward 3 (South)",
        day: MeetingDay::Monday,
        time: "4:30 PM",
        venue: "Unity Square Pavilion",
        start: (2024, 1, 1),
    },
    SeedWard {
        id: "ward-4",
        name: "Ward 4 (East)",
        day: MeetingDay::Thursday,
        time: "6:00 PM",
        venue: "St. Jude's Community Hall",
        start: (2024, 1, 4),
    },
    SeedWard {
        id: "ward-5",
        name: "Ward 5 (West)",
        day: MeetingDay::Sunday,
        time: "2:00 PM",
        venue: "Elders' Resource Center",
        start: (2024, 1, 7),
    },
    SeedWard {
        id: "ward-6",
        name: "Ward 6 (Akinyele)",
        day: MeetingDay::Wednesday,
        time: "2:00 PM",
        venue: "Ojo Youth Development Hub",
        start: (2026, 2, 4),
    },
    SeedWard {
        id: "ward-7",
        name: "Ward 7 (Railway Line)",
        day: MeetingDay::Wednesday,
        time: "4:00 PM",
        venue: "Station Master's Hall",
        start: (2024, 1, 10),
    },
    SeedWard {
        id: "ward-8",
        name: "Ward 8 (Market Square)",
        day: MeetingDay::Saturday,
        time: "9:00 AM",
        venue: "Market Association Building",
        start: (2024, 1, 13),
    },
    SeedWard {
        id: "ward-9",
        name: "Ward 9 (Industrial)",
        day: MeetingDay::Monday,
        time: "6:00 PM",
        venue: "Akinyele Factory Workers' Club",
        start: (2024, 1, 8),
    },
    SeedWard {
        id: "ward-10",
        name: "Ward 10 (Hilltop)",
        day: MeetingDay::Thursday,
        time: "5:00 PM",
        venue: "Highland View Community Center",
        start: (2024, 1, 11),
    },
    SeedWard {
        id: "ward-11",
        name: "Ward 11 (Riverside)",
        day: MeetingDay::Sunday,
        time: "10:00 AM",
        venue: "Riverside Garden Pavilion",
        start: (2024, 1, 14),
    },
    SeedWard {
        id: "ward-12",
        name: "Ward 12 (New Layout)",
        day: MeetingDay::Tuesday,
        time: "4:00 PM",
        venue: "Estate Management Office Hall",
        start: (2024, 1, 9),
    },
];

/// The twelve Akinyele wards, each meeting fortnightly.
pub fn default_wards() -> Vec<Ward> {
    SEED_WARDS
        .iter()
        .map(|seed| {
            let (y, m, d) = seed.start;
            let start = NaiveDate::from_ymd_opt(y, m, d).expect("seed start dates are valid");
            Ward::new(
                seed.id,
                seed.name,
                seed.day,
                seed.time,
                seed.venue,
                CalendarDate::from(start),
            )
        })
        .collect()
}
