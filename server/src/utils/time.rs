//! Display formats for timestamps shown on tickets and admin pages.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// `DD/MM/YYYY HH:MM`, as printed on tickets.
pub const TICKET_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `DD Month YYYY`, as shown on the admin dashboard.
pub const DAY_FORMAT: &str = "%d %B %Y";

pub fn format_ticket_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(TICKET_TIME_FORMAT).to_string()
}

pub fn format_day<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(DAY_FORMAT).to_string()
}

/// Convert a stored UTC timestamp to the server's local time for display.
pub fn local(at: DateTime<Utc>) -> DateTime<Local> {
    at.with_timezone(&Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_time_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_ticket_time(&at), "07/03/2026 09:05");
    }

    #[test]
    fn test_day_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 23, 0, 0).unwrap();
        assert_eq!(format_day(&at), "19 October 2026");
    }
}
