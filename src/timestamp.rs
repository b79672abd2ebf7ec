use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

const DISPLAY_FORMAT: &str = "%I:%M %p";

/// Renders overlay timestamps as 12-hour clock strings in a fixed timezone.
///
/// Raw `HH:MM` values are taken to already be wall-clock times in `tz`;
/// they are only reformatted, never shifted between zones.
#[derive(Debug, Clone, Copy)]
pub struct TimestampNormalizer {
    tz: Tz,
}

impl TimestampNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Looks up an IANA zone name, falling back to New York when unknown.
    pub fn from_name(name: &str) -> Self {
        match name.parse::<Tz>() {
            Ok(tz) => Self::new(tz),
            Err(err) => {
                log::warn!("Unknown timezone '{name}' ({err}); using America/New_York");
                Self::new(chrono_tz::America::New_York)
            }
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_at(raw, Utc::now())
    }

    pub fn normalize_at(&self, raw: &str, now: DateTime<Utc>) -> String {
        if raw.is_empty() {
            return display(&now.with_timezone(&self.tz).naive_local());
        }

        let time = match NaiveTime::parse_from_str(raw, "%H:%M") {
            Ok(time) => time,
            Err(err) => {
                log::warn!("Error converting timestamp '{raw}': {err}");
                return raw.to_string();
            }
        };

        // The date comes from UTC "today", matching how the overlay clock is read.
        let naive = NaiveDateTime::new(now.date_naive(), time);
        match self.tz.from_local_datetime(&naive).earliest() {
            Some(local) => display(&local.naive_local()),
            None => display(&naive),
        }
    }
}

impl Default for TimestampNormalizer {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

fn display(time: &NaiveDateTime) -> String {
    let formatted = time.format(DISPLAY_FORMAT).to_string();
    match formatted.strip_prefix('0') {
        Some(stripped) => stripped.to_string(),
        None => formatted,
    }
}
