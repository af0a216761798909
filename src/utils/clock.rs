use time::{macros::format_description, OffsetDateTime};

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    /// Current time as an ISO-8601 string.
    fn now(&self) -> String;
}

/// Wall clock in UTC, millisecond precision, e.g. `2024-01-01T08:30:00.000Z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        format_timestamp(OffsetDateTime::now_utc())
    }
}

pub(crate) fn format_timestamp(at: OffsetDateTime) -> String {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    at.format(format).unwrap_or_else(|_| at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_with_millis_and_zulu_suffix() {
        let at = datetime!(2024-03-05 7:08:09.123456 UTC);
        assert_eq!(format_timestamp(at), "2024-03-05T07:08:09.123Z");
    }

    #[test]
    fn system_clock_uses_same_shape() {
        let now = SystemClock.now();
        assert_eq!(now.len(), "2024-03-05T07:08:09.123Z".len());
        assert!(now.ends_with('Z'));
        assert_eq!(&now[10..11], "T");
    }
}
