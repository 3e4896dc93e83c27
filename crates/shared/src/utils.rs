//! Small helpers shared by clients and services.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Calendar date of `instant` in UTC, formatted `YYYY-MM-DD`.
#[must_use]
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Fresh random (v4) identifier.
#[must_use]
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03-01T23:59:59Z", "2024-03-01")]
    #[case("2024-03-01T23:30:00-02:00", "2024-03-02")]
    fn dates_are_rendered_in_utc(#[case] instant: &str, #[case] expected: &str) {
        let parsed = DateTime::parse_from_rfc3339(instant)
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(format_date(parsed), expected);
    }

    #[rstest]
    fn generated_ids_are_random_v4() {
        let first = generate_id();
        assert_eq!(first.get_version_num(), 4);
        assert_ne!(first, generate_id());
    }
}
