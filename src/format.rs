//! Display formatting for durations, pace, and distance.

fn pad(n: u64) -> String {
    format!("{:02}", n)
}

/// Formats a millisecond duration as `HH:MM:SS`, flooring to whole seconds.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{}:{}", pad(hours), pad(minutes), pad(seconds))
}

/// Formats average pace as `M:SS` minutes per kilometre.
///
/// Zero distance yields `0:00` rather than a division by zero.
pub fn format_pace(elapsed_ms: u64, total_distance_km: f64) -> String {
    if total_distance_km == 0.0 {
        return "0:00".to_string();
    }

    let pace_min_per_km = (elapsed_ms as f64 / 60_000.0) / total_distance_km;
    let minutes = pace_min_per_km.floor();
    let seconds = ((pace_min_per_km - minutes) * 60.0).floor();
    format!("{}:{}", minutes as u64, pad(seconds as u64))
}

/// Formats a distance in kilometres with two decimals, as shown on the
/// readout and in history cards.
pub fn format_distance_km(km: f64) -> String {
    format!("{:.2}", km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(0), "00:00:00");
    }

    #[test]
    fn test_format_duration_floors_subsecond_remainder() {
        assert_eq!(format_duration(999), "00:00:00");
        assert_eq!(format_duration(1000), "00:00:01");
        assert_eq!(format_duration(1999), "00:00:01");
    }

    #[test]
    fn test_format_duration_hours_minutes_seconds() {
        assert_eq!(format_duration(3_661_000), "01:01:01");
        assert_eq!(format_duration(59_000), "00:00:59");
        assert_eq!(format_duration(60_000), "00:01:00");
        assert_eq!(format_duration(3_600_000), "01:00:00");
    }

    #[test]
    fn test_format_duration_multi_hour() {
        // 25h 0m 1s: hours field keeps counting past a day
        assert_eq!(format_duration(90_001_000), "25:00:01");
    }

    #[test]
    fn test_format_pace_zero_distance() {
        assert_eq!(format_pace(0, 0.0), "0:00");
        assert_eq!(format_pace(600_000, 0.0), "0:00");
    }

    #[test]
    fn test_format_pace_whole_minutes() {
        // 10 minutes over 2 km -> 5:00 min/km
        assert_eq!(format_pace(600_000, 2.0), "5:00");
    }

    #[test]
    fn test_format_pace_fractional_seconds_floor() {
        // 5.125 min/km -> 7.5s fraction floors to 7, zero-padded
        assert_eq!(format_pace(307_500, 1.0), "5:07");
    }

    #[test]
    fn test_format_pace_half_minute() {
        // 5.5 min/km
        assert_eq!(format_pace(330_000, 1.0), "5:30");
    }

    #[test]
    fn test_format_distance_two_decimals() {
        assert_eq!(format_distance_km(0.0), "0.00");
        assert_eq!(format_distance_km(5.125), "5.13");
        assert_eq!(format_distance_km(12.3), "12.30");
    }
}
