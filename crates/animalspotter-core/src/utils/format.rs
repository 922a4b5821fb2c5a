use chrono::{DateTime, TimeZone};

/// Format a position the way the detail view shows it
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("lat: {}, long: {}", latitude, longitude)
}

/// Short date and time, e.g. `9/13/20, 12:26 PM`
pub fn format_observed_at<Tz: TimeZone>(observed_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    observed_at.format("%-m/%-d/%y, %-I:%M %p").to_string()
}

/// Case-insensitive alphabetical copy of a name list. The API order is left
/// alone; this is for display only.
pub fn sorted_names(names: &[String]) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    sorted
}
