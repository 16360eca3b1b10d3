use chrono::{DateTime, Local};
use tripcast_core::{SavedRecord, SearchOutcome, WeatherSummary};

fn format_day(dt: i64) -> String {
    DateTime::from_timestamp(dt, 0)
        .map(|utc| utc.with_timezone(&Local).format("%a, %b %-d").to_string())
        .unwrap_or_else(|| dt.to_string())
}

pub fn print_summary_line(summary: &WeatherSummary) {
    println!(
        "{}: {:.1}°C .. {:.1}°C, {}",
        summary.location, summary.temp_min, summary.temp_max, summary.description
    );
}

pub fn print_outcome(outcome: &SearchOutcome) {
    let summary = &outcome.summary;
    let current = &summary.current;

    println!("{}", summary.location);
    println!();

    let condition = current.weather.first().map(|w| w.description.as_str()).unwrap_or("");
    print!("Now: {:.1}°C {condition}", current.temp);
    if let Some(feels_like) = current.feels_like {
        print!(", feels like {feels_like:.1}°C");
    }
    if let Some(humidity) = current.humidity {
        print!(", humidity {humidity}%");
    }
    if let Some(wind) = current.wind_speed {
        print!(", wind {wind:.1} m/s");
    }
    println!();
    println!();

    for day in &summary.daily {
        let description = day.weather.first().map(|w| w.description.as_str()).unwrap_or("");
        println!(
            "  {:<12} {:>6.1}°C {:>6.1}°C  {description}",
            format_day(day.dt),
            day.temp.min,
            day.temp.max,
        );
    }
    println!();

    print_summary_line(summary);
    println!("Map: {}", outcome.map_url);

    if !outcome.videos.is_empty() {
        println!();
        println!("Travel videos:");
        for video in &outcome.videos {
            println!("  {} - {}", video.title, video.watch_url());
        }
    }
}

pub fn print_records(records: &[SavedRecord]) {
    if records.is_empty() {
        println!("No saved records.");
        return;
    }

    for record in records {
        println!(
            "#{:<4} {}  {} .. {}  {:.1}°C .. {:.1}°C  {}",
            record.id,
            record.location,
            record.start_date,
            record.end_date,
            record.temp_min,
            record.temp_max,
            record.description,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_days_like_a_calendar_heading() {
        let noon = chrono::NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
            .timestamp();

        assert_eq!(format_day(noon), "Mon, Jun 3");
    }
}
