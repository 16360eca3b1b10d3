use crate::{
    error::{Result, WeatherError},
    model::SavedRecord,
};

const COLUMNS: [&str; 7] =
    ["id", "location", "start_date", "end_date", "temp_min", "temp_max", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("weather_data.{}", self.extension())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = WeatherError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(WeatherError::validation(format!(
                "Unknown export format '{value}'. Supported formats: json, csv, markdown."
            ))),
        }
    }
}

/// Render saved records in the chosen format.
///
/// CSV and Markdown values are written as-is: a comma or pipe inside a
/// location or description is not escaped.
pub fn export(records: &[SavedRecord], format: ExportFormat) -> Result<String> {
    if records.is_empty() {
        return Err(WeatherError::validation("no saved records to export"));
    }

    match format {
        ExportFormat::Json => serde_json::to_string_pretty(records)
            .map_err(|e| WeatherError::provider(format!("Failed to encode records as JSON: {e}"))),
        ExportFormat::Csv => {
            let mut out = COLUMNS.join(",");
            for record in records {
                out.push('\n');
                out.push_str(&values(record).join(","));
            }
            Ok(out)
        }
        ExportFormat::Markdown => {
            let mut out = table_row(COLUMNS.iter().map(|c| c.to_string()));
            out.push_str(&table_row(COLUMNS.iter().map(|_| "---".to_string())));
            for record in records {
                out.push_str(&table_row(values(record)));
            }
            Ok(out)
        }
    }
}

fn values(record: &SavedRecord) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.location.clone(),
        record.start_date.to_string(),
        record.end_date.to_string(),
        record.temp_min.to_string(),
        record.temp_max.to_string(),
        record.description.clone(),
    ]
}

fn table_row(cells: impl IntoIterator<Item = String>) -> String {
    let cells: Vec<String> = cells.into_iter().collect();
    format!("| {} |\n", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn records() -> Vec<SavedRecord> {
        vec![
            SavedRecord {
                id: 2,
                location: "Lisbon, PT".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                temp_min: 15.5,
                temp_max: 26.0,
                description: "clear sky".into(),
            },
            SavedRecord {
                id: 1,
                location: "Oslo".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                temp_min: -8.0,
                temp_max: -1.25,
                description: "snow".into(),
            },
        ]
    }

    #[test]
    fn parses_format_names() {
        assert_eq!(ExportFormat::try_from("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::try_from("md").unwrap(), ExportFormat::Markdown);
        assert!(matches!(ExportFormat::try_from("xml"), Err(WeatherError::Validation(_))));
        assert_eq!(ExportFormat::Markdown.default_file_name(), "weather_data.md");
    }

    #[test]
    fn csv_has_header_and_unescaped_rows() {
        let csv = export(&records(), ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,location,start_date,end_date,temp_min,temp_max,description");
        assert_eq!(lines[1], "2,Lisbon, PT,2024-06-01,2024-06-03,15.5,26,clear sky");
        assert_eq!(lines[2], "1,Oslo,2024-01-10,2024-01-12,-8,-1.25,snow");
    }

    #[test]
    fn markdown_is_a_table() {
        let md = export(&records(), ExportFormat::Markdown).unwrap();
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(
            lines[0],
            "| id | location | start_date | end_date | temp_min | temp_max | description |"
        );
        assert_eq!(lines[1], "| --- | --- | --- | --- | --- | --- | --- |");
        assert_eq!(lines[3], "| 1 | Oslo | 2024-01-10 | 2024-01-12 | -8 | -1.25 | snow |");
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn json_round_trips() {
        let json = export(&records(), ExportFormat::Json).unwrap();
        let back: Vec<SavedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records());
    }

    #[test]
    fn nothing_to_export_is_an_error() {
        let err = export(&[], ExportFormat::Json).unwrap_err();
        assert_eq!(err, WeatherError::validation("no saved records to export"));
    }
}
