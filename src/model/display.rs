// File: ./src/model/display.rs
use crate::dates;
use crate::model::columns::ColumnMap;
use crate::model::record::Record;

pub trait RecordDisplay {
    fn to_display_line(&self, columns: &ColumnMap) -> String;
    fn date_label(&self) -> String;
}

impl RecordDisplay for Record {
    fn date_label(&self) -> String {
        self.parsed_date
            .map(dates::format_date_time)
            .unwrap_or_else(|| "--/--/---- --:--".to_string())
    }

    /// `date | name | status | group / origin | #tags`
    fn to_display_line(&self, columns: &ColumnMap) -> String {
        let cell = |column: &str| {
            self.text(column)
                .map(|v| v.into_owned())
                .unwrap_or_else(|| "-".to_string())
        };

        let mut line = format!(
            "{} | {} | {} | {} / {}",
            self.date_label(),
            cell(&columns.name),
            cell(&columns.status),
            cell(&columns.group),
            cell(&columns.origin),
        );
        if !self.tags.is_empty() {
            line.push_str(" |");
            for tag in &self.tags {
                line.push_str(" #");
                line.push_str(tag);
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Normalizer, raw_row};

    #[test]
    fn display_line_shows_placeholders_and_tags() {
        let record = Normalizer::default().normalize(raw_row([
            ("name", "Ana"),
            ("created_at", "05/03/2024 09:07"),
            ("tags", "vip, quente"),
        ]));
        assert_eq!(
            record.to_display_line(&ColumnMap::default()),
            "05/03/2024 09:07 | Ana | - | - / - | #vip #quente"
        );
    }
}
