// File: ./src/model/normalizer.rs
// Turns parsed rows into records: derives the creation date and splits tags.
//
// Normalization never fails. Rows with missing or unparseable dates simply
// come out without `parsed_date`; partial exports are common.
use crate::dates;
use crate::model::columns::ColumnMap;
use crate::model::record::{FieldValue, RawRow, Record};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnMap,
}

impl Normalizer {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn normalize(&self, mut row: RawRow) -> Record {
        let parsed_date = self.derive_date(&mut row);

        let tags = match row.remove(&self.columns.tags) {
            Some(FieldValue::Text(raw)) => split_tags(&raw),
            _ => Vec::new(),
        };

        Record {
            fields: row,
            parsed_date,
            tags,
        }
    }

    pub fn normalize_all(&self, rows: Vec<RawRow>) -> Vec<Record> {
        rows.into_iter().map(|row| self.normalize(row)).collect()
    }

    fn derive_date(&self, row: &mut RawRow) -> Option<NaiveDateTime> {
        if let Some(value) = row.get(&self.columns.created_at)
            && !value.is_blank()
        {
            let text = value.as_text()?;
            let parsed = dates::parse_flexible(&text);
            if parsed.is_none() {
                log::debug!(
                    "Unparseable {} value: {:?}",
                    self.columns.created_at,
                    text
                );
            }
            return parsed;
        }

        // Legacy exports: strict day/month/year, rewritten to the canonical form.
        let legacy = row.get_mut(&self.columns.legacy_date)?;
        if legacy.is_blank() {
            return None;
        }
        let date = legacy
            .as_text()
            .and_then(|text| dates::parse_day_first_date(&text));
        match date {
            Some(date) => {
                *legacy = FieldValue::Text(dates::format_date(date));
                Some(dates::start_of_day(date))
            }
            None => {
                log::debug!("Unparseable legacy date: {:?}", legacy);
                None
            }
        }
    }
}

/// Comma-separated tag list: trimmed, empties dropped, order kept.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::raw_row;

    fn normalizer() -> Normalizer {
        Normalizer::default()
    }

    #[test]
    fn splits_and_trims_tags() {
        let record = normalizer().normalize(raw_row([("tags", " vip, ,quente ,, frio")]));
        assert_eq!(record.tags, vec!["vip", "quente", "frio"]);
        assert!(record.get("tags").is_none());
    }

    #[test]
    fn non_text_tags_become_empty() {
        let mut row = raw_row([("name", "Ana")]);
        row.insert("tags".to_string(), FieldValue::Number(3.0));
        assert!(normalizer().normalize(row).tags.is_empty());
        assert!(normalizer().normalize(raw_row([("name", "Ana")])).tags.is_empty());
    }

    #[test]
    fn created_at_day_first_with_time() {
        let record = normalizer().normalize(raw_row([("created_at", "15/03/2024 14:30")]));
        assert_eq!(
            record.parsed_date.unwrap().to_string(),
            "2024-03-15 14:30:00"
        );
    }

    #[test]
    fn created_at_falls_back_to_iso() {
        let record = normalizer().normalize(raw_row([("created_at", "2024-03-15 09:00:00")]));
        assert_eq!(
            record.parsed_date.unwrap().to_string(),
            "2024-03-15 09:00:00"
        );
    }

    #[test]
    fn unparseable_created_at_does_not_consult_legacy_column() {
        let record =
            normalizer().normalize(raw_row([("created_at", "soon"), ("data", "01/02/2024")]));
        assert!(record.parsed_date.is_none());
        assert_eq!(record.get("data").unwrap(), &FieldValue::from("01/02/2024"));
    }

    #[test]
    fn legacy_date_is_rewritten() {
        let record = normalizer().normalize(raw_row([("data", "1/2/2024")]));
        assert_eq!(record.parsed_date.unwrap().to_string(), "2024-02-01 00:00:00");
        assert_eq!(record.get("data").unwrap(), &FieldValue::from("01/02/2024"));
    }

    #[test]
    fn invalid_legacy_date_is_left_alone() {
        let record = normalizer().normalize(raw_row([("data", "31/02/2024")]));
        assert!(record.parsed_date.is_none());
        assert_eq!(record.get("data").unwrap(), &FieldValue::from("31/02/2024"));
    }

    #[test]
    fn no_date_columns() {
        let record = normalizer().normalize(raw_row([("name", "Ana"), ("status", "Aberto")]));
        assert!(record.parsed_date.is_none());
        assert_eq!(record.fields.len(), 2);
    }
}
