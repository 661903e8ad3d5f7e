// File: ./src/loader.rs
// Fetches tabular text, parses it into header-keyed rows and normalizes them.
//
// A load either yields the complete record list or an error; callers replace
// their dataset only on success.
use crate::config::Config;
use crate::errors::{LoadError, ParseWarning};
use crate::model::{ColumnMap, FieldValue, Normalizer, RawRow, Record};
use crate::source::TabularSource;
use std::sync::Arc;

/// Where the CSV comes from: inline text or a path / URL handed to a `TabularSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text(String),
    Locator(String),
    /// Candidates tried in order; the first that fetches and looks like CSV wins.
    Locators(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Lines starting with this byte are skipped.
    pub comment_prefix: Option<u8>,
    pub dynamic_typing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_prefix: Some(b'#'),
            dynamic_typing: false,
        }
    }
}

impl ParseOptions {
    pub fn from_config(config: &Config) -> Self {
        let comment_prefix = match config.comment_prefix {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => {
                log::warn!("Comment prefix {:?} is not ASCII, ignoring it", c);
                None
            }
            None => None,
        };
        Self {
            comment_prefix,
            dynamic_typing: config.dynamic_typing,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub warnings: Vec<ParseWarning>,
}

/// Servers that are misconfigured hand back an HTML page with a 200.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Cheap pre-parse check used to skip candidate locators: not HTML, and the
/// first non-comment line carries a `,`, `;` or tab.
pub fn is_valid_csv(text: &str, options: &ParseOptions) -> bool {
    if text.trim().is_empty() || looks_like_html(text) {
        return false;
    }
    let first_line = text.lines().find(|line| match options.comment_prefix {
        Some(prefix) => !line.as_bytes().starts_with(&[prefix]),
        None => true,
    });
    first_line.is_some_and(|line| line.contains(|c: char| matches!(c, ',' | ';' | '\t')))
}

/// Header-driven, comma-delimited parse. Row problems become warnings;
/// only an unreadable header or an I/O failure aborts.
pub fn parse_table(text: &str, options: &ParseOptions) -> Result<ParsedTable, LoadError> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .comment(options.comment_prefix);
    let mut reader = builder.from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::ParseFailure(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(LoadError::ParseFailure("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for result in reader.records() {
        match result {
            Ok(record) => {
                if record.iter().all(str::is_empty) {
                    log::debug!(
                        "Skipping empty row at line {:?}",
                        record.position().map(|p| p.line())
                    );
                    continue;
                }
                let line = record.position().map(|p| p.line());
                if record.len() != headers.len() {
                    warnings.push(ParseWarning {
                        line,
                        message: format!(
                            "expected {} fields, found {}",
                            headers.len(),
                            record.len()
                        ),
                    });
                }
                let row: RawRow = headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(header, _)| !header.is_empty())
                    .map(|(header, value)| {
                        (
                            header.clone(),
                            FieldValue::from_cell(value, options.dynamic_typing),
                        )
                    })
                    .collect();
                rows.push(row);
            }
            Err(err) => {
                if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                    return Err(LoadError::ParseFailure(err.to_string()));
                }
                warnings.push(ParseWarning {
                    line: err.position().map(|p| p.line()),
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(ParsedTable {
        headers,
        rows,
        warnings,
    })
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub warnings: Vec<ParseWarning>,
}

pub struct Loader {
    source: Arc<dyn TabularSource>,
    options: ParseOptions,
    normalizer: Normalizer,
}

impl Loader {
    pub fn new(source: Arc<dyn TabularSource>, options: ParseOptions, columns: ColumnMap) -> Self {
        Self {
            source,
            options,
            normalizer: Normalizer::new(columns),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub async fn load(&self, source: &Source) -> Result<LoadOutcome, LoadError> {
        match source {
            Source::Text(text) => {
                if text.trim().is_empty() {
                    return Err(LoadError::EmptySource);
                }
                self.load_text(text)
            }
            Source::Locator(locator) => {
                let locator = locator.trim();
                if locator.is_empty() {
                    log::error!("No CSV locator provided");
                    return Err(LoadError::EmptySource);
                }
                let text = self.fetch_locator(locator).await?;
                self.load_text(&text)
            }
            Source::Locators(locators) => {
                let text = self.fetch_first_valid(locators).await?;
                self.load_text(&text)
            }
        }
    }

    async fn fetch_locator(&self, locator: &str) -> Result<String, LoadError> {
        log::info!("Loading CSV from {}", locator);
        let text = self.source.fetch_text(locator).await.map_err(|e| {
            log::error!("Failed to fetch {}: {}", locator, e);
            LoadError::from(e)
        })?;
        if text.trim().is_empty() {
            log::error!("{} is empty", locator);
            return Err(LoadError::EmptyDataset);
        }
        Ok(text)
    }

    /// Skips candidates that fail to fetch or do not pass `is_valid_csv`.
    /// When none qualifies, the last candidate's error is returned.
    async fn fetch_first_valid(&self, locators: &[String]) -> Result<String, LoadError> {
        let mut last_error = None;
        for locator in locators.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            let text = match self.fetch_locator(locator).await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            };
            if is_valid_csv(&text, &self.options) {
                return Ok(text);
            }
            log::warn!("Content at {} does not look like CSV, trying next", locator);
            last_error = Some(if looks_like_html(&text) {
                LoadError::HtmlPayload
            } else {
                LoadError::ParseFailure(format!("no delimiter in the first line of {}", locator))
            });
        }
        Err(last_error.unwrap_or(LoadError::EmptySource))
    }

    /// Parses already-fetched text.
    pub fn load_text(&self, text: &str) -> Result<LoadOutcome, LoadError> {
        if looks_like_html(text) {
            log::error!("Received HTML instead of CSV");
            return Err(LoadError::HtmlPayload);
        }

        let table = parse_table(text, &self.options)?;
        for warning in &table.warnings {
            log::warn!("CSV warning at {}", warning);
        }

        if table.rows.is_empty() {
            log::error!("CSV has no data rows");
            return Err(LoadError::EmptyDataset);
        }

        log::info!(
            "CSV loaded: {} records, {} columns",
            table.rows.len(),
            table.headers.len()
        );
        Ok(LoadOutcome {
            records: self.normalizer.normalize_all(table.rows),
            warnings: table.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_sniffing() {
        assert!(looks_like_html("  <!DOCTYPE html><html>"));
        assert!(looks_like_html("<HTML><body>"));
        assert!(!looks_like_html("name,email\n"));
        assert!(!looks_like_html(""));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# exported 2024-03-15\nname,status\n\nAna,Aberto\n# trailer\n,\nBia,Ganho\n";
        let table = parse_table(text, &ParseOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["name", "status"]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn ragged_rows_warn_but_survive() {
        let text = "name,status,email\nAna,Aberto\nBia,Ganho,bia@x.com,extra\n";
        let table = parse_table(text, &ParseOptions::default()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.warnings.len(), 2);
        assert_eq!(table.warnings[0].line, Some(2));
        assert!(!table.rows[0].contains_key("email"));
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let text = "name,tags\n\"Souza, Ana\",\"vip, quente\"\n";
        let table = parse_table(text, &ParseOptions::default()).unwrap();
        assert_eq!(table.rows[0]["name"], FieldValue::from("Souza, Ana"));
        assert_eq!(table.rows[0]["tags"], FieldValue::from("vip, quente"));
    }

    #[test]
    fn headers_are_trimmed() {
        let text = " name , status \nAna,Aberto\n";
        let table = parse_table(text, &ParseOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["name", "status"]);
    }

    #[test]
    fn dynamic_typing_is_opt_in() {
        let text = "name,score\nAna,42\n";
        let typed = ParseOptions {
            dynamic_typing: true,
            ..ParseOptions::default()
        };
        let table = parse_table(text, &typed).unwrap();
        assert_eq!(table.rows[0]["score"], FieldValue::Number(42.0));
        let table = parse_table(text, &ParseOptions::default()).unwrap();
        assert_eq!(table.rows[0]["score"], FieldValue::from("42"));
    }

    #[test]
    fn csv_validity_needs_a_delimiter() {
        let options = ParseOptions::default();
        assert!(is_valid_csv("name,status\nAna,Aberto\n", &options));
        assert!(is_valid_csv("# export\nname;status\n", &options));
        assert!(is_valid_csv("name\tstatus\n", &options));
        assert!(!is_valid_csv("just some text\nmore text\n", &options));
        assert!(!is_valid_csv("<html><body>a,b</body></html>", &options));
        assert!(!is_valid_csv("  \n", &options));
    }

    #[test]
    fn comment_only_text_has_no_header() {
        let err = parse_table("# nothing here\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure(_)));
    }
}
