// Row parser for the bulk source format: `owner,title,artist,year`, one
// record per line, optional header, optional surrounding quotes. Rows
// that cannot be used are skipped and reported, never fatal.

use std::fmt;

use crate::types::Record;

const MIN_COLUMNS: usize = 4;

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    TooFewColumns { found: usize },
    InvalidYear(String),
}

/// A skipped row, with its 1-based line number in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    pub line: usize,
    pub issue: RowIssue,
    pub content: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            RowIssue::TooFewColumns { found } => write!(
                f,
                "line {} has too few columns ({found} of {MIN_COLUMNS}): {}",
                self.line, self.content
            ),
            RowIssue::InvalidYear(year) => write!(
                f,
                "line {} has an invalid year '{year}': {}",
                self.line, self.content
            ),
        }
    }
}

/// Valid records in source order plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub records: Vec<Record>,
    pub warnings: Vec<RowWarning>,
}

/// Parse a whole text blob, one row per line.
pub fn parse_str(text: &str) -> ParsedRows {
    parse_lines(text.lines())
}

/// Parse rows into records. A first line mentioning "owner" or "title"
/// (any case) is treated as a header and dropped.
pub fn parse_lines<I, S>(lines: I) -> ParsedRows
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter().peekable();
    let mut parsed = ParsedRows::default();

    let Some(first) = lines.peek() else {
        return parsed;
    };

    let offset = if is_header(first.as_ref()) {
        lines.next();
        2
    } else {
        1
    };

    for (index, line) in lines.enumerate() {
        let line = line.as_ref();
        match parse_row(line) {
            Ok(record) => parsed.records.push(record),
            Err(issue) => {
                let warning = RowWarning {
                    line: index + offset,
                    issue,
                    content: line.to_string(),
                };
                tracing::warn!(line = warning.line, content = %warning.content, "skipping row: {warning}");
                parsed.warnings.push(warning);
            }
        }
    }

    parsed
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("owner") || lower.contains("title")
}

fn parse_row(line: &str) -> Result<Record, RowIssue> {
    let fields: Vec<&str> = line.split(',').map(clean_field).collect();

    if fields.len() < MIN_COLUMNS {
        return Err(RowIssue::TooFewColumns {
            found: fields.len(),
        });
    }

    let year = fields[3]
        .parse::<i32>()
        .map_err(|_| RowIssue::InvalidYear(fields[3].to_string()))?;

    Ok(Record::new(fields[0], fields[1], fields[2], year))
}

/// Trim, then drop one pair of surrounding double quotes.
fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_nothing() {
        let parsed = parse_lines(Vec::<String>::new());
        assert!(parsed.records.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_quoted_fields_are_unwrapped() {
        let parsed = parse_lines([r#""Max","Dark Side","Pink Floyd",1973"#]);
        assert_eq!(
            parsed.records,
            vec![Record::new("Max", "Dark Side", "Pink Floyd", 1973)]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_short_row_is_skipped_and_rest_continues() {
        let parsed = parse_lines([
            "Anna,Abbey Road,The Beatles,1969",
            "bad,row",
            "Peter,Rumours,Fleetwood Mac,1977",
        ]);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].owner, "Peter");
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 2);
        assert_eq!(
            parsed.warnings[0].issue,
            RowIssue::TooFewColumns { found: 2 }
        );
        assert_eq!(parsed.warnings[0].content, "bad,row");
    }

    #[test]
    fn test_non_numeric_year_is_skipped() {
        let parsed = parse_lines([r#""A","B","C","notayear""#]);
        assert!(parsed.records.is_empty());
        assert_eq!(
            parsed.warnings[0].issue,
            RowIssue::InvalidYear("notayear".into())
        );
    }

    #[test]
    fn test_header_is_dropped_case_insensitively() {
        let parsed = parse_lines(["OWNER,Title,Artist,Year", "Lisa,Hotel California,Eagles,1976"]);
        assert_eq!(
            parsed.records,
            vec![Record::new("Lisa", "Hotel California", "Eagles", 1976)]
        );
    }

    #[test]
    fn test_header_detected_by_title_alone() {
        let parsed = parse_lines(["who,title,by,when", "Tom,Led Zeppelin IV,Led Zeppelin,1971"]);
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_line_numbers_account_for_header() {
        let with_header = parse_lines(["owner,title,artist,year", "x,y"]);
        assert_eq!(with_header.warnings[0].line, 2);

        let without_header = parse_lines(["x,y"]);
        assert_eq!(without_header.warnings[0].line, 1);
    }

    #[test]
    fn test_data_first_line_is_kept() {
        let parsed = parse_lines(["Sarah,Thriller,Michael Jackson,1982"]);
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_empty_strings_pass_through() {
        let parsed = parse_lines([r#""","","",2000"#]);
        assert_eq!(parsed.records, vec![Record::new("", "", "", 2000)]);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let parsed = parse_lines(["Chris,Back in Black,AC/DC,1980,extra,fields"]);
        assert_eq!(
            parsed.records,
            vec![Record::new("Chris", "Back in Black", "AC/DC", 1980)]
        );
    }

    #[test]
    fn test_whitespace_and_quoted_year() {
        let parsed = parse_lines([r#"  Emma , "The Wall" ,Pink Floyd, "1979" "#]);
        assert_eq!(
            parsed.records,
            vec![Record::new("Emma", "The Wall", "Pink Floyd", 1979)]
        );
    }

    #[test]
    fn test_lone_quote_is_not_stripped() {
        assert_eq!(clean_field("\""), "\"");
        assert_eq!(clean_field("\"\""), "");
        assert_eq!(clean_field("\"half"), "\"half");
    }

    #[test]
    fn test_embedded_commas_split_fields() {
        // quoted commas are not escaped, so the row shifts and the year fails
        let parsed = parse_lines([r#""Alex","Appetite, for Destruction","Guns N' Roses",1987"#]);
        assert!(parsed.records.is_empty());
        assert!(matches!(
            parsed.warnings[0].issue,
            RowIssue::InvalidYear(_)
        ));
    }

    #[test]
    fn test_parse_str_splits_lines() {
        let text = "owner,title,artist,year\nMike,Nevermind,Nirvana,1991\nJulia,OK Computer,Radiohead,1997\n";
        let parsed = parse_str(text);
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_warning_display_mentions_line_and_content() {
        let parsed = parse_lines(["owner,title,artist,year", "bad,row"]);
        let text = parsed.warnings[0].to_string();
        assert!(text.contains("line 2"));
        assert!(text.contains("bad,row"));
    }
}
