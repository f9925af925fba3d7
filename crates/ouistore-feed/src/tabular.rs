//! Tabular feed parser.
//!
//! One record per line, four comma-delimited fields:
//! block-type tag, prefix (+ sub-block) hex, assignee, address.
//! Fields may be quoted and a quoted field may contain commas, so the
//! line is split by an explicit inside-quote/outside-quote scanner
//! rather than a plain `split(',')`. Quotes must close on the same
//! line; mid-field newlines are not supported.

use std::io::{BufRead, Lines};

use ouistore_types::{Block, OuiRecord, PREFIX_LEN};

use crate::error::{FeedError, ParseError};

const MIN_FIELDS: usize = 4;

/// Split one line into logical fields.
///
/// A field that starts with `"` runs until a closing `"` that lands on
/// a field boundary (followed by a comma or the end of the line); the
/// surrounding quotes are stripped and interior commas kept. Any other
/// quote character is ordinary field content.
pub fn split_fields(line: &str) -> Result<Vec<String>, ParseError> {
    let mut fields = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i <= bytes.len() {
        if i < bytes.len() && bytes[i] == b'"' {
            // Quoted field: scan for a closing quote at a field boundary.
            let start = i + 1;
            let mut j = start;
            let end = loop {
                if j >= bytes.len() {
                    return Err(ParseError::UnterminatedQuote {
                        raw: line.to_string(),
                    });
                }
                if bytes[j] == b'"' && (j + 1 == bytes.len() || bytes[j + 1] == b',') {
                    break j;
                }
                j += 1;
            };
            fields.push(line[start..end].to_string());
            // Skip the closing quote and the delimiter after it.
            i = end + 2;
        } else {
            let start = i;
            let mut j = i;
            while j < bytes.len() && bytes[j] != b',' {
                j += 1;
            }
            fields.push(line[start..j].trim().to_string());
            i = j + 1;
        }
    }

    Ok(fields)
}

/// Parse one tabular line into a canonical record.
pub fn parse_line(line: &str) -> Result<OuiRecord, ParseError> {
    let fields = split_fields(line)?;
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::FieldCount {
            expected: MIN_FIELDS,
            found: fields.len(),
            raw: line.to_string(),
        });
    }

    let hex = fields[1].trim();
    // Non-ASCII input falls through whole and is rejected by record
    // validation rather than sliced mid-character here.
    let (prefix, sub) = if hex.is_ascii() && hex.len() >= PREFIX_LEN {
        hex.split_at(PREFIX_LEN)
    } else {
        (hex, "")
    };

    let block = match fields[0].to_ascii_lowercase().as_str() {
        "ma-l" => Block::Large,
        "ma-m" => Block::Medium { sub: sub.to_string() },
        "ma-s" => Block::Small { sub: sub.to_string() },
        tag => {
            return Err(ParseError::UnknownTag {
                tag: tag.to_string(),
                raw: line.to_string(),
            });
        }
    };

    OuiRecord::new(prefix, block, &fields[2], Some(&fields[3])).map_err(|source| {
        ParseError::Record {
            source,
            raw: line.to_string(),
        }
    })
}

/// Iterator over the records of a tabular feed.
///
/// The first line is a column header and is skipped, as are blank
/// lines. Yields one result per data line so the caller can skip
/// malformed records without losing the rest of the feed.
pub struct TabularReader<R: BufRead> {
    lines: Lines<R>,
    header_skipped: bool,
}

impl<R: BufRead> TabularReader<R> {
    /// Wrap a buffered reader over tabular feed text.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            header_skipped: false,
        }
    }
}

impl<R: BufRead> Iterator for TabularReader<R> {
    type Item = Result<OuiRecord, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let line = line.trim_end_matches('\r');

            if !self.header_skipped {
                self.header_skipped = true;
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            return Some(parse_line(line).map_err(FeedError::from));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ouistore_types::BlockClass;

    #[test]
    fn test_split_plain_fields() {
        let fields = split_fields("MA-L,AABBCC,Example,1 Main St").unwrap();
        assert_eq!(fields, vec!["MA-L", "AABBCC", "Example", "1 Main St"]);
    }

    #[test]
    fn test_split_quoted_field_with_commas() {
        let fields = split_fields("MA-L,AABBCC,\"Example, Inc.\",123 Main St").unwrap();
        assert_eq!(fields[2], "Example, Inc.");
        assert_eq!(fields[3], "123 Main St");
    }

    #[test]
    fn test_split_quoted_last_field() {
        let fields = split_fields("MA-L,AABBCC,Example,\"123 Main St, Springfield, US\"").unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3], "123 Main St, Springfield, US");
    }

    #[test]
    fn test_split_unterminated_quote() {
        let err = split_fields("MA-L,AABBCC,\"Example Inc,123 Main St").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedQuote { .. }));
    }

    #[test]
    fn test_split_interior_quote_is_content() {
        // A quote that does not open the field stays in the field.
        let fields = split_fields("MA-L,AABBCC,Ex\"ample,addr").unwrap();
        assert_eq!(fields[2], "Ex\"ample");
    }

    #[test]
    fn test_parse_line_large() {
        let rec = parse_line("MA-L,AABBCC,\"Example, Inc.\",123 Main St").unwrap();
        assert_eq!(rec.class(), BlockClass::Large);
        assert_eq!(rec.prefix(), "AABBCC");
        assert_eq!(rec.sub(), "");
        assert_eq!(rec.assignee(), "Example, Inc.");
        assert_eq!(rec.address(), Some("123 Main St"));
    }

    #[test]
    fn test_parse_line_medium_splits_sub() {
        let rec = parse_line("MA-M,AABBCCD,Example,addr").unwrap();
        assert_eq!(rec.class(), BlockClass::Medium);
        assert_eq!(rec.prefix(), "AABBCC");
        assert_eq!(rec.sub(), "D");
    }

    #[test]
    fn test_parse_line_small_splits_sub() {
        let rec = parse_line("ma-s,AABBCCDEF,Example,addr").unwrap();
        assert_eq!(rec.class(), BlockClass::Small);
        assert_eq!(rec.prefix(), "AABBCC");
        assert_eq!(rec.sub(), "DEF");
    }

    #[test]
    fn test_parse_line_tag_case_insensitive() {
        assert!(parse_line("Ma-L,AABBCC,Example,addr").is_ok());
    }

    #[test]
    fn test_parse_line_unknown_tag() {
        let err = parse_line("MA-X,AABBCC,Example,addr").unwrap_err();
        assert!(matches!(err, ParseError::UnknownTag { .. }));
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        let err = parse_line("MA-L,AABBCC,Example").unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { found: 3, .. }));
    }

    #[test]
    fn test_parse_line_short_hex_rejected() {
        let err = parse_line("MA-L,AABB,Example,addr").unwrap_err();
        assert!(matches!(err, ParseError::Record { .. }));
    }

    #[test]
    fn test_reader_skips_header_and_blank_lines() {
        let feed = "Registry,Assignment,Organization Name,Organization Address\r\n\
                    MA-L,AABBCC,One,addr\r\n\
                    \r\n\
                    MA-L,DDEEFF,Two,addr\r\n";
        let records: Vec<_> = TabularReader::new(feed.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prefix(), "AABBCC");
        assert_eq!(records[1].prefix(), "DDEEFF");
    }

    #[test]
    fn test_reader_yields_error_without_stopping() {
        let feed = "header\nMA-L,AABBCC,One,addr\nMA-X,DDEEFF,Two,addr\nMA-L,001122,Three,addr\n";
        let results: Vec<_> = TabularReader::new(feed.as_bytes()).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(FeedError::Parse(ParseError::UnknownTag { .. }))
        ));
        assert!(results[2].is_ok());
    }
}
