//! Registry-text feed parser.
//!
//! Records are blank-line-delimited groups. The first line carries a
//! hyphenated hex prefix token and the organization name; the next
//! line, when present, carries a base-16 range whose bounds determine
//! the block granularity. Any contact-detail lines that follow are
//! consumed and discarded. A one-line lookahead keeps the reader from
//! overrunning into the next group.

use std::io::{BufRead, Lines};
use std::iter::Peekable;

use ouistore_types::{Block, OuiRecord, PREFIX_LEN};

use crate::error::{FeedError, ParseError};

/// Iterator over the records of a registry-text feed.
///
/// Yields one result per group. When a group fails to parse the rest
/// of the group is still consumed, so iteration resumes cleanly at the
/// next record.
pub struct RegistryReader<R: BufRead> {
    lines: Peekable<Lines<R>>,
}

impl<R: BufRead> RegistryReader<R> {
    /// Wrap a buffered reader over registry feed text.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines().peekable(),
        }
    }

    /// Peek the next line without consuming it. I/O errors are left in
    /// place for the subsequent `next_line` call to surface.
    fn peek_line(&mut self) -> Option<&str> {
        match self.lines.peek() {
            Some(Ok(line)) => Some(line.trim_end_matches('\r')),
            _ => None,
        }
    }

    fn next_line(&mut self) -> Option<Result<String, std::io::Error>> {
        self.lines
            .next()
            .map(|r| r.map(|l| l.trim_end_matches('\r').to_string()))
    }

    /// Consume lines up to (not including) the next blank line or EOF.
    fn skip_group_remainder(&mut self) {
        while let Some(line) = self.peek_line() {
            if line.trim().is_empty() {
                break;
            }
            self.lines.next();
        }
    }
}

impl<R: BufRead> Iterator for RegistryReader<R> {
    type Item = Result<OuiRecord, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip blank lines between groups.
        let header = loop {
            match self.next_line()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => break line,
                Err(e) => return Some(Err(e.into())),
            }
        };

        let (prefix, assignee) = match parse_header(&header) {
            Ok(parts) => parts,
            Err(e) => {
                self.skip_group_remainder();
                return Some(Err(e.into()));
            }
        };

        // The range line, when present, directly follows the name line.
        // Anything that does not look like one is a contact line and
        // means the block is large by default.
        let block = match self.peek_line().and_then(range_bounds) {
            Some(bounds) => {
                let raw = self
                    .next_line()
                    .and_then(Result::ok)
                    .unwrap_or_default();
                match infer_block(&bounds, &raw) {
                    Ok(block) => block,
                    Err(e) => {
                        self.skip_group_remainder();
                        return Some(Err(e.into()));
                    }
                }
            }
            None => Block::Large,
        };

        self.skip_group_remainder();

        Some(
            OuiRecord::new(&prefix, block, &assignee, None)
                .map_err(|source| {
                    FeedError::Parse(ParseError::Record {
                        source,
                        raw: header,
                    })
                }),
        )
    }
}

/// Split a group header into its hex prefix and the organization name.
///
/// The prefix token ends at the first run of whitespace; a following
/// `(hex)` marker, when present, is dropped.
fn parse_header(line: &str) -> Result<(String, String), ParseError> {
    let trimmed = line.trim();
    let (token, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    let prefix: String = token.chars().filter(|c| *c != '-' && *c != ':').collect();

    let mut name = rest.trim_start();
    if let Some(stripped) = name.strip_prefix("(hex)") {
        name = stripped.trim_start();
    }
    if name.is_empty() {
        return Err(ParseError::MissingAssignee {
            raw: line.to_string(),
        });
    }

    Ok((prefix, name.trim_end().to_string()))
}

/// Extract the hex digits of a candidate range line.
///
/// Cuts off a trailing `(base 16)` annotation, strips separators and
/// whitespace, and returns the remaining digits uppercased. `None`
/// means the line is not a range line at all (a contact line).
fn range_bounds(line: &str) -> Option<String> {
    let cut = line.split("(base").next().unwrap_or(line);
    let digits: String = cut
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != ':')
        .collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits.to_ascii_uppercase())
}

/// Infer the block granularity from a range's stripped hex digits.
///
/// Six digits are a bare prefix restatement (a large block); twelve are
/// a low-high bound pair over the lower half of the address space:
///
/// - low `0...0`, high `F...F` spans the whole prefix: large;
/// - low `X00000`, high `XFFFFF`: medium, sub-block `X`;
/// - low `XYZ000`, high `XYZFFF`: small, sub-block `XYZ`.
fn infer_block(digits: &str, raw: &str) -> Result<Block, ParseError> {
    let unknown = || ParseError::UnknownRange {
        raw: raw.to_string(),
    };

    if digits.len() == PREFIX_LEN {
        return Ok(Block::Large);
    }
    if digits.len() != 2 * PREFIX_LEN {
        return Err(unknown());
    }

    let (low, high) = digits.split_at(PREFIX_LEN);
    let zeros = |s: &str| s.bytes().all(|b| b == b'0');
    let effs = |s: &str| s.bytes().all(|b| b == b'F');

    if zeros(low) && effs(high) {
        Ok(Block::Large)
    } else if zeros(&low[1..]) && effs(&high[1..]) {
        Ok(Block::Medium {
            sub: high[..1].to_string(),
        })
    } else if zeros(&low[3..]) && effs(&high[3..]) {
        Ok(Block::Small {
            sub: high[..3].to_string(),
        })
    } else {
        Err(unknown())
    }
}
