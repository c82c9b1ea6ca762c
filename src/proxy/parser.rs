//! Candidate list parser
//!
//! The list is comma separated with CSV quoting, so provider names that
//! contain commas survive a rewrite and a later re-read.

use crate::error::RunError;
use crate::proxy::models::Candidate;
use std::fs;
use std::io;
use std::path::Path;

/// Parser for the delimited candidate list
pub struct CandidateParser;

impl CandidateParser {
    /// Parse a single line
    ///
    /// Returns `None` for blank lines and lines with fewer than two fields.
    /// Only the first two fields are used; the rest are ignored.
    pub fn parse_line(line: &str) -> Option<Candidate> {
        if line.trim().is_empty() {
            return None;
        }

        let fields = Self::split_fields(line);
        match fields.as_slice() {
            [ip, port, ..] => Some(Candidate::new(ip, port)),
            _ => None,
        }
    }

    /// Split a line into fields, honoring double-quoted fields
    pub fn split_fields(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut quoted = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' if field.is_empty() && !quoted => {
                    in_quotes = true;
                    quoted = true;
                }
                ',' if !in_quotes => {
                    fields.push(std::mem::take(&mut field));
                    quoted = false;
                }
                _ => field.push(c),
            }
        }
        fields.push(field);

        fields
    }

    /// Parse candidates from a string (multiple lines), keeping input order
    pub fn parse_string(content: &str) -> Vec<Candidate> {
        content.lines().filter_map(Self::parse_line).collect()
    }

    /// Parse candidates from a file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, RunError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RunError::InputNotFound(path.to_path_buf()),
            _ => RunError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Ok(Self::parse_string(&content))
    }

    /// Join fields into one line, quoting where the reader would need it
    pub fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
        fields
            .iter()
            .map(|field| Self::quote_field(field.as_ref()))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn quote_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}
