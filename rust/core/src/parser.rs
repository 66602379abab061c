// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF Parser
//!
//! Line-by-line object reader. `!` starts a comment that runs to the end of
//! the line (this covers both full-line `!` comments and inline `!-` field
//! labels). Objects may span lines and end at the first `;` that is not
//! escaped as `\;`. An object left open at end of input is an error.

use std::io::BufRead;

use crate::document::{Fields, ObjectRecord, ParsedDocument};
use crate::error::{Error, Result};

/// Strip the comment part of a physical line
#[inline]
fn strip_comment(line: &str) -> &str {
    match memchr::memchr(b'!', line.as_bytes()) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Position of the first unescaped `;`
#[inline]
fn find_terminator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    memchr::memchr_iter(b';', bytes).find(|&pos| pos == 0 || bytes[pos - 1] != b'\\')
}

/// Split a complete object body (terminator excluded) into type and fields
fn split_object(body: &str) -> (String, Fields) {
    let mut parts = body.split(',').map(|f| f.trim().replace("\\;", ";"));
    let object_type = parts.next().unwrap_or_default().to_ascii_uppercase();
    let mut fields: Fields = parts.collect();
    // "A, b, ;" leaves one empty field behind the last comma
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    (object_type, fields)
}

/// Streaming object reader - yields one `(type, record)` per terminated object
pub struct ObjectReader<R> {
    reader: R,
    line_buf: String,
    line_no: usize,
    /// Text of the object being assembled
    pending: String,
    /// Line the pending object started on
    pending_line: usize,
    /// Objects completed on the current line but not yet returned
    ready: std::collections::VecDeque<(String, ObjectRecord)>,
    done: bool,
}

impl<R: BufRead> ObjectReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::new(),
            line_no: 0,
            pending: String::new(),
            pending_line: 0,
            ready: Default::default(),
            done: false,
        }
    }

    /// Current physical line number
    pub fn line(&self) -> usize {
        self.line_no
    }

    fn append(&mut self, segment: &str) {
        if self.pending.trim().is_empty() {
            self.pending.clear();
            if segment.trim().is_empty() {
                return;
            }
            self.pending_line = self.line_no;
        } else {
            self.pending.push('\n');
        }
        self.pending.push_str(segment);
    }

    fn finish_object(&mut self) -> Result<()> {
        let body = std::mem::take(&mut self.pending);
        if body.trim().is_empty() {
            return Ok(());
        }
        let (object_type, fields) = split_object(&body);
        if object_type.is_empty() {
            return Err(Error::parse(
                self.pending_line,
                "",
                "object has no type name",
            ));
        }
        self.ready
            .push_back((object_type, ObjectRecord::new(fields, self.pending_line)));
        Ok(())
    }

    /// Consume one physical line, queueing any objects it terminates
    fn feed_line(&mut self) -> Result<bool> {
        self.line_buf.clear();
        if self.reader.read_line(&mut self.line_buf)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;

        let line = std::mem::take(&mut self.line_buf);
        let mut rest = strip_comment(&line);
        while let Some(pos) = find_terminator(rest) {
            self.append(&rest[..pos]);
            self.finish_object()?;
            rest = &rest[pos + 1..];
        }
        self.append(rest.trim_end_matches(&['\r', '\n'][..]));
        self.line_buf = line;
        Ok(true)
    }

    /// Next terminated object, `None` at end of input
    pub fn next_object(&mut self) -> Result<Option<(String, ObjectRecord)>> {
        loop {
            if let Some(obj) = self.ready.pop_front() {
                return Ok(Some(obj));
            }
            if self.done {
                return Ok(None);
            }
            if !self.feed_line()? {
                self.done = true;
                if !self.pending.trim().is_empty() {
                    let (object_type, _) = split_object(&self.pending);
                    return Err(Error::parse(
                        self.pending_line,
                        object_type,
                        "unterminated object at end of input (missing ';')",
                    ));
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for ObjectReader<R> {
    type Item = Result<(String, ObjectRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_object().transpose()
    }
}

/// Parse a document from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedDocument> {
    let mut doc = ParsedDocument::new();
    let mut objects = ObjectReader::new(reader);
    while let Some((object_type, record)) = objects.next_object()? {
        doc.push(&object_type, record);
    }
    Ok(doc)
}

/// Parse a document held in memory
pub fn parse_str(content: &str) -> Result<ParsedDocument> {
    parse_reader(content.as_bytes())
}

/// Parse a document from a file path
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<ParsedDocument> {
    let file = std::fs::File::open(path)?;
    parse_reader(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("  Core_ZN,  !- Name"), "  Core_ZN,  ");
        assert_eq!(strip_comment("! full line"), "");
        assert_eq!(strip_comment("no comment"), "no comment");
    }

    #[test]
    fn test_find_terminator() {
        assert_eq!(find_terminator("a,b;"), Some(3));
        assert_eq!(find_terminator("a\\;b;"), Some(4));
        assert_eq!(find_terminator("a,b,"), None);
    }

    #[test]
    fn test_split_object() {
        let (t, f) = split_object("Zone, Core_ZN , 0");
        assert_eq!(t, "ZONE");
        assert_eq!(f.as_slice(), ["Core_ZN", "0"]);

        let (_, f) = split_object("Version,9.6,");
        assert_eq!(f.as_slice(), ["9.6"]);

        let (_, f) = split_object("Output:Variable,*,Site Temp\\;x");
        assert_eq!(f.as_slice(), ["*", "Site Temp;x"]);
    }

    #[test]
    fn test_multiline_object() {
        let content = "\
! Header comment
Zone,
  Core_ZN,                 !- Name
  0,                       !- Direction of Relative North {deg}
  autocalculate;           !- Floor Area {m2}

Version,9.6;
";
        let doc = parse_str(content).unwrap();
        let zones = doc.get("ZONE");
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].fields(), ["Core_ZN", "0", "autocalculate"]);
        assert_eq!(zones[0].line(), 2);
        assert_eq!(doc.get("VERSION")[0].field(0), Some("9.6"));
    }

    #[test]
    fn test_two_objects_one_line() {
        let doc = parse_str("Timestep,4;Version,9.6;").unwrap();
        assert_eq!(doc.get("TIMESTEP")[0].number(0), Some(4.0));
        assert_eq!(doc.get("VERSION")[0].field(0), Some("9.6"));
    }

    #[test]
    fn test_unterminated_object() {
        let content = "Version,9.6;\n\nZone,\n  Core_ZN,\n  0,\n";
        let err = parse_str(content).unwrap_err();
        match err {
            Error::Parse { line, object_type, .. } => {
                assert_eq!(line, 3);
                assert_eq!(object_type, "ZONE");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_semicolon_in_comment_is_ignored() {
        let doc = parse_str("Zone,\n  A;  !- name; not a terminator\n").unwrap();
        assert_eq!(doc.get("ZONE").len(), 1);
    }

    #[test]
    fn test_object_reader_iterator() {
        let content = "Zone,A;\nZone,B;\nPeople,P1,A;\n";
        let types: Vec<String> = ObjectReader::new(content.as_bytes())
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(types, vec!["ZONE", "ZONE", "PEOPLE"]);
    }
}
