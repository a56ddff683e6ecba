//! JSON rendering for search results.
//!
//! Output is always pure ASCII: anything outside the printable ASCII range is
//! written as a `\uXXXX` escape (surrogate pairs above the BMP). Pretty output
//! indents by two spaces and separates items with `", "` and keys with `": "`,
//! so a line that ends a member carries a trailing space before the newline.
//! Compact output uses `,` and `:` with no whitespace.

use crate::error::{DkapiError, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

const INDENT: &[u8] = b"  ";

pub fn render_json(value: &Value, compact: bool) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, AsciiFormatter::new(!compact));
    value.serialize(&mut serializer)?;
    String::from_utf8(out)
        .map_err(|e| DkapiError::Api(format!("Rendered JSON is not UTF-8: {}", e)))
}

struct AsciiFormatter {
    pretty: bool,
    depth: usize,
    has_value: bool,
}

impl AsciiFormatter {
    fn new(pretty: bool) -> Self {
        Self {
            pretty,
            depth: 0,
            has_value: false,
        }
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"\n")?;
        for _ in 0..self.depth {
            writer.write_all(INDENT)?;
        }
        Ok(())
    }

    fn open<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.depth -= 1;
        if self.pretty && self.has_value {
            self.newline(writer)?;
        }
        writer.write_all(bracket)
    }

    fn separate<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if self.pretty {
            if !first {
                writer.write_all(b", ")?;
            }
            self.newline(writer)
        } else if first {
            Ok(())
        } else {
            writer.write_all(b",")
        }
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.separate(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.separate(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        let separator: &[u8] = if self.pretty { b": " } else { b":" };
        writer.write_all(separator)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_uses_two_space_indent_and_spaced_separators() {
        let value = json!({"a": 1, "b": [true, null]});
        let rendered = render_json(&value, false).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"a\": 1, \n  \"b\": [\n    true, \n    null\n  ]\n}"
        );
    }

    #[test]
    fn compact_has_no_whitespace() {
        let value = json!({"a": 1, "b": [true, null], "c": {}});
        assert_eq!(
            render_json(&value, true).unwrap(),
            r#"{"a":1,"b":[true,null],"c":{}}"#
        );
    }

    #[test]
    fn empty_containers_stay_inline_when_pretty() {
        let value = json!({"list": [], "map": {}});
        assert_eq!(
            render_json(&value, false).unwrap(),
            "{\n  \"list\": [], \n  \"map\": {}\n}"
        );
    }

    #[test]
    fn non_ascii_is_escaped() {
        let value = json!({"unit": "10 µF ±5%", "emoji": "😀"});
        let rendered = render_json(&value, true).unwrap();
        assert_eq!(
            rendered,
            r#"{"unit":"10 \u00b5F \u00b15%","emoji":"\ud83d\ude00"}"#
        );
        assert!(rendered.is_ascii());
    }

    #[test]
    fn null_renders_as_null() {
        assert_eq!(render_json(&Value::Null, false).unwrap(), "null");
        assert_eq!(render_json(&Value::Null, true).unwrap(), "null");
    }

    #[test]
    fn preserves_key_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2}"#).unwrap();
        assert_eq!(render_json(&value, true).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
