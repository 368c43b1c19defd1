use alloc::string::String;
use alloc::vec::Vec;

use clasp_codec::{FieldValue, TokenSink};

/// Options for JSON serialization.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Whether to pretty-print with indentation (default: false)
    pub pretty: bool,

    /// Indentation string for pretty-printing (default: "  ")
    pub indent: &'static str,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializeOptions {
    /// Compact output.
    pub const fn new() -> Self {
        Self {
            pretty: false,
            indent: "  ",
        }
    }

    /// Enable pretty-printing with default indentation.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set a custom indentation string (implies pretty-printing).
    pub const fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self.pretty = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Ctx {
    Object { first: bool },
    Array { first: bool },
}

/// A [`TokenSink`] that renders JSON text.
///
/// Integers are written without a decimal point; reals always carry a `.`
/// or an exponent, so they read back as reals. JSON has no literal for
/// NaN or the infinities, which are written as `null`.
///
/// ```
/// use clasp_codec::TokenSink;
/// use clasp_json::JsonWriter;
///
/// let mut writer = JsonWriter::new();
/// writer.begin_object();
/// writer.key("count");
/// writer.integer(2);
/// writer.key("ratio");
/// writer.real(2.0);
/// writer.end_object();
/// assert_eq!(writer.finish(), r#"{"count":2,"ratio":2.0}"#);
/// ```
#[derive(Debug)]
pub struct JsonWriter {
    out: String,
    stack: Vec<Ctx>,
    options: SerializeOptions,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    /// A writer producing compact output.
    pub const fn new() -> Self {
        Self::with_options(SerializeOptions::new())
    }

    /// A writer with the given options.
    pub const fn with_options(options: SerializeOptions) -> Self {
        Self {
            out: String::new(),
            stack: Vec::new(),
            options,
        }
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the writer and return the text.
    pub fn finish(self) -> String {
        self.out
    }

    fn write_indent(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..self.stack.len() {
                self.out.push_str(self.options.indent);
            }
        }
    }

    fn before_value(&mut self) {
        if let Some(Ctx::Array { first }) = self.stack.last_mut() {
            if !*first {
                self.out.push(',');
            }
            *first = false;
            self.write_indent();
        }
        // object members are separated by `key`
    }

    fn write_json_string(&mut self, s: &str) {
        self.out.push('"');
        if !s.chars().any(needs_escape) {
            self.out.push_str(s);
        } else {
            for c in s.chars() {
                self.write_json_escaped_char(c);
            }
        }
        self.out.push('"');
    }

    fn write_json_escaped_char(&mut self, c: char) {
        match c {
            '"' => self.out.push_str("\\\""),
            '\\' => self.out.push_str("\\\\"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '\u{08}' => self.out.push_str("\\b"),
            '\u{0C}' => self.out.push_str("\\f"),
            c if c.is_ascii_control() => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                let code = c as usize;
                self.out.push_str("\\u00");
                self.out.push(char::from(HEX[code >> 4]));
                self.out.push(char::from(HEX[code & 0xF]));
            }
            c => self.out.push(c),
        }
    }
}

fn needs_escape(c: char) -> bool {
    c == '"' || c == '\\' || c.is_ascii_control()
}

impl TokenSink for JsonWriter {
    fn begin_object(&mut self) {
        self.before_value();
        self.out.push('{');
        self.stack.push(Ctx::Object { first: true });
    }

    fn key(&mut self, name: &str) {
        if let Some(Ctx::Object { first }) = self.stack.last_mut() {
            if !*first {
                self.out.push(',');
            }
            *first = false;
        }
        self.write_indent();
        self.write_json_string(name);
        self.out.push(':');
        if self.options.pretty {
            self.out.push(' ');
        }
    }

    fn end_object(&mut self) {
        if let Some(Ctx::Object { first }) = self.stack.pop() {
            // only break the line before `}` if the object had members
            if !first {
                self.write_indent();
            }
        }
        self.out.push('}');
    }

    fn begin_array(&mut self) {
        self.before_value();
        self.out.push('[');
        self.stack.push(Ctx::Array { first: true });
    }

    fn end_array(&mut self) {
        if let Some(Ctx::Array { first }) = self.stack.pop() {
            if !first {
                self.write_indent();
            }
        }
        self.out.push(']');
    }

    fn text(&mut self, value: &str) {
        self.before_value();
        self.write_json_string(value);
    }

    fn integer(&mut self, value: i64) {
        self.before_value();
        self.out.push_str(itoa::Buffer::new().format(value));
    }

    fn real(&mut self, value: f64) {
        self.before_value();
        if value.is_finite() {
            self.out.push_str(ryu::Buffer::new().format_finite(value));
        } else {
            self.out.push_str("null");
        }
    }

    fn boolean(&mut self, value: bool) {
        self.before_value();
        self.out.push_str(if value { "true" } else { "false" });
    }

    fn null(&mut self) {
        self.before_value();
        self.out.push_str("null");
    }
}

/// Serialize a value to a compact JSON string.
///
/// # Example
///
/// ```
/// use clasp_codec::{FreeObject, JsonValue};
///
/// let object: FreeObject = [("name", JsonValue::from("Alice")), ("age", JsonValue::Integer(30))]
///     .into_iter()
///     .collect();
/// assert_eq!(clasp_json::to_string(&object), r#"{"name":"Alice","age":30}"#);
/// ```
pub fn to_string<V: FieldValue>(value: &V) -> String {
    to_string_with_options(value, &SerializeOptions::new())
}

/// Serialize a value to a pretty-printed JSON string.
pub fn to_string_pretty<V: FieldValue>(value: &V) -> String {
    to_string_with_options(value, &SerializeOptions::new().pretty())
}

/// Serialize a value to a JSON string with custom options.
pub fn to_string_with_options<V: FieldValue>(value: &V, options: &SerializeOptions) -> String {
    let mut writer = JsonWriter::with_options(options.clone());
    value.write(&mut writer);
    crate::trace!(len = writer.out.len(), "serialized");
    writer.finish()
}

/// Serialize a value as JSON into a `std::io::Write` writer.
pub fn to_writer_std<W, V>(writer: W, value: &V) -> std::io::Result<()>
where
    W: std::io::Write,
    V: FieldValue,
{
    to_writer_std_with_options(writer, value, &SerializeOptions::new())
}

/// Serialize a value as JSON with custom options into a `std::io::Write`
/// writer.
pub fn to_writer_std_with_options<W, V>(mut writer: W, value: &V, options: &SerializeOptions) -> std::io::Result<()>
where
    W: std::io::Write,
    V: FieldValue,
{
    writer.write_all(to_string_with_options(value, options).as_bytes())
}
