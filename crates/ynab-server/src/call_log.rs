//! Tool call logging
//!
//! When enabled (`--logging`), every tool invocation writes one line to
//! stderr before the tool runs:
//!
//! ```text
//! TOOL_CALL: create_transaction(account_id="a1", amount=-25000, date="2024-03-18", payee_name=None, ...)
//! ```
//!
//! Arguments appear in declaration order. Strings longer than 50 characters
//! are cut to 47 characters plus `...`, then quoted with JSON escaping so
//! newlines and quotes in values never break the line.

use std::io::{self, Write};
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

/// Longest string rendered in full
const MAX_STRING_LEN: usize = 50;

/// Characters kept when a string is cut
const TRUNCATED_LEN: usize = 47;

pub struct CallLogger {
    enabled: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl CallLogger {
    /// Logger writing to stderr
    pub fn new(enabled: bool) -> Self {
        Self::with_writer(enabled, io::stderr())
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Logger writing to an arbitrary sink
    pub fn with_writer<W: Write + Send + 'static>(enabled: bool, writer: W) -> Self {
        Self {
            enabled,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Write one `TOOL_CALL:` line for the call, if enabled.
    ///
    /// Write failures are ignored; logging never changes a tool's outcome.
    pub fn log<P: Serialize + ?Sized>(&self, tool: &str, params: &P) {
        if !self.enabled {
            return;
        }

        let args = serde_json::to_value(params).unwrap_or(Value::Null);
        let line = format_call(tool, &args);

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

impl std::fmt::Debug for CallLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLogger")
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Render `TOOL_CALL: name(key=value, ...)`
pub fn format_call(tool: &str, args: &Value) -> String {
    let rendered = match args {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}={}", key, format_value(value)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => format_value(other),
    };
    format!("TOOL_CALL: {}({})", tool, rendered)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let cut: String = s.chars().take(TRUNCATED_LEN).collect();
            let quoted = quote(&cut);
            // Ellipsis goes inside the closing quote
            format!("{}...\"", &quoted[..quoted.len() - 1])
        }
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// Double-quote a string, escaping quotes, backslashes and control
/// characters so the value stays on one line
fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// In-memory sink for inspecting log output in tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Params {
        account_id: String,
        amount: i64,
        memo: Option<String>,
        approved: bool,
    }

    #[test]
    fn test_format_call_declaration_order() {
        let params = Params {
            account_id: "a1".into(),
            amount: -25000,
            memo: None,
            approved: false,
        };
        let line = format_call("create_transaction", &serde_json::to_value(&params).unwrap());
        assert_eq!(
            line,
            r#"TOOL_CALL: create_transaction(account_id="a1", amount=-25000, memo=None, approved=false)"#
        );
    }

    #[test]
    fn test_long_strings_truncated() {
        let long = "x".repeat(60);
        let line = format_call("search_payees", &json!({ "search_term": long }));
        let expected = format!("TOOL_CALL: search_payees(search_term=\"{}...\")", "x".repeat(47));
        assert_eq!(line, expected);

        let exact = "y".repeat(50);
        let line = format_call("search_payees", &json!({ "search_term": exact }));
        assert!(line.contains(&format!("\"{}\"", exact)));
    }

    #[test]
    fn test_strings_are_escaped() {
        let line = format_call(
            "search_payees",
            &json!({ "search_term": "a\", budget_id=\"x", "memo": "one\ntwo" }),
        );
        assert_eq!(
            line,
            r#"TOOL_CALL: search_payees(search_term="a\", budget_id=\"x", memo="one\ntwo")"#
        );
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_truncated_strings_are_escaped() {
        let long = format!("\n{}", "z".repeat(60));
        let line = format_call("update_transaction", &json!({ "memo": long }));
        let expected = format!("TOOL_CALL: update_transaction(memo=\"\\n{}...\")", "z".repeat(46));
        assert_eq!(line, expected);
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(format_call("get_user", &Value::Null), "TOOL_CALL: get_user()");
        assert_eq!(format_call("get_user", &json!({})), "TOOL_CALL: get_user()");
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let buffer = SharedBuffer::default();
        let logger = CallLogger::with_writer(false, buffer.clone());
        logger.log("get_user", &json!({}));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_enabled_writes_one_line_per_call() {
        let buffer = SharedBuffer::default();
        let logger = CallLogger::with_writer(true, buffer.clone());
        logger.log("get_accounts", &json!({ "budget_id": "default" }));
        logger.log("get_user", &json!({}));

        assert_eq!(
            buffer.lines(),
            vec![
                r#"TOOL_CALL: get_accounts(budget_id="default")"#.to_string(),
                "TOOL_CALL: get_user()".to_string(),
            ]
        );
    }
}
