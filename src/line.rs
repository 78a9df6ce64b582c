//! Parser for the fixed prefix of a ≥3.0 server log line and the
//! operation tail that may follow it.

// local imports
use crate::cursor::{Cursor, SENTINEL, WHITESPACE};
use crate::doc;
use crate::error::{Error, ErrorKind, MakeError, Result};
use crate::severity::Severity;
use crate::value::{Record, Value};

#[cfg(test)]
mod tests;

// ---

const OPERATIONS: &[&str] = &["query", "getmore", "insert", "update", "remove", "command"];

// ---

/// LineParser walks one log line front to back: timestamp, severity,
/// component, context, then either a free-text message or an operation
/// with its key/value stream and trailing duration.
///
/// The parser owns its cursor and output record; nothing survives the
/// call. Probes that fail (operation name, field name, plan-summary
/// stage) roll the cursor back and leave the record untouched.
pub struct LineParser {
    cursor: Cursor,
    fields: Record,
}

impl LineParser {
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            fields: Record::new(),
        }
    }

    /// Runs the line state machine and returns the finished record.
    pub fn parse(mut self) -> Result<Record> {
        self.parse_timestamp()?;

        self.cursor.eat_whitespace();
        if self.cursor.lookahead(0) == '[' {
            // a bracket straight after the timestamp means a pre-3.0 line
            return Err(self.cursor.make_error(ErrorKind::UnsupportedVersion));
        }

        self.parse_severity()?;
        self.parse_component()?;
        self.parse_context()?;
        self.parse_message()?;

        Ok(self.fields)
    }

    /// Reads either an ISO-8601 token or the four-token ctime form
    /// `dow mon day time`, re-joined with single spaces.
    fn parse_timestamp(&mut self) -> Result<()> {
        self.cursor.eat_whitespace();

        let timestamp = if self.cursor.lookahead(0).is_numeric() {
            self.cursor.read_until(WHITESPACE)?
        } else {
            let day_of_week = self.cursor.read_until(WHITESPACE)?;
            if day_of_week.chars().count() != 3 {
                return Err(self.cursor.make_error(ErrorKind::MalformedTimestamp("day of week")));
            }

            self.cursor.eat_whitespace();
            let month = self.cursor.read_until(WHITESPACE)?;
            if month.chars().count() != 3 {
                return Err(self.cursor.make_error(ErrorKind::MalformedTimestamp("month")));
            }

            self.cursor.eat_whitespace();
            let day = self.cursor.read_until(WHITESPACE)?;

            self.cursor.eat_whitespace();
            let time = self.cursor.read_until(WHITESPACE)?;

            format!("{day_of_week} {month} {day} {time}")
        };

        self.fields.insert("timestamp".into(), Value::String(timestamp));
        Ok(())
    }

    fn parse_severity(&mut self) -> Result<()> {
        self.cursor.eat_whitespace();

        let at = self.cursor.position();
        let rune = self.cursor.advance();
        let severity = Severity::from_rune(rune)
            .ok_or_else(|| Error::new(ErrorKind::UnknownSeverity(rune), at))?;

        let next = self.cursor.advance();
        if !next.is_whitespace() {
            return Err(Error::new(
                ErrorKind::ExpectedLiteral { expected: ' ', found: next },
                at + 1,
            ));
        }

        self.fields
            .insert("severity".into(), Value::String(severity.as_ref().into()));
        Ok(())
    }

    fn parse_component(&mut self) -> Result<()> {
        self.cursor.eat_whitespace();

        let component = if self.cursor.lookahead(0) == '-' {
            self.cursor.advance();
            "-".into()
        } else {
            // TODO: validate against the known component set (ACCESS,
            // COMMAND, CONTROL, GEO, INDEX, NETWORK, QUERY, REPL,
            // SHARDING, STORAGE, JOURNAL, WRITE, TOTAL)
            self.cursor.read_alpha_identifier()?
        };

        self.fields.insert("component".into(), Value::String(component));
        Ok(())
    }

    fn parse_context(&mut self) -> Result<()> {
        self.cursor.eat_whitespace();

        self.cursor.expect('[')?;
        let context = self.cursor.read_until_rune(']')?;
        self.cursor.advance();

        self.fields.insert("context".into(), Value::String(context));
        Ok(())
    }

    /// Probes the first message token against the operation set; on a
    /// miss the whole remainder of the line becomes the message.
    fn parse_message(&mut self) -> Result<()> {
        self.cursor.eat_whitespace();

        let saved = self.cursor.position();
        match self.cursor.read_until(WHITESPACE) {
            Ok(operation) if OPERATIONS.contains(&operation.as_str()) => {
                self.fields.insert("operation".into(), Value::String(operation));

                self.cursor.eat_whitespace();
                let namespace = self.cursor.read_until(WHITESPACE)?;
                self.fields.insert("namespace".into(), Value::String(namespace));

                self.parse_operation_body()
            }
            _ => {
                self.cursor.set_position(saved);
                let message = self.cursor.read_until_rune(SENTINEL)?;
                self.fields.insert("message".into(), Value::String(message));
                Ok(())
            }
        }
    }

    /// Consumes `field: value` pairs until the probe reports no more
    /// fields, then the trailing duration.
    fn parse_operation_body(&mut self) -> Result<()> {
        while self.cursor.lookahead(0) != SENTINEL {
            if self.parse_field_and_value()? {
                let duration = self.cursor.read_duration()?;
                self.fields.insert("duration".into(), Value::Number(duration));
                break;
            }
        }
        Ok(())
    }

    /// Parses one `field: value` pair. Returns true when the next token
    /// is not a field, leaving the cursor where the probe began so the
    /// caller can read the duration.
    fn parse_field_and_value(&mut self) -> Result<bool> {
        self.cursor.eat_whitespace();

        // a bare document straight after the namespace belongs to the
        // operation itself
        if self.cursor.lookahead(0) == '{' {
            let document = doc::parse_map(&mut self.cursor)?;
            let operation = match self.fields.get("operation") {
                Some(Value::String(operation)) => operation.clone(),
                _ => String::new(),
            };
            self.fields.insert(operation, document);
            return Ok(false);
        }

        let saved = self.cursor.position();
        let name = match self.cursor.read_until_rune(':') {
            Ok(name) => name,
            Err(_) => {
                self.cursor.set_position(saved);
                return Ok(true);
            }
        };
        self.cursor.advance();
        self.cursor.eat_whitespace();

        let value = if name == "planSummary" {
            doc::parse_plan_summary(&mut self.cursor)?
        } else if name == "command" {
            // >=2.6 prints `command: <name> <doc>`, older lines only the doc
            if self.cursor.lookahead(0) != '{' {
                let command_type = self.cursor.read_json_identifier();
                self.cursor.eat_whitespace();
                self.fields
                    .insert("command_type".into(), Value::String(command_type));
            }
            doc::parse_map(&mut self.cursor)?
        } else {
            let first = self.cursor.lookahead(0);
            match first {
                '{' => doc::parse_map(&mut self.cursor)?,
                '"' => Value::String(doc::parse_string(&mut self.cursor, '"')?),
                _ if first.is_numeric() => Value::Number(self.cursor.read_number()?),
                _ => {
                    return Err(self.cursor.make_error(ErrorKind::UnexpectedValueStart {
                        field: name,
                        found: first,
                    }))
                }
            }
        };

        self.fields.insert(name, value);
        Ok(false)
    }
}
