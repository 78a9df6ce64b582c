//! Parser for MongoDB server log lines in the ≥3.0 format.
//!
//! One call parses one line into an ordered mapping of typed fields:
//! the fixed prefix (`timestamp`, `severity`, `component`, `context`)
//! followed by either a free-text `message` or, for database operations,
//! the operation name, namespace, the emitted key/value stream, and the
//! trailing duration. Field values follow MongoDB's printed document
//! syntax, including type constructors such as `ObjectId(...)`,
//! `new Date(...)` and `Timestamp(...)`.
//!
//! ```
//! use log_format_mongodb::{parse, Value};
//!
//! let record = parse("2016-01-01T00:00:00.000Z F CONTROL [main] shutting down")?;
//! assert_eq!(record["severity"], Value::String("fatal".into()));
//! assert_eq!(record["message"], Value::String("shutting down".into()));
//! # Ok::<(), log_format_mongodb::Error>(())
//! ```

// public modules
pub mod error;
pub mod line;
pub mod peg;
pub mod severity;
pub mod value;

// private modules
mod cursor;
mod doc;

// public uses
pub use error::{Error, ErrorKind, Result};
pub use line::LineParser;
pub use severity::Severity;
pub use value::{Object, Opaque, OpaqueKind, Record, Value};

// ---

/// Parses a single log line into an ordered field mapping.
///
/// The input is one logical line without its trailing newline. On
/// failure the error carries the kind of fault and the codepoint index
/// at which it was detected; no partial record is returned.
pub fn parse(input: &str) -> Result<Record> {
    LineParser::new(input).parse()
}
