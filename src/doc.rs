//! Parser for MongoDB's printed document syntax: nested maps and lists,
//! relaxed key syntax, named type constructors, and the server's
//! truncated re-quoted JSON blobs.

// third-party imports
use chrono::{TimeZone, Utc};

// local imports
use crate::cursor::{check, Check, Cursor, SENTINEL};
use crate::error::{Error, ErrorKind, MakeError, Result};
use crate::value::{Object, Opaque, OpaqueKind, Value};


// ---

const NUMBER_START: &[Check] = &[
    Check::Digit,
    Check::Rune('-'),
    Check::Rune('+'),
    Check::Rune('.'),
];

const TIMESTAMP_BODY: &[Check] = &[Check::Digit, Check::Rune('|')];

const HEX: &[Check] = &[Check::HexDigit];

// ---

/// Parses one document value at the cursor.
pub(crate) fn parse_value(cursor: &mut Cursor) -> Result<Value> {
    let first = cursor.lookahead(0);
    match first {
        '{' => parse_map(cursor),
        '[' => parse_list(cursor),
        '"' if cursor.lookahead(1) == '{' => parse_quoted_payload(cursor).map(Value::String),
        '"' | '\'' => parse_string(cursor, first).map(Value::String),
        '/' => parse_regex(cursor),
        _ if check(first, NUMBER_START) => cursor.read_number().map(Value::Number),
        _ if first.is_alphabetic() => parse_identifier_value(cursor),
        _ => Err(cursor.make_error(ErrorKind::UnexpectedDocValue(first.to_string()))),
    }
}

/// Parses a `{ ... }` map. The cursor must be on the opening brace.
///
/// Keys may be bare identifiers or quoted with either quote rune. An
/// empty key skips the key/colon/value read and falls through to the
/// separator check, which keeps trailing commas harmless.
pub(crate) fn parse_map(cursor: &mut Cursor) -> Result<Value> {
    cursor.advance();

    let mut map = Object::new();
    loop {
        cursor.eat_whitespace();
        if cursor.lookahead(0) == '}' {
            cursor.advance();
            break;
        }

        let first = cursor.lookahead(0);
        let key = if first == '"' || first == '\'' {
            parse_string(cursor, first)?
        } else {
            cursor.read_json_identifier()
        };

        if !key.is_empty() {
            cursor.eat_whitespace();
            cursor.expect(':')?;
            cursor.eat_whitespace();
            let value = parse_value(cursor)?;
            map.insert(key, value);
        }

        cursor.eat_whitespace();
        match cursor.lookahead(0) {
            '}' => {
                cursor.advance();
                break;
            }
            ',' => {
                cursor.advance();
            }
            _ => return Err(cursor.make_error(ErrorKind::MalformedMap)),
        }
    }

    Ok(Value::Object(map))
}

/// Parses a `[ ... ]` list. The cursor must be on the opening bracket.
fn parse_list(cursor: &mut Cursor) -> Result<Value> {
    cursor.advance();

    let mut list = Vec::new();
    cursor.eat_whitespace();
    if cursor.lookahead(0) == ']' {
        cursor.advance();
        return Ok(Value::Array(list));
    }

    loop {
        list.push(parse_value(cursor)?);
        cursor.eat_whitespace();
        match cursor.lookahead(0) {
            ']' => {
                cursor.advance();
                break;
            }
            ',' => {
                cursor.advance();
                cursor.eat_whitespace();
            }
            _ => return Err(cursor.make_error(ErrorKind::MalformedList)),
        }
    }

    Ok(Value::Array(list))
}

/// Parses a quoted string. Backslash sequences are preserved literally;
/// the captured content is everything between the delimiters.
pub(crate) fn parse_string(cursor: &mut Cursor, quote: char) -> Result<String> {
    cursor.advance();
    let content = cursor.read_until_rune(quote)?;
    cursor.advance();
    Ok(content)
}

/// Captures a truncated, re-quoted JSON blob that the server emits as a
/// string value, e.g. `payload: "{"alert":"x","id":"1"}", `.
///
/// The cursor is on the opening quote with `{` right behind it. The scan
/// tracks quote nesting and stops at the first `", ` outside quotes, or
/// at the truncation marker `...", ` inside quotes. The capture excludes
/// the terminating re-quote and the scan resumes on the comma.
fn parse_quoted_payload(cursor: &mut Cursor) -> Result<String> {
    cursor.advance();

    let start = cursor.position();
    let mut end = start;
    let mut quoted = false;
    loop {
        if !quoted && cursor.match_ahead(end, "\", ") {
            let content = cursor.capture(start, end);
            cursor.set_position(end + 1);
            return Ok(content);
        } else if quoted && cursor.match_ahead(end, "...\", ") {
            let content = cursor.capture(start, end + 3);
            cursor.set_position(end + 4);
            return Ok(content);
        } else if cursor.rune_at(end) == '"' {
            quoted = !quoted;
        }

        end += 1;
        if cursor.rune_at(end) == SENTINEL {
            return Err(Error::new(ErrorKind::TruncatedPayload, end));
        }
    }
}

/// Parses a value that begins with a letter: a keyword literal or a
/// named type constructor.
fn parse_identifier_value(cursor: &mut Cursor) -> Result<Value> {
    let at = cursor.position();
    let identifier = cursor.read_json_identifier();
    match identifier.as_str() {
        "null" => Ok(Value::Null),
        "true" => Ok(Value::Boolean(true)),
        "false" => Ok(Value::Boolean(false)),
        "new" => {
            cursor.eat_whitespace();
            let constructor = cursor.read_json_identifier();
            if constructor != "Date" {
                return Err(cursor.make_error(ErrorKind::UnknownConstructor(constructor)));
            }
            parse_date_body(cursor)
        }
        "Date" => parse_date_body(cursor),
        "Timestamp" => parse_timestamp(cursor),
        "ObjectId" => parse_object_id(cursor),
        "NumberLong" => parse_paren_payload(cursor, OpaqueKind::NumberLong),
        "BinData" => parse_paren_payload(cursor, OpaqueKind::BinData),
        "MinKey" => Ok(Opaque::new(OpaqueKind::MinKey, "").into()),
        "MaxKey" => Ok(Opaque::new(OpaqueKind::MaxKey, "").into()),
        "undefined" => Ok(Opaque::new(OpaqueKind::Undefined, "").into()),
        _ => Err(Error::new(ErrorKind::UnexpectedDocValue(identifier), at)),
    }
}

/// Parses the `(<millis>)` tail of a `Date` constructor into a datetime.
fn parse_date_body(cursor: &mut Cursor) -> Result<Value> {
    cursor.expect('(')?;
    let at = cursor.position();
    let millis = cursor.read_number()?;
    cursor.expect(')')?;

    if millis.fract() != 0.0 {
        return Err(Error::new(ErrorKind::MalformedNumber(millis.to_string()), at));
    }
    let datetime = Utc
        .timestamp_millis_opt(millis as i64)
        .single()
        .ok_or_else(|| Error::new(ErrorKind::MalformedNumber(millis.to_string()), at))?;
    Ok(Value::DateTime(datetime))
}

/// Parses a `Timestamp` value in either printed form: `Timestamp(<body>)`
/// or `Timestamp <digits-and-bars>`.
fn parse_timestamp(cursor: &mut Cursor) -> Result<Value> {
    let payload = if cursor.lookahead(0) == '(' {
        cursor.advance();
        let body = cursor.read_until_rune(')')?;
        cursor.advance();
        body
    } else {
        cursor.eat_whitespace();
        cursor.read_while(TIMESTAMP_BODY)?
    };
    Ok(Opaque::new(OpaqueKind::Timestamp, payload).into())
}

/// Parses `ObjectId("<hex>")`, accepting either quote rune around the
/// hex run and requiring the closing quote to match the opening one.
fn parse_object_id(cursor: &mut Cursor) -> Result<Value> {
    cursor.expect('(')?;
    let quote = cursor.lookahead(0);
    if quote != '\'' && quote != '"' {
        return Err(cursor.make_error(ErrorKind::ExpectedLiteral {
            expected: '"',
            found: quote,
        }));
    }
    cursor.advance();
    let hex = cursor.read_while(HEX)?;
    cursor.expect(quote)?;
    cursor.expect(')')?;
    Ok(Opaque::new(OpaqueKind::ObjectId, hex).into())
}

/// Captures everything between a constructor's parentheses verbatim.
fn parse_paren_payload(cursor: &mut Cursor, kind: OpaqueKind) -> Result<Value> {
    cursor.expect('(')?;
    let payload = cursor.read_until_rune(')')?;
    cursor.advance();
    Ok(Opaque::new(kind, payload).into())
}

/// Parses a printed regex literal `/pattern/flags`. The payload keeps
/// the printed form.
fn parse_regex(cursor: &mut Cursor) -> Result<Value> {
    cursor.advance();
    let body = cursor.read_until_rune('/')?;
    cursor.advance();

    let mut flags = String::new();
    while matches!(cursor.lookahead(0), 'g' | 'i' | 'm' | 's') {
        flags.push(cursor.advance());
    }
    Ok(Opaque::new(OpaqueKind::Regex, format!("/{body}/{flags}")).into())
}

// ---

/// Parses a plan summary: a comma-separated list of upper-case stage
/// names, each optionally followed by a map of stage parameters. Stages
/// without parameters map to boolean true.
pub(crate) fn parse_plan_summary(cursor: &mut Cursor) -> Result<Value> {
    let mut stages = Vec::new();

    cursor.eat_whitespace();
    loop {
        if let Some(element) = parse_plan_summary_element(cursor)? {
            stages.push(element);
        }
        cursor.eat_whitespace();
        if cursor.lookahead(0) != ',' {
            break;
        }
        cursor.advance();
    }

    Ok(Value::Array(stages))
}

/// Probes for one plan-summary element; a failed probe restores the
/// position and signals end-of-list.
fn parse_plan_summary_element(cursor: &mut Cursor) -> Result<Option<Value>> {
    cursor.eat_whitespace();

    let saved = cursor.position();
    let stage = match cursor.read_upcase_identifier() {
        Ok(stage) if !stage.is_empty() => stage,
        Ok(_) | Err(_) => {
            cursor.set_position(saved);
            return Ok(None);
        }
    };

    cursor.eat_whitespace();
    let mut element = Object::new();
    if cursor.lookahead(0) == '{' {
        element.insert(stage, parse_map(cursor)?);
    } else {
        element.insert(stage, Value::Boolean(true));
    }
    Ok(Some(Value::Object(element)))
}
