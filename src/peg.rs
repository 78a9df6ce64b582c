//! Alternative back-end for the document sub-language, generated from
//! `doc.pest`. Kept as a cross-check implementation of the hand-written
//! parser in `doc.rs`; both produce the same value model.

// third-party imports
use chrono::{TimeZone, Utc};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

// local imports
use crate::error::{Error, ErrorKind, Result};
use crate::value::{Object, Opaque, OpaqueKind, Value};


// ---

#[derive(Parser)]
#[grammar = "doc.pest"]
struct DocParser;

// ---

/// Parses one complete document value, e.g. `{ a: 1, b: "x" }`.
///
/// The input must contain nothing but the value and optional spacing;
/// this back-end has no notion of the surrounding log line.
pub fn parse_document(input: &str) -> Result<Value> {
    let mut pairs = DocParser::parse(Rule::document, input).map_err(convert_error)?;

    let document = pairs.next().expect("grammar guarantees a document");
    let value = document
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .expect("grammar guarantees a value");
    build_value(value)
}

// ---

fn build_value(pair: Pair<Rule>) -> Result<Value> {
    match pair.as_rule() {
        Rule::map => build_map(pair),
        Rule::list => pair
            .into_inner()
            .map(build_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Rule::null => Ok(Value::Null),
        Rule::boolean => Ok(Value::Boolean(pair.as_str() == "true")),
        Rule::number => build_number(pair),
        Rule::dq_string | Rule::sq_string => Ok(Value::String(string_body(pair))),
        Rule::date => build_date(pair),
        Rule::object_id => Ok(opaque(OpaqueKind::ObjectId, inner_text(pair))),
        Rule::timestamp => Ok(opaque(OpaqueKind::Timestamp, inner_text(pair))),
        Rule::bin_data => Ok(opaque(OpaqueKind::BinData, inner_text(pair))),
        Rule::number_long => Ok(opaque(OpaqueKind::NumberLong, inner_text(pair))),
        Rule::regex => build_regex(pair),
        Rule::min_key => Ok(opaque(OpaqueKind::MinKey, "".into())),
        Rule::max_key => Ok(opaque(OpaqueKind::MaxKey, "".into())),
        Rule::undefined => Ok(opaque(OpaqueKind::Undefined, "".into())),
        _ => unreachable!("unexpected rule {:?}", pair.as_rule()),
    }
}

fn build_map(pair: Pair<Rule>) -> Result<Value> {
    let mut map = Object::new();
    for entry in pair.into_inner() {
        let mut inner = entry.into_inner();
        let key = inner.next().expect("grammar guarantees a key");
        let key = match key.as_rule() {
            Rule::identifier => key.as_str().to_owned(),
            Rule::dq_string | Rule::sq_string => string_body(key),
            _ => unreachable!("unexpected key rule {:?}", key.as_rule()),
        };
        let value = build_value(inner.next().expect("grammar guarantees a value"))?;
        map.insert(key, value);
    }
    Ok(Value::Object(map))
}

fn build_number(pair: Pair<Rule>) -> Result<Value> {
    let at = pair.as_span().start();
    let text = pair.as_str();
    text.parse::<f64>()
        .map(Value::Number)
        .map_err(|_| Error::new(ErrorKind::MalformedNumber(text.into()), at))
}

fn build_date(pair: Pair<Rule>) -> Result<Value> {
    let at = pair.as_span().start();
    let millis = inner_text(pair);
    let millis = millis
        .parse::<i64>()
        .map_err(|_| Error::new(ErrorKind::MalformedNumber(millis.clone()), at))?;
    let datetime = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| Error::new(ErrorKind::MalformedNumber(millis.to_string()), at))?;
    Ok(Value::DateTime(datetime))
}

fn build_regex(pair: Pair<Rule>) -> Result<Value> {
    let mut inner = pair.into_inner();
    let body = inner.next().expect("grammar guarantees a regex body");
    let flags = inner.next().map(|p| p.as_str().to_owned()).unwrap_or_default();
    Ok(opaque(
        OpaqueKind::Regex,
        format!("/{}/{}", body.as_str(), flags),
    ))
}

/// The single captured token inside a constructor pair.
fn inner_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default()
}

/// String content between the delimiters, escapes preserved literally.
fn string_body(pair: Pair<Rule>) -> String {
    inner_text(pair)
}

fn opaque(kind: OpaqueKind, payload: String) -> Value {
    Value::Opaque(Opaque::new(kind, payload))
}

fn convert_error(error: pest::error::Error<Rule>) -> Error {
    let position = match error.location {
        pest::error::InputLocation::Pos(pos) => pos,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    Error::new(ErrorKind::Grammar(error.variant.message().into_owned()), position)
}
