use super::*;
use crate::value::{Opaque, OpaqueKind};
use rstest::rstest;

fn parse(input: &str) -> Result<Record> {
    LineParser::new(input).parse()
}

fn keys(record: &Record) -> Vec<&str> {
    record.keys().map(String::as_str).collect()
}

#[test]
fn test_query_line_with_plan_summary() {
    let record = parse(
        "2015-11-10T16:20:07.000-0800 I QUERY [conn123] query test.foo \
         planSummary: IXSCAN { a: 1 } ntoreturn:0 ntoskip:0 nscanned:10 \
         nscannedObjects:10 keyUpdates:0 numYields:0 locks(micros) r:100 \
         nreturned:1 reslen:123 1ms",
    )
    .unwrap();

    assert_eq!(
        keys(&record),
        [
            "timestamp",
            "severity",
            "component",
            "context",
            "operation",
            "namespace",
            "planSummary",
            "ntoreturn",
            "ntoskip",
            "nscanned",
            "nscannedObjects",
            "keyUpdates",
            "numYields",
            "locks(micros) r",
            "nreturned",
            "reslen",
            "duration",
        ]
    );

    assert_eq!(record["timestamp"], Value::String("2015-11-10T16:20:07.000-0800".into()));
    assert_eq!(record["severity"], Value::String("informational".into()));
    assert_eq!(record["component"], Value::String("QUERY".into()));
    assert_eq!(record["context"], Value::String("conn123".into()));
    assert_eq!(record["operation"], Value::String("query".into()));
    assert_eq!(record["namespace"], Value::String("test.foo".into()));

    let mut stage = crate::value::Object::new();
    stage.insert("a".into(), Value::Number(1.0));
    let mut element = crate::value::Object::new();
    element.insert("IXSCAN".into(), Value::Object(stage));
    assert_eq!(record["planSummary"], Value::Array(vec![Value::Object(element)]));

    assert_eq!(record["ntoreturn"], Value::Number(0.0));
    assert_eq!(record["ntoskip"], Value::Number(0.0));
    assert_eq!(record["nscanned"], Value::Number(10.0));
    assert_eq!(record["nscannedObjects"], Value::Number(10.0));
    assert_eq!(record["keyUpdates"], Value::Number(0.0));
    assert_eq!(record["numYields"], Value::Number(0.0));
    // field names run up to the colon, parentheses and spaces included
    assert_eq!(record["locks(micros) r"], Value::Number(100.0));
    assert_eq!(record["nreturned"], Value::Number(1.0));
    assert_eq!(record["reslen"], Value::Number(123.0));
    assert_eq!(record["duration"], Value::Number(1.0));
}

#[test]
fn test_command_line_with_ctime_timestamp() {
    let record = parse(
        "Wed Nov  4 12:00:00 I COMMAND [conn1] command admin.$cmd \
         command: isMaster { ismaster: 1 } 0ms",
    )
    .unwrap();

    assert_eq!(
        keys(&record),
        [
            "timestamp",
            "severity",
            "component",
            "context",
            "operation",
            "namespace",
            "command_type",
            "command",
            "duration",
        ]
    );

    // the double space collapses in the re-joined ctime form
    assert_eq!(record["timestamp"], Value::String("Wed Nov 4 12:00:00".into()));
    assert_eq!(record["namespace"], Value::String("admin.$cmd".into()));
    assert_eq!(record["command_type"], Value::String("isMaster".into()));

    let mut command = crate::value::Object::new();
    command.insert("ismaster".into(), Value::Number(1.0));
    assert_eq!(record["command"], Value::Object(command));
    assert_eq!(record["duration"], Value::Number(0.0));
}

#[test]
fn test_free_text_message() {
    let record = parse("2016-01-01T00:00:00.000Z F CONTROL [main] shutting down").unwrap();

    assert_eq!(
        keys(&record),
        ["timestamp", "severity", "component", "context", "message"]
    );
    assert_eq!(record["severity"], Value::String("fatal".into()));
    assert_eq!(record["component"], Value::String("CONTROL".into()));
    assert_eq!(record["context"], Value::String("main".into()));
    assert_eq!(record["message"], Value::String("shutting down".into()));
}

#[test]
fn test_pre_30_line_is_rejected() {
    let err = parse("Wed Nov  4 12:00:00 [conn1] query test.foo ntoreturn:0 1ms").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedVersion);
}

#[test]
fn test_bare_document_after_namespace() {
    let record = parse(
        "2015-11-10T16:20:07.000-0800 I NETWORK [conn1] query db.c \
         { _id: ObjectId(\"507f1f77bcf86cd799439011\") } 0ms",
    )
    .unwrap();

    let query = record["query"].as_object().unwrap();
    assert_eq!(
        query["_id"],
        Value::Opaque(Opaque::new(OpaqueKind::ObjectId, "507f1f77bcf86cd799439011"))
    );
    assert_eq!(record["duration"], Value::Number(0.0));
}

#[test]
fn test_embedded_quoted_json_blob_in_command() {
    let record = parse(
        "2015-11-10T16:20:07.000-0800 I COMMAND [conn8] command test.$cmd \
         command: insert { payload: \"{\"alert\":\"x\",\"id\":\"1\"}\", ordered: true } 0ms",
    )
    .unwrap();

    let command = record["command"].as_object().unwrap();
    assert_eq!(
        command["payload"],
        Value::String(r#"{"alert":"x","id":"1"}"#.into())
    );
    assert_eq!(command["ordered"], Value::Boolean(true));
}

#[rstest]
#[case('D', "debug")]
#[case('I', "informational")]
#[case('W', "warning")]
#[case('E', "error")]
#[case('F', "fatal")]
fn test_severities(#[case] rune: char, #[case] expected: &str) {
    let record = parse(&format!("2016-01-01T00:00:00.000Z {rune} CONTROL [main] hi")).unwrap();
    assert_eq!(record["severity"], Value::String(expected.into()));
}

#[test]
fn test_unknown_severity() {
    let err = parse("2016-01-01T00:00:00.000Z X CONTROL [main] hi").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownSeverity('X'));
}

#[test]
fn test_severity_requires_trailing_space() {
    let err = parse("2016-01-01T00:00:00.000Z II CONTROL [main] hi").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ExpectedLiteral { expected: ' ', found: 'I' }
    );
}

#[test]
fn test_dash_component() {
    let record = parse("2016-01-01T00:00:00.000Z I - [main] hi").unwrap();
    assert_eq!(record["component"], Value::String("-".into()));
}

#[test]
fn test_component_rejects_non_letters() {
    let err = parse("2016-01-01T00:00:00.000Z I QUERY2 [main] hi").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalIdentifierRune('2'));
}

#[test]
fn test_context_may_contain_spaces() {
    let record = parse("2016-01-01T00:00:00.000Z I CONTROL [initandlisten thread] hi").unwrap();
    assert_eq!(record["context"], Value::String("initandlisten thread".into()));
}

#[rstest]
#[case("Wednesday Nov 4 12:00:00 I CONTROL [main] hi", "day of week")]
#[case("Wed November 4 12:00:00 I CONTROL [main] hi", "month")]
fn test_ctime_timestamp_validation(#[case] input: &str, #[case] what: &'static str) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedTimestamp(what));
}

#[test]
fn test_operation_like_word_falls_back_to_message() {
    let record = parse("2016-01-01T00:00:00.000Z I CONTROL [main] querying the primary").unwrap();

    // the probe must leave no trace of the near-miss
    assert_eq!(
        keys(&record),
        ["timestamp", "severity", "component", "context", "message"]
    );
    assert_eq!(record["message"], Value::String("querying the primary".into()));
}

#[test]
fn test_single_token_message() {
    let record = parse("2016-01-01T00:00:00.000Z I CONTROL [main] done").unwrap();
    assert_eq!(record["message"], Value::String("done".into()));
}

#[test]
fn test_operation_with_string_and_quoted_fields() {
    let record = parse(
        "2016-01-01T00:00:00.000Z I WRITE [conn4] update db.users \
         query: { name: \"ada\" } nMatched:1 5ms",
    )
    .unwrap();

    let query = record["query"].as_object().unwrap();
    assert_eq!(query["name"], Value::String("ada".into()));
    assert_eq!(record["nMatched"], Value::Number(1.0));
    assert_eq!(record["duration"], Value::Number(5.0));
}

#[test]
fn test_getmore_operation() {
    let record = parse(
        "2016-01-01T00:00:00.000Z I QUERY [conn9] getmore local.oplog.rs \
         cursorid:33986231360 ntoreturn:0 nreturned:101 2ms",
    )
    .unwrap();
    assert_eq!(record["operation"], Value::String("getmore".into()));
    assert_eq!(record["cursorid"], Value::Number(33986231360.0));
    assert_eq!(record["duration"], Value::Number(2.0));
}

#[test]
fn test_unexpected_value_start() {
    let err = parse("2016-01-01T00:00:00.000Z I WRITE [conn4] update db.c bad:@ 5ms").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnexpectedValueStart { field: "bad".into(), found: '@' }
    );
}

#[test]
fn test_invalid_duration() {
    let err = parse("2016-01-01T00:00:00.000Z I QUERY [conn1] query db.c reslen:1 5s").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidDuration);
}

#[test]
fn test_missing_duration_fails() {
    let err = parse("2016-01-01T00:00:00.000Z I QUERY [conn1] query db.c reslen:1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
}

#[test]
fn test_empty_input() {
    let err = parse("").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
}

#[test]
fn test_determinism() {
    let input = "2015-11-10T16:20:07.000-0800 I QUERY [conn123] query test.foo \
                 planSummary: COLLSCAN nreturned:1 12ms";
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
}

#[test]
fn test_record_serializes_in_order() {
    let record = parse("2016-01-01T00:00:00.000Z F CONTROL [main] bye").unwrap();
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"timestamp":"2016-01-01T00:00:00.000Z","severity":"fatal","component":"CONTROL","context":"main","message":"bye"}"#
    );
}
