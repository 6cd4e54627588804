#![cfg(feature = "logstash")]

use serde_json::Value;
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use temlogger_core::{Handler, Level, LogEvent, LogstashFormatter};
use temlogger_transports::{LogstashHandler, LogstashVersion, TransportError};

fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    (listener, port)
}

/// Accept one connection and read `count` lines from it
fn read_lines(listener: TcpListener, count: usize) -> thread::JoinHandle<Vec<Value>> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let reader = BufReader::new(stream);
        reader
            .lines()
            .take(count)
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect()
    })
}

#[test]
fn test_ships_one_json_document_per_line() {
    let (listener, port) = listener();
    let reader = read_lines(listener, 2);

    let handler = LogstashHandler::connect("127.0.0.1", &port, LogstashVersion::V1).unwrap();
    assert!(handler.is_connected());
    assert_eq!(handler.addr(), format!("127.0.0.1:{}", port));

    handler
        .emit(&LogEvent::new("api", Level::Info, "first").with_field("request_id", "r-1"))
        .unwrap();
    handler
        .emit(&LogEvent::new("api", Level::Error, "second"))
        .unwrap();
    handler.flush().unwrap();

    let lines = reader.join().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["@version"], "1");
    assert_eq!(lines[0]["message"], "first");
    assert_eq!(lines[0]["request_id"], "r-1");
    assert_eq!(lines[1]["level"], "ERROR");
    assert_eq!(lines[1]["logger_name"], "api");
}

#[test]
fn test_formatter_replaces_native_shape() {
    let (listener, port) = listener();
    let reader = read_lines(listener, 1);

    let handler = LogstashHandler::connect("127.0.0.1", &port, LogstashVersion::V1)
        .unwrap()
        .with_formatter(Arc::new(LogstashFormatter::new("staging").with_host("node-7")));

    handler
        .emit(&LogEvent::new("billing", Level::Warning, "retrying"))
        .unwrap();

    let line = reader.join().unwrap().remove(0);
    assert_eq!(line["environment"], "staging");
    assert_eq!(line["host"], "node-7");
    assert_eq!(line["type"], "logstash");
}

#[test]
fn test_v0_wire_shape() {
    let (listener, port) = listener();
    let reader = read_lines(listener, 1);

    let handler = LogstashHandler::connect("127.0.0.1", &port, LogstashVersion::V0).unwrap();
    handler
        .emit(&LogEvent::new("legacy", Level::Info, "hello"))
        .unwrap();

    let line = reader.join().unwrap().remove(0);
    assert_eq!(line["@message"], "hello");
    assert_eq!(line["@fields"]["logger"], "legacy");
    assert!(line.get("@version").is_none());
}

#[test]
fn test_unreachable_endpoint_fails_construction() {
    // Bind then drop to get a port nothing listens on.
    let (listener, port) = listener();
    drop(listener);

    let err = LogstashHandler::connect("127.0.0.1", &port, LogstashVersion::V1)
        .err()
        .unwrap();
    assert!(matches!(err, TransportError::Connect { .. }), "{err}");
}

#[test]
fn test_unresolvable_host_fails_construction() {
    let err = LogstashHandler::connect("no-such-host.invalid", "5959", LogstashVersion::V1)
        .err()
        .unwrap();
    assert!(
        matches!(
            err,
            TransportError::Resolve(_) | TransportError::Connect { .. }
        ),
        "{err}"
    );
}
