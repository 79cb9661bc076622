//! Tests for the reference Server
//!
//! These tests verify:
//! - GET/SET/DEL semantics against the in-memory store
//! - Pipelined requests are answered in order
//! - Concurrent clients share one store
//! - Malformed requests get an error reply

use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::thread;

use kvbench::network::{Connection, MemoryStore, Server, ServerHandle};
use kvbench::protocol::{read_reply, Command, Reply};
use kvbench::{Client, Request};

// =============================================================================
// Helper Functions
// =============================================================================

fn start_server() -> ServerHandle {
    Server::bind("127.0.0.1:0").unwrap().spawn().unwrap()
}

fn connect(server: &ServerHandle) -> Connection {
    let mut conn = Connection::connect(&server.local_addr().to_string()).unwrap();
    conn.set_timeouts(5000, 5000).unwrap();
    conn
}

fn execute(conn: &mut Connection, mut request: Request) -> Reply {
    conn.execute_one(&mut request).unwrap();
    request.outcome.unwrap()
}

// =============================================================================
// Store Tests
// =============================================================================

#[test]
fn test_store_execute_semantics() {
    let store = MemoryStore::new();

    assert_eq!(store.execute(Command::Get { key: b"k".to_vec() }), Reply::empty());
    assert_eq!(
        store.execute(Command::Set {
            key: b"k".to_vec(),
            value: b"v".to_vec(),
        }),
        Reply::empty()
    );
    assert_eq!(store.execute(Command::Get { key: b"k".to_vec() }), Reply::value("v"));
    assert_eq!(store.len(), 1);

    store.execute(Command::Del { key: b"k".to_vec() });
    assert!(store.is_empty());
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_server_set_get() {
    let server = start_server();
    let mut conn = connect(&server);

    assert_eq!(execute(&mut conn, Request::set("7", "abcd")), Reply::empty());
    assert_eq!(execute(&mut conn, Request::get("7", "abcd")), Reply::value("abcd"));
}

#[test]
fn test_server_get_missing_key_is_empty() {
    let server = start_server();
    let mut conn = connect(&server);

    assert_eq!(execute(&mut conn, Request::get("never-set", "x")), Reply::empty());
}

#[test]
fn test_server_del() {
    let server = start_server();
    let mut conn = connect(&server);

    execute(&mut conn, Request::set("k", "v"));
    assert_eq!(execute(&mut conn, Request::del("k")), Reply::empty());
    assert_eq!(execute(&mut conn, Request::get("k", "v")), Reply::empty());
    assert!(server.store().is_empty());
}

#[test]
fn test_server_value_with_spaces() {
    let server = start_server();
    let mut conn = connect(&server);

    execute(&mut conn, Request::set("key with space", "a b\nc"));
    assert_eq!(
        execute(&mut conn, Request::get("key with space", "a b\nc")),
        Reply::value("a b\nc")
    );
}

#[test]
fn test_server_pipeline() {
    let server = start_server();
    let mut conn = connect(&server);

    let mut batch = vec![
        Request::set("1", "one"),
        Request::set("2", "two"),
        Request::get("1", "one"),
        Request::del("1"),
        Request::get("1", "one"),
        Request::get("2", "two"),
    ];
    conn.execute_pipeline(&mut batch).unwrap();

    let outcomes: Vec<Reply> = batch.into_iter().map(|r| r.outcome.unwrap()).collect();
    assert_eq!(
        outcomes,
        vec![
            Reply::empty(),
            Reply::empty(),
            Reply::value("one"),
            Reply::empty(),
            Reply::empty(),
            Reply::value("two"),
        ]
    );
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_server_concurrent_clients_share_store() {
    let server = start_server();
    let addr = server.local_addr().to_string();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let addr = addr.clone();
            thread::spawn(move || {
                let mut conn = Connection::connect(&addr).unwrap();
                for i in 0..25 {
                    let key = format!("{}-{}", t, i);
                    let mut req = Request::set(key, "x");
                    conn.execute_one(&mut req).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(server.store().len(), 100);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_server_rejects_unknown_tag() {
    let server = start_server();
    let mut stream = TcpStream::connect(server.local_addr()).unwrap();
    // A lone bad tag, so nothing is left unread when the server closes
    stream.write_all(b"X").unwrap();

    let mut reader = BufReader::new(stream);
    let reply = read_reply(&mut reader).unwrap();

    assert!(reply.is_error());
    assert!(reply.to_string_lossy().contains("Unknown command tag"));
}

#[test]
fn test_server_shutdown() {
    let server = start_server();
    let addr = server.local_addr();
    server.shutdown().unwrap();

    // The listener is gone once the accept loop has returned
    assert!(TcpStream::connect(addr).is_err());
}
