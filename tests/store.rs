//! End-to-end tests for the Redis client against a minimal in-process
//! fake store speaking just enough RESP2 for PING/SELECT/INCR.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use labweb::{IncrOutcome, RedisClient, RedisConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone, Copy)]
enum IncrBehavior {
    Count,
    Reject,
}

async fn handle_conn(stream: TcpStream, counter: Arc<AtomicI64>, behavior: IncrBehavior) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match line.as_str() {
            "PING" => {
                writer.write_all(b"+PONG\r\n").await.unwrap();
            }
            "SELECT" => {
                // consume $len and the db index
                let _ = lines.next_line().await;
                let _ = lines.next_line().await;
                writer.write_all(b"+OK\r\n").await.unwrap();
            }
            "INCR" => {
                // consume $len and the key
                let _ = lines.next_line().await;
                let _ = lines.next_line().await;
                match behavior {
                    IncrBehavior::Count => {
                        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        writer.write_all(format!(":{n}\r\n").as_bytes()).await.unwrap();
                    }
                    IncrBehavior::Reject => {
                        writer
                            .write_all(b"-ERR increment disabled\r\n")
                            .await
                            .unwrap();
                    }
                }
            }
            // array headers ("*2") and bulk length markers ("$4") for the
            // command word itself
            _ => {}
        }
    }
}

async fn spawn_fake_store(behavior: IncrBehavior) -> (u16, Arc<AtomicI64>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let counter = Arc::new(AtomicI64::new(0));

    let accept_counter = counter.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(handle_conn(stream, accept_counter.clone(), behavior));
        }
    });

    (port, counter)
}

fn client_for(port: u16, db: u32) -> RedisClient {
    RedisClient::new(Some(RedisConfig {
        host: "127.0.0.1".to_string(),
        port,
        db,
    }))
}

#[tokio::test]
async fn ping_succeeds_against_reachable_store() {
    let (port, _) = spawn_fake_store(IncrBehavior::Count).await;
    let client = client_for(port, 0);
    assert!(client.ping().await);
}

#[tokio::test]
async fn incr_returns_strictly_increasing_values() {
    let (port, _) = spawn_fake_store(IncrBehavior::Count).await;
    let client = client_for(port, 0);

    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Incremented(1));
    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Incremented(2));
    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Incremented(3));
}

#[tokio::test]
async fn nonzero_db_is_selected_on_connect() {
    let (port, _) = spawn_fake_store(IncrBehavior::Count).await;
    let client = client_for(port, 3);

    // A failed SELECT would leave the client unavailable
    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Incremented(1));
}

#[tokio::test]
async fn incr_rejection_surfaces_error_description() {
    let (port, _) = spawn_fake_store(IncrBehavior::Reject).await;
    let client = client_for(port, 0);

    match client.incr("labweb_hits").await {
        IncrOutcome::Failed(reason) => {
            assert!(!reason.is_empty());
            assert!(reason.contains("increment disabled"));
        }
        other => panic!("Expected Failed, got {other:?}"),
    }

    // The store itself is still reachable
    assert!(client.ping().await);
}

#[tokio::test]
async fn concurrent_increments_have_no_lost_updates() {
    let (port, counter) = spawn_fake_store(IncrBehavior::Count).await;
    let client = Arc::new(client_for(port, 0));

    let mut handles = Vec::new();
    for _ in 0..100 {
        let client = client.clone();
        handles.push(tokio::spawn(
            async move { client.incr("labweb_hits").await },
        ));
    }

    let mut successes = 0;
    let mut max_seen = 0;
    for handle in handles {
        match handle.await.unwrap() {
            IncrOutcome::Incremented(n) => {
                successes += 1;
                max_seen = max_seen.max(n);
            }
            other => panic!("Expected Incremented, got {other:?}"),
        }
    }

    assert_eq!(successes, 100);
    assert_eq!(max_seen, 100);
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[tokio::test]
async fn store_going_away_degrades_then_reconnect_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let counter = Arc::new(AtomicI64::new(0));

    // Accept exactly one connection, then drop the listener so later
    // connect attempts are refused.
    let conn_counter = counter.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        handle_conn(stream, conn_counter, IncrBehavior::Count).await;
    });

    let client = client_for(port, 0);
    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Incremented(1));

    // Shut the server down; the cached connection is now dead.
    server.abort();
    let _ = server.await;

    // First call after the cut fails on the established connection and
    // drops the cache; the one after cannot reconnect.
    match client.incr("labweb_hits").await {
        IncrOutcome::Failed(reason) => assert!(!reason.is_empty()),
        IncrOutcome::Unavailable => {}
        IncrOutcome::Incremented(n) => panic!("Unexpected increment to {n}"),
    }
    assert_eq!(client.incr("labweb_hits").await, IncrOutcome::Unavailable);
}
