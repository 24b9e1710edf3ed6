mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{auth_response, read_packet, response};
use rconlink::{
    client::Client,
    error::{ConnectionError, RconError},
};
use tokio::{
    io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream},
    time,
};

async fn connected_pair(timeout_ms: u64) -> (Client<DuplexStream>, DuplexStream) {
    let (client_end, mut server_end) = duplex(4096);
    let client = Client::from_config(common::config(timeout_ms));

    let (connected, _) = tokio::join!(client.connect_with(client_end), async {
        let auth = read_packet(&mut server_end).await.unwrap();
        server_end
            .write_all(&auth_response(auth.id()).pack())
            .await
            .unwrap();
    });
    connected.unwrap();

    (client, server_end)
}

#[tokio::test]
async fn concurrent_commands_never_interleave() {
    const CALLERS: i32 = 8;
    let (client, mut server_end) = connected_pair(1000).await;
    let client = Arc::new(client);

    let server = tokio::spawn(async move {
        let mut order = Vec::new();
        for _ in 0..CALLERS {
            let request = read_packet(&mut server_end).await.unwrap();

            // nothing else may arrive until this request has been answered
            let mut peek = [0u8; 1];
            let early = time::timeout(Duration::from_millis(20), server_end.read(&mut peek)).await;
            assert!(early.is_err(), "a second request arrived before the reply");

            let reply = response(request.id(), &format!("echo {}", request.body()));
            server_end.write_all(&reply.pack()).await.unwrap();
            order.push(request.id());
        }
        order
    });

    let callers: Vec<_> = (0..CALLERS)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let body = client.execute_command(&format!("cmd {i}")).await.unwrap();
                assert_eq!(body, format!("echo cmd {i}"));
            })
        })
        .collect();

    for caller in callers {
        caller.await.unwrap();
    }

    let order = server.await.unwrap();
    assert_eq!(order, (2..=CALLERS + 1).collect::<Vec<_>>());
    assert!(client.is_connected());
}

#[tokio::test]
async fn dropping_a_half_read_exchange_closes_the_connection() {
    let (client, mut server_end) = connected_pair(5000).await;

    let server = tokio::spawn(async move {
        let request = read_packet(&mut server_end).await.unwrap();
        let bytes = response(request.id(), "hello world").pack();
        server_end.write_all(&bytes[..6]).await.unwrap();

        // the client has to hang up rather than try to use the stream again
        read_packet(&mut server_end).await.is_none()
    });

    let cancelled = time::timeout(Duration::from_millis(100), client.execute_command("status")).await;
    assert!(cancelled.is_err());
    assert!(!client.is_connected());

    let err = client.execute_command("status").await.unwrap_err();
    assert!(matches!(
        err,
        RconError::Connection(ConnectionError::NotConnected)
    ));

    assert!(server.await.unwrap());
}

#[tokio::test]
async fn dropping_a_queued_call_costs_nothing() {
    let (client, mut server_end) = connected_pair(1000).await;
    let client = Arc::new(client);

    let server = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(request) = read_packet(&mut server_end).await {
            if request.body() == "slow" {
                time::sleep(Duration::from_millis(200)).await;
            }
            let reply = response(request.id(), &format!("done {}", request.body()));
            server_end.write_all(&reply.pack()).await.unwrap();
            seen.push((request.id(), request.body().to_string()));
        }
        seen
    });

    let slow = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.execute_command("slow").await }
    });
    time::sleep(Duration::from_millis(50)).await;

    let impatient = time::timeout(
        Duration::from_millis(50),
        client.execute_command("impatient"),
    )
    .await;
    assert!(impatient.is_err());

    assert_eq!(slow.await.unwrap().unwrap(), "done slow");
    assert!(client.is_connected());
    assert_eq!(client.execute_command("after").await.unwrap(), "done after");

    client.disconnect().await;
    let seen = server.await.unwrap();
    assert_eq!(
        seen,
        vec![(2, "slow".to_string()), (3, "after".to_string())]
    );
}

#[tokio::test]
async fn failed_handshake_over_custom_transport_hangs_up() {
    let (client_end, mut server_end) = duplex(4096);
    let client: Client<DuplexStream> = Client::from_config(common::config(1000));

    let server = tokio::spawn(async move {
        read_packet(&mut server_end).await.unwrap();
        server_end.write_all(&auth_response(-1).pack()).await.unwrap();
        read_packet(&mut server_end).await.is_none()
    });

    let err = client.connect_with(client_end).await.unwrap_err();
    assert!(matches!(err, RconError::Authentication));
    assert!(!client.is_connected());
    assert!(server.await.unwrap());
}
