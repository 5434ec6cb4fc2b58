use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tonic::Code;
use tracing::info;

use newsrec_core::{
    InterestRecord, RecommendError, RecommendResult, Recommender, ServerConfig, TagWeight,
    UnavailableRecommender, UserMatch,
};
use newsrec_server::client::{self, ClientError, RecommendClient};
use newsrec_server::server::run_until;
use newsrec_server::{RpcServer, ServerError};

/// Recommender with fixed answers. User 404 is unknown.
struct FixedRecommender;

#[async_trait]
impl Recommender for FixedRecommender {
    async fn weights(&self, records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>> {
        Ok(records
            .into_iter()
            .map(|r| TagWeight { user_id: r.user_id, tag_id: r.tag_id, weight: r.rating + 1.0 })
            .collect())
    }

    async fn train(&self, records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>> {
        Ok(records
            .into_iter()
            .map(|r| TagWeight { user_id: r.user_id, tag_id: r.tag_id, weight: 100.0 })
            .collect())
    }

    async fn recommend_tags(&self, user_id: i32, limit: usize) -> RecommendResult<Vec<i32>> {
        if user_id == 404 {
            return Err(RecommendError::UnknownUser(user_id));
        }
        Ok((0..limit as i32).collect())
    }

    async fn similar_users(&self, user_id: i32, limit: usize) -> RecommendResult<Vec<UserMatch>> {
        if user_id == 404 {
            return Err(RecommendError::UnknownUser(user_id));
        }
        Ok((1..=limit as i32)
            .map(|i| UserMatch { user_id: user_id + i, score: 1.0 / i as f64 })
            .collect())
    }
}

fn local_config(port: u16) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: port.into(),
        ..ServerConfig::default()
    }
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn setup_test_server<R: Recommender>(
    recommender: R,
) -> Result<
    (
        RecommendClient,
        SocketAddr,
        oneshot::Sender<()>,
        tokio::task::JoinHandle<Result<(), ServerError>>,
    ),
    Box<dyn std::error::Error>,
> {
    let server = RpcServer::bind(&local_config(0), Arc::new(recommender)).await?;
    let addr = server.local_addr();
    info!("gRPC server listening on: {}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(server.serve_with_shutdown(async move {
        let _ = shutdown_rx.await;
        info!("gRPC server shutting down");
    }));

    sleep(Duration::from_millis(100)).await;

    let client = client::connect(&addr.to_string()).await?;
    Ok((client, addr, shutdown_tx, server_handle))
}

#[tokio::test]
async fn bind_on_occupied_port_fails_without_startup_message() {
    let _ = tracing_subscriber::fmt::try_init();
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();

    let mut out = Vec::new();
    let result = run_until(
        &local_config(port),
        UnavailableRecommender,
        &mut out,
        std::future::ready(()),
    )
    .await;

    match result {
        Err(ServerError::Bind { addr, source }) => {
            assert_eq!(addr, format!("127.0.0.1:{}", port));
            assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
        }
        other => panic!("expected bind error, got {:?}", other),
    }
    assert!(out.is_empty(), "startup message must not be printed on bind failure");
}

#[tokio::test]
async fn unresolvable_host_is_a_bind_error() {
    let config = ServerConfig {
        host: "no-such-host.invalid".to_string(),
        port: 0,
        ..ServerConfig::default()
    };
    let result = RpcServer::bind(&config, Arc::new(UnavailableRecommender)).await;
    assert!(matches!(result, Err(ServerError::Bind { .. })));
}

#[tokio::test]
async fn out_of_range_port_fails_at_bind_without_startup_message() {
    for port in [70000_i64, -1] {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..ServerConfig::default()
        };
        let mut out = Vec::new();
        let result = run_until(&config, UnavailableRecommender, &mut out, std::future::ready(())).await;

        match result {
            Err(ServerError::Bind { addr, source }) => {
                assert_eq!(addr, format!("127.0.0.1:{}", port));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
            }
            other => panic!("expected bind error for port {}, got {:?}", port, other),
        }
        assert!(out.is_empty());
    }
}

#[tokio::test]
async fn free_port_prints_startup_message_and_serves_until_shutdown() {
    let _ = tracing_subscriber::fmt::try_init();
    let port = free_port();
    let config = local_config(port);

    let mut out = Vec::new();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let serve = run_until(&config, UnavailableRecommender, &mut out, async move {
        let _ = shutdown_rx.await;
    });
    let exercise = async move {
        sleep(Duration::from_millis(200)).await;
        let mut client = client::connect(&format!("127.0.0.1:{}", port)).await.unwrap();
        let err = client::get_recommend_tags(&mut client, 1, 5).await.unwrap_err();
        drop(client);
        let _ = shutdown_tx.send(());
        err
    };

    let (served, err) = tokio::join!(serve, exercise);
    assert!(served.is_ok(), "server should stop cleanly: {:?}", served);
    match err {
        ClientError::Rpc(status) => assert_eq!(status.code(), Code::Unimplemented),
        other => panic!("expected RPC status, got {:?}", other),
    }

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed, format!("Server started at 127.0.0.1:{}\n", port));
}

#[tokio::test]
async fn ephemeral_port_is_reported_in_startup_message() {
    let server = RpcServer::bind(&local_config(0), Arc::new(UnavailableRecommender))
        .await
        .unwrap();
    let port = server.local_addr().port();
    assert_ne!(port, 0);
    assert_eq!(server.startup_message(), format!("Server started at 127.0.0.1:{}", port));
}

#[tokio::test]
async fn weights_and_training_round_trip_through_the_server() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();
    let (mut client, _addr, shutdown_tx, server_handle) = setup_test_server(FixedRecommender).await?;

    let records = vec![
        InterestRecord { user_id: 1, tag_id: 10, rating: 4.5, last_view_time: 1_700_000_000 },
        InterestRecord { user_id: 2, tag_id: 11, rating: 5.0, last_view_time: 1_700_000_100 },
    ];

    let weights = client::get_weight(&mut client, records.clone()).await?;
    assert_eq!(
        weights,
        vec![
            TagWeight { user_id: 1, tag_id: 10, weight: 5.5 },
            TagWeight { user_id: 2, tag_id: 11, weight: 6.0 },
        ]
    );

    let trained = client::train_model(&mut client, records).await?;
    assert_eq!(trained.len(), 2);
    assert!(trained.iter().all(|w| w.weight == 100.0));

    drop(client);
    let _ = shutdown_tx.send(());
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn recommendations_respect_limits_and_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (mut client, _addr, shutdown_tx, server_handle) = setup_test_server(FixedRecommender).await?;

    let tags = client::get_recommend_tags(&mut client, 7, 3).await?;
    assert_eq!(tags, vec![0, 1, 2]);

    let tags = client::get_recommend_tags(&mut client, 7, 0).await?;
    assert_eq!(tags.len(), 20);

    let users = client::get_recommend_users(&mut client, 7, 0).await?;
    assert_eq!(users.len(), 10);
    assert_eq!(users[0], UserMatch { user_id: 8, score: 1.0 });

    drop(client);
    let _ = shutdown_tx.send(());
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn invalid_requests_and_unknown_users_map_to_status_codes() -> Result<(), Box<dyn std::error::Error>> {
    let (mut client, _addr, shutdown_tx, server_handle) = setup_test_server(FixedRecommender).await?;

    match client::get_recommend_users(&mut client, -1, 5).await {
        Err(ClientError::Rpc(status)) => assert_eq!(status.code(), Code::InvalidArgument),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }

    match client::get_recommend_tags(&mut client, 404, 5).await {
        Err(ClientError::Rpc(status)) => assert_eq!(status.code(), Code::NotFound),
        other => panic!("expected NotFound, got {:?}", other),
    }

    let bad = vec![InterestRecord { user_id: 1, tag_id: -3, rating: 1.0, last_view_time: 0 }];
    match client::get_weight(&mut client, bad).await {
        Err(ClientError::Rpc(status)) => assert_eq!(status.code(), Code::InvalidArgument),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }

    drop(client);
    let _ = shutdown_tx.send(());
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn server_stops_accepting_after_shutdown() -> Result<(), Box<dyn std::error::Error>> {
    let (client, addr, shutdown_tx, server_handle) = setup_test_server(UnavailableRecommender).await?;
    drop(client);

    let _ = shutdown_tx.send(());
    tokio::time::timeout(Duration::from_secs(5), server_handle).await???;

    assert!(client::connect(&addr.to_string()).await.is_err());
    Ok(())
}
