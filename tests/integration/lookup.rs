use std::time::Duration;

use axum::http::StatusCode;
use peerseek_core::classify::pretty;
use peerseek_core::event::{stage, FIND_NODE};
use peerseek_core::{Category, PeerInfo, PeerResponse};
use peerseek_services::{LookupError, LookupSession, RoutingError};

use crate::*;

fn addr(s: &str) -> Vec<String> {
    vec![s.to_string()]
}

#[tokio::test]
async fn found_peer_is_narrated_end_to_end() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![
            event(DIALING_PEER, "QmA", vec![], ""),
            event(
                PEER_RESPONSE,
                "QmA",
                vec![
                    ("QmB", addr("/ip4/1.2.3.4/tcp/4001")),
                    ("QmC", addr("/ip6/::1/tcp/4001")),
                ],
                "",
            ),
        ],
        Ending::Found {
            id: TARGET.into(),
            addrs: addr("/ip4/5.6.7.8/tcp/4001"),
        },
    )
    .await?;
    let mut console = node.console(LookupSession::default()).await?;

    let outcome = console.submit_lookup(TARGET).await.expect("valid id");
    let info = outcome?;
    assert_eq!(info, PeerInfo::new(TARGET, addr("/ip4/5.6.7.8/tcp/4001")));

    let payload = pretty(&PeerResponse {
        from: "QmA".into(),
        name: stage::PEER_RESPONSE.into(),
        message_name: FIND_NODE.into(),
        closer: vec![
            PeerInfo::new("QmB", addr("/ip4/1.2.3.4/tcp/4001")),
            PeerInfo::new("QmC", addr("/ip6/::1/tcp/4001")),
        ],
    });
    assert_eq!(
        transcript(console.sink()),
        vec![
            "<reset>".to_string(),
            format!("Searching for peer {TARGET}..."),
            "QmA DIAL_PEER".to_string(),
            "QmA PEER_RESPONSE Closer nodes QmB, QmC".to_string(),
            payload,
            "<reset>".to_string(),
            pretty(&info),
        ]
    );

    let visible = console.sink().visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].category, Category::Success);
    assert_eq!(node.lookups(), vec![TARGET.to_string()]);
    Ok(())
}

#[tokio::test]
async fn unknown_event_types_are_silent() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![
            event(ADDING_PEER, "QmA", vec![], ""),
            event(SENDING_QUERY, "QmA", vec![], ""),
            event(42, "QmA", vec![], ""),
        ],
        Ending::Found {
            id: TARGET.into(),
            addrs: vec![],
        },
    )
    .await?;
    let mut console = node.console(LookupSession::default()).await?;

    console.submit_lookup(TARGET).await.expect("valid id")?;

    let texts = transcript(console.sink());
    assert_eq!(texts[2], "QmA SEND_QUERY FIND_NODE");
    assert_eq!(texts[3], "<reset>");
    assert_eq!(texts.len(), 5);
    Ok(())
}

#[tokio::test]
async fn query_errors_are_translated() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![
            event(
                QUERY_ERROR,
                "QmBad",
                vec![],
                "failed to dial: connection gater denied all addresses",
            ),
            event(
                QUERY_ERROR,
                "QmOther",
                vec![],
                "The dial request has no valid addresses",
            ),
        ],
        Ending::Found {
            id: TARGET.into(),
            addrs: vec![],
        },
    )
    .await?;
    let mut console = node.console(LookupSession::default()).await?;

    console.submit_lookup(TARGET).await.expect("valid id")?;

    let records = console.sink().records();
    assert_eq!(
        records[1].text,
        "QmBad QUERY_ERROR The remote peer had no public addresses"
    );
    assert_eq!(records[1].category, Category::Error);
    assert_eq!(
        records[2].text,
        "QmOther QUERY_ERROR The remote peer had no supported addresses"
    );
    assert_eq!(records.last().unwrap().category, Category::Success);
    Ok(())
}

#[tokio::test]
async fn exhausted_stream_reports_not_found() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![event(DIALING_PEER, "QmA", vec![], "")],
        Ending::Exhausted,
    )
    .await?;
    let mut console = node.console(LookupSession::default()).await?;

    let outcome = console.submit_lookup(TARGET).await.expect("valid id");
    assert!(matches!(
        outcome,
        Err(LookupError::Routing(RoutingError::NotFound))
    ));

    let visible = console.sink().visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].text, "routing: not found");
    assert_eq!(visible[0].category, Category::Error);
    Ok(())
}

#[tokio::test]
async fn node_rpc_error_is_shown() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![],
        Ending::Fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "routing: not found".into(),
        ),
    )
    .await?;
    let mut console = node.console(LookupSession::default()).await?;

    let outcome = console.submit_lookup(TARGET).await.expect("valid id");
    assert!(matches!(
        outcome,
        Err(LookupError::Routing(RoutingError::Node { .. }))
    ));
    let visible = console.sink().visible();
    assert_eq!(visible[0].text, "routing: not found");
    Ok(())
}

#[tokio::test]
async fn stalled_lookup_times_out() -> anyhow::Result<()> {
    let node = FakeNode::start(
        vec![event(DIALING_PEER, "QmA", vec![], "")],
        Ending::Stall,
    )
    .await?;
    let mut console = node
        .console(LookupSession::new(Duration::from_millis(300)))
        .await?;

    let outcome = console.submit_lookup(TARGET).await.expect("valid id");
    assert!(matches!(outcome, Err(LookupError::Timeout(_))));

    // Progress seen before the deadline is still narrated.
    assert!(transcript(console.sink()).contains(&"QmA DIAL_PEER".to_string()));
    let visible = console.sink().visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(
        visible[0].text,
        "TimeoutError: lookup did not complete within 300 ms"
    );
    Ok(())
}

#[tokio::test]
async fn invalid_input_never_reaches_the_node() -> anyhow::Result<()> {
    let node = FakeNode::start(vec![], Ending::Exhausted).await?;
    let mut console = node.console(LookupSession::default()).await?;

    for raw in ["", "   ", "not-a-peer-id"] {
        assert!(console.submit_lookup(raw).await.is_none());
    }

    let records = console.sink().records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].text, "Invalid PeerId");
    assert!(records[2].text.starts_with("Invalid PeerId: "));
    assert!(records.iter().all(|r| r.category == Category::Error));
    assert!(node.lookups().is_empty());
    Ok(())
}

#[tokio::test]
async fn consecutive_lookups_start_fresh() -> anyhow::Result<()> {
    let node = FakeNode::start(vec![], Ending::Exhausted).await?;
    let mut console = node.console(LookupSession::default()).await?;

    let _ = console.submit_lookup(TARGET).await;
    let _ = console.submit_lookup(TARGET).await;

    let visible = console.sink().visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].text, "routing: not found");
    assert_eq!(node.lookups().len(), 2);
    Ok(())
}

#[tokio::test]
async fn connect_fails_without_a_node() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = KuboClient::connect(&format!("http://127.0.0.1:{port}"))
        .await
        .unwrap_err();
    assert!(matches!(err, RoutingError::Transport(_)));
}
