use std::time::Duration;

use peerseek_core::Category;
use peerseek_services::{PeerRouting, ReadinessMonitor, ReadinessState};

use crate::*;

const POLL: Duration = Duration::from_millis(20);

#[tokio::test]
async fn start_waits_for_first_connection() -> anyhow::Result<()> {
    let node = FakeNode::start_with_peers(vec![], Ending::Exhausted, &[0, 0, 2]).await?;
    let mut console = node.console(LookupSession::default()).await?;
    let mut monitor = ReadinessMonitor::new(POLL);

    let peers = console.start(&mut monitor).await;

    assert_eq!(peers, 2);
    assert_eq!(monitor.checks(), 3);
    assert_eq!(monitor.state(), ReadinessState::Ready { peers: 2 });
    assert_eq!(node.swarm_calls(), 3);

    assert_eq!(
        transcript(console.sink()),
        vec![
            "<reset>".to_string(),
            "Waiting for peers...".to_string(),
            "<reset>".to_string(),
            "Node ready".to_string(),
            "Try finding a Peer ID".to_string(),
            format!("E.g. {}", peerseek_core::config::EXAMPLE_PEER_ID),
        ]
    );
    assert!(console
        .sink()
        .visible()
        .iter()
        .all(|r| r.category == Category::Active));
    Ok(())
}

#[tokio::test]
async fn ready_is_terminal() -> anyhow::Result<()> {
    let node = FakeNode::start_with_peers(vec![], Ending::Exhausted, &[1, 0]).await?;
    let client = KuboClient::connect(&node.api_url).await?;
    let mut monitor = ReadinessMonitor::new(POLL);

    assert_eq!(monitor.state(), ReadinessState::Initializing);
    assert_eq!(monitor.check(&client).await, ReadinessState::Ready { peers: 1 });
    // The node now reports no peers, but readiness is not revisited.
    assert_eq!(monitor.check(&client).await, ReadinessState::Ready { peers: 1 });
    assert_eq!(node.swarm_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_swarm_reads_as_zero_peers() -> anyhow::Result<()> {
    let node = FakeNode::start_with_peers(vec![], Ending::Exhausted, &[0]).await?;
    let client = KuboClient::connect(&node.api_url).await?;

    assert!(client.connected_peers().await?.is_empty());

    let mut monitor = ReadinessMonitor::new(POLL);
    assert_eq!(
        monitor.check(&client).await,
        ReadinessState::Polling { last_count: 0 }
    );
    Ok(())
}

#[tokio::test]
async fn node_identity_is_learned_on_connect() -> anyhow::Result<()> {
    let node = FakeNode::start(vec![], Ending::Exhausted).await?;
    let client = KuboClient::connect(&format!("{}/", node.api_url)).await?;

    assert_eq!(client.node_id(), LOCAL_NODE);
    assert_eq!(client.api_base(), format!("{}/api/v0", node.api_url));
    Ok(())
}
