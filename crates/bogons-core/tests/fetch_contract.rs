//! Contract Test: Feed Fetching
//!
//! Constraints verified:
//! - Comment lines are skipped, every other line becomes one range
//! - Ranges keep feed order
//! - One malformed or wrong-family line fails the whole feed
//! - Transport failures surface as transport errors, never as short lists
//! - An empty feed is a valid, empty list

mod common;

use bogons_core::fetcher::fetch_list;
use bogons_core::{Error, Family};
use common::*;

async fn fetch_v4(body: FeedResponse) -> bogons_core::Result<Vec<String>> {
    let source = StaticFeedSource::new(body, FeedResponse::Body(String::new()));
    fetch_list(&source, IPV4_URL, Family::V4)
        .await
        .map(|ranges| ranges.iter().map(|r| r.to_string()).collect())
}

async fn fetch_v6(body: FeedResponse) -> bogons_core::Result<Vec<String>> {
    let source = StaticFeedSource::new(FeedResponse::Body(String::new()), body);
    fetch_list(&source, IPV6_URL, Family::V6)
        .await
        .map(|ranges| ranges.iter().map(|r| r.to_string()).collect())
}

#[tokio::test]
async fn well_formed_feed_keeps_count_and_order() {
    let ranges = fetch_v4(FeedResponse::Body(IPV4_SAMPLE.to_string()))
        .await
        .expect("sample feed is valid");

    let expected: Vec<String> = split_lines(IPV4_SAMPLE)
        .into_iter()
        .filter(|l| !l.starts_with('#'))
        .collect();
    assert_eq!(ranges, expected);

    let ranges = fetch_v6(FeedResponse::Body(IPV6_SAMPLE.to_string()))
        .await
        .expect("sample feed is valid");
    assert_eq!(ranges.len(), 6);
    assert_eq!(ranges[0], "::/8");
    assert_eq!(ranges[5], "fe80::/10");
}

#[tokio::test]
async fn comments_anywhere_are_skipped() {
    let body = "# header\n10.0.0.0/8\n# interleaved\n192.168.0.0/16\n#\n";
    let ranges = fetch_v4(FeedResponse::Body(body.to_string())).await.unwrap();
    assert_eq!(ranges, vec!["10.0.0.0/8", "192.168.0.0/16"]);
}

#[tokio::test]
async fn empty_feed_is_valid() {
    assert!(fetch_v4(FeedResponse::Body(String::new())).await.unwrap().is_empty());
    assert!(
        fetch_v6(FeedResponse::Body("# only a header\n".to_string()))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn final_line_without_newline_is_kept() {
    let ranges = fetch_v4(FeedResponse::Body("# header\n10.0.0.0/8".to_string()))
        .await
        .unwrap();
    assert_eq!(ranges, vec!["10.0.0.0/8"]);
}

#[tokio::test]
async fn crlf_feed_parses_like_lf_feed() {
    let ranges = fetch_v4(FeedResponse::Body("# header\r\n10.0.0.0/8\r\n".to_string()))
        .await
        .unwrap();
    assert_eq!(ranges, vec!["10.0.0.0/8"]);
}

#[tokio::test]
async fn malformed_line_fails_whole_feed() {
    let body = "# header\n10.0.0.0/8\n172.16.0.0/12\n10.0.0.0/8,\n192.168.0.0/16\n";

    match fetch_v4(FeedResponse::Body(body.to_string())).await {
        Err(Error::Parse {
            family,
            line_number,
            line,
            ..
        }) => {
            assert_eq!(family, Family::V4);
            assert_eq!(line_number, 4);
            assert_eq!(line, "10.0.0.0/8,");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn ipv6_literal_in_ipv4_feed_is_rejected() {
    let body = "# header\n10.0.0.0/8\n2001:db8::/32\n";

    match fetch_v4(FeedResponse::Body(body.to_string())).await {
        Err(Error::FamilyMismatch {
            family,
            line_number,
            network,
        }) => {
            assert_eq!(family, Family::V4);
            assert_eq!(line_number, 3);
            assert_eq!(network.to_string(), "2001:db8::/32");
        }
        other => panic!("expected family mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn ipv4_literal_in_ipv6_feed_is_rejected() {
    let result = fetch_v6(FeedResponse::Body("fc00::/7\n198.51.100.0/24\n".to_string())).await;
    assert!(
        matches!(result, Err(Error::FamilyMismatch { line_number: 2, .. })),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn ipv4_mapped_literal_belongs_to_ipv6_feed() {
    let body = "fc00::/7\n::ffff:10.0.0.0/104\n";

    let ranges = fetch_v6(FeedResponse::Body(body.to_string())).await.unwrap();
    assert_eq!(ranges.len(), 2);

    let result = fetch_v4(FeedResponse::Body("::ffff:10.0.0.0/104\n".to_string())).await;
    assert!(matches!(result, Err(Error::FamilyMismatch { .. })));
}

#[tokio::test]
async fn refused_request_is_a_transport_error() {
    match fetch_v4(FeedResponse::Refused("connection refused".to_string())).await {
        Err(Error::Transport {
            family,
            url,
            message,
        }) => {
            assert_eq!(family, Family::V4);
            assert_eq!(url, IPV4_URL);
            assert!(message.contains("connection refused"));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn broken_stream_discards_partial_list() {
    let result = fetch_v4(FeedResponse::BrokenAfter(
        "10.0.0.0/8\n172.16.0.0/12\n".to_string(),
        "connection reset by peer".to_string(),
    ))
    .await;

    assert!(
        matches!(result, Err(Error::Transport { .. })),
        "a truncated feed must not be returned as a list, got {:?}",
        result
    );
}
