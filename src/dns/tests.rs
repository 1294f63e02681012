use std::time::Duration;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    DnsAnswer, DnsQuery, DohClient, DohOptions, QueryError, RecordType, decode_mx, decode_txt,
};

fn mx(data: &str) -> DnsAnswer {
    DnsAnswer::new("example.com.", RecordType::Mx, 300, data)
}

fn txt(data: &str) -> DnsAnswer {
    DnsAnswer::new("example.com.", RecordType::Txt, 300, data)
}

async fn client_for(server: &MockServer) -> DohClient {
    let options = DohOptions::new()
        .with_endpoint(format!("{}/resolve", server.uri()))
        .with_timeout(Duration::from_millis(300));
    DohClient::with_options(options).expect("client builds")
}

#[test]
fn decode_mx_sorts_ascending_and_keeps_tie_order() {
    let answers = vec![
        mx("20 mx3.example.com."),
        mx("10 MX1.example.com."),
        mx("10 mx2.example.com."),
    ];
    let records = decode_mx(&answers);
    let order: Vec<(u16, &str)> = records
        .iter()
        .map(|record| (record.priority, record.exchange.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (10, "mx1.example.com"),
            (10, "mx2.example.com"),
            (20, "mx3.example.com"),
        ]
    );
    assert!(records.iter().all(|record| record.ip_addresses.is_none()));
}

#[test]
fn decode_mx_skips_malformed_answers() {
    let answers = vec![mx("mail.example.com."), mx("x y"), mx("5 ok.example.com")];
    let records = decode_mx(&answers);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].exchange, "ok.example.com");
    assert_eq!(records[0].ttl, 300);
}

#[test]
fn decode_empty_answer_sets() {
    assert!(decode_mx(&[]).is_empty());
    assert!(decode_txt(&[]).is_empty());
}

#[test]
fn decode_txt_strips_one_quote_layer() {
    let answers = vec![
        txt("\"v=spf1 -all\""),
        txt("plain"),
        txt("\"\"nested\"\""),
    ];
    assert_eq!(
        decode_txt(&answers),
        vec!["v=spf1 -all", "plain", "\"nested\""]
    );
}

proptest! {
    #[test]
    fn decode_mx_output_is_sorted(priorities in proptest::collection::vec(0u16..100, 0..16)) {
        let answers: Vec<DnsAnswer> = priorities
            .iter()
            .enumerate()
            .map(|(idx, priority)| mx(&format!("{priority} mx{idx}.example.com.")))
            .collect();
        let records = decode_mx(&answers);
        prop_assert_eq!(records.len(), priorities.len());
        prop_assert!(records.windows(2).all(|pair| pair[0].priority <= pair[1].priority));
        // ties keep the DNS order, which is the index embedded in the exchange
        for pair in records.windows(2) {
            if pair[0].priority == pair[1].priority {
                let left: usize = pair[0].exchange[2..].split('.').next().unwrap().parse().unwrap();
                let right: usize = pair[1].exchange[2..].split('.').next().unwrap().parse().unwrap();
                prop_assert!(left < right);
            }
        }
    }
}

#[test]
fn record_type_codes_round_trip() {
    for record_type in [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Mx,
        RecordType::Txt,
        RecordType::Ptr,
    ] {
        assert_eq!(RecordType::from_code(record_type.code()), Some(record_type));
    }
    assert_eq!(RecordType::from_code(5), None);
}

#[tokio::test]
async fn doh_client_returns_matching_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("name", "example.com"))
        .and(query_param("type", "15"))
        .and(header("accept", "application/dns-json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": 0,
            "Answer": [
                { "name": "example.com.", "type": 5, "TTL": 60, "data": "alias.example.net." },
                { "name": "example.com.", "type": 15, "TTL": 300, "data": "10 mx.example.com." }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let answers = client
        .query("example.com", RecordType::Mx)
        .await
        .expect("lookup succeeds");
    assert_eq!(
        answers,
        vec![DnsAnswer::new(
            "example.com.",
            RecordType::Mx,
            300,
            "10 mx.example.com."
        )]
    );
}

#[tokio::test]
async fn doh_client_joins_split_txt_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("type", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": 0,
            "Answer": [
                {
                    "name": "example.com.",
                    "type": 16,
                    "TTL": 300,
                    "data": "\"v=spf1 a \" \"include:_spf.example.net -all\""
                },
                { "name": "example.com.", "type": 16, "TTL": 300, "data": "\"say \\\"hi\\\" there\"" },
                { "name": "example.com.", "type": 16, "TTL": 300, "data": "plain text" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let answers = client
        .query("example.com", RecordType::Txt)
        .await
        .expect("lookup succeeds");
    assert_eq!(
        decode_txt(&answers),
        vec![
            "v=spf1 a include:_spf.example.net -all",
            "say \"hi\" there",
            "plain text"
        ]
    );
}

#[tokio::test]
async fn doh_client_treats_nxdomain_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 3 })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let answers = client
        .query("_dmarc.example.com", RecordType::Txt)
        .await
        .expect("nxdomain is not a failure");
    assert!(answers.is_empty());
}

#[tokio::test]
async fn doh_client_reports_servfail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 2 })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .query("example.com", RecordType::Txt)
        .await
        .expect_err("servfail is unavailable");
    assert!(matches!(err, QueryError::DnsStatus { status: 2, .. }));
}

#[tokio::test]
async fn doh_client_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .query("example.com", RecordType::A)
        .await
        .expect_err("502 is unavailable");
    assert!(matches!(err, QueryError::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn doh_client_reports_garbage_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .query("example.com", RecordType::A)
        .await
        .expect_err("html is not a DNS answer");
    assert!(matches!(err, QueryError::Decode { .. }));
}

#[tokio::test]
async fn doh_client_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Status": 0 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .query("slow.example.com", RecordType::A)
        .await
        .expect_err("slow answer times out");
    assert!(matches!(err, QueryError::Timeout { .. }));
}

#[test]
fn doh_options_ignore_empty_overrides() {
    let options = DohOptions::new()
        .with_endpoint("  ")
        .with_timeout(Duration::ZERO);
    assert_eq!(options, DohOptions::default());
}
