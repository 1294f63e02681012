use pretty_assertions::assert_eq;

use super::{MxRecord, enrich, enrich_all, reverse_name};
use crate::dns::RecordType;
use crate::test_support::StubResolver;

#[test]
fn reverse_name_for_ipv4_only() {
    assert_eq!(
        reverse_name("192.0.2.10").as_deref(),
        Some("10.2.0.192.in-addr.arpa")
    );
    assert_eq!(reverse_name("2001:db8::1"), None);
    assert_eq!(reverse_name("not an ip"), None);
}

#[tokio::test]
async fn enrich_collects_v4_then_v6_and_reverses_first_only() {
    let mut stub = StubResolver::new();
    stub.insert_records("mx.example.com", RecordType::A, ["192.0.2.10", "192.0.2.11"]);
    stub.insert_records("mx.example.com", RecordType::Aaaa, ["2001:db8::25"]);
    stub.insert_records(
        "10.2.0.192.in-addr.arpa",
        RecordType::Ptr,
        ["Mail.Example.com."],
    );

    let record = enrich(&stub, MxRecord::new(10, "mx.example.com", 300)).await;

    assert_eq!(
        record.ip_addresses,
        Some(vec![
            "192.0.2.10".to_string(),
            "192.0.2.11".to_string(),
            "2001:db8::25".to_string(),
        ])
    );
    assert_eq!(record.ptr_names, Some(vec!["mail.example.com".to_string()]));
    assert!(!stub.asked("11.2.0.192.in-addr.arpa", RecordType::Ptr));
}

#[tokio::test]
async fn enrich_skips_ptr_when_only_ipv6() {
    let mut stub = StubResolver::new();
    stub.insert_records("v6.example.com", RecordType::Aaaa, ["2001:db8::25"]);

    let record = enrich(&stub, MxRecord::new(10, "v6.example.com", 300)).await;

    assert_eq!(record.ip_addresses, Some(vec!["2001:db8::25".to_string()]));
    assert_eq!(record.ptr_names, Some(Vec::new()));
    assert!(
        stub.queries()
            .iter()
            .all(|(_, record_type)| *record_type != RecordType::Ptr)
    );
}

#[tokio::test]
async fn enrich_degrades_failures_to_empty() {
    let mut stub = StubResolver::new();
    stub.fail("down.example.com", RecordType::A);
    stub.fail("down.example.com", RecordType::Aaaa);

    let record = enrich(&stub, MxRecord::new(5, "down.example.com", 60)).await;

    assert!(record.is_enriched());
    assert_eq!(record.ip_addresses, Some(Vec::new()));
    assert_eq!(record.ptr_names, None);
}

#[tokio::test]
async fn enrich_all_keeps_input_order_and_isolates_failures() {
    let mut stub = StubResolver::new();
    stub.fail("mx1.example.com", RecordType::A);
    stub.insert_records("mx2.example.com", RecordType::A, ["198.51.100.7"]);

    let records = vec![
        MxRecord::new(10, "mx1.example.com", 300),
        MxRecord::new(20, "mx2.example.com", 300),
    ];
    let enriched = enrich_all(&stub, records).await;

    assert_eq!(enriched[0].exchange, "mx1.example.com");
    assert_eq!(enriched[0].ip_addresses, Some(Vec::new()));
    assert_eq!(enriched[1].exchange, "mx2.example.com");
    assert_eq!(
        enriched[1].ip_addresses,
        Some(vec!["198.51.100.7".to_string()])
    );
    assert_eq!(enriched[1].ptr_names, Some(Vec::new()));
}

#[tokio::test]
async fn enrich_leaves_null_mx_alone() {
    let stub = StubResolver::new();

    let record = enrich(&stub, MxRecord::new(0, "", 300)).await;

    assert!(record.is_null());
    assert_eq!(record.ip_addresses, None);
    assert_eq!(record.ptr_names, None);
    assert!(stub.queries().is_empty());
}
