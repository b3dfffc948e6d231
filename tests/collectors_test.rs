//! Metric mapper tests
//!
//! Catalog coverage, label conventions and per-channel sample counts.

mod common;

use common::{count, find, STATUS_DOCUMENT, STATUS_DOCUMENT_SAMPLES};
use hub4_exporter::collectors::{failed_device, map_snapshot, number_label};
use hub4_exporter::config::Device;
use hub4_exporter::hub4::decode;
use hub4_exporter::hub4::types::{TelemetrySnapshot, UsChannel};
use std::collections::HashSet;

fn device() -> Device {
    Device::new("X", "Y")
}

fn map_document(body: &str) -> Vec<hub4_exporter::metrics::MetricSample> {
    let snapshot = decode(body.as_bytes()).expect("Failed to decode");
    map_snapshot(&device(), &snapshot)
}

#[test]
fn test_flags_from_status_header() {
    // Given: Network access (5) and BPI state (7) both "true"
    let body = r#"[6100000000, 3300000000, "", "", 4, "true", 16, "true", 3.1, "", 10,
                   100000000, 150000000, 0]"#;

    // When: Decoding and mapping
    let samples = map_document(body);

    // Then: Both flags map to 1 with the device labels
    let labels = [("instance", "X"), ("address", "Y")];
    let access = find(&samples, "hub4_network_access", &labels).expect("network access");
    let bpi = find(&samples, "hub4_bpi_state", &labels).expect("BPI state");
    assert_eq!(access.value, 1.0);
    assert_eq!(bpi.value, 1.0);

    assert_eq!(find(&samples, "hub4_aquired_DS_channel", &labels).unwrap().value, 6.1e9);
    assert_eq!(find(&samples, "hub4_provisioning_status", &labels).unwrap().value, 4.0);
    assert_eq!(find(&samples, "hub4_docsis_version", &labels).unwrap().value, 3.1);
    assert_eq!(find(&samples, "hub4_ds_traffic_rate", &labels).unwrap().value, 1e8);
    assert_eq!(find(&samples, "hub4_ds_traffic_rate_burst", &labels).unwrap().value, 1.5e8);
    // Fields past the end of the document are zero
    assert_eq!(find(&samples, "hub4_us_flow_id", &labels).unwrap().value, 0.0);
    assert_eq!(find(&samples, "hub4_scrape_status", &labels).unwrap().value, 1.0);
}

#[test]
fn test_ds_channel_labelled_by_frequency() {
    // Given: One locked DOCSIS 3.0 downstream channel in field 20
    let body = serde_json::json!([
        0, 0, "", "", 0, "", 0, "", 0, "", 0, 0, 0, 0, 0, 0, 0, 0, 0, "",
        [[1, 579000000, 2.1, 38.2, "256QAM", "Locked", 41.2, 0, 3]]
    ])
    .to_string();

    // When: Mapping
    let samples = map_document(&body);

    // Then: Channel metrics carry the frequency label
    let channel = [("instance", "X"), ("address", "Y"), ("frequency", "579000000")];
    assert_eq!(find(&samples, "hub4_ds_channel_locked", &channel).unwrap().value, 1.0);
    assert_eq!(find(&samples, "hub4_ds_channel_power", &channel).unwrap().value, 2.1);
    assert_eq!(find(&samples, "hub4_ds_channel_snr", &channel).unwrap().value, 38.2);
    assert_eq!(find(&samples, "hub4_ds_channel_rxmer", &channel).unwrap().value, 41.2);
    assert_eq!(find(&samples, "hub4_ds_channel_prers_errors", &channel).unwrap().value, 0.0);
    assert_eq!(find(&samples, "hub4_ds_channel_postrs_errors", &channel).unwrap().value, 3.0);
}

#[test]
fn test_unlocked_ds_channel_maps_to_zero() {
    let body = serde_json::json!([
        0, 0, "", "", 0, "", 0, "", 0, "", 0, 0, 0, 0, 0, 0, 0, 0, 0, "",
        [[1, 579000000, 2.1, 38.2, "256QAM", "locked", 41.2, 0, 3]]
    ])
    .to_string();

    let samples = map_document(&body);

    let locked = find(&samples, "hub4_ds_channel_locked", &[("frequency", "579000000")]);
    assert_eq!(locked.unwrap().value, 0.0);
}

#[test]
fn test_full_document_sample_count() {
    let samples = map_document(STATUS_DOCUMENT);

    assert_eq!(samples.len(), STATUS_DOCUMENT_SAMPLES);
    assert_eq!(count(&samples, "hub4_ds_channel_power"), 3);
    assert_eq!(count(&samples, "hub4_us_channel_power"), 2);
    assert_eq!(count(&samples, "hub4_us_channel_timeouts"), 8);
    assert_eq!(count(&samples, "hub4_ds31_channel_width"), 1);
}

#[test]
fn test_every_sample_carries_device_labels() {
    let samples = map_document(STATUS_DOCUMENT);

    for sample in &samples {
        assert_eq!(sample.label("instance"), Some("X"), "{}", sample.name());
        assert_eq!(sample.label("address"), Some("Y"), "{}", sample.name());
        assert_eq!(sample.labels[0].0, "instance");
        assert_eq!(sample.labels[1].0, "address");
    }
}

#[test]
fn test_no_duplicate_label_sets() {
    let samples = map_document(STATUS_DOCUMENT);

    let mut seen = HashSet::new();
    for sample in &samples {
        let key = (sample.name(), sample.labels.clone());
        assert!(seen.insert(key), "duplicate sample {:?}", sample);
    }
}

#[test]
fn test_us_channel_timeouts_by_class() {
    let samples = map_document(STATUS_DOCUMENT);

    let channel = [("frequency", "49600000")];
    assert_eq!(find(&samples, "hub4_us_channel_power", &channel).unwrap().value, 44.3);

    for (class, expected) in [("1", 0.0), ("2", 0.0), ("3", 2.0), ("4", 0.0)] {
        let sample = find(
            &samples,
            "hub4_us_channel_timeouts",
            &[("frequency", "49600000"), ("timeout_class", class)],
        )
        .expect("timeout sample");
        assert_eq!(sample.value, expected, "timeout class {}", class);
    }
}

#[test]
fn test_us_padding_rows_produce_no_samples() {
    // Given: An upstream table with a padding row between two real channels
    let body = r#"[0, 0, "", "", 0, "", 0, "", 0, "", 0, 0, 0, 0, 0, 0, 0, 0, 0, "", [],
                   [[7, 36200000, 45.0, "5120", "64QAM", "ATDMA", 1, 2, 3, 4],
                    [0, 0, 0, "0", "", "", 0, 0, 0, 0],
                    [8, 29800000, 44.5, "5120", "64QAM", "ATDMA", 0, 0, 0, 0]]]"#;

    // When: Decoding and mapping
    let samples = map_document(body);

    // Then: Only the real channels contribute, with exactly 5 samples each
    let upstream: Vec<_> = samples
        .iter()
        .filter(|s| s.name().starts_with("hub4_us_channel_") && s.name() != "hub4_us_channel_count")
        .collect();
    assert_eq!(upstream.len(), 10);
    let frequencies: HashSet<_> = upstream.iter().filter_map(|s| s.label("frequency")).collect();
    assert_eq!(frequencies, HashSet::from(["36200000", "29800000"]));
}

#[test]
fn test_each_us_channel_yields_power_and_timeouts() {
    let snapshot = TelemetrySnapshot {
        us_channels: vec![UsChannel {
            id: 7,
            frequency: 36_200_000.0,
            power: 45.0,
            timeouts: [1.0, 2.0, 3.0, 4.0],
            ..Default::default()
        }],
        ..Default::default()
    };

    let samples = map_snapshot(&device(), &snapshot);

    assert_eq!(count(&samples, "hub4_us_channel_power"), 1);
    assert_eq!(count(&samples, "hub4_us_channel_timeouts"), 4);
}

#[test]
fn test_ds31_channels_with_unusual_ids_stay_distinct() {
    // Given: OFDM channels whose ids are not plain integers
    let body = r#"[0, 0, "", "", 0, "", 0, "", 0, "", 0, 0, 0, 0, 0, 0, 0, 0, 0, "", [], [], [],
                   [[33.5, 94], [-1, 96], ["ofdm-a", 98]]]"#;

    // When: Decoding and mapping
    let samples = map_document(body);

    // Then: Every channel gets its own id label
    let ids: HashSet<_> = samples
        .iter()
        .filter(|s| s.name() == "hub4_ds31_channel_width")
        .filter_map(|s| s.label("id"))
        .collect();
    assert_eq!(ids, HashSet::from(["33.5", "-1", "ofdm-a"]));
}

#[test]
fn test_ds31_channel_labelled_by_id() {
    let samples = map_document(STATUS_DOCUMENT);

    let channel = [("instance", "X"), ("address", "Y"), ("id", "33")];
    let expect = |name: &str, value: f64| {
        let sample = find(&samples, name, &channel).unwrap_or_else(|| panic!("missing {}", name));
        assert_eq!(sample.value, value, "{}", name);
        assert!(sample.label("frequency").is_none());
    };

    expect("hub4_ds31_channel_locked", 1.0);
    expect("hub4_ds31_channel_plc_power", 7.5);
    expect("hub4_ds31_channel_rxmer", 41.0);
    expect("hub4_ds31_channel_prers_errors", 1500.0);
    expect("hub4_ds31_channel_postrs_errors", 0.0);
    expect("hub4_ds31_channel_first_subcarrier", 1_108_000_000.0);
    expect("hub4_ds31_channel_subcarriers", 1880.0);
    expect("hub4_ds31_channel_width", 94.0);
}

#[test]
fn test_empty_snapshot_maps_scalars_only() {
    let samples = map_snapshot(&device(), &TelemetrySnapshot::default());

    assert_eq!(samples.len(), 21);
    let status = find(&samples, "hub4_scrape_status", &[]).unwrap();
    assert_eq!(status.value, 1.0);
    assert!(samples
        .iter()
        .filter(|s| s.name() != "hub4_scrape_status")
        .all(|s| s.value == 0.0));
}

#[test]
fn test_failed_device_reports_status_zero_only() {
    let samples = failed_device(&Device::new("attic", "10.0.0.2"));

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].name(), "hub4_scrape_status");
    assert_eq!(samples[0].value, 0.0);
    assert_eq!(samples[0].label("instance"), Some("attic"));
    assert_eq!(samples[0].label("address"), Some("10.0.0.2"));
}

#[test]
fn test_mapping_is_deterministic() {
    let snapshot = decode(STATUS_DOCUMENT.as_bytes()).unwrap();
    let before = snapshot.clone();

    let first = map_snapshot(&device(), &snapshot);
    let second = map_snapshot(&device(), &snapshot);

    assert_eq!(first, second);
    assert_eq!(snapshot, before, "mapping must not modify the snapshot");
}

#[test]
fn test_number_label_format() {
    assert_eq!(number_label(579_000_000.0), "579000000");
    assert_eq!(number_label(0.0), "0");
    assert_eq!(number_label(1.5), "1.5");
}
