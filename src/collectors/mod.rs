//! Metrics Collectors
//!
//! Maps a decoded [`TelemetrySnapshot`] onto the metric catalog in
//! [`crate::metrics::catalog`]. Each submodule covers one group of metrics:
//!
//! - [`status`] - per-device scalars (provisioning, service flows, counts)
//! - [`downstream`] - DOCSIS 3.0 and 3.1 downstream channels
//! - [`upstream`] - DOCSIS 3.0 upstream channels
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` carrying the device and the sample buffer
//! - Read from the snapshot, never modify it
//! - Push one sample per metric (per channel for channel metrics)
//!
//! Mapping cannot fail: a missing field was already decoded as zero, so it
//! simply maps to a zero-valued sample.

use crate::config::Device;
use crate::hub4::TelemetrySnapshot;
use crate::metrics::{catalog, MetricDesc, MetricSample};

pub mod downstream;
pub mod status;
pub mod upstream;

pub use downstream::{collect_ds31_channel_metrics, collect_ds_channel_metrics};
pub use status::collect_status_metrics;
pub use upstream::collect_us_channel_metrics;

/// Status of one device's collection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Status document fetched, decoded and mapped
    Success,
    /// Fetch or decode failed (already logged as warning)
    Failed,
}

/// Per-device state shared by the collectors
///
/// Every sample pushed through the context starts with the device's
/// `instance` and `address` labels.
pub struct CollectionContext<'a> {
    device: &'a Device,
    samples: Vec<MetricSample>,
}

impl<'a> CollectionContext<'a> {
    pub fn new(device: &'a Device) -> Self {
        Self {
            device,
            samples: Vec::new(),
        }
    }

    /// Push a sample whose labels are the device labels followed by `extra`.
    pub fn push(&mut self, desc: &'static MetricDesc, extra: &[&str], value: f64) {
        let mut values = Vec::with_capacity(2 + extra.len());
        values.push(self.device.name.as_str());
        values.push(self.device.address.as_str());
        values.extend_from_slice(extra);

        self.samples.push(MetricSample::new(desc, &values, value));
    }

    /// Push a sample carrying only the device labels.
    pub fn push_device(&mut self, desc: &'static MetricDesc, value: f64) {
        self.push(desc, &[], value);
    }

    pub fn into_samples(self) -> Vec<MetricSample> {
        self.samples
    }
}

/// Map a snapshot to the full metric catalog for one device.
///
/// # Examples
///
/// ```
/// use hub4_exporter::collectors::map_snapshot;
/// use hub4_exporter::config::Device;
/// use hub4_exporter::hub4::decode;
///
/// let device = Device::new("hub", "192.168.0.1");
/// let snapshot = decode(br#"[0, 0, "", "", 1, "true"]"#).unwrap();
/// let samples = map_snapshot(&device, &snapshot);
///
/// let access = samples
///     .iter()
///     .find(|s| s.name() == "hub4_network_access")
///     .unwrap();
/// assert_eq!(access.value, 1.0);
/// ```
pub fn map_snapshot(device: &Device, snapshot: &TelemetrySnapshot) -> Vec<MetricSample> {
    let mut ctx = CollectionContext::new(device);

    collect_status_metrics(&mut ctx, snapshot);
    collect_ds_channel_metrics(&mut ctx, &snapshot.ds_channels);
    collect_us_channel_metrics(&mut ctx, &snapshot.us_channels);
    collect_ds31_channel_metrics(&mut ctx, &snapshot.ds31_channels);

    ctx.into_samples()
}

/// Samples for a device whose status document could not be obtained.
pub fn failed_device(device: &Device) -> Vec<MetricSample> {
    let mut ctx = CollectionContext::new(device);
    ctx.push_device(&catalog::SCRAPE_STATUS, 0.0);
    ctx.into_samples()
}

/// Label text for a numeric source value; integral values carry no fraction.
pub fn number_label(value: f64) -> String {
    value.to_string()
}

fn flag_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
