//! Prometheus Metrics Definitions
//!
//! This module defines every metric exposed by the Hub 4 exporter and turns a
//! scrape's [`MetricSample`]s into Prometheus text format.
//!
//! # Metric Categories
//!
//! ## Device Status
//! - Scrape status, provisioning state, network access, BPI state
//! - Acquired/ranged channel frequencies, DOCSIS version
//! - Service flow IDs and traffic rates
//! - Channel counts
//!
//! ## DOCSIS 3.0 Downstream (labelled by `frequency`)
//! - Power, SNR, RXMer, lock status, pre/post RS errors
//!
//! ## DOCSIS 3.0 Upstream (labelled by `frequency`)
//! - Power, T1-T4 timeouts (`timeout_class` label)
//!
//! ## DOCSIS 3.1 Downstream (labelled by `id`)
//! - Lock status, PLC power, RXMer, pre/post RS errors, subcarrier layout
//!
//! # Exposition
//!
//! Every metric is a gauge. Each scrape builds a fresh [`MetricsCollector`]
//! from that scrape's samples, so devices that failed or disappeared leave no
//! stale series behind.
//!
//! All metrics use the `hub4_` namespace prefix. Names and label keys are kept
//! identical to existing dashboards, including the `aquired_DS_channel` and
//! `ranged_US_channel` spellings.

use crate::error::{ExporterError, Result};
use prometheus::{GaugeVec, Opts, Registry, TextEncoder};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

pub const NAMESPACE: &str = "hub4";

/// Static description of one exported metric.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    /// Name without the namespace prefix
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

impl MetricDesc {
    /// Fully qualified name, e.g. `hub4_scrape_status`.
    pub fn fq_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.name)
    }
}

const DEVICE_LABELS: &[&str] = &["instance", "address"];
const FREQUENCY_LABELS: &[&str] = &["instance", "address", "frequency"];
const TIMEOUT_LABELS: &[&str] = &["instance", "address", "frequency", "timeout_class"];
const ID_LABELS: &[&str] = &["instance", "address", "id"];

macro_rules! metric {
    ($ident:ident, $name:literal, $help:literal, $labels:expr) => {
        pub static $ident: MetricDesc = MetricDesc {
            name: $name,
            help: $help,
            labels: $labels,
        };
    };
}

/// The fixed metric catalog.
pub mod catalog {
    use super::*;

    // Device status
    metric!(SCRAPE_STATUS, "scrape_status", "Scrape Status", DEVICE_LABELS);
    metric!(
        ACQUIRED_DS_CHANNEL,
        "aquired_DS_channel",
        "Acquired Downstream Channel Frequency (Hz)",
        DEVICE_LABELS
    );
    metric!(
        RANGED_US_CHANNEL,
        "ranged_US_channel",
        "Ranged (discovered) Upstream Channel Frequency (Hz)",
        DEVICE_LABELS
    );
    metric!(
        PROVISIONING_STATUS,
        "provisioning_status",
        "Provisioning Status",
        DEVICE_LABELS
    );
    metric!(
        NETWORK_ACCESS,
        "network_access",
        "Network Access (1=allowed, 0=denied)",
        DEVICE_LABELS
    );
    metric!(MAX_CPE, "max_cpe", "Maximum CPE devices", DEVICE_LABELS);
    metric!(
        BPI_STATE,
        "bpi_state",
        "BPI State (1=enabled, 0=disabled)",
        DEVICE_LABELS
    );
    metric!(DOCSIS_VERSION, "docsis_version", "DOCSIS version", DEVICE_LABELS);

    // Service flows
    metric!(DS_FLOW_ID, "ds_flow_id", "DS Flow ID", DEVICE_LABELS);
    metric!(US_FLOW_ID, "us_flow_id", "US Flow ID", DEVICE_LABELS);
    metric!(
        DS_TRAFFIC_RATE,
        "ds_traffic_rate",
        "DS Traffic Rate (max)",
        DEVICE_LABELS
    );
    metric!(
        DS_TRAFFIC_RATE_BURST,
        "ds_traffic_rate_burst",
        "DS Traffic Rate (burst)",
        DEVICE_LABELS
    );
    metric!(
        DS_TRAFFIC_RATE_MIN,
        "ds_traffic_rate_min",
        "DS Traffic Rate (min)",
        DEVICE_LABELS
    );
    metric!(
        US_TRAFFIC_RATE,
        "us_traffic_rate",
        "US Traffic Rate (max)",
        DEVICE_LABELS
    );
    metric!(
        US_TRAFFIC_RATE_BURST,
        "us_traffic_rate_burst",
        "US Traffic Rate (burst)",
        DEVICE_LABELS
    );
    metric!(
        US_TRAFFIC_RATE_MIN,
        "us_traffic_rate_min",
        "US Traffic Rate (min)",
        DEVICE_LABELS
    );
    metric!(
        US_CONCATENATED_BURST,
        "us_concatenated_burst",
        "US Concatenated Burst",
        DEVICE_LABELS
    );

    // Channel counts
    metric!(US_CHANNEL_COUNT, "us_channel_count", "US Channel count", DEVICE_LABELS);
    metric!(DS_CHANNEL_COUNT, "ds_channel_count", "DS Channel count", DEVICE_LABELS);
    metric!(
        US31_CHANNEL_COUNT,
        "us31_channel_count",
        "US 3.1 Channel count",
        DEVICE_LABELS
    );
    metric!(
        DS31_CHANNEL_COUNT,
        "ds31_channel_count",
        "DS 3.1 Channel count",
        DEVICE_LABELS
    );

    // DOCSIS 3.0 downstream
    metric!(
        DS_CHANNEL_POWER,
        "ds_channel_power",
        "DS Channel Power (dBmV)",
        FREQUENCY_LABELS
    );
    metric!(
        DS_CHANNEL_SNR,
        "ds_channel_snr",
        "DS Channel SNR (dB)",
        FREQUENCY_LABELS
    );
    metric!(
        DS_CHANNEL_LOCKED,
        "ds_channel_locked",
        "DS Channel Locked (1=locked, 0=unlocked)",
        FREQUENCY_LABELS
    );
    metric!(
        DS_CHANNEL_RXMER,
        "ds_channel_rxmer",
        "DS Channel RXMer (dB)",
        FREQUENCY_LABELS
    );
    metric!(
        DS_CHANNEL_PRERS_ERRORS,
        "ds_channel_prers_errors",
        "DS Channel Recoverable Errors (Pre RS)",
        FREQUENCY_LABELS
    );
    metric!(
        DS_CHANNEL_POSTRS_ERRORS,
        "ds_channel_postrs_errors",
        "DS Channel Unrecoverable Errors (Post RS)",
        FREQUENCY_LABELS
    );

    // DOCSIS 3.0 upstream
    metric!(
        US_CHANNEL_POWER,
        "us_channel_power",
        "US Channel Power (dBmV)",
        FREQUENCY_LABELS
    );
    metric!(
        US_CHANNEL_TIMEOUTS,
        "us_channel_timeouts",
        "US Channel Timeouts by class (T1-T4)",
        TIMEOUT_LABELS
    );

    // DOCSIS 3.1 downstream
    metric!(
        DS31_CHANNEL_LOCKED,
        "ds31_channel_locked",
        "DS 3.1 Channel Locked (1=locked, 0=unlocked)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_PLC_POWER,
        "ds31_channel_plc_power",
        "DS 3.1 Channel PLC Power (dBmV)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_RXMER,
        "ds31_channel_rxmer",
        "DS 3.1 Channel RXMer (dB)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_PRERS_ERRORS,
        "ds31_channel_prers_errors",
        "DS 3.1 Channel Recoverable Errors (Pre RS)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_POSTRS_ERRORS,
        "ds31_channel_postrs_errors",
        "DS 3.1 Channel Unrecoverable Errors (Post RS)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_FIRST_SUBCARRIER,
        "ds31_channel_first_subcarrier",
        "DS 3.1 Channel First Subcarrier (Hz)",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_SUBCARRIERS,
        "ds31_channel_subcarriers",
        "DS 3.1 Channel Subcarriers",
        ID_LABELS
    );
    metric!(
        DS31_CHANNEL_WIDTH,
        "ds31_channel_width",
        "DS 3.1 Channel Width (MHz)",
        ID_LABELS
    );

    /// Every metric, in registration order.
    pub static ALL: &[&MetricDesc] = &[
        &SCRAPE_STATUS,
        &ACQUIRED_DS_CHANNEL,
        &RANGED_US_CHANNEL,
        &PROVISIONING_STATUS,
        &NETWORK_ACCESS,
        &MAX_CPE,
        &BPI_STATE,
        &DOCSIS_VERSION,
        &DS_FLOW_ID,
        &US_FLOW_ID,
        &DS_TRAFFIC_RATE,
        &DS_TRAFFIC_RATE_BURST,
        &DS_TRAFFIC_RATE_MIN,
        &US_TRAFFIC_RATE,
        &US_TRAFFIC_RATE_BURST,
        &US_TRAFFIC_RATE_MIN,
        &US_CONCATENATED_BURST,
        &US_CHANNEL_COUNT,
        &DS_CHANNEL_COUNT,
        &US31_CHANNEL_COUNT,
        &DS31_CHANNEL_COUNT,
        &DS_CHANNEL_POWER,
        &DS_CHANNEL_SNR,
        &DS_CHANNEL_LOCKED,
        &DS_CHANNEL_RXMER,
        &DS_CHANNEL_PRERS_ERRORS,
        &DS_CHANNEL_POSTRS_ERRORS,
        &US_CHANNEL_POWER,
        &US_CHANNEL_TIMEOUTS,
        &DS31_CHANNEL_LOCKED,
        &DS31_CHANNEL_PLC_POWER,
        &DS31_CHANNEL_RXMER,
        &DS31_CHANNEL_PRERS_ERRORS,
        &DS31_CHANNEL_POSTRS_ERRORS,
        &DS31_CHANNEL_FIRST_SUBCARRIER,
        &DS31_CHANNEL_SUBCARRIERS,
        &DS31_CHANNEL_WIDTH,
    ];
}

/// One gauge value produced by a scrape.
///
/// Label keys always come from the sample's [`MetricDesc`], in its order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub desc: &'static MetricDesc,
    pub value: f64,
    pub labels: Vec<(&'static str, String)>,
}

impl MetricSample {
    /// Pair `values` with the descriptor's label keys.
    pub fn new(desc: &'static MetricDesc, values: &[&str], value: f64) -> Self {
        debug_assert_eq!(
            desc.labels.len(),
            values.len(),
            "label count mismatch for {}",
            desc.name
        );

        let labels = desc
            .labels
            .iter()
            .zip(values)
            .map(|(key, value)| (*key, (*value).to_string()))
            .collect();

        Self {
            desc,
            value,
            labels,
        }
    }

    /// Fully qualified metric name.
    pub fn name(&self) -> String {
        self.desc.fq_name()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn label_values(&self) -> Vec<&str> {
        self.labels.iter().map(|(_, v)| v.as_str()).collect()
    }
}

/// Registry holding one `GaugeVec` per catalog entry
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    gauges: Arc<HashMap<&'static str, GaugeVec>>,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let mut gauges = HashMap::with_capacity(catalog::ALL.len());

        for desc in catalog::ALL {
            let gauge = GaugeVec::new(
                Opts::new(desc.name, desc.help).namespace(NAMESPACE),
                desc.labels,
            )?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.insert(desc.name, gauge);
        }

        Ok(Self {
            registry: Arc::new(registry),
            gauges: Arc::new(gauges),
        })
    }

    /// Build a registry holding exactly the given samples.
    ///
    /// A second sample with the same name and label set overwrites the first
    /// and is logged, since it means two channels could not be told apart.
    pub fn from_samples(samples: &[MetricSample]) -> Result<Self> {
        let metrics = Self::new()?;
        let mut seen = HashSet::with_capacity(samples.len());

        for sample in samples {
            if !seen.insert((sample.desc.name, sample.label_values())) {
                warn!(
                    "Duplicate sample for {} with labels {:?}",
                    sample.name(),
                    sample.labels
                );
            }
            metrics.record(sample)?;
        }

        Ok(metrics)
    }

    /// Set the gauge a sample refers to.
    ///
    /// # Errors
    ///
    /// [`ExporterError::UnknownMetric`] for a descriptor outside the catalog,
    /// [`ExporterError::Prometheus`] when the label count does not match.
    pub fn record(&self, sample: &MetricSample) -> Result<()> {
        let gauge = self
            .gauges
            .get(sample.desc.name)
            .ok_or_else(|| ExporterError::UnknownMetric(sample.name()))?;

        gauge
            .get_metric_with_label_values(&sample.label_values())?
            .set(sample.value);

        Ok(())
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}
