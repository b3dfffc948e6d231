//! Hub 4 Telemetry Types
//!
//! Typed form of the positional status document served by the modem. A
//! [`TelemetrySnapshot`] is built fresh for every collection cycle by
//! [`crate::hub4::decoder::decode`] and dropped once it has been mapped to
//! metric samples.
//!
//! # Design Notes
//!
//! - **Zero values**: every numeric field defaults to `0.0` and every flag to
//!   `false`, which is what a missing or malformed field decodes to.
//! - **Floats everywhere**: values end up as Prometheus gauges, so they are kept
//!   as `f64` rather than narrowed to integers.
//! - **Informational text**: status strings that are not exported as metrics are
//!   still kept so they can be logged.

/// Decoded state of one modem at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub acquired_ds_frequency: f64,
    pub ranged_us_frequency: f64,
    pub acquired_ds_status: String,
    pub ranged_us_status: String,
    pub provisioning_status: f64,
    pub network_access: bool,
    pub max_cpe: f64,
    pub bpi_state: bool,
    pub docsis_version: f64,
    pub boot_file: String,
    pub ds_flow: ServiceFlow,
    pub us_flow: ServiceFlow,
    pub us_concatenated_burst: f64,
    pub scheduling_type: String,
    pub ds_channels: Vec<DsChannel>,
    pub us_channels: Vec<UsChannel>,
    pub ds31_channels: Vec<Ds31Channel>,
    pub counts: ChannelCounts,
    pub primary_channel_type: String,
}

/// Provisioned service flow for one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceFlow {
    pub id: f64,
    /// Maximum sustained traffic rate (bps)
    pub max_rate: f64,
    /// Maximum traffic burst (bytes)
    pub burst: f64,
    /// Minimum reserved traffic rate (bps)
    pub min_rate: f64,
}

/// Channel totals as reported by the modem, independent of the channel lists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelCounts {
    pub us: f64,
    pub ds: f64,
    pub us31: f64,
    pub ds31: f64,
}

/// DOCSIS 3.0 downstream channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DsChannel {
    pub id: u32,
    /// Centre frequency (Hz)
    pub frequency: f64,
    /// Receive power (dBmV)
    pub power: f64,
    /// Signal to noise ratio (dB)
    pub snr: f64,
    pub modulation: String,
    pub locked: bool,
    /// Receive modulation error ratio (dB)
    pub rxmer: f64,
    pub pre_rs_errors: f64,
    pub post_rs_errors: f64,
}

/// DOCSIS 3.0 upstream channel. Never has id 0; those entries are padding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsChannel {
    pub id: u32,
    /// Centre frequency (Hz)
    pub frequency: f64,
    /// Transmit power (dBmV)
    pub power: f64,
    pub symbol_rate: String,
    pub modulation: String,
    pub channel_type: String,
    /// T1..T4 timeout counters, in that order
    pub timeouts: [f64; 4],
}

/// DOCSIS 3.1 (OFDM) downstream channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ds31Channel {
    /// Channel id as the modem reports it, used verbatim as a label
    pub id: String,
    /// Channel width (MHz)
    pub width: f64,
    pub fft: String,
    pub subcarriers: f64,
    pub modulation: String,
    /// Frequency of the first active subcarrier (Hz)
    pub first_subcarrier: f64,
    pub locked: bool,
    pub rxmer: f64,
    /// PLC receive power (dBmV)
    pub plc_power: f64,
    pub pre_rs_errors: f64,
    pub post_rs_errors: f64,
}
