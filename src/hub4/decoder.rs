//! Positional Status Document Decoder
//!
//! The modem answers with a bare JSON array whose meaning is given entirely by
//! position. Every index used anywhere in the crate lives in [`schema`], so a
//! firmware change to the layout only touches that module.
//!
//! # Leniency
//!
//! Only a document that is not a JSON array is rejected. Individual fields are
//! read leniently:
//!
//! - numbers may arrive as JSON numbers, numeric strings or booleans; anything
//!   else reads as `0.0`
//! - flags are `true` only for `"true"` (or a JSON `true`)
//! - channel lists may be real arrays or strings holding a JSON array; anything
//!   else reads as an empty list
//!
//! A field that cannot be read produces a [`FieldDecodeError`] which is logged
//! at trace level and replaced by the zero value.

use crate::error::{ExporterError, FieldDecodeError, Result};
use crate::hub4::types::{
    ChannelCounts, Ds31Channel, DsChannel, ServiceFlow, TelemetrySnapshot, UsChannel,
};
use serde_json::Value;
use std::borrow::Cow;
use tracing::trace;

/// Index layout of the status document and of each channel entry.
pub mod schema {
    pub const ACQUIRED_DS_FREQUENCY: usize = 0;
    pub const RANGED_US_FREQUENCY: usize = 1;
    pub const ACQUIRED_DS_STATUS: usize = 2;
    pub const RANGED_US_STATUS: usize = 3;
    pub const PROVISIONING_STATUS: usize = 4;
    pub const NETWORK_ACCESS: usize = 5;
    pub const MAX_CPE: usize = 6;
    pub const BPI_STATE: usize = 7;
    pub const DOCSIS_VERSION: usize = 8;
    pub const BOOT_FILE: usize = 9;
    pub const DS_FLOW_ID: usize = 10;
    pub const DS_TRAFFIC_RATE_MAX: usize = 11;
    pub const DS_TRAFFIC_RATE_BURST: usize = 12;
    pub const DS_TRAFFIC_RATE_MIN: usize = 13;
    pub const US_FLOW_ID: usize = 14;
    pub const US_TRAFFIC_RATE_MAX: usize = 15;
    pub const US_TRAFFIC_RATE_BURST: usize = 16;
    pub const US_TRAFFIC_RATE_MIN: usize = 17;
    pub const US_CONCATENATED_BURST: usize = 18;
    pub const SCHEDULING_TYPE: usize = 19;
    pub const DS_CHANNELS: usize = 20;
    pub const US_CHANNELS: usize = 21;
    // 22 is network data, 24 the (unpopulated) 3.1 upstream list
    pub const DS31_CHANNELS: usize = 23;
    pub const US_CHANNEL_COUNT: usize = 25;
    pub const DS_CHANNEL_COUNT: usize = 26;
    pub const US31_CHANNEL_COUNT: usize = 27;
    pub const DS31_CHANNEL_COUNT: usize = 28;
    pub const PRIMARY_CHANNEL_TYPE: usize = 29;

    /// `[id, freq, power, snr, modulation, status, rxmer, preRS, postRS]`
    pub mod ds_channel {
        pub const ID: usize = 0;
        pub const FREQUENCY: usize = 1;
        pub const POWER: usize = 2;
        pub const SNR: usize = 3;
        pub const MODULATION: usize = 4;
        pub const STATUS: usize = 5;
        pub const RXMER: usize = 6;
        pub const PRE_RS_ERRORS: usize = 7;
        pub const POST_RS_ERRORS: usize = 8;
    }

    /// `[id, freq, power, symbolRate, modulation, type, t1, t2, t3, t4]`
    pub mod us_channel {
        pub const ID: usize = 0;
        pub const FREQUENCY: usize = 1;
        pub const POWER: usize = 2;
        pub const SYMBOL_RATE: usize = 3;
        pub const MODULATION: usize = 4;
        pub const CHANNEL_TYPE: usize = 5;
        pub const TIMEOUTS: [usize; 4] = [6, 7, 8, 9];
    }

    /// `[id, width, fft, subcarriers, modulation, firstSubcarrier, status,
    /// rxmer, plcPower, preRS, postRS]`
    pub mod ds31_channel {
        pub const ID: usize = 0;
        pub const WIDTH: usize = 1;
        pub const FFT: usize = 2;
        pub const SUBCARRIERS: usize = 3;
        pub const MODULATION: usize = 4;
        pub const FIRST_SUBCARRIER: usize = 5;
        pub const STATUS: usize = 6;
        pub const RXMER: usize = 7;
        pub const PLC_POWER: usize = 8;
        pub const PRE_RS_ERRORS: usize = 9;
        pub const POST_RS_ERRORS: usize = 10;
    }
}

/// Lock status text reported for a locked channel.
pub const LOCKED: &str = "Locked";

/// Decode a raw status document into a [`TelemetrySnapshot`].
///
/// # Errors
///
/// Returns [`ExporterError::Decode`] if the body is not JSON or its root is not
/// an array. Individual fields never fail the decode.
///
/// # Example
///
/// ```
/// use hub4_exporter::hub4::decoder::decode;
///
/// let snapshot = decode(br#"[6100000000, 3300000000, "", "", 4, "true"]"#).unwrap();
/// assert_eq!(snapshot.provisioning_status, 4.0);
/// assert!(snapshot.network_access);
/// assert!(!snapshot.bpi_state);
/// ```
pub fn decode(body: &[u8]) -> Result<TelemetrySnapshot> {
    let root: Value = serde_json::from_slice(body)
        .map_err(|e| ExporterError::Decode(format!("status document is not valid JSON: {}", e)))?;

    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(ExporterError::Decode(format!(
                "status document root is {}, expected an array",
                kind(&other)
            )))
        }
    };

    let fields = Fields(&items);

    let snapshot = TelemetrySnapshot {
        acquired_ds_frequency: fields.number(schema::ACQUIRED_DS_FREQUENCY),
        ranged_us_frequency: fields.number(schema::RANGED_US_FREQUENCY),
        acquired_ds_status: fields.text(schema::ACQUIRED_DS_STATUS),
        ranged_us_status: fields.text(schema::RANGED_US_STATUS),
        provisioning_status: fields.number(schema::PROVISIONING_STATUS),
        network_access: fields.flag(schema::NETWORK_ACCESS),
        max_cpe: fields.number(schema::MAX_CPE),
        bpi_state: fields.flag(schema::BPI_STATE),
        docsis_version: fields.number(schema::DOCSIS_VERSION),
        boot_file: fields.text(schema::BOOT_FILE),
        ds_flow: ServiceFlow {
            id: fields.number(schema::DS_FLOW_ID),
            max_rate: fields.number(schema::DS_TRAFFIC_RATE_MAX),
            burst: fields.number(schema::DS_TRAFFIC_RATE_BURST),
            min_rate: fields.number(schema::DS_TRAFFIC_RATE_MIN),
        },
        us_flow: ServiceFlow {
            id: fields.number(schema::US_FLOW_ID),
            max_rate: fields.number(schema::US_TRAFFIC_RATE_MAX),
            burst: fields.number(schema::US_TRAFFIC_RATE_BURST),
            min_rate: fields.number(schema::US_TRAFFIC_RATE_MIN),
        },
        us_concatenated_burst: fields.number(schema::US_CONCATENATED_BURST),
        scheduling_type: fields.text(schema::SCHEDULING_TYPE),
        ds_channels: fields
            .entries(schema::DS_CHANNELS)
            .iter()
            .filter_map(|entry| with_fields(entry, decode_ds_channel))
            .collect(),
        us_channels: fields
            .entries(schema::US_CHANNELS)
            .iter()
            .filter_map(|entry| with_fields(entry, decode_us_channel))
            .filter(|channel| channel.id != 0)
            .collect(),
        ds31_channels: fields
            .entries(schema::DS31_CHANNELS)
            .iter()
            .filter_map(|entry| with_fields(entry, decode_ds31_channel))
            .collect(),
        counts: ChannelCounts {
            us: fields.number(schema::US_CHANNEL_COUNT),
            ds: fields.number(schema::DS_CHANNEL_COUNT),
            us31: fields.number(schema::US31_CHANNEL_COUNT),
            ds31: fields.number(schema::DS31_CHANNEL_COUNT),
        },
        primary_channel_type: fields.text(schema::PRIMARY_CHANNEL_TYPE),
    };

    Ok(snapshot)
}

fn decode_ds_channel(fields: Fields<'_>) -> DsChannel {
    use schema::ds_channel as idx;

    DsChannel {
        id: fields.id(idx::ID),
        frequency: fields.number(idx::FREQUENCY),
        power: fields.number(idx::POWER),
        snr: fields.number(idx::SNR),
        modulation: fields.text(idx::MODULATION),
        locked: fields.text(idx::STATUS) == LOCKED,
        rxmer: fields.number(idx::RXMER),
        pre_rs_errors: fields.number(idx::PRE_RS_ERRORS),
        post_rs_errors: fields.number(idx::POST_RS_ERRORS),
    }
}

fn decode_us_channel(fields: Fields<'_>) -> UsChannel {
    use schema::us_channel as idx;

    UsChannel {
        id: fields.id(idx::ID),
        frequency: fields.number(idx::FREQUENCY),
        power: fields.number(idx::POWER),
        symbol_rate: fields.text(idx::SYMBOL_RATE),
        modulation: fields.text(idx::MODULATION),
        channel_type: fields.text(idx::CHANNEL_TYPE),
        timeouts: idx::TIMEOUTS.map(|index| fields.number(index)),
    }
}

fn decode_ds31_channel(fields: Fields<'_>) -> Ds31Channel {
    use schema::ds31_channel as idx;

    Ds31Channel {
        id: fields.label(idx::ID),
        width: fields.number(idx::WIDTH),
        fft: fields.text(idx::FFT),
        subcarriers: fields.number(idx::SUBCARRIERS),
        modulation: fields.text(idx::MODULATION),
        first_subcarrier: fields.number(idx::FIRST_SUBCARRIER),
        locked: fields.text(idx::STATUS) == LOCKED,
        rxmer: fields.number(idx::RXMER),
        plc_power: fields.number(idx::PLC_POWER),
        pre_rs_errors: fields.number(idx::PRE_RS_ERRORS),
        post_rs_errors: fields.number(idx::POST_RS_ERRORS),
    }
}

/// Run `decode_entry` over a channel entry, if the entry is an array at all.
fn with_fields<T>(entry: &Value, decode_entry: fn(Fields<'_>) -> T) -> Option<T> {
    match as_array(entry) {
        Some(items) => Some(decode_entry(Fields(&items))),
        None => {
            trace!("Skipping channel entry that is not an array: {}", kind(entry));
            None
        }
    }
}

/// Positional view over one JSON array.
#[derive(Clone, Copy)]
struct Fields<'a>(&'a [Value]);

impl<'a> Fields<'a> {
    fn get(&self, index: usize) -> std::result::Result<&'a Value, FieldDecodeError> {
        self.0.get(index).ok_or(FieldDecodeError::Missing { index })
    }

    fn try_number(&self, index: usize) -> std::result::Result<f64, FieldDecodeError> {
        let not_numeric = |found: &Value| FieldDecodeError::NotNumeric {
            index,
            found: found.to_string(),
        };

        match self.get(index)? {
            Value::Number(n) => n.as_f64().ok_or_else(|| not_numeric(&Value::Number(n.clone()))),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| not_numeric(&Value::String(s.clone()))),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(not_numeric(other)),
        }
    }

    /// Numeric field, `0.0` when absent or unreadable.
    fn number(&self, index: usize) -> f64 {
        self.try_number(index).unwrap_or_else(|e| {
            trace!("Using 0 for {}", e);
            0.0
        })
    }

    /// Channel id, `0` when absent, unreadable or out of range.
    fn id(&self, index: usize) -> u32 {
        let value = self.number(index);
        if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 {
            value as u32
        } else {
            0
        }
    }

    /// Identifier text: numbers in their shortest decimal form, anything
    /// else as [`Fields::text`].
    fn label(&self, index: usize) -> String {
        match self.0.get(index) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(value) => value.to_string(),
                None => n.to_string(),
            },
            _ => self.text(index),
        }
    }

    fn flag(&self, index: usize) -> bool {
        self.text(index) == "true"
    }

    /// Textual form of a field: strings verbatim, scalars as written,
    /// empty when absent.
    fn text(&self, index: usize) -> String {
        match self.0.get(index) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn try_entries(&self, index: usize) -> std::result::Result<Cow<'a, [Value]>, FieldDecodeError> {
        as_array(self.get(index)?).ok_or(FieldDecodeError::NotArray { index })
    }

    /// Channel list, empty when absent or unreadable.
    fn entries(&self, index: usize) -> Cow<'a, [Value]> {
        self.try_entries(index).unwrap_or_else(|e| {
            trace!("Using an empty channel list for {}", e);
            Cow::Borrowed(&[])
        })
    }
}

/// Arrays are sometimes delivered as a string holding the JSON text.
fn as_array(value: &Value) -> Option<Cow<'_, [Value]>> {
    match value {
        Value::Array(items) => Some(Cow::Borrowed(items.as_slice())),
        Value::String(raw) => match serde_json::from_str(raw) {
            Ok(Value::Array(items)) => Some(Cow::Owned(items)),
            _ => None,
        },
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
