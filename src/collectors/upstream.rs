//! Upstream Channel Collector
//!
//! Padding entries (id 0) never reach this module; the decoder drops them.
//!
//! # Metrics Produced
//! - `hub4_us_channel_power` - Transmit power (dBmV)
//!   - Labels: instance, address, frequency
//! - `hub4_us_channel_timeouts` - T1..T4 ranging timeout counters
//!   - Labels: instance, address, frequency, timeout_class ("1".."4")

use super::{number_label, CollectionContext};
use crate::hub4::types::UsChannel;
use crate::metrics::catalog;

const TIMEOUT_CLASSES: [&str; 4] = ["1", "2", "3", "4"];

pub fn collect_us_channel_metrics(ctx: &mut CollectionContext<'_>, channels: &[UsChannel]) {
    for channel in channels {
        let frequency = number_label(channel.frequency);
        let frequency = frequency.as_str();

        ctx.push(&catalog::US_CHANNEL_POWER, &[frequency], channel.power);

        for (class, timeouts) in TIMEOUT_CLASSES.into_iter().zip(channel.timeouts) {
            ctx.push(&catalog::US_CHANNEL_TIMEOUTS, &[frequency, class], timeouts);
        }
    }
}
