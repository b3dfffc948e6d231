//! Downstream Channel Collectors
//!
//! # Metrics Produced
//! DOCSIS 3.0, labelled `instance, address, frequency`:
//! - `hub4_ds_channel_power`, `hub4_ds_channel_snr`, `hub4_ds_channel_rxmer`
//! - `hub4_ds_channel_locked` - 1 when the channel reports "Locked"
//! - `hub4_ds_channel_prers_errors`, `hub4_ds_channel_postrs_errors`
//!
//! DOCSIS 3.1, labelled `instance, address, id`:
//! - `hub4_ds31_channel_locked`, `hub4_ds31_channel_plc_power`,
//!   `hub4_ds31_channel_rxmer`
//! - `hub4_ds31_channel_prers_errors`, `hub4_ds31_channel_postrs_errors`
//! - `hub4_ds31_channel_first_subcarrier`, `hub4_ds31_channel_subcarriers`,
//!   `hub4_ds31_channel_width`

use super::{flag_value, number_label, CollectionContext};
use crate::hub4::types::{Ds31Channel, DsChannel};
use crate::metrics::catalog;

/// DOCSIS 3.0 channels are told apart by their centre frequency.
pub fn collect_ds_channel_metrics(ctx: &mut CollectionContext<'_>, channels: &[DsChannel]) {
    for channel in channels {
        let frequency = number_label(channel.frequency);
        let labels = [frequency.as_str()];

        ctx.push(&catalog::DS_CHANNEL_POWER, &labels, channel.power);
        ctx.push(&catalog::DS_CHANNEL_SNR, &labels, channel.snr);
        ctx.push(&catalog::DS_CHANNEL_LOCKED, &labels, flag_value(channel.locked));
        ctx.push(&catalog::DS_CHANNEL_RXMER, &labels, channel.rxmer);
        ctx.push(&catalog::DS_CHANNEL_PRERS_ERRORS, &labels, channel.pre_rs_errors);
        ctx.push(&catalog::DS_CHANNEL_POSTRS_ERRORS, &labels, channel.post_rs_errors);
    }
}

/// DOCSIS 3.1 channels span many subcarriers, so they are keyed by id.
pub fn collect_ds31_channel_metrics(ctx: &mut CollectionContext<'_>, channels: &[Ds31Channel]) {
    for channel in channels {
        let labels = [channel.id.as_str()];

        ctx.push(&catalog::DS31_CHANNEL_LOCKED, &labels, flag_value(channel.locked));
        ctx.push(&catalog::DS31_CHANNEL_PLC_POWER, &labels, channel.plc_power);
        ctx.push(&catalog::DS31_CHANNEL_RXMER, &labels, channel.rxmer);
        ctx.push(&catalog::DS31_CHANNEL_PRERS_ERRORS, &labels, channel.pre_rs_errors);
        ctx.push(&catalog::DS31_CHANNEL_POSTRS_ERRORS, &labels, channel.post_rs_errors);
        ctx.push(
            &catalog::DS31_CHANNEL_FIRST_SUBCARRIER,
            &labels,
            channel.first_subcarrier,
        );
        ctx.push(&catalog::DS31_CHANNEL_SUBCARRIERS, &labels, channel.subcarriers);
        ctx.push(&catalog::DS31_CHANNEL_WIDTH, &labels, channel.width);
    }
}
