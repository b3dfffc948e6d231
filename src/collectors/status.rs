//! Device Status Collector
//!
//! # Metrics Produced
//! All labelled `instance, address`:
//! - `hub4_scrape_status` - 1 whenever a snapshot was decoded
//! - `hub4_aquired_DS_channel`, `hub4_ranged_US_channel` - frequencies (Hz)
//! - `hub4_provisioning_status`, `hub4_network_access`, `hub4_max_cpe`,
//!   `hub4_bpi_state`, `hub4_docsis_version`
//! - `hub4_{ds,us}_flow_id`, `hub4_{ds,us}_traffic_rate{,_burst,_min}`,
//!   `hub4_us_concatenated_burst`
//! - `hub4_{us,ds,us31,ds31}_channel_count`

use super::{flag_value, CollectionContext};
use crate::hub4::TelemetrySnapshot;
use crate::metrics::catalog;

pub fn collect_status_metrics(ctx: &mut CollectionContext<'_>, snapshot: &TelemetrySnapshot) {
    ctx.push_device(&catalog::SCRAPE_STATUS, 1.0);

    ctx.push_device(&catalog::ACQUIRED_DS_CHANNEL, snapshot.acquired_ds_frequency);
    ctx.push_device(&catalog::RANGED_US_CHANNEL, snapshot.ranged_us_frequency);
    ctx.push_device(&catalog::PROVISIONING_STATUS, snapshot.provisioning_status);
    ctx.push_device(&catalog::NETWORK_ACCESS, flag_value(snapshot.network_access));
    ctx.push_device(&catalog::MAX_CPE, snapshot.max_cpe);
    ctx.push_device(&catalog::BPI_STATE, flag_value(snapshot.bpi_state));
    ctx.push_device(&catalog::DOCSIS_VERSION, snapshot.docsis_version);

    let ds = &snapshot.ds_flow;
    ctx.push_device(&catalog::DS_FLOW_ID, ds.id);
    ctx.push_device(&catalog::DS_TRAFFIC_RATE, ds.max_rate);
    ctx.push_device(&catalog::DS_TRAFFIC_RATE_BURST, ds.burst);
    ctx.push_device(&catalog::DS_TRAFFIC_RATE_MIN, ds.min_rate);

    let us = &snapshot.us_flow;
    ctx.push_device(&catalog::US_FLOW_ID, us.id);
    ctx.push_device(&catalog::US_TRAFFIC_RATE, us.max_rate);
    ctx.push_device(&catalog::US_TRAFFIC_RATE_BURST, us.burst);
    ctx.push_device(&catalog::US_TRAFFIC_RATE_MIN, us.min_rate);
    ctx.push_device(&catalog::US_CONCATENATED_BURST, snapshot.us_concatenated_burst);

    let counts = &snapshot.counts;
    ctx.push_device(&catalog::US_CHANNEL_COUNT, counts.us);
    ctx.push_device(&catalog::DS_CHANNEL_COUNT, counts.ds);
    ctx.push_device(&catalog::US31_CHANNEL_COUNT, counts.us31);
    ctx.push_device(&catalog::DS31_CHANNEL_COUNT, counts.ds31);
}
