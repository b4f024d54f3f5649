//! Decoding of raw control-plane output into row records
//!
//! Two kinds of input are handled:
//! - JSON listings of pods and nodes (`kubectl get ... -o json`)
//! - fixed-column utilization text (`kubectl top nodes --no-headers`)
//!
//! Decoders never fail. Missing fields fall back to empty values and
//! unreadable payloads produce no rows.

mod snapshot;
mod utilization;

#[cfg(test)]
mod tests;

pub use snapshot::{decode_nodes, decode_nodes_json, decode_pods, decode_pods_json};
pub use utilization::{
    decode_utilization_lines, decode_utilization_text, TopNodesColumns, UtilizationDecoder,
};
