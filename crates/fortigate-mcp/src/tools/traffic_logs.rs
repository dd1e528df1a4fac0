//! Traffic log tool.
//!
//! Log querying is not implemented. The tool answers with a fixed sample so
//! agents can exercise the call, and marks it with `"source": "sample"`.

use rmcp::schemars;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Marker placed in every answer.
pub const SAMPLE_SOURCE: &str = "sample";

const SAMPLE_WARNING: &str =
    "Traffic log retrieval is not implemented; these entries are fixed sample data, not device logs.";

/// Parameters for `get_traffic_logs`. Accepted for compatibility, not applied,
/// so values of any type are taken as they come.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct TrafficLogParams {
    /// Filter expression, e.g. "srcip==10.0.1.10".
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub log_filter: Value,
    /// Maximum number of entries.
    #[serde(default)]
    #[schemars(with = "Option<u32>")]
    pub max_logs: Value,
    /// Window such as "1hour" or "24hours".
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub time_range: Value,
}

#[derive(Debug, Clone, Serialize)]
struct SampleEntry {
    logid: &'static str,
    timestamp: &'static str,
    srcip: &'static str,
    dstip: &'static str,
    dstport: &'static str,
    proto: u8,
    action: &'static str,
    policyid: u32,
    msg: &'static str,
}

const SAMPLE_ENTRIES: [SampleEntry; 3] = [
    SampleEntry {
        logid: "0000000013",
        timestamp: "2024-05-18 10:00:00",
        srcip: "10.0.1.10",
        dstip: "8.8.8.8",
        dstport: "53",
        proto: 17,
        action: "accept",
        policyid: 1,
        msg: "Sample traffic: DNS query accepted",
    },
    SampleEntry {
        logid: "0000000014",
        timestamp: "2024-05-18 10:00:05",
        srcip: "10.0.1.11",
        dstip: "1.1.1.1",
        dstport: "443",
        proto: 6,
        action: "accept",
        policyid: 2,
        msg: "Sample traffic: HTTPS accepted",
    },
    SampleEntry {
        logid: "0000000015",
        timestamp: "2024-05-18 10:00:10",
        srcip: "192.168.1.100",
        dstip: "10.0.1.10",
        dstport: "22",
        proto: 6,
        action: "deny",
        policyid: 0,
        msg: "Sample traffic: SSH attempt denied",
    },
];

/// Return the fixed sample, whatever the parameters.
#[must_use]
pub fn get_traffic_logs(params: &TrafficLogParams) -> Value {
    debug!(
        filter = %params.log_filter,
        max_logs = %params.max_logs,
        time_range = %params.time_range,
        "returning sample traffic logs"
    );
    json!({
        "logs": SAMPLE_ENTRIES,
        "source": SAMPLE_SOURCE,
        "warning": SAMPLE_WARNING,
    })
}
