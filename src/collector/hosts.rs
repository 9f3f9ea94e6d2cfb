// SPDX-License-Identifier: MIT

//! Host table aggregation
//!
//! The router exposes its host table only as a paginated per-entry query.
//! The counts reported under the `network` category are computed here by
//! walking the table and bucketing each entry by interface type and
//! activity flag.

use crate::error::Result;
use crate::fritz::{RouterClient, SoapResponse, Value};

const HOSTS_SERVICE: &str = "Hosts1";
const HOST_ENTRY_ACTION: &str = "GetGenericHostEntry";

/// Interface type labels the router uses for wired and wireless hosts.
/// Anything else (e.g. "HomePlug", USB tethering) counts toward the
/// totals but neither sub-bucket.
const IFACE_LAN: &str = "Ethernet";
const IFACE_WLAN: &str = "802.11";

/// Computed host counters, all-zero until filled
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostAggregate {
    pub known: u64,
    pub active: u64,
    pub known_lan: u64,
    pub active_lan: u64,
    pub known_wlan: u64,
    pub active_wlan: u64,
}

impl HostAggregate {
    fn count(&mut self, entry: &SoapResponse) {
        let interface_type = entry
            .get("NewInterfaceType")
            .and_then(Value::as_str)
            .unwrap_or("");
        let active = entry.get("NewActive").is_some_and(Value::as_bool);

        self.known += 1;
        if active {
            self.active += 1;
            if interface_type == IFACE_LAN {
                self.active_lan += 1;
            }
            if interface_type == IFACE_WLAN {
                self.active_wlan += 1;
            }
        }
        if interface_type == IFACE_LAN {
            self.known_lan += 1;
        }
        if interface_type == IFACE_WLAN {
            self.known_wlan += 1;
        }
    }

    /// Renders the counters as a synthetic response map so that field
    /// extraction treats them like any remote query result.
    #[must_use]
    pub fn into_response(self) -> SoapResponse {
        #[allow(clippy::cast_possible_wrap)]
        fn int(n: u64) -> Value {
            Value::Int(n as i64)
        }
        [
            ("HostsKnown".to_string(), int(self.known)),
            ("HostsActive".to_string(), int(self.active)),
            ("HostsKnownLAN".to_string(), int(self.known_lan)),
            ("HostsActiveLAN".to_string(), int(self.active_lan)),
            ("HostsKnownWLAN".to_string(), int(self.known_wlan)),
            ("HostsActiveWLAN".to_string(), int(self.active_wlan)),
        ]
        .into_iter()
        .collect()
    }
}

/// Pages through the host table with an increasing index.
///
/// The out-of-range fault is the expected terminator and completes the
/// aggregate. Any other failure, even after entries have been counted,
/// aborts to all-zero counts rather than reporting a partial table.
pub async fn aggregate<C: RouterClient>(client: &mut C) -> HostAggregate {
    match walk(client).await {
        Ok(aggregate) => aggregate,
        Err(e) => {
            tracing::debug!("Host enumeration failed, reporting zero counts: {}", e);
            HostAggregate::default()
        }
    }
}

async fn walk<C: RouterClient>(client: &mut C) -> Result<HostAggregate> {
    let mut aggregate = HostAggregate::default();
    for index in 0u32.. {
        let args = [("NewIndex", index.to_string())];
        match client.call(HOSTS_SERVICE, HOST_ENTRY_ACTION, &args).await {
            Ok(entry) => aggregate.count(&entry),
            Err(e) if e.is_index_out_of_range() => break,
            Err(e) => return Err(e),
        }
    }
    tracing::debug!(
        "Host table: {} known, {} active",
        aggregate.known,
        aggregate.active
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, FAULT_INDEX_OUT_OF_RANGE};

    /// Stub host table: serves canned entries by index, then a
    /// configurable terminal error.
    struct StubHostTable {
        entries: Vec<SoapResponse>,
        hard_fail_at: Option<usize>,
    }

    fn entry(interface_type: &str, active: bool) -> SoapResponse {
        [
            (
                "NewInterfaceType".to_string(),
                Value::Str(interface_type.to_string()),
            ),
            (
                "NewActive".to_string(),
                Value::Str(if active { "1" } else { "0" }.to_string()),
            ),
        ]
        .into_iter()
        .collect()
    }

    impl RouterClient for StubHostTable {
        async fn call(
            &mut self,
            service: &str,
            action: &str,
            args: &[(&str, String)],
        ) -> Result<SoapResponse> {
            assert_eq!(service, HOSTS_SERVICE);
            assert_eq!(action, HOST_ENTRY_ACTION);
            let index: usize = args
                .iter()
                .find(|(name, _)| *name == "NewIndex")
                .expect("NewIndex argument")
                .1
                .parse()
                .unwrap();
            if self.hard_fail_at == Some(index) {
                return Err(AppError::Timeout);
            }
            match self.entries.get(index) {
                Some(entry) => Ok(entry.clone()),
                None => Err(AppError::Soap {
                    code: FAULT_INDEX_OUT_OF_RANGE,
                    description: "SpecifiedArrayIndexInvalid".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_aggregate_buckets_by_interface_type() {
        let mut client = StubHostTable {
            entries: vec![
                entry("Ethernet", true),
                entry("802.11", false),
                entry("USB", true),
            ],
            hard_fail_at: None,
        };
        let aggregate = aggregate(&mut client).await;
        assert_eq!(
            aggregate,
            HostAggregate {
                known: 3,
                active: 2,
                known_lan: 1,
                active_lan: 1,
                known_wlan: 1,
                active_wlan: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_aggregate_empty_table() {
        let mut client = StubHostTable {
            entries: vec![],
            hard_fail_at: None,
        };
        assert_eq!(aggregate(&mut client).await, HostAggregate::default());
    }

    #[tokio::test]
    async fn test_hard_failure_on_first_call_yields_zeros() {
        let mut client = StubHostTable {
            entries: vec![entry("Ethernet", true)],
            hard_fail_at: Some(0),
        };
        assert_eq!(aggregate(&mut client).await, HostAggregate::default());
    }

    #[tokio::test]
    async fn test_mid_loop_hard_failure_discards_partial_counts() {
        let mut client = StubHostTable {
            entries: vec![
                entry("Ethernet", true),
                entry("802.11", true),
                entry("Ethernet", false),
            ],
            hard_fail_at: Some(2),
        };
        assert_eq!(aggregate(&mut client).await, HostAggregate::default());
    }

    #[tokio::test]
    async fn test_entry_without_flags_counts_as_known_only() {
        let mut client = StubHostTable {
            entries: vec![SoapResponse::new()],
            hard_fail_at: None,
        };
        let aggregate = aggregate(&mut client).await;
        assert_eq!(aggregate.known, 1);
        assert_eq!(aggregate.active, 0);
        assert_eq!(aggregate.known_lan, 0);
        assert_eq!(aggregate.known_wlan, 0);
    }

    #[test]
    fn test_into_response_keys() {
        let response = HostAggregate {
            known: 3,
            active: 2,
            known_lan: 1,
            active_lan: 1,
            known_wlan: 1,
            active_wlan: 0,
        }
        .into_response();
        assert_eq!(response.get("HostsKnown"), Some(&Value::Int(3)));
        assert_eq!(response.get("HostsActive"), Some(&Value::Int(2)));
        assert_eq!(response.get("HostsActiveWLAN"), Some(&Value::Int(0)));
        assert_eq!(response.len(), 6);
    }
}
