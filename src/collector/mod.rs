// SPDX-License-Identifier: MIT

//! Metric collection orchestration
//!
//! Issues the fixed list of TR-064 queries, degrades every per-query
//! failure to an empty response, and shapes the results into category
//! records in a fixed emission order. Failures never leave this module:
//! a router with a dead subsystem still produces every category line,
//! just with fewer fields.

mod hosts;

pub use hosts::HostAggregate;

use crate::config::Config;
use crate::fritz::{RouterClient, SoapResponse};
use crate::influx::FieldKind::{Float, Integer, Str};
use crate::influx::{extract, extract_as, Field};

/// Ordered tokens for one output category
pub struct CategoryRecord {
    pub category: String,
    pub fields: Vec<Field>,
}

/// One complete collection pass
pub struct Snapshot {
    /// Pre-rendered host tag (`host=fritz.box`), empty when the domain
    /// name query failed
    pub host_tag: String,
    /// Category records in emission order
    pub records: Vec<CategoryRecord>,
}

/// Runs one collection pass against the router.
///
/// Every query is best-effort; `firmware` is the version learned from the
/// device description at connect time, when available.
pub async fn collect<C: RouterClient>(
    client: &mut C,
    config: &Config,
    firmware: Option<&str>,
) -> Snapshot {
    let device_info = read_or_empty(client, "DeviceInfo1", "GetInfo").await;
    let connection_info = if config.is_dsl {
        read_or_empty(client, "WANPPPConnection1", "GetInfo").await
    } else {
        read_or_empty(client, "WANIPConn1", "GetStatusInfo").await
    };
    let wan_info = read_or_empty(client, "WANCommonIFC1", "GetCommonLinkProperties").await;
    let traffic_info = read_or_empty(client, "WANCommonIFC1", "GetAddonInfos").await;
    let fritz_info = read_or_empty(client, "LANHostConfigManagement1", "GetInfo").await;
    let dhcp_info = read_or_empty(client, "Hosts1", "GetHostNumberOfEntries").await;
    let host_info = hosts::aggregate(client).await.into_response();
    let lan_stat = read_or_empty(client, "LANEthernetInterfaceConfig1", "GetStatistics").await;

    let mut records = Vec::with_capacity(9);

    records.push(CategoryRecord {
        category: "general".to_string(),
        fields: vec![
            extract(&device_info, "NewModelName", Str),
            extract(&wan_info, "NewWANAccessType", Str),
            extract(&device_info, "NewSerialNumber", Str),
            firmware.map_or_else(Field::absent, |v| Field::string("Firmware", v)),
        ],
    });

    records.push(CategoryRecord {
        category: "status".to_string(),
        fields: vec![
            extract(&device_info, "NewUpTime", Integer),
            extract(&connection_info, "NewConnectionStatus", Str),
            extract_as(&connection_info, "NewLastConnectionError", Str, "LastError"),
        ],
    });

    records.push(CategoryRecord {
        category: "wan".to_string(),
        fields: vec![
            extract_as(&connection_info, "NewUptime", Integer, "ConnectionTime"),
            extract(&wan_info, "NewLayer1DownstreamMaxBitRate", Integer),
            extract(&wan_info, "NewLayer1UpstreamMaxBitRate", Integer),
            extract(&traffic_info, "NewByteReceiveRate", Integer),
            extract(&traffic_info, "NewByteSendRate", Integer),
            extract(&traffic_info, "NewPacketReceiveRate", Integer),
            extract(&traffic_info, "NewPacketSendRate", Integer),
            // 64-bit totals; the 32-bit counters wrap within hours on a
            // fast uplink and are not exported
            extract_as(
                &traffic_info,
                "NewX_AVM_DE_TotalBytesReceived64",
                Float,
                "TotalBytesReceived64",
            ),
            extract_as(
                &traffic_info,
                "NewX_AVM_DE_TotalBytesSent64",
                Float,
                "TotalBytesSent64",
            ),
        ],
    });

    if config.is_dsl {
        let dsl_info = read_or_empty(client, "WANDSLInterfaceConfig1", "GetInfo").await;
        let dsl_error =
            read_or_empty(client, "WANDSLInterfaceConfig1", "GetStatisticsTotal").await;
        records.push(CategoryRecord {
            category: "dsl".to_string(),
            fields: vec![
                extract(&dsl_info, "NewDownstreamCurrRate", Integer),
                extract(&dsl_info, "NewUpstreamCurrRate", Integer),
                extract(&dsl_info, "NewDownstreamMaxRate", Integer),
                extract(&dsl_info, "NewUpstreamMaxRate", Integer),
                extract(&dsl_info, "NewDownstreamNoiseMargin", Integer),
                extract(&dsl_info, "NewUpstreamNoiseMargin", Integer),
                extract(&dsl_info, "NewDownstreamPower", Integer),
                extract(&dsl_info, "NewUpstreamPower", Integer),
                extract(&dsl_info, "NewDownstreamAttenuation", Integer),
                extract(&dsl_info, "NewUpstreamAttenuation", Integer),
                extract(&dsl_error, "NewHECErrors", Integer),
                extract(&dsl_error, "NewATUCHECErrors", Integer),
                extract(&dsl_error, "NewCRCErrors", Integer),
                extract(&dsl_error, "NewATUCCRCErrors", Integer),
                extract(&dsl_error, "NewFECErrors", Integer),
                extract(&dsl_error, "NewATUCFECErrors", Integer),
            ],
        });
    }

    let mut network_fields = Vec::new();
    if config.internet_facing {
        network_fields.push(extract(&connection_info, "NewExternalIPAddress", Str));
        network_fields.push(extract(&connection_info, "NewDNSServers", Str));
    }
    network_fields.extend([
        extract_as(&fritz_info, "NewDNSServers", Str, "LocalDNSServer"),
        extract(&dhcp_info, "NewHostNumberOfEntries", Integer),
        extract(&host_info, "HostsKnown", Integer),
        extract(&host_info, "HostsKnownLAN", Integer),
        extract(&host_info, "HostsKnownWLAN", Integer),
        extract(&host_info, "HostsActive", Integer),
        extract(&host_info, "HostsActiveLAN", Integer),
        extract(&host_info, "HostsActiveWLAN", Integer),
    ]);
    records.push(CategoryRecord {
        category: "network".to_string(),
        fields: network_fields,
    });

    records.push(CategoryRecord {
        category: "lan".to_string(),
        fields: vec![
            extract(&lan_stat, "NewPacketsSent", Integer),
            extract(&lan_stat, "NewPacketsReceived", Integer),
        ],
    });

    for (band, category) in [(1, "wlan_2.4GHz"), (2, "wlan_5GHz"), (3, "wlan_Guest")] {
        let service = format!("WLANConfiguration{band}");
        let stat = read_or_empty(client, &service, "GetStatistics").await;
        let info = read_or_empty(client, &service, "GetInfo").await;
        let assoc = read_or_empty(client, &service, "GetTotalAssociations").await;
        records.push(CategoryRecord {
            category: category.to_string(),
            fields: vec![
                extract(&info, "NewSSID", Str),
                extract(&info, "NewChannel", Integer),
                extract_as(&assoc, "NewTotalAssociations", Integer, "ClientsNumber"),
                extract_as(&stat, "NewTotalPacketsSent", Integer, "PacketsSent"),
                extract_as(&stat, "NewTotalPacketsReceived", Integer, "PacketsReceived"),
            ],
        });
    }

    let host_tag = extract_as(&fritz_info, "NewDomainName", Float, "host")
        .as_str()
        .to_string();

    Snapshot { host_tag, records }
}

/// Issues one query, degrading any failure to an empty response.
async fn read_or_empty<C: RouterClient>(
    client: &mut C,
    service: &str,
    action: &str,
) -> SoapResponse {
    match client.call(service, action, &[]).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Query {}.{} failed: {}", service, action, e);
            SoapResponse::new()
        }
    }
}
