// SPDX-License-Identifier: MIT

//! SOAP envelope assembly and response parsing
//!
//! TR-064 actions are SOAP 1.1 calls. The bodies are small and flat, so
//! parsing is a targeted scan for the response element and its children
//! rather than a general XML tree.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::fritz::types::{SoapResponse, Value};

/// One service entry from a device description document
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    /// Short name derived from the serviceId suffix, e.g. `WANIPConn1`
    pub name: String,
    /// Full URN, e.g. `urn:dslforum-org:service:DeviceInfo:1`
    pub service_type: String,
    /// POST target for action calls
    pub control_url: String,
}

/// Builds the SOAP envelope for one action call.
pub(crate) fn build_envelope(
    service_type: &str,
    action: &str,
    args: &[(&str, String)],
) -> String {
    let mut arguments = String::new();
    for (name, value) in args {
        arguments.push_str(&format!(
            "<{name}>{}</{name}>",
            escape(value)
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body><u:{action} xmlns:u=\"{service_type}\">{arguments}</u:{action}></s:Body>\
         </s:Envelope>"
    )
}

/// Parses the response body of a successful action call.
///
/// Extracts the children of `<u:{action}Response>` as string values. A
/// response element with no children yields an empty map, which callers
/// treat the same as absent fields.
pub(crate) fn parse_action_response(body: &str, action: &str) -> Result<SoapResponse> {
    if let Some((code, description)) = parse_fault(body) {
        return Err(AppError::Soap { code, description });
    }

    let open = format!(":{action}Response");
    let start = body
        .find(&open)
        .and_then(|pos| body[pos..].find('>').map(|off| pos + off + 1))
        .ok_or_else(|| AppError::Parse(format!("No {action}Response element in body")))?;
    // Closing tags are skipped by the child scanner, so running to the end
    // of the body is safe if the closing element uses another prefix.
    let close = format!("</u:{action}Response>");
    let end = body[start..]
        .find(&close)
        .map_or(body.len(), |off| start + off);

    Ok(parse_children(&body[start..end]))
}

/// Extracts flat `<Name>text</Name>` children from an element body.
fn parse_children(inner: &str) -> SoapResponse {
    let mut out = HashMap::new();
    let mut rest = inner;
    while let Some(lt) = rest.find('<') {
        rest = &rest[lt + 1..];
        if rest.starts_with('/') || rest.starts_with('!') || rest.starts_with('?') {
            continue;
        }
        let Some(gt) = rest.find('>') else { break };
        let tag = &rest[..gt];
        rest = &rest[gt + 1..];
        if let Some(stripped) = tag.strip_suffix('/') {
            // self-closing element, present but empty
            if let Some(name) = stripped.split_whitespace().next() {
                out.insert(name.to_string(), Value::Str(String::new()));
            }
            continue;
        }
        let name = tag.split_whitespace().next().unwrap_or(tag);
        let closing = format!("</{name}>");
        let Some(end) = rest.find(&closing) else {
            continue;
        };
        out.insert(name.to_string(), Value::Str(unescape(&rest[..end])));
        rest = &rest[end + closing.len()..];
    }
    out
}

/// Extracts a UPnP fault, if the body carries one.
pub(crate) fn parse_fault(body: &str) -> Option<(u32, String)> {
    if !body.contains(":Fault>") && !body.contains("<Fault>") {
        return None;
    }
    let code = element_text(body, "errorCode")
        .and_then(|t| t.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let description = element_text(body, "errorDescription")
        .or_else(|| element_text(body, "faultstring"))
        .map(|t| unescape(t.trim()))
        .unwrap_or_else(|| "fault".to_string());
    Some((code, description))
}

/// Parses all `<service>` entries from a device description document.
///
/// Every embedded device's service list is included; the short service
/// name is the last colon-separated component of the serviceId, matching
/// the names used by the router's own documentation (`DeviceInfo1`,
/// `WANIPConn1`, `WLANConfiguration2`, ...).
pub(crate) fn parse_services(xml: &str) -> Vec<ServiceEndpoint> {
    let mut out = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<service>") {
        rest = &rest[start + "<service>".len()..];
        let Some(end) = rest.find("</service>") else {
            break;
        };
        let block = &rest[..end];
        rest = &rest[end + "</service>".len()..];

        let Some(service_type) = element_text(block, "serviceType") else {
            continue;
        };
        let Some(service_id) = element_text(block, "serviceId") else {
            continue;
        };
        let Some(control_url) = element_text(block, "controlURL") else {
            continue;
        };
        let name = service_id.rsplit(':').next().unwrap_or(service_id);
        out.push(ServiceEndpoint {
            name: name.trim().to_string(),
            service_type: service_type.trim().to_string(),
            control_url: control_url.trim().to_string(),
        });
    }
    out
}

/// Firmware version from the description's `<SystemVersion>` block.
pub(crate) fn parse_system_version(xml: &str) -> Option<String> {
    let start = xml.find("<systemVersion>")?;
    let block = &xml[start..];
    let end = block.find("</systemVersion>")?;
    element_text(&block[..end], "Display").map(|t| t.trim().to_string())
}

fn element_text<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
