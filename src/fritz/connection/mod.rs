// SPDX-License-Identifier: MIT

//! Low-level HTTP transport for the TR-064 management interface
//!
//! The FritzBox speaks plain HTTP/1.1 on its management port. Requests are
//! short-lived: one TCP connection per request, `Connection: close`, read
//! to EOF. Every request is wrapped in the configured timeout; a timeout is
//! reported like any other transport failure.

pub(crate) mod auth;
pub(crate) mod soap;

use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{AppError, Result};

/// Parsed HTTP response
pub(crate) struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// One router HTTP endpoint (address, port, per-request timeout)
#[derive(Debug, Clone)]
pub(crate) struct HttpEndpoint {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpEndpoint {
    pub(crate) fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
        }
    }

    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    /// Issues a GET request for `path`.
    pub(crate) async fn get(&self, path: &str) -> Result<HttpResponse> {
        let request = format!(
            "GET {path} HTTP/1.1\r\n\
             Host: {host}:{port}\r\n\
             User-Agent: fritzbox-exporter\r\n\
             Connection: close\r\n\
             \r\n",
            host = self.host,
            port = self.port,
        );
        self.roundtrip(request.into_bytes()).await
    }

    /// Issues a SOAP POST for `path` with the given `SOAPAction` header.
    ///
    /// `authorization` carries a precomputed Digest header when one is
    /// available; the caller handles the 401 challenge dance.
    pub(crate) async fn post_soap(
        &self,
        path: &str,
        soap_action: &str,
        authorization: Option<&str>,
        body: &str,
    ) -> Result<HttpResponse> {
        let mut request = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {host}:{port}\r\n\
             User-Agent: fritzbox-exporter\r\n\
             Content-Type: text/xml; charset=\"utf-8\"\r\n\
             SOAPAction: \"{soap_action}\"\r\n\
             Content-Length: {len}\r\n\
             Connection: close\r\n",
            host = self.host,
            port = self.port,
            len = body.len(),
        );
        if let Some(auth) = authorization {
            request.push_str("Authorization: ");
            request.push_str(auth);
            request.push_str("\r\n");
        }
        request.push_str("\r\n");
        request.push_str(body);
        self.roundtrip(request.into_bytes()).await
    }

    async fn roundtrip(&self, request: Vec<u8>) -> Result<HttpResponse> {
        timeout(self.timeout, self.roundtrip_inner(request)).await?
    }

    async fn roundtrip_inner(&self, request: Vec<u8>) -> Result<HttpResponse> {
        let addr = format!("{}:{}", self.host, self.port);
        tracing::trace!("Connecting to {}", addr);
        let mut stream = TcpStream::connect(&addr).await?;
        stream.write_all(&request).await?;

        // Connection: close was requested, so EOF delimits the response.
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;
        parse_response(&raw)
    }
}

fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let text = String::from_utf8_lossy(raw);
    let (head, body) = text
        .split_once("\r\n\r\n")
        .ok_or_else(|| AppError::Parse("Truncated HTTP response".to_string()))?;

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| AppError::Parse("Empty HTTP response".to_string()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| AppError::Parse(format!("Bad status line: {status_line}")))?;

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let body = if headers
        .get("transfer-encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
    {
        decode_chunked(body)?
    } else {
        body.to_string()
    };

    tracing::trace!("HTTP {} with {} body bytes", status, body.len());
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// Decodes a chunked transfer encoding body.
fn decode_chunked(body: &str) -> Result<String> {
    let mut out = String::new();
    let mut rest = body;
    loop {
        let (size_line, tail) = rest
            .split_once("\r\n")
            .ok_or_else(|| AppError::Parse("Truncated chunk header".to_string()))?;
        let size = usize::from_str_radix(size_line.trim().split(';').next().unwrap_or(""), 16)
            .map_err(|_| AppError::Parse(format!("Bad chunk size: {size_line}")))?;
        if size == 0 {
            break;
        }
        let chunk = tail
            .get(..size)
            .ok_or_else(|| AppError::Parse("Truncated chunk body".to_string()))?;
        out.push_str(chunk);
        // Each chunk is followed by CRLF
        let tail = &tail[size..];
        rest = tail.strip_prefix("\r\n").unwrap_or(tail);
    }
    Ok(out)
}
