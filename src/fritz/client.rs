// SPDX-License-Identifier: MIT

//! High-level TR-064 client

use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};

use super::connection::auth::DigestChallenge;
use super::connection::soap::{self, ServiceEndpoint};
use super::connection::HttpEndpoint;
use super::types::{RouterClient, SoapResponse};

/// Device description documents fetched at connect time.
///
/// The TR-064 description covers the authenticated services; the IGD
/// description adds the legacy UPnP WAN services (`WANCommonIFC1`,
/// `WANIPConn1`) that expose the traffic counters.
const DESCRIPTION_PATHS: [&str; 2] = ["/tr64desc.xml", "/igddesc.xml"];

/// FritzBox TR-064 client
///
/// Resolves service names against the router's description documents and
/// issues SOAP action calls with HTTP Digest authentication.
pub struct FritzClient {
    endpoint: HttpEndpoint,
    username: String,
    password: String,
    services: HashMap<String, ServiceEndpoint>,
    system_version: Option<String>,
    challenge: Option<DigestChallenge>,
}

impl FritzClient {
    /// Connects to the router and learns its service table.
    ///
    /// The TR-064 description must be reachable; without it no action can
    /// be addressed, so this is the one fatal failure point.
    ///
    /// # Errors
    ///
    /// Returns an error if the router is unreachable or serves no usable
    /// description document.
    pub async fn connect(config: &Config) -> Result<Self> {
        let endpoint = HttpEndpoint::new(
            &config.address,
            config.port,
            Duration::from_secs(config.timeout_secs),
        );

        let mut services = HashMap::new();
        let mut system_version = None;
        let mut fetched = 0usize;
        for path in DESCRIPTION_PATHS {
            match endpoint.get(path).await {
                Ok(resp) if resp.status == 200 => {
                    fetched += 1;
                    for service in soap::parse_services(&resp.body) {
                        tracing::trace!(
                            "Service {} -> {} ({})",
                            service.name,
                            service.control_url,
                            service.service_type
                        );
                        services.entry(service.name.clone()).or_insert(service);
                    }
                    if system_version.is_none() {
                        system_version = soap::parse_system_version(&resp.body);
                    }
                }
                Ok(resp) => {
                    tracing::debug!("Description {} returned status {}", path, resp.status);
                }
                Err(e) => {
                    tracing::debug!("Description {} not available: {}", path, e);
                }
            }
        }

        if fetched == 0 || services.is_empty() {
            return Err(AppError::Config(format!(
                "No TR-064 description available from {}",
                endpoint.host()
            )));
        }

        tracing::debug!(
            "Connected to {}: {} services, firmware {:?}",
            endpoint.host(),
            services.len(),
            system_version
        );

        Ok(Self {
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
            services,
            system_version,
            challenge: None,
        })
    }

    /// Firmware version from the device description, if advertised.
    #[must_use]
    pub fn system_version(&self) -> Option<&str> {
        self.system_version.as_deref()
    }

    async fn call_action(
        &mut self,
        service: &str,
        action: &str,
        args: &[(&str, String)],
    ) -> Result<SoapResponse> {
        let endpoint = self
            .services
            .get(service)
            .cloned()
            .ok_or_else(|| AppError::Config(format!("Unknown TR-064 service: {service}")))?;

        let soap_action = format!("{}#{action}", endpoint.service_type);
        let body = soap::build_envelope(&endpoint.service_type, action, args);

        let authorization = self.challenge.as_mut().map(|challenge| {
            challenge.authorize(&self.username, &self.password, "POST", &endpoint.control_url)
        });
        let mut response = self
            .endpoint
            .post_soap(
                &endpoint.control_url,
                &soap_action,
                authorization.as_deref(),
                &body,
            )
            .await?;

        if response.status == 401 {
            // Fresh or expired nonce: take the new challenge and retry once.
            let header = response
                .header("www-authenticate")
                .ok_or_else(|| AppError::Auth("401 without challenge".to_string()))?;
            let mut challenge = DigestChallenge::parse(header)?;
            let authorization = challenge.authorize(
                &self.username,
                &self.password,
                "POST",
                &endpoint.control_url,
            );
            self.challenge = Some(challenge);
            response = self
                .endpoint
                .post_soap(
                    &endpoint.control_url,
                    &soap_action,
                    Some(&authorization),
                    &body,
                )
                .await?;
            if response.status == 401 {
                return Err(AppError::Auth(format!(
                    "Authentication rejected for user {}",
                    self.username
                )));
            }
        }

        // Faults are delivered with status 500 and parsed out of the body;
        // anything else unexpected is a transport-level failure.
        if response.status != 200 && response.status != 500 {
            return Err(AppError::Http(response.status));
        }

        soap::parse_action_response(&response.body, action)
    }
}

impl RouterClient for FritzClient {
    async fn call(
        &mut self,
        service: &str,
        action: &str,
        args: &[(&str, String)],
    ) -> Result<SoapResponse> {
        self.call_action(service, action, args).await
    }
}
