// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Events emitted for outbound HTTP requests.

use url::Url;

use super::keys::PropertyKey;
use super::property_list::PropertyList;
use super::EventId;
use crate::aggregator::DispatchMap;
use crate::header::{self, HeaderDescriptor};
use crate::redact::{self, HostAllowlist};

/// Value the server uses for "no error" in the diagnostic header.
const NO_ERROR_SENTINEL: &str = "0";

/// Fields cleared to an empty value at the start of every fold.
pub const RESET_FIELDS: &[PropertyKey] = &[
    PropertyKey::HttpResponseCode,
    PropertyKey::OauthErrorCode,
    PropertyKey::HttpPath,
    PropertyKey::RequestIdHeader,
];

/// Fields removed at the start of every fold.
pub const DROP_FIELDS: &[PropertyKey] = &[
    PropertyKey::ServerErrorCode,
    PropertyKey::ServerSubErrorCode,
    PropertyKey::TokenAge,
    PropertyKey::SpeInfo,
];

/// Telemetry for a single HTTP request.
#[derive(Debug, Clone)]
pub struct HttpEvent {
    id: EventId,
    properties: PropertyList,
}

impl HttpEvent {
    /// Create an event; `event_name` is stored as the first property.
    pub fn new(id: EventId, event_name: &str) -> Self {
        let mut properties = PropertyList::new();
        properties.set(PropertyKey::EventName, event_name);
        Self { id, properties }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    pub fn set_property(&mut self, key: PropertyKey, value: impl Into<String>) {
        self.properties.set(key, value);
    }

    pub fn set_user_agent(&mut self, user_agent: &str) {
        self.set_property(PropertyKey::HttpUserAgent, user_agent);
    }

    pub fn set_method(&mut self, method: &str) {
        self.set_property(PropertyKey::HttpMethod, method);
    }

    pub fn set_query_parameters(&mut self, query_parameters: &str) {
        self.set_property(PropertyKey::HttpQueryParameters, query_parameters);
    }

    pub fn set_response_code(&mut self, response_code: u16) {
        self.set_property(PropertyKey::HttpResponseCode, response_code.to_string());
    }

    pub fn set_api_version(&mut self, api_version: &str) {
        self.set_property(PropertyKey::HttpApiVersion, api_version);
    }

    /// Record the request path without its tenant segment.
    ///
    /// Does nothing unless the URL's authority is in `hosts`.
    pub fn set_http_path(&mut self, url: &Url, hosts: &dyn HostAllowlist) {
        if let Some(path) = redact::sanitize_path(url, hosts) {
            self.set_property(PropertyKey::HttpPath, path);
        }
    }

    pub fn set_oauth_error_code(&mut self, error_code: &str) {
        self.set_property(PropertyKey::OauthErrorCode, error_code);
    }

    pub fn set_request_id_header(&mut self, request_id: &str) {
        self.set_property(PropertyKey::RequestIdHeader, request_id);
    }

    /// Parse the `x-ms-clitelem` header and record the fields it carries.
    ///
    /// An absent header is ignored. Unknown versions and malformed values are
    /// logged and leave the event untouched.
    pub fn set_x_ms_cli_telem_data(&mut self, raw: &str) {
        match header::parse(raw) {
            Ok(Some(descriptor)) => self.apply_header(&descriptor),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(
                    event_id = %self.id,
                    error_code = err.code(),
                    "Ignoring {} header: {}",
                    header::HEADER_NAME,
                    err
                );
            }
        }
    }

    fn apply_header(&mut self, descriptor: &HeaderDescriptor) {
        if let Some(code) = reportable_error(descriptor.error_code.as_deref()) {
            self.set_server_error_code(code);
        }
        if let Some(code) = reportable_error(descriptor.sub_error_code.as_deref()) {
            self.set_server_sub_error_code(code);
        }
        if let Some(age) = non_blank(descriptor.token_age.as_deref()) {
            self.set_refresh_token_age(age);
        }
        if let Some(ring) = non_blank(descriptor.spe_ring.as_deref()) {
            self.set_spe_ring(ring);
        }
    }

    pub fn set_server_error_code(&mut self, error_code: &str) {
        self.set_property(PropertyKey::ServerErrorCode, error_code.trim());
    }

    pub fn set_server_sub_error_code(&mut self, sub_error_code: &str) {
        self.set_property(PropertyKey::ServerSubErrorCode, sub_error_code.trim());
    }

    pub fn set_refresh_token_age(&mut self, token_age: &str) {
        self.set_property(PropertyKey::TokenAge, token_age.trim());
    }

    pub fn set_spe_ring(&mut self, spe_ring: &str) {
        self.set_property(PropertyKey::SpeInfo, spe_ring.trim());
    }

    /// Merge this event into the running dispatch record.
    ///
    /// Reset fields left over from a previous fold become empty, drop fields
    /// disappear, and then this event's values for either set are copied in.
    pub(crate) fn fold_into(&self, dispatch: &mut DispatchMap) {
        dispatch.increment_count(PropertyKey::HttpEventCount);

        for key in RESET_FIELDS {
            dispatch.reset(*key);
        }
        for key in DROP_FIELDS {
            dispatch.drop_key(*key);
        }

        for (key, value) in self.properties.entries() {
            if RESET_FIELDS.contains(&key) || DROP_FIELDS.contains(&key) {
                dispatch.insert(key, value);
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn reportable_error(value: Option<&str>) -> Option<&str> {
    non_blank(value).filter(|v| v.trim() != NO_ERROR_SENTINEL)
}
