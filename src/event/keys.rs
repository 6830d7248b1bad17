// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Recognized telemetry property keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EventError;

/// Prefix shared by every wire key.
pub const KEY_PREFIX: &str = "authtel.";

macro_rules! property_keys {
    ($($(#[$doc:meta])* $variant:ident => $wire:literal,)+) => {
        /// A telemetry property key.
        ///
        /// The set is closed: raw strings are only accepted through [`FromStr`],
        /// which rejects anything not listed here.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum PropertyKey {
            $($(#[$doc])* $variant,)+
        }

        impl PropertyKey {
            /// Every recognized key, in declaration order.
            pub const ALL: &'static [PropertyKey] = &[$(PropertyKey::$variant,)+];

            /// Wire-stable identifier for this key.
            pub const fn as_str(self) -> &'static str {
                // `concat!` only takes literals; this must stay equal to KEY_PREFIX.
                match self {
                    $(PropertyKey::$variant => concat!("authtel.", $wire),)+
                }
            }
        }
    };
}

property_keys! {
    /// Name of the event, set at construction.
    EventName => "event_name",
    HttpUserAgent => "user_agent",
    HttpMethod => "method",
    HttpQueryParameters => "query_params",
    HttpResponseCode => "response_code",
    HttpApiVersion => "api_version",
    /// Sanitized request path with the tenant segment removed.
    HttpPath => "http_path",
    OauthErrorCode => "oauth_error_code",
    RequestIdHeader => "x_ms_request_id",
    ServerErrorCode => "server_error_code",
    ServerSubErrorCode => "server_sub_error_code",
    /// Refresh token age reported by the server.
    TokenAge => "rt_age",
    /// Deployment ring that served the request.
    SpeInfo => "spe_info",
    HttpEventCount => "http_event_count",
    CacheEventCount => "cache_event_count",
    TokenType => "token_type",
    TokenTypeIsRt => "is_rt",
    TokenTypeIsMrrt => "is_mrrt",
    TokenTypeIsFrt => "is_frt",
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKey {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| EventError::UnknownKey(s.to_string()))
    }
}

impl Serialize for PropertyKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PropertyKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
