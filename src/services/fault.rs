// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava fault payload detection.
//!
//! Strava reports errors as `{"message": "...", "errors": [...]}`. A body is
//! treated as a fault when it parses as such an object with a non-empty
//! message; anything else is assumed to be data.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::transport::HttpResponse;
use crate::error::ApiError;

/// One entry of a fault's `errors` list. Only the parts shown to the user
/// are decoded.
#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    resource: String,
}

#[derive(Debug, Deserialize)]
struct ApiFault {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

/// Return the fault message if `body` is a Strava error payload.
pub fn fault_message(body: &[u8]) -> Option<String> {
    let fault: ApiFault = serde_json::from_slice(body).ok()?;
    if fault.message.is_empty() {
        return None;
    }
    let details: Vec<String> = fault
        .errors
        .iter()
        .filter(|e| !e.code.is_empty())
        .map(|e| format!("{} {}", e.resource, e.code).trim().to_string())
        .collect();
    if details.is_empty() {
        Some(fault.message)
    } else {
        Some(format!("{} ({})", fault.message, details.join(", ")))
    }
}

pub fn is_fault(body: &[u8]) -> bool {
    fault_message(body).is_some()
}

/// Classify a response and decode its body.
///
/// Order: fault payload, then non-2xx status, then JSON decoding.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if let Some(message) = fault_message(&response.body) {
        if response.status == 429 || message.contains(ApiError::RATE_LIMIT_MESSAGE) {
            tracing::warn!(status = response.status, "Strava rate limit hit");
        }
        return Err(ApiError::Fault {
            status: response.status,
            message,
        });
    }

    if !response.is_success() {
        if response.status == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        }
        return Err(ApiError::Http {
            status: response.status,
            body: response.text(),
        });
    }

    Ok(serde_json::from_slice(&response.body)?)
}
