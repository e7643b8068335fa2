//! CRD conversion webhook for NodePool resources
//!
//! Handles conversion between v1 and v1beta1 of the NodePool CRD. The API
//! server calls this endpoint whenever it needs to serve an object in a
//! version other than the stored one.
//!
//! ## Endpoints
//! - POST /convert - Kubernetes ConversionReview webhook
//!
//! Each object in a review is deserialized into the typed NodePool for its
//! declared version and run through the conversion engine. Any failure fails
//! the whole review with an empty converted list - the API server then
//! rejects the operation rather than persisting a half-converted object.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::crd::conversion::{self, NodeClassRegistry};
use crate::crd::{v1, v1beta1};

use super::health::ServerState;

/// API group served by this webhook
const API_GROUP: &str = "varanto.io";

/// Kubernetes ConversionReview request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReview {
    pub api_version: String,
    pub kind: String,
    pub request: ConversionRequest,
}

/// The actual conversion request from Kubernetes
#[derive(Debug, Deserialize)]
pub struct ConversionRequest {
    /// Unique ID for this request
    pub uid: String,
    /// Target API version (e.g., "varanto.io/v1beta1"); note the wire
    /// spelling is not camelCase
    #[serde(rename = "desiredAPIVersion")]
    pub desired_api_version: String,
    /// Objects to convert
    pub objects: Vec<Value>,
}

/// Result status for conversion
#[derive(Debug, Serialize, PartialEq)]
pub struct ConversionResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for a conversion request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub uid: String,
    pub result: ConversionResult,
    pub converted_objects: Vec<Value>,
}

/// Full ConversionReview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReviewResponse {
    pub api_version: String,
    pub kind: String,
    pub response: ConversionResponse,
}

/// Extract version from apiVersion string (e.g., "varanto.io/v1beta1" -> "v1beta1")
fn extract_version(api_version: &str) -> Option<&str> {
    api_version.split('/').next_back()
}

/// Build a short context string (name) for error messages
fn object_context(obj: &Value) -> String {
    match obj
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(|n| n.as_str())
    {
        Some(name) => format!(" (name: {})", name),
        None => String::new(),
    }
}

/// Convert a single NodePool object to the desired version
fn convert_object(
    obj: &Value,
    desired_version: &str,
    registry: &NodeClassRegistry,
) -> Result<Value, String> {
    let current_api_version = obj
        .get("apiVersion")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing apiVersion{}", object_context(obj)))?;

    let current_version = extract_version(current_api_version).ok_or_else(|| {
        format!(
            "Invalid apiVersion format '{}'{}",
            current_api_version,
            object_context(obj)
        )
    })?;

    // Same version - no conversion needed
    if current_version == desired_version {
        return Ok(obj.clone());
    }

    let mut converted = match (current_version, desired_version) {
        ("v1", "v1beta1") => {
            let nodepool: v1::NodePool = serde_json::from_value(obj.clone())
                .map_err(|e| format!("Invalid v1 NodePool{}: {}", object_context(obj), e))?;
            let legacy = conversion::convert_to_v1beta1(&nodepool)
                .map_err(|e| format!("{}{}", e, object_context(obj)))?;
            serde_json::to_value(&legacy)
                .map_err(|e| format!("Serializing converted NodePool: {}", e))?
        }
        ("v1beta1", "v1") => {
            let nodepool: v1beta1::NodePool = serde_json::from_value(obj.clone())
                .map_err(|e| format!("Invalid v1beta1 NodePool{}: {}", object_context(obj), e))?;
            let current = conversion::convert_from_v1beta1(&nodepool, registry)
                .map_err(|e| format!("{}{}", e, object_context(obj)))?;
            serde_json::to_value(&current)
                .map_err(|e| format!("Serializing converted NodePool: {}", e))?
        }
        _ => {
            return Err(format!(
                "Unsupported conversion: {} -> {}",
                current_version, desired_version
            ))
        }
    };

    converted["apiVersion"] = json!(format!("{}/{}", API_GROUP, desired_version));
    converted["kind"] = json!("NodePool");
    Ok(converted)
}

/// Convert all objects in a request; the first failure fails the review
pub fn convert_nodepools(
    request: ConversionRequest,
    registry: &NodeClassRegistry,
) -> ConversionResponse {
    let desired_version = match extract_version(&request.desired_api_version) {
        Some(v) => v,
        None => {
            return ConversionResponse {
                uid: request.uid,
                result: ConversionResult {
                    status: "Failed".to_string(),
                    message: Some(format!(
                        "Invalid desired API version: {}",
                        request.desired_api_version
                    )),
                },
                converted_objects: vec![],
            };
        }
    };

    if desired_version != "v1" && desired_version != "v1beta1" {
        return ConversionResponse {
            uid: request.uid,
            result: ConversionResult {
                status: "Failed".to_string(),
                message: Some(format!("Unsupported API version: {}", desired_version)),
            },
            converted_objects: vec![],
        };
    }

    let mut converted_objects = Vec::with_capacity(request.objects.len());

    for obj in &request.objects {
        match convert_object(obj, desired_version, registry) {
            Ok(converted) => converted_objects.push(converted),
            Err(e) => {
                return ConversionResponse {
                    uid: request.uid,
                    result: ConversionResult {
                        status: "Failed".to_string(),
                        message: Some(e),
                    },
                    converted_objects: vec![],
                };
            }
        }
    }

    ConversionResponse {
        uid: request.uid,
        result: ConversionResult {
            status: "Success".to_string(),
            message: None,
        },
        converted_objects,
    }
}

/// Axum handler for the /convert endpoint
pub async fn handle_convert(
    State(state): State<ServerState>,
    Json(review): Json<ConversionReview>,
) -> impl IntoResponse {
    info!(
        uid = %review.request.uid,
        desired_version = %review.request.desired_api_version,
        object_count = review.request.objects.len(),
        "Processing conversion request"
    );

    let registry: Arc<NodeClassRegistry> = state.registry();
    let response = convert_nodepools(review.request, &registry);

    if response.result.status == "Failed" {
        warn!(
            uid = %response.uid,
            error = ?response.result.message,
            "Conversion failed"
        );
    } else {
        info!(
            uid = %response.uid,
            converted_count = response.converted_objects.len(),
            "Conversion successful"
        );
    }

    let review_response = ConversionReviewResponse {
        api_version: "apiextensions.k8s.io/v1".to_string(),
        kind: "ConversionReview".to_string(),
        response,
    };

    (StatusCode::OK, Json(review_response))
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
