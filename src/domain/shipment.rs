//! Shipment records and the write payload derived from user input.

use crate::domain::cost::compute_cost;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Store-assigned identifier. Opaque to callers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ShipmentId(pub i64);

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Failed,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Pending,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Failed,
    ];

    /// Wire code, as stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Failed => "FAILED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Failed => "Failed",
        }
    }

    /// Every status in display order, for filter and form dropdowns.
    pub fn options() -> Vec<StatusOption> {
        ShipmentStatus::ALL
            .into_iter()
            .map(|code| StatusOption {
                code,
                label: code.label().to_string(),
            })
            .collect()
    }
}

/// A selectable status: wire code plus human label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusOption {
    pub code: ShipmentStatus,
    pub label: String,
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// A persisted shipment as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShipmentRecord {
    pub id: ShipmentId,
    pub title: String,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub is_fragile: bool,
    pub weight_kg: f64,
    pub distance_km: f64,
    pub shipping_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// Bad user input, caught before any store call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must not exceed {max} (got {value})")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },
    #[error("{field} is not a number: '{input}'")]
    NotANumber { field: &'static str, input: String },
    #[error("unknown shipment status '{0}'")]
    UnknownStatus(String),
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Largest accepted weight (kg) or distance (km). Keeps every derived cost finite and exact
/// to the cent.
pub const MAX_MEASURE: f64 = 1.0e9;

/// Checks that a physical measure can be fed to the cost engine.
pub fn validate_measure(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    if value > MAX_MEASURE {
        return Err(ValidationError::TooLarge {
            field,
            value,
            max: MAX_MEASURE,
        });
    }
    Ok(value)
}

/// Parses a measure typed into a form field.
pub fn parse_measure(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            input: input.to_string(),
        })?;
    validate_measure(field, value)
}

/// The user-editable fields of a shipment.
///
/// Carries no `shipping_cost`; unknown fields (including that one) are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ShipmentInput {
    pub title: String,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub is_fragile: bool,
    pub weight_kg: f64,
    pub distance_km: f64,
}

/// A validated row ready to be written, with its cost already derived.
///
/// Only constructible through [`ShipmentWrite::from_input`], so every write carries a cost
/// that matches its weight, distance and fragility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentWrite {
    title: String,
    status: ShipmentStatus,
    is_fragile: bool,
    weight_kg: f64,
    distance_km: f64,
    shipping_cost: f64,
}

impl ShipmentWrite {
    pub fn from_input(input: &ShipmentInput) -> Result<Self, ValidationError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let weight_kg = validate_measure("weight_kg", input.weight_kg)?;
        let distance_km = validate_measure("distance_km", input.distance_km)?;

        Ok(Self {
            title: title.to_string(),
            status: input.status,
            is_fragile: input.is_fragile,
            weight_kg,
            distance_km,
            shipping_cost: compute_cost(weight_kg, distance_km, input.is_fragile),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn is_fragile(&self) -> bool {
        self.is_fragile
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn shipping_cost(&self) -> f64 {
        self.shipping_cost
    }

    /// Materializes the row the way a store would after assigning `id` and `created_at`.
    pub fn into_record(self, id: ShipmentId, created_at: DateTime<Utc>) -> ShipmentRecord {
        ShipmentRecord {
            id,
            title: self.title,
            status: self.status,
            is_fragile: self.is_fragile,
            weight_kg: self.weight_kg,
            distance_km: self.distance_km,
            shipping_cost: self.shipping_cost,
            created_at,
        }
    }
}
