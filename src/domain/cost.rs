//! Shipping cost derivation.
//!
//! The cost of a shipment is never entered by a user; it is always recomputed from
//! weight, distance and fragility using the rates below.

use serde::Serialize;
use utoipa::ToSchema;

/// Rate charged per kilogram.
pub const RATE_PER_KG: f64 = 2.0;
/// Rate charged per kilometre.
pub const RATE_PER_KM: f64 = 0.5;
/// Multiplier applied to fragile shipments (20% surcharge).
pub const FRAGILE_MULTIPLIER: f64 = 1.2;

/// Rounds half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the shipping cost for the given physical attributes.
///
/// Inputs must already be validated (finite, non-negative); this function never fails.
pub fn compute_cost(weight_kg: f64, distance_km: f64, is_fragile: bool) -> f64 {
    let base = weight_kg * RATE_PER_KG;
    let distance_charge = distance_km * RATE_PER_KM;
    let subtotal = base + distance_charge;
    let multiplier = if is_fragile { FRAGILE_MULTIPLIER } else { 1.0 };
    round2(subtotal * multiplier)
}

/// Line items shown under the total in an edit form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CostBreakdown {
    pub base: f64,
    pub distance_charge: f64,
    pub subtotal: f64,
    /// Amount added by the fragility surcharge (0 when not fragile).
    pub fragile_surcharge: f64,
    pub total: f64,
}

pub fn cost_breakdown(weight_kg: f64, distance_km: f64, is_fragile: bool) -> CostBreakdown {
    let base = round2(weight_kg * RATE_PER_KG);
    let distance_charge = round2(distance_km * RATE_PER_KM);
    let subtotal = round2(weight_kg * RATE_PER_KG + distance_km * RATE_PER_KM);
    let total = compute_cost(weight_kg, distance_km, is_fragile);
    CostBreakdown {
        base,
        distance_charge,
        subtotal,
        fragile_surcharge: round2(total - subtotal),
        total,
    }
}
