//! In-progress create/edit form state.
//!
//! Every setter that touches weight, distance or fragility recomputes the cost on the spot,
//! and [`ShipmentDraft::submit`] recomputes it once more from the current inputs.

use crate::domain::cost::{compute_cost, cost_breakdown, CostBreakdown};
use crate::domain::shipment::{
    parse_measure, validate_measure, ShipmentId, ShipmentInput, ShipmentRecord, ShipmentStatus,
    ShipmentWrite, ValidationError,
};

/// What a submitted draft should become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    Create,
    Update(ShipmentId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentDraft {
    target: DraftTarget,
    title: String,
    status: ShipmentStatus,
    is_fragile: bool,
    weight_kg: f64,
    distance_km: f64,
    shipping_cost: f64,
}

impl Default for ShipmentDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentDraft {
    /// Blank form for a new shipment.
    pub fn new() -> Self {
        Self {
            target: DraftTarget::Create,
            title: String::new(),
            status: ShipmentStatus::Pending,
            is_fragile: false,
            weight_kg: 0.0,
            distance_km: 0.0,
            shipping_cost: 0.0,
        }
    }

    /// Form pre-filled from an existing record.
    ///
    /// The stored cost is not trusted; it is recomputed from the record's inputs. A record
    /// whose weight or distance would not pass validation is refused rather than zeroed.
    pub fn edit(record: &ShipmentRecord) -> Result<Self, ValidationError> {
        let mut draft = Self {
            target: DraftTarget::Update(record.id),
            title: record.title.clone(),
            status: record.status,
            is_fragile: record.is_fragile,
            weight_kg: validate_measure("weight_kg", record.weight_kg)?,
            distance_km: validate_measure("distance_km", record.distance_km)?,
            shipping_cost: 0.0,
        };
        draft.recompute();
        Ok(draft)
    }

    fn recompute(&mut self) {
        self.shipping_cost = compute_cost(self.weight_kg, self.distance_km, self.is_fragile);
    }

    pub fn target(&self) -> DraftTarget {
        self.target
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

    /// Cost for the current inputs. Read-only: there is no setter.
    pub fn shipping_cost(&self) -> f64 {
        self.shipping_cost
    }

    pub fn breakdown(&self) -> CostBreakdown {
        cost_breakdown(self.weight_kg, self.distance_km, self.is_fragile)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_status(&mut self, status: ShipmentStatus) {
        self.status = status;
    }

    pub fn set_fragile(&mut self, is_fragile: bool) {
        self.is_fragile = is_fragile;
        self.recompute();
    }

    /// Rejected values leave the previous weight (and cost) in place.
    pub fn set_weight_kg(&mut self, weight_kg: f64) -> Result<(), ValidationError> {
        self.weight_kg = validate_measure("weight_kg", weight_kg)?;
        self.recompute();
        Ok(())
    }

    pub fn set_distance_km(&mut self, distance_km: f64) -> Result<(), ValidationError> {
        self.distance_km = validate_measure("distance_km", distance_km)?;
        self.recompute();
        Ok(())
    }

    pub fn set_weight_text(&mut self, text: &str) -> Result<(), ValidationError> {
        self.set_weight_kg(parse_measure("weight_kg", text)?)
    }

    pub fn set_distance_text(&mut self, text: &str) -> Result<(), ValidationError> {
        self.set_distance_km(parse_measure("distance_km", text)?)
    }

    pub fn to_input(&self) -> ShipmentInput {
        ShipmentInput {
            title: self.title.clone(),
            status: self.status,
            is_fragile: self.is_fragile,
            weight_kg: self.weight_kg,
            distance_km: self.distance_km,
        }
    }

    /// Validates the form and produces the row to write.
    pub fn submit(&self) -> Result<(DraftTarget, ShipmentWrite), ValidationError> {
        let write = ShipmentWrite::from_input(&self.to_input())?;
        Ok((self.target, write))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn cost_follows_every_dependency() {
        let mut draft = ShipmentDraft::new();
        assert_eq!(draft.shipping_cost(), 0.0);

        draft.set_weight_kg(10.0).unwrap();
        assert_eq!(draft.shipping_cost(), 20.0);
        draft.set_distance_km(20.0).unwrap();
        assert_eq!(draft.shipping_cost(), 30.0);
        draft.set_fragile(true);
        assert_eq!(draft.shipping_cost(), 36.0);
        draft.set_fragile(false);
        assert_eq!(draft.shipping_cost(), 30.0);

        draft.set_title("Unrelated edit");
        draft.set_status(ShipmentStatus::Delivered);
        assert_eq!(draft.shipping_cost(), 30.0);
    }

    #[test]
    fn rejected_text_keeps_previous_value() {
        let mut draft = ShipmentDraft::new();
        draft.set_weight_text("4").unwrap();
        assert!(draft.set_weight_text("four").is_err());
        assert!(draft.set_distance_text("-3").is_err());
        assert_eq!(draft.weight_kg(), 4.0);
        assert_eq!(draft.distance_km(), 0.0);
        assert_eq!(draft.shipping_cost(), 8.0);
    }

    #[test]
    fn edit_recomputes_stale_stored_cost() {
        let record = ShipmentRecord {
            id: ShipmentId(7),
            title: "Glass vase".into(),
            status: ShipmentStatus::InTransit,
            is_fragile: true,
            weight_kg: 10.0,
            distance_km: 20.0,
            shipping_cost: 999.0,
            created_at: Utc::now(),
        };
        let draft = ShipmentDraft::edit(&record).unwrap();
        assert_eq!(draft.target(), DraftTarget::Update(ShipmentId(7)));
        assert_eq!(draft.shipping_cost(), 36.0);

        let (target, write) = draft.submit().unwrap();
        assert_eq!(target, DraftTarget::Update(ShipmentId(7)));
        assert_eq!(write.shipping_cost(), 36.0);
        assert_eq!(write.status(), ShipmentStatus::InTransit);
    }

    #[test]
    fn edit_refuses_corrupt_measures() {
        let record = ShipmentRecord {
            id: ShipmentId(9),
            title: "Broken row".into(),
            status: ShipmentStatus::Pending,
            is_fragile: false,
            weight_kg: -4.0,
            distance_km: 20.0,
            shipping_cost: 2.0,
            created_at: Utc::now(),
        };
        assert_eq!(
            ShipmentDraft::edit(&record),
            Err(ValidationError::Negative {
                field: "weight_kg",
                value: -4.0
            })
        );

        let huge = ShipmentRecord {
            weight_kg: 1.0,
            distance_km: 1e306,
            ..record
        };
        assert!(matches!(
            ShipmentDraft::edit(&huge),
            Err(ValidationError::TooLarge { field: "distance_km", .. })
        ));
    }

    #[test]
    fn oversized_measure_keeps_previous_cost() {
        let mut draft = ShipmentDraft::new();
        draft.set_weight_kg(10.0).unwrap();
        assert!(matches!(
            draft.set_weight_kg(1e306),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(draft.set_distance_text("1e306").is_err());
        assert_eq!(draft.weight_kg(), 10.0);
        assert_eq!(draft.shipping_cost(), 20.0);
        assert!(draft.breakdown().total.is_finite());
    }

    #[test]
    fn submit_requires_title() {
        let mut draft = ShipmentDraft::new();
        draft.set_weight_kg(1.0).unwrap();
        assert_eq!(draft.submit(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn breakdown_tracks_draft() {
        let mut draft = ShipmentDraft::new();
        draft.set_weight_kg(2.0).unwrap();
        draft.set_distance_km(4.0).unwrap();
        draft.set_fragile(true);
        let b = draft.breakdown();
        assert_eq!(b.base, 4.0);
        assert_eq!(b.distance_charge, 2.0);
        assert_eq!(b.total, draft.shipping_cost());
    }
}
