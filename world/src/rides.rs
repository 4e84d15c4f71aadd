//! Authoritative ride state management utilities.

use std::collections::BTreeMap;

use track_design_core::{ObjectReference, Ride, RideId, RideType};

/// Registry that stores rides and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct RideRegistry {
    entries: BTreeMap<RideId, Ride>,
    next_ride_id: RideId,
}

impl RideRegistry {
    /// Creates an empty ride registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_ride_id: RideId::new(0),
        }
    }

    /// Creates a ride and returns its identifier, or `None` when identifiers are exhausted.
    pub(crate) fn create(
        &mut self,
        ride_type: RideType,
        vehicle: Option<ObjectReference>,
    ) -> Option<RideId> {
        let id = self.next_ride_id;
        let next = id.get().checked_add(1)?;
        self.next_ride_id = RideId::new(next);
        let _ = self.entries.insert(id, Ride::new(id, ride_type, vehicle));
        Some(id)
    }

    /// Ride with the given identifier.
    pub(crate) fn get(&self, id: RideId) -> Option<&Ride> {
        self.entries.get(&id)
    }

    /// Mutable access to a ride.
    pub(crate) fn get_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.entries.get_mut(&id)
    }

    /// Removes a ride, returning its last state.
    pub(crate) fn remove(&mut self, id: RideId) -> Option<Ride> {
        self.entries.remove(&id)
    }

    /// Rides in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Ride> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = RideRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_ride_id.get(), 0);
    }

    #[test]
    fn identifiers_are_not_reused_after_removal() {
        let mut registry = RideRegistry::new();
        let first = registry.create(RideType::Maze, None).expect("first ride");
        assert!(registry.remove(first).is_some());
        let second = registry.create(RideType::Maze, None).expect("second ride");

        assert_ne!(first, second);
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn created_ride_preserves_constructor_fields() {
        let mut registry = RideRegistry::new();
        let vehicle = ObjectReference::new("rct2.ride.steel_train");
        let id = registry
            .create(RideType::SteelCoaster, Some(vehicle.clone()))
            .expect("ride");
        let ride = registry.get(id).expect("stored");

        assert_eq!(ride.id, id);
        assert_eq!(ride.ride_type, RideType::SteelCoaster);
        assert_eq!(ride.vehicle, Some(vehicle));
    }
}
