//! Store domain types and the nearness filter.

use marketplace_core::{Coordinates, StoreId, UserId};

/// A store.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    /// Store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Location on the grid.
    pub coordinates: Coordinates,
    /// Managing user.
    pub manager_id: UserId,
}

/// A store together with its distance from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStore {
    pub store: Store,
    pub distance: f64,
}

/// Keep the stores strictly inside the nearby radius of `origin`, in input order.
#[must_use]
pub fn nearby_stores(origin: &Coordinates, stores: Vec<Store>) -> Vec<NearbyStore> {
    stores
        .into_iter()
        .filter_map(|store| {
            let distance = origin.distance_to(&store.coordinates);
            origin
                .is_nearby(&store.coordinates)
                .then_some(NearbyStore { store, distance })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: i32, latitude: f64, longitude: f64) -> Store {
        Store {
            id: StoreId::new(id),
            name: format!("Store {id}"),
            coordinates: Coordinates::new(latitude, longitude),
            manager_id: UserId::new(1),
        }
    }

    #[test]
    fn test_nearby_stores_strictly_inside_radius() {
        let origin = Coordinates::new(10.0, 10.0);
        let stores = vec![
            store(1, 10.0, 10.0),  // 0
            store(2, 13.0, 14.0),  // 5
            store(3, 40.0, 10.0),  // exactly 30
            store(4, 28.0, 34.0),  // exactly 30 (18, 24)
            store(5, 39.9, 10.0),  // 29.9
            store(6, 90.0, 90.0),  // far
        ];

        let ids: Vec<i32> = nearby_stores(&origin, stores)
            .iter()
            .map(|n| n.store.id.as_i32())
            .collect();

        assert_eq!(ids, vec![1, 2, 5]);
    }

    #[test]
    fn test_nearby_stores_reports_distance() {
        let origin = Coordinates::new(10.0, 10.0);
        let nearby = nearby_stores(&origin, vec![store(2, 13.0, 14.0)]);
        assert_eq!(nearby.len(), 1);
        assert!(nearby.iter().all(|n| (n.distance - 5.0).abs() < 1e-12));
    }

    #[test]
    fn test_nearby_stores_empty() {
        assert!(nearby_stores(&Coordinates::new(0.0, 0.0), Vec::new()).is_empty());
    }
}
