use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{City, PointOfInterest, SAMPLE_CITIES};
use crate::repository::{CityInfoRepository, RepoError};
use crate::AppState;

struct StoreData {
    cities: Vec<City>,
    next_point_of_interest_id: i32,
}

/// The transient demo store. Explicitly constructed at startup, injected
/// through `AppState`, re-seeded with the sample cities on every process
/// start and gone on shutdown. Its id space has nothing to do with the
/// durable store's.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    /// An empty store. Mostly useful in tests.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreData {
                cities: Vec::new(),
                next_point_of_interest_id: 1,
            })),
        }
    }

    /// A store holding the sample cities.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut data = store.data();
            for (index, seed) in SAMPLE_CITIES.iter().enumerate() {
                let city_id = index as i32 + 1;
                let points_of_interest = seed
                    .points_of_interest
                    .iter()
                    .map(|poi| {
                        let id = data.next_point_of_interest_id;
                        data.next_point_of_interest_id += 1;
                        PointOfInterest {
                            id,
                            name: poi.name.to_string(),
                            description: Some(poi.description.to_string()),
                            city_id,
                        }
                    })
                    .collect();
                data.cities.push(City {
                    id: city_id,
                    name: seed.name.to_string(),
                    description: Some(seed.description.to_string()),
                    points_of_interest,
                });
            }
        }
        store
    }

    // A panic while the lock was held leaves the data intact, just flagged;
    // carry on with it rather than panicking every later request.
    fn data(&self) -> MutexGuard<'_, StoreData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

enum Staged {
    Add(PointOfInterest),
    Update(PointOfInterest),
    Delete(PointOfInterest),
}

/// Repository over the shared [`MemoryStore`]. Mirrors the database
/// repository's staging discipline: nothing touches the store until
/// [`save`], which applies every staged change under one lock.
///
/// [`save`]: CityInfoRepository::save
pub struct MemoryRepository {
    store: MemoryStore,
    staged: Vec<Staged>,
}

impl MemoryRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }
}

#[async_trait]
impl CityInfoRepository for MemoryRepository {
    const BASE_PATH: &'static str = "/api/demo/cities";

    fn from_state(state: &AppState) -> Self {
        Self::new(state.memory.clone())
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, RepoError> {
        Ok(self.store.data().cities.iter().any(|c| c.id == city_id))
    }

    async fn cities(&self) -> Result<Vec<City>, RepoError> {
        let data = self.store.data();
        let mut cities: Vec<City> = data
            .cities
            .iter()
            .map(|c| City {
                points_of_interest: Vec::new(),
                ..c.clone()
            })
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn city(
        &self,
        city_id: i32,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, RepoError> {
        let data = self.store.data();
        Ok(data.cities.iter().find(|c| c.id == city_id).map(|c| {
            if include_points_of_interest {
                c.clone()
            } else {
                City {
                    points_of_interest: Vec::new(),
                    ..c.clone()
                }
            }
        }))
    }

    async fn points_of_interest_for_city(
        &self,
        city_id: i32,
    ) -> Result<Vec<PointOfInterest>, RepoError> {
        let data = self.store.data();
        Ok(data
            .cities
            .iter()
            .find(|c| c.id == city_id)
            .map(|c| c.points_of_interest.clone())
            .unwrap_or_default())
    }

    async fn point_of_interest_for_city(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, RepoError> {
        let data = self.store.data();
        Ok(data
            .cities
            .iter()
            .find(|c| c.id == city_id)
            .and_then(|c| {
                c.points_of_interest
                    .iter()
                    .find(|p| p.id == point_of_interest_id)
            })
            .cloned())
    }

    fn add_point_of_interest_for_city(&mut self, city_id: i32, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Add(PointOfInterest {
            city_id,
            ..point_of_interest
        }));
    }

    fn update_point_of_interest(&mut self, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Update(point_of_interest));
    }

    fn delete_point_of_interest(&mut self, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Delete(point_of_interest));
    }

    async fn save(&mut self) -> Option<Vec<PointOfInterest>> {
        let staged = std::mem::take(&mut self.staged);
        let mut data = self.store.data();
        let mut created = Vec::new();

        for change in staged {
            match change {
                Staged::Add(mut poi) => {
                    // Counter-based issuance: ids stay strictly increasing
                    // even after the highest-numbered entry is deleted.
                    poi.id = data.next_point_of_interest_id;
                    data.next_point_of_interest_id += 1;
                    if let Some(city) = data.cities.iter_mut().find(|c| c.id == poi.city_id) {
                        city.points_of_interest.push(poi.clone());
                        created.push(poi);
                    }
                }
                Staged::Update(poi) => {
                    if let Some(city) = data.cities.iter_mut().find(|c| c.id == poi.city_id) {
                        if let Some(existing) = city
                            .points_of_interest
                            .iter_mut()
                            .find(|p| p.id == poi.id)
                        {
                            existing.name = poi.name;
                            existing.description = poi.description;
                        }
                    }
                }
                Staged::Delete(poi) => {
                    if let Some(city) = data.cities.iter_mut().find(|c| c.id == poi.city_id) {
                        city.points_of_interest.retain(|p| p.id != poi.id);
                    }
                }
            }
        }

        Some(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MemoryRepository {
        MemoryRepository::new(MemoryStore::seeded())
    }

    fn draft(name: &str) -> PointOfInterest {
        PointOfInterest {
            id: 0,
            name: name.to_string(),
            description: None,
            city_id: 0,
        }
    }

    #[tokio::test]
    async fn test_seeded_store_has_three_cities() {
        let repo = repo();
        let cities = repo.cities().await.unwrap();
        assert_eq!(cities.len(), 3);
        // Ordered by name.
        assert_eq!(cities[0].name, "Antwerp");
    }

    #[tokio::test]
    async fn test_listing_never_populates_children() {
        let repo = repo();
        for city in repo.cities().await.unwrap() {
            assert!(city.points_of_interest.is_empty());
        }
        let city = repo.city(1, false).await.unwrap().unwrap();
        assert!(city.points_of_interest.is_empty());
    }

    #[tokio::test]
    async fn test_include_children_populates_them() {
        let repo = repo();
        let city = repo.city(1, true).await.unwrap().unwrap();
        assert_eq!(city.points_of_interest.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_by_city() {
        let repo = repo();
        let poi = repo.point_of_interest_for_city(1, 1).await.unwrap();
        assert!(poi.is_some());
        // Id 1 belongs to city 1; under city 2 it must be absent.
        let poi = repo.point_of_interest_for_city(2, 1).await.unwrap();
        assert!(poi.is_none());
    }

    #[tokio::test]
    async fn test_ids_issue_monotonically_across_deletes() {
        let mut repo = repo();
        repo.add_point_of_interest_for_city(1, draft("First"));
        let first = repo.save().await.unwrap().remove(0);

        repo.delete_point_of_interest(first.clone());
        repo.save().await.unwrap();

        repo.add_point_of_interest_for_city(1, draft("Second"));
        let second = repo.save().await.unwrap().remove(0);

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_staged_changes_invisible_before_save() {
        let mut repo = repo();
        repo.add_point_of_interest_for_city(1, draft("Staged"));
        assert_eq!(repo.points_of_interest_for_city(1).await.unwrap().len(), 2);

        repo.save().await.unwrap();
        assert_eq!(repo.points_of_interest_for_city(1).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_from_owning_collection() {
        let mut repo = repo();
        let poi = repo
            .point_of_interest_for_city(1, 1)
            .await
            .unwrap()
            .unwrap();
        repo.delete_point_of_interest(poi);
        repo.save().await.unwrap();

        assert!(repo.point_of_interest_for_city(1, 1).await.unwrap().is_none());
        assert_eq!(repo.points_of_interest_for_city(1).await.unwrap().len(), 1);
        let city = repo.city(1, true).await.unwrap().unwrap();
        assert_eq!(city.points_of_interest.len(), 1);
    }

    #[tokio::test]
    async fn test_update_changes_fields_in_place() {
        let mut repo = repo();
        let mut poi = repo
            .point_of_interest_for_city(1, 1)
            .await
            .unwrap()
            .unwrap();
        poi.name = "Sheep Meadow".to_string();
        poi.description = None;
        repo.update_point_of_interest(poi);
        repo.save().await.unwrap();

        let reloaded = repo
            .point_of_interest_for_city(1, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.name, "Sheep Meadow");
        assert_eq!(reloaded.description, None);
    }

    #[tokio::test]
    async fn test_poisoned_store_keeps_serving() {
        let store = MemoryStore::seeded();
        let inner = store.inner.clone();
        std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join()
        .unwrap_err();

        let mut repo = MemoryRepository::new(store);
        assert!(repo.city_exists(1).await.unwrap());

        repo.add_point_of_interest_for_city(1, draft("After poison"));
        assert!(repo.save().await.is_some());
    }

    #[tokio::test]
    async fn test_two_stores_are_independent_universes() {
        let a = MemoryRepository::new(MemoryStore::seeded());
        let mut b = MemoryRepository::new(MemoryStore::seeded());

        let poi = b.point_of_interest_for_city(1, 1).await.unwrap().unwrap();
        b.delete_point_of_interest(poi);
        b.save().await.unwrap();

        assert!(a.point_of_interest_for_city(1, 1).await.unwrap().is_some());
    }
}
