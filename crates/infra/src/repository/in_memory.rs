use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use carhub_core::{Car, CarId};

use super::r#trait::{CarRepository, RepositoryError, RepositoryResult};

/// In-memory car repository for tests/dev.
///
/// Records live in a `BTreeMap` keyed by id, so listings come back in
/// ascending id order like the Postgres adapter.
#[derive(Debug, Default)]
pub struct InMemoryCarRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<CarId, Car>,
    /// Last identifier handed out; survives deletes so ids are never reused.
    last_id: i64,
}

impl Inner {
    fn insert_new(&mut self, car: Car) -> Car {
        self.last_id += 1;
        let id = CarId::new(self.last_id);
        let stored = car.with_id(id);
        self.rows.insert(id, stored.clone());
        stored
    }
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Car>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CarId) -> RepositoryResult<Option<Car>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_by_doors(&self, doors: i32) -> RepositoryResult<Vec<Car>> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|c| c.has_doors(doors))
            .cloned()
            .collect())
    }

    async fn save(&self, car: Car) -> RepositoryResult<Car> {
        let mut inner = self.write()?;
        match car.id {
            Some(id) if inner.rows.contains_key(&id) => {
                inner.rows.insert(id, car.clone());
                Ok(car)
            }
            Some(id) => {
                tracing::debug!(%id, "save with unknown id; inserting as new record");
                Ok(inner.insert_new(Car { id: None, ..car }))
            }
            None => Ok(inner.insert_new(car)),
        }
    }

    async fn delete_by_id(&self, id: CarId) -> RepositoryResult<()> {
        self.write()?.rows.remove(&id);
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<()> {
        self.write()?.rows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn car(manufacturer: &str, doors: i32) -> Car {
        Car {
            manufacturer: Some(manufacturer.to_string()),
            ..Car::with_doors(doors)
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = InMemoryCarRepository::new();

        let a = repo.save(car("Seat", 3)).await.unwrap();
        let b = repo.save(car("Opel", 5)).await.unwrap();

        assert_eq!(a.id, Some(CarId::new(1)));
        assert_eq!(b.id, Some(CarId::new(2)));
        assert_eq!(repo.find_by_id(CarId::new(2)).await.unwrap(), Some(b));
        assert_eq!(repo.find_by_id(CarId::new(99)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryCarRepository::new();
        repo.save(car("Seat", 3)).await.unwrap();
        repo.delete_all().await.unwrap();

        let next = repo.save(car("Seat", 3)).await.unwrap();
        assert_eq!(next.id, Some(CarId::new(2)));
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_whole_record() {
        let repo = InMemoryCarRepository::new();
        let stored = repo
            .save(Car {
                model: Some("Ibiza".to_string()),
                color: Some("red".to_string()),
                ..car("Seat", 3)
            })
            .await
            .unwrap();
        let id = stored.id.unwrap();

        let replacement = Car::with_doors(5).with_id(id);
        let saved = repo.save(replacement.clone()).await.unwrap();
        assert_eq!(saved, replacement);

        let reloaded = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.manufacturer, None);
        assert_eq!(reloaded.model, None);
        assert_eq!(reloaded.color, None);
        assert_eq!(reloaded.doors, Some(5));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_with_unknown_id_inserts_new_record() {
        let repo = InMemoryCarRepository::new();
        repo.save(car("Seat", 3)).await.unwrap();

        let saved = repo
            .save(car("Opel", 5).with_id(CarId::new(500)))
            .await
            .unwrap();

        assert_eq!(saved.id, Some(CarId::new(2)));
        assert_eq!(repo.find_by_id(CarId::new(500)).await.unwrap(), None);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_noop() {
        let repo = InMemoryCarRepository::new();
        repo.save(car("Seat", 3)).await.unwrap();

        repo.delete_by_id(CarId::new(42)).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn doors_scenario() {
        let repo = InMemoryCarRepository::new();
        let two = repo.save(Car::with_doors(2)).await.unwrap();
        let four = repo.save(Car::with_doors(4)).await.unwrap();
        assert_eq!(two.id, Some(CarId::new(1)));
        assert_eq!(four.id, Some(CarId::new(2)));

        assert_eq!(repo.find_by_doors(4).await.unwrap(), vec![four.clone()]);
        assert!(repo.find_by_doors(7).await.unwrap().is_empty());

        repo.delete_by_id(CarId::new(1)).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap(), vec![four]);
        assert!(repo.find_by_id(CarId::new(1)).await.unwrap().is_none());

        repo.delete_all().await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn poisoned_lock_surfaces_as_unavailable() {
        let repo = std::sync::Arc::new(InMemoryCarRepository::new());
        repo.save(car("Seat", 3)).await.unwrap();

        let poisoner = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(
            repo.find_all().await,
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(matches!(
            repo.save(car("Opel", 5)).await,
            Err(RepositoryError::Unavailable(_))
        ));
    }

    proptest! {
        #[test]
        fn find_by_doors_returns_exactly_matching_cars(
            doors in proptest::collection::vec(proptest::option::of(0i32..6), 0..30),
            wanted in 0i32..6,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let repo = InMemoryCarRepository::new();
                for d in &doors {
                    repo.save(Car { doors: *d, ..Car::default() }).await.unwrap();
                }

                let found = repo.find_by_doors(wanted).await.unwrap();
                let expected = doors.iter().filter(|d| **d == Some(wanted)).count();

                prop_assert_eq!(found.len(), expected);
                prop_assert!(found.iter().all(|c| c.doors == Some(wanted)));
                Ok(())
            })?;
        }
    }
}
