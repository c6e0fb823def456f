use std::sync::Arc;

use carhub_infra::{CarRepository, InMemoryCarRepository, PostgresCarRepository, StorageBackend};

/// Shared handler state: the repository adapter chosen at startup.
#[derive(Clone)]
pub struct AppServices {
    cars: Arc<dyn CarRepository>,
}

impl AppServices {
    pub fn new(cars: Arc<dyn CarRepository>) -> Self {
        Self { cars }
    }

    /// Services backed by a fresh in-memory repository (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCarRepository::new()))
    }

    pub fn cars(&self) -> &dyn CarRepository {
        self.cars.as_ref()
    }
}

pub async fn build_services(storage: &StorageBackend) -> anyhow::Result<AppServices> {
    match storage {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory car repository");
            Ok(AppServices::in_memory())
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let repo = PostgresCarRepository::connect(database_url, *max_connections).await?;
            repo.ensure_schema().await?;
            tracing::info!(max_connections, "using postgres car repository");
            Ok(AppServices::new(Arc::new(repo)))
        }
    }
}
