use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, info};

use crate::model::company_location::CompanyLocation;
use crate::store::{HrStore, StoreResult};

/// Active company locations, shared by every kiosk punch until the TTL lapses.
#[derive(Clone)]
pub struct LocationCache {
    inner: Cache<(), Arc<Vec<CompanyLocation>>>,
}

impl LocationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn active_locations<S>(&self, store: &S) -> StoreResult<Arc<Vec<CompanyLocation>>>
    where
        S: HrStore + ?Sized,
    {
        if let Some(hit) = self.inner.get(&()).await {
            return Ok(hit);
        }
        debug!("Location cache miss");
        self.refresh(store).await
    }

    pub async fn refresh<S>(&self, store: &S) -> StoreResult<Arc<Vec<CompanyLocation>>>
    where
        S: HrStore + ?Sized,
    {
        let fresh = Arc::new(store.active_locations().await?);
        self.inner.insert((), fresh.clone()).await;
        Ok(fresh)
    }

    pub async fn warmup<S>(&self, store: &S) -> anyhow::Result<()>
    where
        S: HrStore + ?Sized,
    {
        let locations = self.refresh(store).await?;
        info!(count = locations.len(), "Location cache warmup complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn location(id: u64, is_active: bool) -> CompanyLocation {
        CompanyLocation {
            id,
            name: format!("Site {}", id),
            latitude: 25.0,
            longitude: 121.5,
            radius_meters: 150.0,
            is_active,
        }
    }

    #[actix_web::test]
    async fn serves_cached_locations_until_refreshed() {
        let store = MemoryStore::new();
        store.add_location(location(1, true));
        store.add_location(location(2, false));

        let cache = LocationCache::new(Duration::from_secs(60));
        cache.warmup(&store).await.unwrap();
        assert_eq!(cache.active_locations(&store).await.unwrap().len(), 1);

        store.add_location(location(3, true));
        assert_eq!(cache.active_locations(&store).await.unwrap().len(), 1);

        assert_eq!(cache.refresh(&store).await.unwrap().len(), 2);
        assert_eq!(cache.active_locations(&store).await.unwrap().len(), 2);
    }
}
