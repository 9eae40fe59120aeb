//! Advert service
//!
//! Adds the rules the repository must not know about: ownership on delete,
//! input checks on search and date ranges, and the viewer flag policy for
//! feeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::AdvertRepository;
use crate::error::{Result, ServiceError};
use crate::models::{viewer_id, Advert, AdvertWithCategoryDto, NewAdvert, ValidationError, Viewer};

pub struct AdvertService {
    repo: Arc<dyn AdvertRepository>,
}

impl AdvertService {
    pub fn new(repo: Arc<dyn AdvertRepository>) -> Self {
        Self { repo }
    }

    /// Publish a listing. A constraint rejection (unknown category or seller)
    /// becomes `Conflict`.
    pub async fn create_advert(&self, advert: NewAdvert) -> Result<Advert> {
        self.repo.create(&advert).await?.ok_or_else(|| {
            ServiceError::Conflict(format!(
                "advert rejected for seller {} in category {}",
                advert.id_seller, advert.id_category
            ))
        })
    }

    pub async fn get_advert(&self, advert_id: i64) -> Result<Option<Advert>> {
        Ok(self.repo.get_by_id(advert_id).await?)
    }

    pub async fn get_all_adverts(&self) -> Result<Vec<Advert>> {
        Ok(self.repo.get_all().await?)
    }

    pub async fn get_adverts_by_user(&self, user_id: i64) -> Result<Vec<Advert>> {
        Ok(self.repo.get_by_seller(user_id).await?)
    }

    /// Whether `user_id` is the seller of `advert_id`.
    pub async fn is_created(&self, user_id: i64, advert_id: i64) -> Result<bool> {
        Ok(self.repo.is_owned_by(user_id, advert_id).await?)
    }

    /// Keyword search. A blank keyword matches nothing and skips the query.
    /// Other keywords are passed through as given, surrounding spaces included.
    pub async fn search_adverts(&self, keyword: &str) -> Result<Vec<Advert>> {
        if keyword.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.repo.search(keyword).await?)
    }

    pub async fn filter_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Advert>> {
        if start > end {
            return Err(ValidationError::OutOfRange {
                field: "date range",
                reason: "start must not be after end",
            }
            .into());
        }
        Ok(self.repo.filter_by_date_range(start, end).await?)
    }

    pub async fn get_adverts_by_category(&self, category_id: i64) -> Result<Vec<Advert>> {
        Ok(self.repo.get_by_category(category_id).await?)
    }

    /// Delete a listing on behalf of `user_id`.
    ///
    /// Absent adverts are `NotFound`; adverts owned by someone else are
    /// `PermissionDenied`. The repository filters by seller as well.
    pub async fn delete_advert(&self, advert_id: i64, user_id: i64) -> Result<()> {
        let advert = self
            .repo
            .get_by_id(advert_id)
            .await?
            .ok_or(ServiceError::NotFound {
                resource: "advert",
                id: advert_id,
            })?;

        if advert.id_seller != user_id {
            tracing::warn!(advert_id, user_id, seller_id = advert.id_seller, "delete by non-owner refused");
            return Err(ServiceError::PermissionDenied {
                reason: format!("user {user_id} does not own advert {advert_id}"),
            });
        }

        self.repo.delete(advert_id, user_id).await?;
        tracing::info!(advert_id, user_id, "advert deleted");
        Ok(())
    }

    /// Feed relative to `viewer`. Anonymous feeds never carry flags.
    pub async fn get_feed(&self, viewer: Option<&Viewer>) -> Result<Vec<AdvertWithCategoryDto>> {
        let mut rows = self.repo.get_feed(viewer_id(viewer)).await?;
        if viewer.is_none() {
            rows.iter_mut().for_each(AdvertWithCategoryDto::clear_viewer_flags);
        }
        Ok(rows)
    }

    /// Category feed; `is_created` is derived here from the known viewer.
    pub async fn get_feed_by_category(
        &self,
        category_id: i64,
        viewer: Option<&Viewer>,
    ) -> Result<Vec<AdvertWithCategoryDto>> {
        let mut rows = self
            .repo
            .get_feed_by_category(category_id, viewer_id(viewer))
            .await?;

        match viewer {
            Some(viewer) => rows.iter_mut().for_each(|row| row.mark_created_for(viewer.id)),
            None => rows.iter_mut().for_each(AdvertWithCategoryDto::clear_viewer_flags),
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryStore;
    use chrono::Duration;

    fn service(store: &Arc<MemoryStore>) -> AdvertService {
        AdvertService::new(store.clone())
    }

    fn viewer(id: i64) -> Viewer {
        Viewer::new(id, format!("user{id}@example.com"), "authorized_user")
    }

    #[tokio::test]
    async fn create_returns_stored_active_advert() {
        let store = MemoryStore::with_category(1, "Home");
        let adverts = service(&store);

        let advert = adverts
            .create_advert(NewAdvert::new("Lamp", "", 1, 500, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(advert.status, 1);
        assert_eq!(advert.price, 500);

        let fetched = adverts.get_advert(advert.id).await.unwrap().unwrap();
        assert_eq!(fetched, advert);
    }

    #[tokio::test]
    async fn create_in_unknown_category_is_conflict() {
        let store = MemoryStore::with_category(1, "Home");
        let err = service(&store)
            .create_advert(NewAdvert::new("Lamp", "", 99, 500, 1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_distinguishes_missing_from_foreign() {
        let store = MemoryStore::with_category(1, "Home");
        let adverts = service(&store);
        let lamp = store.seed_advert("Lamp", 1, 1);

        let err = adverts.delete_advert(lamp + 100, 1).await.unwrap_err();
        assert!(err.is_not_found());

        let err = adverts.delete_advert(lamp, 2).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(adverts.get_advert(lamp).await.unwrap().is_some());

        adverts.delete_advert(lamp, 1).await.unwrap();
        assert!(adverts.get_advert(lamp).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_search_skips_repository() {
        let store = MemoryStore::with_category(1, "Home");
        store.seed_advert("Lamp", 1, 1);
        let adverts = service(&store);

        assert!(adverts.search_adverts("   ").await.unwrap().is_empty());
        assert_eq!(store.search_calls(), 0);

        let found = adverts.search_adverts("Lam").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(store.search_calls(), 1);
    }

    #[tokio::test]
    async fn search_keeps_surrounding_spaces() {
        let store = MemoryStore::with_category(1, "Home");
        let spaced = store.seed_advert("Desk lamp", 1, 1);
        store.seed_advert("Desklamp", 1, 1);
        let adverts = service(&store);

        let found = adverts.search_adverts("Desk ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, spaced);
    }

    #[tokio::test]
    async fn inverted_date_range_is_rejected() {
        let store = MemoryStore::with_category(1, "Home");
        let now = Utc::now();
        let err = service(&store)
            .filter_by_date_range(now, now - Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn anonymous_feed_has_no_flags() {
        let store = MemoryStore::with_category(1, "Home");
        let lamp = store.seed_advert("Lamp", 1, 1);
        store.seed_like(1, lamp);
        // A misbehaving repository must not leak flags to anonymous viewers
        store.leak_flags(true);

        let rows = service(&store).get_feed(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| !r.is_favorite && !r.is_bought && !r.is_created));
    }

    #[tokio::test]
    async fn viewer_feed_marks_own_and_liked_rows() {
        let store = MemoryStore::with_category(1, "Home");
        let own = store.seed_advert("Lamp", 1, 7);
        let other = store.seed_advert("Chair", 1, 8);
        store.seed_like(7, other);

        let rows = service(&store).get_feed(Some(&viewer(7))).await.unwrap();
        let own_row = rows.iter().find(|r| r.id == own).unwrap();
        let other_row = rows.iter().find(|r| r.id == other).unwrap();
        assert!(own_row.is_created && !own_row.is_favorite);
        assert!(!other_row.is_created && other_row.is_favorite);
        assert_eq!(other_row.category_name.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn category_feed_derives_created_flag() {
        let store = MemoryStore::with_category(1, "Home");
        store.add_category(2, "Garden");
        let own = store.seed_advert("Lamp", 1, 7);
        store.seed_advert("Rake", 2, 7);
        store.seed_advert("Chair", 1, 8);

        let rows = service(&store)
            .get_feed_by_category(1, Some(&viewer(7)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.is_created, row.id == own);
        }
    }
}
