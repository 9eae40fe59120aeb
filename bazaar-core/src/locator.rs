//! Request-scoped composition root
//!
//! One locator per request: it opens a single session for the chosen role,
//! builds every repository on that session and every service on those
//! repositories. Dropping the locator releases the session.

use std::sync::Arc;

use crate::db::{
    AdvertRepository, CategoryRepository, DealRepository, LikedRepository, PgAdvertRepository,
    PgCategoryRepository, PgDealRepository, PgLikedRepository, PgUserRepository, Role,
    RoleRegistry, Session, UserRepository,
};
use crate::models::Viewer;
use crate::services::{AdvertService, AuthService, CategoryService, DealsService, LikedService};

/// Repository set a locator builds its services from
pub struct Repositories {
    pub adverts: Arc<dyn AdvertRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub liked: Arc<dyn LikedRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Postgres repositories sharing one session.
    pub fn postgres(session: &Arc<Session>) -> Self {
        Self {
            adverts: Arc::new(PgAdvertRepository::new(session.clone())),
            categories: Arc::new(PgCategoryRepository::new(session.clone())),
            deals: Arc::new(PgDealRepository::new(session.clone())),
            liked: Arc::new(PgLikedRepository::new(session.clone())),
            users: Arc::new(PgUserRepository::new(session.clone())),
        }
    }
}

pub struct ServiceLocator {
    session: Arc<Session>,
    adverts: AdvertService,
    categories: CategoryService,
    deals: DealsService,
    liked: LikedService,
    auth: AuthService,
}

impl ServiceLocator {
    /// Open a locator bound to `role`. No connection is taken until the
    /// first statement.
    pub fn open(registry: &RoleRegistry, role: Role) -> Self {
        let session = Arc::new(registry.session(role));
        let repositories = Repositories::postgres(&session);
        tracing::debug!(%role, "service locator opened");
        Self::from_parts(session, repositories)
    }

    /// `authorized_user` for a known viewer, `any_user` otherwise.
    pub fn for_viewer(registry: &RoleRegistry, viewer: Option<&Viewer>) -> Self {
        let role = match viewer {
            Some(_) => Role::AuthorizedUser,
            None => Role::AnyUser,
        };
        Self::open(registry, role)
    }

    /// Build over substituted repositories.
    pub fn from_parts(session: Arc<Session>, repositories: Repositories) -> Self {
        Self {
            session,
            adverts: AdvertService::new(repositories.adverts),
            categories: CategoryService::new(repositories.categories),
            deals: DealsService::new(repositories.deals),
            liked: LikedService::new(repositories.liked),
            auth: AuthService::new(repositories.users),
        }
    }

    pub fn role(&self) -> Role {
        self.session.role()
    }

    pub fn adverts(&self) -> &AdvertService {
        &self.adverts
    }

    pub fn categories(&self) -> &CategoryService {
        &self.categories
    }

    pub fn deals(&self) -> &DealsService {
        &self.deals
    }

    pub fn liked(&self) -> &LikedService {
        &self.liked
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Hand the connection back to the pool now instead of on drop.
    pub async fn close(self) {
        self.session.close().await;
        tracing::debug!(role = %self.session.role(), "service locator closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BazaarConfig;
    use crate::services::memory::MemoryStore;

    fn memory_repositories(store: &Arc<MemoryStore>) -> Repositories {
        Repositories {
            adverts: store.clone(),
            categories: store.clone(),
            deals: store.clone(),
            liked: store.clone(),
            users: store.clone(),
        }
    }

    #[tokio::test]
    async fn viewer_selects_role() {
        let registry = RoleRegistry::from_config(&BazaarConfig::default());
        let viewer = Viewer::new(1, "a@b.cd", "authorized_user");

        assert_eq!(ServiceLocator::for_viewer(&registry, None).role(), Role::AnyUser);
        assert_eq!(
            ServiceLocator::for_viewer(&registry, Some(&viewer)).role(),
            Role::AuthorizedUser
        );
        assert_eq!(ServiceLocator::open(&registry, Role::Admin).role(), Role::Admin);
    }

    #[tokio::test]
    async fn services_share_substituted_repositories() {
        let registry = RoleRegistry::from_config(&BazaarConfig::default());
        let store = MemoryStore::with_category(1, "Home");
        let session = Arc::new(registry.session(Role::AuthorizedUser));
        let locator = ServiceLocator::from_parts(session.clone(), memory_repositories(&store));

        let lamp = store.seed_advert("Lamp", 1, 5);
        locator.liked().add_to_liked(5, lamp).await.unwrap();

        let viewer = Viewer::new(5, "five@example.com", "authorized_user");
        let feed = locator.adverts().get_feed(Some(&viewer)).await.unwrap();
        assert!(feed[0].is_favorite && feed[0].is_created);

        locator.close().await;
        assert!(session.connection().await.is_err());
    }
}
