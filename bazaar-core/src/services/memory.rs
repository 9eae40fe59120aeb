//! In-memory repository double for service tests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::db::{
    AdvertRepository, CategoryRepository, DbError, DealRepository, LikedRepository, UserRepository,
};
use crate::models::{
    Advert, AdvertWithCategoryDto, Category, Deal, Liked, NewAdvert, NewUser, User,
    CATEGORY_NOT_FOUND, DEAL_PENDING, DEFAULT_DEAL_ADDRESS, STATUS_ACTIVE,
};

#[derive(Default)]
struct State {
    next_id: i64,
    categories: BTreeMap<i64, String>,
    adverts: Vec<Advert>,
    likes: Vec<Liked>,
    deals: Vec<Deal>,
    users: Vec<User>,
    search_calls: usize,
    leak_flags: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so newest-first ordering is stable.
    fn stamp(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + self.next_id, 0).unwrap()
    }

    fn newest_first(mut adverts: Vec<Advert>) -> Vec<Advert> {
        adverts.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        adverts
    }

    fn feed_row(&self, advert: &Advert, viewer_id: Option<i64>, with_created: bool) -> AdvertWithCategoryDto {
        let mut row = AdvertWithCategoryDto::from_advert(advert.clone());
        row.category_name = self.categories.get(&advert.id_category).cloned();
        row.seller_name = self
            .users
            .iter()
            .find(|u| u.id == advert.id_seller)
            .map(|u| u.fio.clone());

        if self.leak_flags {
            row.is_favorite = true;
            row.is_bought = true;
            row.is_created = true;
        } else if let Some(viewer) = viewer_id {
            row.is_favorite = self.likes.iter().any(|l| l.id_customer == viewer && l.id_advert == advert.id);
            row.is_bought = self.deals.iter().any(|d| d.id_customer == viewer && d.id_advert == advert.id);
            row.is_created = with_created && advert.id_seller == viewer;
        }
        row
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_category(id: i64, name: &str) -> Arc<Self> {
        let store = Self::new();
        store.add_category(id, name);
        store
    }

    pub fn add_category(&self, id: i64, name: &str) {
        self.state.lock().unwrap().categories.insert(id, name.to_string());
    }

    /// Insert an advert directly and return its id.
    pub fn seed_advert(&self, content: &str, id_category: i64, id_seller: i64) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let date_created = state.stamp();
        state.adverts.push(Advert {
            id,
            content: content.to_string(),
            description: String::new(),
            id_category,
            price: 100,
            status: STATUS_ACTIVE,
            id_seller,
            date_created,
        });
        id
    }

    pub fn seed_like(&self, id_customer: i64, id_advert: i64) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let date_created = state.stamp();
        state.likes.push(Liked {
            id,
            id_customer,
            id_advert,
            date_created,
        });
    }

    /// Make feed queries return every flag set, regardless of viewer.
    pub fn leak_flags(&self, leak: bool) {
        self.state.lock().unwrap().leak_flags = leak;
    }

    pub fn search_calls(&self) -> usize {
        self.state.lock().unwrap().search_calls
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }
}

#[async_trait]
impl AdvertRepository for MemoryStore {
    async fn create(&self, advert: &NewAdvert) -> Result<Option<Advert>, DbError> {
        let mut state = self.state.lock().unwrap();
        if !state.categories.contains_key(&advert.id_category) {
            return Ok(None);
        }
        let id = state.next_id();
        let row = Advert {
            id,
            content: advert.content.clone(),
            description: advert.description.clone(),
            id_category: advert.id_category,
            price: advert.price,
            status: advert.status,
            id_seller: advert.id_seller,
            date_created: state.stamp(),
        };
        state.adverts.push(row.clone());
        Ok(Some(row))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.adverts.iter().find(|a| a.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(state.adverts.clone()))
    }

    async fn get_by_seller(&self, seller_id: i64) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(
            state.adverts.iter().filter(|a| a.id_seller == seller_id).cloned().collect(),
        ))
    }

    async fn is_owned_by(&self, seller_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.adverts.iter().any(|a| a.id == advert_id && a.id_seller == seller_id))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Advert>, DbError> {
        let mut state = self.state.lock().unwrap();
        state.search_calls += 1;
        let found = state
            .adverts
            .iter()
            .filter(|a| a.content.contains(keyword) || a.description.contains(keyword))
            .cloned()
            .collect();
        Ok(State::newest_first(found))
    }

    async fn filter_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(
            state
                .adverts
                .iter()
                .filter(|a| a.date_created >= start && a.date_created <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn get_by_category(&self, category_id: i64) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(
            state.adverts.iter().filter(|a| a.id_category == category_id).cloned().collect(),
        ))
    }

    async fn delete(&self, advert_id: i64, seller_id: i64) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state.adverts.retain(|a| !(a.id == advert_id && a.id_seller == seller_id));
        Ok(())
    }

    async fn get_feed(&self, viewer_id: Option<i64>) -> Result<Vec<AdvertWithCategoryDto>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(state.adverts.clone())
            .iter()
            .map(|a| state.feed_row(a, viewer_id, true))
            .collect())
    }

    async fn get_feed_by_category(
        &self,
        category_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Vec<AdvertWithCategoryDto>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(State::newest_first(state.adverts.clone())
            .iter()
            .filter(|a| a.id_category == category_id)
            .map(|a| state.feed_row(a, viewer_id, false))
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Category>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn get_name_by_id(&self, id: i64) -> Result<String, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .get(&id)
            .cloned()
            .unwrap_or_else(|| CATEGORY_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl DealRepository for MemoryStore {
    async fn create_deal(&self, customer_id: i64, advert_id: i64) -> Result<Deal, DbError> {
        let mut state = self.state.lock().unwrap();
        if state
            .deals
            .iter()
            .any(|d| d.id_customer == customer_id && d.id_advert == advert_id)
        {
            return Err(DbError::Sqlx(sqlx::Error::Protocol("duplicate deal".into())));
        }
        let id = state.next_id();
        let deal = Deal {
            id,
            id_advert: advert_id,
            id_customer: customer_id,
            date_created: state.stamp(),
            status: DEAL_PENDING,
            address: DEFAULT_DEAL_ADDRESS.to_string(),
        };
        state.deals.push(deal.clone());
        Ok(deal)
    }

    async fn get_deals_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        let bought = state
            .deals
            .iter()
            .filter(|d| d.id_customer == customer_id)
            .filter_map(|d| state.adverts.iter().find(|a| a.id == d.id_advert).cloned())
            .collect();
        Ok(bought)
    }

    async fn is_in_deals(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deals
            .iter()
            .any(|d| d.id_customer == customer_id && d.id_advert == advert_id))
    }
}

#[async_trait]
impl LikedRepository for MemoryStore {
    async fn add_to_liked(&self, customer_id: i64, advert_id: i64) -> Result<Option<Liked>, DbError> {
        let mut state = self.state.lock().unwrap();
        if state
            .likes
            .iter()
            .any(|l| l.id_customer == customer_id && l.id_advert == advert_id)
        {
            return Ok(None);
        }
        let id = state.next_id();
        let liked = Liked {
            id,
            id_customer: customer_id,
            id_advert: advert_id,
            date_created: state.stamp(),
        };
        state.likes.push(liked.clone());
        Ok(Some(liked))
    }

    async fn remove_from_liked(&self, customer_id: i64, advert_id: i64) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        state
            .likes
            .retain(|l| !(l.id_customer == customer_id && l.id_advert == advert_id));
        Ok(())
    }

    async fn get_liked_by_user(&self, customer_id: i64) -> Result<Vec<Advert>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .likes
            .iter()
            .filter(|l| l.id_customer == customer_id)
            .filter_map(|l| state.adverts.iter().find(|a| a.id == l.id_advert).cloned())
            .collect())
    }

    async fn is_liked(&self, customer_id: i64, advert_id: i64) -> Result<bool, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .likes
            .iter()
            .any(|l| l.id_customer == customer_id && l.id_advert == advert_id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<Option<User>, DbError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let id = state.next_id();
        let row = User {
            id,
            nickname: user.nickname.clone(),
            fio: user.fio.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            password: user.password_hash.clone(),
            rating: Some(user.rating),
        };
        state.users.push(row.clone());
        Ok(Some(row))
    }

    async fn delete(&self, profile_id: i64) -> Result<bool, DbError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != profile_id);
        Ok(state.users.len() < before)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<User>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == profile_id).cloned())
    }
}
