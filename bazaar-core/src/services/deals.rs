use std::sync::Arc;

use crate::db::DealRepository;
use crate::error::Result;
use crate::models::{Advert, Deal};

pub struct DealsService {
    repo: Arc<dyn DealRepository>,
}

impl DealsService {
    pub fn new(repo: Arc<dyn DealRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_deal(&self, customer_id: i64, advert_id: i64) -> Result<Deal> {
        Ok(self.repo.create_deal(customer_id, advert_id).await?)
    }

    pub async fn get_deals_by_user(&self, customer_id: i64) -> Result<Vec<Advert>> {
        Ok(self.repo.get_deals_by_user(customer_id).await?)
    }

    pub async fn is_in_deals(&self, customer_id: i64, advert_id: i64) -> Result<bool> {
        Ok(self.repo.is_in_deals(customer_id, advert_id).await?)
    }
}
