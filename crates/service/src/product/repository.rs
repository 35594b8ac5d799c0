use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Business fields of a product record; the owner is supplied separately
/// and never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub barcode: i64,
    pub quantity: i32,
}

/// Repository abstraction for product persistence. Every lookup scopes to
/// the given owner; there is no cross-owner visibility.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_owner_and_barcode(
        &self,
        owner_id: Uuid,
        barcode: i64,
    ) -> Result<Option<models::product::Model>, ServiceError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::product::Model>, ServiceError>;
    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::product::Model>, ServiceError>;
    async fn insert(
        &self,
        owner_id: Uuid,
        fields: &ProductFields,
    ) -> Result<models::product::Model, ServiceError>;
    async fn update_by_id(
        &self,
        id: Uuid,
        fields: &ProductFields,
    ) -> Result<models::product::Model, ServiceError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_by_owner_and_barcode(
        &self,
        owner_id: Uuid,
        barcode: i64,
    ) -> Result<Option<models::product::Model>, ServiceError> {
        crate::db::product_service::find_by_owner_and_barcode(&self.db, owner_id, barcode).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::product::Model>, ServiceError> {
        crate::db::product_service::list_by_owner(&self.db, owner_id).await
    }

    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::product::Model>, ServiceError> {
        crate::db::product_service::find_by_id_for_owner(&self.db, id, owner_id).await
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        fields: &ProductFields,
    ) -> Result<models::product::Model, ServiceError> {
        crate::db::product_service::insert_product(&self.db, owner_id, fields).await
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        fields: &ProductFields,
    ) -> Result<models::product::Model, ServiceError> {
        crate::db::product_service::update_product(&self.db, id, fields).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::product_service::delete_product(&self.db, id).await
    }
}

/// Simple in-memory mock repository for tests and doc examples. It enforces
/// the same composite (owner, barcode) uniqueness the database index does.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockProductRepository {
        rows: Mutex<HashMap<Uuid, models::product::Model>>,
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn find_by_owner_and_barcode(
            &self,
            owner_id: Uuid,
            barcode: i64,
        ) -> Result<Option<models::product::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .find(|p| p.user_id == owner_id && p.barcode == barcode)
                .cloned())
        }

        async fn list_by_owner(
            &self,
            owner_id: Uuid,
        ) -> Result<Vec<models::product::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.values().filter(|p| p.user_id == owner_id).cloned().collect())
        }

        async fn find_by_id_for_owner(
            &self,
            id: Uuid,
            owner_id: Uuid,
        ) -> Result<Option<models::product::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(&id).filter(|p| p.user_id == owner_id).cloned())
        }

        async fn insert(
            &self,
            owner_id: Uuid,
            fields: &ProductFields,
        ) -> Result<models::product::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .values()
                .any(|p| p.user_id == owner_id && p.barcode == fields.barcode)
            {
                return Err(ServiceError::Conflict("duplicate barcode for owner".into()));
            }
            let row = models::product::Model {
                id: Uuid::new_v4(),
                user_id: owner_id,
                name: fields.name.clone(),
                price: fields.price,
                barcode: fields.barcode,
                quantity: fields.quantity,
                created_at: Utc::now().into(),
            };
            rows.insert(row.id, row.clone());
            Ok(row)
        }

        async fn update_by_id(
            &self,
            id: Uuid,
            fields: &ProductFields,
        ) -> Result<models::product::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let owner_id = rows
                .get(&id)
                .map(|p| p.user_id)
                .ok_or_else(|| ServiceError::not_found("product"))?;
            if rows
                .values()
                .any(|p| p.id != id && p.user_id == owner_id && p.barcode == fields.barcode)
            {
                return Err(ServiceError::Conflict("duplicate barcode for owner".into()));
            }
            let row = rows.get_mut(&id).expect("checked above");
            row.name = fields.name.clone();
            row.price = fields.price;
            row.barcode = fields.barcode;
            row.quantity = fields.quantity;
            Ok(row.clone())
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.remove(&id).is_some())
        }
    }
}
