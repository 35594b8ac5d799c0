use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::product::repository::{ProductFields, ProductRepository};

/// Application service encapsulating product business rules: owner scoping
/// on every operation and per-owner barcode uniqueness.
pub struct ProductService<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a product for `owner_id`, rejecting a barcode the owner
    /// already uses.
    #[instrument(skip(self, fields), fields(owner_id = %owner_id, barcode = fields.barcode))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        fields: ProductFields,
    ) -> Result<models::product::Model, ServiceError> {
        validate(&fields)?;
        if self
            .repo
            .find_by_owner_and_barcode(owner_id, fields.barcode)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict("product is already added".into()));
        }
        let created = self.repo.insert(owner_id, &fields).await?;
        info!(product_id = %created.id, "product_created");
        Ok(created)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<models::product::Model>, ServiceError> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn get(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<models::product::Model>, ServiceError> {
        self.repo.find_by_id_for_owner(id, owner_id).await
    }

    /// Replace the business fields of an owned product. The barcode check is
    /// skipped entirely when the submitted barcode equals the record's
    /// current one, so a no-op update never self-collides.
    #[instrument(skip(self, fields), fields(owner_id = %owner_id, product_id = %id))]
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: ProductFields,
    ) -> Result<models::product::Model, ServiceError> {
        let current = self
            .repo
            .find_by_id_for_owner(id, owner_id)
            .await?
            .ok_or_else(|| ServiceError::forbidden("update this product"))?;
        validate(&fields)?;
        if fields.barcode != current.barcode
            && self
                .repo
                .find_by_owner_and_barcode(owner_id, fields.barcode)
                .await?
                .is_some()
        {
            return Err(ServiceError::Conflict(
                "product with this barcode already exists".into(),
            ));
        }
        let updated = self.repo.update_by_id(id, &fields).await?;
        info!(product_id = %updated.id, "product_updated");
        Ok(updated)
    }

    /// Delete an owned product, returning the removed record.
    #[instrument(skip(self), fields(owner_id = %owner_id, product_id = %id))]
    pub async fn delete(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<models::product::Model, ServiceError> {
        let current = self
            .repo
            .find_by_id_for_owner(id, owner_id)
            .await?
            .ok_or_else(|| ServiceError::forbidden("delete this product"))?;
        self.repo.delete_by_id(id).await?;
        info!(product_id = %current.id, "product_deleted");
        Ok(current)
    }
}

fn validate(fields: &ProductFields) -> Result<(), ServiceError> {
    models::product::validate_name(&fields.name)?;
    models::product::validate_price(fields.price)?;
    models::product::validate_quantity(fields.quantity)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::mock::MockProductRepository;

    fn svc() -> ProductService<MockProductRepository> {
        ProductService::new(Arc::new(MockProductRepository::default()))
    }

    fn pen(barcode: i64) -> ProductFields {
        ProductFields { name: "Pen".into(), price: 10.0, barcode, quantity: 5 }
    }

    #[tokio::test]
    async fn create_and_list_scoped_to_owner() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let created = svc.create(alice, pen(111_111_111_111)).await.unwrap();
        assert_eq!(created.user_id, alice);

        let mine = svc.list(alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(svc.list(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_barcode_for_same_owner_conflicts() {
        let svc = svc();
        let alice = Uuid::new_v4();
        svc.create(alice, pen(111)).await.unwrap();
        let err = svc.create(alice, pen(111)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn different_owners_may_share_a_barcode() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        svc.create(alice, pen(222)).await.unwrap();
        svc.create(bob, pen(222)).await.unwrap();
    }

    #[tokio::test]
    async fn other_owners_records_are_invisible_and_protected() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let product = svc.create(alice, pen(333)).await.unwrap();

        // Bob cannot see it
        assert!(svc.get(bob, product.id).await.unwrap().is_none());
        // Bob cannot update it
        let err = svc.update(bob, product.id, pen(334)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        // Bob cannot delete it
        let err = svc.delete(bob, product.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        // It is still there for Alice
        assert!(svc.get(alice, product.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn updating_to_own_current_barcode_never_collides() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let product = svc.create(alice, pen(444)).await.unwrap();
        svc.create(alice, pen(555)).await.unwrap();

        // Same barcode, new name: no self-collision.
        let fields = ProductFields { name: "Blue Pen".into(), ..pen(444) };
        let updated = svc.update(alice, product.id, fields).await.unwrap();
        assert_eq!(updated.name, "Blue Pen");
        assert_eq!(updated.barcode, 444);
    }

    #[tokio::test]
    async fn updating_to_another_products_barcode_conflicts() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let product = svc.create(alice, pen(666)).await.unwrap();
        svc.create(alice, pen(777)).await.unwrap();

        let err = svc.update(alice, product.id, pen(777)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let product = svc.create(alice, pen(888)).await.unwrap();

        let removed = svc.delete(alice, product.id).await.unwrap();
        assert_eq!(removed.id, product.id);
        assert!(svc.get(alice, product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_invalid_fields() {
        let svc = svc();
        let alice = Uuid::new_v4();

        let blank_name = ProductFields { name: "  ".into(), ..pen(1) };
        assert!(matches!(
            svc.create(alice, blank_name).await.unwrap_err(),
            ServiceError::Model(_)
        ));

        let negative_price = ProductFields { price: -1.0, ..pen(2) };
        assert!(matches!(
            svc.create(alice, negative_price).await.unwrap_err(),
            ServiceError::Model(_)
        ));

        let negative_quantity = ProductFields { quantity: -3, ..pen(3) };
        assert!(matches!(
            svc.create(alice, negative_quantity).await.unwrap_err(),
            ServiceError::Model(_)
        ));
    }
}
