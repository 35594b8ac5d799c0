use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::product::repository::ProductFields;
use models::product;

/// The composite unique index on (user_id, barcode) is the backstop for the
/// application-level duplicate check; both surface as a conflict.
fn map_db_err(e: sea_orm::DbErr) -> ServiceError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("product with this barcode already exists".into())
        }
        _ => ServiceError::Db(e.to_string()),
    }
}

pub async fn find_by_owner_and_barcode(
    db: &DatabaseConnection,
    owner_id: Uuid,
    barcode: i64,
) -> Result<Option<product::Model>, ServiceError> {
    product::Entity::find()
        .filter(product::Column::UserId.eq(owner_id))
        .filter(product::Column::Barcode.eq(barcode))
        .one(db)
        .await
        .map_err(map_db_err)
}

pub async fn list_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<product::Model>, ServiceError> {
    product::Entity::find()
        .filter(product::Column::UserId.eq(owner_id))
        .order_by_asc(product::Column::CreatedAt)
        .all(db)
        .await
        .map_err(map_db_err)
}

pub async fn find_by_id_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<product::Model>, ServiceError> {
    product::Entity::find_by_id(id)
        .filter(product::Column::UserId.eq(owner_id))
        .one(db)
        .await
        .map_err(map_db_err)
}

pub async fn insert_product(
    db: &DatabaseConnection,
    owner_id: Uuid,
    fields: &ProductFields,
) -> Result<product::Model, ServiceError> {
    let am = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        name: Set(fields.name.clone()),
        price: Set(fields.price),
        barcode: Set(fields.barcode),
        quantity: Set(fields.quantity),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(map_db_err)
}

pub async fn update_product(
    db: &DatabaseConnection,
    id: Uuid,
    fields: &ProductFields,
) -> Result<product::Model, ServiceError> {
    let mut am: product::ActiveModel = product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| ServiceError::not_found("product"))?
        .into();
    am.name = Set(fields.name.clone());
    am.price = Set(fields.price);
    am.barcode = Set(fields.barcode);
    am.quantity = Set(fields.quantity);
    am.update(db).await.map_err(map_db_err)
}

pub async fn delete_product(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = product::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let sfx = Uuid::new_v4().simple().to_string();
        let owner = user::create(&db, &format!("svc_prod_{sfx}"), &format!("svc_prod_{sfx}@example.com")).await?;

        let fields = ProductFields { name: "Pen".into(), price: 10.0, barcode: 900_000_001, quantity: 5 };
        let created = insert_product(&db, owner.id, &fields).await?;
        assert_eq!(created.quantity, 5);

        let found = find_by_owner_and_barcode(&db, owner.id, 900_000_001).await?.unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_by_id_for_owner(&db, created.id, Uuid::new_v4()).await?.is_none());

        // The unique index rejects a second insert with the same barcode.
        let dup = insert_product(&db, owner.id, &fields).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))), "got: {dup:?}");

        let updated = update_product(
            &db,
            created.id,
            &ProductFields { name: "Blue Pen".into(), price: 12.5, barcode: 900_000_002, quantity: 7 },
        )
        .await?;
        assert_eq!(updated.name, "Blue Pen");
        assert_eq!(updated.barcode, 900_000_002);

        assert!(delete_product(&db, created.id).await?);
        assert!(!delete_product(&db, created.id).await?);
        assert!(list_by_owner(&db, owner.id).await?.is_empty());

        user::Entity::delete_by_id(owner.id).exec(&db).await?;
        Ok(())
    }
}
