use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, QueryFilter, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::product;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::has_many(product::Entity).into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(errors::ModelError::from_db)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(errors::ModelError::from_db)
}

/// Duplicate lookup used by registration: either column may collide.
pub async fn find_by_username_or_email(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::Username.eq(username))
                .add(Column::Email.eq(email)),
        )
        .one(db)
        .await
        .map_err(errors::ModelError::from_db)
}
