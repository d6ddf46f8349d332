//! sea-orm entity for the `products` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub brand: String,

    pub price: f64,

    pub stock: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            brand: m.brand,
            price: m.price,
            stock: m.stock,
        }
    }
}
