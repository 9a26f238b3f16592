use admin_list_filters::AdminResource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub stock: i32,
    /// Cents
    pub price: f64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub struct ProductAdmin;

impl AdminResource for ProductAdmin {
    type EntityType = Entity;
    type ColumnType = Column;

    const RESOURCE_NAME_SINGULAR: &'static str = "product";
    const RESOURCE_NAME_PLURAL: &'static str = "products";
    const ORDER_COLUMN: Self::ColumnType = Column::Id;

    fn list_filter() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("stock", Column::Stock),
            ("price", Column::Price),
            ("name", Column::Name),
            // no filter is registered for booleans
            ("active", Column::Active),
        ]
    }

    fn list_display() -> Vec<&'static str> {
        vec!["name", "stock", "price"]
    }
}
