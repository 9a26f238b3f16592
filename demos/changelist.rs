//! Serves a product change list with the three list filters on http://127.0.0.1:3000.
//!
//! ```text
//! cargo run --example changelist
//! open http://127.0.0.1:3000/admin/products?irf__stock__gte=5&sf__name__iexact=apple,pear
//! ```
//!
//! `FILTER_SETTINGS=path/to/filters.toml` loads filter settings from a TOML file.

use admin_list_filters::{AdminResource, AdminState, FilterSettings, admin_router};
use axum::Router;
use sea_orm::{ActiveValue::Set, ConnectionTrait, Database, EntityTrait, Schema};

mod product {
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub stock: i32,
        /// Cents
        pub price: f64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

struct ProductAdmin;

impl AdminResource for ProductAdmin {
    type EntityType = product::Entity;
    type ColumnType = product::Column;

    const RESOURCE_NAME_SINGULAR: &'static str = "product";
    const RESOURCE_NAME_PLURAL: &'static str = "products";
    const ORDER_COLUMN: Self::ColumnType = product::Column::Id;

    fn list_filter() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("stock", product::Column::Stock),
            ("price", product::Column::Price),
            ("name", product::Column::Name),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_list_filters=debug,info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let settings = match std::env::var("FILTER_SETTINGS") {
        Ok(path) => FilterSettings::from_file(path)?,
        Err(_) => FilterSettings::default(),
    };

    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(product::Entity)))
        .await?;

    let products = [
        ("Apple", 12, 99.0),
        ("Pear", 3, 149.0),
        ("Banana", 40, 25.0),
        ("Apple pie", 2, 1250.0),
        ("Cherry", 0, 800.0),
    ];
    product::Entity::insert_many(products.into_iter().map(|(name, stock, price)| {
        product::ActiveModel {
            name: Set(name.to_string()),
            stock: Set(stock),
            price: Set(price),
            ..Default::default()
        }
    }))
    .exec(&db)
    .await?;

    let state = AdminState::new(db).with_settings(settings)?;
    let app = Router::new().nest("/admin/products", admin_router::<ProductAdmin>(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Change list on http://127.0.0.1:3000/admin/products");
    axum::serve(listener, app).await?;
    Ok(())
}
