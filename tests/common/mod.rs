#![allow(dead_code)]

use admin_list_filters::{AdminState, FilterSettings, admin_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::prelude::*;
use tower::ServiceExt;

pub mod product_entity;

use product_entity::ProductAdmin;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Five products covering zero values, boundaries and mixed-case names
pub async fn setup_test_db_with_products() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    let products = [
        ("Apple", 0, 99.0, true),
        ("pear", 10, 1999.0, true),
        ("Banana", 20, 2000.0, false),
        ("APPLE PIE", 35, 4550.0, true),
        ("Cherry", 50, 12_000.0, true),
    ];
    let models = products.into_iter().map(|(name, stock, price, active)| {
        product_entity::ActiveModel {
            name: Set(name.to_string()),
            stock: Set(stock),
            price: Set(price),
            active: Set(active),
            ..Default::default()
        }
    });
    product_entity::Entity::insert_many(models).exec(&db).await?;

    Ok(db)
}

pub fn setup_product_app(db: DatabaseConnection) -> Router {
    setup_product_app_with_settings(db, FilterSettings::default())
}

pub fn setup_product_app_with_settings(db: DatabaseConnection, settings: FilterSettings) -> Router {
    let state = AdminState::new(db).with_settings(settings).unwrap();
    setup_product_app_with_state(state)
}

pub fn setup_product_app_with_state(state: AdminState) -> Router {
    Router::new().nest("/admin/products", admin_router::<ProductAdmin>(state))
}

/// GET `uri`, returning the status, headers and body text
pub async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

/// Names of the products returned by the JSON change list
pub async fn product_names(app: &Router, query: &str) -> Vec<String> {
    let (status, _, body) = get(app, &format!("/admin/products/data?{query}")).await;
    assert_eq!(status, StatusCode::OK, "unexpected status for '{query}': {body}");
    let products: Vec<product_entity::Model> = serde_json::from_str(&body).unwrap();
    products.into_iter().map(|p| p.name).collect()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateProductTable)]
    }
}

pub struct CreateProductTable;

#[async_trait::async_trait]
impl MigrationName for CreateProductTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_product_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateProductTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ProductEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(ProductColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(ProductColumn::Name).string().not_null())
            .col(ColumnDef::new(ProductColumn::Stock).integer().not_null())
            .col(ColumnDef::new(ProductColumn::Price).double().not_null())
            .col(
                ColumnDef::new(ProductColumn::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum ProductColumn {
    Id,
    Name,
    Stock,
    Price,
    Active,
}

impl Iden for ProductColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Stock => "stock",
                Self::Price => "price",
                Self::Active => "active",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ProductEntity;

impl Iden for ProductEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "products").unwrap();
    }
}
