//! Raw SQL product store (API v1)
//!
//! Every call acquires one connection from the pool and holds it only
//! for its own statement. The connection returns to the pool on drop,
//! so success and fault paths release it alike.

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::PgPool;
use tracing::{error, info, instrument};

use super::store::{ProductStore, StoreError};
use super::elapsed_ms;
use crate::models::{Product, ProductId, ProductInput};

/// Plain SQL identifier; the table name is interpolated into statements.
static TABLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("invalid table name regex"));

/// Validated table name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Returns `None` unless `s` is a plain identifier of at most 63 characters.
    pub fn new(s: &str) -> Option<Self> {
        TABLE_NAME_RE.is_match(s).then(|| Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self("products".to_owned())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statements rendered once for the configured table
#[derive(Debug, Clone)]
struct Statements {
    list: String,
    get: String,
    insert: String,
    update: String,
    delete: String,
}

impl Statements {
    fn for_table(table: &TableName) -> Self {
        Self {
            list: format!("SELECT id, name, brand, price, stock FROM {table} ORDER BY id ASC"),
            get: format!("SELECT id, name, brand, price, stock FROM {table} WHERE id = $1"),
            insert: format!("INSERT INTO {table} (name, brand, price, stock) VALUES ($1, $2, $3, $4)"),
            update: format!(
                r#"UPDATE {table} SET name = $1, brand = $2, price = $3, stock = $4, "updatedAt" = NOW() WHERE id = $5"#
            ),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

/// Product store issuing parameterized SQL through a `PgPool`
#[derive(Clone)]
pub struct SqlProductStore {
    pool: PgPool,
    statements: Statements,
}

impl SqlProductStore {
    pub fn new(pool: PgPool, table: &TableName) -> Self {
        Self {
            pool,
            statements: Statements::for_table(table),
        }
    }
}

fn fault(operation: &'static str, err: sqlx::Error) -> StoreError {
    error!(store = "sql", operation, error = %err, "query failed");
    StoreError::Sql(err)
}

#[async_trait]
impl ProductStore for SqlProductStore {
    #[instrument(skip_all, fields(store = "sql"))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let started = Instant::now();
        let mut conn = self.pool.acquire().await.map_err(|e| fault("list_products", e))?;

        let data = sqlx::query_as::<_, Product>(&self.statements.list)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| fault("list_products", e))?;

        info!(
            store = "sql",
            operation = "list_products",
            elapsed_ms = elapsed_ms(started),
            ?data,
            "fetched products"
        );
        Ok(data)
    }

    #[instrument(skip(self), fields(store = "sql"))]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let started = Instant::now();
        let mut conn = self.pool.acquire().await.map_err(|e| fault("get_product", e))?;

        let data = sqlx::query_as::<_, Product>(&self.statements.get)
            .bind(id.get())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| fault("get_product", e))?;

        info!(
            store = "sql",
            operation = "get_product",
            elapsed_ms = elapsed_ms(started),
            ?data,
            "fetched product"
        );
        Ok(data)
    }

    #[instrument(skip_all, fields(store = "sql"))]
    async fn create_product(&self, input: &ProductInput) -> Result<(), StoreError> {
        let started = Instant::now();
        let mut conn = self.pool.acquire().await.map_err(|e| fault("create_product", e))?;

        sqlx::query(&self.statements.insert)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(input.price)
            .bind(input.stock)
            .execute(&mut *conn)
            .await
            .map_err(|e| fault("create_product", e))?;

        info!(
            store = "sql",
            operation = "create_product",
            elapsed_ms = elapsed_ms(started),
            "inserted product"
        );
        Ok(())
    }

    #[instrument(skip(self, input), fields(store = "sql"))]
    async fn update_product(&self, id: ProductId, input: &ProductInput) -> Result<bool, StoreError> {
        let started = Instant::now();
        let mut conn = self.pool.acquire().await.map_err(|e| fault("update_product", e))?;

        let result = sqlx::query(&self.statements.update)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(input.price)
            .bind(input.stock)
            .bind(id.get())
            .execute(&mut *conn)
            .await
            .map_err(|e| fault("update_product", e))?;

        info!(
            store = "sql",
            operation = "update_product",
            elapsed_ms = elapsed_ms(started),
            rows_affected = result.rows_affected(),
            "updated product"
        );
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(store = "sql"))]
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let started = Instant::now();
        let mut conn = self.pool.acquire().await.map_err(|e| fault("delete_product", e))?;

        let result = sqlx::query(&self.statements.delete)
            .bind(id.get())
            .execute(&mut *conn)
            .await
            .map_err(|e| fault("delete_product", e))?;

        info!(
            store = "sql",
            operation = "delete_product",
            elapsed_ms = elapsed_ms(started),
            rows_affected = result.rows_affected(),
            "deleted product"
        );
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    #[test]
    fn table_name_rules() {
        assert!(TableName::new("products").is_some());
        assert!(TableName::new("_shop_items2").is_some());
        assert!(TableName::new("2products").is_none());
        assert!(TableName::new("products; DROP TABLE x").is_none());
        assert!(TableName::new("").is_none());
        assert!(TableName::new(&"a".repeat(64)).is_none());
    }

    #[test]
    fn statements_use_configured_table() {
        let stmts = Statements::for_table(&TableName::new("shoes").unwrap());
        assert_eq!(
            stmts.list,
            "SELECT id, name, brand, price, stock FROM shoes ORDER BY id ASC"
        );
        assert!(stmts.update.contains(r#""updatedAt" = NOW()"#));
        assert!(stmts.update.ends_with("WHERE id = $5"));
        assert_eq!(stmts.delete, "DELETE FROM shoes WHERE id = $1");
    }

    // Integration tests require a real database with a products table
    // Run with: DATABASE_URL=postgres://... cargo test -p product-api -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn crud_round_trip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        let store = SqlProductStore::new(pool, &TableName::default());

        let input = ProductInput {
            name: "GAZELLE LOW BLACK WHITE".into(),
            brand: "Compass".into(),
            price: 408000.0,
            stock: 10.0,
        };
        store.create_product(&input).await.expect("insert failed");

        let listed = store.list_products().await.expect("list failed");
        let created = listed
            .iter()
            .rev()
            .find(|p| p.name == input.name)
            .expect("inserted product missing from list");
        let id = ProductId::from(created.id);

        assert!(store.update_product(id, &input).await.unwrap());
        assert!(store.delete_product(id).await.unwrap());
        assert!(!store.delete_product(id).await.unwrap());
        assert!(store.get_product(id).await.unwrap().is_none());
    }
}
