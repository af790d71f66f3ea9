// src/core/job_store.rs
//! Document store for job listings: collections of JSON objects with a
//! small Mongo-style filter language (equality and `$regex`).

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use sqlx::SqliteConnection;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use super::database::Database;

/// A stored JSON object. Query results carry the store id as `_id`.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const DEFAULT_COLLECTION: &str = "Jobs";

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<String>;

    /// Documents of `collection` matching `filter`, in insertion order.
    async fn query(&self, collection: &str, filter: &DocumentFilter) -> Result<Vec<Document>>;

    /// Remove every document of `collection`, returning how many went.
    async fn drop_collection(&self, collection: &str) -> Result<u64>;

    /// Swap the contents of `collection` for `documents` atomically: on
    /// failure the previous contents are kept.
    async fn replace_collection(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize>;
}

#[derive(Debug)]
enum Condition {
    Equals(Value),
    Matches(Regex),
}

impl Condition {
    fn admits(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => value == Some(expected),
            Condition::Matches(regex) => match value {
                Some(Value::String(s)) => regex.is_match(s),
                _ => false,
            },
        }
    }
}

/// Conjunction of per-field conditions over top-level fields.
#[derive(Debug, Default)]
pub struct DocumentFilter {
    conditions: Vec<(String, Condition)>,
}

impl DocumentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from `{"field": literal}` / `{"field": {"$regex": "..", "$options": "i"}}`.
    /// `null` is the empty filter.
    pub fn from_value(filter: &Value) -> Result<Self> {
        let fields = match filter {
            Value::Null => return Ok(Self::all()),
            Value::Object(fields) => fields,
            other => bail!("filter must be a JSON object, got {}", other),
        };

        let mut conditions = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            let condition = match value.as_object().and_then(|o| o.get("$regex")) {
                Some(pattern) => {
                    let pattern = pattern
                        .as_str()
                        .with_context(|| format!("$regex for `{}` must be a string", field))?;
                    let case_insensitive = value
                        .get("$options")
                        .and_then(Value::as_str)
                        .is_some_and(|options| options.contains('i'));
                    let regex = RegexBuilder::new(pattern)
                        .case_insensitive(case_insensitive)
                        .build()
                        .with_context(|| format!("invalid $regex for `{}`", field))?;
                    Condition::Matches(regex)
                }
                None => Condition::Equals(value.clone()),
            };
            conditions.push((field.clone(), condition));
        }
        Ok(Self { conditions })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.admits(document.get(field)))
    }
}

pub struct SqliteJobStore {
    db: Database,
}

impl SqliteJobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn open(database_path: &Path) -> Result<Self> {
        Ok(Self::new(Database::new(database_path).await?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn encode(mut document: Document) -> Result<String> {
        document.remove(ID_FIELD);
        serde_json::to_string(&document).context("Failed to serialize document")
    }

    async fn insert_rows(
        conn: &mut SqliteConnection,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize> {
        let count = documents.len();
        for document in documents {
            sqlx::query(
                "INSERT INTO documents (id, collection, body, inserted_at) VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(collection)
            .bind(Self::encode(document)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *conn)
            .await?;
        }
        Ok(count)
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;
        let count = Self::insert_rows(&mut tx, collection, documents).await?;
        tx.commit().await?;

        info!("Inserted {} documents into {}", count, collection);
        Ok(count)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (id, collection, body, inserted_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(collection)
            .bind(Self::encode(document)?)
            .bind(Utc::now().to_rfc3339())
            .execute(self.db.pool())
            .await?;
        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn query(&self, collection: &str, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid",
        )
        .bind(collection)
        .fetch_all(self.db.pool())
        .await?;

        let mut documents = Vec::new();
        for (id, body) in rows {
            let mut document: Document = serde_json::from_str(&body)
                .with_context(|| format!("Corrupt document {} in {}", id, collection))?;
            document.insert(ID_FIELD.to_string(), Value::String(id));
            if filter.matches(&document) {
                documents.push(document);
            }
        }
        debug!("Query on {} returned {} documents", collection, documents.len());
        Ok(documents)
    }

    async fn drop_collection(&self, collection: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(collection)
            .execute(self.db.pool())
            .await?;
        info!(
            "Dropped collection {} ({} documents)",
            collection,
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    async fn replace_collection(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;
        let dropped = sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(collection)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let count = Self::insert_rows(&mut tx, collection, documents).await?;
        tx.commit().await?;

        info!(
            "Replaced collection {} ({} documents out, {} in)",
            collection, dropped, count
        );
        Ok(count)
    }
}

/// Replace `collection` with the contents of a merged dataset file (a JSON
/// array of objects, or a single object).
pub async fn seed_from_file(
    store: &dyn JobStore,
    collection: &str,
    path: &Path,
) -> Result<usize> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let documents = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(document) => Ok(document),
                other => bail!(
                    "item {} of {} is not an object: {}",
                    index,
                    path.display(),
                    other
                ),
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Object(document) => vec![document],
        other => bail!("{} holds neither an array nor an object: {}", path.display(), other),
    };

    let inserted = store.replace_collection(collection, documents).await?;
    info!(
        "Seeded {} with {} documents from {}",
        collection,
        inserted,
        path.display()
    );
    Ok(inserted)
}
