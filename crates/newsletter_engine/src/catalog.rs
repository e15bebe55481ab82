use std::path::PathBuf;

use async_trait::async_trait;
use newsletter_core::Book;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of the books promoted in every issue.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Up to `limit` books flagged both featured and published, in catalog order.
    async fn featured_books(&self, limit: usize) -> Result<Vec<Book>, CatalogError>;
}

/// One book as stored in the catalog file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default, alias = "coverImage")]
    pub cover_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amazon_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
}

impl From<CatalogEntry> for Book {
    fn from(entry: CatalogEntry) -> Self {
        Book {
            title: entry.title,
            cover_url: entry.cover_url,
            description: entry.description,
            amazon_url: entry.amazon_url,
        }
    }
}

/// Catalog backed by a JSON array of [`CatalogEntry`] values.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|err| CatalogError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    async fn featured_books(&self, limit: usize) -> Result<Vec<Book>, CatalogError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|entry| entry.featured && entry.published)
            .take(limit)
            .map(Book::from)
            .collect())
    }
}

/// Catalog with no books, for runs without a catalog file.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

#[async_trait]
impl Catalog for EmptyCatalog {
    async fn featured_books(&self, _limit: usize) -> Result<Vec<Book>, CatalogError> {
        Ok(Vec::new())
    }
}
