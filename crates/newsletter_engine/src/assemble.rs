use std::sync::Arc;

use newsletter_core::{merge, Book, ExtractedContent, SiteProfile, SubscriberRef, TemplateData};
use newsletter_logging::{pipeline_debug, pipeline_warn};

use crate::catalog::Catalog;

/// How many catalog books an issue promotes.
pub const FEATURED_BOOK_LIMIT: usize = 2;

/// Combines extracted content with site metadata, links and catalog books.
#[derive(Clone)]
pub struct TemplateDataAssembler {
    catalog: Arc<dyn Catalog>,
    site: SiteProfile,
}

impl TemplateDataAssembler {
    pub fn new(catalog: Arc<dyn Catalog>, site: SiteProfile) -> Self {
        Self { catalog, site }
    }

    /// Catalog failures degrade to an issue without books.
    pub async fn featured_books(&self) -> Vec<Book> {
        match self.catalog.featured_books(FEATURED_BOOK_LIMIT).await {
            Ok(books) => {
                pipeline_debug!("Loaded {} featured book(s)", books.len());
                books
            }
            Err(err) => {
                pipeline_warn!("Featured books unavailable, continuing without: {err}");
                Vec::new()
            }
        }
    }

    pub async fn assemble(
        &self,
        extracted: ExtractedContent,
        subscriber: Option<&SubscriberRef>,
    ) -> TemplateData {
        let books = self.featured_books().await;
        self.assemble_with_books(extracted, subscriber, books)
    }

    pub fn assemble_with_books(
        &self,
        extracted: ExtractedContent,
        subscriber: Option<&SubscriberRef>,
        books: Vec<Book>,
    ) -> TemplateData {
        merge(extracted, subscriber, books, &self.site)
    }
}
