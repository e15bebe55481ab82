//! Newsletter engine: IO side of the pipeline and delivery.
mod assemble;
mod catalog;
mod component;
mod config;
mod decode;
mod delivery;
mod fetch;
mod filename;
mod persist;
mod render;
mod transport;
mod types;

pub use assemble::{TemplateDataAssembler, FEATURED_BOOK_LIMIT};
pub use catalog::{Catalog, CatalogEntry, CatalogError, EmptyCatalog, JsonCatalog};
pub use component::{
    ComponentRenderer, HandlebarsComponentRenderer, RenderError, RenderedComponent,
    NEWSLETTER_COMPONENT,
};
pub use config::{
    AppEnvironment, ConfigError, MailConfig, NewsletterConfig, SiteConfig, SmtpSettings,
    DEFAULT_SITE_URL,
};
pub use decode::{decode_html, DecodeError};
pub use delivery::{DeliveryEngine, DeliverySettings, NewsletterIssue};
pub use fetch::{document_export_url, ContentFetcher, FetchSettings, ReqwestFetcher};
pub use filename::preview_stem;
pub use persist::{ensure_output_dir, write_preview, AtomicFileWriter, PersistError, PreviewPaths};
pub use render::DualFormatRenderer;
pub use transport::{create_transport, MailTransport, OutgoingEmail, SmtpTransport, TransportError};
pub use types::{FetchError, RawContent};
