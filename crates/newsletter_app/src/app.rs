use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use newsletter_core::{DeliveryResult, NormalizeOptions, Recipient};
use newsletter_engine::{
    decode_html, write_preview, Catalog, ContentFetcher, DeliveryEngine, DualFormatRenderer,
    EmptyCatalog, FetchSettings, JsonCatalog, NewsletterConfig, NewsletterIssue, RawContent,
    ReqwestFetcher, SiteConfig, TemplateDataAssembler,
};
use newsletter_logging::pipeline_info;

use crate::persistence::{append_send_record, load_recipients, SendRecord};
use crate::{Commands, SourceArgs};

pub(crate) async fn run(command: Commands, catalog: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = open_catalog(catalog);
    match command {
        Commands::Preview { source, out } => preview(&source, &out, catalog).await,
        Commands::Send {
            source,
            subscribers,
            records,
        } => {
            let recipients = load_recipients(&subscribers)?;
            let (subject, result) = send(&source, &recipients, catalog).await?;
            print_summary(&subject, &result);
            let record = SendRecord::new(&subject, recipients.len(), &result);
            let path = append_send_record(&records, record)?;
            println!("Send record written to {}", path.display());
            Ok(())
        }
        Commands::TestSend { source, to } => {
            let recipients = vec![Recipient::new(to)];
            let (subject, result) = send(&source, &recipients, catalog).await?;
            print_summary(&subject, &result);
            if result.failed > 0 {
                bail!("test send failed");
            }
            Ok(())
        }
    }
}

fn open_catalog(path: Option<PathBuf>) -> Arc<dyn Catalog> {
    match path {
        Some(path) => Arc::new(JsonCatalog::new(path)),
        None => Arc::new(EmptyCatalog),
    }
}

async fn preview(
    source: &SourceArgs,
    out: &Path,
    catalog: Arc<dyn Catalog>,
) -> anyhow::Result<()> {
    let site = SiteConfig::from_env()?;
    let issue = load_issue(source, &site).await?;

    let assembler = TemplateDataAssembler::new(catalog, site.profile());
    let data = assembler.assemble(issue.content, None).await;
    let message = DualFormatRenderer::with_handlebars()?.render(&data)?;

    let paths = write_preview(out, &data.content.subject, &message)?;
    println!("HTML preview: {}", paths.html.display());
    println!("Text preview: {}", paths.text.display());
    Ok(())
}

async fn send(
    source: &SourceArgs,
    recipients: &[Recipient],
    catalog: Arc<dyn Catalog>,
) -> anyhow::Result<(String, DeliveryResult)> {
    let config = NewsletterConfig::from_env()?;
    let engine = DeliveryEngine::from_config(&config, catalog)?;
    if engine.is_simulated() {
        println!("SMTP is not configured: delivery is simulated.");
    }

    let issue = load_issue(source, &config.site).await?;
    let result = engine.deliver(&issue, recipients).await;
    Ok((issue.subject().to_string(), result))
}

async fn load_issue(source: &SourceArgs, site: &SiteConfig) -> anyhow::Result<NewsletterIssue> {
    let raw = read_source(source).await?;
    let options = NormalizeOptions::new(site.author_name.clone(), today_label());
    let issue = NewsletterIssue::from_raw(&raw.html, &options);
    pipeline_info!(
        "Normalized '{}' with {} top stor(ies)",
        issue.subject(),
        issue.content.top_stories.len()
    );
    Ok(issue)
}

async fn read_source(source: &SourceArgs) -> anyhow::Result<RawContent> {
    match (&source.input, &source.url) {
        (Some(path), _) => {
            let bytes = fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(decode_html(&bytes, None)?)
        }
        (None, Some(url)) => {
            let fetcher = ReqwestFetcher::new(FetchSettings::default())?;
            Ok(fetcher.fetch(url).await?)
        }
        (None, None) => bail!("either --input or --url is required"),
    }
}

/// Long-form local date used as the default byline date.
fn today_label() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

fn print_summary(subject: &str, result: &DeliveryResult) {
    println!(
        "'{subject}': {} sent, {} failed",
        result.sent, result.failed
    );
    for error in &result.errors {
        println!("  {error}");
    }
}
