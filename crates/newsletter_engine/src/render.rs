use std::sync::Arc;

use newsletter_core::{render_text, wrap_html, RenderedMessage, TemplateData};

use crate::component::{
    ComponentRenderer, HandlebarsComponentRenderer, RenderError, NEWSLETTER_COMPONENT,
};

/// Produces the HTML and plain-text bodies of one copy of an issue.
///
/// The two formats come from separate generators: HTML from the component
/// renderer inside the email shell, text from [`render_text`].
#[derive(Clone)]
pub struct DualFormatRenderer {
    components: Arc<dyn ComponentRenderer>,
}

impl DualFormatRenderer {
    pub fn new(components: Arc<dyn ComponentRenderer>) -> Self {
        Self { components }
    }

    pub fn with_handlebars() -> Result<Self, RenderError> {
        Ok(Self::new(Arc::new(HandlebarsComponentRenderer::new()?)))
    }

    pub fn render(&self, data: &TemplateData) -> Result<RenderedMessage, RenderError> {
        let props = serde_json::to_value(data).map_err(|err| RenderError::Props(err.to_string()))?;
        let component = self
            .components
            .render_component(NEWSLETTER_COMPONENT, &props)?;

        Ok(RenderedMessage {
            html: wrap_html(
                &data.content.subject,
                &data.content.preheader,
                &component.body,
            ),
            text: render_text(data),
        })
    }
}
