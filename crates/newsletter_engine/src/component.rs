use handlebars::Handlebars;
use thiserror::Error;

/// Name of the body component rendered for every issue.
pub const NEWSLETTER_COMPONENT: &str = "newsletter";

const NEWSLETTER_TEMPLATE: &str = include_str!("../templates/newsletter.hbs");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid component template: {0}")]
    Template(String),
    #[error("unknown component {0}")]
    UnknownComponent(String),
    #[error("failed to serialize template data: {0}")]
    Props(String),
    #[error("component {name} failed to render: {message}")]
    Component { name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComponent {
    pub body: String,
}

/// Renders a named component with JSON props into an HTML fragment.
pub trait ComponentRenderer: Send + Sync {
    fn render_component(
        &self,
        name: &str,
        props: &serde_json::Value,
    ) -> Result<RenderedComponent, RenderError>;
}

/// Component renderer backed by the embedded Handlebars templates.
pub struct HandlebarsComponentRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsComponentRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        // Missing optional fields render as empty.
        registry.set_strict_mode(false);
        registry
            .register_template_string(NEWSLETTER_COMPONENT, NEWSLETTER_TEMPLATE)
            .map_err(|err| RenderError::Template(err.to_string()))?;
        Ok(Self { registry })
    }
}

impl ComponentRenderer for HandlebarsComponentRenderer {
    fn render_component(
        &self,
        name: &str,
        props: &serde_json::Value,
    ) -> Result<RenderedComponent, RenderError> {
        if !self.registry.has_template(name) {
            return Err(RenderError::UnknownComponent(name.to_string()));
        }
        let body = self
            .registry
            .render(name, props)
            .map_err(|err| RenderError::Component {
                name: name.to_string(),
                message: err.to_string(),
            })?;
        Ok(RenderedComponent { body })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ComponentRenderer, HandlebarsComponentRenderer, RenderError};

    #[test]
    fn embedded_newsletter_template_registers() {
        let renderer = HandlebarsComponentRenderer::new().unwrap();
        assert!(renderer.registry.has_template(super::NEWSLETTER_COMPONENT));
    }

    #[test]
    fn unknown_component_is_an_error() {
        let renderer = HandlebarsComponentRenderer::new().unwrap();
        let err = renderer.render_component("sidebar", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::UnknownComponent(name) if name == "sidebar"));
    }

    #[test]
    fn story_content_is_raw_and_headlines_are_escaped() {
        let renderer = HandlebarsComponentRenderer::new().unwrap();
        let props = json!({
            "subject": "Fish & Chips",
            "featured_story": {
                "headline": "<Big>",
                "content": "<p>Hello</p>",
                "author": "Ada",
                "date": "May 1"
            }
        });
        let body = renderer.render_component("newsletter", &props).unwrap().body;
        assert!(body.contains("Fish &amp; Chips"));
        assert!(body.contains("&lt;Big&gt;"));
        assert!(body.contains("<p>Hello</p>"));
        assert!(!body.contains("Top Stories"));
    }
}
