use crate::beautify::beautify;
use crate::config::{Config, RenderConfig};
use crate::error::Result;
use crate::ir::{EdgeRouting, LayoutNode};
use crate::ownership;
use crate::render::render_svg;
use crate::theme::Theme;

/// Turns laid-out ELK graphs into indented SVG documents.
///
/// Configuration only changes through `&mut self`; every call to
/// [`Renderer::to_svg`] derives its lookup tables from scratch, so a shared
/// `&Renderer` can serve several threads.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
    render: RenderConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            render: config.render.clone(),
        }
    }

    pub fn style(&self) -> &str {
        &self.theme.style
    }

    pub fn defs(&self) -> &str {
        &self.theme.defs
    }

    pub fn indent(&self) -> &str {
        &self.render.indent
    }

    pub fn edge_routing(&self) -> EdgeRouting {
        self.render.edge_routing
    }

    /// Replaces the stylesheet with `fragments` joined by newlines. No
    /// fragments (or only empty ones) drops the `<style>` block.
    pub fn set_style<I, S>(&mut self, fragments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.theme.style = join_fragments(fragments);
        self
    }

    /// Replaces the `<defs>` content with `fragments` joined by newlines.
    pub fn set_defs<I, S>(&mut self, fragments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.theme.defs = join_fragments(fragments);
        self
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) -> &mut Self {
        self.render.indent = indent.into();
        self
    }

    /// Routing style for containers that do not choose one.
    pub fn set_edge_routing(&mut self, routing: EdgeRouting) -> &mut Self {
        self.render.edge_routing = routing;
        self
    }

    /// Renders `root` to unindented markup.
    pub fn to_raw_svg(&self, root: &LayoutNode) -> Result<String> {
        let ownership = ownership::resolve(root, self.render.edge_routing)?;
        Ok(render_svg(root, &ownership, &self.theme))
    }

    /// Renders `root` to an indented SVG document.
    pub fn to_svg(&self, root: &LayoutNode) -> Result<String> {
        let raw = self.to_raw_svg(root)?;
        Ok(beautify(&raw, &self.render.indent))
    }

    pub fn render_json(&self, json: &str) -> Result<String> {
        let root: LayoutNode = serde_json::from_str(json)?;
        self.to_svg(&root)
    }

    pub fn render_json5(&self, json5: &str) -> Result<String> {
        let root: LayoutNode = json5::from_str(json5)?;
        self.to_svg(&root)
    }
}

fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|fragment| fragment.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders an ELK JSON layout with the default configuration.
pub fn render_json(json: &str) -> Result<String> {
    Renderer::new().render_json(json)
}
