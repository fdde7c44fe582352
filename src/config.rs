use crate::beautify::DEFAULT_INDENT;
use crate::ir::EdgeRouting;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Indentation unit used by the beautifier for each nesting level.
    pub indent: String,
    /// Routing style for containers that do not set one themselves.
    pub edge_routing: EdgeRouting,
    /// Canvas size used when rasterizing documents without an intrinsic size.
    pub width: f32,
    pub height: f32,
    /// PNG fill behind the drawing: `#rgb`, `#rrggbb`, `#rrggbbaa`, or
    /// `transparent`/`none`.
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            edge_routing: EdgeRouting::Polyline,
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl RenderConfig {
    /// The background as RGBA channels, or `None` when it is transparent or
    /// not a recognised color.
    pub fn background_rgba(&self) -> Option<[u8; 4]> {
        parse_color(&self.background).flatten()
    }
}

/// `Some(None)` is an explicit transparent background; `None` is unparsable.
fn parse_color(value: &str) -> Option<Option<[u8; 4]>> {
    let value = value.trim();
    if value.is_empty()
        || value.eq_ignore_ascii_case("transparent")
        || value.eq_ignore_ascii_case("none")
    {
        return Some(None);
    }
    let hex = value.strip_prefix('#')?;
    let digits: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let mut rgba = [u8::MAX; 4];
    for (channel, pair) in rgba.iter_mut().zip(digits.as_bytes().chunks(2)) {
        *channel = u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok()?;
    }
    Some(Some(rgba))
}

pub(crate) fn validate_background(value: &str) -> anyhow::Result<()> {
    parse_color(value).map(|_| ()).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported background `{value}` (expected #rgb, #rrggbb, #rrggbbaa or transparent)"
        )
    })
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    style: Option<String>,
    style_file: Option<String>,
    defs: Option<String>,
    defs_file: Option<String>,
    indent: Option<IndentValue>,
    edge_routing: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

/// `indent` may be a number of spaces or a literal string such as `"\t"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndentValue {
    Spaces(usize),
    Literal(String),
}

impl IndentValue {
    fn into_unit(self) -> String {
        match self {
            IndentValue::Spaces(count) => " ".repeat(count),
            IndentValue::Literal(unit) => unit,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    if let Some(file) = parsed.style_file {
        config.theme.style = std::fs::read_to_string(base_dir.join(file))?;
    }
    if let Some(style) = parsed.style {
        config.theme.style = style;
    }
    if let Some(file) = parsed.defs_file {
        config.theme.defs = std::fs::read_to_string(base_dir.join(file))?;
    }
    if let Some(defs) = parsed.defs {
        config.theme.defs = defs;
    }
    if let Some(indent) = parsed.indent {
        config.render.indent = indent.into_unit();
    }
    if let Some(token) = parsed.edge_routing {
        config.render.edge_routing = EdgeRouting::from_token(&token).ok_or_else(|| {
            anyhow::anyhow!("Unsupported edgeRouting `{token}` (expected POLYLINE or SPLINES)")
        })?;
    }
    if let Some(width) = parsed.width {
        config.render.width = width;
    }
    if let Some(height) = parsed.height {
        config.render.height = height;
    }
    if let Some(background) = parsed.background {
        validate_background(&background)?;
        config.render.background = background;
    }

    Ok(config)
}
