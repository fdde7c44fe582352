use crate::config::{load_config, validate_background};
use crate::ir::{EdgeRouting, LayoutNode};
use crate::layout_dump::write_layout_dump;
use crate::ownership;
use crate::render::write_output_svg;
use crate::renderer::Renderer;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "elksvg", version, about = "Render ELK layout JSON to SVG")]
pub struct Args {
    /// Input file (.json or .json5, already laid out by ELK) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (style, defs, indent, edgeRouting, background)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Spaces per indentation level
    #[arg(long = "indent")]
    pub indent: Option<usize>,

    /// Routing style for containers that do not set one
    #[arg(long = "edgeRouting", value_enum)]
    pub edge_routing: Option<RoutingArg>,

    /// Omit the embedded stylesheet
    #[arg(long = "noStyle")]
    pub no_style: bool,

    /// Omit the embedded definitions
    #[arg(long = "noDefs")]
    pub no_defs: bool,

    /// Write the resolved container/edge tables as JSON
    #[arg(long = "dumpOwnership")]
    pub dump_ownership: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// PNG background color (#rrggbb, #rrggbbaa or transparent)
    #[arg(short = 'b', long = "backgroundColor")]
    pub background: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RoutingArg {
    Polyline,
    Splines,
}

impl From<RoutingArg> for EdgeRouting {
    fn from(arg: RoutingArg) -> Self {
        match arg {
            RoutingArg::Polyline => EdgeRouting::Polyline,
            RoutingArg::Splines => EdgeRouting::Splines,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(background) = args.background {
        validate_background(&background)?;
        config.render.background = background;
    }

    let mut renderer = Renderer::from_config(&config);
    if let Some(indent) = args.indent {
        renderer.set_indent(" ".repeat(indent));
    }
    if let Some(routing) = args.edge_routing {
        renderer.set_edge_routing(routing.into());
    }
    if args.no_style {
        renderer.set_style([""]);
    }
    if args.no_defs {
        renderer.set_defs([""]);
    }

    let root = read_input(args.input.as_deref())?;

    if let Some(path) = args.dump_ownership.as_deref() {
        let ownership = ownership::resolve(&root, renderer.edge_routing())?;
        write_layout_dump(path, &root, &ownership)?;
    }

    let svg = renderer.to_svg(&root)?;
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<LayoutNode> {
    let (content, is_json5) = match path {
        Some(path) if path != Path::new("-") => {
            let content = std::fs::read_to_string(path)?;
            let is_json5 = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json5"))
                .unwrap_or(false);
            (content, is_json5)
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            (buf, false)
        }
    };
    parse_layout(&content, is_json5)
}

fn parse_layout(content: &str, is_json5: bool) -> Result<LayoutNode> {
    let root = if is_json5 {
        json5::from_str(content).map_err(crate::error::Error::from)?
    } else {
        serde_json::from_str(content).map_err(crate::error::Error::from)?
    };
    Ok(root)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
