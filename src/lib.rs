pub mod beautify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout_dump;
pub mod ownership;
pub mod render;
pub mod renderer;
pub mod svg;
pub mod theme;

pub use beautify::beautify;
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use error::{Error, Result};
pub use ir::{ClassList, Edge, EdgeRouting, Label, LayoutNode, Point, Port, Section};
pub use renderer::{Renderer, render_json};
pub use theme::Theme;
