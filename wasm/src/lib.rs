use elk_svg_renderer::{EdgeRouting, Renderer};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElkRenderOptions {
    style: Option<String>,
    defs: Option<String>,
    indent: Option<usize>,
    edge_routing: Option<String>,
}

fn build_renderer(options: ElkRenderOptions) -> Result<Renderer, String> {
    let mut renderer = Renderer::new();

    if let Some(style) = options.style {
        renderer.set_style([style]);
    }
    if let Some(defs) = options.defs {
        renderer.set_defs([defs]);
    }
    if let Some(indent) = options.indent {
        renderer.set_indent(" ".repeat(indent));
    }
    if let Some(token) = options.edge_routing {
        let routing = EdgeRouting::from_token(&token)
            .ok_or_else(|| format!("unsupported edgeRouting `{token}`"))?;
        renderer.set_edge_routing(routing);
    }

    Ok(renderer)
}

#[wasm_bindgen]
pub fn render_elk_svg(layout_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ElkRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ElkRenderOptions::default()
    };

    let renderer = build_renderer(options).map_err(|error| JsValue::from_str(&error))?;
    renderer
        .render_json(layout_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
