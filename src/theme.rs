use serde::{Deserialize, Serialize};

const ELK_STYLE: &str = r#"
rect {
  opacity: 0.8;
  fill: #6094CC;
  stroke-width: 1;
  stroke: #222222;
}
rect.port {
  opacity: 1;
  fill: #326CB2;
}
text {
  font-size: 10px;
  font-family: sans-serif;
  /* in elk's coordinates "hanging" would be the correct value" */
  dominant-baseline: hanging;
  text-align: left;
}
g.port > text {
  font-size: 8px;
}
polyline {
  fill: none;
  stroke: black;
  stroke-width: 1;
}
path {
  fill: none;
  stroke: black;
  stroke-width: 1;
}
"#;

const ELK_DEFS: &str = r#"<marker id="arrow" markerWidth="10" markerHeight="8" refX="10" refY="4" orient="auto">
  <path d="M0,7 L10,4 L0,1 L0,7" style="fill: #000000;" />
</marker>"#;

/// Stylesheet and `<defs>` content embedded into every rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub style: String,
    pub defs: String,
}

impl Theme {
    /// Blue boxes, black strokes and an `arrow` marker for `marker-end`.
    pub fn elk_default() -> Self {
        Self {
            style: ELK_STYLE.to_string(),
            defs: ELK_DEFS.to_string(),
        }
    }

    /// No stylesheet and no definitions.
    pub fn bare() -> Self {
        Self {
            style: String::new(),
            defs: String::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::elk_default()
    }
}
