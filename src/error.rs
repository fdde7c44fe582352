#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge `{edge}` references `{node}`, which is neither a node nor a port of the graph")]
    UnknownNode { edge: String, node: String },
    #[error("edge `{edge}` leaves the root node `{root}` and has no enclosing container")]
    DetachedEdge { edge: String, root: String },
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layout JSON5: {0}")]
    Json5(#[from] json5::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
