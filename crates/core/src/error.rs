use thiserror::Error;

/// Whatever a renderer or row activator reports when it fails.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },
    #[error("height {height} leaves no room below the {margin}-unit breadcrumb bar")]
    NoRoomForContent { height: f64, margin: f64 },
    #[error("drilldown is enabled but no row activator was supplied")]
    MissingRowActivator,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading records: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing JSON records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parsing CSV records: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum TreemapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("renderer failed: {0}")]
    Render(#[source] RenderError),
    #[error("row activation failed for index {index}: {source}")]
    Activation {
        index: usize,
        #[source]
        source: RenderError,
    },
}
