pub mod aggregate;
pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod export;
pub mod frame;
pub mod hierarchy;
pub mod human;
pub mod ingest;
pub mod label;
pub mod layout;
pub mod model;
pub mod search;
pub mod treemap;
pub mod widget;
pub mod zoom;

pub use config::*;
pub use error::*;
pub use model::*;
pub use widget::*;
