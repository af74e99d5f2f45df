//! Settings: schema types plus loading from `config.toml` and `MINDFUL__*`
//! environment variables.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
