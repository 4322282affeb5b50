//! Configuration: schema, discovery and loading of `chatterbox.{toml,yaml,yml,json}`.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{clear_config_dir, config_dir, discover_and_load, load_config, set_config_dir},
    schema::{AutoReplyConfig, ChatterboxConfig, ReplyRuleEntry, ServerConfig, SessionsConfig},
};
