pub mod feed;

pub use feed::{load_config_default, load_config_from, FeedConfig};
