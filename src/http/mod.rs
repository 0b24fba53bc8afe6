pub mod config;
pub mod context;
pub mod matcher;
pub mod meta;
pub mod params;
pub mod req;
pub mod res;
pub mod router;
pub mod segment;
pub mod types;
