pub mod catalog;
pub mod config;
pub mod demo_feed;
pub mod feed;
pub mod http_client;
pub mod snapshot;
pub mod state;
pub mod ui;
pub mod validate;
pub mod view;
