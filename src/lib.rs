pub mod action;
pub mod app;
pub mod args;
pub mod backend;
pub mod broker;
pub mod config;
pub mod logging;
pub mod message;
pub mod screens;
pub mod session;
pub mod state;
pub mod store;
pub mod sync;
pub mod theme;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::Config;
pub use store::Store;
