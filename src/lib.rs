pub mod auth;
pub mod backend;
pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod form;
pub mod itinerary;
pub mod logging;
pub mod oneshot;
pub mod repl;
pub mod session;
pub mod spinner;
