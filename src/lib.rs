pub mod config;
pub mod controller;
pub mod http_client;
pub mod logs;
pub mod player_api;
pub mod render;
pub mod state;
