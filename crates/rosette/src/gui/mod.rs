pub mod app;
pub mod bridge;
pub mod host;
pub mod menu;
pub mod theme;
