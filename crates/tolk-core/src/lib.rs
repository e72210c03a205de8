pub mod languages;
pub mod manager;
pub mod ports;
pub mod session;
pub mod settings;
