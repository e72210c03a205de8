pub mod clipboard;

pub use clipboard::SystemSelection;
