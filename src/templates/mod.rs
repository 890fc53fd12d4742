pub mod components;
pub mod layouts;
pub mod pages;

pub use layouts::desktop::desktop_layout;

pub const APP_NAME: &str = "Obra Alerta Maps";
