pub mod error;
pub mod models {
    pub mod catalog;
    pub mod content;
    pub mod draft;
    pub mod validation;
}
pub mod db {
    #[cfg(feature = "server")]
    pub mod connection;
    pub mod memory;
    pub mod models;
    pub mod repository;
}
pub mod api {
    pub mod content;
    pub mod envelope;
    pub mod errors;
}

#[cfg(feature = "server")]
pub mod app;
#[cfg(feature = "server")]
pub mod config;
