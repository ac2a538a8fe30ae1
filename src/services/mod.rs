pub mod content_store;
pub mod controller;
pub mod url_arbiter;
