//! Use cases (application services)

pub mod chat_palette;
