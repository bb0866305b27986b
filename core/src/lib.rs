pub mod error;
pub mod filter;
pub mod models;
pub mod selection;
pub mod service;
pub mod shopping_list;
