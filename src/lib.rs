pub mod ai;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod normalizer;
pub mod state;

#[cfg(test)]
mod testing;
