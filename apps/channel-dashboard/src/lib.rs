pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod series;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod test_support;
