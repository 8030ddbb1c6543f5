pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::HttpCollector;
pub use crate::config::CliConfig;
pub use crate::core::aggregator::LineAggregator;
pub use crate::core::extractor::ExchangeExtractor;
pub use crate::core::relay::{spawn_delivery_worker, ChatRelay};
pub use crate::domain::model::{BlockContext, CompletedBlock, ExchangePayload, ExchangeRecord, Position};
pub use crate::domain::ports::{ContextSource, ExchangeSink};
pub use crate::utils::error::{RelayError, Result};
