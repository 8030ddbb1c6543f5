pub mod aggregator;
pub mod extractor;
pub mod relay;

pub use crate::domain::model::{BlockContext, CompletedBlock, ExchangePayload, ExchangeRecord};
pub use crate::domain::ports::{ContextSource, ExchangeSink};
pub use crate::utils::error::Result;
