use crate::domain::model::{BlockContext, ExchangePayload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies observer identity, environment tag, and position at the moment a
/// block completes. In the game client this would query the live session; the
/// CLI host answers from configuration.
pub trait ContextSource: Send + Sync {
    fn block_context(&self) -> BlockContext;
}

/// Downstream collector for parsed exchanges. Delivery is best-effort; the
/// caller logs failures and never retries.
#[async_trait]
pub trait ExchangeSink: Send + Sync {
    async fn deliver(&self, payload: ExchangePayload) -> Result<()>;
}
