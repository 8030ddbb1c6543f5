use crate::domain::model::{BlockContext, Position, DEFAULT_DIMENSION};
use crate::domain::ports::ContextSource;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "exchange-relay")]
#[command(about = "Relays exchange reports from a chat line feed to a collector backend")]
pub struct CliConfig {
    /// Base URL of the collector backend.
    #[arg(long, default_value = "http://localhost:5000")]
    pub backend_url: String,

    /// Observer identity reported with each exchange.
    #[arg(long, default_value = "observer")]
    pub player: String,

    /// Environment tag reported with each exchange.
    #[arg(long, default_value = DEFAULT_DIMENSION)]
    pub dimension: String,

    /// Observer block coordinates.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub x: i32,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub y: i32,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub z: i32,

    /// Bound on the in-flight delivery queue; records beyond it are dropped.
    #[arg(long, default_value = "64")]
    pub queue_capacity: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("backend_url", &self.backend_url)?;
        validation::validate_non_empty("player", &self.player)?;
        validation::validate_non_empty("dimension", &self.dimension)?;
        validation::validate_positive_number("queue_capacity", self.queue_capacity, 1)?;
        Ok(())
    }
}

// The CLI host has no live game session to query, so block context is fixed
// at startup from the flags.
impl ContextSource for CliConfig {
    fn block_context(&self) -> BlockContext {
        BlockContext {
            observer: self.player.clone(),
            dimension: self.dimension.clone(),
            position: Position::new(self.x, self.y, self.z),
        }
    }
}
