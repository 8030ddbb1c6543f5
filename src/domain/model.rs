use serde::Serialize;

/// Constant tag identifying this ingestion path on the wire.
pub const LOC_SRC: &str = "chat_relay";

/// Default environment tag when the host cannot report one.
pub const DEFAULT_DIMENSION: &str = "minecraft:overworld";

/// Observer block coordinates at the moment a block completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// A fully delimited multi-line exchange report, produced once by the
/// aggregator and consumed once by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedBlock {
    text: String,
}

impl CompletedBlock {
    /// Joins buffered lines and trims the block as a whole, the same way the
    /// aggregated chat message is flattened before parsing.
    pub fn from_lines(lines: &[String]) -> Self {
        Self {
            text: lines.join("\n").trim().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Host context fetched at block-completion time.
#[derive(Debug, Clone)]
pub struct BlockContext {
    pub observer: String,
    pub dimension: String,
    pub position: Position,
}

/// One parsed input-for-output trade, immutable once constructed.
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub player: String,
    pub dimension: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub input_item_id: String,
    pub input_qty: u32,
    pub output_item_id: String,
    pub output_qty: u32,
    pub exchange_possible: u32,
    pub raw: String,
    pub hash_id: String,
    pub compacted_input: bool,
    pub compacted_output: bool,
    /// Raw lines naming enchantments on the traded item. Parsed and kept on
    /// the record, but not part of the wire payload (matches the collector's
    /// current contract).
    pub enchantments: Vec<String>,
}

/// Wire object POSTed to the collector. Field order matches the backend's
/// expected JSON shape; `ts` is stamped at send time, not parse time.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangePayload {
    pub ts: String,
    pub player: String,
    pub dimension: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub loc_src: String,
    pub input_item_id: String,
    pub input_qty: u32,
    pub output_item_id: String,
    pub output_qty: u32,
    pub exchange_possible: u32,
    pub raw: String,
    pub hash_id: String,
    pub compacted_input: bool,
    pub compacted_output: bool,
}

impl ExchangePayload {
    pub fn from_record(record: ExchangeRecord, ts: String) -> Self {
        Self {
            ts,
            player: record.player,
            dimension: record.dimension,
            x: record.x,
            y: record.y,
            z: record.z,
            loc_src: LOC_SRC.to_string(),
            input_item_id: record.input_item_id,
            input_qty: record.input_qty,
            output_item_id: record.output_item_id,
            output_qty: record.output_qty,
            exchange_possible: record.exchange_possible,
            raw: record.raw,
            hash_id: record.hash_id,
            compacted_input: record.compacted_input,
            compacted_output: record.compacted_output,
        }
    }
}
