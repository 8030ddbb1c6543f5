use crate::domain::model::{BlockContext, CompletedBlock, ExchangeRecord};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Closed set of enchantment names that can appear on a traded item, spanning
/// armor, weapon, tool, and trident enchantments.
const ENCHANTMENT_LIST: &[&str] = &[
    "Mending",
    "Unbreaking",
    "Curse of Vanishing",
    "Aqua Affinity",
    "Blast Protection",
    "Curse of Binding",
    "Depth Strider",
    "Feather Falling",
    "Fire Protection",
    "Frost Walker",
    "Projectile Protection",
    "Protection",
    "Respiration",
    "Soul Speed",
    "Thorns",
    "Swift Sneak",
    "Bane of Arthropods",
    "Breach",
    "Density",
    "Efficiency",
    "Fire Aspect",
    "Looting",
    "Impaling",
    "Knockback",
    "Sharpness",
    "Smite",
    "Sweeping Edge",
    "Wind Burst",
    "Channeling",
    "Flame",
    "Infinity",
    "Loyalty",
    "Riptide",
    "Multishot",
    "Piercing",
    "Power",
    "Punch",
    "Quick Charge",
    "Fortune",
    "Luck of the Sea",
    "Lure",
    "Silk Touch",
];

/// Parses a completed block into at most one [`ExchangeRecord`].
///
/// Stateless per call; the compiled patterns are the only thing a value of
/// this type carries, so it can be shared freely.
pub struct ExchangeExtractor {
    available_re: Regex,
    input_re: Regex,
    output_re: Regex,
}

impl ExchangeExtractor {
    pub fn new() -> Self {
        Self {
            available_re: Regex::new(r"(\d+) exchanges available").unwrap(),
            input_re: Regex::new(r"Input: (\d+) (.+)").unwrap(),
            output_re: Regex::new(r"Output: (\d+) (.+)").unwrap(),
        }
    }

    /// Scans every line of the block, accumulating state as it goes. A record
    /// is produced only if an output line was captured; anything else is a
    /// valid "nothing to report" outcome, never an error.
    pub fn extract(&self, block: &CompletedBlock, ctx: &BlockContext) -> Option<ExchangeRecord> {
        let mut exchanges_available: u32 = 0;
        let mut current_input: Option<String> = None;
        let mut current_input_qty: u32 = 0;
        let mut current_output: Option<String> = None;
        let mut current_output_qty: u32 = 0;
        let mut enchantments: Vec<String> = Vec::new();

        for raw_line in block.lines() {
            let line = raw_line.trim();

            if let Some(caps) = self.available_re.captures(line) {
                if let Ok(n) = caps[1].parse() {
                    exchanges_available = n;
                }
            } else if line.starts_with("Input:") {
                if let Some(caps) = self.input_re.captures(line) {
                    if let Ok(qty) = caps[1].parse() {
                        current_input_qty = qty;
                        current_input = Some(caps[2].trim().to_string());
                    }
                }
            } else if line.starts_with("Output:") && current_input.is_some() {
                if let Some(caps) = self.output_re.captures(line) {
                    if let Ok(qty) = caps[1].parse() {
                        current_output_qty = qty;
                        current_output = Some(caps[2].trim().to_string());
                    }
                }
            }

            // Enchantment candidacy is checked on every line, independently
            // of the classifications above. The original (untrimmed) line is
            // what gets recorded.
            if is_enchantment_line(line) {
                enchantments.push(raw_line.to_string());
            }
        }

        let output = current_output?;
        let input = current_input.unwrap_or_default();

        let hash_id = hash_id(
            &ctx.observer,
            ctx.position.x,
            ctx.position.y,
            ctx.position.z,
            &input,
            current_input_qty,
            &output,
            current_output_qty,
        );

        let record = ExchangeRecord {
            player: ctx.observer.clone(),
            dimension: ctx.dimension.clone(),
            x: ctx.position.x,
            y: ctx.position.y,
            z: ctx.position.z,
            compacted_input: is_compacted_item(&input),
            compacted_output: is_compacted_item(&output),
            input_item_id: input,
            input_qty: current_input_qty,
            output_item_id: output,
            output_qty: current_output_qty,
            exchange_possible: exchanges_available,
            raw: block.as_str().to_string(),
            hash_id,
            enchantments,
        };

        tracing::info!(
            "Parsed exchange: {} {} -> {} {}",
            record.input_qty,
            record.input_item_id,
            record.output_qty,
            record.output_item_id
        );

        Some(record)
    }
}

impl Default for ExchangeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A line names an enchantment if, after stripping an optional trailing
/// integer level token, the remainder exactly matches a known name.
fn is_enchantment_line(trimmed: &str) -> bool {
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(last) = parts.last() else {
        return false;
    };

    let name = if last.parse::<i64>().is_ok() {
        parts[..parts.len() - 1].join(" ")
    } else {
        trimmed.to_string()
    };

    ENCHANTMENT_LIST.contains(&name.as_str())
}

/// Bulk-form packaging of a base resource: "block of", compressed, compacted.
pub fn is_compacted_item(item_name: &str) -> bool {
    let lower = item_name.to_lowercase();
    lower.contains("block") || lower.contains("compressed") || lower.contains("compact")
}

/// Deterministic dedup key for a trade: SHA-256 over the eight identifying
/// fields, first 16 hex chars. Two identical trades at the same spot by the
/// same observer collide on purpose.
#[allow(clippy::too_many_arguments)]
pub fn hash_id(
    player: &str,
    x: i32,
    y: i32,
    z: i32,
    input_item: &str,
    input_qty: u32,
    output_item: &str,
    output_qty: u32,
) -> String {
    let data = format!(
        "{}_{}_{}_{}_{}_{}_{}_{}",
        player, x, y, z, input_item, input_qty, output_item, output_qty
    );
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..16].to_string()
}
