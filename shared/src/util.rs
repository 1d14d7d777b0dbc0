//! Identifiers and clocks

use rand::Rng;

/// 2024-01-01 00:00:00 UTC
pub const ID_EPOCH_MS: i64 = 1_704_067_200_000;

const TIMESTAMP_MASK: i64 = (1 << 41) - 1;
const RANDOM_BITS: u32 = 12;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Entity id for an entity created at `now_ms`.
///
/// 41 bits of milliseconds since [`ID_EPOCH_MS`] followed by 12 random bits,
/// so ids stay below 2^53 and sort roughly by creation time.
pub fn snowflake_id_at(now_ms: i64) -> i64 {
    let ts = (now_ms - ID_EPOCH_MS) & TIMESTAMP_MASK;
    let random: i64 = rand::thread_rng().gen_range(0..(1 << RANDOM_BITS));
    (ts << RANDOM_BITS) | random
}

pub fn snowflake_id() -> i64 {
    snowflake_id_at(now_millis())
}

/// Random decimal code of `digits` digits without a leading zero
pub fn numeric_code(digits: u32) -> String {
    let low = 10_u64.pow(digits.saturating_sub(1));
    let high = 10_u64.pow(digits);
    rand::thread_rng().gen_range(low..high).to_string()
}
