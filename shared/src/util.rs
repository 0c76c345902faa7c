/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at loyalty scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate an unguessable redemption code (bearer credential).
///
/// 32 random bytes, hex-encoded, 256 bits of entropy. The code is what
/// staff scan to confirm a redemption, so it must not be predictable
/// from the session ID or timestamps.
pub fn redemption_code() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let ids: HashSet<i64> = (0..64).map(|_| snowflake_id()).collect();
        assert!(ids.iter().all(|&id| id > 0));
        // Random low bits make same-millisecond collisions unlikely;
        // 64 draws should essentially never collide.
        assert!(ids.len() >= 60);
    }

    #[test]
    fn redemption_code_is_64_hex_chars() {
        let code = redemption_code();
        assert_eq!(code.len(), 64);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(code, redemption_code());
    }
}
