use rand::Rng;
use std::collections::HashSet;

pub const LUCKY_NUMBER_MIN: u32 = 10_000;
pub const LUCKY_NUMBER_MAX: u32 = 99_999;

/// 单次报名最多尝试次数, 超过则放弃 (号码空间 90000)
pub const MAX_LUCKY_NUMBER_ATTEMPTS: usize = 100;

/// 生成5位数字幸运号码
pub fn generate_lucky_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(LUCKY_NUMBER_MIN..=LUCKY_NUMBER_MAX).to_string()
}

/// Rejection sampling against the numbers already taken in a draw.
/// Returns `None` once `max_attempts` draws all collided.
pub fn generate_unique_lucky_number<R: Rng + ?Sized>(
    rng: &mut R,
    taken: &HashSet<String>,
    max_attempts: usize,
) -> Option<String> {
    (0..max_attempts)
        .map(|_| generate_lucky_number(rng))
        .find(|candidate| !taken.contains(candidate))
}
