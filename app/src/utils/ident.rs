use std::future::Future;
use std::ops::RangeInclusive;

use rand::Rng;
use sea_orm::DbErr;
use thiserror::Error;

/// Collision retries before giving up. The suffix space is large relative to
/// expected row counts, so hitting this means something is very wrong.
pub const MAX_ATTEMPTS: u32 = 50;

#[derive(Debug, Error)]
pub enum IdentError {
    #[error("no free identifier with prefix '{prefix}' after {attempts} attempts")]
    Exhausted { prefix: String, attempts: u32 },

    #[error("uniqueness check failed: {0}")]
    Db(#[from] DbErr),
}

/// First two non-whitespace characters of the seed, uppercased.
pub fn derive_prefix(seed: &str) -> String {
    seed.chars()
        .filter(|c| !c.is_whitespace())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Uppercase initials of the first and last word of a name. A single-word
/// name doubles its initial.
pub fn derive_initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let first = parts.first().and_then(|part| part.chars().next());
    let last = parts.last().and_then(|part| part.chars().next());
    first
        .into_iter()
        .chain(last)
        .collect::<String>()
        .to_uppercase()
}

/// Rejection-sample `prefix` + random suffix from `digits` until `is_taken`
/// reports a free candidate.
pub async fn generate_id<F, Fut>(
    prefix: &str,
    digits: RangeInclusive<u32>,
    is_taken: F,
) -> Result<String, IdentError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, DbErr>>,
{
    for _ in 0..MAX_ATTEMPTS {
        let suffix = rand::thread_rng().gen_range(digits.clone());
        let candidate = format!("{}{}", prefix, suffix);
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    Err(IdentError::Exhausted {
        prefix: prefix.to_string(),
        attempts: MAX_ATTEMPTS,
    })
}
