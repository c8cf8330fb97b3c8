use anyhow::Result;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

const CHARACTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Uppercase alphanumeric string, used for human-facing reference suffixes.
pub fn generate_random_string(length: usize) -> Result<String> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    let mut rng = StdRng::from_seed(seed);

    let s = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARACTERS.len());
            CHARACTERS[idx] as char
        })
        .collect();

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_uppercase_alphanumerics_of_requested_length() {
        let value = generate_random_string(6).expect("os rng available");

        assert_eq!(value.len(), 6);
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
