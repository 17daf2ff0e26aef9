use crate::Generator;
use snip_core::ShortId;

/// The 64-character URL-safe alphabet identifiers are drawn from.
const ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9', '_', '-',
];

/// A generator drawing fixed-length identifiers from [`ALPHABET`] with a
/// cryptographically strong random source.
///
/// Candidates are unpredictable from prior outputs, so issued short links
/// cannot be enumerated by observing a few of them. Independence between
/// draws also keeps retry attempts uncorrelated after a collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    /// Creates a new random generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortId {
        // The alphabet and length match ShortId's own shape, so the
        // unchecked constructor is safe here.
        ShortId::new_unchecked(nanoid::format(
            nanoid::rngs::default,
            ALPHABET,
            ShortId::LENGTH,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_has_64_unique_characters() {
        assert_eq!(ALPHABET.len(), 64);
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), ALPHABET.len());
    }

    #[test]
    fn generated_ids_have_fixed_length() {
        let generator = RandomGenerator::new();
        let id = generator.generate();
        assert_eq!(id.as_str().len(), ShortId::LENGTH);
    }

    #[test]
    fn generated_ids_are_url_safe() {
        let generator = RandomGenerator::new();
        for _ in 0..100 {
            let id = generator.generate();
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in '{}'",
                id
            );
        }
    }

    #[test]
    fn generated_ids_pass_validation() {
        let generator = RandomGenerator::new();
        for _ in 0..100 {
            let id = generator.generate();
            assert!(ShortId::new(id.as_str()).is_ok());
        }
    }

    #[test]
    fn no_duplicates_across_many_draws() {
        let generator = RandomGenerator::new();
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            seen.insert(generator.generate());
        }

        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
