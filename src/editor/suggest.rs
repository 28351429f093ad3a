//! Writing-tip suggestions. Today this is a uniform random pick from a fixed
//! list; the trait takes the draft lyrics so a real analyzer can replace the
//! canned picker later without touching the editor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The canned writing tips. Never persisted anywhere; a tip is shown in a
/// banner and forgotten.
pub const SUGGESTIONS: [&str; 5] = [
    "Try adding a bridge that contrasts with your verse melody",
    "Consider using internal rhymes to add complexity",
    "This line could benefit from more concrete imagery",
    "The emotional arc could be strengthened in the chorus",
    "Try varying your syllable count for better rhythm",
];

/// Produces one writing tip for the given lyrics.
pub trait SuggestionProvider {
    fn suggest(&mut self, lyrics: &str) -> String;
}

/// The shipped provider: ignores the lyrics and picks uniformly from
/// [`SUGGESTIONS`].
pub struct CannedSuggestions {
    rng: StdRng,
}

impl CannedSuggestions {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic picker for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for CannedSuggestions {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionProvider for CannedSuggestions {
    fn suggest(&mut self, _lyrics: &str) -> String {
        SUGGESTIONS[self.rng.gen_range(0..SUGGESTIONS.len())].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_come_from_the_canned_list() {
        let mut provider = CannedSuggestions::new();
        for _ in 0..50 {
            let tip = provider.suggest("la la la");
            assert!(SUGGESTIONS.contains(&tip.as_str()));
        }
    }

    #[test]
    fn seeded_providers_repeat_their_picks() {
        let mut a = CannedSuggestions::seeded(42);
        let mut b = CannedSuggestions::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.suggest(""), b.suggest(""));
        }
    }

    #[test]
    fn picks_are_not_constant_over_many_draws() {
        // With 200 draws from 5 options, a working uniform picker produces
        // more than one distinct tip.
        let mut provider = CannedSuggestions::seeded(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(provider.suggest(""));
        }
        assert!(seen.len() > 1);
    }
}
