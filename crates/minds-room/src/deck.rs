//! Deck construction.

use minds_protocol::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// The highest card value; decks are permutations of `1..=DECK_SIZE`.
pub const DECK_SIZE: u8 = 100;

/// Builds a uniformly shuffled deck of the integers `1..=100`.
pub fn shuffled_deck<R: Rng>(rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = (1..=DECK_SIZE).collect();
    deck.shuffle(rng);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_deck_is_a_bijection_over_1_to_100() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = shuffled_deck(&mut rng);
        assert_eq!(deck.len(), 100);

        let mut sorted = deck.clone();
        sorted.sort_unstable();
        let expected: Vec<Card> = (1..=100).collect();
        assert_eq!(sorted, expected, "every value exactly once");
    }

    #[test]
    fn test_shuffle_depends_on_seed() {
        let a = shuffled_deck(&mut StdRng::seed_from_u64(1));
        let b = shuffled_deck(&mut StdRng::seed_from_u64(1));
        let c = shuffled_deck(&mut StdRng::seed_from_u64(2));
        assert_eq!(a, b, "same seed, same permutation");
        assert_ne!(a, c, "different seed, different permutation");
    }
}
