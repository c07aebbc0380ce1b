use crate::utils::error::{GameError, Result};
use rand::Rng;
use std::collections::HashMap;

/// The shipped 8-symbol visual vocabulary.
pub const CARD_FACES: [char; 8] = ['🍎', '🍊', '🍇', '🍉', '🥝', '🍓', '🍍', '🍑'];

/// An immutable board layout: each symbol appears exactly twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    faces: Vec<char>,
}

impl Deck {
    /// Duplicate each symbol and shuffle the pairs with `rng`. Every
    /// permutation of the resulting multiset is equally likely.
    pub fn generate<R: Rng>(faces: &[char], rng: &mut R) -> Self {
        let mut cards: Vec<char> = faces.iter().chain(faces.iter()).copied().collect();

        // Fisher-Yates shuffle
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }

        Self { faces: cards }
    }

    /// Build a deck from an explicit layout; rejects anything that is not
    /// an exact two-of-each pairing.
    pub fn from_faces(faces: Vec<char>) -> Result<Self> {
        if faces.len() % 2 != 0 {
            return Err(GameError::ValidationError {
                message: format!("deck length must be even, got {}", faces.len()),
            });
        }

        let mut counts: HashMap<char, usize> = HashMap::new();
        for face in &faces {
            *counts.entry(*face).or_insert(0) += 1;
        }
        if let Some((face, count)) = counts.iter().find(|(_, &count)| count != 2) {
            return Err(GameError::ValidationError {
                message: format!("symbol {} appears {} times, expected 2", face, count),
            });
        }

        Ok(Self { faces })
    }

    pub(crate) fn empty() -> Self {
        Self { faces: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.faces.len() / 2
    }

    pub fn face(&self, position: usize) -> Option<char> {
        self.faces.get(position).copied()
    }

    pub fn faces(&self) -> &[char] {
        &self.faces
    }
}
