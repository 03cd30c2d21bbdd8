use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::card::{Card, CardId};

/// The persistence seam the refresh engine writes through. Each card is
/// transactionally independent; the engine only ever reads one card and
/// writes that card back.
pub trait CardStore: Send + Sync {
    fn get(&self, id: CardId) -> Option<Card>;
    fn put(&self, card: Card);
    fn remove(&self, id: CardId);
}

/// In-memory store used by tests and by hosts that keep cards elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: RwLock<HashMap<CardId, Card>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for seeding: stores the card and hands back its id.
    pub fn insert(&self, card: Card) -> CardId {
        let id = card.id;
        self.put(card);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CardStore for MemoryStore {
    fn get(&self, id: CardId) -> Option<Card> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn put(&self, card: Card) {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(card.id, card);
    }

    fn remove(&self, id: CardId) {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}
