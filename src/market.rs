//! Draw piles and the face-up market grid

use crate::core::Card;
use crate::{Result, SaladError};
use serde::{Deserialize, Serialize};

/// Number of draw piles (one per market column)
pub const PILE_COUNT: usize = 3;

/// Rows of face-up vegetable spots under each pile
pub const MARKET_ROWS: usize = 2;

/// A face-down stack of point cards; the top is the last element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawPile {
    pub cards: Vec<Card>,
}

impl DrawPile {
    pub fn new(cards: Vec<Card>) -> Self {
        DrawPile { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn draw_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn draw_bottom(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }
}

/// Draw piles plus the grid of vegetable spots they feed
///
/// Spots are laid out row by row (`column + row * columns`), so with three
/// piles spot `A` sits under pile 0, `B` under pile 1 and `D` is the second
/// card under pile 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    piles: Vec<DrawPile>,
    spots: Vec<Option<Card>>,
}

impl Market {
    /// Split `deck` into `pile_count` equal piles under a grid of `rows` rows
    ///
    /// Each column is fed by its own pile, so the spot count is always a
    /// multiple of the pile count.
    pub fn new(deck: Vec<Card>, pile_count: usize, rows: usize) -> Result<Self> {
        if pile_count == 0 || rows == 0 {
            return Err(SaladError::Config(
                "market needs at least one pile and one row".to_string(),
            ));
        }
        if deck.len() % pile_count != 0 {
            return Err(SaladError::Config(format!(
                "deck of {} cards cannot be split into {} equal piles",
                deck.len(),
                pile_count
            )));
        }
        let spot_count = pile_count * rows;
        let pile_size = deck.len() / pile_count;
        let piles = deck
            .chunks(pile_size.max(1))
            .map(|chunk| DrawPile::new(chunk.to_vec()))
            .chain(std::iter::repeat_with(DrawPile::default))
            .take(pile_count)
            .collect();

        Ok(Market {
            piles,
            spots: vec![None; spot_count],
        })
    }

    /// Standard 3 × 2 market
    pub fn standard(deck: Vec<Card>) -> Result<Self> {
        Self::new(deck, PILE_COUNT, MARKET_ROWS)
    }

    /// Number of columns, equal to the number of piles
    pub fn columns(&self) -> usize {
        self.piles.len()
    }

    pub fn rows(&self) -> usize {
        self.spots.len() / self.piles.len()
    }

    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }

    pub fn piles(&self) -> &[DrawPile] {
        &self.piles
    }

    pub fn pile(&self, index: usize) -> Option<&DrawPile> {
        self.piles.get(index)
    }

    /// Card lying in a spot, `None` if out of range or empty
    pub fn spot(&self, index: usize) -> Option<&Card> {
        self.spots.get(index).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.spot(index).is_some()
    }

    /// Indices of spots that currently hold a card
    pub fn occupied_spots(&self) -> impl Iterator<Item = usize> + '_ {
        self.spots
            .iter()
            .enumerate()
            .filter(|(_, spot)| spot.is_some())
            .map(|(i, _)| i)
    }

    pub fn top_point_card(&self, pile: usize) -> Option<&Card> {
        self.piles.get(pile).and_then(DrawPile::peek_top)
    }

    /// True once every draw pile is exhausted
    pub fn piles_empty(&self) -> bool {
        self.piles.iter().all(DrawPile::is_empty)
    }

    /// Total cards left across all piles
    pub fn cards_in_piles(&self) -> usize {
        self.piles.iter().map(DrawPile::len).sum()
    }

    /// Index of the pile with the most cards, lowest index on ties
    fn largest_pile(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, pile) in self.piles.iter().enumerate() {
            if pile.is_empty() {
                continue;
            }
            if best.map_or(true, |(_, len)| pile.len() > len) {
                best = Some((i, pile.len()));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Fill every empty spot
    ///
    /// Column by column, each empty spot takes the top card of its own pile.
    /// When that pile is exhausted it takes the bottom card of the largest
    /// remaining pile instead, so the grid stays full until every pile is
    /// empty at once.
    pub fn refill(&mut self) {
        let columns = self.columns();
        for column in 0..columns {
            for row in 0..self.rows() {
                let index = column + row * columns;
                if self.spots[index].is_some() {
                    continue;
                }
                let card = match self.piles[column].draw_top() {
                    Some(card) => card,
                    None => match self.largest_pile() {
                        Some(pile) => match self.piles[pile].draw_bottom() {
                            Some(card) => card,
                            None => return,
                        },
                        None => return,
                    },
                };
                self.spots[index] = Some(card);
            }
        }
    }

    /// Take the card from a spot for its vegetable
    ///
    /// Returns `None` when the spot is out of range or already empty.
    pub fn take_vegetables(&mut self, spot: usize) -> Option<Card> {
        self.spots.get_mut(spot).and_then(Option::take)
    }

    /// Pop the top card of a pile for its point side
    pub fn take_point_card(&mut self, pile: usize) -> Option<Card> {
        self.piles.get_mut(pile).and_then(DrawPile::draw_top)
    }

    /// Letter shown to players for a spot index, `'?'` past `'Z'`
    pub fn spot_letter(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .filter(|i| *i < 26)
            .map_or('?', |i| char::from(b'A' + i))
    }
}
