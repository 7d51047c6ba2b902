//! Score totals and the final ranking

use crate::core::{ActorId, ActorState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sum of every point card an actor holds, judged against the whole table
pub fn actor_score(actors: &[ActorState], actor: ActorId) -> i32 {
    actors[actor]
        .point_cards
        .iter()
        .map(|card| card.criterion.evaluate(actors, actor))
        .fold(0, i32::saturating_add)
}

/// One line of the final ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub actor: ActorId,
    pub score: i32,
    pub winner: bool,
}

/// Final scores, best first
///
/// Equal scores keep seat order. Every actor tied at the top score is a
/// winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    standings: Vec<Standing>,
}

impl Ranking {
    /// Rank every actor at the table
    pub fn from_actors(actors: &[ActorState]) -> Self {
        let scores: Vec<i32> = (0..actors.len())
            .map(|actor| actor_score(actors, actor))
            .collect();
        Self::from_scores(&scores)
    }

    /// Rank precomputed scores indexed by seat
    pub fn from_scores(scores: &[i32]) -> Self {
        let top = scores.iter().copied().max();
        let mut standings: Vec<Standing> = scores
            .iter()
            .enumerate()
            .map(|(actor, &score)| Standing {
                actor,
                score,
                winner: Some(score) == top,
            })
            .collect();
        // sort_by is stable
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        Ranking { standings }
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn winners(&self) -> Vec<ActorId> {
        self.standings
            .iter()
            .filter(|s| s.winner)
            .map(|s| s.actor)
            .collect()
    }

    pub fn top_score(&self) -> Option<i32> {
        self.standings.first().map(|s| s.score)
    }

    pub fn score_of(&self, actor: ActorId) -> Option<i32> {
        self.standings
            .iter()
            .find(|s| s.actor == actor)
            .map(|s| s.score)
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Final scores ----")?;
        for standing in &self.standings {
            write!(f, "Player {} with score {}", standing.actor, standing.score)?;
            if standing.winner {
                f.write_str(" Winner")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardIdentityId, VegetableType};
    use crate::loader::parse_criterion;

    fn holding(vegetables: [u32; 6], rules: &[&str]) -> ActorState {
        ActorState {
            vegetables,
            point_cards: rules
                .iter()
                .map(|rule| {
                    Card::new(
                        CardIdentityId::new(0),
                        VegetableType::Pepper,
                        parse_criterion(rule).unwrap(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_score_with_no_point_cards_is_zero() {
        let actors = vec![holding([3, 3, 3, 3, 3, 3], &[])];
        assert_eq!(actor_score(&actors, 0), 0);
    }

    #[test]
    fn test_ranking_ties_keep_seat_order() {
        let ranking = Ranking::from_scores(&[5, 9, 2, 9]);
        let order: Vec<_> = ranking.standings().iter().map(|s| s.actor).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(ranking.winners(), vec![1, 3]);
        assert_eq!(ranking.top_score(), Some(9));
        assert_eq!(ranking.score_of(2), Some(2));
    }

    #[test]
    fn test_ranking_text() {
        let ranking = Ranking::from_scores(&[4, 11, 11]);
        similar_asserts::assert_eq!(
            ranking.to_string(),
            "---- Final scores ----\n\
             Player 1 with score 11 Winner\n\
             Player 2 with score 11 Winner\n\
             Player 0 with score 4\n"
        );
    }

    #[test]
    fn test_huge_rules_saturate_instead_of_overflowing() {
        let actors = vec![holding(
            [2; 6],
            &["COMPLETE SET = 2000000000", "COMPLETE SET = 2000000000"],
        )];
        assert_eq!(actor_score(&actors, 0), i32::MAX);
        assert_eq!(Ranking::from_actors(&actors).top_score(), Some(i32::MAX));
    }

    #[test]
    fn test_negative_scores_rank_below_zero() {
        let actors = vec![
            holding([0, 0, 3, 0, 0, 0], &["-2 / CARROT"]),
            holding([0; 6], &[]),
        ];
        let ranking = Ranking::from_actors(&actors);
        assert_eq!(ranking.winners(), vec![1]);
        assert_eq!(ranking.score_of(0), Some(-6));
    }
}
