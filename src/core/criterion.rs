//! Scoring rules attached to point cards
//!
//! A `Criterion` is the parsed form of one rule string from the manifest
//! (see `loader::criteria` for the parser). Evaluation is a pure function of
//! the actors' vegetable counts, so it is safe to call on live state, on
//! display snapshots and on the bots' scratch copies alike.

use crate::core::{ActorId, ActorState, VegetableType, VEGETABLE_TYPES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// `MOST <VEG> = N`
    Most { vegetable: VegetableType, points: i32 },
    /// `FEWEST <VEG> = N`
    Fewest { vegetable: VegetableType, points: i32 },
    /// `<VEG>: EVEN=N, ODD=N`
    EvenOdd {
        vegetable: VegetableType,
        even: i32,
        odd: i32,
    },
    /// `N / <VEG>, N / <VEG>, ...`, weights indexed by vegetable
    PerVegetable { weights: [i32; VEGETABLE_TYPES] },
    /// `<VEG> + <VEG> + ... = N`, multiplicity of each vegetable in the set
    SumOfSet {
        required: [u32; VEGETABLE_TYPES],
        points: i32,
    },
    /// `MOST TOTAL VEGETABLE = N`
    MostTotal { points: i32 },
    /// `FEWEST TOTAL VEGETABLE = N`
    FewestTotal { points: i32 },
    /// `N / VEGETABLE TYPE >= T`
    PerTypeAtLeast { threshold: i32, points: i32 },
    /// `N / MISSING VEGETABLE TYPE`
    PerMissingType { points: i32 },
    /// `COMPLETE SET = N`
    CompleteSet { points: i32 },
}

impl Criterion {
    /// Points this rule awards to `actor` given every actor's holdings
    pub fn evaluate(&self, actors: &[ActorState], actor: ActorId) -> i32 {
        let counts = &actors[actor].vegetables;
        match *self {
            Criterion::Most { vegetable, points } => {
                award_if(leader(actors, vegetable, |c, best| c > best) == Some(actor), points)
            }
            Criterion::Fewest { vegetable, points } => {
                award_if(leader(actors, vegetable, |c, best| c < best) == Some(actor), points)
            }
            Criterion::EvenOdd {
                vegetable,
                even,
                odd,
            } => {
                if counts[vegetable.index()] % 2 == 0 {
                    even
                } else {
                    odd
                }
            }
            Criterion::PerVegetable { weights } => counts
                .iter()
                .zip(weights.iter())
                .map(|(&count, &weight)| scaled(u64::from(count), weight))
                .fold(0, i32::saturating_add),
            Criterion::SumOfSet { required, points } => {
                let sets = required
                    .iter()
                    .zip(counts.iter())
                    .filter(|&(&needed, _)| needed > 0)
                    .map(|(&needed, &count)| count / needed)
                    .min()
                    .unwrap_or(0);
                scaled(u64::from(sets), points)
            }
            Criterion::MostTotal { points } => {
                let mine = actors[actor].total();
                let beats_all = actors
                    .iter()
                    .enumerate()
                    .filter(|(id, _)| *id != actor)
                    .all(|(_, other)| other.total() < mine);
                award_if(beats_all, points)
            }
            Criterion::FewestTotal { points } => {
                let mine = actors[actor].total();
                let beats_all = actors
                    .iter()
                    .enumerate()
                    .filter(|(id, _)| *id != actor)
                    .all(|(_, other)| other.total() > mine);
                award_if(beats_all, points)
            }
            Criterion::PerTypeAtLeast { threshold, points } => {
                let types = counts
                    .iter()
                    .filter(|&&c| i64::from(c) >= i64::from(threshold))
                    .count();
                scaled(types as u64, points)
            }
            Criterion::PerMissingType { points } => {
                let missing = counts.iter().filter(|&&c| c == 0).count();
                scaled(missing as u64, points)
            }
            Criterion::CompleteSet { points } => {
                let sets = counts.iter().copied().min().unwrap_or(0);
                scaled(u64::from(sets), points)
            }
        }
    }
}

/// `count × points`, saturating at the `i32` range
fn scaled(count: u64, points: i32) -> i32 {
    i32::try_from(count)
        .unwrap_or(i32::MAX)
        .saturating_mul(points)
}

fn award_if(condition: bool, points: i32) -> i32 {
    if condition {
        points
    } else {
        0
    }
}

/// First actor in seat order holding the extreme count of `vegetable`
///
/// `better(candidate, best)` must be strict, so ties keep the earlier seat.
fn leader(
    actors: &[ActorState],
    vegetable: VegetableType,
    better: impl Fn(u32, u32) -> bool,
) -> Option<ActorId> {
    let mut best: Option<(ActorId, u32)> = None;
    for (id, state) in actors.iter().enumerate() {
        let count = state.vegetables[vegetable.index()];
        if best.map_or(true, |(_, current)| better(count, current)) {
            best = Some((id, count));
        }
    }
    best.map(|(id, _)| id)
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Criterion::Most { vegetable, points } => write!(f, "MOST {vegetable} = {points}"),
            Criterion::Fewest { vegetable, points } => write!(f, "FEWEST {vegetable} = {points}"),
            Criterion::EvenOdd {
                vegetable,
                even,
                odd,
            } => write!(f, "{vegetable}: EVEN={even}, ODD={odd}"),
            Criterion::PerVegetable { weights } => {
                let mut first = true;
                for veg in VegetableType::ALL {
                    let weight = weights[veg.index()];
                    if weight == 0 {
                        continue;
                    }
                    if !first {
                        f.write_str(", ")?;
                    }
                    write!(f, "{weight} / {veg}")?;
                    first = false;
                }
                if first {
                    write!(f, "0 / {}", VegetableType::Pepper)?;
                }
                Ok(())
            }
            Criterion::SumOfSet { required, points } => {
                let mut first = true;
                for veg in VegetableType::ALL {
                    for _ in 0..required[veg.index()] {
                        if !first {
                            f.write_str(" + ")?;
                        }
                        write!(f, "{veg}")?;
                        first = false;
                    }
                }
                write!(f, " = {points}")
            }
            Criterion::MostTotal { points } => write!(f, "MOST TOTAL VEGETABLE = {points}"),
            Criterion::FewestTotal { points } => write!(f, "FEWEST TOTAL VEGETABLE = {points}"),
            Criterion::PerTypeAtLeast { threshold, points } => {
                write!(f, "{points} / VEGETABLE TYPE >= {threshold}")
            }
            Criterion::PerMissingType { points } => write!(f, "{points} / MISSING VEGETABLE TYPE"),
            Criterion::CompleteSet { points } => write!(f, "COMPLETE SET = {points}"),
        }
    }
}
