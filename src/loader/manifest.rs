//! Card manifest loader (.json format)
//!
//! The manifest lists card identities. Each identity carries one rule string
//! per vegetable type; the rule used on a card is the one matching the
//! vegetable that card is dealt with. Every rule is parsed up front so a
//! malformed entry stops the load instead of silently dropping a card.

use crate::core::{CardIdentityId, Criterion, VegetableType, VEGETABLE_TYPES};
use crate::loader::criteria::parse_criterion;
use crate::{Result, SaladError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Manifest bundled with the crate (18 identities, enough for six actors)
pub const BUILTIN_MANIFEST: &str = include_str!("../../data/pointsalad_manifest.json");

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(alias = "Cards")]
    cards: Vec<RawCard>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(alias = "Id", default)]
    id: Option<u32>,
    #[serde(alias = "Criteria")]
    criteria: BTreeMap<VegetableType, String>,
}

/// One manifest entry with its six parsed rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    pub id: CardIdentityId,
    /// Rules indexed by `VegetableType::index`
    pub rules: [Criterion; VEGETABLE_TYPES],
}

impl CardIdentity {
    pub fn rule(&self, vegetable: VegetableType) -> Criterion {
        self.rules[vegetable.index()]
    }
}

/// Parsed card manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    identities: Vec<CardIdentity>,
}

impl Manifest {
    /// Load a manifest from a .json file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Manifest compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_MANIFEST)
    }

    /// Parse a manifest from its JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(content)?;
        if raw.cards.is_empty() {
            return Err(SaladError::Manifest("manifest lists no cards".to_string()));
        }

        let identities = raw
            .cards
            .into_iter()
            .enumerate()
            .map(|(index, card)| Self::parse_card(index, card))
            .collect::<Result<Vec<_>>>()?;

        Ok(Manifest { identities })
    }

    fn parse_card(index: usize, card: RawCard) -> Result<CardIdentity> {
        let id = u16::try_from(index)
            .map(CardIdentityId::new)
            .map_err(|_| SaladError::Manifest(format!("too many cards (entry {index})")))?;
        let label = card.id.map_or_else(|| format!("#{index}"), |id| id.to_string());

        let mut rules = Vec::with_capacity(VEGETABLE_TYPES);
        for vegetable in VegetableType::ALL {
            let text = card.criteria.get(&vegetable).ok_or_else(|| {
                SaladError::Manifest(format!("card {label} has no {vegetable} rule"))
            })?;
            let criterion = parse_criterion(text).map_err(|source| SaladError::InvalidRule {
                card: label.clone(),
                vegetable,
                source,
            })?;
            rules.push(criterion);
        }

        let rules: [Criterion; VEGETABLE_TYPES] = rules
            .try_into()
            .map_err(|_| SaladError::Manifest(format!("card {label} has a wrong rule count")))?;
        Ok(CardIdentity { id, rules })
    }

    /// Build a manifest directly from parsed identities
    pub fn from_identities(identities: Vec<CardIdentity>) -> Self {
        Manifest { identities }
    }

    pub fn identities(&self) -> &[CardIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
