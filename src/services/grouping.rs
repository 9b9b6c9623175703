//! Clustering of records into evolution-line groups.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::models::ScoredPokemon;

/// Key of one display group: a shared evolution chain, or a standalone record
/// keyed by its own catalog id. The two variants are separate namespaces, so
/// a standalone key can never collide with a real chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Chain(i64),
    Standalone(i64),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Chain(id) => write!(f, "{id}"),
            GroupKey::Standalone(id) => write!(f, "ind_{id}"),
        }
    }
}

pub type Group = (GroupKey, Vec<ScoredPokemon>);

/// Partitions records into groups.
///
/// Records sharing an evolution chain id land in one group; each chain-less
/// record becomes its own singleton. Groups appear in the order their first
/// member was encountered and members keep their input order; nothing in
/// this system reorders within a group.
pub fn group_by_chain(records: Vec<ScoredPokemon>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let key = match record.pokemon.evolution_chain_id {
            Some(chain_id) => GroupKey::Chain(chain_id),
            None => GroupKey::Standalone(record.pokemon.pokemon_id),
        };
        match positions.entry(key) {
            Entry::Occupied(position) => groups[*position.get()].1.push(record),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    groups
}
