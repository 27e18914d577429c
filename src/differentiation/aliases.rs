use crate::differentiation::{Identity, Index};

use std::collections::HashMap;

/**
 * Records, for every variable identity, the leaves which hold that variable: the original
 * leaf first, followed by each copy made of it when it was used as an operand.
 *
 * Entries only reference nodes, they never own them. The registry is never pruned while the
 * graph is alive and is dropped along with the graph's nodes.
 */
#[derive(Debug, Default)]
pub(crate) struct AliasRegistry {
    aliases: HashMap<Identity, Vec<Index>>,
}

impl AliasRegistry {
    pub(crate) fn new() -> AliasRegistry {
        AliasRegistry::default()
    }

    /**
     * Starts the entry for a newly created variable, holding only its original leaf.
     */
    pub(crate) fn register_origin(&mut self, identity: Identity, index: Index) {
        self.aliases.insert(identity, vec![index]);
    }

    /**
     * Adds a copy to the entry of the variable it was made from.
     */
    pub(crate) fn register(&mut self, identity: Identity, index: Index) {
        self.aliases.entry(identity).or_default().push(index);
    }

    /**
     * Every leaf registered under the identity, None if the identity has no entry.
     */
    pub(crate) fn aliases(&self, identity: Identity) -> Option<&[Index]> {
        self.aliases.get(&identity).map(Vec::as_slice)
    }
}
