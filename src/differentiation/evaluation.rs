use crate::differentiation::functions::BinaryOperation;
use crate::differentiation::{Index, Node, Operation, Primitive};
use crate::errors::{Error, Result};
use crate::numeric::extra::Real;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/**
 * The nodes reachable from a root, and how many parent edges point at each of them from
 * within that subgraph.
 *
 * Only the reachable nodes are stored, so building one for a small expression on a large
 * graph costs the size of the expression.
 */
#[derive(Debug)]
pub(crate) struct Reachable {
    indexes: Vec<Index>,
    parents: HashMap<Index, usize>,
}

impl Reachable {
    pub(crate) fn from<T>(nodes: &[Node<T>], root: Index) -> Reachable {
        let mut parents = HashMap::new();
        parents.insert(root, 0);
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            // each node is pushed once, so each edge is counted once
            let mut visit = |child: Index| match parents.entry(child) {
                Entry::Occupied(mut count) => *count.get_mut() += 1,
                Entry::Vacant(count) => {
                    count.insert(1);
                    stack.push(child);
                }
            };
            match nodes[index].operation {
                Operation::Leaf { .. } => (),
                Operation::Unary(_, operand) => visit(operand),
                Operation::Binary(_, left, right) => {
                    visit(left);
                    visit(right);
                }
            }
        }
        let mut indexes: Vec<Index> = parents.keys().copied().collect();
        indexes.sort_unstable();
        Reachable { indexes, parents }
    }

    /**
     * The reachable indexes in ascending order, so every node comes after its operands.
     */
    pub(crate) fn indexes(&self) -> impl DoubleEndedIterator<Item = Index> + '_ {
        self.indexes.iter().copied()
    }

    pub(crate) fn count(&self) -> usize {
        self.indexes.len()
    }

    /**
     * The number of parent edges pointing at the node from within the subgraph, 0 for the
     * root and for nodes outside of it.
     */
    pub(crate) fn parents(&self, index: Index) -> usize {
        self.parents.get(&index).copied().unwrap_or(0)
    }
}

/**
 * Computes the value of every node reachable from the root, in one sweep from the leaves
 * upwards. Values are only kept for the duration of the call.
 */
pub(crate) fn forward<T>(nodes: &[Node<T>], reachable: &Reachable) -> Result<HashMap<Index, T>>
where
    T: Real + Primitive,
{
    let mut values = HashMap::with_capacity(reachable.count());
    for index in reachable.indexes() {
        let value = match &nodes[index].operation {
            Operation::Leaf { value, .. } => value.clone(),
            Operation::Unary(operation, operand) => {
                operation.function(computed(&values, *operand))
            }
            Operation::Binary(operation, left, right) => {
                let x = computed(&values, *left);
                let y = computed(&values, *right);
                if *operation == BinaryOperation::Division && y == T::zero() {
                    return Err(Error::DivisionByZero);
                }
                operation.function(x, y)
            }
        };
        values.insert(index, value);
    }
    Ok(values)
}

/**
 * Returns the value of an operand computed earlier in the same sweep.
 */
pub(crate) fn computed<T: Clone>(values: &HashMap<Index, T>, index: Index) -> T {
    match values.get(&index) {
        Some(value) => value.clone(),
        None => unreachable!("operands are always evaluated before the nodes using them"),
    }
}

/**
 * Evaluates the node at the root index from the current values of its leaves.
 */
pub(crate) fn evaluate<T>(nodes: &[Node<T>], root: Index) -> Result<T>
where
    T: Real + Primitive,
{
    let reachable = Reachable::from(nodes, root);
    let values = forward(nodes, &reachable)?;
    Ok(computed(&values, root))
}
