/*!
 * Reverse mode gradient propagation.
 *
 * A pass seeds the root with a gradient of 1 and pushes each node's gradient down to its
 * operands using the local derivative of the node's operation. A composite node can be the
 * operand of several parents, so before a pass the parent edges of every reachable node are
 * counted, and a node only propagates onwards once every one of its parents has deposited
 * its contribution into it.
 */

use crate::differentiation::evaluation::{computed, forward, Reachable};
use crate::differentiation::{Graph, Gradients, Identity, Index, Node, Operation, Primitive};
use crate::errors::Result;
use crate::numeric::extra::Real;

use std::collections::{BTreeMap, HashMap};

pub(crate) fn differentiate<T>(graph: &Graph<T>, root: Index) -> Result<Gradients<T>>
where
    T: Real + Primitive,
{
    // Everything that can fail happens before any gradient is written
    let (reachable, values, leaves) = graph.borrow(|nodes| -> Result<_> {
        let reachable = Reachable::from(nodes, root);
        let values = forward(nodes, &reachable)?;
        let leaves: BTreeMap<Identity, Option<String>> = reachable
            .indexes()
            .filter_map(|index| match &nodes[index].operation {
                Operation::Leaf {
                    identity, label, ..
                } => Some((*identity, label.clone())),
                _ => None,
            })
            .collect();
        Ok((reachable, values, leaves))
    })?;

    let gradients: BTreeMap<Identity, (Option<String>, T)> = graph.borrow_mut(|nodes, aliases| {
        // Reset, including copies of the same variables which sit outside of this
        // expression, so the totals only reflect this pass.
        for index in reachable.indexes() {
            nodes[index].gradient = T::zero();
        }
        for identity in leaves.keys() {
            for &index in aliases.aliases(*identity).unwrap_or(&[]) {
                nodes[index].gradient = T::zero();
            }
        }

        nodes[root].gradient = T::one();

        let mut arrivals: HashMap<Index, usize> = HashMap::with_capacity(reachable.count());
        let mut ready = vec![root];
        while let Some(index) = ready.pop() {
            let gradient = nodes[index].gradient.clone();
            let mut deposit = |nodes: &mut Vec<Node<T>>, child: Index, contribution: T| {
                accumulate(nodes, child, contribution);
                let arrived = arrivals.entry(child).or_insert(0);
                *arrived += 1;
                if *arrived == reachable.parents(child) {
                    ready.push(child);
                }
            };
            match nodes[index].operation {
                Operation::Leaf { .. } => (),
                Operation::Unary(operation, operand) => {
                    let x = computed(&values, operand);
                    let contribution = gradient * operation.d_function_dx(x);
                    deposit(nodes, operand, contribution);
                }
                Operation::Binary(operation, left, right) => {
                    let x = computed(&values, left);
                    let y = computed(&values, right);
                    let dx = gradient.clone() * operation.d_function_dx(x.clone(), y.clone());
                    let dy = gradient * operation.d_function_dy(x, y);
                    deposit(nodes, left, dx);
                    deposit(nodes, right, dy);
                }
            }
        }

        leaves
            .into_iter()
            .map(|(identity, label)| {
                let total = aliases
                    .aliases(identity)
                    .unwrap_or(&[])
                    .iter()
                    .fold(T::zero(), |total, &index| {
                        total + nodes[index].gradient.clone()
                    });
                (identity, (label, total))
            })
            .collect()
    });

    log::debug!(
        "Differentiated node {} through {} reachable nodes",
        root,
        reachable.count()
    );
    Ok(Gradients::new(gradients))
}

fn accumulate<T: Real>(nodes: &mut [Node<T>], index: Index, contribution: T) {
    let node = &mut nodes[index];
    node.gradient = node.gradient.clone() + contribution;
}
