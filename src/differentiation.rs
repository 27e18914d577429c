/*!
 * (Automatic) Differentiation helpers
 *
 * # Expression graphs
 *
 * A [Graph] stores every node of one or more arithmetic expressions. Leaves are created on
 * the graph with [Graph::variable] and [Graph::constant] and returned as [Var]s, lightweight
 * handles which can be combined with the normal `+ - * /` operators, negated, and passed
 * through the functions in [numeric::extra](crate::numeric::extra) to build bigger
 * expressions.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * let graph = Graph::new();
 * let x = graph.variable("x", 10.0);
 * let y = graph.variable("y", 12.0);
 * let z = (x * x) + (y * y);
 * assert_eq!(z.evaluate().unwrap(), 244.0);
 * ```
 *
 * # Variables and their copies
 *
 * Every time a leaf takes part in a composition the new operator node gets its own copy
 * of that leaf. Copies are recorded against the identity of the leaf they were made from,
 * so the graph still knows that both operands of `x * x` are the same logical variable.
 * Changing the value of a variable with [Graph::set_value] updates every copy, and the
 * gradient of a variable sums the gradients of every copy, which is what makes the
 * derivative of `x * x` come out as `2x`.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * let graph = Graph::new();
 * let x = graph.variable("x", 3.0);
 * let y = x * x;
 * let gradients = y.differentiate().unwrap();
 * assert_eq!(gradients[&x], 6.0);
 * ```
 *
 * Composite operands are not copied, a composite used twice such as `s` in `s * s` becomes a
 * node with two parents, and the gradient pass waits for both parents to contribute before
 * propagating past it.
 *
 * # Re-evaluation
 *
 * Operator nodes never cache their value, so after calling [Graph::set_value] the same
 * expression can be evaluated and differentiated again without rebuilding it.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * let graph = Graph::new();
 * let x = graph.variable("x", 10.0);
 * let y = graph.variable("y", 12.0);
 * let z = (x * x) + (y * y);
 * x.set_value(1.0).unwrap();
 * y.set_value(2.0).unwrap();
 * assert_eq!(z.evaluate().unwrap(), 5.0);
 * let gradients = z.differentiate().unwrap();
 * assert_eq!(gradients[&x], 2.0);
 * assert_eq!(gradients[&y], 4.0);
 * ```
 *
 * # Further information
 *
 * - [Usage guide](usage)
 */

mod aliases;
mod evaluation;
pub mod functions;
mod gradients;
mod operations;
pub mod usage;
mod var_operations;

use crate::errors::{Error, Result};
use crate::numeric::extra::Real;
use crate::numeric::ZeroOne;
use crate::token::Token;

use aliases::AliasRegistry;
use functions::{BinaryOperation, UnaryOperation};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

/**
 * A trait with no methods which is implemented for all primitive types.
 *
 * Importantly this trait is not implemented for [Var]s, so a graph cannot be built out of
 * handles to another graph.
 */
pub trait Primitive {}

/**
 * Nodes are addressed by their position in the graph's storage.
 */
pub type Index = usize;

/**
 * A stable handle distinguishing one logical variable from all others on a graph, no
 * matter how many copies of it have been made by compositions.
 *
 * The identity of a variable is the position its original leaf was created at.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(Index);

impl Identity {
    pub fn index(&self) -> Index {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/**
 * What a node computes.
 */
#[derive(Clone, Debug)]
pub(crate) enum Operation<T> {
    /// A variable or constant, holding its current value directly.
    Leaf {
        value: T,
        identity: Identity,
        label: Option<String>,
    },
    Unary(UnaryOperation, Index),
    Binary(BinaryOperation, Index, Index),
}

/**
 * A vertex of the expression graph.
 */
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) token: Token,
    pub(crate) operation: Operation<T>,
    pub(crate) gradient: T,
}

impl<T> Node<T> {
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.operation, Operation::Leaf { .. })
    }
}

/**
 * Storage for the nodes of expression graphs and the registry of which leaves are copies
 * of which variables.
 *
 * Nodes are only ever appended, so a node's operands always sit at lower indexes than the
 * node itself. The graph is single threaded, [Var]s borrow it immutably and all updates go
 * through interior mutability.
 */
#[derive(Debug)]
pub struct Graph<T: Primitive> {
    nodes: RefCell<Vec<Node<T>>>,
    aliases: RefCell<AliasRegistry>,
}

/**
 * A handle to a node of a [Graph].
 *
 * Vars are cheap to copy, each one is just a reference to its graph and the index of the
 * node it refers to. Combining Vars appends new nodes to their graph.
 *
 * The Vars cannot live longer than their graph, hence the following example does not compile
 *
 * ```compile_fail
 * use easy_autodiff::differentiation::Graph;
 * let x = {
 *     let graph = Graph::new();
 *     graph.variable("x", 1.0)
 * }; // graph no longer in scope
 * ```
 */
pub struct Var<'g, T: Primitive> {
    graph: &'g Graph<T>,
    index: Index,
}

/**
 * The partial derivatives of an expression with respect to every variable it depends on.
 *
 * This is a snapshot taken at the end of a call to [Var::differentiate]. Looking up a
 * variable the expression does not depend on gives 0, as that variable makes no
 * contribution to the expression.
 */
#[derive(Clone, Debug)]
pub struct Gradients<T> {
    gradients: BTreeMap<Identity, (Option<String>, T)>,
    zero: T,
}

impl<T: Real + Primitive> Graph<T> {
    /**
     * Creates a new empty graph.
     */
    pub fn new() -> Graph<T> {
        Graph::with_capacity(0)
    }

    /**
     * Creates a new empty graph with space for at least `capacity` nodes before
     * reallocating.
     */
    pub fn with_capacity(capacity: usize) -> Graph<T> {
        Graph {
            nodes: RefCell::new(Vec::with_capacity(capacity)),
            aliases: RefCell::new(AliasRegistry::new()),
        }
    }

    /**
     * Returns the number of nodes stored, including every copy made of a leaf.
     */
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /**
     * Creates a named variable on this graph. The name is only used for reporting
     * gradients back, two variables with the same name are still different variables.
     */
    pub fn variable(&self, name: impl Into<String>, value: T) -> Var<'_, T> {
        let name = name.into();
        let token = Token::new(name.clone());
        self.leaf(token, value, Some(name))
    }

    /**
     * Creates an unnamed constant on this graph. Constants are leaves like variables, so
     * their value can still be changed with [set_value](Graph::set_value) and their gradient
     * queried, but they have no label.
     */
    pub fn constant(&self, value: T) -> Var<'_, T> {
        let token = Token::constant(&value);
        self.leaf(token, value, None)
    }

    fn leaf(&self, token: Token, value: T, label: Option<String>) -> Var<'_, T> {
        let index = self.nodes.borrow().len();
        let identity = Identity(index);
        self.push(Node {
            token,
            operation: Operation::Leaf {
                value,
                identity,
                label,
            },
            gradient: T::zero(),
        });
        self.aliases.borrow_mut().register_origin(identity, index);
        Var { graph: self, index }
    }

    /**
     * Sets the value of the variable with this identity and of every copy made of it, and
     * resets all of their gradients to 0.
     *
     * Any expression built from the variable will use the new value the next time it is
     * evaluated or differentiated.
     */
    pub fn set_value(&self, identity: Identity, value: T) -> Result<()> {
        let aliases = self.aliases.borrow();
        let copies = aliases
            .aliases(identity)
            .ok_or(Error::UnknownIdentity(identity))?;
        let mut nodes = self.nodes.borrow_mut();
        for &index in copies {
            let node = &mut nodes[index];
            if let Operation::Leaf { value: ref mut old, .. } = node.operation {
                *old = value.clone();
            }
            node.gradient = T::zero();
        }
        log::trace!(
            "Set value of {} across {} leaves",
            identity,
            copies.len()
        );
        Ok(())
    }

    /**
     * Returns the total gradient of the variable with this identity from the most recent
     * differentiation pass, summed over every copy made of it.
     */
    pub fn gradient_of(&self, identity: Identity) -> Result<T> {
        let aliases = self.aliases.borrow();
        let copies = aliases
            .aliases(identity)
            .ok_or(Error::UnknownIdentity(identity))?;
        let nodes = self.nodes.borrow();
        Ok(copies
            .iter()
            .fold(T::zero(), |total, &index| total + nodes[index].gradient.clone()))
    }

    /**
     * Returns how many copies of the variable with this identity have been made by
     * compositions, not counting the variable itself.
     */
    pub fn aliases_of(&self, identity: Identity) -> Result<usize> {
        self.aliases
            .borrow()
            .aliases(identity)
            .map(|copies| copies.len() - 1)
            .ok_or(Error::UnknownIdentity(identity))
    }

    /**
     * Borrows the nodes of the graph immutably for the duration of the closure.
     */
    #[track_caller]
    pub(crate) fn borrow<F, R>(&self, op: F) -> R
    where
        F: FnOnce(&Vec<Node<T>>) -> R,
    {
        op(&self.nodes.borrow())
    }

    /**
     * Borrows the nodes and the alias registry of the graph mutably for the duration of
     * the closure.
     */
    #[track_caller]
    pub(crate) fn borrow_mut<F, R>(&self, op: F) -> R
    where
        F: FnOnce(&mut Vec<Node<T>>, &AliasRegistry) -> R,
    {
        op(&mut self.nodes.borrow_mut(), &self.aliases.borrow())
    }

    fn push(&self, node: Node<T>) -> Index {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    /**
     * Returns the index the operator node should refer to for this operand. Leaves are
     * copied and the copy is registered under the leaf's identity, composites are shared.
     */
    fn operand(&self, index: Index) -> Index {
        let leaf = self.borrow(|nodes| {
            let node = &nodes[index];
            if node.is_leaf() {
                Some(node.clone())
            } else {
                None
            }
        });
        match leaf {
            None => index,
            Some(mut copy) => {
                copy.gradient = T::zero();
                let identity = match copy.operation {
                    Operation::Leaf { identity, .. } => identity,
                    _ => unreachable!("only leaves are copied"),
                };
                let copy_index = self.push(copy);
                self.aliases.borrow_mut().register(identity, copy_index);
                log::trace!("Registered leaf {} as a copy of {}", copy_index, identity);
                copy_index
            }
        }
    }

    pub(crate) fn append_unary(&self, operation: UnaryOperation, operand: Index) -> Index {
        let operand = self.operand(operand);
        self.push(Node {
            token: Token::new(operation.symbol()),
            operation: Operation::Unary(operation, operand),
            gradient: T::zero(),
        })
    }

    pub(crate) fn append_binary(
        &self,
        operation: BinaryOperation,
        left: Index,
        right: Index,
    ) -> Index {
        let left = self.operand(left);
        let right = self.operand(right);
        self.push(Node {
            token: Token::new(operation.symbol()),
            operation: Operation::Binary(operation, left, right),
            gradient: T::zero(),
        })
    }
}

impl<T: Real + Primitive> Default for Graph<T> {
    fn default() -> Self {
        Graph::new()
    }
}

/**
 * Any Var implements Clone and Copy regardless of its number type, as it is only a handle.
 */
impl<'g, T: Primitive> Clone for Var<'g, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, T: Primitive> Copy for Var<'g, T> {}

impl<'g, T: Primitive> fmt::Debug for Var<'g, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Var").field("index", &self.index).finish()
    }
}

impl<'g, T: Real + Primitive> Var<'g, T> {
    /**
     * The index of the node this Var refers to.
     */
    pub fn index(&self) -> Index {
        self.index
    }

    /**
     * The graph this Var belongs to.
     */
    pub fn graph(&self) -> &'g Graph<T> {
        self.graph
    }

    /**
     * Returns the token describing this node, an operator symbol, a function name or the
     * text of a variable or constant.
     */
    pub fn token(&self) -> Token {
        self.graph.borrow(|nodes| nodes[self.index].token.clone())
    }

    pub fn is_leaf(&self) -> bool {
        self.graph.borrow(|nodes| nodes[self.index].is_leaf())
    }

    /**
     * The identity of this Var if it is a variable or constant, None for operators and
     * functions.
     */
    pub fn identity(&self) -> Option<Identity> {
        self.graph.borrow(|nodes| match nodes[self.index].operation {
            Operation::Leaf { identity, .. } => Some(identity),
            _ => None,
        })
    }

    /**
     * The name this Var was created with, if it is a named variable.
     */
    pub fn label(&self) -> Option<String> {
        self.graph.borrow(|nodes| match &nodes[self.index].operation {
            Operation::Leaf { label, .. } => label.clone(),
            _ => None,
        })
    }

    /**
     * Computes the value of this node from the current values of the leaves it depends on.
     *
     * Nothing is cached between calls, so this always reflects the latest
     * [set_value](Graph::set_value).
     *
     * Fails with [DivisionByZero](Error::DivisionByZero) if any division in the expression
     * has a denominator of exactly 0.
     */
    pub fn evaluate(&self) -> Result<T> {
        self.graph
            .borrow(|nodes| evaluation::evaluate(nodes, self.index))
    }

    /**
     * Performs a reverse mode differentiation pass from this node, returning the derivative
     * of this node with respect to every variable it depends on.
     *
     * Each pass first resets the gradients of the expression, so calling this repeatedly
     * gives the same answer each time rather than accumulating.
     *
     * Fails with [DivisionByZero](Error::DivisionByZero) before writing to any gradient if
     * the expression cannot be evaluated.
     */
    pub fn differentiate(&self) -> Result<Gradients<T>> {
        gradients::differentiate(self.graph, self.index)
    }

    /**
     * Sets the value of this variable and every copy made of it.
     *
     * Fails with [UnknownIdentity](Error::UnknownIdentity) if this Var is not a leaf.
     */
    pub fn set_value(&self, value: T) -> Result<()> {
        let identity = self.identity().ok_or(Error::UnknownIdentity(Identity(self.index)))?;
        self.graph.set_value(identity, value)
    }

    /**
     * Returns the total gradient of this variable from the most recent differentiation pass.
     *
     * Fails with [UnknownIdentity](Error::UnknownIdentity) if this Var is not a leaf.
     */
    pub fn gradient(&self) -> Result<T> {
        let identity = self.identity().ok_or(Error::UnknownIdentity(Identity(self.index)))?;
        self.graph.gradient_of(identity)
    }
}

impl<T: ZeroOne> Gradients<T> {
    pub(crate) fn new(gradients: BTreeMap<Identity, (Option<String>, T)>) -> Gradients<T> {
        Gradients {
            gradients,
            zero: T::zero(),
        }
    }

    /**
     * Returns the derivative with respect to the variable with this identity, 0 if the
     * expression does not depend on it.
     */
    pub fn get(&self, identity: Identity) -> &T {
        self.gradients
            .get(&identity)
            .map(|(_, gradient)| gradient)
            .unwrap_or(&self.zero)
    }

    /**
     * Returns the derivative with respect to the first variable with this name, if the
     * expression depends on a variable with this name.
     */
    pub fn by_label(&self, name: &str) -> Option<&T> {
        self.gradients
            .values()
            .find(|(label, _)| label.as_deref() == Some(name))
            .map(|(_, gradient)| gradient)
    }

    /**
     * Iterates through the identity, label and derivative of every leaf the expression
     * depends on, in the order the leaves were created.
     */
    pub fn iter(&self) -> impl Iterator<Item = (Identity, Option<&str>, &T)> {
        self.gradients
            .iter()
            .map(|(identity, (label, gradient))| (*identity, label.as_deref(), gradient))
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }
}

/**
 * Gradients can be indexed by the Var of a leaf to get the derivative with respect to it.
 * Indexing by a Var which is not a leaf gives 0.
 */
impl<'g, T: Real + Primitive> std::ops::Index<&Var<'g, T>> for Gradients<T> {
    type Output = T;
    fn index(&self, var: &Var<'g, T>) -> &Self::Output {
        match var.identity() {
            Some(identity) => self.get(identity),
            None => &self.zero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_are_registered_on_creation() {
        let graph = Graph::new();
        let x = graph.variable("x", 1.0);
        let c = graph.constant(2.0);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.aliases_of(x.identity().unwrap()), Ok(0));
        assert_eq!(graph.aliases_of(c.identity().unwrap()), Ok(0));
        assert_eq!(x.label(), Some("x".to_string()));
        assert_eq!(c.label(), None);
        assert_eq!(c.token().as_str(), "2");
    }

    #[test]
    fn test_leaf_operands_are_copied() {
        let graph = Graph::new();
        let x = graph.variable("x", 1.0);
        let y = x * x;
        // x, two copies of x, and the multiplication
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.aliases_of(x.identity().unwrap()), Ok(2));
        assert_eq!(y.identity(), None);
        assert!(!y.is_leaf());
        assert_eq!(y.token().as_str(), "*");
    }

    #[test]
    fn test_composite_operands_are_shared() {
        let graph = Graph::new();
        let a = graph.variable("a", 1.0);
        let b = graph.variable("b", 2.0);
        let s = a + b;
        let before = graph.len();
        let _ = s * s;
        // only the multiplication node is added, and no new copies are registered
        assert_eq!(graph.len(), before + 1);
        assert_eq!(graph.aliases_of(a.identity().unwrap()), Ok(1));
        assert_eq!(graph.aliases_of(b.identity().unwrap()), Ok(1));
    }

    #[test]
    fn test_unknown_identity() {
        let graph = Graph::<f64>::new();
        let x = graph.variable("x", 1.0);
        let y = x + x;
        let not_a_leaf = Identity(y.index());
        assert_eq!(
            graph.set_value(not_a_leaf, 3.0),
            Err(Error::UnknownIdentity(not_a_leaf))
        );
        assert_eq!(
            graph.gradient_of(not_a_leaf),
            Err(Error::UnknownIdentity(not_a_leaf))
        );
        assert_eq!(y.set_value(3.0), Err(Error::UnknownIdentity(not_a_leaf)));
    }

    #[test]
    fn test_set_value_updates_every_copy() {
        let graph = Graph::new();
        let x = graph.variable("x", 2.0);
        let y = x * x * x;
        assert_eq!(y.evaluate(), Ok(8.0));
        x.set_value(3.0).unwrap();
        assert_eq!(x.evaluate(), Ok(3.0));
        assert_eq!(y.evaluate(), Ok(27.0));
    }

    #[test]
    fn test_set_value_resets_every_copy_gradient() {
        let graph = Graph::new();
        let x = graph.variable("x", 2.0);
        let y = x * x * x;
        y.differentiate().unwrap();
        let identity = x.identity().unwrap();
        assert_eq!(graph.aliases_of(identity), Ok(3));
        let copies = graph.aliases.borrow().aliases(identity).unwrap().to_vec();
        graph.borrow(|nodes| {
            assert!(copies.iter().any(|&index| nodes[index].gradient != 0.0));
        });
        x.set_value(3.0).unwrap();
        graph.borrow(|nodes| {
            for &index in &copies {
                assert_eq!(nodes[index].gradient, 0.0);
            }
        });
    }
}
