/*!
 * Error types.
 *
 * All operations are pure computation over the graph, so failures are deterministic given the
 * inputs and are returned to the caller immediately.
 */

use crate::differentiation::Identity;
use crate::parsing::MalformedExpression;

/**
 * An error indicating an expression could not be evaluated, differentiated or updated.
 */
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /**
     * A division node's denominator evaluated to exactly zero. This can only be detected
     * when evaluating, since the operands' values can change after the graph is built.
     */
    #[error("division by zero, the denominator evaluated to 0")]
    DivisionByZero,
    /**
     * No variable with this identity is registered on the graph, either because the
     * identity belongs to another graph or because it does not refer to a leaf.
     */
    #[error("no variable with identity {0} is registered on this graph")]
    UnknownIdentity(Identity),
    /**
     * A textual expression could not be turned into a graph.
     */
    #[error("malformed expression: {0}")]
    Malformed(#[from] MalformedExpression),
}

pub type Result<T> = std::result::Result<T, Error>;
