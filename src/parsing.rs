/*!
 * Building expression graphs from infix text.
 *
 * Text is split into [Token]s, reordered into postfix with the shunting-yard algorithm, then
 * replayed as the same compositions of [Var]s a program would write by hand. The usual
 * precedence applies, `^` binds tighter than `*` and `/`, which bind tighter than `+` and `-`.
 * Functions are written with brackets, `pow` takes two arguments separated by a comma.
 *
 * ```
 * use easy_autodiff::differentiation::Graph;
 * use easy_autodiff::parsing::{Expression, State};
 * let graph = Graph::new();
 * let state = State::from([("x".to_string(), 2.0), ("y".to_string(), 3.0)]);
 * let expression = Expression::parse(&graph, "exp(x * y) + pow(x, 2)", &state).unwrap();
 * assert_eq!(expression.evaluate().unwrap(), 6.0_f64.exp() + 4.0);
 * let gradients = expression.differentiate().unwrap();
 * assert_eq!(gradients.by_label("y"), Some(&(2.0 * 6.0_f64.exp())));
 * ```
 *
 * A `-` with nothing to subtract from, at the start of the text or directly after an opening
 * bracket, comma, operator or function, negates what follows it. Like the functions it binds
 * tighter than every binary operator, so `-x^2` is `(-x)^2`.
 */

use crate::differentiation::{Gradients, Graph, Primitive, Var};
use crate::errors::Result;
use crate::numeric::extra::{Cos, Exp, Ln, Log2, Pow, Real, Sin};
use crate::token::{Token, TokenKind, OPERATORS};

use std::collections::BTreeMap;

/**
 * The starting values of the variables named in an expression.
 */
pub type State<T> = BTreeMap<String, T>;

/**
 * An error indicating text could not be turned into an expression.
 */
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedExpression {
    #[error("the expression is empty")]
    Empty,
    #[error("the brackets in the expression are unbalanced")]
    UnbalancedParentheses,
    #[error("{0} is missing an operand")]
    MissingOperand(String),
    #[error("{0} operands are not joined by any operator")]
    TrailingOperands(usize),
    #[error("no value was given for the variable {0}")]
    UnknownVariable(String),
    #[error("{0} is not a valid number")]
    InvalidConstant(String),
    #[error("a comma can only separate the arguments of a function")]
    MisplacedComma,
}

/**
 * Splits text into tokens. Whitespace only separates tokens, and every operator, bracket and
 * comma is a token on its own. A `-` in a position where it cannot be subtraction becomes the
 * `neg` function.
 */
pub fn tokenize(text: &str) -> std::result::Result<Vec<Token>, MalformedExpression> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut run = String::new();
    for c in text.chars() {
        let symbol = c.to_string();
        let is_symbol = OPERATORS.contains(&symbol.as_str());
        if !c.is_whitespace() && !is_symbol {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut run)));
        }
        if is_symbol {
            if symbol == "-" && is_prefix_position(tokens.last()) {
                tokens.push(Token::new("neg"));
            } else {
                tokens.push(Token::new(symbol));
            }
        }
    }
    if !run.is_empty() {
        tokens.push(Token::new(run));
    }
    if tokens.is_empty() {
        return Err(MalformedExpression::Empty);
    }
    Ok(tokens)
}

fn is_prefix_position(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(token) => {
            token.is_function() || (token.is_binary_operation() && !token.is_closed_paren())
        }
    }
}

/**
 * Reorders infix tokens into postfix, dropping the brackets and commas.
 *
 * `^` is right associative and the other operators are left associative. Functions wait on
 * the operator stack until the bracket closing their arguments.
 */
pub fn to_postfix(tokens: Vec<Token>) -> std::result::Result<Vec<Token>, MalformedExpression> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();
    for token in tokens {
        match token.kind() {
            TokenKind::Variable | TokenKind::Constant => output.push(token),
            TokenKind::Function => operators.push(token),
            TokenKind::BinaryOperation if token.is_open_paren() => operators.push(token),
            TokenKind::BinaryOperation if token.is_closed_paren() => {
                if !pop_to_open_paren(&mut operators, &mut output) {
                    return Err(MalformedExpression::UnbalancedParentheses);
                }
                operators.pop();
                if operators.last().is_some_and(Token::is_function) {
                    output.extend(operators.pop());
                }
            }
            TokenKind::BinaryOperation if token.is_comma() => {
                if !pop_to_open_paren(&mut operators, &mut output) {
                    return Err(MalformedExpression::MisplacedComma);
                }
            }
            TokenKind::BinaryOperation => {
                while let Some(top) = operators.last() {
                    let pops = !top.is_open_paren()
                        && (top.is_function()
                            || top.precedence() > token.precedence()
                            || (top.precedence() == token.precedence()
                                && !token.is_right_associative()));
                    if !pops {
                        break;
                    }
                    output.extend(operators.pop());
                }
                operators.push(token);
            }
        }
    }
    while let Some(top) = operators.pop() {
        if top.is_open_paren() {
            return Err(MalformedExpression::UnbalancedParentheses);
        }
        output.push(top);
    }
    Ok(output)
}

/// Moves operators to the output up to the innermost open bracket, which stays on the stack.
/// False if there is no open bracket.
fn pop_to_open_paren(operators: &mut Vec<Token>, output: &mut Vec<Token>) -> bool {
    while let Some(top) = operators.last() {
        if top.is_open_paren() {
            return true;
        }
        output.extend(operators.pop());
    }
    false
}

/**
 * An expression built on a [Graph] from text, along with the variables named in the text.
 *
 * Every occurrence of a name in the text is composed from one variable, so the gradient for
 * a name sums over every place it appears.
 */
#[derive(Debug)]
pub struct Expression<'g, T: Primitive> {
    root: Var<'g, T>,
    variables: BTreeMap<String, Var<'g, T>>,
}

impl<'g, T: Real + Primitive> Expression<'g, T> {
    /**
     * Parses the text and builds it on the graph, taking the value of each variable named in
     * the text from the state. Names in the state which the text does not use are ignored.
     */
    pub fn parse(graph: &'g Graph<T>, text: &str, state: &State<T>) -> Result<Expression<'g, T>> {
        let postfix = to_postfix(tokenize(text)?)?;
        let mut variables: BTreeMap<String, Var<'g, T>> = BTreeMap::new();
        let mut operands: Vec<Var<'g, T>> = Vec::new();
        for token in &postfix {
            let var = match token.kind() {
                TokenKind::Constant => {
                    let value = token
                        .as_str()
                        .parse::<T>()
                        .map_err(|_| MalformedExpression::InvalidConstant(token.to_string()))?;
                    graph.constant(value)
                }
                TokenKind::Variable => match variables.get(token.as_str()) {
                    Some(variable) => *variable,
                    None => {
                        let value = state.get(token.as_str()).cloned().ok_or_else(|| {
                            MalformedExpression::UnknownVariable(token.to_string())
                        })?;
                        let variable = graph.variable(token.as_str(), value);
                        variables.insert(token.to_string(), variable);
                        variable
                    }
                },
                TokenKind::BinaryOperation | TokenKind::Function => {
                    apply(token, &mut operands)?
                }
            };
            operands.push(var);
        }
        let root = match operands.len() {
            0 => return Err(MalformedExpression::Empty.into()),
            1 => operands[0],
            n => return Err(MalformedExpression::TrailingOperands(n).into()),
        };
        log::debug!(
            "Parsed {} tokens into node {} with {} variables",
            postfix.len(),
            root.index(),
            variables.len()
        );
        Ok(Expression { root, variables })
    }

    /**
     * The node the whole expression evaluates to.
     */
    pub fn root(&self) -> Var<'g, T> {
        self.root
    }

    /**
     * The variable created for a name in the text, if the text used that name.
     */
    pub fn variable(&self, name: &str) -> Option<Var<'g, T>> {
        self.variables.get(name).copied()
    }

    pub fn evaluate(&self) -> Result<T> {
        self.root.evaluate()
    }

    pub fn differentiate(&self) -> Result<Gradients<T>> {
        self.root.differentiate()
    }

    /**
     * Sets the value of a variable named in the text.
     */
    pub fn set_value(&self, name: &str, value: T) -> Result<()> {
        self.named(name)?.set_value(value)
    }

    /**
     * Returns the gradient of a variable named in the text from the most recent
     * differentiation pass.
     */
    pub fn gradient_of(&self, name: &str) -> Result<T> {
        self.named(name)?.gradient()
    }

    fn named(&self, name: &str) -> Result<Var<'g, T>> {
        self.variable(name)
            .ok_or_else(|| MalformedExpression::UnknownVariable(name.to_string()).into())
    }
}

/// Pops the operands of the operator or function token and composes them.
fn apply<'g, T>(
    token: &Token,
    operands: &mut Vec<Var<'g, T>>,
) -> std::result::Result<Var<'g, T>, MalformedExpression>
where
    T: Real + Primitive,
{
    let mut pop = || {
        operands
            .pop()
            .ok_or_else(|| MalformedExpression::MissingOperand(token.to_string()))
    };
    let binary = matches!(token.as_str(), "+" | "-" | "*" | "/" | "^" | "pow");
    if binary {
        let right = pop()?;
        let left = pop()?;
        return Ok(match token.as_str() {
            "+" => left + right,
            "-" => left - right,
            "*" => left * right,
            "/" => left / right,
            _ => left.pow(right),
        });
    }
    let operand = pop()?;
    Ok(match token.as_str() {
        "neg" => -operand,
        "exp" => operand.exp(),
        "sin" => operand.sin(),
        "cos" => operand.cos(),
        "ln" => operand.ln(),
        "log" => operand.log2(),
        // brackets and commas never reach the postfix output
        _ => unreachable!("{} is not an operator or function", token),
    })
}
