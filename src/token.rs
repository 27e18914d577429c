/*!
 * Lexical units of an expression.
 *
 * Every node in an expression graph is tagged with a [Token] describing its role: the symbol
 * of the operator it applies, the name of the function it applies, or the textual form of
 * the variable or constant it holds.
 *
 * ```
 * use easy_autodiff::token::{Token, TokenKind};
 * assert_eq!(Token::new("*").kind(), TokenKind::BinaryOperation);
 * assert_eq!(Token::new("sin").kind(), TokenKind::Function);
 * assert_eq!(Token::new("2.5").kind(), TokenKind::Constant);
 * assert_eq!(Token::new("x").kind(), TokenKind::Variable);
 * ```
 */

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/**
 * The symbols which classify as binary operations. Brackets and commas are included as
 * structural symbols, they take part in parsing but never become graph nodes.
 */
pub const OPERATORS: [&str; 8] = ["+", "-", "*", "/", "^", "(", ")", ","];

/**
 * The names which classify as functions.
 */
pub const FUNCTIONS: [&str; 7] = ["exp", "sin", "cos", "ln", "log", "pow", "neg"];

/**
 * What role a token plays.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Variable,
    Constant,
    BinaryOperation,
    Function,
}

/**
 * A lexical unit of an expression.
 *
 * The [kind](Token::kind) of a token is worked out once from its text when it is created and
 * never changes. Tokens compare, order and hash by their text alone.
 */
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /**
     * Classifies the text and creates a token for it. Classification never fails,
     * in priority order the text is an operator or structural symbol, a function name,
     * a number, and otherwise a variable.
     */
    pub fn new(text: impl Into<String>) -> Token {
        let text = text.into();
        let kind = classify(&text);
        Token { text, kind }
    }

    /**
     * Creates the token for a numerical constant from its value.
     */
    pub fn constant<T: fmt::Display>(value: &T) -> Token {
        // Formatting can produce `-1` or `inf`, which would classify as something else,
        // so the kind is not rederived from the text here.
        Token {
            text: value.to_string(),
            kind: TokenKind::Constant,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /**
     * How tightly this token binds, higher binds tighter.
     *
     * | token | precedence |
     * |---|---|
     * | `(` `)` `,` | 0 |
     * | `+` `-` | 1 |
     * | `*` `/` | 2 |
     * | `^` | 3 |
     * | variables and constants | 4 |
     * | functions | 5 |
     *
     * Functions, unary minus included, bind tighter than anything else.
     */
    pub fn precedence(&self) -> u8 {
        match self.kind {
            TokenKind::BinaryOperation => match self.text.as_str() {
                "+" | "-" => 1,
                "*" | "/" => 2,
                "^" => 3,
                _ => 0,
            },
            TokenKind::Variable | TokenKind::Constant => 4,
            TokenKind::Function => 5,
        }
    }

    /**
     * True for `^`, the only right associative operator.
     */
    pub fn is_right_associative(&self) -> bool {
        self.text == "^"
    }

    pub fn is_variable(&self) -> bool {
        self.kind == TokenKind::Variable
    }

    pub fn is_constant(&self) -> bool {
        self.kind == TokenKind::Constant
    }

    /**
     * True for algebraic operators and also for the structural brackets and comma, which
     * classify as binary operations.
     */
    pub fn is_binary_operation(&self) -> bool {
        self.kind == TokenKind::BinaryOperation
    }

    pub fn is_function(&self) -> bool {
        self.kind == TokenKind::Function
    }

    pub fn is_open_paren(&self) -> bool {
        self.text == "("
    }

    pub fn is_closed_paren(&self) -> bool {
        self.text == ")"
    }

    pub fn is_comma(&self) -> bool {
        self.text == ","
    }

    /**
     * True for operators and functions which produce a value, ie not brackets or commas.
     */
    pub fn is_algebraic(&self) -> bool {
        match self.kind {
            TokenKind::BinaryOperation => {
                !(self.is_open_paren() || self.is_closed_paren() || self.is_comma())
            }
            _ => true,
        }
    }
}

fn classify(text: &str) -> TokenKind {
    if OPERATORS.contains(&text) {
        return TokenKind::BinaryOperation;
    }
    if FUNCTIONS.contains(&text) {
        return TokenKind::Function;
    }
    if is_number(text) {
        return TokenKind::Constant;
    }
    TokenKind::Variable
}

/// Every character is a digit, except for at most one decimal point, and there is at least
/// one digit.
fn is_number(text: &str) -> bool {
    let mut digits = 0;
    let mut points = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Token {}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
