#[derive(Debug, PartialEq)]
pub enum Regex {
    StartOfLineAnchored(Expression),
    Unanchored(Expression),
}

#[derive(Debug, PartialEq)]
pub struct StartOfLineAnchor;

// Expression

#[derive(Debug, PartialEq)]
pub struct Expression(pub Vec<Token>);

/// An expression item along with the byte offset in the pattern it begins at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub offset: usize,
    pub item: ExpressionItem,
}

impl Token {
    pub fn new(offset: usize, item: ExpressionItem) -> Self {
        Self { offset, item }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionItem {
    Char(Char),
    AnyCharacter,
    /// A `*`, which either repeats the preceding step or matches itself.
    Star,
    /// A `$`, which only anchors when it ends the pattern.
    EndOfLine,
    BracketExpression(BracketExpression),
    GroupOpen,
    GroupClose,
    Backreference(Backreference),
}

impl From<Char> for ExpressionItem {
    fn from(src: Char) -> Self {
        Self::Char(src)
    }
}

impl From<BracketExpression> for ExpressionItem {
    fn from(src: BracketExpression) -> Self {
        Self::BracketExpression(src)
    }
}

impl From<Backreference> for ExpressionItem {
    fn from(src: Backreference) -> Self {
        Self::Backreference(src)
    }
}

// Bracket Expressions

/// The members of a `[...]` expression exactly as written, with ranges left
/// unexpanded.
#[derive(Debug, Clone, PartialEq)]
pub enum BracketExpression {
    Items(Vec<u8>),
    NegatedItems(Vec<u8>),
}

// Terminals

/// A single literal byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Char(pub u8);

/// The group number, `1` through `9`, as written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backreference(pub u8);
