//! Binary, Logical, Unary, Assignment and Update Operators
//!
//! The fixed operator tables of the script grammar. The syntax tree carries
//! operator symbols as text (as ESTree does); the compiler maps them onto
//! these enums with `from_symbol` and rejects any symbol outside the table.

/// Binary operators (`BinaryExpression`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Equality
    LooseEq,
    LooseNotEq,
    StrictEq,
    StrictNotEq,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,

    // Other
    In,
}

impl BinaryOp {
    /// Look up a binary operator by its source symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "**" => Self::Pow,
            "==" => Self::LooseEq,
            "!=" => Self::LooseNotEq,
            "===" => Self::StrictEq,
            "!==" => Self::StrictNotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            ">>>" => Self::UShr,
            "in" => Self::In,
            _ => return None,
        };
        Some(op)
    }
}

/// Logical operators (`LogicalExpression`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
    /// Nullish coalescing (`??`).
    Coalesce,
}

impl LogicalOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(Self::And),
            "||" => Some(Self::Or),
            "??" => Some(Self::Coalesce),
            _ => None,
        }
    }
}

/// Unary operators (`UnaryExpression`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "-" => Self::Neg,
            "+" => Self::Plus,
            "!" => Self::Not,
            "~" => Self::BitNot,
            "typeof" => Self::TypeOf,
            "void" => Self::Void,
            _ => return None,
        };
        Some(op)
    }
}

/// Assignment operators (`AssignmentExpression`).
///
/// Compound forms reuse the binary table: `a op= b` writes `a op b`.
/// Logical assignment (`&&=`, `||=`, `??=`) is not part of the table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// Plain `=`.
    Assign,
    /// `op=` for an arithmetic or bitwise binary operator.
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol == "=" {
            return Some(Self::Assign);
        }
        let binary = symbol.strip_suffix('=')?;
        match BinaryOp::from_symbol(binary)? {
            op @ (BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Pow
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::UShr) => Some(Self::Compound(op)),
            _ => None,
        }
    }

    /// The binary operator applied by a compound assignment.
    pub const fn binary(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::Compound(op) => Some(op),
        }
    }
}

/// Update operators (`UpdateExpression`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "++" => Some(Self::Increment),
            "--" => Some(Self::Decrement),
            _ => None,
        }
    }

    /// The amount added to the operand.
    pub const fn delta(self) -> f64 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}
