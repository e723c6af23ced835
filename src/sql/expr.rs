//! Expression AST for projections and filters.
//!
//! Values never appear in this AST: filters compare against named
//! parameters, so nothing user-supplied is ever spliced into SQL text.

use super::dialect::Dialect;
use super::token::{Token, TokenStream};
use super::types::WarehouseType;
use crate::model::Operator;

// =============================================================================
// Expression AST
// =============================================================================

/// A column-level SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Physical column reference
    Column(String),

    /// `_PARTITIONTIME`
    PartitionTime,

    /// `count(*)`
    CountStar,

    /// Named parameter: @name
    Param(String),

    /// Function call with trusted arguments: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// CAST(expr as TYPE)
    Cast {
        expr: Box<Expr>,
        data_type: WarehouseType,
    },

    /// String literal from configuration (timezone names)
    LitString(String),
}

impl Expr {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Expr::Column(name) => {
                ts.push(Token::Ident(name.clone()));
            }
            Expr::PartitionTime => {
                ts.push(Token::PartitionTime);
            }
            Expr::CountStar => {
                ts.push(Token::FunctionName("count".into()))
                    .lparen()
                    .push(Token::Star)
                    .rparen();
            }
            Expr::Param(name) => {
                ts.push(Token::Param(name.clone()));
            }
            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone())).lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens());
                }
                ts.rparen();
            }
            Expr::Cast { expr, data_type } => {
                ts.push(Token::Cast).lparen();
                ts.append(&expr.to_tokens());
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::TypeName(*data_type))
                    .rparen();
            }
            Expr::LitString(s) => {
                ts.push(Token::LitString(s.clone()));
            }
        }
        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column(name.into())
}

/// Parameter placeholder.
pub fn param(name: &str) -> Expr {
    Expr::Param(name.into())
}

/// Function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// CAST(expr as data_type).
pub fn cast(expr: Expr, data_type: WarehouseType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        data_type,
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// A WHERE-clause predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// left op right
    Compare {
        left: Expr,
        op: Operator,
        right: Expr,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Expr, negated: bool },

    /// IN (...) / NOT IN (...)
    InList {
        expr: Expr,
        values: Vec<Expr>,
        negated: bool,
    },
}

impl Predicate {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Predicate::Compare { left, op, right } => {
                ts.append(&left.to_tokens()).space();
                ts.extend(op.tokens());
                ts.space().append(&right.to_tokens());
            }
            Predicate::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens())
                    .space()
                    .push(if *negated { Token::IsNotNull } else { Token::IsNull });
            }
            Predicate::InList {
                expr,
                values,
                negated,
            } => {
                ts.append(&expr.to_tokens()).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::In).space().lparen();
                let items = values.iter().map(Expr::to_tokens);
                ts.append(&TokenStream::join(items, &[Token::Comma, Token::Space]));
                ts.rparen();
            }
        }
        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}
