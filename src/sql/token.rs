//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, SqlDialect};
use super::types::WarehouseType;

/// SQL Token - every element the compiler emits.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Not,
    /// Alias keyword, rendered lowercase.
    As,
    GroupBy,
    Cast,
    In,
    Like,
    IsNull,
    IsNotNull,

    // === Punctuation ===
    Comma,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Column or alias name, quoted only when required
    Ident(String),
    /// FROM target: dataset path plus table
    Table { dataset: String, table: String },
    /// Named query parameter placeholder
    Param(String),
    /// Warehouse type name, spelled per dialect
    TypeName(WarehouseType),
    /// String literal (trusted configuration values only; never row values)
    LitString(String),
    /// Function name, rendered as written
    FunctionName(String),
    /// Ingestion-time partition pseudo column
    PartitionTime,
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Not => "NOT".into(),
            Token::As => "as".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Cast => "CAST".into(),
            Token::In => "IN".into(),
            Token::Like => "LIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "!=".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),

            Token::Space => " ".into(),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.format_identifier(name),
            Token::Table { dataset, table } => dialect.table_reference(dataset, table),
            Token::Param(name) => dialect.format_parameter(name),
            Token::TypeName(ty) => dialect.type_name(*ty).into(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::FunctionName(name) => name.clone(),
            Token::PartitionTime => dialect.partition_time_column().into(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Join streams with a separator.
    pub fn join(parts: impl IntoIterator<Item = TokenStream>, separator: &[Token]) -> Self {
        let mut ts = TokenStream::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                ts.extend(separator.iter().cloned());
            }
            ts.append(&part);
        }
        ts
    }

    /// Drop trailing whitespace tokens.
    pub fn trim_end(&mut self) -> &mut Self {
        while self.tokens.last() == Some(&Token::Space) {
            self.tokens.pop();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
