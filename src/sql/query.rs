//! Query builder - the one-shot `SELECT … FROM … [WHERE …] [GROUP BY …]` shape.

use super::dialect::Dialect;
use super::expr::Predicate;
use super::token::{Token, TokenStream};

// =============================================================================
// Table Reference
// =============================================================================

/// The remote table: dataset path (optionally `project.dataset`) plus table.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(dataset: &str, table: &str) -> Self {
        Self {
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Table {
            dataset: self.dataset.clone(),
            table: self.table.clone(),
        });
        ts
    }
}

// =============================================================================
// Query
// =============================================================================

/// A SELECT statement.
///
/// The projection and GROUP BY lists arrive pre-rendered as token streams
/// from the projection builder; filters are conjoined with `AND`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    select: Option<TokenStream>,
    from: TableRef,
    filters: Vec<Predicate>,
    group_by: Option<TokenStream>,
}

impl Query {
    pub fn new(from: TableRef) -> Self {
        Self {
            select: None,
            from,
            filters: Vec::new(),
            group_by: None,
        }
    }

    /// Set the projection. An empty stream selects `*`.
    pub fn select(mut self, projection: TokenStream) -> Self {
        self.select = (!projection.is_empty()).then_some(projection);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.filters.extend(predicates);
        self
    }

    /// Set the GROUP BY list. An empty stream means no GROUP BY clause.
    pub fn group_by(mut self, keys: TokenStream) -> Self {
        self.group_by = (!keys.is_empty()).then_some(keys);
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        match &self.select {
            Some(projection) => ts.append(projection),
            None => ts.push(Token::Star),
        };

        ts.space().push(Token::From).space().append(&self.from.to_tokens());

        if !self.filters.is_empty() {
            let predicates = self.filters.iter().map(Predicate::to_tokens);
            ts.space()
                .push(Token::Where)
                .space()
                .append(&TokenStream::join(
                    predicates,
                    &[Token::Space, Token::And, Token::Space],
                ));
        }

        if let Some(keys) = &self.group_by {
            ts.space().push(Token::GroupBy).space().append(keys);
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}
