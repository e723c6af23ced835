//! Column lists for the SELECT and GROUP BY clauses.
//!
//! Each column becomes one fragment:
//!
//! | Column | SELECT | GROUP BY |
//! |--------|--------|----------|
//! | plain | `<expr>  as <name>` | `<expr> ` |
//! | `_fdw_count` | `count(*)  as _fdw_count` | omitted |
//! | `partition_date` | `_PARTITIONTIME  as partition_date` | `_PARTITIONTIME` |
//!
//! Fragments are joined with `, ` and trailing whitespace is trimmed. A
//! plain column's expression is the column, normalized to the configured
//! timezone and then cast per the casting rules.

use crate::config::{CastingRules, FdwOptions};
use crate::model::{ColumnDefinition, ColumnKind};
use crate::sql::dialect::Dialect;
use crate::sql::expr::{col, Expr};
use crate::sql::token::{Token, TokenStream};

use super::timezone::{set_time_zone, TimeZone};

/// Which clause a column list is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Select,
    GroupBy,
}

/// Builds column lists for one table's settings.
#[derive(Debug, Clone, Copy)]
pub struct ColumnListBuilder<'a> {
    dialect: Dialect,
    casting: Option<&'a CastingRules>,
    time_zone: Option<&'a TimeZone>,
}

impl<'a> ColumnListBuilder<'a> {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            casting: None,
            time_zone: None,
        }
    }

    pub fn from_options(options: &'a FdwOptions) -> Self {
        Self {
            dialect: options.dialect,
            casting: Some(&options.casting),
            time_zone: options.time_zone.as_ref(),
        }
    }

    pub fn with_casting(mut self, casting: &'a CastingRules) -> Self {
        self.casting = Some(casting);
        self
    }

    pub fn with_time_zone(mut self, time_zone: Option<&'a TimeZone>) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Build the column list as tokens.
    ///
    /// `None` means no explicit projection: `*` for SELECT, nothing for
    /// GROUP BY.
    pub fn build(&self, columns: Option<&[ColumnDefinition]>, mode: ProjectionMode) -> TokenStream {
        let Some(columns) = columns else {
            let mut ts = TokenStream::new();
            if mode == ProjectionMode::Select {
                ts.push(Token::Star);
            }
            return ts;
        };

        let fragments = columns.iter().filter_map(|c| self.fragment(c, mode));
        let mut ts = TokenStream::join(fragments, &[Token::Comma, Token::Space]);
        ts.trim_end();
        ts
    }

    /// Build the column list as SQL text.
    pub fn build_column_list(
        &self,
        columns: Option<&[ColumnDefinition]>,
        mode: ProjectionMode,
    ) -> String {
        self.build(columns, mode).serialize(self.dialect)
    }

    /// ` as <name>` when `enabled`, otherwise nothing.
    pub fn add_column_alias(&self, name: &str, enabled: bool) -> String {
        if enabled {
            alias(name).serialize(self.dialect)
        } else {
            String::new()
        }
    }

    fn fragment(&self, column: &ColumnDefinition, mode: ProjectionMode) -> Option<TokenStream> {
        let expr = match column.kind {
            ColumnKind::CountAggregate if mode == ProjectionMode::GroupBy => return None,
            ColumnKind::CountAggregate => Expr::CountStar,
            ColumnKind::PartitionTime => Expr::PartitionTime,
            ColumnKind::Plain => self.column_expr(column),
        };

        let mut ts = expr.to_tokens();
        match (mode, column.kind) {
            (ProjectionMode::Select, _) => {
                ts.space().append(&alias(&column.name));
            }
            (ProjectionMode::GroupBy, ColumnKind::Plain) => {
                ts.space();
            }
            (ProjectionMode::GroupBy, _) => {}
        }
        Some(ts)
    }

    fn column_expr(&self, column: &ColumnDefinition) -> Expr {
        let ty = column.warehouse_type();
        let expr = set_time_zone(col(&column.name), ty, self.time_zone);
        match self.casting {
            Some(rules) => rules.cast_column(&column.name, expr, ty),
            None => expr,
        }
    }
}

fn alias(name: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.space()
        .push(Token::As)
        .space()
        .push(Token::Ident(name.to_string()));
    ts
}
