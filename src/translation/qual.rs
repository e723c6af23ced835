//! Qualifier translation: host filters to WHERE predicates and parameters.
//!
//! Every value is bound as a typed parameter. The parameter's type comes
//! from the filtered column's declared type, never from the value itself,
//! so `year = '2017'` on a bigint column still binds an INT64.

use serde::Serialize;
use tracing::{trace, warn};

use super::TranslateError;
use crate::model::{
    find_column, ColumnDefinition, ColumnKind, ListQuantifier, Operator, QualValue, Qualifier,
    Value,
};
use crate::sql::expr::{col, param, Expr, Predicate};
use crate::sql::params::{ParameterNames, QueryParameter};
use crate::sql::types::WarehouseType;

/// A qualifier left out of the WHERE clause.
///
/// Skipping only widens the result; the host re-checks every qualifier on
/// the rows it receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedQualifier {
    /// Text form of the qualifier.
    pub qualifier: String,
    pub reason: TranslateError,
}

/// One translated qualifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedQualifier {
    pub predicate: Predicate,
    pub parameters: Vec<QueryParameter>,
}

/// A translated qualifier set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Predicates to conjoin, in qualifier order.
    pub predicates: Vec<Predicate>,
    /// Parameters in placeholder order.
    pub parameters: Vec<QueryParameter>,
    pub skipped: Vec<SkippedQualifier>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Translate a single qualifier against the table's columns.
pub fn translate_qualifier(
    qual: &Qualifier,
    columns: &[ColumnDefinition],
    names: &mut ParameterNames,
) -> Result<TranslatedQualifier, TranslateError> {
    let column = find_column(columns, &qual.field_name)
        .ok_or_else(|| TranslateError::UnknownColumn(qual.field_name.clone()))?;

    let (left, ty) = match column.kind {
        ColumnKind::Plain => (col(&column.name), column.warehouse_type()),
        ColumnKind::PartitionTime => (Expr::PartitionTime, WarehouseType::Timestamp),
        ColumnKind::CountAggregate => {
            return Err(TranslateError::AggregateFilter(column.name.clone()));
        }
    };

    let mut bind = |value: &Value| {
        let name = names.allocate(&qual.field_name);
        let parameter = QueryParameter::new(name.clone(), ty, value.clone());
        (param(&name), parameter)
    };

    match &qual.value {
        QualValue::Null => {
            let negated = match qual.operator {
                Operator::Eq => false,
                Operator::Ne => true,
                op => {
                    return Err(TranslateError::NullComparison {
                        field: qual.field_name.clone(),
                        operator: op,
                    })
                }
            };
            Ok(TranslatedQualifier {
                predicate: Predicate::IsNull {
                    expr: left,
                    negated,
                },
                parameters: Vec::new(),
            })
        }
        QualValue::Scalar(value) => {
            let (right, parameter) = bind(value);
            Ok(TranslatedQualifier {
                predicate: Predicate::Compare {
                    left,
                    op: qual.operator,
                    right,
                },
                parameters: vec![parameter],
            })
        }
        QualValue::List { values, quantifier } => {
            let negated = match (qual.operator, quantifier) {
                (Operator::Eq, ListQuantifier::Any) => false,
                (Operator::Ne, ListQuantifier::All) => true,
                (op, q) => {
                    return Err(TranslateError::UnsupportedList {
                        field: qual.field_name.clone(),
                        operator: op,
                        quantifier: *q,
                    })
                }
            };
            if values.is_empty() {
                return Err(TranslateError::EmptyList(qual.field_name.clone()));
            }

            let (placeholders, parameters): (Vec<_>, Vec<_>) = values.iter().map(&mut bind).unzip();
            Ok(TranslatedQualifier {
                predicate: Predicate::InList {
                    expr: left,
                    values: placeholders,
                    negated,
                },
                parameters,
            })
        }
    }
}

/// Translate all qualifiers.
///
/// Qualifiers that cannot be expressed are skipped with a warning. A
/// qualifier on a column the table does not have is a hard error.
pub fn build_where_clause(
    quals: &[Qualifier],
    columns: &[ColumnDefinition],
) -> Result<WhereClause, TranslateError> {
    let mut names = ParameterNames::new();
    let mut clause = WhereClause::default();

    for qual in quals {
        match translate_qualifier(qual, columns, &mut names) {
            Ok(translated) => {
                trace!(qualifier = %qual, "translated qualifier");
                clause.predicates.push(translated.predicate);
                clause.parameters.extend(translated.parameters);
            }
            Err(e @ TranslateError::UnknownColumn(_)) => return Err(e),
            Err(reason) => {
                warn!(qualifier = %qual, %reason, "qualifier not pushed down");
                clause.skipped.push(SkippedQualifier {
                    qualifier: qual.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(clause)
}

/// Convert the host's `(field, operator, value)` triples.
///
/// Triples with an operator outside the translation table are returned as
/// skipped rather than failing the scan.
pub fn qualifiers_from_host<I, F, O>(quals: I) -> (Vec<Qualifier>, Vec<SkippedQualifier>)
where
    I: IntoIterator<Item = (F, O, Value)>,
    F: Into<String>,
    O: AsRef<str>,
{
    let mut typed = Vec::new();
    let mut skipped = Vec::new();

    for (field, operator, value) in quals {
        let field = field.into();
        match Qualifier::from_host(field.clone(), operator.as_ref(), value.clone()) {
            Ok(qual) => typed.push(qual),
            Err(e) => {
                warn!(field = %field, operator = operator.as_ref(), "qualifier not pushed down");
                skipped.push(SkippedQualifier {
                    qualifier: format!("{} {} {}", field, operator.as_ref(), value),
                    reason: e.into(),
                });
            }
        }
    }

    (typed, skipped)
}
