//! Column definitions of the foreign table.

use serde::{Deserialize, Serialize};

use crate::sql::types::{RelationalType, UnsupportedTypeError, WarehouseType};

/// Reserved column name exposing `count(*)` of the (grouped) scan.
pub const COUNT_COLUMN: &str = "_fdw_count";

/// Reserved column name exposing the ingestion-time partition.
pub const PARTITION_COLUMN: &str = "partition_date";

/// What a column stands for on the warehouse side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// A physical warehouse column of the same name.
    Plain,
    /// `count(*)` aggregate; never part of a GROUP BY key.
    CountAggregate,
    /// The `_PARTITIONTIME` pseudo column.
    PartitionTime,
}

impl ColumnKind {
    /// Classify a column by name.
    pub fn classify(name: &str) -> Self {
        match name {
            COUNT_COLUMN => ColumnKind::CountAggregate,
            PARTITION_COLUMN => ColumnKind::PartitionTime,
            _ => ColumnKind::Plain,
        }
    }
}

/// A column of the foreign table as declared by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub relational_type: RelationalType,
    pub ordinal: usize,
    pub kind: ColumnKind,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, relational_type: RelationalType, ordinal: usize) -> Self {
        let name = name.into();
        let kind = ColumnKind::classify(&name);
        Self {
            name,
            relational_type,
            ordinal,
            kind,
        }
    }

    /// Build a definition from the host's `(type_oid, base_type_name)` pair.
    pub fn from_catalog(
        name: impl Into<String>,
        type_oid: u32,
        base_type_name: &str,
        ordinal: usize,
    ) -> Result<Self, UnsupportedTypeError> {
        let relational_type = RelationalType::resolve(type_oid, base_type_name)?;
        Ok(Self::new(name, relational_type, ordinal))
    }

    pub fn warehouse_type(&self) -> WarehouseType {
        self.relational_type.warehouse_type()
    }
}

/// Build an ordered column list from `(name, type)` pairs.
pub fn columns<'a>(
    defs: impl IntoIterator<Item = (&'a str, RelationalType)>,
) -> Vec<ColumnDefinition> {
    defs.into_iter()
        .enumerate()
        .map(|(ordinal, (name, ty))| ColumnDefinition::new(name, ty, ordinal))
        .collect()
}

/// Find a column by name.
pub fn find_column<'a>(columns: &'a [ColumnDefinition], name: &str) -> Option<&'a ColumnDefinition> {
    columns.iter().find(|c| c.name == name)
}
