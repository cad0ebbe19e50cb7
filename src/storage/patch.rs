//! Partial-update statement builder.
//!
//! Turns a [`UserPatch`] into a single `UPDATE users SET ... WHERE id = ?`
//! statement. Keys are checked against [`UserField`] before any SQL is
//! produced, and every value, including the row id, is a bound parameter.
//! Column names come from the allow-list, never from the payload.

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::error::{Result, UserDbError};
use crate::model::{PatchValue, UserField, UserPatch};
use crate::storage::users::require_id;

/// A validated partial update, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchStatement<'a> {
    id: &'a str,
    assignments: Vec<(UserField, &'a PatchValue)>,
}

impl<'a> PatchStatement<'a> {
    /// Validate `patch` and collect its assignments in column order.
    ///
    /// Fails with `InvalidArgument` when `id` is empty, when `data` is empty,
    /// or when `data` names a column outside the mutable field set.
    pub fn build(patch: &'a UserPatch) -> Result<Self> {
        require_id(&patch.id)?;
        if patch.data.is_empty() {
            return Err(UserDbError::InvalidArgument(
                "patch data must contain at least one field".to_string(),
            ));
        }

        let mut assignments = patch
            .data
            .iter()
            .map(|(key, value)| key.parse::<UserField>().map(|field| (field, value)))
            .collect::<Result<Vec<_>>>()?;
        assignments.sort_by_key(|(field, _)| *field);

        Ok(Self {
            id: &patch.id,
            assignments,
        })
    }

    /// Statement text with numbered placeholders; the id is always last.
    pub fn sql(&self) -> String {
        let set = self
            .assignments
            .iter()
            .enumerate()
            .map(|(idx, (field, _))| format!("{} = ?{}", field.column(), idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE users SET {set} WHERE id = ?{}",
            self.assignments.len() + 1
        )
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> Vec<&dyn ToSql> {
        let mut params: Vec<&dyn ToSql> = self
            .assignments
            .iter()
            .map(|(_, value)| *value as &dyn ToSql)
            .collect();
        params.push(&self.id);
        params
    }

    pub fn fields(&self) -> impl Iterator<Item = UserField> + '_ {
        self.assignments.iter().map(|(field, _)| *field)
    }
}

impl ToSql for PatchValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Integer(value) => ToSqlOutput::from(*value),
            Self::Float(value) => ToSqlOutput::from(*value),
            Self::Bool(value) => ToSqlOutput::from(*value),
            Self::Text(value) => ToSqlOutput::from(value.as_str()),
        })
    }
}
