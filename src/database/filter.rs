use serde_json::{Map, Value};
use uuid::Uuid;

use super::store::StoreError;

/// Document predicate understood by every store backend
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level field equals value
    Eq(&'static str, Value),
    IdIn(Vec<Uuid>),
    Or(Vec<Filter>),
    And(Vec<Filter>),
}

/// Positional parameter produced while rendering a filter to SQL
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Json(Value),
    Ids(Vec<Uuid>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn id_in(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Filter::IdIn(ids.into_iter().collect())
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Evaluate against a stored document (in-memory backend)
    pub fn matches(&self, id: Uuid, document: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => document.get(*field) == Some(value),
            Filter::IdIn(ids) => ids.contains(&id),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(id, document)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(id, document)),
        }
    }

    /// Render as a WHERE clause over `(id UUID, doc JSONB)`, appending parameters
    pub fn to_sql(&self, params: &mut Vec<SqlParam>) -> Result<String, StoreError> {
        match self {
            Filter::All => Ok("TRUE".to_string()),
            Filter::Eq(field, value) => {
                if !is_valid_field(field) {
                    return Err(StoreError::InvalidField(field.to_string()));
                }
                let mut containment = Map::new();
                containment.insert(field.to_string(), value.clone());
                params.push(SqlParam::Json(Value::Object(containment)));
                Ok(format!("doc @> ${}", params.len()))
            }
            Filter::IdIn(ids) => {
                params.push(SqlParam::Ids(ids.clone()));
                Ok(format!("id = ANY(${})", params.len()))
            }
            Filter::Or(filters) => Self::join(filters, " OR ", "FALSE", params),
            Filter::And(filters) => Self::join(filters, " AND ", "TRUE", params),
        }
    }

    fn join(filters: &[Filter], separator: &str, empty: &str, params: &mut Vec<SqlParam>) -> Result<String, StoreError> {
        if filters.is_empty() {
            return Ok(empty.to_string());
        }
        let parts = filters
            .iter()
            .map(|f| f.to_sql(params))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", parts.join(separator)))
    }
}

/// Field names are rendered into JSON parameters, but keep them to plain identifiers anyway
fn is_valid_field(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_and_or_match_documents() {
        let id = Uuid::new_v4();
        let doc = json!({ "username": "jane", "email": "jane@example.com" });

        assert!(Filter::eq("username", "jane").matches(id, &doc));
        assert!(!Filter::eq("username", "john").matches(id, &doc));
        assert!(Filter::eq("username", "john").or(Filter::eq("email", "jane@example.com")).matches(id, &doc));
        assert!(!Filter::eq("username", "jane").and(Filter::eq("email", "x")).matches(id, &doc));
        assert!(Filter::id_in([id]).matches(id, &doc));
        assert!(!Filter::Or(vec![]).matches(id, &doc));
    }

    #[test]
    fn renders_numbered_parameters() {
        let filter = Filter::eq("username", "jane").or(Filter::eq("email", "jane@example.com"));
        let mut params = Vec::new();
        let sql = filter.to_sql(&mut params).unwrap();
        assert_eq!(sql, "(doc @> $1 OR doc @> $2)");
        assert_eq!(params[0], SqlParam::Json(json!({ "username": "jane" })));
        assert_eq!(params[1], SqlParam::Json(json!({ "email": "jane@example.com" })));
    }

    #[test]
    fn renders_id_lists_and_empty_groups() {
        let ids = vec![Uuid::new_v4()];
        let mut params = Vec::new();
        let sql = Filter::id_in(ids.clone()).and(Filter::Or(vec![])).to_sql(&mut params).unwrap();
        assert_eq!(sql, "(id = ANY($1) AND FALSE)");
        assert_eq!(params, vec![SqlParam::Ids(ids)]);
    }

    #[test]
    fn rejects_odd_field_names() {
        let mut params = Vec::new();
        let err = Filter::eq("user'name", "x").to_sql(&mut params).unwrap_err();
        assert!(matches!(err, StoreError::InvalidField(_)));
    }
}
