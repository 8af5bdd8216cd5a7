use crate::{
    data::{Value, parse_typed_value},
    error::{AnalysisError, Result},
    frame::Table,
    schema::ColumnType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOperator {
    fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
        }
    }
}

/// A `column <op> operand` condition, e.g. `comment_count>1000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: ComparisonOperator,
    pub operand: Value,
}

impl Predicate {
    pub fn new(column: &str, operator: ComparisonOperator, operand: Value) -> Self {
        Self {
            column: column.to_string(),
            operator,
            operand,
        }
    }

    /// Parses `column<op>value`, typing the operand after the column in `table`.
    pub fn parse(spec: &str, table: &Table) -> Result<Self> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::invalid("empty predicate"));
        }
        for needle in ["!=", ">=", "<=", "=", ">", "<"] {
            let Some(idx) = trimmed.find(needle) else {
                continue;
            };
            let operator = match needle {
                "=" => ComparisonOperator::Eq,
                "!=" => ComparisonOperator::NotEq,
                ">" => ComparisonOperator::Gt,
                ">=" => ComparisonOperator::Ge,
                "<" => ComparisonOperator::Lt,
                _ => ComparisonOperator::Le,
            };
            let column = trimmed[..idx].trim();
            let raw = unquote(trimmed[idx + needle.len()..].trim());
            if column.is_empty() {
                return Err(AnalysisError::invalid(format!(
                    "predicate '{spec}' is missing a column"
                )));
            }
            let column_idx = table.column_index(column)?;
            let datatype = table.column_type(column_idx).unwrap_or(ColumnType::String);
            let operand = parse_typed_value(raw, datatype)
                .map_err(|err| AnalysisError::invalid(format!("predicate '{spec}': {err}")))?
                .ok_or_else(|| {
                    AnalysisError::invalid(format!("predicate '{spec}' is missing a value"))
                })?;
            return Ok(Self::new(column, operator, operand));
        }
        Err(AnalysisError::invalid(format!(
            "predicate '{spec}' has no comparison operator"
        )))
    }

    pub fn matches(&self, value: &Value) -> bool {
        let ordering = value.cmp(&self.operand);
        match self.operator {
            ComparisonOperator::Eq => ordering.is_eq(),
            ComparisonOperator::NotEq => ordering.is_ne(),
            ComparisonOperator::Gt => ordering.is_gt(),
            ComparisonOperator::Ge => ordering.is_ge(),
            ComparisonOperator::Lt => ordering.is_lt(),
            ComparisonOperator::Le => ordering.is_le(),
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {} {}",
            self.column,
            self.operator.symbol(),
            self.operand
        )
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMeta, Schema};

    fn table() -> Table {
        let schema = Schema::new(vec![
            ColumnMeta {
                name: "channel_title".into(),
                datatype: ColumnType::String,
            },
            ColumnMeta {
                name: "comment_count".into(),
                datatype: ColumnType::Integer,
            },
        ]);
        Table::new(schema, Vec::new()).unwrap()
    }

    #[test]
    fn parse_types_operand_from_column() {
        let predicate = Predicate::parse("comment_count>1000", &table()).unwrap();
        assert_eq!(predicate.operator, ComparisonOperator::Gt);
        assert_eq!(predicate.operand, Value::Integer(1000));
        assert!(predicate.matches(&Value::Integer(1500)));
        assert!(!predicate.matches(&Value::Integer(1000)));
    }

    #[test]
    fn parse_prefers_two_character_operators() {
        let predicate = Predicate::parse("comment_count >= 50", &table()).unwrap();
        assert_eq!(predicate.operator, ComparisonOperator::Ge);
        assert!(predicate.matches(&Value::Integer(50)));
    }

    #[test]
    fn parse_unquotes_string_operands() {
        let predicate = Predicate::parse("channel_title != 'Troom Troom FR'", &table()).unwrap();
        assert_eq!(predicate.operand, Value::String("Troom Troom FR".into()));
        assert_eq!(predicate.describe(), "channel_title != Troom Troom FR");
    }

    #[test]
    fn parse_rejects_bad_operands() {
        assert!(Predicate::parse("comment_count>lots", &table()).is_err());
        assert!(Predicate::parse("likes>1", &table()).is_err());
        assert!(Predicate::parse("comment_count", &table()).is_err());
    }
}
