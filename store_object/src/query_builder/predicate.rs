//! WHERE clause shapes
//!
//! A predicate is either an AND-conjunction of exact equalities or a raw
//! boolean expression with bound parameters. Raw expressions use `?` for
//! positional parameters or `:name` for named ones; `\?` is a literal
//! question mark and `::` is left alone as a cast.

use crate::errors::StoreError;
use crate::query_builder::sql_generation::ParamSink;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum WhereParams {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Default for WhereParams {
    fn default() -> Self {
        WhereParams::Positional(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = value AND ...`; a null value means `IS NULL`, no pairs means no filter
    Equality(Vec<(String, Value)>),
    Raw { sql: String, params: WhereParams },
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::Equality(Vec::new())
    }
}

impl Predicate {
    /// The always-true predicate
    pub fn all() -> Self {
        Self::raw("1 = 1", Vec::new())
    }

    pub fn by_id(id: i64) -> Self {
        Self::eq("id", id)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equality(vec![(field.into(), value.into())])
    }

    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Predicate::Raw {
            sql: sql.into(),
            params: WhereParams::Positional(params),
        }
    }

    pub fn raw_named(sql: impl Into<String>, params: Map<String, Value>) -> Self {
        Predicate::Raw {
            sql: sql.into(),
            params: WhereParams::Named(params),
        }
    }

    /// Add another equality; a raw predicate gets the pair ANDed on
    pub fn and(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let (field, value) = (field.into(), value.into());
        match self {
            Predicate::Equality(mut pairs) => {
                pairs.push((field, value));
                Predicate::Equality(pairs)
            }
            Predicate::Raw { sql, params } if value.is_null() => Predicate::Raw {
                sql: format!("({}) AND \"{}\" IS NULL", sql, field),
                params,
            },
            Predicate::Raw {
                sql,
                params: WhereParams::Positional(mut values),
            } => {
                values.push(value);
                Predicate::Raw {
                    sql: format!("({}) AND \"{}\" = ?", sql, field),
                    params: WhereParams::Positional(values),
                }
            }
            Predicate::Raw {
                sql,
                params: WhereParams::Named(mut values),
            } => {
                let mut name = format!("and_{}", field);
                while values.contains_key(&name) {
                    name.push('_');
                }
                values.insert(name.clone(), value);
                Predicate::Raw {
                    sql: format!("({}) AND \"{}\" = :{}", sql, field, name),
                    params: WhereParams::Named(values),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Predicate::Equality(pairs) if pairs.is_empty())
    }
}

impl From<Map<String, Value>> for Predicate {
    fn from(map: Map<String, Value>) -> Self {
        Predicate::Equality(map.into_iter().collect())
    }
}

fn mismatch(message: impl Into<String>) -> StoreError {
    StoreError::InvalidPredicate(message.into())
}

/// Rewrite a raw predicate into numbered placeholders, pushing its parameters
pub(crate) fn render_raw(
    sql: &str,
    params: &WhereParams,
    sink: &mut ParamSink,
) -> Result<String, StoreError> {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut positional_used = 0usize;
    let mut named_used: HashMap<String, String> = HashMap::new();

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            out.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                out.push('?');
            }
            '?' => {
                let WhereParams::Positional(values) = params else {
                    return Err(mismatch("positional placeholder used with named parameters"));
                };
                let value = values.get(positional_used).ok_or_else(|| {
                    mismatch(format!(
                        "placeholder {} has no parameter ({} supplied)",
                        positional_used + 1,
                        values.len()
                    ))
                })?;
                positional_used += 1;
                out.push_str(&sink.push(value.clone()));
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.push_str("::");
            }
            ':' if chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || *next == '_') =>
            {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let WhereParams::Named(values) = params else {
                    return Err(mismatch(format!(
                        "named placeholder :{} used with positional parameters",
                        name
                    )));
                };
                let placeholder = match named_used.get(&name) {
                    Some(placeholder) => placeholder.clone(),
                    None => {
                        let value = values
                            .get(&name)
                            .ok_or_else(|| mismatch(format!("no parameter named '{}'", name)))?;
                        let placeholder = sink.push(value.clone());
                        named_used.insert(name, placeholder.clone());
                        placeholder
                    }
                };
                out.push_str(&placeholder);
            }
            _ => out.push(c),
        }
    }

    if quote.is_some() {
        return Err(mismatch("unterminated quote"));
    }

    match params {
        WhereParams::Positional(values) if values.len() != positional_used => Err(mismatch(
            format!("{} parameters supplied, {} used", values.len(), positional_used),
        )),
        WhereParams::Named(values) if values.len() != named_used.len() => {
            let unused: Vec<&str> = values
                .keys()
                .filter(|name| !named_used.contains_key(*name))
                .map(String::as_str)
                .collect();
            Err(mismatch(format!("unused parameters: {}", unused.join(", "))))
        }
        _ => Ok(out),
    }
}
