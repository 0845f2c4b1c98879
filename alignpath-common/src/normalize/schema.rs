//! Canonical response schemas
//!
//! A [`Shape`] is declared once per response type and used twice: rendered as
//! the literal JSON example embedded in prompts, and applied to recovered model
//! output to decide whether it can be trusted. Keeping both on one definition
//! means the prompt and the validator cannot drift apart.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

const INDENT: &str = "  ";

/// Structure of a JSON document
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A string; the payload is the example text shown to the model
    Text(&'static str),
    /// A string restricted to one of the listed values (compared lower-case)
    Choice(&'static [&'static str]),
    /// A list of strings; the payload lists example entries
    TextList(&'static [&'static str]),
    /// A list whose elements all have the given shape
    List(Box<Shape>),
    /// An object with declared fields, in rendering order
    Object(Vec<Field>),
}

/// Named member of an [`Shape::Object`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    /// Required fields must be present; absent or null lists default to `[]`
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// Why a document does not conform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON path of the offending value, e.g. `recommendations[0].priority`
    pub path: String,
    pub problem: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{}: {}", path, self.problem)
    }
}

impl std::error::Error for SchemaViolation {}

/// A response type with a canonical shape and a safe placeholder
pub trait ResponseSchema: DeserializeOwned {
    /// Canonical shape shared by the prompt and validation
    fn shape() -> Shape;

    /// Document substituted when the model output cannot be used
    fn fallback() -> Self;
}

impl Shape {
    /// Render the schema example embedded in prompts
    ///
    /// # Examples
    ///
    /// ```
    /// use alignpath_common::normalize::{Field, Shape};
    ///
    /// let shape = Shape::Object(vec![
    ///     Field::required("topic", Shape::Text("Topic name")),
    ///     Field::required("priority", Shape::Choice(&["high", "medium", "low"])),
    /// ]);
    ///
    /// assert_eq!(
    ///     shape.render(),
    ///     "{\n  \"topic\": \"Topic name\",\n  \"priority\": \"high|medium|low\"\n}"
    /// );
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        match self {
            Shape::Text(example) => push_json_string(out, example),
            Shape::Choice(values) => push_json_string(out, &values.join("|")),
            Shape::TextList(examples) => {
                if examples.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push_str("[\n");
                for (i, example) in examples.iter().enumerate() {
                    push_indent(out, depth + 1);
                    push_json_string(out, example);
                    if i + 1 < examples.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, depth);
                out.push(']');
            }
            Shape::List(item) => {
                out.push_str("[\n");
                push_indent(out, depth + 1);
                item.render_into(out, depth + 1);
                out.push('\n');
                push_indent(out, depth);
                out.push(']');
            }
            Shape::Object(fields) => {
                out.push_str("{\n");
                for (i, field) in fields.iter().enumerate() {
                    push_indent(out, depth + 1);
                    push_json_string(out, field.name);
                    out.push_str(": ");
                    field.shape.render_into(out, depth + 1);
                    if i + 1 < fields.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, depth);
                out.push('}');
            }
        }
    }

    /// Check `value` against this shape and return a normalized copy
    ///
    /// Normalization drops unknown object members, fills absent or null
    /// optional lists with `[]`, and trims and lower-cases choice values.
    pub fn conform(&self, value: &Value) -> Result<Value, SchemaViolation> {
        self.conform_at(value, "")
    }

    fn conform_at(&self, value: &Value, path: &str) -> Result<Value, SchemaViolation> {
        match self {
            Shape::Text(_) => match value {
                Value::String(s) => Ok(Value::String(s.clone())),
                other => Err(violation(path, format!("expected string, found {}", kind(other)))),
            },
            Shape::Choice(allowed) => {
                let Value::String(s) = value else {
                    return Err(violation(
                        path,
                        format!("expected one of {}, found {}", allowed.join("|"), kind(value)),
                    ));
                };
                let folded = s.trim().to_lowercase();
                if allowed.contains(&folded.as_str()) {
                    Ok(Value::String(folded))
                } else {
                    Err(violation(
                        path,
                        format!("'{}' is not one of {}", s, allowed.join("|")),
                    ))
                }
            }
            Shape::TextList(_) => conform_list(&Shape::Text(""), value, path),
            Shape::List(item) => conform_list(item, value, path),
            Shape::Object(fields) => {
                let Value::Object(members) = value else {
                    return Err(violation(path, format!("expected object, found {}", kind(value))));
                };
                let mut normalized = Map::new();
                for field in fields {
                    let field_path = if path.is_empty() {
                        field.name.to_string()
                    } else {
                        format!("{}.{}", path, field.name)
                    };
                    match members.get(field.name) {
                        None | Some(Value::Null)
                            if !field.required && field.shape.defaults_to_empty() =>
                        {
                            normalized.insert(field.name.to_string(), Value::Array(Vec::new()));
                        }
                        None | Some(Value::Null) if !field.required => {}
                        None => {
                            return Err(violation(
                                &field_path,
                                "required field is missing".to_string(),
                            ));
                        }
                        Some(member) => {
                            let conformed = field.shape.conform_at(member, &field_path)?;
                            normalized.insert(field.name.to_string(), conformed);
                        }
                    }
                }
                Ok(Value::Object(normalized))
            }
        }
    }

    fn defaults_to_empty(&self) -> bool {
        matches!(self, Shape::TextList(_) | Shape::List(_))
    }
}

fn conform_list(item: &Shape, value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    let Value::Array(elements) = value else {
        return Err(violation(path, format!("expected list, found {}", kind(value))));
    };
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| item.conform_at(element, &format!("{}[{}]", path, i)))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn violation(path: &str, problem: String) -> SchemaViolation {
    SchemaViolation {
        path: path.to_string(),
        problem,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_json_string(out: &mut String, text: &str) {
    // serde_json escaping keeps rendered examples valid JSON
    out.push_str(&Value::String(text.to_string()).to_string());
}
