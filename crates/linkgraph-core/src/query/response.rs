use crate::{error::Error, value::Value};
use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::fmt;
use thiserror::Error as ThisError;

/// Fields of one resolved node, in request order.
pub type ResultObject = IndexMap<String, ResultValue>;

///
/// ResultValue
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    Null,
    Scalar(Value),
    Object(ResultObject),
    List(Vec<ResultValue>),
}

impl ResultValue {
    /// Child of an object node.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Scalar(Value::Null))
    }
}

impl From<Value> for ResultValue {
    fn from(value: Value) -> Self {
        if value.is_null() {
            Self::Null
        } else {
            Self::Scalar(value)
        }
    }
}

///
/// FieldPath
/// Dotted location inside a request tree, e.g. `features.planets.name`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());

        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

///
/// QueryError
/// A resolver failure tagged with the request path it aborted.
///

#[derive(Debug, ThisError)]
#[error("{path}: {error}")]
pub struct QueryError {
    pub path: FieldPath,
    pub error: Error,
}

impl QueryError {
    #[must_use]
    pub const fn new(path: FieldPath, error: Error) -> Self {
        Self { path, error }
    }
}

impl Serialize for QueryError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("path", &self.path.to_string())?;
        map.serialize_entry("message", &self.error.to_string())?;
        map.serialize_entry("class", &self.error.class().to_string())?;
        map.end()
    }
}

///
/// Response
///
/// One entry per requested root link, in request order. Root links fail
/// independently so each entry carries its own result.
///

#[derive(Debug, Default)]
pub struct Response {
    roots: IndexMap<String, Result<ResultValue, QueryError>>,
}

impl Response {
    pub(crate) fn insert(&mut self, root: &str, result: Result<ResultValue, QueryError>) {
        self.roots.insert(root.to_string(), result);
    }

    #[must_use]
    pub fn root(&self, name: &str) -> Option<&Result<ResultValue, QueryError>> {
        self.roots.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<ResultValue, QueryError>)> {
        self.roots.iter().map(|(name, result)| (name.as_str(), result))
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.roots.values().all(Result::is_ok)
    }

    pub fn errors(&self) -> impl Iterator<Item = &QueryError> {
        self.roots.values().filter_map(|r| r.as_ref().err())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

// Failed roots serialize as `{"error": {path, message, class}}`.
impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Failed<'a> {
            error: &'a QueryError,
        }

        let mut map = serializer.serialize_map(Some(self.roots.len()))?;
        for (name, result) in &self.roots {
            match result {
                Ok(value) => map.serialize_entry(name, value)?,
                Err(error) => map.serialize_entry(name, &Failed { error })?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_display_is_dotted() {
        let path = FieldPath::root("features").child("planets").child("name");
        assert_eq!(path.to_string(), "features.planets.name");
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn response_serializes_in_request_order() {
        let mut planet = ResultObject::new();
        planet.insert("name".into(), Value::from("Hoth").into());
        planet.insert("climate".into(), Value::Null.into());

        let mut response = Response::default();
        response.insert("planets", Ok(ResultValue::List(vec![ResultValue::Object(planet)])));
        response.insert(
            "features",
            Err(QueryError::new(
                FieldPath::root("features").child("title"),
                Error::Cancelled,
            )),
        );

        let text = serde_json::to_string(&response).unwrap();
        assert!(text.starts_with(r#"{"planets""#));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["planets"], json!([{ "name": "Hoth", "climate": null }]));
        assert_eq!(json["features"]["error"]["path"], "features.title");
        assert_eq!(json["features"]["error"]["class"], "Cancelled");
        assert!(!response.is_ok());
    }
}
