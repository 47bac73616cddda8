//! Caller-facing request and result trees.

mod request;
mod response;

pub use request::{Request, Selection, SelectionItem};
pub use response::{FieldPath, QueryError, Response, ResultObject, ResultValue};
