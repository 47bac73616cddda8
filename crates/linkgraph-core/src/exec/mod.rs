//! Query execution engine.
//!
//! Root links run in parallel on a bounded rayon pool. Inside one root the
//! request tree is walked depth by depth: one field batch per (entity, id
//! set), one link batch per (link, source-key set), and sibling links at the
//! same depth fanned out in parallel. Depth n+1 waits only on its parent
//! link's target ids.

mod cancel;


pub use cancel::CancelToken;

use crate::{
    config::{ConfigError, EngineConfig},
    error::Error,
    model::{EntityModel, LinkModel},
    obs::{MetricsEvent, MetricsSink, TracingSink},
    query::{FieldPath, QueryError, Request, Response, ResultObject, ResultValue, Selection, SelectionItem},
    resolve::{LinkTargets, ResolveContext, load_records, resolve_link, resolve_root},
    schema::Schema,
    store::Store,
    types::Id,
    value::{Record, Value},
};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use tracing::{debug, trace};

const LINK_WITHOUT_SELECTION: &str = "link selected without a sub-selection";
const FIELD_WITH_SELECTION: &str = "field selected with a sub-selection";
const REPEATED_NAME: &str = "name selected more than once at one level";

///
/// Engine
///
/// Owns the worker pool and the explicit dependencies of every execution:
/// the composed schema, the store capability, and the metrics sink.
///

pub struct Engine {
    schema: Arc<Schema>,
    store: Arc<dyn Store>,
    sink: Arc<dyn MetricsSink>,
    pool: ThreadPool,
}

impl Engine {
    pub fn new(
        schema: Arc<Schema>,
        store: Arc<dyn Store>,
        config: &EngineConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        let prefix = config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|err| ConfigError::Invalid(format!("worker pool: {err}")))?;

        debug!(
            workers = config.worker_threads,
            entities = schema.entities().count(),
            "engine ready"
        );

        Ok(Self {
            schema,
            store,
            sink: Arc::new(TracingSink),
            pool,
        })
    }

    /// Replace the default `TracingSink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub fn execute(&self, request: &Request) -> Response {
        self.execute_with(request, &CancelToken::new())
    }

    /// Execute every root link of `request`. Each root succeeds or fails on
    /// its own; a failure never touches a sibling's result.
    #[must_use]
    pub fn execute_with(&self, request: &Request, cancel: &CancelToken) -> Response {
        // a root named twice is ambiguous; it keeps one slot and fails there
        let mut seen = BTreeSet::new();
        let mut repeated = BTreeSet::new();
        let mut roots: Vec<(&str, &Selection)> = Vec::new();
        for (name, selection) in request.roots() {
            if seen.insert(name) {
                roots.push((name, selection));
            } else {
                repeated.insert(name);
            }
        }

        let results: Vec<_> = self.pool.install(|| {
            roots
                .par_iter()
                .map(|&(name, selection)| {
                    let result = if repeated.contains(name) {
                        Err(QueryError::new(
                            FieldPath::root(name),
                            Error::invalid_selection("root", name, REPEATED_NAME),
                        ))
                    } else {
                        self.run_root(name, selection, cancel)
                    };

                    (name, result)
                })
                .collect()
        });

        let mut response = Response::default();
        for (name, result) in results {
            if let Err(err) = &result {
                let path = err.path.to_string();
                self.sink.record(MetricsEvent::RootFailed {
                    root: name,
                    path: &path,
                    class: err.error.class(),
                });
            }
            response.insert(name, result);
        }

        response
    }

    fn run_root(
        &self,
        name: &str,
        selection: &Selection,
        cancel: &CancelToken,
    ) -> Result<ResultValue, QueryError> {
        let path = FieldPath::root(name);
        let at_root = |error| QueryError::new(path.clone(), error);

        cancel.check().map_err(at_root)?;

        let root = self
            .schema
            .root(name)
            .ok_or_else(|| at_root(Error::unknown_link("root", name)))?;
        let entity = self
            .schema
            .entity(root.target())
            .ok_or_else(|| at_root(Error::unknown_link("root", name)))?;
        if selection.is_empty() {
            return Err(at_root(Error::invalid_selection(
                "root",
                name,
                LINK_WITHOUT_SELECTION,
            )));
        }
        validate_selection(&self.schema, entity, selection, &path)?;

        let ids = resolve_root(self.store.as_ref(), root).map_err(at_root)?;
        self.sink.record(MetricsEvent::RootScan {
            root: name,
            ids: ids.len(),
        });

        let walk = Walk {
            schema: &self.schema,
            ctx: ResolveContext {
                store: self.store.as_ref(),
                enums: self.schema.enums(),
                sink: self.sink.as_ref(),
            },
            cancel,
        };
        let batch: BTreeSet<Id> = ids.iter().copied().collect();
        let nodes = walk.resolve(entity, &batch, selection, &path)?;

        Ok(ResultValue::List(
            ids.iter().map(|&id| node(&nodes, id)).collect(),
        ))
    }
}

///
/// Walk
/// Per-root traversal state shared by every depth.
///

struct Walk<'a> {
    schema: &'a Schema,
    ctx: ResolveContext<'a>,
    cancel: &'a CancelToken,
}

impl Walk<'_> {
    // Resolve one depth: load the batch, follow links, assemble in request order.
    fn resolve(
        &self,
        entity: &EntityModel,
        ids: &BTreeSet<Id>,
        selection: &Selection,
        path: &FieldPath,
    ) -> Result<BTreeMap<Id, ResultObject>, QueryError> {
        self.cancel
            .check()
            .map_err(|error| QueryError::new(path.clone(), error))?;

        let mut wanted = BTreeSet::new();
        let mut links = Vec::new();
        for item in selection.items() {
            match item {
                SelectionItem::Field(name) => {
                    wanted.insert(name.as_str());
                }
                SelectionItem::Link(name, sub) => {
                    if let Some(link) = entity.get_link(name) {
                        wanted.insert(link.required_field());
                        links.push((name.as_str(), link, sub));
                    }
                }
            }
        }

        let records = load_records(self.ctx, entity, ids, &wanted)
            .map_err(|error| tag_error(path, error))?;
        trace!(
            entity = entity.name(),
            ids = ids.len(),
            found = records.len(),
            "records loaded"
        );

        let followed = links
            .par_iter()
            .map(|&(name, link, sub)| {
                self.follow(entity, link, &records, sub, &path.child(name))
                    .map(|values| (name, values))
            })
            .collect::<Result<BTreeMap<&str, BTreeMap<Id, ResultValue>>, QueryError>>()?;

        Ok(records
            .iter()
            .map(|(&id, record)| (id, assemble(selection, id, record, &followed)))
            .collect())
    }

    // Resolve one link for every record of the parent batch.
    fn follow(
        &self,
        entity: &EntityModel,
        link: &LinkModel,
        records: &BTreeMap<Id, Record>,
        selection: &Selection,
        path: &FieldPath,
    ) -> Result<BTreeMap<Id, ResultValue>, QueryError> {
        let tag = |error| tag_error(path, error);

        self.cancel.check().map_err(tag)?;
        let target = target_entity(self.schema, entity, link).map_err(tag)?;

        let keys = records
            .iter()
            .map(|(&id, record)| Ok((id, link_key(entity, link, record)?)))
            .collect::<Result<BTreeMap<Id, Option<Id>>, Error>>()
            .map_err(tag)?;
        let source_keys: BTreeSet<Id> = keys.values().flatten().copied().collect();

        let targets =
            resolve_link(self.ctx.store, entity, link.name(), &source_keys).map_err(tag)?;
        let target_ids = targets.target_ids();
        if !source_keys.is_empty() {
            self.ctx.sink.record(MetricsEvent::LinkBatch {
                entity: entity.name(),
                link: link.name(),
                sources: source_keys.len(),
                targets: target_ids.len(),
            });
        }

        let nodes = self.resolve(target, &target_ids, selection, path)?;

        Ok(keys
            .into_iter()
            .map(|(id, key)| {
                let value = match (&targets, key) {
                    (LinkTargets::Many(map), Some(key)) => ResultValue::List(
                        map.get(&key)
                            .into_iter()
                            .flatten()
                            .map(|&t| node(&nodes, t))
                            .collect(),
                    ),
                    (LinkTargets::Many(_), None) => ResultValue::List(Vec::new()),
                    (LinkTargets::One(map), Some(key)) => map
                        .get(&key)
                        .copied()
                        .flatten()
                        .map_or(ResultValue::Null, |t| node(&nodes, t)),
                    (LinkTargets::One(_), None) => ResultValue::Null,
                };

                (id, value)
            })
            .collect())
    }
}

// Reject unknown names and malformed nesting before any backend call.
fn validate_selection(
    schema: &Schema,
    entity: &EntityModel,
    selection: &Selection,
    path: &FieldPath,
) -> Result<(), QueryError> {
    let mut seen = BTreeSet::new();

    for item in selection.items() {
        let item_path = path.child(item.name());
        let fail = |error| QueryError::new(item_path.clone(), error);

        // results are keyed by name, so a repeat would overwrite its twin
        if !seen.insert(item.name()) {
            return Err(fail(Error::invalid_selection(
                entity.name(),
                item.name(),
                REPEATED_NAME,
            )));
        }

        match item {
            SelectionItem::Field(name) => {
                if entity.get_field(name).is_some() {
                    continue;
                }
                let error = if entity.get_link(name).is_some() {
                    Error::invalid_selection(entity.name(), name, LINK_WITHOUT_SELECTION)
                } else {
                    Error::unknown_field(entity.name(), name)
                };

                return Err(fail(error));
            }
            SelectionItem::Link(name, sub) => {
                let Some(link) = entity.get_link(name) else {
                    let error = if entity.get_field(name).is_some() {
                        Error::invalid_selection(entity.name(), name, FIELD_WITH_SELECTION)
                    } else {
                        Error::unknown_link(entity.name(), name)
                    };

                    return Err(fail(error));
                };
                if sub.is_empty() {
                    return Err(fail(Error::invalid_selection(
                        entity.name(),
                        name,
                        LINK_WITHOUT_SELECTION,
                    )));
                }

                let target = target_entity(schema, entity, link).map_err(fail)?;
                validate_selection(schema, target, sub, &item_path)?;
            }
        }
    }

    Ok(())
}

fn target_entity<'s>(
    schema: &'s Schema,
    entity: &EntityModel,
    link: &LinkModel,
) -> Result<&'s EntityModel, Error> {
    schema
        .entity(link.target())
        .map(Arc::as_ref)
        .ok_or_else(|| Error::unknown_link(entity.name(), link.name()))
}

// A null or absent key means "no target"; anything but an integer is a defect.
fn link_key(entity: &EntityModel, link: &LinkModel, record: &Record) -> Result<Option<Id>, Error> {
    match record.get(link.required_field()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_id().map(Some).ok_or_else(|| Error::InvalidKey {
            entity: entity.name().to_string(),
            link: link.name().to_string(),
            value: value.clone(),
        }),
    }
}

fn assemble(
    selection: &Selection,
    id: Id,
    record: &Record,
    followed: &BTreeMap<&str, BTreeMap<Id, ResultValue>>,
) -> ResultObject {
    selection
        .items()
        .iter()
        .map(|item| {
            let value = match item {
                SelectionItem::Field(name) => record
                    .get(name)
                    .cloned()
                    .map_or(ResultValue::Null, ResultValue::from),
                SelectionItem::Link(name, _) => followed
                    .get(name.as_str())
                    .and_then(|values| values.get(&id))
                    .cloned()
                    .unwrap_or(ResultValue::Null),
            };

            (item.name().to_string(), value)
        })
        .collect()
}

fn node(nodes: &BTreeMap<Id, ResultObject>, id: Id) -> ResultValue {
    nodes
        .get(&id)
        .cloned()
        .map_or(ResultValue::Null, ResultValue::Object)
}

// Field-level failures carry the field name in the path.
fn tag_error(path: &FieldPath, error: Error) -> QueryError {
    let path = match &error {
        Error::UnknownField { field, .. }
        | Error::MissingDependency { field, .. }
        | Error::TypeMismatch { field, .. } => path.child(field),
        _ => path.clone(),
    };

    QueryError::new(path, error)
}
