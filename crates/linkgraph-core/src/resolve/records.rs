use crate::{
    error::Error,
    model::{EntityModel, EntitySource, FieldModel},
    obs::MetricsEvent,
    resolve::{ResolveContext, computed::evaluate, fields::fetch_fields},
    types::Id,
    value::Record,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// FieldPlan
///
/// What one entity needs in order to produce a set of wanted names:
/// - `raw`: columns to fetch (storage entities)
/// - `inner`: names to request from the embedded entity
/// - `computed`: derived fields in dependency order
/// - `forwarded`: inner inputs copied through unchanged (link keys)
///

#[derive(Default)]
struct FieldPlan<'a> {
    raw: Vec<&'a str>,
    inner: BTreeSet<&'a str>,
    computed: Vec<&'a FieldModel>,
    forwarded: Vec<&'a str>,
}

impl<'a> FieldPlan<'a> {
    fn build(entity: &'a EntityModel, wanted: &BTreeSet<&'a str>) -> Result<Self, Error> {
        let mut plan = Self::default();
        let mut done = BTreeSet::new();

        for &name in wanted {
            match entity.get_field(name) {
                Some(field) => plan.visit(entity, field, &mut done, &mut BTreeSet::new())?,
                None if entity.inner().is_some_and(|i| i.has_input(name)) => {
                    plan.inner.insert(name);
                    plan.forwarded.push(name);
                }
                None => return Err(Error::unknown_field(entity.name(), name)),
            }
        }

        Ok(plan)
    }

    // Depth-first over dependencies so computed fields land after their inputs.
    fn visit(
        &mut self,
        entity: &'a EntityModel,
        field: &'a FieldModel,
        done: &mut BTreeSet<&'a str>,
        visiting: &mut BTreeSet<&'a str>,
    ) -> Result<(), Error> {
        let name = field.name();
        if done.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(Error::missing_dependency(entity.name(), name, name));
        }

        match entity.source() {
            EntitySource::Table(_) if field.is_raw() => self.raw.push(name),
            EntitySource::Table(_) => {
                for dep in field.dependencies() {
                    let dep_field = entity
                        .get_field(dep)
                        .ok_or_else(|| Error::missing_dependency(entity.name(), name, dep))?;
                    self.visit(entity, dep_field, done, visiting)?;
                }
                self.computed.push(field);
            }
            EntitySource::Embedded(_) => {
                self.inner
                    .extend(field.dependencies().iter().map(String::as_str));
                self.computed.push(field);
            }
        }

        visiting.remove(name);
        done.insert(name);

        Ok(())
    }
}

/// Load `wanted` names for a batch of ids.
///
/// Storage entities fetch their raw columns once and evaluate computed fields
/// on top; embedding entities recurse into the inner entity with the same id
/// batch and evaluate their own fields over the inner records. Either way
/// exactly one store call is made per storage table touched.
pub fn load_records(
    ctx: ResolveContext<'_>,
    entity: &EntityModel,
    ids: &BTreeSet<Id>,
    wanted: &BTreeSet<&str>,
) -> Result<BTreeMap<Id, Record>, Error> {
    let plan = FieldPlan::build(entity, wanted)?;

    match entity.source() {
        EntitySource::Table(_) => {
            let mut records = fetch_fields(ctx.store, entity, ids, &plan.raw)?;
            if !ids.is_empty() {
                ctx.sink.record(MetricsEvent::FieldBatch {
                    entity: entity.name(),
                    ids: ids.len(),
                    found: records.len(),
                    fields: plan.raw.len(),
                });
            }

            for record in records.values_mut() {
                for field in &plan.computed {
                    let value = evaluate(entity.name(), field, record, ctx.enums)?;
                    record.insert(field.name(), value);
                }
            }

            Ok(records)
        }

        EntitySource::Embedded(inner) => {
            let inner_records = load_records(ctx, inner, ids, &plan.inner)?;

            inner_records
                .into_iter()
                .map(|(id, inputs)| {
                    let mut record = Record::new();
                    for field in &plan.computed {
                        record.insert(
                            field.name(),
                            evaluate(entity.name(), field, &inputs, ctx.enums)?,
                        );
                    }
                    for &name in &plan.forwarded {
                        if let Some(value) = inputs.get(name) {
                            record.insert(name, value.clone());
                        }
                    }

                    Ok((id, record))
                })
                .collect()
        }
    }
}
