//! Business dispatch and the person-search operation
//!
//! Dispatch routes on the request's `method` field; the set of valid
//! methods is fixed at registration time. The person-search operation is
//! the example business step: it validates its payload, builds equality
//! filters from the non-empty fields, and projects the matched rows into
//! its output shape.

use async_trait::async_trait;
use portico_core::{
    CoreError, Field, Filter, SearchRequest, Sort, Step, StepInput, Transition,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::warn;

use crate::context::InvocationContext;
use crate::state::{business_continuation, business_step};
use crate::steps::terminate;
use crate::util::clean;

/// Method name of the person-search business operation
pub const PERSON_SEARCH_METHOD: &str = "person-search";

/// Remote object searched by the person-search operation
pub const PERSON_OBJECT: &str = "contact_person";

/// Routes the invocation to the business step named by the request
pub struct DispatchStep {
    methods: HashSet<String>,
}

impl DispatchStep {
    /// Create a dispatch step over the registered business methods
    pub fn new(methods: HashSet<String>) -> Self {
        Self { methods }
    }
}

#[async_trait]
impl Step<InvocationContext> for DispatchStep {
    fn step_type(&self) -> &str {
        "app-process"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let method = ctx.request()?.method();

        if !self.methods.contains(&method) {
            warn!(invocation = %ctx.id, %method, "unknown business method");
            return Ok(terminate(
                json!({
                    "status": "ER",
                    "error": {
                        "code": "2",
                        "description": format!("Not a valid method [{method}]"),
                    }
                }),
                400,
            ));
        }

        Ok(Transition::goto(business_step(&method)))
    }
}

/// Searches contact persons matching the caller-supplied criteria
pub struct PersonSearchStep;

#[async_trait]
impl Step<InvocationContext> for PersonSearchStep {
    fn step_type(&self) -> &str {
        "app-process-person-search"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let request = ctx.request()?;

        let data = match request.data() {
            Some(data) => data,
            None => return Ok(terminate(json!({ "error": "Missing data." }), 403)),
        };

        // Empty fields contribute no filter clause
        let mut filters = Vec::new();
        for field in ["firstname", "surname"] {
            let value = clean(data.get(field));
            if !value.is_empty() {
                filters.push(Filter::equals(field, urlencoding::encode(&value).into_owned()));
            }
        }

        let search = SearchRequest::new(PERSON_OBJECT)
            .with_fields([
                Field::new("firstname"),
                Field::new("surname"),
                Field::new("guid"),
                Field::new("etag"),
                Field::new("modifieddate"),
            ])
            .with_filters(filters)
            .with_sorts([Sort::asc("firstname")])
            .with_row_limit(99999);

        Ok(Transition::call(
            search,
            business_continuation(PERSON_SEARCH_METHOD),
        ))
    }
}

/// Shapes the person-search result into the operation's output
pub struct PersonSearchResponseStep;

#[async_trait]
impl Step<InvocationContext> for PersonSearchResponseStep {
    fn step_type(&self) -> &str {
        "app-process-person-search-response"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = input.response()?;

        if response.status.is_error() {
            warn!(invocation = %ctx.id, "person search failed upstream");
            return Ok(terminate(json!({ "error": "Can not process request." }), 500));
        }

        let people: Vec<Value> = response
            .rows()
            .iter()
            .map(|row| {
                json!({
                    "firstname": clean(row.get("firstname")),
                    "lastname": clean(row.get("surname")),
                    "guid": row.get("guid").cloned().unwrap_or(Value::Null),
                    "etag": row.get("etag").cloned().unwrap_or(Value::Null),
                    "modifieddatetime": row.get("modifieddate").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        Ok(terminate(
            json!({
                "method": PERSON_SEARCH_METHOD,
                "status": "OK",
                "data": people,
            }),
            200,
        ))
    }
}
