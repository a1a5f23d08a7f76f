//! Declarative query schemas.
//!
//! A schema is a conjunction of requirements checked in declaration order, so a
//! default that depends on another field (e.g. the locale on the platform) must
//! be declared after it.

use super::defaults::DefaultFn;
use super::value::{FieldKind, QueryValue};
use super::{Query, ResolvedQuery};
use crate::context::Context;
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

const LOCALE_PATTERN: &str = r"^[a-z]{2}_[A-Z]{2}$";

/// A named, typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Parameter name.
    pub name: &'static str,
    /// Demanded type.
    pub kind: FieldKind,
}

impl Field {
    /// A field of arbitrary kind.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    /// An integer field.
    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    /// A string field.
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::Str)
    }

    /// A locale field.
    pub const fn locale(name: &'static str) -> Self {
        Self::new(name, FieldKind::Locale)
    }

    /// A boolean field.
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// A platform field.
    pub const fn platform(name: &'static str) -> Self {
        Self::new(name, FieldKind::Platform)
    }

    /// An integer list field.
    pub const fn int_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::IntList)
    }

    /// A platform list field.
    pub const fn platform_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::PlatformList)
    }

    /// A tag set field.
    pub const fn tags(name: &'static str) -> Self {
        Self::new(name, FieldKind::Tags)
    }
}

#[derive(Clone)]
enum Fallback {
    Absent,
    Value(QueryValue),
    Resolve(DefaultFn),
}

#[derive(Clone)]
enum Requirement {
    Has(Field),
    Either(Field, Field),
    CanHave(Field, Fallback),
}

/// A conjunction of field requirements.
#[derive(Clone, Default)]
pub struct QuerySchema {
    requirements: Vec<Requirement>,
}

impl QuerySchema {
    /// An empty schema that accepts any query.
    pub fn new() -> Self {
        Self::default()
    }

    /// `field` must be present.
    pub fn has(mut self, field: Field) -> Self {
        self.requirements.push(Requirement::Has(field));
        self
    }

    /// Exactly one of `first` and `second` must be present.
    pub fn has_either(mut self, first: Field, second: Field) -> Self {
        self.requirements.push(Requirement::Either(first, second));
        self
    }

    /// `field` is optional and stays absent when not given.
    pub fn can_have(mut self, field: Field) -> Self {
        self.requirements
            .push(Requirement::CanHave(field, Fallback::Absent));
        self
    }

    /// `field` is optional and defaults to `value`.
    pub fn can_have_or(mut self, field: Field, value: QueryValue) -> Self {
        self.requirements
            .push(Requirement::CanHave(field, Fallback::Value(value)));
        self
    }

    /// `field` is optional and defaults to whatever `resolve` supplies.
    ///
    /// `resolve` only runs when the field is absent.
    pub fn can_have_or_else(mut self, field: Field, resolve: DefaultFn) -> Self {
        self.requirements
            .push(Requirement::CanHave(field, Fallback::Resolve(resolve)));
        self
    }

    /// Validates `query`, returning it with all defaults filled in.
    ///
    /// Unknown keys are carried through untouched.
    pub fn validate(&self, query: &Query, ctx: &Context<'_>) -> AppResult<ResolvedQuery> {
        let mut params: IndexMap<String, QueryValue> = query
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for requirement in &self.requirements {
            match requirement {
                Requirement::Has(field) => {
                    if !params.contains_key(field.name) {
                        return Err(AppError::invalid(format!(
                            "Query is missing required key '{}'",
                            field.name
                        )));
                    }
                    check_field(&mut params, field)?;
                }
                Requirement::Either(first, second) => {
                    match (params.contains_key(first.name), params.contains_key(second.name)) {
                        (true, false) => check_field(&mut params, first)?,
                        (false, true) => check_field(&mut params, second)?,
                        (true, true) => {
                            return Err(AppError::invalid(format!(
                                "Query must contain only one of '{}' or '{}', not both",
                                first.name, second.name
                            )))
                        }
                        (false, false) => {
                            return Err(AppError::invalid(format!(
                                "Query must contain one of '{}' or '{}'",
                                first.name, second.name
                            )))
                        }
                    }
                }
                Requirement::CanHave(field, fallback) => {
                    if params.contains_key(field.name) {
                        check_field(&mut params, field)?;
                        continue;
                    }
                    let value = match fallback {
                        Fallback::Absent => continue,
                        Fallback::Value(value) => value.clone(),
                        Fallback::Resolve(resolve) => {
                            let partial = ResolvedQuery::new(params.clone());
                            let value = resolve(&partial, ctx)?;
                            tracing::debug!(field = field.name, ?value, "resolved default");
                            value
                        }
                    };
                    params.insert(field.name.to_string(), value);
                    check_field(&mut params, field)?;
                }
            }
        }

        Ok(ResolvedQuery::new(params))
    }
}

fn check_field(params: &mut IndexMap<String, QueryValue>, field: &Field) -> AppResult<()> {
    let Some(value) = params.get_mut(field.name) else {
        return Ok(());
    };

    let coerced = field.kind.coerce(value).ok_or_else(|| {
        AppError::invalid(format!(
            "Key '{}' must be a {}, got {} {:?}",
            field.name,
            field.kind,
            value.type_name(),
            value
        ))
    })?;

    if field.kind == FieldKind::Locale {
        if let QueryValue::Str(locale) = &coerced {
            if !locale_regex().is_match(locale) {
                return Err(AppError::invalid(format!(
                    "Key '{}' is not a locale like 'en_US': '{}'",
                    field.name, locale
                )));
            }
        }
    }

    *value = coerced;
    Ok(())
}

fn locale_regex() -> &'static Regex {
    static LOCALE: OnceLock<Regex> = OnceLock::new();
    LOCALE.get_or_init(|| Regex::new(LOCALE_PATTERN).expect("Invalid regex"))
}
