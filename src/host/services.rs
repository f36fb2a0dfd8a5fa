//! Service registry: named, schema-validated handlers grouped by domain.

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::ArveeError;
use crate::lookup::types::{validate_latitude, validate_longitude};

pub type ServiceResult = Result<(), ArveeError>;
pub type ServiceHandler = Arc<dyn Fn(ServiceCall) -> BoxFuture<'static, ServiceResult> + Send + Sync>;

// ─── Schema ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Non-empty string.
    String,
    /// Number in -90..90.
    Latitude,
    /// Number in -180..180.
    Longitude,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true }
    }
}

/// Input schema for a service. Extra keys are rejected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceSchema {
    pub fields: Vec<Field>,
}

impl ServiceSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Validate and coerce call data. Numeric strings are accepted for coordinates.
    pub fn validate(&self, data: &Map<String, Value>) -> Result<Map<String, Value>, String> {
        if let Some(extra) = data.keys().find(|k| !self.fields.iter().any(|f| f.name == k.as_str())) {
            return Err(format!("extra keys not allowed @ data['{}']", extra));
        }

        let mut out = Map::new();
        for field in &self.fields {
            let value = match data.get(field.name) {
                Some(Value::Null) | None if field.required => {
                    return Err(format!("required key not provided @ data['{}']", field.name));
                }
                Some(Value::Null) | None => continue,
                Some(v) => v,
            };
            let coerced = coerce(field, value)
                .map_err(|e| format!("{} for dictionary value @ data['{}']", e, field.name))?;
            out.insert(field.name.to_string(), coerced);
        }
        Ok(out)
    }
}

fn coerce(field: &Field, value: &Value) -> Result<Value, String> {
    match field.kind {
        FieldKind::String => match value {
            Value::String(s) if !s.trim().is_empty() => Ok(Value::String(s.clone())),
            Value::String(_) => Err("string value is empty".into()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err("expected str".into()),
        },
        FieldKind::Latitude => number(value).and_then(validate_latitude).map(Value::from),
        FieldKind::Longitude => number(value).and_then(validate_longitude).map(Value::from),
    }
}

fn number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| "expected float".to_string()),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| "expected float".to_string()),
        _ => Err("expected float".into()),
    }
}

// ─── Calls ───────────────────────────────────────────────────────

/// A validated invocation handed to a service handler.
#[derive(Debug, Clone)]
pub struct ServiceCall {
    pub data: Map<String, Value>,
}

impl ServiceCall {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(Value::as_f64)
    }
}

// ─── Registry ────────────────────────────────────────────────────

struct Registered {
    schema: ServiceSchema,
    handler: ServiceHandler,
}

/// Description of a registered service, for listing.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub domain: String,
    pub service: String,
    pub fields: Vec<Field>,
}

#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<BTreeMap<(String, String), Arc<Registered>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a service handler.
    pub fn register<F>(&self, domain: &str, service: &str, schema: ServiceSchema, handler: F)
    where
        F: Fn(ServiceCall) -> BoxFuture<'static, ServiceResult> + Send + Sync + 'static,
    {
        let entry = Arc::new(Registered {
            schema,
            handler: Arc::new(handler),
        });
        self.services
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((domain.to_string(), service.to_string()), entry);
        log::debug!("Registered service {}.{}", domain, service);
    }

    pub fn services(&self) -> Vec<ServiceInfo> {
        self.services
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|((domain, service), entry)| ServiceInfo {
                domain: domain.clone(),
                service: service.clone(),
                fields: entry.schema.fields.clone(),
            })
            .collect()
    }

    /// Validate `data` against the service schema, then run the handler.
    pub async fn call(&self, domain: &str, service: &str, data: Map<String, Value>) -> ServiceResult {
        let entry = self
            .services
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(domain.to_string(), service.to_string()))
            .cloned()
            .ok_or_else(|| ArveeError::ServiceNotFound {
                domain: domain.to_string(),
                service: service.to_string(),
            })?;

        let data = entry.schema.validate(&data).map_err(|message| {
            log::error!("Invalid data for {}.{}: {}", domain, service, message);
            ArveeError::Validation {
                service: format!("{}.{}", domain, service),
                message,
            }
        })?;

        (entry.handler)(ServiceCall { data }).await
    }
}
