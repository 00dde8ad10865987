//! In-memory monitoring state
//!
//! The [`Store`] holds the objects produced by the monitoring core: hosts,
//! services, log entries and comments. Relations between them are stored as
//! arena indices ([`HostId`], [`ServiceId`]) assigned when a snapshot is
//! loaded, so following a relation can never land on the wrong kind of
//! object.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HostLensError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(usize);

#[derive(Debug, Clone)]
pub struct Host {
    pub name: String,
    pub alias: String,
    pub address: String,
    pub state: i32,
    pub plugin_output: String,
    /// Services attached to this host, in snapshot order
    pub services: Vec<ServiceId>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub host: HostId,
    pub description: String,
    pub state: i32,
    pub plugin_output: String,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub kind: String,
    pub message: String,
    pub host: Option<HostId>,
    pub service: Option<ServiceId>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub entry_time: DateTime<Utc>,
    pub host: Option<HostId>,
    pub service: Option<ServiceId>,
}

/// Serialized form of the monitoring state, referencing objects by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub hosts: Vec<HostRecord>,
    pub services: Vec<ServiceRecord>,
    pub log: Vec<LogRecord>,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub plugin_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub host_name: String,
    pub description: String,
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub plugin_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub service_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub entry_time: DateTime<Utc>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub service_description: Option<String>,
}

/// Read-only monitoring state
#[derive(Debug, Clone, Default)]
pub struct Store {
    hosts: Vec<Host>,
    services: Vec<Service>,
    log: Vec<LogEntry>,
    comments: Vec<Comment>,
    host_index: HashMap<String, HostId>,
}

impl Store {
    /// Load a JSON snapshot from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HostLensError::State(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        Self::from_snapshot(snapshot)
    }

    /// Build the store, resolving names to ids
    ///
    /// Services must name a known host. Log entries and comments that name
    /// an unknown host or service keep an empty link instead.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Store::default();

        for record in snapshot.hosts {
            if store.host_index.contains_key(&record.name) {
                return Err(HostLensError::State(format!(
                    "duplicate host '{}'",
                    record.name
                )));
            }
            let id = HostId(store.hosts.len());
            store.host_index.insert(record.name.clone(), id);
            store.hosts.push(Host {
                name: record.name,
                alias: record.alias,
                address: record.address,
                state: record.state,
                plugin_output: record.plugin_output,
                services: Vec::new(),
            });
        }

        for record in snapshot.services {
            let host = store.find_host(&record.host_name).ok_or_else(|| {
                HostLensError::State(format!(
                    "service '{}' references unknown host '{}'",
                    record.description, record.host_name
                ))
            })?;
            let id = ServiceId(store.services.len());
            store.hosts[host.0].services.push(id);
            store.services.push(Service {
                host,
                description: record.description,
                state: record.state,
                plugin_output: record.plugin_output,
            });
        }

        for record in snapshot.log {
            let (host, service) = store.link(
                record.host_name.as_deref(),
                record.service_description.as_deref(),
            );
            store.log.push(LogEntry {
                time: record.time,
                kind: record.kind,
                message: record.message,
                host,
                service,
            });
        }

        for record in snapshot.comments {
            let (host, service) = store.link(
                record.host_name.as_deref(),
                record.service_description.as_deref(),
            );
            store.comments.push(Comment {
                id: record.id,
                author: record.author,
                text: record.text,
                entry_time: record.entry_time,
                host,
                service,
            });
        }

        tracing::debug!(
            hosts = store.hosts.len(),
            services = store.services.len(),
            log = store.log.len(),
            comments = store.comments.len(),
            "monitoring state loaded"
        );

        Ok(store)
    }

    fn link(
        &self,
        host_name: Option<&str>,
        service_description: Option<&str>,
    ) -> (Option<HostId>, Option<ServiceId>) {
        let host = host_name.and_then(|name| self.find_host(name));
        let service = match (host, service_description) {
            (Some(host), Some(description)) => self.find_service(host, description),
            _ => None,
        };
        (host, service)
    }

    pub fn find_host(&self, name: &str) -> Option<HostId> {
        self.host_index.get(name).copied()
    }

    pub fn find_service(&self, host: HostId, description: &str) -> Option<ServiceId> {
        self.hosts
            .get(host.0)?
            .services
            .iter()
            .copied()
            .find(|id| self.services[id.0].description == description)
    }

    pub fn host(&self, id: HostId) -> Option<&Host> {
        self.hosts.get(id.0)
    }

    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(id.0)
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}
