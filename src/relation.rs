//! Owner resolution
//!
//! Rows of different tables sit at different distances from the host they
//! belong to: a host row is its own owner, a service row is one hop away, a
//! comment on a service is two hops away (comment, service, host). An
//! [`OwnerChain`] describes those hops as typed [`Relation`]s, and
//! [`resolve`] walks them. A relation that does not apply to a row kind, or a
//! missing link, ends the walk with "no owner".

use std::fmt;

use crate::error::{HostLensError, Result};
use crate::monitor::{Comment, Host, LogEntry, Service, Store};

/// Longest supported owner chain
pub const MAX_HOPS: usize = 3;

/// One item of a table
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    Host(&'a Host),
    Service(&'a Service),
    LogEntry(&'a LogEntry),
    Comment(&'a Comment),
}

/// A row together with the store it lives in
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    store: &'a Store,
    row: Row<'a>,
}

impl fmt::Debug for RowRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RowRef").field(&self.row).finish()
    }
}

impl<'a> RowRef<'a> {
    pub fn new(store: &'a Store, row: Row<'a>) -> Self {
        Self { store, row }
    }

    pub fn row(&self) -> Row<'a> {
        self.row
    }

    pub fn store(&self) -> &'a Store {
        self.store
    }

    pub fn as_host(&self) -> Option<&'a Host> {
        match self.row {
            Row::Host(host) => Some(host),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&'a Service> {
        match self.row {
            Row::Service(service) => Some(service),
            _ => None,
        }
    }

    /// Follow a single relation from this row
    pub fn follow(&self, relation: Relation) -> Option<RowRef<'a>> {
        let target = match (relation, self.row) {
            (Relation::Host, Row::Service(service)) => {
                Row::Host(self.store.host(service.host)?)
            }
            (Relation::Host, Row::LogEntry(entry)) => Row::Host(self.store.host(entry.host?)?),
            (Relation::Host, Row::Comment(comment)) => {
                Row::Host(self.store.host(comment.host?)?)
            }
            (Relation::Service, Row::LogEntry(entry)) => {
                Row::Service(self.store.service(entry.service?)?)
            }
            (Relation::Service, Row::Comment(comment)) => {
                Row::Service(self.store.service(comment.service?)?)
            }
            (Relation::Host, Row::Host(_)) | (Relation::Service, _) => return None,
        };
        Some(RowRef::new(self.store, target))
    }
}

/// A typed hop from a row to a related object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The host the row belongs to
    Host,
    /// The service the row belongs to
    Service,
}

/// Sequence of relations leading from a row to its owner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerChain {
    hops: Vec<Relation>,
}

impl OwnerChain {
    pub fn new(hops: &[Relation]) -> Result<Self> {
        if hops.len() > MAX_HOPS {
            return Err(HostLensError::InvalidChain(format!(
                "{} hops given, at most {} supported",
                hops.len(),
                MAX_HOPS
            )));
        }
        Ok(Self {
            hops: hops.to_vec(),
        })
    }

    /// The row is its own owner
    pub fn direct() -> Self {
        Self::default()
    }

    /// One hop to the owning host
    pub fn host() -> Self {
        Self {
            hops: vec![Relation::Host],
        }
    }

    pub fn hops(&self) -> &[Relation] {
        &self.hops
    }
}

/// Walk `chain` starting at `row`
pub fn resolve<'a>(row: RowRef<'a>, chain: &OwnerChain) -> Option<RowRef<'a>> {
    chain
        .hops
        .iter()
        .try_fold(row, |current, relation| current.follow(*relation))
}

/// Walk `chain` and require the result to be a host
pub fn resolve_host<'a>(row: RowRef<'a>, chain: &OwnerChain) -> Option<&'a Host> {
    resolve(row, chain)?.as_host()
}

/// Walk `chain` and require the result to be a service
pub fn resolve_service<'a>(row: RowRef<'a>, chain: &OwnerChain) -> Option<&'a Service> {
    resolve(row, chain)?.as_service()
}
