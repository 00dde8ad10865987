//! Static attribute columns

use crate::column::{ColumnType, Value};
use crate::relation::{resolve, OwnerChain, Row, RowRef};

/// A fixed property of a host, service, log entry or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    HostName,
    HostAlias,
    HostAddress,
    HostState,
    HostPluginOutput,
    HostServices,
    HostNumServices,
    ServiceDescription,
    ServiceState,
    ServicePluginOutput,
    LogTime,
    LogType,
    LogMessage,
    CommentId,
    CommentAuthor,
    CommentText,
    CommentEntryTime,
}

impl Attribute {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Attribute::HostState
            | Attribute::HostNumServices
            | Attribute::ServiceState
            | Attribute::CommentId => ColumnType::Int,
            Attribute::LogTime | Attribute::CommentEntryTime => ColumnType::Time,
            Attribute::HostServices => ColumnType::List,
            Attribute::HostName
            | Attribute::HostAlias
            | Attribute::HostAddress
            | Attribute::HostPluginOutput
            | Attribute::ServiceDescription
            | Attribute::ServicePluginOutput
            | Attribute::LogType
            | Attribute::LogMessage
            | Attribute::CommentAuthor
            | Attribute::CommentText => ColumnType::String,
        }
    }

    /// Read the attribute from `row`, or `None` if the row has the wrong kind
    fn read(&self, row: RowRef<'_>) -> Option<Value> {
        let value = match (self, row.row()) {
            (Attribute::HostName, Row::Host(h)) => Value::Text(h.name.clone()),
            (Attribute::HostAlias, Row::Host(h)) => Value::Text(h.alias.clone()),
            (Attribute::HostAddress, Row::Host(h)) => Value::Text(h.address.clone()),
            (Attribute::HostState, Row::Host(h)) => Value::Int(h.state.into()),
            (Attribute::HostPluginOutput, Row::Host(h)) => Value::Text(h.plugin_output.clone()),
            (Attribute::HostServices, Row::Host(h)) => Value::List(
                h.services
                    .iter()
                    .filter_map(|id| row.store().service(*id))
                    .map(|s| s.description.clone())
                    .collect(),
            ),
            (Attribute::HostNumServices, Row::Host(h)) => Value::Int(h.services.len() as i64),
            (Attribute::ServiceDescription, Row::Service(s)) => Value::Text(s.description.clone()),
            (Attribute::ServiceState, Row::Service(s)) => Value::Int(s.state.into()),
            (Attribute::ServicePluginOutput, Row::Service(s)) => {
                Value::Text(s.plugin_output.clone())
            }
            (Attribute::LogTime, Row::LogEntry(e)) => Value::Time(e.time),
            (Attribute::LogType, Row::LogEntry(e)) => Value::Text(e.kind.clone()),
            (Attribute::LogMessage, Row::LogEntry(e)) => Value::Text(e.message.clone()),
            (Attribute::CommentId, Row::Comment(c)) => {
                Value::Int(i64::try_from(c.id).unwrap_or(i64::MAX))
            }
            (Attribute::CommentAuthor, Row::Comment(c)) => Value::Text(c.author.clone()),
            (Attribute::CommentText, Row::Comment(c)) => Value::Text(c.text.clone()),
            (Attribute::CommentEntryTime, Row::Comment(c)) => Value::Time(c.entry_time),
            _ => return None,
        };
        Some(value)
    }
}

/// Column reading an [`Attribute`] of the object reached through an owner chain
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    name: String,
    description: String,
    attribute: Attribute,
    chain: OwnerChain,
}

impl AttributeColumn {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        attribute: Attribute,
        chain: OwnerChain,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            attribute,
            chain,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn column_type(&self) -> ColumnType {
        self.attribute.column_type()
    }

    pub fn evaluate(&self, row: RowRef<'_>) -> Value {
        resolve(row, &self.chain)
            .and_then(|owner| self.attribute.read(owner))
            .unwrap_or_else(|| self.column_type().empty_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Store;
    use crate::relation::Relation;

    fn store() -> Store {
        Store::from_json(
            r#"{
                "hosts": [{"name": "server01", "address": "10.0.0.1"}],
                "services": [{"host_name": "server01", "description": "CPU load", "state": 1}],
                "comments": [
                    {"id": 4, "entry_time": 60, "author": "ops",
                     "host_name": "server01", "service_description": "CPU load"},
                    {"id": 5, "entry_time": 60}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_host_attribute_through_service() {
        let store = store();
        let column = AttributeColumn::new(
            "host_address",
            "Address of the host",
            Attribute::HostAddress,
            OwnerChain::host(),
        );
        let row = RowRef::new(&store, Row::Service(&store.services()[0]));
        assert_eq!(column.evaluate(row), Value::Text("10.0.0.1".to_string()));
    }

    #[test]
    fn test_service_attribute_through_comment() {
        let store = store();
        let chain = OwnerChain::new(&[Relation::Service]).unwrap();
        let column =
            AttributeColumn::new("service_state", "State", Attribute::ServiceState, chain);

        let row = RowRef::new(&store, Row::Comment(&store.comments()[0]));
        assert_eq!(column.evaluate(row), Value::Int(1));

        let orphan = RowRef::new(&store, Row::Comment(&store.comments()[1]));
        assert_eq!(column.evaluate(orphan), Value::Int(0));
    }

    #[test]
    fn test_wrong_row_kind_yields_empty() {
        let store = store();
        let column = AttributeColumn::new(
            "name",
            "Host name",
            Attribute::HostName,
            OwnerChain::direct(),
        );
        let row = RowRef::new(&store, Row::Service(&store.services()[0]));
        assert_eq!(column.evaluate(row), Value::Text(String::new()));
    }

    #[test]
    fn test_comment_time() {
        let store = store();
        let column = AttributeColumn::new(
            "entry_time",
            "Entry time",
            Attribute::CommentEntryTime,
            OwnerChain::direct(),
        );
        let row = RowRef::new(&store, Row::Comment(&store.comments()[0]));
        match column.evaluate(row) {
            Value::Time(t) => assert_eq!(t.timestamp(), 60),
            other => panic!("Expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_large_comment_id_saturates() {
        let store = Store::from_json(
            r#"{"comments": [{"id": 18446744073709551615, "entry_time": 0}]}"#,
        )
        .unwrap();
        let column =
            AttributeColumn::new("id", "Comment id", Attribute::CommentId, OwnerChain::direct());
        let row = RowRef::new(&store, Row::Comment(&store.comments()[0]));
        assert_eq!(column.evaluate(row), Value::Int(i64::MAX));
    }
}
