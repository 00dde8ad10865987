//! Pest grammar parser for Hostlens queries

use pest::Parser;
use pest_derive::Parser;

use crate::error::{HostLensError, Result};
use crate::parser::ast::*;

#[derive(Parser)]
#[grammar = "../grammar/query.pest"]
pub struct QueryParser;

/// Parse a query string into an AST
pub fn parse_query(input: &str) -> Result<Query> {
    let pair = QueryParser::parse(Rule::query, input)
        .map_err(|e| HostLensError::ParseError(e.to_string()))?
        .next()
        .ok_or_else(|| HostLensError::ParseError("Empty input".to_string()))?;

    let mut columns = None;
    let mut table = None;
    let mut limit = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::column_list => columns = Some(parse_column_list(inner)?),
            Rule::table_name => table = Some(inner.as_str().to_string()),
            Rule::limit_clause => limit = Some(parse_limit(inner)?),
            Rule::EOI => {}
            rule => {
                return Err(HostLensError::ParseError(format!(
                    "Unexpected rule in query: {:?}",
                    rule
                )))
            }
        }
    }

    Ok(Query {
        columns: columns
            .ok_or_else(|| HostLensError::ParseError("Expected column list".to_string()))?,
        table: table.ok_or_else(|| HostLensError::ParseError("Expected table name".to_string()))?,
        limit,
    })
}

fn parse_column_list(pair: pest::iterators::Pair<Rule>) -> Result<ColumnSelection> {
    let mut refs = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::star => return Ok(ColumnSelection::All),
            Rule::column_ref => refs.push(parse_column_ref(inner)?),
            rule => {
                return Err(HostLensError::ParseError(format!(
                    "Unexpected rule in column list: {:?}",
                    rule
                )))
            }
        }
    }

    Ok(ColumnSelection::List(refs))
}

fn parse_column_ref(pair: pest::iterators::Pair<Rule>) -> Result<ColumnRef> {
    let mut inner = pair.into_inner();

    let name = inner
        .next()
        .ok_or_else(|| HostLensError::ParseError("Expected column name".to_string()))?
        .as_str();

    let arguments = match inner.next() {
        Some(arg) => match arg.as_rule() {
            Rule::bare_argument => Some(arg.as_str()),
            Rule::quoted_argument => Some(
                arg.into_inner()
                    .next()
                    .map(|quoted| quoted.as_str())
                    .unwrap_or(""),
            ),
            rule => {
                return Err(HostLensError::ParseError(format!(
                    "Unexpected rule in column reference: {:?}",
                    rule
                )))
            }
        },
        None => None,
    };

    Ok(ColumnRef::new(name, arguments))
}

fn parse_limit(pair: pest::iterators::Pair<Rule>) -> Result<usize> {
    let number = pair
        .into_inner()
        .next()
        .ok_or_else(|| HostLensError::ParseError("Expected number after LIMIT".to_string()))?;

    number
        .as_str()
        .parse()
        .map_err(|e| HostLensError::ParseError(format!("Invalid LIMIT: {}", e)))
}
