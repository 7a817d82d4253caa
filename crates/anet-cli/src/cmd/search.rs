use crate::output::{print_json, print_table};
use crate::Remote;
use anet_core::search::{FilterKind, QueryParams, SearchFilters, UsedFilter, UuidLabels};
use anet_core::types::SearchObjectType;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum SearchSubcommand {
    /// List the filters available for an object type
    Filters {
        #[arg(long = "type")]
        object_type: SearchObjectType,
    },

    /// Build a query string from filters
    Build {
        #[arg(long = "type")]
        object_type: SearchObjectType,

        /// Free-text search term
        #[arg(long, default_value = "")]
        text: String,

        /// `name=value`; name is a filter label or its query key
        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Turn a query string back into labelled filters
    Parse {
        #[arg(long = "type")]
        object_type: SearchObjectType,

        /// Query string, with or without the leading '?'
        query: String,

        /// Look reference labels up on the server
        #[arg(long)]
        resolve: bool,
    },
}

pub fn run(
    settings: Option<&Path>,
    remote: &Remote,
    subcmd: SearchSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let settings = super::load_settings(settings)?;
    let registry = SearchFilters::new(&settings);

    match subcmd {
        SearchSubcommand::Filters { object_type } => list(&registry, object_type, json),
        SearchSubcommand::Build {
            object_type,
            text,
            filters,
        } => build(&registry, object_type, &text, &filters, json),
        SearchSubcommand::Parse {
            object_type,
            query,
            resolve,
        } => parse(&registry, remote, object_type, &query, resolve, json),
    }
}

fn kind_name(kind: &FilterKind) -> String {
    match kind {
        FilterKind::Text => "text".to_string(),
        FilterKind::Checkbox => "checkbox".to_string(),
        FilterKind::Select { values } => format!("select ({})", values.join(", ")),
        FilterKind::Reference { target } => format!("reference ({target})"),
        FilterKind::DateRange => "date range".to_string(),
    }
}

fn list(registry: &SearchFilters, object_type: SearchObjectType, json: bool) -> anyhow::Result<()> {
    let filters = registry.filters(object_type);
    if json {
        return print_json(&serde_json::json!({
            "objectType": object_type,
            "filters": filters,
            "extraFilters": registry.extra_filters(object_type),
        }));
    }

    let mut rows: Vec<Vec<String>> = filters
        .iter()
        .map(|d| vec![d.key.clone(), d.query_key.clone(), kind_name(&d.kind)])
        .collect();
    for extra in registry.extra_filters(object_type) {
        rows.push(vec![extra.clone(), extra.clone(), "extra".to_string()]);
    }
    print_table(&["Filter", "Query key", "Kind"], rows);
    Ok(())
}

fn build(
    registry: &SearchFilters,
    object_type: SearchObjectType,
    text: &str,
    raw_filters: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let mut used: Vec<UsedFilter> = Vec::new();
    for raw in raw_filters {
        let (name, value) = raw
            .split_once('=')
            .with_context(|| format!("filter '{raw}' is not of the form name=value"))?;
        used.push(registry.filter_from_text(object_type, name.trim(), value.trim())?);
    }

    let params = registry.serialize_query_params(object_type, &used, text);
    if json {
        print_json(&serde_json::json!({
            "objectType": object_type,
            "query": params.to_query_string(),
            "params": params.to_json(),
        }))?;
    } else {
        println!("{}", params.to_query_string());
    }
    Ok(())
}

fn parse(
    registry: &SearchFilters,
    remote: &Remote,
    object_type: SearchObjectType,
    query: &str,
    resolve: bool,
    json: bool,
) -> anyhow::Result<()> {
    let params = QueryParams::parse(query);
    let rt = super::runtime()?;
    let result = rt.block_on(async {
        if resolve {
            let client = remote.client();
            registry
                .deserialize_query_params(object_type, &params, &client)
                .await
        } else {
            registry
                .deserialize_query_params(object_type, &params, &UuidLabels)
                .await
        }
    });

    if json {
        return print_json(&result);
    }

    println!("type: {}", result.object_type);
    if !result.text.is_empty() {
        println!("text: {}", result.text);
    }
    if result.filters.is_empty() {
        println!("No filters.");
    } else {
        println!();
        print_table(
            &["Filter", "Value"],
            result
                .filters
                .iter()
                .map(|f| vec![f.key.clone(), f.value.display()])
                .collect(),
        );
    }
    Ok(())
}
