//! Label lookups for reference search filters.

use anet_core::models::{
    AuthorizationGroup, Location, Model, Organization, Person, Position, Report, Task,
};
use anet_core::search::{ReferenceResolver, ResolveError};
use anet_core::types::SearchObjectType;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::{ApiError, Result};

/// GraphQL field and selection used to fetch a record's label.
fn lookup(target: SearchObjectType) -> (&'static str, &'static str) {
    match target {
        SearchObjectType::Reports => ("report", "uuid intent"),
        SearchObjectType::People => ("person", "uuid name rank role"),
        SearchObjectType::Organizations => ("organization", "uuid shortName longName identificationCode"),
        SearchObjectType::Positions => ("position", "uuid name code type"),
        SearchObjectType::Locations => ("location", "uuid name"),
        SearchObjectType::Tasks => ("task", "uuid shortName longName"),
        SearchObjectType::AuthorizationGroups => ("authorizationGroup", "uuid name"),
    }
}

fn display<M: Model + DeserializeOwned>(record: Value) -> Result<String> {
    let model: M = serde_json::from_value(record).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(model.display_name())
}

impl ApiClient {
    /// Fetch the display name of one record.
    pub async fn load_label(&self, target: SearchObjectType, uuid: &str) -> Result<String> {
        let (field, selection) = lookup(target);
        let query = format!("{field}(uuid: $uuid) {{ {selection} }}");
        let mut data: Value = self
            .query(&query, json!({ "uuid": uuid }), "($uuid: String)")
            .await?;
        let record = data
            .get_mut(field)
            .map(Value::take)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::Decode(format!("no {field} with uuid {uuid}")))?;
        match target {
            SearchObjectType::Reports => display::<Report>(record),
            SearchObjectType::People => display::<Person>(record),
            SearchObjectType::Organizations => display::<Organization>(record),
            SearchObjectType::Positions => display::<Position>(record),
            SearchObjectType::Locations => display::<Location>(record),
            SearchObjectType::Tasks => display::<Task>(record),
            SearchObjectType::AuthorizationGroups => display::<AuthorizationGroup>(record),
        }
    }
}

impl ReferenceResolver for ApiClient {
    async fn resolve_label(
        &self,
        target: SearchObjectType,
        uuid: &str,
    ) -> std::result::Result<String, ResolveError> {
        self.load_label(target, uuid).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use anet_core::search::{FilterValue, QueryParams, SearchFilters, UsedFilter};
    use anet_core::settings::Settings;
    use mockito::Matcher;

    #[tokio::test]
    async fn person_label_includes_rank() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"uuid": "p1"}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"person":{"uuid":"p1","name":"JACKSON, Jack","rank":"OF-3"}}}"#)
            .create_async()
            .await;

        let api = ApiClient::new(server.url(), Session::anonymous());
        let label = api.load_label(SearchObjectType::People, "p1").await.unwrap();
        assert_eq!(label, "OF-3 JACKSON, Jack");
    }

    #[tokio::test]
    async fn missing_record_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"task":null}}"#)
            .create_async()
            .await;

        let api = ApiClient::new(server.url(), Session::anonymous());
        assert!(api.load_label(SearchObjectType::Tasks, "t1").await.is_err());
    }

    #[tokio::test]
    async fn search_deserialization_through_client() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"uuid": "o1"}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"organization":{"uuid":"o1","shortName":"EF 1.1"}}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"uuid": "l9"}})))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Not found"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(server.url(), Session::anonymous());
        let filters = SearchFilters::new(&Settings::default());
        let params = QueryParams::parse("text=fuel&orgUuid=o1&locationUuid=l9");
        let result = filters
            .deserialize_query_params(SearchObjectType::People, &params, &api)
            .await;
        assert_eq!(result.text, "fuel");
        assert_eq!(
            result.filters,
            vec![
                UsedFilter::new(
                    "Organization",
                    FilterValue::Reference {
                        uuid: "o1".to_string(),
                        label: "EF 1.1".to_string()
                    }
                ),
                UsedFilter::new(
                    "Location",
                    FilterValue::Reference {
                        uuid: "l9".to_string(),
                        label: "l9".to_string()
                    }
                ),
            ]
        );
    }
}
