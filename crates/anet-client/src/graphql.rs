use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::Result;

/// One top-level field of a composed GraphQL query, with the variables it
/// declares.
#[derive(Debug, Clone, PartialEq)]
pub struct GqlPart {
    body: String,
    variables: Vec<(String, String, Value)>,
}

impl GqlPart {
    pub fn new(body: impl Into<String>) -> Self {
        GqlPart {
            body: body.into(),
            variables: Vec::new(),
        }
    }

    /// Declare `$name: type` bound to `value`.
    pub fn add_variable(mut self, name: impl Into<String>, ty: impl Into<String>, value: Value) -> Self {
        self.variables.push((name.into(), ty.into(), value));
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Merge parts into `(body, variables, variable_def)`. Bodies are joined in
/// order; a variable declared twice keeps its first value.
pub fn compose(parts: &[GqlPart]) -> (String, Value, String) {
    let body = parts
        .iter()
        .map(|p| p.body.trim())
        .collect::<Vec<_>>()
        .join(",\n");

    let mut variables = Map::new();
    let mut defs = Vec::new();
    for (name, ty, value) in parts.iter().flat_map(|p| &p.variables) {
        if variables.contains_key(name) {
            continue;
        }
        variables.insert(name.clone(), value.clone());
        defs.push(format!("${name}: {ty}"));
    }
    let variable_def = if defs.is_empty() {
        String::new()
    } else {
        format!("({})", defs.join(", "))
    };
    (body, Value::Object(variables), variable_def)
}

impl ApiClient {
    /// Run several parts as one query.
    pub async fn run<T: DeserializeOwned>(&self, parts: &[GqlPart]) -> Result<T> {
        let (body, variables, variable_def) = compose(parts);
        self.query(&body, variables, &variable_def).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn compose_merges_bodies_and_variables() {
        let parts = [
            GqlPart::new("mySubscriptions(query: $subscriptionsQuery) { totalCount }")
                .add_variable(
                    "subscriptionsQuery",
                    "SubscriptionSearchQueryInput",
                    json!({"pageNum": 0, "pageSize": 10}),
                ),
            GqlPart::new("me { uuid }"),
        ];
        let (body, variables, def) = compose(&parts);
        assert_eq!(
            body,
            "mySubscriptions(query: $subscriptionsQuery) { totalCount },\nme { uuid }"
        );
        assert_eq!(def, "($subscriptionsQuery: SubscriptionSearchQueryInput)");
        assert_eq!(variables["subscriptionsQuery"]["pageSize"], 10);
    }

    #[test]
    fn compose_without_variables() {
        let (_, variables, def) = compose(&[GqlPart::new("me { uuid }")]);
        assert_eq!(def, "");
        assert_eq!(variables, json!({}));
    }

    #[tokio::test]
    async fn run_posts_single_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "query": "query ($n: Int) { a(n: $n) { x },\nb { y } }",
                "variables": {"n": 3},
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"a":{"x":1},"b":{"y":2}}}"#)
            .create_async()
            .await;

        let api = ApiClient::new(server.url(), Session::anonymous());
        let parts = [
            GqlPart::new("a(n: $n) { x }").add_variable("n", "Int", json!(3)),
            GqlPart::new("b { y }"),
        ];
        let data: Value = api.run(&parts).await.unwrap();
        mock.assert_async().await;
        assert_eq!(data["b"]["y"], 2);
    }
}
