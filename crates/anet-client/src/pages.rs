//! Route-level workflows: load a record into a form, submit it, and say where
//! to navigate afterwards.

use anet_core::form::Form;
use anet_core::models::{AuthorizationGroup, Model, Organization, Page, Subscription};
use anet_core::paths;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::graphql::GqlPart;
use crate::{ApiError, Result};

pub const SUBSCRIPTIONS_PAGE_SIZE: i64 = 10;

// ─── Navigation ───────────────────────────────────────────────────────────

/// History changes after a successful save: the current entry is replaced
/// with the edit route, then the view route is pushed carrying the success
/// banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub replace: String,
    pub push: String,
    pub success: String,
}

// ─── Shared save flow ─────────────────────────────────────────────────────

struct SaveTarget {
    /// GraphQL argument and variable name, e.g. `organization`.
    variable: &'static str,
    input_type: &'static str,
    create_op: &'static str,
    update_op: &'static str,
    success: &'static str,
}

async fn load_into_form<M>(client: &ApiClient, field: &str, selection: &str, uuid: &str) -> Result<Form<M>>
where
    M: Model + Clone + DeserializeOwned,
{
    let query = format!("{field}(uuid: $uuid) {{ {selection} }}");
    let mut data: Value = client
        .query(&query, json!({ "uuid": uuid }), "($uuid: String)")
        .await?;
    let record = data
        .get_mut(field)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::Decode(format!("no {field} with uuid {uuid}")))?;
    let model: M = serde_json::from_value(record).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(Form::new(model))
}

async fn save<M, I>(
    client: &ApiClient,
    form: &mut Form<M>,
    edit: bool,
    input: I,
    target: &SaveTarget,
) -> Result<Navigation>
where
    M: Model + Clone,
    I: Serialize,
{
    if !form.begin_submit() {
        return Err(ApiError::InvalidForm(form.errors()));
    }

    let op = if edit { target.update_op } else { target.create_op };
    let mut mutation = format!("{op}({var}: ${var})", var = target.variable);
    if !edit {
        mutation.push_str(" { uuid }");
    }
    let variable_def = format!("(${}: {}!)", target.variable, target.input_type);

    let outcome = async {
        let input = serde_json::to_value(&input).map_err(|e| ApiError::Decode(e.to_string()))?;
        let data: Value = client
            .mutation(&mutation, json!({ target.variable: input }), &variable_def)
            .await?;
        data.get(op)
            .and_then(|v| v.get("uuid"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| form.model().uuid().map(str::to_string))
            .ok_or_else(|| ApiError::Decode(format!("{op} returned no uuid")))
    }
    .await;

    match outcome {
        Ok(uuid) => {
            form.finish_submit();
            tracing::info!(resource = M::RESOURCE_NAME, %uuid, "saved");
            Ok(Navigation {
                replace: paths::edit_path(M::ROUTE, &uuid),
                push: paths::view_path(M::ROUTE, &uuid),
                success: target.success.to_string(),
            })
        }
        Err(e) => {
            form.fail_submit(e.display_message());
            Err(e)
        }
    }
}

// ─── OrganizationEditor ───────────────────────────────────────────────────

const ORGANIZATION_SELECTION: &str = "uuid shortName longName identificationCode type status \
    parentOrg { uuid shortName longName identificationCode } \
    approvalSteps { uuid name approvers { uuid name code type person { uuid name rank } } } \
    tasks { uuid shortName longName }";

const ORGANIZATION_SAVE: SaveTarget = SaveTarget {
    variable: "organization",
    input_type: "OrganizationInput",
    create_op: "createOrganization",
    update_op: "updateOrganization",
    success: "Organization saved",
};

pub struct OrganizationEditor;

impl OrganizationEditor {
    pub fn new_organization() -> Form<Organization> {
        Form::new(Organization::default()).with_submit_text("Create Organization")
    }

    pub async fn load(client: &ApiClient, uuid: &str) -> Result<Form<Organization>> {
        let form: Form<Organization> =
            load_into_form(client, "organization", ORGANIZATION_SELECTION, uuid).await?;
        Ok(form.with_submit_text("Save Organization"))
    }

    /// Create (`edit == false`) or update the organization in `form`.
    pub async fn submit(
        client: &ApiClient,
        form: &mut Form<Organization>,
        edit: bool,
    ) -> Result<Navigation> {
        let input = form.model().to_input();
        save(client, form, edit, input, &ORGANIZATION_SAVE).await
    }
}

// ─── AuthorizationGroupEditor ─────────────────────────────────────────────

const AUTHORIZATION_GROUP_SELECTION: &str = "uuid name description status \
    positions { uuid name code type status organization { uuid shortName } person { uuid name rank } }";

const AUTHORIZATION_GROUP_SAVE: SaveTarget = SaveTarget {
    variable: "authorizationGroup",
    input_type: "AuthorizationGroupInput",
    create_op: "createAuthorizationGroup",
    update_op: "updateAuthorizationGroup",
    success: "Authorization Group saved",
};

pub struct AuthorizationGroupEditor;

impl AuthorizationGroupEditor {
    pub fn new_group() -> Form<AuthorizationGroup> {
        Form::new(AuthorizationGroup::default()).with_submit_text("Save Authorization Group")
    }

    pub async fn load(client: &ApiClient, uuid: &str) -> Result<Form<AuthorizationGroup>> {
        let form: Form<AuthorizationGroup> =
            load_into_form(client, "authorizationGroup", AUTHORIZATION_GROUP_SELECTION, uuid).await?;
        Ok(form.with_submit_text("Save Authorization Group"))
    }

    pub async fn submit(
        client: &ApiClient,
        form: &mut Form<AuthorizationGroup>,
        edit: bool,
    ) -> Result<Navigation> {
        let input = form.model().to_input();
        save(client, form, edit, input, &AUTHORIZATION_GROUP_SAVE).await
    }
}

// ─── SubscriptionsPage ────────────────────────────────────────────────────

const MY_SUBSCRIPTIONS: &str = "mySubscriptions(query: $subscriptionsQuery) {
    pageNum pageSize totalCount list {
        uuid createdAt updatedAt subscribedObjectType subscribedObjectUuid
        subscribedObject {
            ... on Location { name }
            ... on Organization { shortName }
            ... on Person { role rank name }
            ... on Position { type name }
            ... on Report { intent }
            ... on Task { shortName longName }
        }
    }
}";

/// One line of the subscriptions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionRow {
    pub updated_at: Option<DateTime<Utc>>,
    pub kind: String,
    pub label: String,
    pub link: Option<String>,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(sub: &Subscription) -> Self {
        let object = sub.subscribed_object();
        SubscriptionRow {
            updated_at: sub.updated_at,
            kind: object
                .as_ref()
                .map(|o| o.kind().to_string())
                .unwrap_or_else(|| sub.subscribed_object_type.clone()),
            label: sub.label(),
            link: object.and_then(|o| o.link_path()),
        }
    }
}

pub struct SubscriptionsPage;

impl SubscriptionsPage {
    /// Fetch page `page_num` (0-based) of the current user's subscriptions.
    pub async fn fetch(client: &ApiClient, page_num: i64) -> Result<Page<Subscription>> {
        let part = GqlPart::new(MY_SUBSCRIPTIONS).add_variable(
            "subscriptionsQuery",
            "SubscriptionSearchQueryInput",
            json!({ "pageNum": page_num, "pageSize": SUBSCRIPTIONS_PAGE_SIZE }),
        );
        let mut data: Value = client.run(&[part]).await?;
        let page = data
            .get_mut("mySubscriptions")
            .map(Value::take)
            .ok_or_else(|| ApiError::Decode("response has no mySubscriptions".to_string()))?;
        serde_json::from_value(page).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn rows(page: &Page<Subscription>) -> Vec<SubscriptionRow> {
        page.list.iter().map(SubscriptionRow::from).collect()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
