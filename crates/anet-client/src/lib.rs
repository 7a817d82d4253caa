//! `anet-client`: async client for the ANET server.
//!
//! Wraps the server's single GraphQL endpoint and its few REST endpoints,
//! normalizes every failure into [`ApiError`], and drives the page workflows
//! that load a record into a form and save it back.
//!
//! # Architecture
//!
//! ```text
//! Session            ← credentials fixed at startup (Basic auth + URL params)
//!     │
//!     ▼
//! ApiClient          ← fetch / send / send_json / send_file
//!     │                query / mutation / query_export / run(GqlPart…)
//!     │                log_on_server / entity search
//!     ▼
//! pages              ← OrganizationEditor, AuthorizationGroupEditor,
//!                      SubscriptionsPage → Navigation
//! ```
//!
//! `ApiClient` also implements [`anet_core::search::ReferenceResolver`], so
//! advanced-search query strings can be turned back into labelled filters.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use anet_client::{ApiClient, Session};
//! use anet_client::pages::OrganizationEditor;
//!
//! let client = ApiClient::new("http://localhost:8080", Session::from_query("?user=arthur&pass=arthur"));
//! let mut form = OrganizationEditor::load(&client, "ccbee4bb-08b8-42df-8cb5-65e8172f657b").await?;
//! form.set("longName", "Ministry of Defense")?;
//! let nav = OrganizationEditor::submit(&client, &mut form, true).await?;
//! println!("{} ({})", nav.push, nav.success);
//! ```

pub mod client;
pub mod error;
pub mod graphql;
pub mod pages;
pub mod resolver;
pub mod session;

pub use client::{ApiClient, Body, FetchParams, FormPart, Reply};
pub use error::{ApiError, ErrorBody, GraphQlError};
pub use graphql::GqlPart;
pub use pages::Navigation;
pub use session::Session;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ApiError>;
