use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// ---------------------------------------------------------------------------
// API endpoints
// ---------------------------------------------------------------------------

pub const GRAPHQL_ENDPOINT: &str = "/graphql";
pub const LOGGING_ENDPOINT: &str = "/api/logging/log";
pub const ORGANIZATION_SEARCH_ENDPOINT: &str = "/api/organizations/search";
pub const PEOPLE_SEARCH_ENDPOINT: &str = "/api/people/search";
pub const LOCATION_SEARCH_ENDPOINT: &str = "/api/locations/search";

// ---------------------------------------------------------------------------
// Client routes
// ---------------------------------------------------------------------------

pub const ORGANIZATIONS_ROUTE: &str = "/organizations";
pub const POSITIONS_ROUTE: &str = "/positions";
pub const PEOPLE_ROUTE: &str = "/people";
pub const REPORTS_ROUTE: &str = "/reports";
pub const LOCATIONS_ROUTE: &str = "/locations";
pub const TASKS_ROUTE: &str = "/tasks";
pub const AUTHORIZATION_GROUPS_ROUTE: &str = "/admin/authorizationGroups";

/// Characters left untouched in a path segment: unreserved per RFC 3986.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

pub fn view_path(route: &str, uuid: &str) -> String {
    format!("{route}/{}", encode_segment(uuid))
}

pub fn edit_path(route: &str, uuid: &str) -> String {
    format!("{}/edit", view_path(route, uuid))
}

pub fn new_path(route: &str) -> String {
    format!("{route}/new")
}

/// Join a base URL and an absolute path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_helpers() {
        assert_eq!(view_path(ORGANIZATIONS_ROUTE, "abc-1"), "/organizations/abc-1");
        assert_eq!(
            edit_path(AUTHORIZATION_GROUPS_ROUTE, "g1"),
            "/admin/authorizationGroups/g1/edit"
        );
        assert_eq!(new_path(REPORTS_ROUTE), "/reports/new");
    }

    #[test]
    fn uuid_segments_are_encoded() {
        assert_eq!(view_path(PEOPLE_ROUTE, "a b/c"), "/people/a%20b%2Fc");
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:8080/", "/graphql"),
            "http://localhost:8080/graphql"
        );
        assert_eq!(
            join_url("http://localhost:8080", "api/logging/log"),
            "http://localhost:8080/api/logging/log"
        );
        assert_eq!(
            join_url("http://localhost:8080", "https://other/x"),
            "https://other/x"
        );
    }
}
