use anet_core::search::QueryParams;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

// ─── Credentials ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

// ─── Session ──────────────────────────────────────────────────────────────

/// Credentials for outgoing requests, fixed when the client is built.
///
/// A session is either anonymous (the server relies on its own login) or
/// carries a user/password pair that is sent as HTTP Basic auth and, for
/// links opened outside the client, appended to URLs as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    creds: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { creds: None }
    }

    pub fn with_credentials(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Session {
            creds: Some(Credentials {
                user: user.into(),
                pass: pass.into(),
            }),
        }
    }

    /// Read `user` and `pass` from a page query string. Both must be present
    /// and non-empty, otherwise the session is anonymous.
    pub fn from_query(query: &str) -> Self {
        let params = QueryParams::parse(query);
        match (params.get_nonempty("user"), params.get_nonempty("pass")) {
            (Some(user), Some(pass)) => Session::with_credentials(user, pass),
            _ => Session::anonymous(),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.creds.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.creds.is_none()
    }

    /// `Authorization` header value, `Basic base64(user:pass)`.
    pub fn auth_header(&self) -> Option<String> {
        self.creds.as_ref().map(|c| {
            let token = STANDARD.encode(format!("{}:{}", c.user, c.pass));
            format!("Basic {token}")
        })
    }

    /// Append `user`/`pass` query parameters to `url` when credentials are
    /// present.
    pub fn add_auth_params(&self, url: &str) -> String {
        let Some(creds) = &self.creds else {
            return url.to_string();
        };
        let params: QueryParams = [("user", creds.user.as_str()), ("pass", creds.pass.as_str())]
            .into_iter()
            .collect();
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}{}", params.to_query_string())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_query_requires_both_parts() {
        assert!(Session::from_query("?user=arthur").is_anonymous());
        assert!(Session::from_query("pass=x").is_anonymous());
        assert!(Session::from_query("user=&pass=x").is_anonymous());
        let session = Session::from_query("?user=arthur&pass=secret");
        assert_eq!(
            session.credentials(),
            Some(&Credentials {
                user: "arthur".to_string(),
                pass: "secret".to_string()
            })
        );
    }

    #[test]
    fn basic_auth_header() {
        let session = Session::with_credentials("arthur", "secret");
        assert_eq!(
            session.auth_header().as_deref(),
            Some("Basic YXJ0aHVyOnNlY3JldA==")
        );
        assert!(Session::anonymous().auth_header().is_none());
    }

    #[test]
    fn auth_params_appended() {
        let session = Session::with_credentials("arthur", "p@ss word");
        assert_eq!(
            session.add_auth_params("/api/reports/export"),
            "/api/reports/export?user=arthur&pass=p%40ss%20word"
        );
        assert_eq!(
            session.add_auth_params("/api/x?a=1"),
            "/api/x?a=1&user=arthur&pass=p%40ss%20word"
        );
        assert_eq!(Session::anonymous().add_auth_params("/api/x"), "/api/x");
    }
}
