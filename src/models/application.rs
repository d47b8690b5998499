use serde::Deserialize;

use super::null_as_empty;

/// Application (OAuth client) as exported by the source platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub application_type: Option<String>,
    /// Comma-delimited flow identifiers, e.g. `"AuthorizationCode,Implicit"`.
    pub authentication_flows: Option<String>,
    pub admin_roles: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub redirect_uris: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub post_logout_redirect_uris: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tenant_ids: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group_ids: Vec<Option<String>>,
    pub client_id: Option<String>,
    pub login_uri: Option<String>,
    pub identity: Option<String>,
    pub process_status: Option<String>,
    #[serde(rename = "IDPStatus")]
    pub idp_status: Option<String>,
}

impl Application {
    /// Classification of this application.
    ///
    /// A missing or null type counts as `Web`; an unrecognised type has no
    /// classification and renders as an empty cell.
    pub fn classification(&self) -> Option<ApplicationType> {
        match self.application_type.as_deref() {
            None => Some(ApplicationType::Web),
            Some(raw) => ApplicationType::parse(raw),
        }
    }

    /// Client id, falling back to the application id.
    pub fn effective_client_id(&self) -> &str {
        self.client_id
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationType {
    Web,
    Native,
    /// Browser applications always get the refresh-token flow.
    Browser,
    Service,
}

impl ApplicationType {
    /// Exact, case-sensitive match on the source platform's type names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Web" => Some(Self::Web),
            "Native" => Some(Self::Native),
            "Browser" => Some(Self::Browser),
            "Service" => Some(Self::Service),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Native => "Native",
            Self::Browser => "Browser",
            Self::Service => "Service",
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
