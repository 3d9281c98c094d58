use std::{fmt, sync::Arc};

use crate::{
    auth::Credentials,
    config::{ProjectId, Scope, SessionConfig},
    error::Result,
    transport::{AuthorizedTransport, Transport},
};

/// Context shared by every operation: endpoint, project, scope, and the
/// transport requests go through.
pub struct Session {
    config: SessionConfig,
    inner: Arc<dyn Transport>,
    transport: Arc<dyn Transport>,
    credentials: Option<Credentials>,
}

impl Session {
    /// Session that sends requests through `transport` unchanged.
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            inner: transport.clone(),
            transport,
            credentials: None,
        }
    }

    /// Session whose requests carry a bearer token.
    pub fn authorized(
        config: SessionConfig,
        inner: Arc<dyn Transport>,
        credentials: Credentials,
    ) -> Result<Self> {
        let transport = AuthorizedTransport::new(inner.clone(), &credentials)?;
        Ok(Self {
            config,
            inner,
            transport: Arc::new(transport),
            credentials: Some(credentials),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.config.project_id
    }

    pub fn scope(&self) -> Scope {
        self.config.scope
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Virtual host addressing `bucket`.
    pub fn bucket_host(&self, bucket: &str) -> String {
        format!("{bucket}.{}", self.config.endpoint)
    }

    /// Swaps in new credentials and scope; the underlying transport is kept.
    pub(crate) fn reauthorize(&mut self, scope: Scope, credentials: Credentials) -> Result<()> {
        let transport = AuthorizedTransport::new(self.inner.clone(), &credentials)?;
        self.transport = Arc::new(transport);
        self.credentials = Some(credentials);
        self.config.scope = scope;
        Ok(())
    }

    /// Key/value pairs describing the session, token redacted.
    pub fn app_data(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_id", self.config.project_id.to_string()),
            ("scope", self.config.scope.url().to_string()),
            ("endpoint", self.config.endpoint.clone()),
            (
                "access_token",
                self.credentials
                    .as_ref()
                    .map(Credentials::redacted)
                    .unwrap_or_else(|| "<none>".to_string()),
            ),
        ]
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, Method};
    use url::Url;

    use super::*;
    use crate::{transport::TransportError, types::Response};

    struct Unreachable;

    impl Transport for Unreachable {
        fn send(
            &self,
            _method: &Method,
            _url: &Url,
            _headers: &HeaderMap,
            _body: Option<&Bytes>,
        ) -> std::result::Result<Response, TransportError> {
            Err(TransportError::HostNotFound)
        }
    }

    fn config() -> SessionConfig {
        SessionConfig::new(ProjectId::new("proj-1").unwrap())
    }

    #[test]
    fn bucket_host_prefixes_endpoint() {
        let session = Session::new(config(), Arc::new(Unreachable));
        assert_eq!(
            session.bucket_host("photos"),
            "photos.storage.googleapis.com"
        );
    }

    #[test]
    fn reauthorize_updates_scope_and_token() {
        let creds = Credentials::new("ya29.first-token").unwrap();
        let mut session = Session::authorized(config(), Arc::new(Unreachable), creds).unwrap();
        assert_eq!(session.scope(), Scope::ReadOnly);

        let next = Credentials::new("ya29.second-token").unwrap();
        session.reauthorize(Scope::FullControl, next.clone()).unwrap();
        assert_eq!(session.scope(), Scope::FullControl);
        assert_eq!(session.credentials(), Some(&next));
    }

    #[test]
    fn app_data_redacts_token() {
        let creds = Credentials::new("ya29.a0AfH6SMBsecretvalue").unwrap();
        let session = Session::authorized(config(), Arc::new(Unreachable), creds).unwrap();
        let data = session.app_data();

        assert_eq!(data[0], ("project_id", "proj-1".to_string()));
        assert!(data.iter().all(|(_, v)| !v.contains("secret")));
        assert!(!format!("{session:?}").contains("secret"));
    }
}
