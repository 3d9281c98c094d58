//! Command facade.
//!
//! [`Commands`] owns the [`Session`] and composes one implementation each of
//! [`BucketOperations`], [`ObjectOperations`] and [`AuthProvider`].

use std::sync::Arc;

use crate::{
    api::{BucketOperations, BucketsService, ObjectOperations, ObjectsService},
    auth::AuthProvider,
    config::{Scope, SessionConfig},
    error::Result,
    session::Session,
    transport::Transport,
    types::{
        AclEntry, CopyObjectInput, CorsRule, CreateBucketInput, DeleteOutcome,
        DownloadObjectInput, ObjectPath, Response, UploadObjectInput,
    },
};

pub struct Commands<B = BucketsService, O = ObjectsService> {
    session: Session,
    buckets: B,
    objects: O,
    auth: Arc<dyn AuthProvider>,
}

impl Commands {
    /// Authorizes `config.scope` and builds a facade over the default services.
    pub fn connect(
        config: SessionConfig,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        Self::with_operations(
            config,
            transport,
            auth,
            BucketsService::new(),
            ObjectsService::new(),
        )
    }
}

impl<B: BucketOperations, O: ObjectOperations> Commands<B, O> {
    pub fn with_operations(
        config: SessionConfig,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        buckets: B,
        objects: O,
    ) -> Result<Self> {
        let credentials = auth.authorize(config.scope, false)?;
        let session = Session::authorized(config, transport, credentials)?;
        Ok(Self {
            session,
            buckets,
            objects,
            auth,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Forces a new authorization for `scope` and switches the session to it.
    /// On failure the session keeps its previous scope and token.
    pub fn change_scope(&mut self, scope: Scope) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::info!(scope = scope.key(), "changing scope");

        let credentials = self.auth.authorize(scope, true)?;
        self.session.reauthorize(scope, credentials)
    }

    pub fn app_data(&self) -> Vec<(&'static str, String)> {
        self.session.app_data()
    }

    pub fn list_buckets(&self) -> Result<Response> {
        self.buckets.list_buckets(&self.session)
    }

    pub fn list_objects(&self, bucket: &str) -> Result<Response> {
        self.buckets.list_objects(&self.session, bucket)
    }

    pub fn create_bucket(&self, input: &CreateBucketInput) -> Result<Response> {
        self.buckets.create_bucket(&self.session, input)
    }

    pub fn delete_bucket(&self, bucket: &str, confirmation: &str) -> Result<DeleteOutcome> {
        self.buckets
            .delete_bucket(&self.session, bucket, confirmation)
    }

    pub fn get_bucket_cors(&self, bucket: &str) -> Result<Response> {
        self.buckets.get_bucket_cors(&self.session, bucket)
    }

    pub fn set_bucket_cors(&self, bucket: &str, rule: &CorsRule) -> Result<Response> {
        self.buckets.set_bucket_cors(&self.session, bucket, rule)
    }

    pub fn get_bucket_location(&self, bucket: &str) -> Result<Response> {
        self.buckets.get_bucket_location(&self.session, bucket)
    }

    pub fn upload_object(&self, input: &UploadObjectInput) -> Result<Response> {
        self.objects.upload_object(&self.session, input)
    }

    pub fn download_object(&self, input: &DownloadObjectInput) -> Result<Response> {
        self.objects.download_object(&self.session, input)
    }

    pub fn copy_object(&self, input: &CopyObjectInput) -> Result<Response> {
        self.objects.copy_object(&self.session, input)
    }

    pub fn get_object_acl(&self, path: &ObjectPath) -> Result<Response> {
        self.objects.get_object_acl(&self.session, path)
    }

    pub fn set_object_acl(&self, path: &ObjectPath, entry: &AclEntry) -> Result<Response> {
        self.objects.set_object_acl(&self.session, path, entry)
    }

    pub fn get_object_metadata(&self, path: &ObjectPath) -> Result<Response> {
        self.objects.get_object_metadata(&self.session, path)
    }

    pub fn delete_object(&self, path: &ObjectPath, confirmation: &str) -> Result<DeleteOutcome> {
        self.objects
            .delete_object(&self.session, path, confirmation)
    }
}

impl<B, O> std::fmt::Debug for Commands<B, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
