//! Kafka provisioning controller
//!
//! Drives a Kafka instance through its asynchronous lifecycle: submit the
//! request, poll the instance until it settles, then apply ACL bindings.

use std::future::Future;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use rhoas_core::cancel::Cancellation;
use rhoas_core::provider::{ProviderError, ProviderErrorKind, ProviderResult};
use rhoas_core::wait::{StateChangeConf, WaitError};

use crate::acl::AclBindingSpec;
use crate::api::{ApiError, KafkaAdminApi, KafkaMgmtApi, KafkaRequest, KafkaRequestPayload};
use crate::config::Timeouts;
use crate::status::Status;

/// Creates, reads and deletes Kafka instances
pub struct KafkaController {
    mgmt: Arc<dyn KafkaMgmtApi>,
    admin: Arc<dyn KafkaAdminApi>,
    timeouts: Timeouts,
    cancellation: Cancellation,
}

impl KafkaController {
    pub fn new(
        mgmt: Arc<dyn KafkaMgmtApi>,
        admin: Arc<dyn KafkaAdminApi>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            mgmt,
            admin,
            timeouts,
            cancellation: Cancellation::never(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Issue a remote call unless already cancelled, abandoning it if
    /// cancellation fires while it is in flight
    async fn guarded<T, F, Fut>(&self, operation: &str, call: F) -> ProviderResult<Result<T, ApiError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if self.cancellation.is_cancelled() {
            return Err(cancelled(operation));
        }
        tokio::select! {
            result = call() => Ok(result),
            _ = self.cancellation.cancelled() => Err(cancelled(operation)),
        }
    }

    /// Create an instance, wait for it to become ready and apply `acls`
    ///
    /// Once the API has assigned an id, every error carries it as
    /// `ProviderError::identifier`.
    pub async fn create(
        &self,
        payload: &KafkaRequestPayload,
        acls: &[AclBindingSpec],
    ) -> ProviderResult<KafkaRequest> {
        let operation = format!("create request for Kafka instance \"{}\"", payload.name);
        let requested = self
            .guarded(&operation, || self.mgmt.create_kafka(payload))
            .await?
            .map_err(api_error)?;

        let id = requested.id.clone();
        if id.is_empty() {
            return Err(ProviderError::new(format!(
                "create request for Kafka instance \"{}\" returned no id",
                payload.name
            ))
            .with_kind(ProviderErrorKind::Api));
        }
        info!("Kafka instance \"{}\" requested with id {}", payload.name, id);

        let kafka = self
            .wait_until_ready(&id)
            .await
            .map_err(|e| e.with_identifier(&id))?;
        info!("Kafka instance \"{}\" ({}) is ready", kafka.display_name(), id);

        self.apply_acls(&kafka, acls)
            .await
            .map_err(|e| e.with_identifier(&id))?;

        Ok(kafka)
    }

    async fn wait_until_ready(&self, id: &str) -> ProviderResult<KafkaRequest> {
        let conf = StateChangeConf {
            pending: vec![Status::Accepted, Status::Preparing, Status::Provisioning],
            target: vec![Status::Ready],
            delay: self.timeouts.delay,
            poll_interval: self.timeouts.poll_interval,
            timeout: self.timeouts.create,
        };

        let failed_reason: Mutex<Option<String>> = Mutex::new(None);
        let mgmt = &self.mgmt;
        let reason_slot = &failed_reason;

        let result = conf
            .wait_for_state(&self.cancellation, move || async move {
                let kafka = mgmt.get_kafka_by_id(id).await?;
                let status = kafka.status();
                if status == Status::Failed
                    && let Ok(mut slot) = reason_slot.lock()
                {
                    *slot = kafka.failed_reason.clone();
                }
                Ok::<_, ApiError>((kafka, status))
            })
            .await;

        result.map_err(|e| {
            let reason = failed_reason.lock().ok().and_then(|mut slot| slot.take());
            wait_error(e, reason)
        })
    }

    /// Submit each binding in order, stopping at the first failure
    async fn apply_acls(&self, kafka: &KafkaRequest, acls: &[AclBindingSpec]) -> ProviderResult<()> {
        for (index, spec) in acls.iter().enumerate() {
            let endpoint = admin_endpoint(kafka)?;
            let binding = spec.to_binding();
            debug!(
                "creating ACL binding {} on {}: {} {} {}",
                index, endpoint, binding.principal, binding.operation, binding.resource_name
            );

            let operation = format!("ACL binding {}", index);
            self.guarded(&operation, || self.admin.create_acl(&endpoint, &binding))
                .await?
                .map_err(|e| {
                    let err = api_error(e);
                    let message = format!("failed to create ACL binding {}: {}", index, err.message);
                    ProviderError { message, ..err }
                })?;
        }

        if !acls.is_empty() {
            info!(
                "applied {} ACL binding(s) to Kafka instance \"{}\"",
                acls.len(),
                kafka.display_name()
            );
        }
        Ok(())
    }

    /// Fetch an instance; a missing instance is a `NotFound` error
    pub async fn read(&self, id: &str) -> ProviderResult<KafkaRequest> {
        self.mgmt.get_kafka_by_id(id).await.map_err(api_error)
    }

    /// Delete an instance and wait until it is gone
    ///
    /// An instance that is already absent counts as deleted.
    pub async fn delete(&self, id: &str) -> ProviderResult<()> {
        let operation = format!("delete request for Kafka instance {}", id);
        match self
            .guarded(&operation, || self.mgmt.delete_kafka_by_id(id))
            .await?
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!("Kafka instance {} is already deleted", id);
                return Ok(());
            }
            Err(e) => return Err(api_error(e)),
        }
        info!("deletion of Kafka instance {} requested", id);

        let conf = StateChangeConf {
            pending: vec![Status::Deprovision, Status::Deleting],
            target: vec![Status::Deleted, Status::NotFound],
            delay: self.timeouts.delay,
            poll_interval: self.timeouts.poll_interval,
            timeout: self.timeouts.delete,
        };

        let mgmt = &self.mgmt;
        let result = conf
            .wait_for_state(&self.cancellation, move || async move {
                match mgmt.get_kafka_by_id(id).await {
                    Ok(kafka) => {
                        let status = kafka.status();
                        Ok::<_, ApiError>(((), status))
                    }
                    Err(e) if e.is_not_found() => Ok(((), Status::NotFound)),
                    Err(e) => Err(e),
                }
            })
            .await;

        match result {
            Ok(()) => {
                info!("Kafka instance {} deleted", id);
                Ok(())
            }
            Err(e) => {
                let err = wait_error(e, None);
                if err.message.contains("not found") {
                    return Ok(());
                }
                let message = format!(
                    "Error waiting for Kafka instance ({}) to be deleted: {}",
                    id, err.message
                );
                Err(ProviderError { message, ..err })
            }
        }
    }
}

/// Admin API base URL of a ready instance
pub fn admin_endpoint(kafka: &KafkaRequest) -> ProviderResult<String> {
    let name = kafka.display_name();
    let problem = match kafka.status() {
        Status::Accepted | Status::Preparing | Status::Provisioning => Some("is not ready yet"),
        Status::Failed => Some("has failed"),
        Status::Deprovision => Some("is being deprovisioned"),
        Status::Deleting => Some("is being deleted"),
        _ => None,
    };
    if let Some(problem) = problem {
        return Err(ProviderError::new(format!("Kafka instance \"{}\" {}", name, problem))
            .with_kind(ProviderErrorKind::UnexpectedState));
    }

    if kafka
        .bootstrap_server_host
        .as_deref()
        .is_none_or(str::is_empty)
    {
        return Err(ProviderError::new(format!(
            "bootstrap URL is missing for Kafka instance \"{}\"",
            name
        ))
        .with_kind(ProviderErrorKind::UnexpectedState));
    }

    match kafka.admin_api_server_url.as_deref() {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ProviderError::new(format!(
            "admin API URL is missing for Kafka instance \"{}\"",
            name
        ))
        .with_kind(ProviderErrorKind::UnexpectedState)),
    }
}

fn cancelled(operation: &str) -> ProviderError {
    ProviderError::new(format!("{} cancelled", operation)).with_kind(ProviderErrorKind::Cancelled)
}

fn api_error(err: ApiError) -> ProviderError {
    let kind = if err.is_not_found() {
        ProviderErrorKind::NotFound
    } else {
        ProviderErrorKind::Api
    };
    ProviderError::new(err.to_string())
        .with_kind(kind)
        .with_cause(err)
}

fn wait_error(err: WaitError<ApiError>, failed_reason: Option<String>) -> ProviderError {
    match err {
        WaitError::Refresh(e) => api_error(e),
        WaitError::Timeout { .. } => {
            ProviderError::new(err.to_string()).with_kind(ProviderErrorKind::Timeout)
        }
        WaitError::Cancelled { .. } => {
            ProviderError::new(err.to_string()).with_kind(ProviderErrorKind::Cancelled)
        }
        WaitError::UnexpectedState { .. } => {
            let message = match failed_reason {
                Some(reason) if !reason.is_empty() => format!("{}: {}", err, reason),
                _ => err.to_string(),
            };
            ProviderError::new(message).with_kind(ProviderErrorKind::UnexpectedState)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AclBinding, ApiResult};
    use rhoas_core::cancel;
    use rhoas_core::provider::BoxFuture;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Status(&'static str),
        NotFound,
        Failed(&'static str),
    }

    fn kafka_with(status: &str) -> KafkaRequest {
        KafkaRequest {
            id: "abc".to_string(),
            kind: "Kafka".to_string(),
            href: "/api/kafkas_mgmt/v1/kafkas/abc".to_string(),
            status: Some(status.to_string()),
            cloud_provider: Some("aws".to_string()),
            region: Some("us-east-1".to_string()),
            name: Some("events".to_string()),
            bootstrap_server_host: Some("events.kafka.example.com:443".to_string()),
            admin_api_server_url: Some("https://admin.events.example.com".to_string()),
            ..KafkaRequest::default()
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_response(
            404,
            Some("Not Found"),
            r#"{"kind":"Error","code":"KAFKAS-MGMT-7","reason":"Kafka with id='abc' not found"}"#,
        )
    }

    fn server_error(status: u16) -> ApiError {
        ApiError::from_response(status, None, r#"{"reason":"quota exceeded"}"#)
    }

    /// Management API replaying scripted poll responses; the last step repeats
    struct FakeMgmt {
        script: Mutex<VecDeque<Step>>,
        last: Mutex<Step>,
        create_error: Option<u16>,
        delete_error: Option<u16>,
        create_calls: AtomicUsize,
        get_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    impl FakeMgmt {
        fn new(script: Vec<Step>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(Step::Status("accepted")),
                create_error: None,
                delete_error: None,
                create_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
                delete_calls: AtomicUsize::new(0),
            }
        }

        fn next_step(&self) -> Step {
            let mut last = self.last.lock().unwrap();
            if let Some(step) = self.script.lock().unwrap().pop_front() {
                *last = step;
            }
            *last
        }
    }

    impl KafkaMgmtApi for FakeMgmt {
        fn create_kafka<'a>(
            &'a self,
            payload: &'a KafkaRequestPayload,
        ) -> BoxFuture<'a, ApiResult<KafkaRequest>> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.create_error {
                Some(status) => Err(server_error(status)),
                None => {
                    let mut kafka = kafka_with("accepted");
                    kafka.name = Some(payload.name.clone());
                    Ok(kafka)
                }
            };
            Box::pin(async move { result })
        }

        fn get_kafka_by_id<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, ApiResult<KafkaRequest>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.next_step() {
                Step::Status(status) => Ok(kafka_with(status)),
                Step::NotFound => Err(not_found()),
                Step::Failed(reason) => {
                    let mut kafka = kafka_with("failed");
                    kafka.failed_reason = Some(reason.to_string());
                    Ok(kafka)
                }
            };
            Box::pin(async move { result })
        }

        fn delete_kafka_by_id<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.delete_error {
                Some(404) => Err(not_found()),
                Some(status) => Err(server_error(status)),
                None => Ok(()),
            };
            Box::pin(async move { result })
        }
    }

    /// Admin API recording bindings; fails the call at `fail_at` (0-based)
    /// and fires `cancel_on_call` from inside the first call
    #[derive(Default)]
    struct FakeAdmin {
        fail_at: Option<usize>,
        cancel_on_call: Mutex<Option<cancel::CancelHandle>>,
        calls: AtomicUsize,
        applied: Mutex<Vec<(String, AclBinding)>>,
    }

    impl KafkaAdminApi for FakeAdmin {
        fn create_acl<'a>(
            &'a self,
            admin_url: &'a str,
            binding: &'a AclBinding,
        ) -> BoxFuture<'a, ApiResult<()>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(handle) = self.cancel_on_call.lock().unwrap().take() {
                handle.cancel();
            }
            let result = if self.fail_at == Some(call) {
                Err(ApiError::from_response(
                    400,
                    Some("Bad Request"),
                    r#"{"reason":"invalid operation"}"#,
                ))
            } else {
                self.applied
                    .lock()
                    .unwrap()
                    .push((admin_url.to_string(), binding.clone()));
                Ok(())
            };
            Box::pin(async move { result })
        }
    }

    fn timeouts() -> Timeouts {
        Timeouts {
            create: Duration::from_secs(60),
            delete: Duration::from_secs(60),
            delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
        }
    }

    fn controller(mgmt: &Arc<FakeMgmt>, admin: &Arc<FakeAdmin>) -> KafkaController {
        KafkaController::new(mgmt.clone(), admin.clone(), timeouts())
    }

    fn payload() -> KafkaRequestPayload {
        KafkaRequestPayload {
            name: "events".to_string(),
            cloud_provider: "aws".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    fn spec(resource_name: &str) -> AclBindingSpec {
        AclBindingSpec {
            principal: "*".to_string(),
            resource_type: "topic".to_string(),
            resource_name: resource_name.to_string(),
            pattern_type: "literal".to_string(),
            operation_type: "read".to_string(),
            permission_type: "allow".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_waits_until_ready() {
        let mgmt = Arc::new(FakeMgmt::new(vec![
            Step::Status("accepted"),
            Step::Status("provisioning"),
            Step::Status("ready"),
        ]));
        let admin = Arc::new(FakeAdmin::default());

        let kafka = controller(&mgmt, &admin)
            .create(&payload(), &[])
            .await
            .unwrap();

        assert_eq!(kafka.status(), Status::Ready);
        assert_eq!(kafka.id, "abc");
        assert_eq!(mgmt.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 3);
        assert_eq!(admin.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn create_timeout_keeps_identifier() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("provisioning")]));
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin)
            .create(&payload(), &[spec("orders")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Timeout);
        assert_eq!(err.identifier.as_deref(), Some("abc"));
        assert!(err.message.contains("last state: 'provisioning'"));
        assert_eq!(admin.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn create_failed_status_short_circuits() {
        let mgmt = Arc::new(FakeMgmt::new(vec![
            Step::Status("accepted"),
            Step::Failed("insufficient capacity"),
        ]));
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin)
            .create(&payload(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::UnexpectedState);
        assert_eq!(err.identifier.as_deref(), Some("abc"));
        assert!(err.message.contains("'failed'"));
        assert!(err.message.ends_with("insufficient capacity"));
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn create_request_error_has_no_identifier() {
        let mut fake = FakeMgmt::new(vec![]);
        fake.create_error = Some(403);
        let mgmt = Arc::new(fake);
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin)
            .create(&payload(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Api);
        assert!(err.identifier.is_none());
        assert!(err.message.contains("quota exceeded"));
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn create_applies_acls_in_order() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("ready")]));
        let admin = Arc::new(FakeAdmin::default());

        controller(&mgmt, &admin)
            .create(&payload(), &[spec("orders"), spec("payments")])
            .await
            .unwrap();

        let applied = admin.applied.lock().unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].0, "https://admin.events.example.com");
        assert_eq!(applied[0].1.resource_name, "orders");
        assert_eq!(applied[0].1.principal, "User:*");
        assert_eq!(applied[0].1.operation, "READ");
        assert_eq!(applied[1].1.resource_name, "payments");
    }

    #[tokio::test(start_paused = true)]
    async fn acl_failure_stops_remaining_bindings() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("ready")]));
        let admin = Arc::new(FakeAdmin {
            fail_at: Some(1),
            ..FakeAdmin::default()
        });

        let err = controller(&mgmt, &admin)
            .create(&payload(), &[spec("a"), spec("b"), spec("c")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Api);
        assert_eq!(err.identifier.as_deref(), Some("abc"));
        assert!(err.message.contains("invalid operation"));
        assert_eq!(admin.calls.load(Ordering::SeqCst), 2);
        let applied = admin.applied.lock().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].1.resource_name, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_create_wait() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("provisioning")]));
        let admin = Arc::new(FakeAdmin::default());
        let (handle, cancellation) = cancel::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(12)).await;
            handle.cancel();
        });

        let err = controller(&mgmt, &admin)
            .with_cancellation(cancellation)
            .create(&payload(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Cancelled);
        assert_eq!(err.identifier.as_deref(), Some("abc"));
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_controller_sends_no_requests() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("ready")]));
        let admin = Arc::new(FakeAdmin::default());
        let (handle, cancellation) = cancel::channel();
        handle.cancel();
        let controller = controller(&mgmt, &admin).with_cancellation(cancellation);

        let err = controller.create(&payload(), &[]).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Cancelled);
        assert!(err.identifier.is_none());
        assert_eq!(mgmt.create_calls.load(Ordering::SeqCst), 0);

        let err = controller.delete("abc").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Cancelled);
        assert_eq!(mgmt.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_acls_stops_remaining_bindings() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("ready")]));
        let (handle, cancellation) = cancel::channel();
        let admin = Arc::new(FakeAdmin {
            cancel_on_call: Mutex::new(Some(handle)),
            ..FakeAdmin::default()
        });

        let err = controller(&mgmt, &admin)
            .with_cancellation(cancellation)
            .create(&payload(), &[spec("a"), spec("b"), spec("c")])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Cancelled);
        assert_eq!(err.identifier.as_deref(), Some("abc"));
        assert_eq!(admin.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_of_missing_instance_skips_polling() {
        let mut fake = FakeMgmt::new(vec![]);
        fake.delete_error = Some(404);
        let mgmt = Arc::new(fake);
        let admin = Arc::new(FakeAdmin::default());

        controller(&mgmt, &admin).delete("abc").await.unwrap();

        assert_eq!(mgmt.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_polls_until_not_found() {
        let mgmt = Arc::new(FakeMgmt::new(vec![
            Step::Status("deprovision"),
            Step::Status("deleting"),
            Step::NotFound,
        ]));
        let admin = Arc::new(FakeAdmin::default());

        controller(&mgmt, &admin).delete("abc").await.unwrap();

        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_timeout_is_wrapped() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::Status("deleting")]));
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin).delete("abc").await.unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Timeout);
        assert!(
            err.message
                .starts_with("Error waiting for Kafka instance (abc) to be deleted: timeout")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delete_request_error_is_surfaced() {
        let mut fake = FakeMgmt::new(vec![]);
        fake.delete_error = Some(500);
        let mgmt = Arc::new(fake);
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin).delete("abc").await.unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Api);
        assert_eq!(mgmt.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_of_missing_instance_is_not_found() {
        let mgmt = Arc::new(FakeMgmt::new(vec![Step::NotFound]));
        let admin = Arc::new(FakeAdmin::default());

        let err = controller(&mgmt, &admin).read("abc").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn admin_endpoint_requires_ready_instance() {
        let err = admin_endpoint(&kafka_with("provisioning")).unwrap_err();
        assert_eq!(err.message, "Kafka instance \"events\" is not ready yet");

        let err = admin_endpoint(&kafka_with("deleting")).unwrap_err();
        assert_eq!(err.message, "Kafka instance \"events\" is being deleted");

        let mut kafka = kafka_with("ready");
        kafka.bootstrap_server_host = None;
        let err = admin_endpoint(&kafka).unwrap_err();
        assert_eq!(
            err.message,
            "bootstrap URL is missing for Kafka instance \"events\""
        );

        assert_eq!(
            admin_endpoint(&kafka_with("ready")).unwrap(),
            "https://admin.events.example.com"
        );
    }
}
