//! Entry point for one invocation: request in, result out

use crate::aws::ec2::Ec2Operations;
use crate::config::WaitSettings;
use crate::error::{Result, SandboxError};
use crate::orchestrator::{Provisioner, Teardown};
use netsandbox_common::{InvocationResult, Mode, Request, RequestEvent, ResourceIds};
use serde_json::Value;
use tracing::{error, info};

/// Routes validated requests to provisioning or teardown
pub struct Dispatcher<E> {
    ec2: E,
    waits: WaitSettings,
}

impl<E: Ec2Operations> Dispatcher<E> {
    pub fn new(ec2: E, waits: WaitSettings) -> Self {
        Self { ec2, waits }
    }

    /// The EC2 backend this dispatcher drives
    pub fn ec2(&self) -> &E {
        &self.ec2
    }

    /// Handle a raw request.
    ///
    /// Every failure, including a request that does not validate, becomes an
    /// `ERROR` result. Validation happens before any remote call.
    pub async fn dispatch(&self, event: Value) -> InvocationResult {
        let outcome = match parse_request(event) {
            Ok(request) => self.dispatch_request(&request).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(ids) => InvocationResult::success(ids),
            Err(e) => {
                error!(error = %e, "Invocation failed");
                e.into()
            }
        }
    }

    /// Run the phase selected by `request.mode`
    pub async fn dispatch_request(&self, request: &Request) -> Result<ResourceIds> {
        info!(mode = %request.mode, name = %request.tags.name_value, "Dispatching request");

        match request.mode {
            Mode::Start => Provisioner::new(&self.ec2, &self.waits)
                .provision(request)
                .await
                .map(Into::into),
            Mode::Stop => Teardown::new(&self.ec2, &self.waits)
                .teardown(&request.tags)
                .await
                .map(Into::into),
        }
    }
}

/// Apply defaults to a raw request and validate it
pub fn parse_request(event: Value) -> Result<Request> {
    Ok(RequestEvent::from_value(event)?.validate()?)
}

impl From<SandboxError> for InvocationResult {
    fn from(e: SandboxError) -> Self {
        InvocationResult::error(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::ec2::MockEc2Operations;
    use crate::aws::error::AwsError;
    use crate::aws::locator::ResourceQuery;
    use crate::testing::FakeEc2;
    use netsandbox_common::{IngressRule, ResourceKind, TagNamespace};
    use serde_json::json;

    fn dispatcher() -> Dispatcher<FakeEc2> {
        Dispatcher::new(FakeEc2::new(), WaitSettings::default())
    }

    fn all_queries(tags: &TagNamespace) -> [ResourceQuery; 4] {
        [
            ResourceQuery::vpc(tags),
            ResourceQuery::subnet(tags),
            ResourceQuery::security_group(tags),
            ResourceQuery::instance(tags),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_with_defaults_succeeds() {
        let dispatcher = dispatcher();

        let result = dispatcher.dispatch(json!({"state": "start"})).await;

        let ids = result.ids().expect("start should succeed");
        assert!(ids.vpc_id.as_deref().is_some_and(|id| id.starts_with("vpc-")));
        assert!(ids.subnet_id.as_deref().is_some_and(|id| id.starts_with("subnet-")));
        assert!(ids.instance_id.as_deref().is_some_and(|id| id.starts_with("i-")));

        let instance = dispatcher.ec2().resource(ids.instance_id.as_ref().unwrap()).unwrap();
        assert_eq!(instance.tag_value("Name"), Some("netsandbox-ec2"));
    }

    #[tokio::test]
    async fn test_stop_with_nothing_matching_succeeds_empty() {
        let dispatcher = dispatcher();

        let result = dispatcher.dispatch(json!({"state": "stop"})).await;

        assert!(result.is_success());
        assert!(result.ids().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_with_only_instance_and_subnet() {
        let dispatcher = dispatcher();
        let tags = TagNamespace {
            name_value: "lab".to_string(),
            ..TagNamespace::default()
        };
        let ec2 = dispatcher.ec2();
        let instance_id = ec2.seed(ResourceKind::Instance, tags.tags_for(ResourceKind::Instance));
        let subnet_id = ec2.seed(ResourceKind::Subnet, tags.tags_for(ResourceKind::Subnet));

        let result = dispatcher
            .dispatch(json!({"state": "stop", "tag_name_value": "lab"}))
            .await;

        let ids = result.ids().expect("stop should succeed");
        assert_eq!(ids.instance_id.as_ref(), Some(&instance_id));
        assert_eq!(ids.subnet_id.as_ref(), Some(&subnet_id));
        assert_eq!(ids.vpc_id, None);
        assert_eq!(ec2.resource(&instance_id).unwrap().state, "terminated");
        assert!(ec2.resource(&subnet_id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_security_group_dependency_violation_is_error() {
        let dispatcher = dispatcher();
        assert!(dispatcher.dispatch(json!({"state": "start"})).await.is_success());
        dispatcher.ec2().fail(
            "DeleteSecurityGroup",
            AwsError::DependencyViolation {
                message: "resource sg has a dependent object".to_string(),
            },
        );
        dispatcher.ec2().clear_calls();

        let result = dispatcher.dispatch(json!({"state": "stop"})).await;

        match result {
            InvocationResult::Error { message } => {
                assert!(message.contains("DeleteSecurityGroup"), "{message}");
                assert!(message.contains("dependent object"), "{message}");
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(dispatcher.ec2().call_count("DeleteVpc"), 0);
        assert_eq!(dispatcher.ec2().call_count("DeleteInternetGateway"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_leaves_nothing_discoverable() {
        let dispatcher = dispatcher();
        let event = json!({"tag_name_value": "roundtrip", "tag_project_value": "qa"});

        let mut start = event.clone();
        start["state"] = json!("start");
        assert!(dispatcher.dispatch(start).await.is_success());

        let mut stop = event;
        stop["state"] = json!("stop");
        let result = dispatcher.dispatch(stop).await;
        let ids = result.ids().expect("stop should succeed");
        assert!(ids.vpc_id.is_some());
        assert!(ids.instance_id.is_some());

        let tags = TagNamespace {
            name_value: "roundtrip".to_string(),
            project_value: "qa".to_string(),
            ..TagNamespace::default()
        };
        for query in all_queries(&tags) {
            let found = dispatcher.ec2().find_ids(&query).await.unwrap();
            assert!(found.is_empty(), "{query:?} still matches {found:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_singly_nested_ingress_rules_are_unwrapped() {
        let dispatcher = dispatcher();
        let event = json!({
            "state": "start",
            "ingress_rules": [[
                {"IpProtocol": "tcp", "FromPort": 8080, "ToPort": 8080,
                 "IpRanges": [{"CidrIp": "10.0.0.0/8"}]}
            ]]
        });

        let result = dispatcher.dispatch(event).await;

        let sg_id = result.ids().unwrap().security_group_id.clone().unwrap();
        let group = dispatcher.ec2().resource(&sg_id).unwrap();
        assert_eq!(group.ingress, [IngressRule::tcp(8080, "10.0.0.0/8")]);
    }

    #[tokio::test]
    async fn test_unknown_mode_never_calls_remote() {
        // No expectations: any remote call panics
        let dispatcher = Dispatcher::new(MockEc2Operations::new(), WaitSettings::default());

        let result = dispatcher.dispatch(json!({"state": "restart"})).await;

        assert_eq!(
            result,
            InvocationResult::error("Invalid request: state must be 'start' or 'stop', got: 'restart'")
        );
    }

    #[tokio::test]
    async fn test_uppercase_mode_never_tears_down() {
        let dispatcher = Dispatcher::new(MockEc2Operations::new(), WaitSettings::default());

        let result = dispatcher.dispatch(json!({"state": "STOP"})).await;

        assert_eq!(
            result,
            InvocationResult::error("Invalid request: state must be 'start' or 'stop', got: 'STOP'")
        );
    }

    #[tokio::test]
    async fn test_ambiguous_nested_ingress_rejected() {
        let dispatcher = Dispatcher::new(MockEc2Operations::new(), WaitSettings::default());
        let rule = json!({"IpProtocol": "tcp", "FromPort": 22, "ToPort": 22});

        let result = dispatcher
            .dispatch(json!({"state": "start", "ingress_rules": [[rule.clone()], [rule]]}))
            .await;

        assert!(!result.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_reports_error_and_deletes_nothing() {
        let dispatcher = dispatcher();
        dispatcher.ec2().fail("RunInstances", AwsError::Throttled);

        let result = dispatcher.dispatch(json!({"state": "start"})).await;

        assert_eq!(
            result,
            InvocationResult::error("RunInstances failed: Rate limit exceeded")
        );
        assert!(
            !dispatcher
                .ec2()
                .calls()
                .iter()
                .any(|c| c.starts_with("Delete") || c.starts_with("Terminate"))
        );
    }
}
