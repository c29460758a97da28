//! Infrastructure implementation of the `CommandService` port on SSM.

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_ssm::types::{CommandStatus, Target};

use crate::application::ports::{BatchState, CommandRequest, CommandService};
use crate::domain::error::BatchError;
use crate::infra::aws::ssm_client;

/// Remote command execution through SSM Run Command.
#[derive(Clone)]
pub struct SsmCommandService {
    sdk: SdkConfig,
}

impl SsmCommandService {
    #[must_use]
    pub fn new(sdk: SdkConfig) -> Self {
        Self { sdk }
    }
}

fn batch_state(status: &CommandStatus) -> BatchState {
    match status {
        CommandStatus::Success => BatchState::Success,
        CommandStatus::Failed => BatchState::Failed,
        CommandStatus::Cancelled => BatchState::Cancelled,
        CommandStatus::TimedOut => BatchState::TimedOut,
        CommandStatus::Cancelling => BatchState::Cancelling,
        CommandStatus::InProgress => BatchState::InProgress,
        _ => BatchState::Pending,
    }
}

impl CommandService for SsmCommandService {
    async fn send_command(&self, region: &str, request: &CommandRequest) -> Result<String> {
        let client = ssm_client(&self.sdk, region);
        let target = Target::builder()
            .key("InstanceIds")
            .set_values(Some(request.instance_ids.clone()))
            .build();
        let resp = client
            .send_command()
            .targets(target)
            .document_name(&request.document_name)
            .comment(&request.comment)
            .output_s3_bucket_name(&request.output_bucket)
            .output_s3_key_prefix(&request.output_prefix)
            .parameters("PlaybookS3Url", vec![request.playbook_url.clone()])
            .send()
            .await
            .with_context(|| format!("SendCommand in {region}"))?;
        let command_id = resp
            .command()
            .and_then(|c| c.command_id())
            .ok_or(BatchError::NoCommandId)?;
        Ok(command_id.to_string())
    }

    async fn batch_status(&self, region: &str, command_id: &str) -> Result<BatchState> {
        let client = ssm_client(&self.sdk, region);
        let resp = client
            .list_commands()
            .command_id(command_id)
            .send()
            .await
            .with_context(|| format!("ListCommands {command_id} in {region}"))?;
        // Freshly sent commands may not be listed yet.
        Ok(resp
            .commands()
            .first()
            .and_then(|c| c.status())
            .map_or(BatchState::Pending, batch_state))
    }

    async fn invocation_status(
        &self,
        region: &str,
        command_id: &str,
        instance_id: &str,
    ) -> Result<Option<String>> {
        let client = ssm_client(&self.sdk, region);
        let resp = client
            .list_command_invocations()
            .command_id(command_id)
            .instance_id(instance_id)
            .details(true)
            .send()
            .await
            .with_context(|| format!("ListCommandInvocations {command_id}/{instance_id}"))?;
        Ok(resp
            .command_invocations()
            .first()
            .and_then(|inv| inv.status())
            .map(|s| s.as_str().to_string()))
    }
}
