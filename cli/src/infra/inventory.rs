//! Infrastructure implementation of the `InventoryService` port.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use aws_config::SdkConfig;

use crate::application::ports::InventoryService;
use crate::infra::aws::{ec2_client, ssm_client};

/// EC2 and SSM backed instance inventory.
#[derive(Clone)]
pub struct AwsInventory {
    sdk: SdkConfig,
}

impl AwsInventory {
    #[must_use]
    pub fn new(sdk: SdkConfig) -> Self {
        Self { sdk }
    }
}

impl InventoryService for AwsInventory {
    async fn enabled_regions(&self) -> Result<Vec<String>> {
        let client = aws_sdk_ec2::Client::new(&self.sdk);
        let resp = client
            .describe_regions()
            .all_regions(false)
            .send()
            .await
            .context("DescribeRegions")?;
        Ok(resp
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(str::to_string))
            .collect())
    }

    async fn all_instances(&self, region: &str) -> Result<BTreeSet<String>> {
        let client = ec2_client(&self.sdk, region);
        let mut pages = client.describe_instances().into_paginator().send();
        let mut ids = BTreeSet::new();
        while let Some(page) = pages.next().await {
            let page = page.with_context(|| format!("DescribeInstances in {region}"))?;
            for reservation in page.reservations() {
                ids.extend(
                    reservation
                        .instances()
                        .iter()
                        .filter_map(|i| i.instance_id().map(str::to_string)),
                );
            }
        }
        tracing::debug!(region, count = ids.len(), "enumerated instances");
        Ok(ids)
    }

    async fn managed_instances(&self, region: &str) -> Result<BTreeSet<String>> {
        let client = ssm_client(&self.sdk, region);
        let mut pages = client
            .describe_instance_information()
            .into_paginator()
            .send();
        let mut ids = BTreeSet::new();
        while let Some(page) = pages.next().await {
            let page = page.with_context(|| format!("DescribeInstanceInformation in {region}"))?;
            ids.extend(
                page.instance_information_list()
                    .iter()
                    .filter_map(|i| i.instance_id().map(str::to_string)),
            );
        }
        tracing::debug!(region, count = ids.len(), "enumerated managed instances");
        Ok(ids)
    }
}
