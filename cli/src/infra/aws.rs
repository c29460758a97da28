//! Shared AWS SDK configuration.
//!
//! One `SdkConfig` is loaded per process from the selected profile; per-region
//! EC2 and SSM clients inherit it (credentials, retry policy, HTTP client) and
//! override only the region.

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::infra::inventory::AwsInventory;
use crate::infra::s3::S3ObjectStore;
use crate::infra::ssm::SsmCommandService;

/// Loaded SDK configuration plus factories for the port adapters.
#[derive(Clone)]
pub struct AwsContext {
    sdk: SdkConfig,
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.sdk.region())
            .finish()
    }
}

impl AwsContext {
    /// Load SDK configuration for `profile`, optionally pinning the home region.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk = loader.load().await;
        tracing::debug!(?profile, region = ?sdk.region(), "aws configuration loaded");
        Self { sdk }
    }

    /// Object store rooted at `bucket`.
    #[must_use]
    pub fn object_store(&self, bucket: &str) -> S3ObjectStore {
        S3ObjectStore::new(aws_sdk_s3::Client::new(&self.sdk), bucket)
    }

    #[must_use]
    pub fn inventory(&self) -> AwsInventory {
        AwsInventory::new(self.sdk.clone())
    }

    #[must_use]
    pub fn commands(&self) -> SsmCommandService {
        SsmCommandService::new(self.sdk.clone())
    }
}

/// EC2 client bound to `region`.
pub fn ec2_client(sdk: &SdkConfig, region: &str) -> aws_sdk_ec2::Client {
    let conf = aws_sdk_ec2::config::Builder::from(sdk)
        .region(Region::new(region.to_string()))
        .build();
    aws_sdk_ec2::Client::from_conf(conf)
}

/// SSM client bound to `region`.
pub fn ssm_client(sdk: &SdkConfig, region: &str) -> aws_sdk_ssm::Client {
    let conf = aws_sdk_ssm::config::Builder::from(sdk)
        .region(Region::new(region.to_string()))
        .build();
    aws_sdk_ssm::Client::from_conf(conf)
}
