//! Built-in provisioning programs
//!
//! Each program is a function from a [`ProgramConfig`] to a fully declared
//! [`Stack`]: resources registered, deferred values wired, exports named.
//! Nothing is provisioned here; the deploy driver does that afterwards.

pub mod serverless_azure;
pub mod static_site_aws;
pub mod static_site_azure;

use stratus_core::{ConfigKey, ProgramConfig, Result, Stack};

/// A named program the CLI can build
pub struct ProgramSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Configuration keys the program reads, for `stratus programs`
    pub config_keys: &'static [ConfigKey],
    pub build: fn(&ProgramConfig) -> Result<Stack>,
}

const PROGRAMS: &[ProgramSpec] = &[
    ProgramSpec {
        name: "static-website-aws",
        description: "S3 website bucket behind CloudFront with an ACM \
                      certificate and Route 53 records",
        config_keys: static_site_aws::CONFIG_KEYS,
        build: static_site_aws::build,
    },
    ProgramSpec {
        name: "static-website-azure",
        description: "Storage-account static website behind Azure CDN \
                      with a custom domain",
        config_keys: static_site_azure::CONFIG_KEYS,
        build: static_site_azure::build,
    },
    ProgramSpec {
        name: "serverless-azure",
        description: "Static website plus a function app run from a \
                      SAS-signed blob package",
        config_keys: serverless_azure::CONFIG_KEYS,
        build: serverless_azure::build,
    },
];

pub fn all() -> &'static [ProgramSpec] {
    PROGRAMS
}

pub fn find(name: &str) -> Option<&'static ProgramSpec> {
    all().iter().find(|program| program.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_engine::{deploy, ExportOutcome, SimulatedEngine};

    fn engine() -> SimulatedEngine {
        SimulatedEngine::new()
            .with_provider("aws", stratus_aws::synthesize)
            .with_provider("azure", stratus_azure::synthesize)
    }

    fn resolved(result: &stratus_engine::DeployResult, name: &str) -> String {
        match &result.exports[name] {
            ExportOutcome::Resolved(value) => value.as_str().unwrap_or_default().to_string(),
            ExportOutcome::Failed { source, reason } => {
                panic!("export {name} failed ('{source}': {reason})")
            }
        }
    }

    #[tokio::test]
    async fn aws_site_deploys_and_derives_its_urls() {
        let config = ProgramConfig::new()
            .with("domain", "example.com")
            .with("subdomain", "www");
        let mut stack = (find("static-website-aws").unwrap().build)(&config).unwrap();
        let result = deploy(&mut stack, &engine()).await.unwrap();
        assert!(result.is_success(), "outcomes: {:?}", result.outcomes);

        let origin = resolved(&result, "originHostname");
        assert!(origin.ends_with(".s3-website-us-east-1.amazonaws.com"));
        assert_eq!(resolved(&result, "originURL"), format!("http://{origin}"));
        let cdn = resolved(&result, "cdnHostname");
        assert!(cdn.ends_with(".cloudfront.net"));
        assert_eq!(resolved(&result, "cdnURL"), format!("https://{cdn}"));
        assert_eq!(resolved(&result, "domainURL"), "https://www.example.com");
    }

    #[tokio::test]
    async fn azure_site_deploys_and_derives_its_urls() {
        let config = ProgramConfig::new()
            .with("domain", "example.com")
            .with("subdomain", "www")
            .with("zoneResourceGroupName", "dns-rg");
        let mut stack = (find("static-website-azure").unwrap().build)(&config).unwrap();
        let result = deploy(&mut stack, &engine()).await.unwrap();
        assert!(result.is_success(), "outcomes: {:?}", result.outcomes);

        let origin = resolved(&result, "originHostname");
        assert!(origin.ends_with(".z13.web.core.windows.net"));
        assert!(!origin.ends_with('/'));
        assert!(resolved(&result, "cdnHostname").ends_with(".azureedge.net"));
        assert_eq!(resolved(&result, "domainURL"), "https://www.example.com");
    }

    #[tokio::test]
    async fn serverless_app_is_run_from_a_sas_signed_package() {
        let mut stack =
            (find("serverless-azure").unwrap().build)(&ProgramConfig::new()).unwrap();
        let result = deploy(&mut stack, &engine()).await.unwrap();
        assert!(result.is_success(), "outcomes: {:?}", result.outcomes);

        let api = resolved(&result, "apiURL");
        assert!(api.starts_with("https://"));
        assert!(api.ends_with(".azurewebsites.net/api/hello-world?name=stratus"));

        let app = stack.resource("app").unwrap();
        let inputs = app.materialize_inputs(stack.graph()).unwrap();
        let package = inputs["siteConfig"]["appSettings"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == "WEBSITE_RUN_FROM_PACKAGE")
            .and_then(|s| s["value"].as_str())
            .unwrap()
            .to_string();
        assert!(package.contains(".blob.core.windows.net/"));
        assert!(package.contains("?sv="));
    }

    #[tokio::test]
    async fn storage_failure_short_circuits_every_export() {
        let mut stack =
            (find("serverless-azure").unwrap().build)(&ProgramConfig::new()).unwrap();
        let engine = engine().fail_resource("account", "quota exceeded");
        let result = deploy(&mut stack, &engine).await.unwrap();
        assert!(!result.is_success());

        // Everything downstream of the storage account fails with the
        // original source, and nothing gets stuck pending.
        match &result.exports["apiURL"] {
            ExportOutcome::Failed { source, reason } => {
                assert_eq!(source, "account.id");
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(
            &result.exports["originURL"],
            ExportOutcome::Failed { .. }
        ));
    }

    #[test]
    fn every_program_is_findable_by_name() {
        for program in all() {
            assert!(find(program.name).is_some());
        }
        assert!(find("no-such-program").is_none());
    }

    #[test]
    fn required_keys_are_listed_before_building() {
        let program = find("static-website-aws").unwrap();
        assert!(program
            .config_keys
            .iter()
            .any(|key| key.name == "domain" && key.is_required()));
    }
}
