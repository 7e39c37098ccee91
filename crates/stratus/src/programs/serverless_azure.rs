//! Static website plus a serverless API on Azure
//!
//! The function app runs from a zipped package uploaded as a blob and
//! addressed through a read-only SAS URL. The `WEBSITE_RUN_FROM_PACKAGE`
//! setting is a derived string over four deferred values (account,
//! container, blob and token), and the SAS token itself depends on a
//! derived canonicalized resource path, so the whole chain settles in
//! dependency order during the deploy.

use stratus_azure::resources::ResourceGroup;
use stratus_azure::storage::{
    Blob, BlobArgs, BlobContainer, BlobContainerArgs, BlobFolder, BlobFolderArgs, ServiceSas,
    ServiceSasArgs, StaticWebsite, StaticWebsiteArgs, StorageAccount, StorageAccountArgs,
};
use stratus_azure::web::{AppServicePlan, AppServicePlanArgs, AppSetting, WebApp, WebAppArgs};
use stratus_core::{ConfigKey, ProgramConfig, Result, Stack};

pub const CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey::optional("path", "./www", "local folder synced into the $web container"),
    ConfigKey::optional("indexDocument", "index.html", "site index document"),
    ConfigKey::optional("errorDocument", "error.html", "site 404 document"),
    ConfigKey::optional("apiPath", "./api", "zipped function-app package to upload"),
];

pub fn build(config: &ProgramConfig) -> Result<Stack> {
    let path = config.get_or("path", "./www");
    let index_document = config.get_or("indexDocument", "index.html");
    let error_document = config.get_or("errorDocument", "error.html");
    let api_path = config.get_or("apiPath", "./api");

    let mut stack = Stack::new("serverless-azure");

    let resource_group = ResourceGroup::new(&mut stack, "resource-group")?;
    let account = StorageAccount::new(
        &mut stack,
        "account",
        StorageAccountArgs {
            resource_group_name: resource_group.name.into(),
            kind: "StorageV2".to_string(),
            sku_name: "Standard_LRS".to_string(),
        },
    )?;
    let container = BlobContainer::new(
        &mut stack,
        "container",
        BlobContainerArgs {
            account_name: account.name.into(),
            resource_group_name: resource_group.name.into(),
            public_access: "None".to_string(),
        },
    )?;

    let website = StaticWebsite::new(
        &mut stack,
        "website",
        StaticWebsiteArgs {
            account_name: account.name.into(),
            resource_group_name: resource_group.name.into(),
            index_document,
            error404_document: error_document,
        },
    )?;
    BlobFolder::new(
        &mut stack,
        "synced-folder",
        BlobFolderArgs {
            path,
            resource_group_name: resource_group.name.into(),
            storage_account_name: account.name.into(),
            container_name: website.container_name.into(),
        },
    )?;

    let plan = AppServicePlan::new(
        &mut stack,
        "plan",
        AppServicePlanArgs {
            resource_group_name: resource_group.name.into(),
            sku_name: "Y1".to_string(),
            sku_tier: "Dynamic".to_string(),
        },
    )?;
    let blob = Blob::new(
        &mut stack,
        "blob",
        BlobArgs {
            account_name: account.name.into(),
            resource_group_name: resource_group.name.into(),
            container_name: container.name.into(),
            source: api_path,
        },
    )?;

    let canonicalized_resource = stack.concat(
        "sas-canonicalized-resource",
        vec![
            "/blob/".into(),
            account.name.into(),
            "/".into(),
            container.name.into(),
        ],
    )?;
    let sas = ServiceSas::new(
        &mut stack,
        "blob-sas",
        ServiceSasArgs {
            account_name: account.name.into(),
            resource_group_name: resource_group.name.into(),
            canonicalized_resource: canonicalized_resource.into(),
            resource: "c".to_string(),
            permissions: "r".to_string(),
            protocols: "https".to_string(),
            shared_access_start_time: "2021-01-01".to_string(),
            shared_access_expiry_time: "2030-01-01".to_string(),
            content_type: "application/json".to_string(),
            cache_control: "max-age=5".to_string(),
            content_disposition: "inline".to_string(),
            content_encoding: "deflate".to_string(),
        },
    )?;

    // The package URL settles only after all four inputs have resolved.
    let run_from_package = stack.concat(
        "run-from-package",
        vec![
            "https://".into(),
            account.name.into(),
            ".blob.core.windows.net/".into(),
            container.name.into(),
            "/".into(),
            blob.name.into(),
            "?".into(),
            sas.token.into(),
        ],
    )?;
    let app = WebApp::new(
        &mut stack,
        "app",
        WebAppArgs {
            resource_group_name: resource_group.name.into(),
            server_farm_id: plan.id().into(),
            kind: "FunctionApp".to_string(),
            app_settings: vec![
                AppSetting::new("runtime", "node"),
                AppSetting::new("FUNCTIONS_WORKER_RUNTIME", "node"),
                AppSetting::new("WEBSITE_RUN_FROM_PACKAGE", run_from_package),
                AppSetting::new("WEBSITE_NODE_DEFAULT_VERSION", "~12"),
                AppSetting::new("FUNCTIONS_EXTENSION_VERSION", "~3"),
            ],
        },
    )?;

    let api_url = stack.apply(app.default_host_name, "apiURL", |host: String| {
        format!("https://{host}/api/hello-world?name=stratus")
    })?;
    stack.export("originURL", account.primary_web_endpoint)?;
    stack.export("originHostname", account.primary_web_endpoint)?;
    stack.export("apiURL", api_url)?;
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults_only() {
        let stack = build(&ProgramConfig::new()).unwrap();
        for name in ["originURL", "originHostname", "apiURL"] {
            assert!(stack.exports().contains_key(name), "missing export {name}");
        }
    }

    #[test]
    fn package_url_depends_on_the_sas_token() {
        let stack = build(&ProgramConfig::new()).unwrap();
        let edges = stack.graph().edges();
        assert!(edges.contains(&(
            "run-from-package".to_string(),
            "blob-sas.serviceSasToken".to_string()
        )));
        assert!(edges.contains(&("app.id".to_string(), "run-from-package".to_string())));
    }

    #[test]
    fn sas_token_depends_on_the_derived_canonical_path() {
        let stack = build(&ProgramConfig::new()).unwrap();
        assert!(stack.graph().edges().contains(&(
            "blob-sas.id".to_string(),
            "sas-canonicalized-resource".to_string()
        )));
    }
}
