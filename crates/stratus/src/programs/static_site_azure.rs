//! Static website on Azure
//!
//! Storage-account static website behind an Azure CDN endpoint, with a
//! CNAME in an existing DNS zone and a custom domain on the endpoint. The
//! endpoint origin host is derived from the account's web endpoint URL,
//! and the custom domain host from the CNAME's fqdn, so both stay deferred
//! until the storage account and the record set exist.

use stratus_azure::cdn::{
    CustomDomain, CustomDomainArgs, Endpoint, EndpointArgs, EndpointOrigin, Profile, ProfileArgs,
};
use stratus_azure::network::{RecordSet, RecordSetArgs};
use stratus_azure::resources::ResourceGroup;
use stratus_azure::storage::{
    BlobFolder, BlobFolderArgs, StaticWebsite, StaticWebsiteArgs, StorageAccount,
    StorageAccountArgs,
};
use stratus_core::{ConfigKey, ProgramConfig, Result, Stack};

pub const CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey::optional("path", "./www", "local folder synced into the $web container"),
    ConfigKey::optional("indexDocument", "index.html", "site index document"),
    ConfigKey::optional("errorDocument", "error.html", "site 404 document"),
    ConfigKey::required("domain", "apex domain with an existing DNS zone"),
    ConfigKey::required("subdomain", "subdomain pointed at the CDN endpoint"),
    ConfigKey::required(
        "zoneResourceGroupName",
        "resource group holding the DNS zone",
    ),
];

/// `https://acct.z13.web.core.windows.net/` -> `acct.z13.web.core.windows.net`
fn endpoint_host(endpoint: String) -> String {
    endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

pub fn build(config: &ProgramConfig) -> Result<Stack> {
    let path = config.get_or("path", "./www");
    let index_document = config.get_or("indexDocument", "index.html");
    let error_document = config.get_or("errorDocument", "error.html");
    let domain = config.require("domain")?;
    let subdomain = config.require("subdomain")?;
    let zone_resource_group = config.require("zoneResourceGroupName")?;
    let domain_name = format!("{subdomain}.{domain}");

    let mut stack = Stack::new("static-website-azure");

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

    let profile = Profile::new(
        &mut stack,
        "profile",
        ProfileArgs {
            resource_group_name: resource_group.name.into(),
            sku_name: "Standard_Microsoft".to_string(),
        },
    )?;
    let origin_hostname = stack.apply(
        account.primary_web_endpoint,
        "origin-hostname",
        endpoint_host,
    )?;
    let endpoint = Endpoint::new(
        &mut stack,
        "endpoint",
        EndpointArgs {
            resource_group_name: resource_group.name.into(),
            profile_name: profile.name.into(),
            origin_host_header: origin_hostname.into(),
            origins: vec![EndpointOrigin {
                name: account.name.into(),
                host_name: origin_hostname.into(),
            }],
            is_http_allowed: false,
            is_https_allowed: true,
            is_compression_enabled: true,
            content_types_to_compress: [
                "text/html",
                "text/css",
                "application/javascript",
                "application/json",
            ]
            .map(String::from)
            .to_vec(),
        },
    )?;

    let dns_resource_group =
        ResourceGroup::lookup(&mut stack, "dns-resource-group", &zone_resource_group)?;
    let cname = RecordSet::new(
        &mut stack,
        "cname",
        RecordSetArgs {
            resource_group_name: dns_resource_group.name.into(),
            relative_record_set_name: subdomain,
            zone_name: domain,
            record_type: "CNAME".to_string(),
            target_resource_id: endpoint.id().into(),
        },
    )?;
    // DNS reports `www.example.com.`; the CDN wants the host without dots
    // at either end.
    let custom_domain_host = stack.apply(cname.fqdn, "custom-domain-host", |fqdn: String| {
        fqdn.trim_matches('.').to_string()
    })?;
    CustomDomain::new(
        &mut stack,
        "custom-domain",
        CustomDomainArgs {
            resource_group_name: resource_group.name.into(),
            profile_name: profile.name.into(),
            endpoint_name: endpoint.name.into(),
            host_name: custom_domain_host.into(),
        },
    )?;

    let origin_url = stack.concat(
        "originURL",
        vec!["https://".into(), origin_hostname.into()],
    )?;
    let cdn_url = stack.concat("cdnURL", vec!["https://".into(), endpoint.host_name.into()])?;
    stack.export("originURL", origin_url)?;
    stack.export("originHostname", origin_hostname)?;
    stack.export("cdnURL", cdn_url)?;
    stack.export("cdnHostname", endpoint.host_name)?;
    stack.export("domainURL", format!("https://{domain_name}"))?;
    Ok(stack)
}
