//! Storage accounts, containers, blobs and static websites

use stratus_core::{Input, Output, Resource, ResourceDecl, Result, Stack};

use crate::resources::PROVIDER;

#[derive(Debug, Clone)]
pub struct StorageAccountArgs {
    pub resource_group_name: Input<String>,
    pub kind: String,
    pub sku_name: String,
}

/// A blob storage account
#[derive(Debug, Clone)]
pub struct StorageAccount {
    resource: Resource,
    pub name: Output<String>,
    /// Primary static-website endpoint, e.g. `https://<acct>.z13.web.core.windows.net/`
    pub primary_web_endpoint: Output<String>,
}

impl StorageAccount {
    pub fn new(stack: &mut Stack, name: &str, args: StorageAccountArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:StorageAccount", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("kind", args.kind)
            .input("skuName", args.sku_name)
            .outputs(["name", "primaryWebEndpoint"]);
        let resource = stack.register(decl)?;
        Ok(Self {
            name: resource.output("name")?,
            primary_web_endpoint: resource.output("primaryWebEndpoint")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct BlobContainerArgs {
    pub account_name: Input<String>,
    pub resource_group_name: Input<String>,
    pub public_access: String,
}

/// A blob container
#[derive(Debug, Clone)]
pub struct BlobContainer {
    resource: Resource,
    pub name: Output<String>,
}

impl BlobContainer {
    pub fn new(stack: &mut Stack, name: &str, args: BlobContainerArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:BlobContainer", name)
            .input("accountName", args.account_name.into_property()?)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("publicAccess", args.public_access)
            .output("name");
        let resource = stack.register(decl)?;
        Ok(Self {
            name: resource.output("name")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct StaticWebsiteArgs {
    pub account_name: Input<String>,
    pub resource_group_name: Input<String>,
    pub index_document: String,
    pub error404_document: String,
}

/// Static-website configuration of a storage account
#[derive(Debug, Clone)]
pub struct StaticWebsite {
    resource: Resource,
    /// The well-known `$web` container backing the site
    pub container_name: Output<String>,
}

impl StaticWebsite {
    pub fn new(stack: &mut Stack, name: &str, args: StaticWebsiteArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:StaticWebsite", name)
            .input("accountName", args.account_name.into_property()?)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("indexDocument", args.index_document)
            .input("error404Document", args.error404_document)
            .output("containerName");
        let resource = stack.register(decl)?;
        Ok(Self {
            container_name: resource.output("containerName")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct BlobArgs {
    pub account_name: Input<String>,
    pub resource_group_name: Input<String>,
    pub container_name: Input<String>,
    /// Local archive uploaded as the blob's content
    pub source: String,
}

/// A single blob (e.g. a zipped function-app package)
#[derive(Debug, Clone)]
pub struct Blob {
    resource: Resource,
    pub name: Output<String>,
}

impl Blob {
    pub fn new(stack: &mut Stack, name: &str, args: BlobArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:Blob", name)
            .input("accountName", args.account_name.into_property()?)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("containerName", args.container_name.into_property()?)
            .input("source", args.source)
            .output("name");
        let resource = stack.register(decl)?;
        Ok(Self {
            name: resource.output("name")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSasArgs {
    pub account_name: Input<String>,
    pub resource_group_name: Input<String>,
    /// `/blob/{account}/{container}`, usually a derived value
    pub canonicalized_resource: Input<String>,
    pub resource: String,
    pub permissions: String,
    pub protocols: String,
    pub shared_access_start_time: String,
    pub shared_access_expiry_time: String,
    pub content_type: String,
    pub cache_control: String,
    pub content_disposition: String,
    pub content_encoding: String,
}

/// A service SAS token scoped to one container
#[derive(Debug, Clone)]
pub struct ServiceSas {
    resource: Resource,
    pub token: Output<String>,
}

impl ServiceSas {
    pub fn new(stack: &mut Stack, name: &str, args: ServiceSasArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:ServiceSas", name)
            .input("accountName", args.account_name.into_property()?)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input(
                "canonicalizedResource",
                args.canonicalized_resource.into_property()?,
            )
            .input("resource", args.resource)
            .input("permissions", args.permissions)
            .input("protocols", args.protocols)
            .input("sharedAccessStartTime", args.shared_access_start_time)
            .input("sharedAccessExpiryTime", args.shared_access_expiry_time)
            .input("contentType", args.content_type)
            .input("cacheControl", args.cache_control)
            .input("contentDisposition", args.content_disposition)
            .input("contentEncoding", args.content_encoding)
            .output("serviceSasToken");
        let resource = stack.register(decl)?;
        Ok(Self {
            token: resource.output("serviceSasToken")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct BlobFolderArgs {
    /// Local directory whose files are synced into the container
    pub path: String,
    pub resource_group_name: Input<String>,
    pub storage_account_name: Input<String>,
    pub container_name: Input<String>,
}

/// Synced folder keeping a container in step with a local directory
#[derive(Debug, Clone)]
pub struct BlobFolder {
    resource: Resource,
}

impl BlobFolder {
    pub fn new(stack: &mut Stack, name: &str, args: BlobFolderArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "storage:BlobFolder", name)
            .input("path", args.path)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input(
                "storageAccountName",
                args.storage_account_name.into_property()?,
            )
            .input("containerName", args.container_name.into_property()?);
        let resource = stack.register(decl)?;
        Ok(Self { resource })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}
