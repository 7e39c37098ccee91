//! S3 buckets and synced folders

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

pub const PROVIDER: &str = "aws";

/// Website configuration of a bucket
#[derive(Debug, Clone)]
pub struct BucketWebsite {
    pub index_document: String,
    pub error_document: String,
}

#[derive(Debug, Clone, Default)]
pub struct BucketArgs {
    pub acl: Option<String>,
    pub website: Option<BucketWebsite>,
}

/// An S3 bucket, optionally configured as a website
#[derive(Debug, Clone)]
pub struct Bucket {
    resource: Resource,
    pub bucket: Output<String>,
    pub arn: Output<String>,
    pub website_endpoint: Output<String>,
}

impl Bucket {
    pub fn new(stack: &mut Stack, name: &str, args: BucketArgs) -> Result<Self> {
        let mut decl = ResourceDecl::new(PROVIDER, "s3:Bucket", name).outputs([
            "bucket",
            "arn",
            "websiteEndpoint",
        ]);
        if let Some(acl) = args.acl {
            decl = decl.input("acl", acl);
        }
        if let Some(website) = args.website {
            decl = decl.input(
                "website",
                PropertyValue::map([
                    ("indexDocument", website.index_document.into()),
                    ("errorDocument", website.error_document.into()),
                ]),
            );
        }
        let resource = stack.register(decl)?;
        Ok(Self {
            bucket: resource.output("bucket")?,
            arn: resource.output("arn")?,
            website_endpoint: resource.output("websiteEndpoint")?,
            resource,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct BucketFolderArgs {
    /// Local directory whose files are synced into the bucket
    pub path: String,
    pub bucket_name: Input<String>,
    pub acl: Option<String>,
}

/// Synced folder keeping a bucket's objects in step with a local directory
#[derive(Debug, Clone)]
pub struct BucketFolder {
    resource: Resource,
}

impl BucketFolder {
    pub fn new(stack: &mut Stack, name: &str, args: BucketFolderArgs) -> Result<Self> {
        let mut decl = ResourceDecl::new(PROVIDER, "s3:BucketFolder", name)
            .input("path", args.path)
            .input("bucketName", args.bucket_name.into_property()?);
        if let Some(acl) = args.acl {
            decl = decl.input("acl", acl);
        }
        let resource = stack.register(decl)?;
        Ok(Self { resource })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}
