//! ACM certificates

use stratus_core::{Output, Resource, ResourceDecl, Result, Stack, Value};

use crate::s3::PROVIDER;

#[derive(Debug, Clone)]
pub struct CertificateArgs {
    pub domain_name: String,
    pub validation_method: String,
    /// CloudFront requires certificates in us-east-1
    pub region: Option<String>,
}

/// An ACM certificate awaiting DNS validation
#[derive(Debug, Clone)]
pub struct Certificate {
    resource: Resource,
    pub arn: Output<String>,
    /// Validation records to create, as reported by ACM. A JSON list; use
    /// `apply` to pick fields out of it once resolved.
    pub domain_validation_options: Output<Value>,
}

impl Certificate {
    pub fn new(stack: &mut Stack, name: &str, args: CertificateArgs) -> Result<Self> {
        let mut decl = ResourceDecl::new(PROVIDER, "acm:Certificate", name)
            .input("domainName", args.domain_name)
            .input("validationMethod", args.validation_method)
            .outputs(["arn", "domainValidationOptions"]);
        if let Some(region) = args.region {
            decl = decl.input("region", region);
        }
        let resource = stack.register(decl)?;
        Ok(Self {
            arn: resource.output("arn")?,
            domain_validation_options: resource.output("domainValidationOptions")?,
            resource,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}
