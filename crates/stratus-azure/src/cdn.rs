//! CDN profiles, endpoints and custom domains

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

use crate::resources::PROVIDER;

#[derive(Debug, Clone)]
pub struct ProfileArgs {
    pub resource_group_name: Input<String>,
    pub sku_name: String,
}

/// A CDN profile grouping endpoints
#[derive(Debug, Clone)]
pub struct Profile {
    resource: Resource,
    pub name: Output<String>,
}

impl Profile {
    pub fn new(stack: &mut Stack, name: &str, args: ProfileArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "cdn:Profile", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("sku", PropertyValue::map([("name", args.sku_name.into())]))
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
pub struct EndpointOrigin {
    pub name: Input<String>,
    pub host_name: Input<String>,
}

#[derive(Debug, Clone)]
pub struct EndpointArgs {
    pub resource_group_name: Input<String>,
    pub profile_name: Input<String>,
    pub origin_host_header: Input<String>,
    pub origins: Vec<EndpointOrigin>,
    pub is_http_allowed: bool,
    pub is_https_allowed: bool,
    pub is_compression_enabled: bool,
    pub content_types_to_compress: Vec<String>,
}

/// A CDN endpoint caching one origin
#[derive(Debug, Clone)]
pub struct Endpoint {
    resource: Resource,
    pub name: Output<String>,
    pub host_name: Output<String>,
}

impl Endpoint {
    pub fn new(stack: &mut Stack, name: &str, args: EndpointArgs) -> Result<Self> {
        let origins = args
            .origins
            .into_iter()
            .map(|origin| {
                Ok(PropertyValue::map([
                    ("name", origin.name.into_property()?),
                    ("hostName", origin.host_name.into_property()?),
                ]))
            })
            .collect::<Result<Vec<_>>>()?;
        let decl = ResourceDecl::new(PROVIDER, "cdn:Endpoint", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("profileName", args.profile_name.into_property()?)
            .input("originHostHeader", args.origin_host_header.into_property()?)
            .input("origins", PropertyValue::List(origins))
            .input("isHttpAllowed", args.is_http_allowed)
            .input("isHttpsAllowed", args.is_https_allowed)
            .input("isCompressionEnabled", args.is_compression_enabled)
            .input(
                "contentTypesToCompress",
                PropertyValue::list(args.content_types_to_compress.into_iter().map(Into::into)),
            )
            .outputs(["name", "hostName"]);
        let resource = stack.register(decl)?;
        Ok(Self {
            name: resource.output("name")?,
            host_name: resource.output("hostName")?,
            resource,
        })
    }

    /// The ARM identifier, used as a DNS record's target resource
    pub fn id(&self) -> Output<String> {
        self.resource.id()
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

#[derive(Debug, Clone)]
pub struct CustomDomainArgs {
    pub resource_group_name: Input<String>,
    pub profile_name: Input<String>,
    pub endpoint_name: Input<String>,
    pub host_name: Input<String>,
}

/// A custom domain attached to a CDN endpoint
#[derive(Debug, Clone)]
pub struct CustomDomain {
    resource: Resource,
}

impl CustomDomain {
    pub fn new(stack: &mut Stack, name: &str, args: CustomDomainArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "cdn:CustomDomain", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("profileName", args.profile_name.into_property()?)
            .input("endpointName", args.endpoint_name.into_property()?)
            .input("hostName", args.host_name.into_property()?);
        let resource = stack.register(decl)?;
        Ok(Self { resource })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}
