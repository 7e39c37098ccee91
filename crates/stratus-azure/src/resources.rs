//! Resource groups

use stratus_core::{Output, Resource, ResourceDecl, Result, Stack};

pub const PROVIDER: &str = "azure";

/// A resource group holding every other resource of a deployment
#[derive(Debug, Clone)]
pub struct ResourceGroup {
    resource: Resource,
    pub name: Output<String>,
}

impl ResourceGroup {
    pub fn new(stack: &mut Stack, name: &str) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "resources:ResourceGroup", name).output("name");
        let resource = stack.register(decl)?;
        Ok(Self {
            name: resource.output("name")?,
            resource,
        })
    }

    /// Reference an existing resource group by its remote name
    pub fn lookup(stack: &mut Stack, name: &str, resource_group_name: &str) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "resources:ResourceGroupLookup", name)
            .input("resourceGroupName", resource_group_name)
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
