//! DNS record sets

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

use crate::resources::PROVIDER;

#[derive(Debug, Clone)]
pub struct RecordSetArgs {
    pub resource_group_name: Input<String>,
    pub relative_record_set_name: String,
    pub zone_name: String,
    pub record_type: String,
    /// ARM id of the aliased resource (e.g. a CDN endpoint)
    pub target_resource_id: Input<String>,
}

/// A record set in an Azure DNS zone
#[derive(Debug, Clone)]
pub struct RecordSet {
    resource: Resource,
    /// Fully qualified name, with the trailing dot DNS zones report
    pub fqdn: Output<String>,
}

impl RecordSet {
    pub fn new(stack: &mut Stack, name: &str, args: RecordSetArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "network:RecordSet", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("relativeRecordSetName", args.relative_record_set_name)
            .input("zoneName", args.zone_name)
            .input("recordType", args.record_type)
            .input(
                "targetResource",
                PropertyValue::map([("id", args.target_resource_id.into_property()?)]),
            )
            .output("fqdn");
        let resource = stack.register(decl)?;
        Ok(Self {
            fqdn: resource.output("fqdn")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}
