//! Route 53 hosted zones and records

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

use crate::s3::PROVIDER;

/// An existing hosted zone, looked up by domain name
#[derive(Debug, Clone)]
pub struct Zone {
    resource: Resource,
    pub zone_id: Output<String>,
    pub name: Output<String>,
}

impl Zone {
    /// Look up an existing hosted zone; the zone id is only known once the
    /// engine has queried it, so it is deferred like any other output.
    pub fn lookup(stack: &mut Stack, name: &str, domain: &str) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "route53:ZoneLookup", name)
            .input("name", domain)
            .outputs(["zoneId", "name"]);
        let resource = stack.register(decl)?;
        Ok(Self {
            zone_id: resource.output("zoneId")?,
            name: resource.output("name")?,
            resource,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}

/// Alias target of an A record (e.g. a CloudFront distribution)
#[derive(Debug, Clone)]
pub struct RecordAlias {
    pub name: Input<String>,
    pub zone_id: Input<String>,
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone)]
pub struct RecordArgs {
    pub zone_id: Input<String>,
    pub name: Input<String>,
    pub record_type: Input<String>,
    pub records: Vec<Input<String>>,
    pub ttl: Option<u32>,
    pub aliases: Vec<RecordAlias>,
    /// Resources that must exist before this record is created
    pub depends_on: Vec<String>,
}

impl Default for RecordArgs {
    fn default() -> Self {
        Self {
            zone_id: Input::Value(String::new()),
            name: Input::Value(String::new()),
            record_type: "A".into(),
            records: Vec::new(),
            ttl: None,
            aliases: Vec::new(),
            depends_on: Vec::new(),
        }
    }
}

/// A DNS record in a hosted zone
#[derive(Debug, Clone)]
pub struct Record {
    resource: Resource,
    pub fqdn: Output<String>,
}

impl Record {
    pub fn new(stack: &mut Stack, name: &str, args: RecordArgs) -> Result<Self> {
        let mut decl = ResourceDecl::new(PROVIDER, "route53:Record", name)
            .input("zoneId", args.zone_id.into_property()?)
            .input("name", args.name.into_property()?)
            .input("type", args.record_type.into_property()?)
            .output("fqdn");
        if !args.records.is_empty() {
            let records = args
                .records
                .into_iter()
                .map(Input::into_property)
                .collect::<Result<Vec<_>>>()?;
            decl = decl.input("records", PropertyValue::List(records));
        }
        if let Some(ttl) = args.ttl {
            decl = decl.input("ttl", ttl);
        }
        if !args.aliases.is_empty() {
            let aliases = args
                .aliases
                .into_iter()
                .map(|alias| {
                    Ok(PropertyValue::map([
                        ("name", alias.name.into_property()?),
                        ("zoneId", alias.zone_id.into_property()?),
                        (
                            "evaluateTargetHealth",
                            alias.evaluate_target_health.into(),
                        ),
                    ]))
                })
                .collect::<Result<Vec<_>>>()?;
            decl = decl.input("aliases", PropertyValue::List(aliases));
        }
        for target in args.depends_on {
            decl = decl.depends_on(target);
        }
        let resource = stack.register(decl)?;
        Ok(Self {
            fqdn: resource.output("fqdn")?,
            resource,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}
