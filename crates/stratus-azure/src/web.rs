//! App service plans and function apps

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

use crate::resources::PROVIDER;

#[derive(Debug, Clone)]
pub struct AppServicePlanArgs {
    pub resource_group_name: Input<String>,
    pub sku_name: String,
    pub sku_tier: String,
}

/// A consumption (or dedicated) app service plan
#[derive(Debug, Clone)]
pub struct AppServicePlan {
    resource: Resource,
}

impl AppServicePlan {
    pub fn new(stack: &mut Stack, name: &str, args: AppServicePlanArgs) -> Result<Self> {
        let decl = ResourceDecl::new(PROVIDER, "web:AppServicePlan", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input(
                "sku",
                PropertyValue::map([
                    ("name", args.sku_name.into()),
                    ("tier", args.sku_tier.into()),
                ]),
            );
        let resource = stack.register(decl)?;
        Ok(Self { resource })
    }

    /// The ARM identifier, deferred until created; used as `server_farm_id`
    pub fn id(&self) -> Output<String> {
        self.resource.id()
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}

/// One `app_settings` entry; the value may be a derived deferred string
#[derive(Debug, Clone)]
pub struct AppSetting {
    pub name: String,
    pub value: Input<String>,
}

impl AppSetting {
    pub fn new(name: impl Into<String>, value: impl Into<Input<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebAppArgs {
    pub resource_group_name: Input<String>,
    pub server_farm_id: Input<String>,
    pub kind: String,
    pub app_settings: Vec<AppSetting>,
}

/// A web app (serverless function app when `kind` is `FunctionApp`)
#[derive(Debug, Clone)]
pub struct WebApp {
    resource: Resource,
    pub default_host_name: Output<String>,
}

impl WebApp {
    pub fn new(stack: &mut Stack, name: &str, args: WebAppArgs) -> Result<Self> {
        let settings = args
            .app_settings
            .into_iter()
            .map(|setting| {
                Ok(PropertyValue::map([
                    ("name", setting.name.into()),
                    ("value", setting.value.into_property()?),
                ]))
            })
            .collect::<Result<Vec<_>>>()?;
        let decl = ResourceDecl::new(PROVIDER, "web:WebApp", name)
            .input("resourceGroupName", args.resource_group_name.into_property()?)
            .input("serverFarmId", args.server_farm_id.into_property()?)
            .input("kind", args.kind)
            .input(
                "siteConfig",
                PropertyValue::map([("appSettings", PropertyValue::List(settings))]),
            )
            .output("defaultHostName");
        let resource = stack.register(decl)?;
        Ok(Self {
            default_host_name: resource.output("defaultHostName")?,
            resource,
        })
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }
}
