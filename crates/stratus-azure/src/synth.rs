//! Simulated outputs for Azure resource kinds

use serde_json::json;
use std::collections::BTreeMap;
use stratus_core::{physical_name, Value};
use stratus_engine::{deterministic_suffix, CreateRequest};

type SynthResult = std::result::Result<BTreeMap<String, Value>, String>;

/// Storage account names are lowercase alphanumeric, max 24 characters
fn storage_account_name(logical: &str) -> String {
    let stem: String = logical
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    let mut name = format!("{stem}{}", deterministic_suffix(logical));
    name.truncate(24);
    name
}

/// Fabricate outputs for one Azure resource
pub fn synthesize(request: &CreateRequest) -> SynthResult {
    match request.kind.as_str() {
        "resources:ResourceGroup" => Ok(BTreeMap::from([(
            "name".to_string(),
            json!(physical_name(&request.resource)),
        )])),
        "resources:ResourceGroupLookup" => {
            let name = request
                .input_str("resourceGroupName")
                .ok_or_else(|| "lookup requires 'resourceGroupName'".to_string())?;
            Ok(BTreeMap::from([("name".to_string(), json!(name))]))
        }
        "storage:StorageAccount" => {
            let account = storage_account_name(&request.resource);
            Ok(BTreeMap::from([
                ("name".to_string(), json!(account)),
                (
                    "primaryWebEndpoint".to_string(),
                    json!(format!("https://{account}.z13.web.core.windows.net/")),
                ),
            ]))
        }
        "storage:BlobContainer" | "storage:Blob" => Ok(BTreeMap::from([(
            "name".to_string(),
            json!(physical_name(&request.resource)),
        )])),
        "storage:StaticWebsite" => Ok(BTreeMap::from([(
            "containerName".to_string(),
            json!("$web"),
        )])),
        "storage:ServiceSas" => {
            let canonicalized = request
                .input_str("canonicalizedResource")
                .ok_or_else(|| "SAS requires 'canonicalizedResource'".to_string())?;
            Ok(BTreeMap::from([(
                "serviceSasToken".to_string(),
                json!(format!(
                    "sv=2022-11-02&sr=c&sp=r&sig={}",
                    deterministic_suffix(canonicalized)
                )),
            )]))
        }
        "storage:BlobFolder" | "cdn:CustomDomain" | "web:AppServicePlan" => Ok(BTreeMap::new()),
        "web:WebApp" => Ok(BTreeMap::from([(
            "defaultHostName".to_string(),
            json!(format!(
                "{}.azurewebsites.net",
                physical_name(&request.resource)
            )),
        )])),
        "cdn:Profile" => Ok(BTreeMap::from([(
            "name".to_string(),
            json!(physical_name(&request.resource)),
        )])),
        "cdn:Endpoint" => {
            let endpoint = physical_name(&request.resource);
            Ok(BTreeMap::from([
                ("name".to_string(), json!(endpoint)),
                (
                    "hostName".to_string(),
                    json!(format!("{endpoint}.azureedge.net")),
                ),
            ]))
        }
        "network:RecordSet" => {
            let relative = request
                .input_str("relativeRecordSetName")
                .ok_or_else(|| "record set requires 'relativeRecordSetName'".to_string())?;
            let zone = request
                .input_str("zoneName")
                .ok_or_else(|| "record set requires 'zoneName'".to_string())?;
            Ok(BTreeMap::from([(
                "fqdn".to_string(),
                json!(format!("{relative}.{zone}.")),
            )]))
        }
        other => Err(format!("unsupported Azure resource kind '{other}'")),
    }
}
