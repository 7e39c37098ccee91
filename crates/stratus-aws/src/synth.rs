//! Simulated outputs for AWS resource kinds
//!
//! Used by the simulated engine during previews and tests. Values follow
//! the real services' naming shapes so derived URLs look right.

use serde_json::json;
use std::collections::BTreeMap;
use stratus_core::{physical_name, Value};
use stratus_engine::{deterministic_suffix, CreateRequest};

type SynthResult = std::result::Result<BTreeMap<String, Value>, String>;

/// Fabricate outputs for one AWS resource
pub fn synthesize(request: &CreateRequest) -> SynthResult {
    match request.kind.as_str() {
        "s3:Bucket" => {
            let bucket = physical_name(&request.resource);
            Ok(BTreeMap::from([
                ("bucket".to_string(), json!(bucket)),
                ("arn".to_string(), json!(format!("arn:aws:s3:::{bucket}"))),
                (
                    "websiteEndpoint".to_string(),
                    json!(format!("{bucket}.s3-website-us-east-1.amazonaws.com")),
                ),
            ]))
        }
        "s3:BucketFolder" => Ok(BTreeMap::new()),
        "route53:ZoneLookup" => {
            let domain = request
                .input_str("name")
                .ok_or_else(|| "zone lookup requires 'name'".to_string())?;
            Ok(BTreeMap::from([
                (
                    "zoneId".to_string(),
                    json!(format!("Z{}", deterministic_suffix(domain).to_uppercase())),
                ),
                ("name".to_string(), json!(domain)),
            ]))
        }
        "acm:Certificate" => {
            let domain = request
                .input_str("domainName")
                .ok_or_else(|| "certificate requires 'domainName'".to_string())?;
            let digest = deterministic_suffix(domain);
            Ok(BTreeMap::from([
                (
                    "arn".to_string(),
                    json!(format!(
                        "arn:aws:acm:us-east-1:000000000000:certificate/{digest}"
                    )),
                ),
                (
                    "domainValidationOptions".to_string(),
                    json!([{
                        "resourceRecordName": format!("_{digest}.{domain}."),
                        "resourceRecordType": "CNAME",
                        "resourceRecordValue": format!("_{digest}.acm-validations.aws."),
                    }]),
                ),
            ]))
        }
        "route53:Record" => {
            let name = request
                .input_str("name")
                .ok_or_else(|| "record requires 'name'".to_string())?;
            Ok(BTreeMap::from([(
                "fqdn".to_string(),
                json!(name.trim_end_matches('.')),
            )]))
        }
        "cloudfront:Distribution" => Ok(BTreeMap::from([
            (
                "domainName".to_string(),
                json!(format!(
                    "d{}.cloudfront.net",
                    deterministic_suffix(&request.resource)
                )),
            ),
            // All CloudFront distributions live in this fixed zone.
            ("hostedZoneId".to_string(), json!("Z2FDTNDATAQYW2")),
        ])),
        other => Err(format!("unsupported AWS resource kind '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: &str, inputs: Value) -> CreateRequest {
        CreateRequest {
            resource: "bucket".to_string(),
            provider: "aws".to_string(),
            kind: kind.to_string(),
            inputs: inputs.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn bucket_outputs_look_like_s3() {
        let outputs = synthesize(&request("s3:Bucket", json!({}))).unwrap();
        let endpoint = outputs["websiteEndpoint"].as_str().unwrap();
        assert!(endpoint.starts_with("bucket-"));
        assert!(endpoint.ends_with(".s3-website-us-east-1.amazonaws.com"));
        assert_eq!(
            outputs["arn"].as_str().unwrap(),
            format!("arn:aws:s3:::{}", outputs["bucket"].as_str().unwrap())
        );
    }

    #[test]
    fn certificate_reports_validation_records() {
        let outputs = synthesize(&request(
            "acm:Certificate",
            json!({"domainName": "www.example.com"}),
        ))
        .unwrap();
        let options = outputs["domainValidationOptions"].as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["resourceRecordType"], json!("CNAME"));
        assert!(options[0]["resourceRecordName"]
            .as_str()
            .unwrap()
            .ends_with(".www.example.com."));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let a = synthesize(&request("s3:Bucket", json!({}))).unwrap();
        let b = synthesize(&request("s3:Bucket", json!({}))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(synthesize(&request("ec2:Instance", json!({}))).is_err());
    }
}
