//! Static website on AWS
//!
//! S3 website bucket synced from a local folder, served through CloudFront
//! under a custom domain. The ACM certificate is DNS-validated: the record
//! name, type and value are picked out of the certificate's deferred
//! `domainValidationOptions` with `apply`, so the validation record only
//! materializes once ACM has reported them.

use stratus_aws::acm::{Certificate, CertificateArgs};
use stratus_aws::cloudfront::{
    CacheBehavior, CustomErrorResponse, Distribution, DistributionArgs, DistributionOrigin,
    ViewerCertificate,
};
use stratus_aws::route53::{Record, RecordAlias, RecordArgs, Zone};
use stratus_aws::s3::{Bucket, BucketArgs, BucketFolder, BucketFolderArgs, BucketWebsite};
use stratus_core::{ConfigKey, ProgramConfig, Result, Stack, Value};

pub const CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey::optional("path", "./www", "local folder synced into the bucket"),
    ConfigKey::optional("indexDocument", "index.html", "site index document"),
    ConfigKey::optional("errorDocument", "error.html", "site error document"),
    ConfigKey::required("domain", "apex domain with an existing hosted zone"),
    ConfigKey::required("subdomain", "subdomain pointed at the CDN"),
];

fn option_field(options: &Value, field: &str) -> String {
    options[0][field].as_str().unwrap_or_default().to_string()
}

pub fn build(config: &ProgramConfig) -> Result<Stack> {
    let path = config.get_or("path", "./www");
    let index_document = config.get_or("indexDocument", "index.html");
    let error_document = config.get_or("errorDocument", "error.html");
    let domain = config.require("domain")?;
    let subdomain = config.require("subdomain")?;
    let domain_name = format!("{subdomain}.{domain}");

    let mut stack = Stack::new("static-website-aws");

    let bucket = Bucket::new(
        &mut stack,
        "bucket",
        BucketArgs {
            acl: Some("public-read".to_string()),
            website: Some(BucketWebsite {
                index_document,
                error_document: error_document.clone(),
            }),
        },
    )?;
    BucketFolder::new(
        &mut stack,
        "bucket-folder",
        BucketFolderArgs {
            path,
            bucket_name: bucket.bucket.into(),
            acl: Some("public-read".to_string()),
        },
    )?;

    let zone = Zone::lookup(&mut stack, "zone", &domain)?;
    let certificate = Certificate::new(
        &mut stack,
        "certificate",
        CertificateArgs {
            domain_name: domain_name.clone(),
            validation_method: "DNS".to_string(),
            // CloudFront only accepts certificates issued in us-east-1.
            region: Some("us-east-1".to_string()),
        },
    )?;

    // Three reads of the same deferred options list; each resolves
    // independently once ACM reports the validation records.
    let options = certificate.domain_validation_options;
    let validation_name = stack.apply(options, "certificate-validation-name", |o: Value| {
        option_field(&o, "resourceRecordName")
    })?;
    let validation_type = stack.apply(options, "certificate-validation-type", |o: Value| {
        option_field(&o, "resourceRecordType")
    })?;
    let validation_value = stack.apply(options, "certificate-validation-value", |o: Value| {
        option_field(&o, "resourceRecordValue")
    })?;
    Record::new(
        &mut stack,
        "certificate-validation",
        RecordArgs {
            zone_id: zone.zone_id.into(),
            name: validation_name.into(),
            record_type: validation_type.into(),
            records: vec![validation_value.into()],
            ttl: Some(60),
            ..RecordArgs::default()
        },
    )?;

    let cdn = Distribution::new(
        &mut stack,
        "cdn",
        DistributionArgs {
            enabled: true,
            origins: vec![DistributionOrigin {
                origin_id: bucket.arn.into(),
                domain_name: bucket.website_endpoint.into(),
                protocol_policy: "http-only".to_string(),
            }],
            default_cache_behavior: CacheBehavior {
                target_origin_id: bucket.arn.into(),
                viewer_protocol_policy: "redirect-to-https".to_string(),
                allowed_methods: ["GET", "HEAD", "OPTIONS"].map(String::from).to_vec(),
                cached_methods: ["GET", "HEAD", "OPTIONS"].map(String::from).to_vec(),
                default_ttl: 600,
                min_ttl: 600,
                max_ttl: 600,
            },
            price_class: "PriceClass_100".to_string(),
            custom_error_responses: vec![CustomErrorResponse {
                error_code: 404,
                response_code: 404,
                response_page_path: format!("/{error_document}"),
            }],
            aliases: vec![domain_name.clone()],
            viewer_certificate: Some(ViewerCertificate {
                acm_certificate_arn: certificate.arn.into(),
                ssl_support_method: "sni-only".to_string(),
            }),
        },
    )?;

    Record::new(
        &mut stack,
        "domain-alias",
        RecordArgs {
            zone_id: zone.zone_id.into(),
            name: subdomain.into(),
            record_type: "A".into(),
            aliases: vec![RecordAlias {
                name: cdn.domain_name.into(),
                zone_id: cdn.hosted_zone_id.into(),
                evaluate_target_health: true,
            }],
            // DNS should not flip before the certificate exists.
            depends_on: vec!["certificate".to_string()],
            ..RecordArgs::default()
        },
    )?;

    let origin_url = stack.concat(
        "originURL",
        vec!["http://".into(), bucket.website_endpoint.into()],
    )?;
    let cdn_url = stack.concat("cdnURL", vec!["https://".into(), cdn.domain_name.into()])?;
    stack.export("originURL", origin_url)?;
    stack.export("originHostname", bucket.website_endpoint)?;
    stack.export("cdnURL", cdn_url)?;
    stack.export("cdnHostname", cdn.domain_name)?;
    stack.export("domainURL", format!("https://{domain_name}"))?;
    Ok(stack)
}
