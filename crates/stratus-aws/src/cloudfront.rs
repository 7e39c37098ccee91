//! CloudFront distributions

use stratus_core::{Input, Output, PropertyValue, Resource, ResourceDecl, Result, Stack};

use crate::s3::PROVIDER;

#[derive(Debug, Clone)]
pub struct DistributionOrigin {
    pub origin_id: Input<String>,
    pub domain_name: Input<String>,
    /// Website buckets only speak HTTP
    pub protocol_policy: String,
}

#[derive(Debug, Clone)]
pub struct CacheBehavior {
    pub target_origin_id: Input<String>,
    pub viewer_protocol_policy: String,
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub default_ttl: u32,
    pub min_ttl: u32,
    pub max_ttl: u32,
}

#[derive(Debug, Clone)]
pub struct CustomErrorResponse {
    pub error_code: u32,
    pub response_code: u32,
    pub response_page_path: String,
}

#[derive(Debug, Clone)]
pub struct ViewerCertificate {
    pub acm_certificate_arn: Input<String>,
    pub ssl_support_method: String,
}

#[derive(Debug, Clone)]
pub struct DistributionArgs {
    pub enabled: bool,
    pub origins: Vec<DistributionOrigin>,
    pub default_cache_behavior: CacheBehavior,
    pub price_class: String,
    pub custom_error_responses: Vec<CustomErrorResponse>,
    pub aliases: Vec<String>,
    pub viewer_certificate: Option<ViewerCertificate>,
}

/// A CloudFront CDN distribution
#[derive(Debug, Clone)]
pub struct Distribution {
    resource: Resource,
    pub domain_name: Output<String>,
    pub hosted_zone_id: Output<String>,
}

impl Distribution {
    pub fn new(stack: &mut Stack, name: &str, args: DistributionArgs) -> Result<Self> {
        let origins = args
            .origins
            .into_iter()
            .map(|origin| {
                Ok(PropertyValue::map([
                    ("originId", origin.origin_id.into_property()?),
                    ("domainName", origin.domain_name.into_property()?),
                    (
                        "customOriginConfig",
                        PropertyValue::map([
                            ("originProtocolPolicy", origin.protocol_policy.into()),
                            ("httpPort", 80u32.into()),
                            ("httpsPort", 443u32.into()),
                            (
                                "originSslProtocols",
                                PropertyValue::list(["TLSv1.2".into()]),
                            ),
                        ]),
                    ),
                ]))
            })
            .collect::<Result<Vec<_>>>()?;

        let behavior = args.default_cache_behavior;
        let default_cache_behavior = PropertyValue::map([
            ("targetOriginId", behavior.target_origin_id.into_property()?),
            (
                "viewerProtocolPolicy",
                behavior.viewer_protocol_policy.into(),
            ),
            (
                "allowedMethods",
                PropertyValue::list(behavior.allowed_methods.into_iter().map(Into::into)),
            ),
            (
                "cachedMethods",
                PropertyValue::list(behavior.cached_methods.into_iter().map(Into::into)),
            ),
            ("defaultTtl", behavior.default_ttl.into()),
            ("minTtl", behavior.min_ttl.into()),
            ("maxTtl", behavior.max_ttl.into()),
            (
                "forwardedValues",
                PropertyValue::map([
                    ("queryString", true.into()),
                    ("cookies", PropertyValue::map([("forward", "all".into())])),
                ]),
            ),
        ]);

        let custom_error_responses = args
            .custom_error_responses
            .into_iter()
            .map(|response| {
                PropertyValue::map([
                    ("errorCode", response.error_code.into()),
                    ("responseCode", response.response_code.into()),
                    ("responsePagePath", response.response_page_path.into()),
                ])
            })
            .collect::<Vec<_>>();

        let mut decl = ResourceDecl::new(PROVIDER, "cloudfront:Distribution", name)
            .input("enabled", args.enabled)
            .input("origins", PropertyValue::List(origins))
            .input("defaultCacheBehavior", default_cache_behavior)
            .input("priceClass", args.price_class)
            .input(
                "customErrorResponses",
                PropertyValue::List(custom_error_responses),
            )
            .input(
                "restrictions",
                PropertyValue::map([(
                    "geoRestriction",
                    PropertyValue::map([("restrictionType", "none".into())]),
                )]),
            )
            .input(
                "aliases",
                PropertyValue::list(args.aliases.into_iter().map(Into::into)),
            )
            .outputs(["domainName", "hostedZoneId"]);
        if let Some(cert) = args.viewer_certificate {
            decl = decl.input(
                "viewerCertificate",
                PropertyValue::map([
                    ("cloudfrontDefaultCertificate", false.into()),
                    (
                        "acmCertificateArn",
                        cert.acm_certificate_arn.into_property()?,
                    ),
                    ("sslSupportMethod", cert.ssl_support_method.into()),
                ]),
            );
        }
        let resource = stack.register(decl)?;
        Ok(Self {
            domain_name: resource.output("domainName")?,
            hosted_zone_id: resource.output("hostedZoneId")?,
            resource,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}
