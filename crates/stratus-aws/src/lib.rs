//! AWS resource declarations for Stratus
//!
//! Typed constructors for the AWS resources the static-website programs
//! declare: S3 website buckets and synced folders, Route 53 zones and
//! records, ACM certificates, and CloudFront distributions. Each
//! constructor registers a declaration on the stack and hands back typed
//! [`Output`](stratus_core::Output) handles for the attributes that only
//! exist after provisioning.

pub mod acm;
pub mod cloudfront;
pub mod route53;
pub mod s3;
pub mod synth;

pub use synth::synthesize;

#[cfg(test)]
mod tests {
    use crate::s3::{Bucket, BucketArgs, BucketWebsite};
    use stratus_core::Stack;

    #[test]
    fn bucket_registers_inputs_and_outputs() {
        let mut stack = Stack::new("test");
        let bucket = Bucket::new(
            &mut stack,
            "bucket",
            BucketArgs {
                acl: Some("public-read".to_string()),
                website: Some(BucketWebsite {
                    index_document: "index.html".to_string(),
                    error_document: "error.html".to_string(),
                }),
            },
        )
        .unwrap();

        let entry = stack.resource("bucket").unwrap();
        assert_eq!(entry.kind, "s3:Bucket");
        assert!(entry.inputs.contains_key("website"));
        // Outputs stay deferred until an engine resolves them.
        assert!(stack.graph().value(bucket.website_endpoint.id()).is_err());
    }
}
