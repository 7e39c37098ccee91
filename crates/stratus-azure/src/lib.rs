//! Azure resource declarations for Stratus
//!
//! Typed constructors for the resources the static-website and serverless
//! programs declare: resource groups, storage (accounts, containers, blobs,
//! static websites, SAS tokens, synced folders), app service plans and
//! function apps, CDN profiles/endpoints/custom domains, and DNS record
//! sets. Constructors register declarations on the stack and return typed
//! [`Output`](stratus_core::Output) handles.

pub mod cdn;
pub mod network;
pub mod resources;
pub mod storage;
pub mod synth;
pub mod web;

pub use synth::synthesize;

#[cfg(test)]
mod tests {
    use crate::resources::ResourceGroup;
    use crate::storage::{StorageAccount, StorageAccountArgs};
    use stratus_core::Stack;

    #[test]
    fn account_wires_resource_group_output_as_edge() {
        let mut stack = Stack::new("test");
        let group = ResourceGroup::new(&mut stack, "resource-group").unwrap();
        StorageAccount::new(
            &mut stack,
            "account",
            StorageAccountArgs {
                resource_group_name: group.name.into(),
                kind: "StorageV2".to_string(),
                sku_name: "Standard_LRS".to_string(),
            },
        )
        .unwrap();

        let edges = stack.graph().edges();
        assert!(edges.contains(&(
            "account.id".to_string(),
            "resource-group.name".to_string()
        )));
    }
}
