//! Resource Name Example
//!
//! A custom resource that derives a unique, stable name from a prefix.
//!
//! ```yaml
//! QueueName:
//!   Type: Custom::ResourceName
//!   Properties:
//!     ServiceToken: !GetAtt ResourceNameFunction.Arn
//!     Prefix: orders
//!     MaxLength: 32
//!     LogLevel: info
//! ```
//!
//! `!GetAtt QueueName.Name` then resolves to something like
//! `orders-5f1e7a9c0c53`.

use cfn_custom_resource::{
    CustomResource, HandlerError, HandlerResult, HandlerSet, SharedLogger,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NameProperties {
    #[serde(rename = "Prefix")]
    prefix: String,
    #[serde(rename = "MaxLength", default = "default_max_length")]
    max_length: usize,
}

fn default_max_length() -> usize {
    63
}

fn generate_name(props: &NameProperties, request_id: &str) -> Result<String, HandlerError> {
    let suffix: String = request_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(12)
        .collect();
    let name = format!("{}-{}", props.prefix, suffix.to_lowercase());
    if name.len() > props.max_length {
        return Err(HandlerError::new(format!(
            "generated name {} exceeds MaxLength {}",
            name, props.max_length
        )));
    }
    Ok(name)
}

fn handlers() -> HandlerSet {
    HandlerSet::new()
        .on_create(|request, _ctx, logger| async move {
            let props: NameProperties = request.properties()?;
            let name = generate_name(&props, &request.common.request_id)?;
            logger.info(&format!("generated {}", name));
            Ok(HandlerResult::new(name.clone()).with_value("Name", name))
        })
        .on_update(|request, _ctx, logger| async move {
            let new: NameProperties = request.properties()?;
            let old: NameProperties = request.old_properties()?;
            if new.prefix == old.prefix {
                let name = request.physical_resource_id.clone();
                return Ok(HandlerResult::new(name.clone()).with_value("Name", name));
            }

            // A new physical id makes CloudFormation delete the old name afterwards.
            let name = generate_name(&new, &request.common.request_id)?;
            logger.info(&format!("prefix changed, replacing with {}", name));
            Ok(HandlerResult::new(name.clone()).with_value("Name", name))
        })
        .on_delete(|request, _ctx, logger| async move {
            logger.info(&format!("releasing {}", request.physical_resource_id));
            Ok(())
        })
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cfn_custom_resource::init_default_subscriber();

    let resource = CustomResource::new(|logger: SharedLogger| async move {
        logger.debug("building resource name handlers");
        Ok::<_, HandlerError>(handlers())
    })
    .with_config(cfn_custom_resource::CustomResourceConfig::from_env());

    cfn_custom_resource::run(resource).await
}
