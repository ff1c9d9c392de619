//! Tag resolution for post creation.

use inkwell_shared::dto::TagReference;
use validator::Validate;

use crate::domain::Tag;
use crate::error::DomainError;
use crate::ports::UnitOfWork;

/// Turn tag references into stored tags, in input order.
///
/// References without an id create a new tag; references with an id reuse the
/// existing tag. Nothing is deduplicated, so two references naming the same new
/// tag both try to insert it and the storage uniqueness constraint decides.
pub async fn resolve_tags(
    uow: &dyn UnitOfWork,
    references: &[TagReference],
) -> Result<Vec<Tag>, DomainError> {
    let mut tags = Vec::with_capacity(references.len());

    for (index, reference) in references.iter().enumerate() {
        if let Err(errors) = reference.validate() {
            tracing::warn!(index, "Invalid tag reference: {}", errors);
            return Err(DomainError::Validation(format!("tags[{index}]: {errors}")));
        }

        let tag = match reference.existing_id() {
            None => uow
                .tags()
                .insert(Tag::new(&reference.name))
                .await
                .inspect_err(|e| tracing::warn!(index, "Failed to create tag: {}", e))?,
            Some(id) => uow.tags().find_by_id(id).await?.ok_or_else(|| {
                tracing::warn!(tag_id = id, "Referenced tag does not exist");
                DomainError::Storage(format!("tag {id} does not exist"))
            })?,
        };

        tags.push(tag);
    }

    Ok(tags)
}
