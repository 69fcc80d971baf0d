//! Context injection for parsed file link parameters

use crate::entities::{ContextualizedItem, FileLinkParams, RequestContext};

/// Apply server-controlled context to one parsed item.
///
/// Creator and container always come from `context`. Values the client put into
/// the element are dropped, never merged.
pub fn inject_context(params: FileLinkParams, context: &RequestContext) -> ContextualizedItem {
    if params.creator.as_ref().is_some_and(|c| *c != context.actor) {
        tracing::warn!(
            actor = %context.actor,
            "Ignoring client-supplied creator on file link element"
        );
    }
    if params.container.is_some_and(|c| c != context.container) {
        tracing::warn!(
            container = %context.container,
            "Ignoring client-supplied container on file link element"
        );
    }

    ContextualizedItem {
        storage_id: params.storage_id,
        origin: params.origin,
        creator: context.actor.clone(),
        container: context.container,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OriginData;
    use crate::identity::{ActorId, ContainerRef};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn context() -> RequestContext {
        RequestContext::new(
            ActorId::new("alice"),
            ContainerRef::work_package(Uuid::now_v7()),
        )
    }

    #[test]
    fn test_inject_sets_context_when_absent() {
        let ctx = context();
        let storage_id = Uuid::now_v7();
        let item = inject_context(
            FileLinkParams {
                storage_id: Some(storage_id),
                origin: OriginData {
                    id: "1".to_string(),
                    name: "a.txt".to_string(),
                    ..OriginData::default()
                },
                creator: None,
                container: None,
            },
            &ctx,
        );

        assert_eq!(item.creator, ctx.actor);
        assert_eq!(item.container, ctx.container);
        assert_eq!(item.storage_id, Some(storage_id));
        assert_eq!(item.origin.name, "a.txt");
    }

    proptest! {
        #[test]
        fn prop_client_context_is_overwritten(
            client_user in "[a-z]{1,12}",
            client_wp in any::<u128>(),
        ) {
            let ctx = context();
            let item = inject_context(
                FileLinkParams {
                    creator: Some(ActorId::new(client_user)),
                    container: Some(ContainerRef::work_package(Uuid::from_u128(client_wp))),
                    ..FileLinkParams::default()
                },
                &ctx,
            );

            prop_assert_eq!(item.creator, ctx.actor);
            prop_assert_eq!(item.container, ctx.container);
        }
    }
}
