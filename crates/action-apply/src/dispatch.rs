use tracing::{debug, instrument, warn};

use wirebind_core_types::{ActionKind, BindError, Selector, TriggerEvent};

use crate::ports::{EventsPort, InsertPosition, MutatePort, PromptPort};

pub struct ApplyDeps<'a> {
    pub mutate: &'a dyn MutatePort,
    pub prompt: &'a dyn PromptPort,
    pub events: &'a dyn EventsPort,
}

/// Apply one action directive.
///
/// Target misses are non-fatal: the user is notified and the call returns
/// normally. The miss policy differs between directive groups:
/// `remove`/`hide` always notify on a miss, the insertion and replace
/// directives only when the target selector was non-empty.
#[instrument(skip_all, fields(action = %kind, target = %target))]
pub async fn apply(
    kind: ActionKind,
    target: &Selector,
    event: &TriggerEvent,
    payload: &str,
    deps: ApplyDeps<'_>,
) -> Result<(), BindError> {
    match kind {
        ActionKind::Remove => {
            if deps.mutate.query_count(target).await? > 0 {
                deps.mutate.remove(target).await?;
            } else {
                notify_miss(deps.prompt, target, kind).await;
            }
        }
        ActionKind::Hide => {
            if deps.mutate.query_count(target).await? > 0 {
                deps.mutate.hide(target).await?;
            } else {
                notify_miss(deps.prompt, target, kind).await;
            }
        }
        ActionKind::Prepend => {
            insert_and_scroll(&deps, target, kind, InsertPosition::Prepend, payload).await?;
        }
        ActionKind::Append => {
            insert_and_scroll(&deps, target, kind, InsertPosition::Append, payload).await?;
        }
        ActionKind::Before => {
            insert_and_scroll(&deps, target, kind, InsertPosition::Before, payload).await?;
        }
        ActionKind::After => {
            insert_and_scroll(&deps, target, kind, InsertPosition::After, payload).await?;
        }
        ActionKind::Replace => {
            if deps.mutate.query_count(target).await? > 0 {
                deps.mutate.replace_inner(target, payload).await?;
                deps.mutate.scroll_to(target).await?;
            } else {
                notify_insert_miss(deps.prompt, target, kind).await;
            }
        }
        ActionKind::Alert => {
            deps.prompt.notify(payload).await;
        }
        ActionKind::Proceed => {
            debug!("resuming default behavior");
            deps.events.resume_default(event).await;
        }
        ActionKind::None => {}
    }

    Ok(())
}

async fn insert_and_scroll(
    deps: &ApplyDeps<'_>,
    target: &Selector,
    kind: ActionKind,
    position: InsertPosition,
    payload: &str,
) -> Result<(), BindError> {
    if deps.mutate.query_count(target).await? > 0 {
        deps.mutate.insert(target, position, payload).await?;
        deps.mutate.scroll_to(target).await?;
    } else {
        notify_insert_miss(deps.prompt, target, kind).await;
    }
    Ok(())
}

async fn notify_miss(prompt: &dyn PromptPort, target: &Selector, kind: ActionKind) {
    warn!("target selector matched nothing");
    prompt
        .notify(&format!("wirebind: no such item ({target}) to {kind}."))
        .await;
}

async fn notify_insert_miss(prompt: &dyn PromptPort, target: &Selector, kind: ActionKind) {
    if target.is_empty() {
        return;
    }
    warn!("target selector matched nothing");
    prompt
        .notify(&format!(
            "wirebind: no item ({target}) to add to using {kind}."
        ))
        .await;
}
