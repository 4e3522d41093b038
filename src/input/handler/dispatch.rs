//! Serialized chain runs.
//!
//! At most one run of the root chain is in flight. Events arriving meanwhile
//! are queued in arrival order, except `MOVE`, which is dropped.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{error, trace, warn};

use super::HandlerInner;
use crate::input::event::InteractionEvent;
use crate::input::interaction::{Interaction, InteractionError};
use crate::input::types::EventType;
use crate::util::lock;

pub(super) fn start_chain(inner: &Arc<HandlerInner>, event: InteractionEvent) {
    {
        let mut dispatch = lock(&inner.dispatch);
        if dispatch.running {
            if event.kind == EventType::MOVE {
                trace!("Chain busy, dropping move at {}", event.window_position);
            } else {
                dispatch.queue.push_back(event);
            }
            return;
        }
        dispatch.running = true;
    }

    let runner = Arc::clone(inner);
    inner.runtime.spawn(async move {
        runner.run(event).await;
    });
}

impl HandlerInner {
    /// Pipes `event`, then every queued event, clearing `running` only once
    /// the queue is drained.
    async fn run(self: Arc<Self>, first: InteractionEvent) {
        let mut next = Some(first);
        while let Some(mut event) = next {
            if let Err(err) = self.pipe_guarded(&mut event).await {
                warn!("Interaction chain rejected {} event: {err}", event.kind);
            }
            let ended = std::panic::catch_unwind(AssertUnwindSafe(|| event.chain_ended.raise(&())));
            if let Err(payload) = ended {
                error!("chain_ended listener panicked: {}", panic_message(payload.as_ref()));
            }

            next = {
                let mut dispatch = lock(&self.dispatch);
                let queued = dispatch.queue.pop_front();
                if queued.is_none() {
                    dispatch.running = false;
                }
                queued
            };
        }
        self.idle.notify_waiters();
    }

    async fn pipe_guarded(&self, event: &mut InteractionEvent) -> Result<(), InteractionError> {
        let kind = event.kind;
        match AssertUnwindSafe(self.chain.pipe(event)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Interaction panicked while handling {kind}: {message}");
                Err(InteractionError::Panicked(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
