//! Resort callbacks.
//!
//! A layer may carry a hook that runs after `bring_to_front` or
//! `send_to_back` has committed its new z-index. Hook failures, including
//! panics, are logged and never reach the caller of the resort operation.

use crate::layer::LayerRecord;
use futures_util::future::{BoxFuture, FutureExt};
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tmnl_common_log::spans::operation_span;
use tracing::{debug, warn, Instrument};

pub use tmnl_common_config::ResortDispatchMode as ResortDispatch;

/// Future returned by a resort hook.
pub type ResortFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Callback invoked with the updated record after a resort.
pub type ResortHook = Arc<dyn Fn(LayerRecord) -> ResortFuture + Send + Sync>;

/// Build a [`ResortHook`] from an async closure.
pub fn resort_hook<F, Fut>(f: F) -> ResortHook
where
    F: Fn(LayerRecord) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |layer| f(layer).boxed())
}

/// Build a [`ResortHook`] from a synchronous closure.
pub fn resort_hook_sync<F>(f: F) -> ResortHook
where
    F: Fn(&LayerRecord) + Send + Sync + 'static,
{
    Arc::new(move |layer| {
        f(&layer);
        futures_util::future::ready(Ok(())).boxed()
    })
}

/// Run `hook` for `layer` according to `mode`.
///
/// `Detached` spawns onto the current tokio runtime and falls back to
/// running inline when there is none.
pub(crate) async fn dispatch(
    hook: ResortHook,
    layer: LayerRecord,
    operation: &'static str,
    mode: ResortDispatch,
) {
    match mode {
        ResortDispatch::Inline => run_hook(hook, layer, operation).await,
        ResortDispatch::Detached => match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run_hook(hook, layer, operation));
            }
            Err(_) => {
                debug!(operation, "no runtime for detached resort hook, running inline");
                run_hook(hook, layer, operation).await;
            }
        },
    }
}

async fn run_hook(hook: ResortHook, layer: LayerRecord, operation: &'static str) {
    let id = layer.id().clone();
    let z_index = layer.z_index();
    let span = operation_span(operation, id.as_str());

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| hook(layer))) {
        Ok(future) => AssertUnwindSafe(future).catch_unwind().instrument(span).await,
        Err(payload) => Err(payload),
    };

    match outcome {
        Ok(Ok(())) => debug!(layer_id = %id, z_index, operation, "resort hook completed"),
        Ok(Err(error)) => {
            warn!(layer_id = %id, operation, error = %error, "resort hook failed")
        }
        Err(payload) => warn!(
            layer_id = %id,
            operation,
            panic = %panic_message(payload.as_ref()),
            "resort hook panicked"
        ),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
