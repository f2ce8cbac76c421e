use std::future::Future;

use sgw_types::{GatewayError, GatewayResult, RequestContext};

/// Await `fut`, aborting it once the context deadline passes.
///
/// Expiry surfaces as [`GatewayError::Timeout`]; any other outcome is the
/// future's own result. Without a deadline the future runs to completion.
pub async fn within_deadline<T, F>(ctx: &RequestContext, operation: &str, fut: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    let Some(remaining) = ctx.remaining() else {
        return fut.await;
    };
    match tokio::time::timeout(remaining, fut).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::timeout(operation, remaining)),
    }
}
