use crate::body::BoxedBody;
use futures::future::{BoxFuture, FutureExt};
use http::{Request, Response};
use std::future::Future;
use std::sync::Arc;

/// Something that turns a request into a response.
///
/// One instance is shared by every connection, so it must be `Send + Sync`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<BoxedBody>) -> BoxFuture<'_, Response<BoxedBody>>;
}

pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, req: Request<BoxedBody>) -> BoxFuture<'_, Response<BoxedBody>> {
        (**self).call(req)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call(&self, req: Request<BoxedBody>) -> BoxFuture<'_, Response<BoxedBody>> {
        (**self).call(req)
    }
}

pub struct HandlerFn<F>(F);

/// Wrap an async function as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<BoxedBody>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<BoxedBody>> + Send + 'static,
{
    HandlerFn(f)
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<BoxedBody>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<BoxedBody>> + Send + 'static,
{
    fn call(&self, req: Request<BoxedBody>) -> BoxFuture<'_, Response<BoxedBody>> {
        (self.0)(req).boxed()
    }
}
