use crate::handler::BoxedHandler;
use crate::resolve::{BoxedResolver, Redirect};
use std::sync::Arc;

/// Wrap each resolver around the next, ending in `fallback`.
///
/// The first resolver is tried first; a miss moves on to the second, and so on, until `fallback` answers.
pub fn compose<I>(resolvers: I, fallback: BoxedHandler) -> BoxedHandler
where
    I: IntoIterator<Item = BoxedResolver>,
    I::IntoIter: DoubleEndedIterator,
{
    resolvers
        .into_iter()
        .rev()
        .fold(fallback, |next, resolver| {
            Arc::new(Redirect::new(resolver, next)) as BoxedHandler
        })
}
