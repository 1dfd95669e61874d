//! Declarative macros for ergonomic effect construction
//!
//! Remote calls in reducers all look the same: clone what the call needs,
//! await it, and map the outcome to a follow-up action. These macros keep
//! that boilerplate out of the reducers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use ticketdock_core::async_effect;
///
/// let gateway = Arc::clone(&env.gateway);
/// async_effect! {
///     match gateway.search_listings(query).await {
///         Ok(page) => Some(SearchAction::PageLoaded { request, mode, page }),
///         Err(error) => Some(SearchAction::PageFailed { request, mode, error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use ticketdock_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(300),
///     action: SearchAction::Refresh
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Future` that runs for its side effect only
///
/// The block's value is discarded and no action is fed back. Used for
/// fire-and-forget work such as showing a toast.
///
/// # Example
///
/// ```rust,ignore
/// use ticketdock_core::fire_and_forget;
///
/// let notifier = Arc::clone(&env.notifier);
/// fire_and_forget! {
///     notifier.notify(Notification::error("Failed to load tickets"));
/// }
/// ```
#[macro_export]
macro_rules! fire_and_forget {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move {
                { $($body)* };
                ::std::option::Option::None
            })
        )
    };
}
