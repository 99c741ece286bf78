/// Creates a single [`ResponseEvent`](crate::ResponseEvent) from a kind shorthand.
///
/// ```rust
/// use duet::{ResponseEvent, duet_event};
///
/// let event = duet_event!(partial => "Hel");
/// assert_eq!(event, ResponseEvent::partial("Hel"));
/// assert!(duet_event!(failed => "boom").is_terminal());
/// ```
#[macro_export]
macro_rules! duet_event {
    (partial => $content:expr $(,)?) => {
        $crate::ResponseEvent::partial($content)
    };
    (settled => $content:expr $(,)?) => {
        $crate::ResponseEvent::settled($content, None)
    };
    (failed => $content:expr $(,)?) => {
        $crate::ResponseEvent::failed($content)
    };
    ($kind:ident => $content:expr $(,)?) => {
        compile_error!("unsupported event: use partial, settled, or failed");
    };
}

/// Creates a `Vec<ResponseEvent>` from kind/content pairs, handy for scripted streams.
///
/// ```rust
/// use duet::{ResponseEvent, duet_events};
///
/// let events = duet_events![
///     partial => "Hel",
///     partial => "lo",
///     settled => "Hello",
/// ];
///
/// assert_eq!(events.len(), 3);
/// assert_eq!(events[2], ResponseEvent::settled("Hello", None));
/// ```
#[macro_export]
macro_rules! duet_events {
    () => {
        Vec::<$crate::ResponseEvent>::new()
    };
    ($($kind:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::duet_event!($kind => $content)),+]
    };
}

/// Creates a [`ResponseContext`](crate::ResponseContext) from key/value pairs.
///
/// ```rust
/// use duet::duet_context;
///
/// let context = duet_context! {
///     "conversation_id" => "c-1",
///     "parent_message_id" => "m-9",
/// };
/// assert_eq!(context.get("parent_message_id"), Some("m-9"));
/// ```
#[macro_export]
macro_rules! duet_context {
    () => {
        $crate::ResponseContext::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::ResponseContext::new()$(.with($key, $value))+
    };
}
