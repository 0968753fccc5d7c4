//! Request-scoped context carrier.
//!
//! A [`RequestContext`] is an immutable chain of typed entries. Attaching a
//! value never mutates the receiver: it returns a derived context whose new
//! entry shadows any older entry for the same key. Cloning is a pointer copy,
//! so contexts can be handed down a handler chain freely.
//!
//! Keys are zero-sized marker types implementing [`ContextKey`]. Identity is
//! the marker's `TypeId`, which makes two unrelated subsystems unable to
//! collide even if they pick the same display name.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Typed token identifying one slot of request-scoped state.
///
/// ```
/// use strata_core::{ContextKey, RequestContext};
///
/// struct TenantId;
///
/// impl ContextKey for TenantId {
///     type Value = String;
///     const NAME: &'static str = "tenant_id";
/// }
///
/// let ctx = RequestContext::new().attach::<TenantId>("acme".to_string());
/// assert_eq!(ctx.get::<TenantId>(String::new()), "acme");
/// ```
pub trait ContextKey: 'static {
    /// Type of the value stored under this key.
    type Value: Clone + Send + Sync + 'static;
    /// Human-readable name, used only for diagnostics.
    const NAME: &'static str;
}

struct Entry {
    key: TypeId,
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Ambient values carried alongside a request through every action handler.
#[derive(Clone, Default)]
pub struct RequestContext {
    head: Option<Arc<Entry>>,
}

impl RequestContext {
    /// Creates an empty root context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a derived context carrying `value` under `K`.
    ///
    /// The receiver is left untouched; contexts derived from it earlier keep
    /// observing whatever they observed before.
    #[must_use]
    pub fn attach<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<K>(),
                name: K::NAME,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Returns the value attached under `K`, or `default` when absent.
    #[must_use]
    pub fn get<K: ContextKey>(&self, default: K::Value) -> K::Value {
        self.try_get::<K>().cloned().unwrap_or(default)
    }

    /// Returns a reference to the nearest value attached under `K`.
    #[must_use]
    pub fn try_get<K: ContextKey>(&self) -> Option<&K::Value> {
        let key = TypeId::of::<K>();
        self.entries()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.downcast_ref::<K::Value>())
    }

    /// Returns `true` if `K` was attached on this context or any ancestor.
    #[must_use]
    pub fn contains<K: ContextKey>(&self) -> bool {
        self.try_get::<K>().is_some()
    }

    /// Number of attach operations this context descends from.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries().count()
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::successors(self.head.as_deref(), |entry| entry.parent.as_deref())
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("keys", &self.entries().map(|e| e.name).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    struct Counter;

    impl ContextKey for Counter {
        type Value = u64;
        const NAME: &'static str = "counter";
    }

    struct Label;

    impl ContextKey for Label {
        type Value = String;
        const NAME: &'static str = "label";
    }

    /// Same value type and name as `Counter`, different identity.
    struct Shadow;

    impl ContextKey for Shadow {
        type Value = u64;
        const NAME: &'static str = "counter";
    }

    #[test]
    fn absent_key_yields_default() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.get::<Counter>(7), 7);
        assert!(ctx.try_get::<Counter>().is_none());
        assert!(!ctx.contains::<Counter>());
    }

    #[test]
    fn attach_does_not_mutate_parent() {
        let root = RequestContext::new();
        let child = root.attach::<Counter>(1);
        assert_eq!(root.get::<Counter>(0), 0);
        assert_eq!(child.get::<Counter>(0), 1);
        assert_eq!(root.depth(), 0);
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn newest_attach_shadows_older_one() {
        let ctx = RequestContext::new()
            .attach::<Counter>(1)
            .attach::<Label>("outer".into())
            .attach::<Counter>(2);
        assert_eq!(ctx.get::<Counter>(0), 2);
        assert_eq!(ctx.get::<Label>(String::new()), "outer");
    }

    #[test]
    fn keys_with_equal_names_do_not_collide() {
        let ctx = RequestContext::new().attach::<Counter>(5);
        assert_eq!(ctx.get::<Shadow>(9), 9);
        let ctx = ctx.attach::<Shadow>(6);
        assert_eq!(ctx.get::<Counter>(0), 5);
        assert_eq!(ctx.get::<Shadow>(0), 6);
    }

    #[test]
    fn siblings_are_isolated() {
        let root = RequestContext::new().attach::<Label>("root".into());
        let a = root.attach::<Counter>(1);
        let b = root.attach::<Counter>(2);
        assert_eq!(a.get::<Counter>(0), 1);
        assert_eq!(b.get::<Counter>(0), 2);
        assert_eq!(a.get::<Label>(String::new()), "root");
    }

    #[test]
    fn debug_lists_keys_newest_first() {
        let ctx = RequestContext::new()
            .attach::<Counter>(1)
            .attach::<Label>("x".into());
        assert_eq!(
            format!("{ctx:?}"),
            r#"RequestContext { keys: ["label", "counter"] }"#
        );
    }

    proptest! {
        #[test]
        fn get_returns_last_attached_value(values in proptest::collection::vec(any::<u64>(), 1..16)) {
            let mut ctx = RequestContext::new();
            for value in &values {
                ctx = ctx.attach::<Counter>(*value);
            }
            prop_assert_eq!(ctx.get::<Counter>(0), *values.last().unwrap());
            prop_assert_eq!(ctx.depth(), values.len());
        }

        #[test]
        fn unattached_key_always_defaults(values in proptest::collection::vec(any::<u64>(), 0..16), default in any::<u64>()) {
            let mut ctx = RequestContext::new();
            for value in values {
                ctx = ctx.attach::<Counter>(value);
            }
            prop_assert_eq!(ctx.get::<Shadow>(default), default);
        }
    }
}
