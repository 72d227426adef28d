//! Capability bindings shared between flag hooks and command behaviors.
//!
//! A [`Context`] maps a capability type (usually a trait object such as
//! `dyn Logger`) to the single instance currently satisfying it. The driver
//! populates it before parsing, hooks may rebind entries while the command
//! line is being parsed, and the selected command resolves what it needs when
//! it runs. Each invocation gets its own context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};

type Binding = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Context {
    bindings: HashMap<TypeId, Binding>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `instance` as the provider of capability `T`, replacing any
    /// earlier binding.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use upjet_core::context::Context;
    /// use upjet_core::logging::{Logger, NopLogger};
    ///
    /// let mut context = Context::new();
    /// context.bind::<dyn Logger>(Arc::new(NopLogger));
    /// assert!(context.resolve::<dyn Logger>().is_ok());
    /// ```
    pub fn bind<T>(&mut self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let replaced = self
            .bindings
            .insert(TypeId::of::<T>(), Box::new(instance))
            .is_some();
        debug!(
            "{} capability `{}`",
            if replaced { "Rebound" } else { "Bound" },
            std::any::type_name::<T>()
        );
    }

    /// Returns the instance currently bound for capability `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotBound`] if nothing was ever bound for `T`.
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings
            .get(&TypeId::of::<T>())
            .and_then(|binding| binding.downcast_ref::<Arc<T>>())
            .cloned()
            .ok_or_else(Error::not_bound::<T>)
    }

    #[must_use]
    pub fn is_bound<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    struct French;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    #[test]
    fn test_resolve_unbound_capability_fails() {
        let context = Context::new();
        let result = context.resolve::<dyn Greeter>();
        assert!(matches!(result, Err(Error::NotBound { .. })));
        assert!(!context.is_bound::<dyn Greeter>());
    }

    #[test]
    fn test_rebinding_replaces_instance() {
        let mut context = Context::new();
        context.bind::<dyn Greeter>(Arc::new(English));
        assert_eq!(context.resolve::<dyn Greeter>().unwrap().greet(), "hello");

        context.bind::<dyn Greeter>(Arc::new(French));
        assert_eq!(context.resolve::<dyn Greeter>().unwrap().greet(), "bonjour");
    }

    #[test]
    fn test_concrete_and_trait_object_bindings_are_distinct() {
        let mut context = Context::new();
        context.bind(Arc::new(English));

        assert!(context.is_bound::<English>());
        assert!(!context.is_bound::<dyn Greeter>());
        assert_eq!(context.resolve::<English>().unwrap().greet(), "hello");
    }
}
