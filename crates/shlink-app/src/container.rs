//! String-keyed dependency registry
//!
//! Components are registered as factories together with the keys of the
//! components they depend on. Resolving a key first resolves its declared
//! dependencies, then runs the factory with a [`Resolver`] limited to those
//! dependencies. Every instance is built once and shared afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shlink_core::prelude::*;

type Factory<C> = Box<dyn Fn(&Resolver<'_, C>) -> Result<Arc<C>> + Send + Sync>;
type Decorator<C> = Box<dyn Fn(Arc<C>) -> Arc<C> + Send + Sync>;

struct Registration<C: ?Sized> {
    deps: Vec<&'static str>,
    factory: Factory<C>,
}

/// Registry of named factories producing `Arc<C>`
pub struct Container<C: ?Sized> {
    registrations: HashMap<&'static str, Registration<C>>,
    decorators: HashMap<&'static str, Vec<Decorator<C>>>,
    /// Registration order, used by `validate`
    order: Vec<&'static str>,
    instances: Mutex<HashMap<&'static str, Arc<C>>>,
}

impl<C: ?Sized> std::fmt::Debug for Container<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.order)
            .finish_non_exhaustive()
    }
}

impl<C: ?Sized> Default for Container<C> {
    fn default() -> Self {
        Self {
            registrations: HashMap::new(),
            decorators: HashMap::new(),
            order: Vec::new(),
            instances: Mutex::new(HashMap::new()),
        }
    }
}

/// Access to the declared dependencies of the component being built
pub struct Resolver<'a, C: ?Sized> {
    key: &'static str,
    deps: &'a [&'static str],
    resolved: HashMap<&'static str, Arc<C>>,
}

impl<C: ?Sized> Resolver<'_, C> {
    /// Key of the component being built
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// A declared dependency
    pub fn get(&self, dep: &str) -> Result<Arc<C>> {
        if !self.deps.iter().any(|d| *d == dep) {
            return Err(Error::missing_dependency(dep, self.key));
        }
        self.resolved
            .get(dep)
            .cloned()
            .ok_or_else(|| Error::missing_dependency(dep, self.key))
    }
}

impl<C: ?Sized> Container<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `key`. Re-registering a key replaces it.
    pub fn register<F>(&mut self, key: &'static str, deps: &[&'static str], factory: F) -> &mut Self
    where
        F: Fn(&Resolver<'_, C>) -> Result<Arc<C>> + Send + Sync + 'static,
    {
        if self.registrations.contains_key(key) {
            debug!("Replacing registration for {}", key);
        } else {
            self.order.push(key);
        }
        self.registrations.insert(
            key,
            Registration {
                deps: deps.to_vec(),
                factory: Box::new(factory),
            },
        );
        self
    }

    /// Wrap the instance produced for `key` every time it is built
    pub fn decorate<F>(&mut self, key: &'static str, decorator: F) -> &mut Self
    where
        F: Fn(Arc<C>) -> Arc<C> + Send + Sync + 'static,
    {
        self.decorators
            .entry(key)
            .or_default()
            .push(Box::new(decorator));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registrations.contains_key(key)
    }

    /// Fully wired instance for `key`
    pub fn resolve(&self, key: &str) -> Result<Arc<C>> {
        let mut stack = Vec::new();
        self.resolve_inner(key, "<root>", &mut stack)
    }

    fn resolve_inner(
        &self,
        key: &str,
        required_by: &str,
        stack: &mut Vec<&'static str>,
    ) -> Result<Arc<C>> {
        if let Some(instance) = self.cached(key) {
            return Ok(instance);
        }

        let Some((&static_key, registration)) = self.registrations.get_key_value(key) else {
            return Err(Error::missing_dependency(key, required_by));
        };

        if stack.contains(&static_key) {
            let mut chain: Vec<&str> = stack.clone();
            chain.push(static_key);
            return Err(Error::DependencyCycle {
                key: static_key.to_string(),
                chain: chain.join(" -> "),
            });
        }

        stack.push(static_key);
        let mut resolved = HashMap::with_capacity(registration.deps.len());
        for dep in &registration.deps {
            match self.resolve_inner(dep, static_key, stack) {
                Ok(instance) => {
                    resolved.insert(*dep, instance);
                }
                Err(e) => {
                    stack.pop();
                    return Err(e);
                }
            }
        }
        stack.pop();

        let resolver = Resolver {
            key: static_key,
            deps: &registration.deps,
            resolved,
        };
        let mut instance = (registration.factory)(&resolver)?;
        if let Some(decorators) = self.decorators.get(static_key) {
            for decorate in decorators {
                instance = decorate(instance);
            }
        }

        trace!("Resolved {}", static_key);
        let mut instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        Ok(instances.entry(static_key).or_insert(instance).clone())
    }

    fn cached(&self, key: &str) -> Option<Arc<C>> {
        self.instances
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Resolve every registered key, failing on the first wiring error
    pub fn validate(&self) -> Result<()> {
        for key in &self.order {
            self.resolve(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Named: Send + Sync {
        fn name(&self) -> String;
    }

    struct Leaf(&'static str);

    impl Named for Leaf {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    struct Parent {
        children: Vec<Arc<dyn Named>>,
    }

    impl Named for Parent {
        fn name(&self) -> String {
            let names: Vec<String> = self.children.iter().map(|c| c.name()).collect();
            format!("parent({})", names.join(","))
        }
    }

    fn leaf(name: &'static str) -> impl Fn(&Resolver<'_, dyn Named>) -> Result<Arc<dyn Named>> {
        move |_| Ok(Arc::new(Leaf(name)) as Arc<dyn Named>)
    }

    #[test]
    fn test_resolves_declared_dependencies() {
        let mut container: Container<dyn Named> = Container::new();
        container.register("A", &[], leaf("a"));
        container.register("B", &[], leaf("b"));
        container.register("Parent", &["A", "B"], |r| {
            Ok(Arc::new(Parent {
                children: vec![r.get("A")?, r.get("B")?],
            }) as Arc<dyn Named>)
        });

        let parent = container.resolve("Parent").unwrap();
        assert_eq!(parent.name(), "parent(a,b)");
    }

    #[test]
    fn test_missing_dependency() {
        let mut container: Container<dyn Named> = Container::new();
        container.register("Parent", &["Ghost"], |r| {
            Ok(Arc::new(Parent {
                children: vec![r.get("Ghost")?],
            }) as Arc<dyn Named>)
        });

        let err = container.resolve("Parent").err().unwrap();
        match &err {
            Error::MissingDependency { key, required_by } => {
                assert_eq!(key, "Ghost");
                assert_eq!(required_by, "Parent");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_fatal());
        assert!(container.validate().is_err());
    }

    #[test]
    fn test_unknown_root_key() {
        let container: Container<dyn Named> = Container::new();
        assert!(matches!(
            container.resolve("Nope"),
            Err(Error::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_undeclared_dependency_is_rejected() {
        let mut container: Container<dyn Named> = Container::new();
        container.register("A", &[], leaf("a"));
        container.register("Sneaky", &[], |r| {
            Ok(Arc::new(Parent {
                children: vec![r.get("A")?],
            }) as Arc<dyn Named>)
        });

        assert!(matches!(
            container.resolve("Sneaky"),
            Err(Error::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let mut container: Container<dyn Named> = Container::new();
        container.register("A", &["B"], leaf("a"));
        container.register("B", &["A"], leaf("b"));

        match container.resolve("A") {
            Err(Error::DependencyCycle { chain, .. }) => assert_eq!(chain, "A -> B -> A"),
            other => panic!("expected cycle, got {:?}", other.map(|n| n.name())),
        }
    }

    #[test]
    fn test_instances_are_memoized() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();

        let mut container: Container<dyn Named> = Container::new();
        container.register("A", &[], move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Leaf("a")) as Arc<dyn Named>)
        });
        container.register("P1", &["A"], leaf("p1"));
        container.register("P2", &["A"], leaf("p2"));

        container.validate().unwrap();
        let first = container.resolve("A").unwrap();
        let second = container.resolve("A").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_decorator_wraps_instance() {
        struct Upper(Arc<dyn Named>);
        impl Named for Upper {
            fn name(&self) -> String {
                self.0.name().to_uppercase()
            }
        }

        let mut container: Container<dyn Named> = Container::new();
        container.register("A", &[], leaf("a"));
        container.decorate("A", |inner| Arc::new(Upper(inner)) as Arc<dyn Named>);

        assert_eq!(container.resolve("A").unwrap().name(), "A");
    }
}
