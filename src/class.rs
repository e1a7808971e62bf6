//! Runtime error categories.
//!
//! Categories form a single-inheritance taxonomy rooted at
//! [`ErrorClass::base`]. Whether a caught error belongs to a category is
//! decided at runtime, so taxonomies can come from configuration as well as
//! from code.

use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::ConfigError;
use crate::middleware::SharedError;

type Constructor = Arc<dyn Fn(String) -> SharedError + Send + Sync>;
type Probe = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

enum ConstructorKind {
    /// No way to mint instances.
    Unset,
    /// Instances are plain [`ClassedError`] values.
    Classed,
    /// Instances come from a user-supplied function.
    Custom(Constructor),
}

struct Inner {
    name: String,
    parent: Option<ErrorClass>,
    constructor: ConstructorKind,
    probe: Option<Probe>,
}

/// A runtime error category.
///
/// Identity is by declaration, not by name: two classes built with the same
/// name are distinct categories.
#[derive(Clone)]
pub struct ErrorClass {
    inner: Arc<Inner>,
}

static BASE: LazyLock<ErrorClass> = LazyLock::new(|| ErrorClass {
    inner: Arc::new(Inner {
        name: "Error".to_string(),
        parent: None,
        constructor: ConstructorKind::Classed,
        probe: None,
    }),
});

impl ErrorClass {
    /// The root of the taxonomy. Every error is an instance of it.
    pub fn base() -> ErrorClass {
        BASE.clone()
    }

    /// Declare a constructible category directly below the base class.
    pub fn new(name: impl Into<String>) -> ErrorClass {
        ErrorClass::builder(name)
            .extends(ErrorClass::base())
            .constructible()
            .build()
    }

    /// A category backed by the concrete Rust error type `E`.
    ///
    /// Membership is a downcast test over the error and its `source` chain,
    /// so wrapped errors still match.
    pub fn of<E>() -> ErrorClass
    where
        E: StdError + Send + Sync + 'static,
    {
        ErrorClass::builder(short_type_name::<E>())
            .extends(ErrorClass::base())
            .probe(|error| find_cause::<E>(error).is_some())
            .build()
    }

    /// Start declaring a category from scratch.
    ///
    /// The builder applies no defaults and performs no validation; the
    /// factory validates the result once, at registration.
    pub fn builder(name: impl Into<String>) -> ErrorClassBuilder {
        ErrorClassBuilder {
            name: name.into(),
            parent: None,
            constructor: ConstructorKind::Unset,
            probe: None,
        }
    }

    /// Category name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Parent category, if any.
    #[inline]
    pub fn parent(&self) -> Option<&ErrorClass> {
        self.inner.parent.as_ref()
    }

    /// Whether instances of this category can be created or recognized.
    pub fn is_constructible(&self) -> bool {
        !matches!(self.inner.constructor, ConstructorKind::Unset) || self.inner.probe.is_some()
    }

    /// Whether this category is `other` or derives from it.
    pub fn derives_from(&self, other: &ErrorClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if Arc::ptr_eq(&class.inner, &other.inner) {
                return true;
            }
            current = class.inner.parent.as_ref();
        }
        false
    }

    /// Whether this category is rooted at the base class.
    pub fn derives_from_base(&self) -> bool {
        self.derives_from(&BASE)
    }

    /// Whether `error` belongs to this category.
    pub fn is_instance(&self, error: &SharedError) -> bool {
        if self.is_base() {
            return true;
        }
        if let Some(probe) = &self.inner.probe {
            if (probe.as_ref())(error.as_ref()) {
                return true;
            }
        }
        match error.downcast_ref::<ClassedError>() {
            Some(classed) => classed.class.derives_from(self),
            None => false,
        }
    }

    /// Mint an instance of this category.
    pub fn construct(&self, message: impl Into<String>) -> Result<SharedError, ConfigError> {
        let message = message.into();
        match &self.inner.constructor {
            ConstructorKind::Classed => Ok(Arc::new(ClassedError {
                class: self.clone(),
                message,
            })),
            ConstructorKind::Custom(constructor) => Ok((constructor.as_ref())(message)),
            ConstructorKind::Unset => Err(ConfigError::NotConstructible),
        }
    }

    fn is_base(&self) -> bool {
        Arc::ptr_eq(&self.inner, &BASE.inner)
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            Some(parent) => write!(f, "ErrorClass({} : {})", self.name(), parent.name()),
            None => write!(f, "ErrorClass({})", self.name()),
        }
    }
}

/// Builder for [`ErrorClass`] declarations.
pub struct ErrorClassBuilder {
    name: String,
    parent: Option<ErrorClass>,
    constructor: ConstructorKind,
    probe: Option<Probe>,
}

impl ErrorClassBuilder {
    /// Place the category below `parent` in the taxonomy.
    pub fn extends(mut self, parent: ErrorClass) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Mint instances as plain [`ClassedError`] values.
    pub fn constructible(mut self) -> Self {
        self.constructor = ConstructorKind::Classed;
        self
    }

    /// Mint instances with a custom function.
    ///
    /// A custom constructor covers minting only; pair it with [`probe`] if
    /// the minted values are not [`ClassedError`]s and should be recognized
    /// as members.
    ///
    /// [`probe`]: ErrorClassBuilder::probe
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(String) -> SharedError + Send + Sync + 'static,
    {
        self.constructor = ConstructorKind::Custom(Arc::new(constructor));
        self
    }

    /// Recognize instances with a membership predicate.
    pub fn probe<F>(mut self, probe: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> ErrorClass {
        ErrorClass {
            inner: Arc::new(Inner {
                name: self.name,
                parent: self.parent,
                constructor: self.constructor,
                probe: self.probe,
            }),
        }
    }
}

/// An error value minted from an [`ErrorClass`].
pub struct ClassedError {
    class: ErrorClass,
    message: String,
}

impl ClassedError {
    /// The category this error was minted from.
    #[inline]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    /// Human readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ClassedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for ClassedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassedError")
            .field("class", &self.class.name())
            .field("message", &self.message)
            .finish()
    }
}

impl StdError for ClassedError {}

/// Find a concrete error type in `error` or anywhere in its source chain.
pub fn find_cause<'a, E>(error: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    if let Some(found) = error.downcast_ref::<E>() {
        return Some(found);
    }
    let mut source = error.source();
    while let Some(current) = source {
        if let Some(found) = current.downcast_ref::<E>() {
            return Some(found);
        }
        source = current.source();
    }
    None
}

fn short_type_name<E>() -> String {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}
