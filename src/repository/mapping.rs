//! Mapping - which fields a content lookup should fetch and hydrate.

/// Describes the columns and hydration behavior of a content lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    properties: Vec<String>,
    resolve_url: bool,
    hydrate_ghost: bool,
    hydrate_shadow: bool,
}

impl Mapping {
    pub fn builder() -> MappingBuilder {
        MappingBuilder::default()
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn should_resolve_url(&self) -> bool {
        self.resolve_url
    }

    pub fn should_hydrate_ghost(&self) -> bool {
        self.hydrate_ghost
    }

    pub fn should_hydrate_shadow(&self) -> bool {
        self.hydrate_shadow
    }
}

/// Fluent builder for [`Mapping`].
///
/// ```
/// use canopy::repository::Mapping;
///
/// let mapping = Mapping::builder()
///     .add_properties(["title", "article"])
///     .set_resolve_url(true)
///     .set_hydrate_shadow(true)
///     .build();
/// assert_eq!(mapping.properties(), ["title", "article"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingBuilder {
    mapping: Mapping,
}

impl MappingBuilder {
    pub fn add_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mapping
            .properties
            .extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn set_resolve_url(mut self, resolve_url: bool) -> Self {
        self.mapping.resolve_url = resolve_url;
        self
    }

    pub fn set_hydrate_ghost(mut self, hydrate_ghost: bool) -> Self {
        self.mapping.hydrate_ghost = hydrate_ghost;
        self
    }

    pub fn set_hydrate_shadow(mut self, hydrate_shadow: bool) -> Self {
        self.mapping.hydrate_shadow = hydrate_shadow;
        self
    }

    pub fn build(self) -> Mapping {
        self.mapping
    }
}
