use tracing::warn;

use super::definition::TokenDefinition;

/// Token definitions in registration order.
///
/// Order is significant: when several `start` delimiters match at the same
/// position the earliest registered definition wins.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<TokenDefinition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: TokenDefinition) {
        Self::warn_degenerate(&definition);
        self.definitions.push(definition);
    }

    /// Registers at `index`, clamped to the current length.
    pub fn insert(&mut self, index: usize, definition: TokenDefinition) {
        Self::warn_degenerate(&definition);
        let index = index.min(self.definitions.len());
        self.definitions.insert(index, definition);
    }

    /// Removes the first definition of `kind`.
    pub fn remove(&mut self, kind: &str) -> Option<TokenDefinition> {
        let position = self.definitions.iter().position(|def| def.kind == kind)?;
        Some(self.definitions.remove(position))
    }

    /// First definition registered with `kind`.
    pub fn find(&self, kind: &str) -> Option<&TokenDefinition> {
        self.definitions.iter().find(|def| def.kind == kind)
    }

    /// Longest `start` or `end` delimiter in chars, `0` when empty.
    pub fn window_size(&self) -> usize {
        self.definitions
            .iter()
            .flat_map(|def| [def.start.chars().count(), def.end.chars().count()])
            .max()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenDefinition> {
        self.definitions.iter()
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.definitions.iter().map(|def| def.kind.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn warn_degenerate(definition: &TokenDefinition) {
        if definition.is_degenerate() {
            warn!(
                "Definition '{}' has an empty delimiter (start: {:?}, end: {:?})",
                definition.kind, definition.start, definition.end
            );
        }
    }
}
