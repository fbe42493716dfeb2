use anyhow::Result;

use crate::domain::VocabularyRegistry;

pub struct ExercisesController<'a> {
    registry: &'a VocabularyRegistry,
}

impl<'a> ExercisesController<'a> {
    pub fn new(registry: &'a VocabularyRegistry) -> Self {
        Self { registry }
    }

    pub async fn list(&self) -> Result<String> {
        if self.registry.is_empty() {
            return Ok("No exercises available.".to_string());
        }

        let mut out = format!("Known exercises ({}):\n", self.registry.len());
        for name in self.registry.names() {
            out.push_str(&format!("  {}\n", name));
        }
        Ok(out)
    }
}
