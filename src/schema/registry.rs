//! The immutable set of content models a process serves.

use indexmap::IndexMap;
use log::info;

use super::types::{ContentModel, SchemaError, SchemaNode};

/// All content models declared for this process, checked once at startup
/// and immutable afterwards (hot-reload is not supported).
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    models: IndexMap<String, ContentModel>,
}

impl ModelSet {
    /// Build a model set, rejecting duplicate identifiers and references to
    /// content types the set does not declare.
    ///
    /// # Errors
    /// Returns a `SchemaError` if a model identifier is empty or duplicated,
    /// or if a reference leaf targets an undeclared content type.
    pub fn new(models: Vec<ContentModel>) -> Result<Self, SchemaError> {
        let mut set = IndexMap::new();
        for model in models {
            if model.identifier.is_empty() {
                return Err(SchemaError::InvalidModel(
                    "model identifier cannot be empty".to_string(),
                ));
            }
            if set.contains_key(&model.identifier) {
                return Err(SchemaError::DuplicateModel(model.identifier));
            }
            set.insert(model.identifier.clone(), model);
        }

        let result = Self { models: set };
        for model in result.iter() {
            for (field_name, node) in model.schema.content.iter().chain(model.schema.meta.iter())
            {
                result.check_reference_targets(&model.identifier, field_name, node)?;
            }
        }
        info!("Registered {} content models", result.models.len());
        Ok(result)
    }

    /// Look up a model by its identifier.
    pub fn get(&self, identifier: &str) -> Option<&ContentModel> {
        self.models.get(identifier)
    }

    /// Like [`ModelSet::get`] but with the missing-model error attached.
    ///
    /// # Errors
    /// Returns `SchemaError::ModelNotFound` when the identifier is unknown.
    pub fn require(&self, identifier: &str) -> Result<&ContentModel, SchemaError> {
        self.get(identifier)
            .ok_or_else(|| SchemaError::ModelNotFound(identifier.to_string()))
    }

    /// Iterate the models in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentModel> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn check_reference_targets(
        &self,
        model_id: &str,
        field_name: &str,
        node: &SchemaNode,
    ) -> Result<(), SchemaError> {
        match node {
            SchemaNode::Reference(reference) => {
                for target in reference.types.keys() {
                    if !self.models.contains_key(target) {
                        return Err(SchemaError::InvalidModel(format!(
                            "model '{model_id}' field '{field_name}' references undeclared content type '{target}'"
                        )));
                    }
                }
                Ok(())
            }
            SchemaNode::RichText(rich_text) => {
                for target in rich_text.options.reference_types.keys() {
                    if !self.models.contains_key(target) {
                        return Err(SchemaError::InvalidModel(format!(
                            "model '{model_id}' field '{field_name}' embeds undeclared content type '{target}'"
                        )));
                    }
                }
                Ok(())
            }
            SchemaNode::List(list) => self.check_reference_targets(model_id, field_name, &list.of),
            SchemaNode::Object(object) => {
                for (child_name, child) in &object.fields {
                    self.check_reference_targets(model_id, child_name, child)?;
                }
                Ok(())
            }
            SchemaNode::Union(union) => {
                for case in union.cases.values() {
                    for (child_name, child) in &case.fields {
                        self.check_reference_targets(model_id, child_name, child)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ModelSchema;

    fn model(identifier: &str) -> ContentModel {
        ContentModel {
            identifier: identifier.to_string(),
            name_singular: identifier.to_string(),
            name_plural: format!("{identifier}s"),
            schema: ModelSchema::default(),
        }
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let err = ModelSet::new(vec![model("article"), model("article")]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateModel("article".to_string()));
    }

    #[test]
    fn test_lookup() {
        let set = ModelSet::new(vec![model("article"), model("page")]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get("article").is_some());
        assert!(set.get("missing").is_none());
        assert!(set.require("missing").is_err());
    }

    #[test]
    fn test_undeclared_reference_target_rejected() {
        let mut article = model("article");
        article.schema.content.insert(
            "related".to_string(),
            serde_json::from_value(serde_json::json!({
                "type": "reference",
                "types": { "ghost": {} }
            }))
            .unwrap(),
        );
        assert!(ModelSet::new(vec![article]).is_err());
    }
}
