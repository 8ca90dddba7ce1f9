//! Schema model types: the node tree, content models, records and errors.

mod errors;
mod model;
mod node;

pub use errors::{SchemaError, ValidationError};
pub use model::{ContentModel, ContentRecord, ModelSchema};
pub use node::{
    EnumField, EnumValue, ListField, MediaField, ObjectSchema, ReferenceField, ReferenceScope,
    ReferenceTarget, RichTextField, RichTextOptions, ScalarField, SchemaNode, UnionField,
};
