pub mod catalog;
pub mod composite;
pub mod schema;
pub mod validation;

pub use catalog::{Catalog, CatalogEntry};
pub use composite::{relative_offset, weld, weld_name};
pub use schema::{ShapeBlueprint, WeldPart};
pub use validation::{validate, validate_transforms};
