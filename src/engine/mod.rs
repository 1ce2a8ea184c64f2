pub mod map_resolver;
pub mod persistence;
pub mod serializer;
