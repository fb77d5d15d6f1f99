mod dedup_vertices;

pub use dedup_vertices::DeduplicateVertices;
