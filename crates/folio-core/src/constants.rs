//! Global constants used throughout the Folio codebase

/// File extension of a persisted document, without the leading dot
pub const DOCUMENT_EXTENSION: &str = "json";

/// Field holding the document identifier
pub const ID_FIELD: &str = "id";

/// Field holding the creation timestamp
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field holding the last update timestamp
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Query parameter naming the sort field
pub const SORT_PARAM: &str = "_sort";

/// Query parameter selecting the sort direction (`asc` or `desc`)
pub const ORDER_PARAM: &str = "_order";

/// Query parameter capping the number of returned documents
pub const LIMIT_PARAM: &str = "_limit";

/// Query parameter skipping leading documents
pub const OFFSET_PARAM: &str = "_offset";

/// Query parameters that are never interpreted as field filters
pub const RESERVED_PARAMS: [&str; 4] = [SORT_PARAM, ORDER_PARAM, LIMIT_PARAM, OFFSET_PARAM];

/// Name of the configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Prefix of every environment variable override
pub const ENV_PREFIX: &str = "FOLIO_";
