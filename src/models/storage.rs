use serde::{Deserialize, Serialize};

/// Name the storage backend gives to its empty-folder marker objects.
pub const PLACEHOLDER_NAME: &str = ".emptyFolderPlaceholder";

/// Size and content type of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Size in bytes.
    #[serde(default)]
    pub size:          u64,
    /// MIME type.
    #[serde(default)]
    pub mimetype:      Option<String>,
    /// Cache-Control header stored with the object.
    #[serde(rename = "cacheControl", default)]
    pub cache_control: Option<String>,
}

/// One entry of a bucket listing.
///
/// Folder entries carry no `id` and no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Entry name relative to the listed prefix.
    pub name:             String,
    /// Object id, absent for folders.
    #[serde(default)]
    pub id:               Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at:       Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at:       Option<String>,
    /// Last access time.
    #[serde(default)]
    pub last_accessed_at: Option<String>,
    /// Object metadata, absent for folders.
    #[serde(default)]
    pub metadata:         Option<ObjectMetadata>,
}

impl StoredObject {
    /// True for the marker object that keeps an empty folder alive.
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }
}

/// Sort direction for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
}

/// Sort options for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    /// Column to sort by.
    pub column: String,
    /// Direction.
    pub order:  SortOrder,
}

/// Body of a `POST /object/list/<bucket>` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListObjectsRequest {
    /// Maximum number of entries returned.
    pub limit:   u32,
    /// Entries to skip.
    pub offset:  u32,
    /// Sort options.
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
    /// Folder prefix to list.
    pub prefix:  String,
}

impl ListObjectsRequest {
    /// Lists the first 100 entries under `prefix`, by name ascending.
    pub fn for_prefix(prefix: impl Into<String>) -> Self {
        Self {
            limit:   100,
            offset:  0,
            sort_by: SortBy {
                column: "name".into(),
                order:  SortOrder::Asc,
            },
            prefix:  prefix.into(),
        }
    }
}
