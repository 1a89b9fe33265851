/* src/core/src/lib.rs */

pub mod data;
pub mod document;
pub mod errors;
pub mod escape;
pub mod hash;
pub mod hooks;
pub mod paths;
pub mod route;
pub mod sitemap;
pub mod table;

// Re-exports for ergonomic use
pub use data::{
  BoxFuture, DataLoader, GetDataCtx, RouteExportRecord, SharedDataEntry, partition_route_data,
};
pub use document::{
  BootstrapPayload, DEFAULT_DOCUMENT, DocumentParts, HeadMeta, RenderContext, RenderOutput,
  SlotTemplate, Template, assemble_document,
};
pub use errors::{BuildError, ErrorKind};
pub use escape::{ascii_escape_json, escape_script_content};
pub use hash::{content_hash, fnv1a_64};
pub use hooks::HookChain;
pub use paths::{CleanSlashes, clean_slashes, is_absolute_url, make_path_absolute, path_join};
pub use route::{NormalizeOptions, Normalized, NormalizedRoute, RouteNode, normalize_routes};
pub use sitemap::{SitemapEntry, generate_sitemap_xml, sitemap_entries};
pub use table::{BUILTIN_NOT_FOUND_TEMPLATE, NOT_FOUND_PATH, RouteTable};
