pub mod api;
pub mod community;
pub mod public;

use std::sync::Arc;

use crate::catalog::pages::{Catalogs, PageKind};
use crate::catalog::{CatalogFilter, LiveRegion};

/// Fresh per-request controller wired to its own live region.
pub(crate) fn page_filter(catalogs: &Catalogs, kind: PageKind) -> (CatalogFilter, Arc<LiveRegion>) {
    let live = Arc::new(LiveRegion::default());
    let filter = catalogs.filter(kind).with_announcer(live.clone());
    (filter, live)
}

/// Query values arrive untrimmed; blank means "not given".
pub(crate) fn given(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
