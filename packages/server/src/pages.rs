//! Compile-time registry of marketing pages.
//!
//! Page definitions live as TOML under `pages/` and are embedded with
//! `include_str!`, so the binary serves them without touching the disk.

use std::collections::BTreeMap;

use sylithe_server_models::{Page, PageGroup};

use crate::SiteError;

macro_rules! page_source {
    ($file:literal) => {
        ($file, include_str!(concat!("../pages/", $file)))
    };
}

const PAGE_SOURCES: &[(&str, &str)] = &[
    page_source!("home.toml"),
    page_source!("platform.toml"),
    page_source!("solutions.toml"),
    page_source!("solutions/carbon-mapping.toml"),
    page_source!("solutions/dynamic-baselines.toml"),
    page_source!("solutions/leakage-monitoring.toml"),
    page_source!("solutions/transparent-reporting.toml"),
    page_source!("methodology/lulc.toml"),
    page_source!("methodology/chm.toml"),
    page_source!("methodology/dcab.toml"),
    page_source!("methodology/agb.toml"),
    page_source!("insights/carbon-accounting.toml"),
];

/// All pages keyed by slug.
#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: BTreeMap<String, Page>,
}

impl PageRegistry {
    /// Parses every embedded page definition.
    ///
    /// # Errors
    ///
    /// * If a definition is not valid TOML for a [`Page`]
    /// * If two definitions share a slug
    pub fn load() -> Result<Self, SiteError> {
        let mut pages = BTreeMap::new();

        for (file, source) in PAGE_SOURCES {
            let page: Page = toml::from_str(source).map_err(|source| SiteError::Page {
                file: (*file).to_string(),
                source,
            })?;

            log::debug!("Registered page /{} from {file}", page.slug);

            if let Some(previous) = pages.insert(page.slug.clone(), page) {
                return Err(SiteError::DuplicateSlug {
                    slug: previous.slug,
                });
            }
        }

        Ok(Self { pages })
    }

    /// Looks up a page by request path. Leading and trailing slashes are
    /// ignored, so `/platform/` finds `platform`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Page> {
        self.pages.get(path.trim_matches('/'))
    }

    /// Pages in one navigation group, in slug order.
    pub fn group(&self, group: PageGroup) -> impl Iterator<Item = &Page> {
        self.pages.values().filter(move |page| page.group == group)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
