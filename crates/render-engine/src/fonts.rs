//! Font discovery for headless rendering.

use std::sync::Arc;

use nitepost_common::RenderDefaults;

/// Generic family used when neither the requested nor the fallback family exists.
pub const GENERIC_FAMILY: &str = "sans-serif";

/// Shared font database plus family fallback rules.
#[derive(Clone)]
pub struct FontCatalog {
    db: Arc<fontdb::Database>,
    fallback: String,
}

impl FontCatalog {
    /// Build a catalog from configuration: system fonts and extra font directories.
    pub fn from_config(config: &RenderDefaults) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            if dir.is_dir() {
                db.load_fonts_dir(dir);
            } else {
                tracing::warn!(dir = %dir.display(), "Font directory does not exist");
            }
        }
        tracing::debug!(faces = db.len(), "Font catalog loaded");
        Self::from_database(db, config.fallback_font.clone())
    }

    /// Wrap an existing database.
    pub fn from_database(db: fontdb::Database, fallback: impl Into<String>) -> Self {
        Self {
            db: Arc::new(db),
            fallback: fallback.into(),
        }
    }

    /// A catalog with no faces. Text still lays out but renders nothing.
    pub fn empty() -> Self {
        Self::from_database(fontdb::Database::new(), nitepost_post_model::DEFAULT_FONT_FAMILY)
    }

    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.db.faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// Family to draw with: the requested one, the fallback, or the generic family.
    pub fn resolve_family(&self, requested: &str) -> String {
        if self.has_family(requested) {
            return requested.to_string();
        }
        if self.has_family(&self.fallback) {
            tracing::warn!(
                requested,
                fallback = %self.fallback,
                "Font family unavailable, using fallback"
            );
            return self.fallback.clone();
        }
        tracing::warn!(requested, "Font family unavailable, using generic family");
        GENERIC_FAMILY.to_string()
    }
}

impl std::fmt::Debug for FontCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCatalog")
            .field("faces", &self.db.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
