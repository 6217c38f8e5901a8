//! Template loading utilities

use super::{Template, TemplateCategory};
use crate::error::CvError;
use crate::traits::TemplateStore;
use crate::utils::image::ImageUtils;
use crate::Result;
use anyhow::Context;
use image::GrayImage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Template loader reading `<root>/images/<name>.<ext>` and
/// `<root>/locations/<name>.<ext>`
pub struct TemplateLoader {
    template_dirs: Vec<PathBuf>,
    supported_extensions: Vec<String>,
}

impl TemplateLoader {
    /// Create new template loader
    pub fn new() -> Self {
        Self {
            template_dirs: Vec::new(),
            supported_extensions: vec![
                "webp".to_string(),
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
            ],
        }
    }

    /// Add template root directory
    pub fn add_template_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.template_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Load template by name, `None` when no file matches
    pub fn load_template(&self, name: &str, category: TemplateCategory) -> Result<Option<Template>> {
        for ext in &self.supported_extensions {
            let candidate = format!("{}.{}", name, ext);

            if let Some(path) = self.find_template_file(category, &candidate) {
                let image = ImageUtils::load_grayscale(&path)
                    .with_context(|| format!("Failed to load template: {:?}", path))?;

                return Ok(Some(Template::new(name, category, image)));
            }
        }

        Ok(None)
    }

    /// Find template file in directories, falling back to a case-insensitive scan
    fn find_template_file(&self, category: TemplateCategory, candidate: &str) -> Option<PathBuf> {
        for root in &self.template_dirs {
            let dir = root.join(category.folder());
            let path = dir.join(candidate);
            if path.exists() {
                return Some(path);
            }

            if let Ok(entries) = fs::read_dir(&dir) {
                for entry in entries.flatten() {
                    let file_name = entry.file_name();
                    if file_name.to_string_lossy().eq_ignore_ascii_case(candidate) {
                        return Some(entry.path());
                    }
                }
            }
        }

        None
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore for TemplateLoader {
    fn get(&self, name: &str, category: TemplateCategory) -> Result<Template> {
        self.load_template(name, category)?.ok_or_else(|| {
            CvError::TemplateNotFound {
                name: name.to_string(),
                category,
            }
            .into()
        })
    }
}

/// In-memory template store
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<(String, TemplateCategory), GrayImage>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, category: TemplateCategory, image: GrayImage) {
        self.templates.insert((name.into(), category), image);
    }

    pub fn with_template(
        mut self,
        name: impl Into<String>,
        category: TemplateCategory,
        image: GrayImage,
    ) -> Self {
        self.insert(name, category, image);
        self
    }
}

impl TemplateStore for TemplateSet {
    fn get(&self, name: &str, category: TemplateCategory) -> Result<Template> {
        self.templates
            .get(&(name.to_string(), category))
            .map(|image| Template::new(name, category, image.clone()))
            .ok_or_else(|| {
                CvError::TemplateNotFound {
                    name: name.to_string(),
                    category,
                }
                .into()
            })
    }
}
