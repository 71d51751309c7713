use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::course::Course;
use crate::core::department::Department;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse roadmap at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid data directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("department '{id}' defined in both {first} and {second}")]
    DuplicateDepartment {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// One roadmap file as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Roadmap {
    pub fn department(&self) -> Department {
        Department::new(self.id.clone(), self.name.clone(), self.courses.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentEntry {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    pub courses: usize,
    pub credits: u32,
}

/// Every department found in a data directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    departments: BTreeMap<String, Department>,
    listing: Vec<DepartmentEntry>,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Result<&Department> {
        self.departments
            .get(id)
            .ok_or_else(|| DataError::UnknownDepartment(id.to_string()))
    }

    pub fn listing(&self) -> &[DepartmentEntry] {
        &self.listing
    }

    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.listing
            .iter()
            .filter_map(|entry| self.departments.get(&entry.id))
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    pub fn insert(&mut self, roadmap: Roadmap) {
        let department = roadmap.department();
        self.listing.retain(|entry| entry.id != roadmap.id);
        self.listing.push(DepartmentEntry {
            id: roadmap.id.clone(),
            label: roadmap.label.clone().unwrap_or_else(|| roadmap.name.clone()),
            pdf: roadmap.pdf.clone(),
            courses: department.courses.len(),
            credits: department.total_credits(),
        });
        self.departments.insert(roadmap.id, department);
    }
}

pub fn parse_roadmap(path: &Path, contents: &str) -> Result<Roadmap> {
    serde_yaml::from_str(contents).map_err(|source| DataError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_roadmap_file(path: &Path) -> Result<Roadmap> {
    let contents = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_roadmap(path, &contents)
}

/// Loads every `*.yaml` / `*.yml` roadmap in `dir`, in path order.
pub fn load_catalog(dir: &Path) -> Result<Catalog> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut paths: Vec<PathBuf> = Vec::new();
    for extension in ["yaml", "yml"] {
        let pattern = format!("{base}/*.{extension}");
        for entry in glob::glob(&pattern)?.flatten() {
            paths.push(entry);
        }
    }
    paths.sort();

    let mut catalog = Catalog::default();
    let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in paths {
        let roadmap = load_roadmap_file(&path)?;
        if let Some(first) = origins.get(&roadmap.id) {
            return Err(DataError::DuplicateDepartment {
                id: roadmap.id,
                first: first.clone(),
                second: path,
            });
        }
        tracing::debug!(path = %path.display(), department = %roadmap.id, "loaded roadmap");
        origins.insert(roadmap.id.clone(), path);
        catalog.insert(roadmap);
    }
    Ok(catalog)
}
