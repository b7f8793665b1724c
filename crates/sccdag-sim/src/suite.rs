//! The standard fixture suite: nine named datasets across three sizes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use sccdag_core::document::GraphDocument;

use crate::generator::{GeneratorConfig, GraphShape, generate_graph};

/// A named generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: &'static str,
    pub config: GeneratorConfig,
}

impl Dataset {
    /// File name the dataset is written under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    /// Generate this dataset's document.
    ///
    /// # Errors
    ///
    /// Propagates generator parameter errors.
    pub fn generate(&self) -> Result<GraphDocument> {
        generate_graph(&self.config).with_context(|| format!("Failed to generate {}", self.name))
    }
}

// (name, vertices, density, shape, source)
const SUITE: [(&str, usize, f64, GraphShape, usize); 9] = [
    ("small_cyclic", 8, 0.3, GraphShape::Cyclic, 0),
    ("small_dag", 10, 0.2, GraphShape::Dag, 0),
    ("small_multiple_scc", 7, 0.4, GraphShape::MultiScc, 3),
    ("medium_cyclic", 15, 0.25, GraphShape::Cyclic, 0),
    ("medium_dag", 18, 0.2, GraphShape::Dag, 2),
    ("medium_multiple_scc", 16, 0.35, GraphShape::MultiScc, 5),
    ("large_cyclic", 30, 0.2, GraphShape::Cyclic, 0),
    ("large_dag", 35, 0.15, GraphShape::Dag, 3),
    ("large_multiple_scc", 28, 0.3, GraphShape::MultiScc, 7),
];

/// The nine standard datasets. Dataset `i` is generated from `seed + i`.
#[must_use]
pub fn standard_suite(seed: u64) -> Vec<Dataset> {
    SUITE
        .iter()
        .zip(0_u64..)
        .map(|(&(name, vertices, density, shape, source), offset)| Dataset {
            name,
            config: GeneratorConfig {
                vertices,
                density,
                shape,
                source,
                seed: seed.wrapping_add(offset),
            },
        })
        .collect()
}

/// Generate the standard suite into `dir` as pretty JSON, creating the
/// directory if needed. Returns the written paths in suite order.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_suite(dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(SUITE.len());
    for dataset in standard_suite(seed) {
        let document = dataset.generate()?;
        let path = dir.join(dataset.file_name());
        let json = document
            .to_json_pretty()
            .with_context(|| format!("Failed to serialize {}", dataset.name))?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(
            dataset = dataset.name,
            vertices = document.n,
            edges = document.edges.len(),
            path = %path.display(),
            "dataset written"
        );
        written.push(path);
    }
    Ok(written)
}
