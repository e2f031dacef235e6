//! Project database operations used by the front ends.

use std::path::Path;

use os_project::{AnalysisRecord, ProjectDatabase, ProjectRecord};
use serde::Serialize;
use tracing::info;

use crate::error::AppResult;
use crate::format::FileFormat;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: i64,
    pub name: String,
    pub seed: Option<String>,
    pub data_points: usize,
    pub complete: usize,
    pub failed: usize,
    pub results_are_invalid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectListing {
    pub project: ProjectRecord,
    pub analyses: Vec<AnalysisSummary>,
}

/// Creates the database, or brings an existing one up to the current schema.
pub fn init_project(path: &Path) -> AppResult<ProjectRecord> {
    let db = ProjectDatabase::open(path)?;
    let record = db.project_record()?;
    info!(path = %path.display(), schema = db.schema_version()?, "project ready");
    Ok(record)
}

/// Adds an analysis, registering `seed` as a file reference first.
pub fn add_analysis(path: &Path, name: &str, seed: Option<&Path>) -> AppResult<AnalysisRecord> {
    let mut db = ProjectDatabase::open(path)?;
    let seed_id = match seed {
        Some(seed) => {
            let file_type = FileFormat::from_extension(seed).map_or("Unknown", FileFormat::as_str);
            let absolute = std::path::absolute(seed)?;
            Some(db.add_file_reference(&absolute, file_type)?.base.id)
        }
        None => None,
    };
    Ok(db.create_analysis(name, seed_id)?)
}

pub fn list_project(path: &Path) -> AppResult<ProjectListing> {
    let db = ProjectDatabase::open(path)?;
    let mut analyses = Vec::new();
    for analysis in db.analyses()? {
        let seed = match analysis.seed_file_reference {
            Some(id) => Some(db.file_reference(id)?.path),
            None => None,
        };
        let points = db.data_points(analysis.base.id)?;
        let complete = points
            .iter()
            .filter(|p| p.status == os_project::DataPointStatus::Complete)
            .count();
        let failed = points
            .iter()
            .filter(|p| p.status == os_project::DataPointStatus::Failed)
            .count();
        analyses.push(AnalysisSummary {
            id: analysis.base.id,
            name: analysis.base.name,
            seed,
            data_points: points.len(),
            complete,
            failed,
            results_are_invalid: analysis.results_are_invalid,
        });
    }
    Ok(ProjectListing {
        project: db.project_record()?,
        analyses,
    })
}
