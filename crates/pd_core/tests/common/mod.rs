#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pd_core::context::RequestContext;
use pd_core::error::AppError;
use pd_core::records::NamedEntity;
use pd_core::resolve::{EntityKind, EntityLister};

/// Canned listing collaborator that records each call it receives.
#[derive(Default)]
pub struct StubLister {
    pub services: Vec<NamedEntity>,
    pub teams: Vec<NamedEntity>,
    pub fail_with: Option<AppError>,
    pub calls: RefCell<Vec<(EntityKind, String, u32)>>,
}

impl StubLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, rows: &[(&str, &str)]) -> Self {
        self.services = rows.iter().map(|(id, name)| NamedEntity::new(*id, *name)).collect();
        self
    }

    pub fn with_teams(mut self, rows: &[(&str, &str)]) -> Self {
        self.teams = rows.iter().map(|(id, name)| NamedEntity::new(*id, *name)).collect();
        self
    }

    pub fn failing(mut self, err: AppError) -> Self {
        self.fail_with = Some(err);
        self
    }

    pub fn call_kinds(&self) -> Vec<EntityKind> {
        self.calls.borrow().iter().map(|(k, _, _)| *k).collect()
    }
}

impl EntityLister for StubLister {
    fn list_entities(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        query: &str,
        limit: u32,
    ) -> Result<Vec<NamedEntity>, AppError> {
        ctx.check()?;
        self.calls
            .borrow_mut()
            .push((kind, query.to_string(), limit));
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(match kind {
            EntityKind::Service => self.services.clone(),
            EntityKind::Team => self.teams.clone(),
        })
    }
}

pub fn production_services() -> StubLister {
    StubLister::new().with_services(&[
        ("SVCID1", "Production API"),
        ("SVCID2", "Production Database"),
        ("SVCID3", "Staging API"),
    ])
}

/// Every `.rs` file under the crate's `src/`, sorted.
pub fn crate_sources() -> Vec<PathBuf> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                walk(&path, out);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                out.push(path);
            }
        }
    }

    let mut out = Vec::new();
    walk(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut out);
    out.sort();
    out
}

/// Source files that mention any of `needles`, with the first needle found.
pub fn sources_containing(needles: &[&str]) -> Vec<(PathBuf, String)> {
    crate_sources()
        .into_iter()
        .filter_map(|path| {
            let text = fs::read_to_string(&path).unwrap_or_default();
            needles
                .iter()
                .find(|n| text.contains(*n))
                .map(|n| (path, n.to_string()))
        })
        .collect()
}
