use crate::entities::dynamic_string::StringPool;
use crate::entities::spell_definitions::seed_builtin_spells;
use crate::entities::spell_templates::resolve_templates;
use crate::entities::spells::{SpellDefinition, SpellId, SpellTable};
use crate::error::SpellError;
use crate::scripting::script::read_script_text;
use crate::telemetry::logging;
use crate::world::spells_dat::{parse_spells_dat, SPELLS_FILE_NAME};
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use sha1::{Digest, Sha1};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellSource {
    File { path: PathBuf, digest: String },
    Builtin,
}

impl fmt::Display for SpellSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellSource::File { path, digest } => write!(f, "{} (sha1 {})", path.display(), digest),
            SpellSource::Builtin => write!(f, "builtin spells"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: SpellSource,
    pub blocks: usize,
    pub valid: usize,
    pub templated: usize,
    /// False when a reload found the same source as the published table.
    pub changed: bool,
}

pub fn source_digest(content: &[u8]) -> String {
    let mut sha1 = Sha1::new();
    sha1.update(content);
    BASE64_ENGINE.encode(sha1.finalize())
}

/// Builds a resolved table from `<data_dir>/spells.dat`, or from the
/// builtin list when that file does not exist.
pub fn build_spell_table(
    data_dir: &Path,
    pool: &mut StringPool,
) -> Result<(SpellTable, LoadReport), SpellError> {
    let path = data_dir.join(SPELLS_FILE_NAME);
    let mut table = SpellTable::new();
    let (source, blocks) = if path.is_file() {
        logging::log_game(&format!("InitSpells: loading spells from {}", path.display()));
        let content = read_script_text(&path)?;
        let blocks = parse_spells_dat(&path.display().to_string(), &content, &mut table, pool)?;
        let digest = source_digest(content.as_bytes());
        (SpellSource::File { path, digest }, blocks)
    } else {
        logging::log_game(&format!(
            "InitSpells: {} not found, using builtin spells",
            path.display()
        ));
        seed_builtin_spells(&mut table)?;
        (SpellSource::Builtin, table.valid_count())
    };
    let templated = resolve_templates(&mut table)?;
    let report = LoadReport {
        source,
        blocks,
        valid: table.valid_count(),
        templated,
        changed: true,
    };
    Ok((table, report))
}

/// The server's spell list. Lookups read an immutable snapshot; `init`
/// builds a complete new table and publishes it in one step, so a failed
/// load leaves the previous table in place.
#[derive(Debug)]
pub struct SpellRegistry {
    data_dir: PathBuf,
    current: RwLock<Arc<SpellTable>>,
    // Held for the whole of a load, which also keeps reloads serialized.
    loader: Mutex<LoaderState>,
}

// Each load interns into its own pool, so comments of a replaced table are
// released once its last snapshot is dropped.
#[derive(Debug, Default)]
struct LoaderState {
    source: Option<SpellSource>,
}

impl SpellRegistry {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            current: RwLock::new(Arc::new(SpellTable::new())),
            loader: Mutex::new(LoaderState::default()),
        }
    }

    pub fn init(&self) -> Result<LoadReport, SpellError> {
        let mut loader = self.loader.lock().map_err(|_| SpellError::LockPoisoned)?;
        let mut pool = StringPool::new();
        let (table, mut report) = match build_spell_table(&self.data_dir, &mut pool) {
            Ok(built) => built,
            Err(err) => {
                logging::log_error(&format!("InitSpells: load failed: {}", err));
                return Err(err);
            }
        };
        report.changed = loader.source.as_ref() != Some(&report.source);
        {
            let mut current = self.current.write().map_err(|_| SpellError::LockPoisoned)?;
            *current = Arc::new(table);
        }
        loader.source = Some(report.source.clone());
        logging::log_game(&format!(
            "InitSpells: {} spells from {} ({} templated{})",
            report.valid,
            report.source,
            report.templated,
            if report.changed { "" } else { ", unchanged" }
        ));
        Ok(report)
    }

    pub fn reload(&self) -> Result<LoadReport, SpellError> {
        self.init()
    }

    pub fn snapshot(&self) -> Arc<SpellTable> {
        match self.current.read() {
            Ok(current) => Arc::clone(&current),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn is_valid(&self, id: SpellId) -> bool {
        self.snapshot().is_valid(id)
    }

    pub fn get(&self, id: SpellId) -> Option<SpellDefinition> {
        self.snapshot().get(id).cloned()
    }

    pub fn effect(&self, id: SpellId, default: i32) -> i32 {
        self.snapshot().effect(id, default)
    }

    pub fn animation(&self, id: SpellId, default: i32) -> i32 {
        self.snapshot().animation(id, default)
    }
}
