use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RecError, RecResult};
use crate::models::{ModelArtifact, VersionInfo};

const FILE_PREFIX: &str = "corr_matrix_v";
const FILE_EXTENSION: &str = "bin";

/// Directory of immutable, versioned model artifacts.
///
/// Each artifact lives in its own file named `corr_matrix_v{N}.bin`; versions
/// are strictly increasing integers starting at 1 and are never reused,
/// overwritten, or deleted by this store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> RecResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Highest version present on disk, or 0 when no artifact exists.
    pub fn latest_version(&self) -> u32 {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };

        entries
            .flatten()
            .filter_map(|entry| parse_version(&entry.file_name().to_string_lossy()))
            .max()
            .unwrap_or(0)
    }

    /// Persists the artifact under the next version, which is written back
    /// into the artifact before serialization. Refuses to overwrite an
    /// existing version file.
    ///
    /// The bytes are staged under a name the version scan ignores and
    /// renamed into place once fully written, so an interrupted write never
    /// lands under a version-counted name.
    pub fn save(&self, artifact: &mut ModelArtifact) -> RecResult<PathBuf> {
        let version = self.latest_version() + 1;
        artifact.version = version;

        let staging = self.staging_path_for(version);
        let path = self.path_for(version);

        if let Err(e) = write_artifact(&staging, artifact) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        if path.exists() {
            let _ = fs::remove_file(&staging);
            return Err(RecError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("refusing to overwrite {}", path.display()),
            )));
        }
        fs::rename(&staging, &path)?;

        let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        tracing::info!(version, size_bytes, path = %path.display(), "Artifact saved");

        Ok(path)
    }

    /// Loads one specific version, deriving the genre index when the
    /// artifact predates it.
    pub fn load(&self, version: u32) -> RecResult<ModelArtifact> {
        let path = self.path_for(version);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RecError::NotFound(version));
            }
            Err(e) => return Err(e.into()),
        };

        let mut artifact: ModelArtifact = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| RecError::CorruptArtifact {
                version,
                reason: e.to_string(),
            })?;

        if artifact.version != version {
            return Err(RecError::CorruptArtifact {
                version,
                reason: format!("file claims version {}", artifact.version),
            });
        }
        if artifact.items.is_empty() {
            return Err(RecError::CorruptArtifact {
                version,
                reason: "empty catalog".to_string(),
            });
        }

        artifact.ensure_genre_index();
        Ok(artifact)
    }

    /// All versions on disk with their file sizes, ascending.
    pub fn list_versions(&self) -> RecResult<Vec<VersionInfo>> {
        let mut versions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Some(version) = parse_version(&entry.file_name().to_string_lossy()) else {
                continue;
            };
            versions.push(VersionInfo {
                version,
                path: entry.path(),
                size_bytes: entry.metadata()?.len(),
            });
        }
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    fn path_for(&self, version: u32) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", FILE_PREFIX, version, FILE_EXTENSION))
    }

    fn staging_path_for(&self, version: u32) -> PathBuf {
        self.dir
            .join(format!(".{}{}.{}.tmp", FILE_PREFIX, version, FILE_EXTENSION))
    }
}

fn write_artifact(path: &Path, artifact: &ModelArtifact) -> RecResult<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, artifact)?;
    writer.flush()?;
    Ok(())
}

/// Extracts the version from an artifact file name, ignoring anything that
/// does not follow the naming convention.
fn parse_version(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(&format!(".{}", FILE_EXTENSION))?
        .parse()
        .ok()
}
