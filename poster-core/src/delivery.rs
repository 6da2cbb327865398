use crate::types::ExportArtifact;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::{Level, event};

/// Hands a finished artifact to the user.
pub trait ArtifactSink {
    fn deliver(&self, artifact: &ExportArtifact) -> anyhow::Result<()>;
}

/// Writes artifacts into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.dir.join(&artifact.filename)
    }

    fn ensure_dir(&self) -> anyhow::Result<()> {
        let exists = Path::new(&self.dir)
            .try_exists()
            .with_context(|| format!("Failed to check for {}", self.dir.display()))?;

        if !exists {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create {}", self.dir.display()))?;
            event!(Level::INFO, "Directory {} created", self.dir.display());
        }

        Ok(())
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> anyhow::Result<()> {
        self.ensure_dir()?;

        let path = self.path_for(artifact);
        fs::write(&path, &artifact.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        event!(
            Level::INFO,
            "Saved {} ({}) to {}",
            artifact.filename,
            artifact.mime_type,
            path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_writes_into_new_directory() {
        let dir = std::env::temp_dir().join(format!("poster-sink-{}", std::process::id()));
        let sink = DirectorySink::new(dir.join("nested"));

        let artifact = ExportArtifact {
            width: 1,
            height: 1,
            bytes: vec![1, 2, 3],
            mime_type: "image/png",
            filename: String::from("oslo-1x1.png"),
        };

        sink.deliver(&artifact).unwrap();
        // A second delivery reuses the directory.
        sink.deliver(&artifact).unwrap();

        let written = fs::read(dir.join("nested").join("oslo-1x1.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        fs::remove_dir_all(dir).unwrap();
    }
}
