use crate::error::Error;
use common::context::ContextError;
use common::Document;
use eyre::WrapErr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default location of the configuration document, relative to the service root
pub const DEFAULT_PATH: &str = "cdk.json";

/// The configuration document on disk
///
/// Invocations must not overlap: there is no locking against another process
/// modifying the same file concurrently.
#[derive(Clone, Debug)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as shown to the user
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read and parse the document
    ///
    /// Either failure is fatal, every command needs the document.
    pub fn read(&self) -> Result<Document, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::new(
                    &format!("{} not found", self.path.display()),
                    Some("Please ensure you are in the root of your service directory."),
                ))
            }
            Err(e) => {
                log::error!("Can't read {:?}: {e:?}", self.path);

                return Err(Error::new(
                    &format!("Failed to read {}", self.path.display()),
                    Some(&e.to_string()),
                ));
            }
        };

        text.parse::<Document>()
            .inspect_err(|e| log::error!("Can't parse {:?}: {e:?}", self.path))
            .map_err(|e| {
                let title = match e {
                    ContextError::InvalidFlag { .. } => {
                        format!("Invalid context in {}", self.path.display())
                    }
                    _ => format!("Could not decode {}. Is it valid JSON?", self.path.display()),
                };

                Error::new(&title, Some(&e.to_string()))
            })
    }

    /// Read the document, transform it, and write it back
    ///
    /// The write only happens if the transformation changed the document, and it
    /// replaces the file as a whole: a failure leaves the previous content in place.
    pub fn update<T>(&self, transform: impl FnOnce(&mut Document) -> T) -> Result<T, Error> {
        let mut document = self.read()?;
        let original = document.clone();
        let result = transform(&mut document);

        if document == original {
            log::debug!("{:?} is unchanged, skipping the write", self.path);
            return Ok(result);
        }

        self.write(&document)?;
        Ok(result)
    }

    fn write(&self, document: &Document) -> Result<(), Error> {
        let written = document
            .to_pretty_string()
            .wrap_err("Failed to serialize the document")
            .and_then(|text| write_atomic(&self.path, &text));

        written.inspect_err(|e| log::error!("{e:?}")).map_err(|e| {
            Error::new(
                &format!("Error writing to {}", self.path.display()),
                Some(&format!("{e:#}")),
            )
        })
    }
}

/// Write to a sibling temp file first, then rename it over the target
///
/// The target keeps its permissions, and a symlink keeps pointing to the replaced file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> eyre::Result<()> {
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&temp_path, contents).wrap_err_with(|| format!("Can't write {temp_path:?}"))?;

    let replaced = fs::metadata(&path)
        .map_or(Ok(()), |metadata| fs::set_permissions(&temp_path, metadata.permissions()))
        .and_then(|_| fs::rename(&temp_path, &path));

    if let Err(e) = replaced {
        fs::remove_file(&temp_path).unwrap_or(());
        return Err(e).wrap_err_with(|| format!("Can't replace {path:?}"));
    }

    Ok(())
}
