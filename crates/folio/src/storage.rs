//! PDF object storage.
//!
//! Objects live in a directory tree under a root directory and are keyed
//! `{identity}/{uuid}.pdf`. Each stored object is published under a public URL: the configured
//! base URL joined with the key, or a `file://` URL of the stored file when no base URL is
//! configured.
//!
//! Every upload is validated before anything is written:
//! - the file name must carry a `.pdf` extension
//! - the content must start with the PDF signature `%PDF-`
//! - the content must not exceed [`MAX_UPLOAD_BYTES`]

use super::*;

/// Largest accepted upload, 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Signature every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Directory-backed object store.
#[derive(Debug, Clone)]
pub struct Storage {
  /// Directory all objects are stored under
  root:     PathBuf,
  /// Base of the public URLs handed out for stored objects
  base_url: Option<Url>,
}

impl Storage {
  /// Creates a store rooted at `root`. The directory is created on first write.
  pub fn new(root: impl AsRef<Path>, base_url: Option<Url>) -> Self {
    Self { root: root.as_ref().to_path_buf(), base_url }
  }

  /// The root directory.
  pub fn root(&self) -> &Path { &self.root }

  /// Checks that `file_name` and `bytes` form an acceptable PDF upload.
  ///
  /// # Errors
  ///
  /// [`FolioError::Upload`] naming the first rule that was broken.
  pub fn validate(file_name: &str, bytes: &[u8]) -> Result<()> {
    let is_pdf_name = Path::new(file_name)
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf_name {
      return Err(FolioError::Upload(format!("{file_name} is not a PDF file")));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
      return Err(FolioError::Upload(format!(
        "{file_name} is {} bytes, the limit is {MAX_UPLOAD_BYTES}",
        bytes.len()
      )));
    }
    if !bytes.starts_with(PDF_MAGIC) {
      return Err(FolioError::Upload(format!("{file_name} does not contain PDF data")));
    }
    Ok(())
  }

  /// Validates and stores a PDF for `owner`, returning its public URL.
  pub async fn put(&self, owner: &Identity, file_name: &str, bytes: &[u8]) -> Result<Url> {
    Self::validate(file_name, bytes)?;

    let namespace = namespace(owner);
    if namespace.is_empty() {
      return Err(FolioError::Upload(format!("{file_name} has no owner to be stored under")));
    }
    let key = format!("{namespace}/{}.pdf", uuid::Uuid::new_v4());
    let path = self.root.join(&key);
    if !path.starts_with(&self.root) {
      return Err(FolioError::Upload(format!("{key} escapes the storage root")));
    }
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| FolioError::Upload(format!("could not prepare {parent:?}: {e}")))?;
    }
    debug!("Writing {} bytes to {path:?}", bytes.len());
    tokio::fs::write(&path, bytes)
      .await
      .map_err(|e| FolioError::Upload(format!("could not write {path:?}: {e}")))?;

    self.public_url(&key, &path)
  }

  /// Public URL of the object stored under `key` at `path`.
  fn public_url(&self, key: &str, path: &Path) -> Result<Url> {
    match &self.base_url {
      Some(base) => {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
          base.set_path(&format!("{}/", base.path()));
        }
        Ok(base.join(key)?)
      },
      None => {
        let absolute = std::path::absolute(path)?;
        Url::from_file_path(&absolute)
          .map_err(|()| FolioError::Upload(format!("{absolute:?} has no file URL")))
      },
    }
  }
}

/// Directory name for an identity; anything outside `[A-Za-z0-9_-@]` becomes `_`.
fn namespace(owner: &Identity) -> String {
  owner
    .as_str()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '@') { c } else { '_' })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const PDF: &[u8] = b"%PDF-1.7\n%test\n";

  #[traced_test]
  #[tokio::test]
  async fn test_put_namespaces_by_identity() {
    let dir = tempdir().unwrap();
    let storage = Storage::new(dir.path(), None);
    let owner = Identity::from("teacher-7");

    let first = storage.put(&owner, "paper.pdf", PDF).await.unwrap();
    let second = storage.put(&owner, "paper.pdf", PDF).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(first.scheme(), "file");

    let stored = first.to_file_path().unwrap();
    assert!(stored.starts_with(std::path::absolute(dir.path().join("teacher-7")).unwrap()));
    assert_eq!(std::fs::read(stored).unwrap(), PDF);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_public_base_url() {
    let dir = tempdir().unwrap();
    let base = Url::parse("https://cdn.example.edu/papers").unwrap();
    let storage = Storage::new(dir.path(), Some(base));

    let url = storage.put(&Identity::from("u1"), "Draft.PDF", PDF).await.unwrap();
    assert!(url.as_str().starts_with("https://cdn.example.edu/papers/u1/"));
    assert!(url.as_str().ends_with(".pdf"));
  }

  #[test]
  fn test_validation_rules() {
    assert!(Storage::validate("paper.pdf", PDF).is_ok());
    assert!(matches!(Storage::validate("paper.docx", PDF), Err(FolioError::Upload(_))));
    assert!(matches!(Storage::validate("paper.pdf", b"PK\x03\x04"), Err(FolioError::Upload(_))));

    let mut oversized = PDF.to_vec();
    oversized.resize(MAX_UPLOAD_BYTES + 1, b' ');
    assert!(matches!(Storage::validate("paper.pdf", &oversized), Err(FolioError::Upload(_))));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_put_stays_under_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("objects");
    let storage = Storage::new(&root, None);

    let blank = storage.put(&Identity::from(""), "a.pdf", PDF).await;
    assert!(matches!(blank, Err(FolioError::Upload(_))));
    assert!(!root.exists());

    let url = storage.put(&Identity::from("/abs"), "a.pdf", PDF).await.unwrap();
    let stored = url.to_file_path().unwrap();
    assert!(stored.starts_with(std::path::absolute(root.join("_abs")).unwrap()));
  }

  #[test]
  fn test_namespace_strips_separators() {
    assert_eq!(namespace(&Identity::from("../etc/passwd")), "___etc_passwd");
  }
}
