use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Deserialize};

/// client visible, root relative path of a file or folder.
///
/// always starts with a single `/` and never ends with one except for the
/// root itself. no normalization of `..` segments is performed; the segments
/// are stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualPath(String);

impl VirtualPath {
    pub fn root() -> Self {
        VirtualPath(String::from("/"))
    }

    /// builds a path from client supplied input.
    ///
    /// an empty string becomes the root. a missing leading separator is
    /// added and a trailing separator is dropped.
    pub fn from_request<G>(given: G) -> Self
    where
        G: AsRef<str>
    {
        let given_ref = given.as_ref();

        if given_ref.is_empty() || given_ref == "/" {
            return Self::root();
        }

        let mut rtn = String::with_capacity(given_ref.len() + 1);

        if !given_ref.starts_with('/') {
            rtn.push('/');
        }

        rtn.push_str(given_ref.trim_end_matches('/'));

        if rtn.is_empty() {
            return Self::root();
        }

        VirtualPath(rtn)
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// the path without its leading separator, suitable for joining onto a
    /// physical root
    pub fn relative(&self) -> &str {
        self.0.trim_start_matches('/')
    }

    pub fn join<N>(&self, name: N) -> Self
    where
        N: AsRef<str>
    {
        let name_ref = name.as_ref();

        if self.is_root() {
            VirtualPath(format!("/{name_ref}"))
        } else {
            VirtualPath(format!("{}/{name_ref}", self.0))
        }
    }

    pub fn parent(&self) -> Self {
        if self.is_root() {
            return Self::root();
        }

        match self.0.rfind('/') {
            Some(0) | None => Self::root(),
            Some(index) => VirtualPath(self.0[..index].to_owned())
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }

        self.0.rfind('/').map(|index| &self.0[(index + 1)..])
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;

        name.rfind('.').map(|index| &name[index..])
    }

    pub fn id(&self) -> FileId {
        FileId::encode(self)
    }
}

impl std::fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// opaque handle used in urls for a file or folder.
///
/// a reversible base64 encoding of the virtual path. it is an obfuscation,
/// not an access control boundary, and it changes whenever the entry is
/// renamed or moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

#[derive(Debug, thiserror::Error)]
pub enum InvalidFileId {
    #[error("identifier is not valid base64")]
    NotBase64,

    #[error("identifier does not decode to valid utf-8")]
    NotUtf8,
}

impl FileId {
    pub fn encode(path: &VirtualPath) -> Self {
        FileId(STANDARD.encode(path.as_str().as_bytes()))
    }

    pub fn decode(&self) -> Result<VirtualPath, InvalidFileId> {
        let bytes = STANDARD.decode(self.0.as_bytes())
            .map_err(|_| InvalidFileId::NotBase64)?;
        let decoded = String::from_utf8(bytes)
            .map_err(|_| InvalidFileId::NotUtf8)?;

        Ok(VirtualPath::from_request(decoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_request_normalizes_input() {
        assert_eq!(VirtualPath::from_request("").as_str(), "/");
        assert_eq!(VirtualPath::from_request("/").as_str(), "/");
        assert_eq!(VirtualPath::from_request("Docs").as_str(), "/Docs");
        assert_eq!(VirtualPath::from_request("/Docs/").as_str(), "/Docs");
    }

    #[test]
    fn join_and_parent_round_trip() {
        let root = VirtualPath::root();
        let docs = root.join("Docs");
        let report = docs.join("report.pdf");

        assert_eq!(docs.as_str(), "/Docs");
        assert_eq!(report.as_str(), "/Docs/report.pdf");
        assert_eq!(report.parent(), docs);
        assert_eq!(docs.parent(), root);
        assert_eq!(root.parent(), root);
    }

    #[test]
    fn file_name_and_extension() {
        let report = VirtualPath::from_request("/Docs/report.pdf");

        assert_eq!(report.file_name(), Some("report.pdf"));
        assert_eq!(report.extension(), Some(".pdf"));
        assert_eq!(VirtualPath::root().file_name(), None);
        assert_eq!(VirtualPath::from_request("/Docs/README").extension(), None);
    }

    #[test]
    fn file_id_encodes_the_path() {
        let path = VirtualPath::from_request("/Docs/report.pdf");
        let id = path.id();

        assert_eq!(id.decode().unwrap(), path);
    }

    #[test]
    fn file_id_decode_rejects_garbage() {
        let not_base64 = FileId(String::from("!!not-base64!!"));

        assert!(matches!(not_base64.decode(), Err(InvalidFileId::NotBase64)));

        let not_utf8 = FileId(STANDARD.encode([0xff, 0xfe, 0x80]));

        assert!(matches!(not_utf8.decode(), Err(InvalidFileId::NotUtf8)));
    }

    #[test]
    fn relative_strips_single_leading_separator() {
        assert_eq!(VirtualPath::from_request("/Docs/report.pdf").relative(), "Docs/report.pdf");
        assert_eq!(VirtualPath::root().relative(), "");
    }
}
