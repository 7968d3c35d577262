//! The identity triple mixed into every signature, and its derivation from
//! the conventional bank location
//! `.../<user_id>/Banks/<author_id>/<name>.SC2Bank`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{is_separator, Path};
use std::sync::LazyLock;

use crate::errors::BankError;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]-S2-[0-9]-[0-9]{6,7}$").expect("invalid regex"));
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)\.SC2Bank$").expect("invalid regex"));

/// Fully resolved signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Map author id, e.g. `1-S2-1-4337146`.
    pub author_id: String,
    /// Player id, e.g. `1-S2-1-4253458`.
    pub user_id: String,
    /// Bank name: the file name without `.SC2Bank`.
    pub name: String,
}

impl Identity {
    /// Builds an identity from its three fields.
    pub fn new(
        author_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            user_id: user_id.into(),
            name: name.into(),
        }
    }
}

/// Identity fields that may each be unknown.
///
/// Produced by [`inspect_path`] and used for caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialIdentity {
    /// Author id, if known.
    pub author_id: Option<String>,
    /// User id, if known.
    pub user_id: Option<String>,
    /// Bank name, if known.
    pub name: Option<String>,
}

impl PartialIdentity {
    /// A partial identity with every field supplied.
    pub fn new(
        author_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            author_id: Some(author_id.into()),
            user_id: Some(user_id.into()),
            name: Some(name.into()),
        }
    }

    /// True when all three fields are present.
    pub fn is_complete(&self) -> bool {
        self.author_id.is_some() && self.user_id.is_some() && self.name.is_some()
    }

    /// Fills every missing field from `fallback`; present fields win.
    pub fn or(self, fallback: PartialIdentity) -> PartialIdentity {
        PartialIdentity {
            author_id: self.author_id.or(fallback.author_id),
            user_id: self.user_id.or(fallback.user_id),
            name: self.name.or(fallback.name),
        }
    }

    /// Converts into an [`Identity`], failing if any field is still unknown.
    pub fn resolve(self) -> Result<Identity, BankError> {
        match (self.author_id, self.user_id, self.name) {
            (Some(author_id), Some(user_id), Some(name)) => Ok(Identity {
                author_id,
                user_id,
                name,
            }),
            (author_id, user_id, name) => {
                let fields = [
                    ("author_id", author_id.is_none()),
                    ("user_id", user_id.is_none()),
                    ("name", name.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, missing)| missing.then_some(field))
                .collect();
                Err(BankError::MissingIdentity { fields })
            }
        }
    }
}

impl From<Identity> for PartialIdentity {
    fn from(identity: Identity) -> Self {
        Self {
            author_id: Some(identity.author_id),
            user_id: Some(identity.user_id),
            name: Some(identity.name),
        }
    }
}

/// Derives whatever identity fields a bank's path reveals.
///
/// The author id is the last directory, the user id the third from last; both
/// are upper-cased before matching `N-S2-N-NNNNNN[N]`. The name is the file
/// name minus a case-insensitive `.SC2Bank` suffix. Fields that cannot be
/// derived are `None`; this never fails.
pub fn inspect_path<P: AsRef<Path>>(path: P) -> PartialIdentity {
    let lossy = path.as_ref().to_string_lossy();
    let path: &str = &lossy;
    let (directory, file_name) = match path.rfind(is_separator) {
        Some(index) => (
            path[..index].trim_end_matches(is_separator),
            &path[index + 1..],
        ),
        None => ("", path),
    };
    let segments: Vec<&str> = directory.split(is_separator).collect();

    let info = PartialIdentity {
        author_id: id_segment(&segments, 1),
        user_id: id_segment(&segments, 3),
        name: NAME_PATTERN
            .captures(file_name)
            .map(|captures| captures[1].to_owned()),
    };
    if !info.is_complete() {
        tracing::warn!(path = %path, ?info, "path does not reveal the full identity");
    }
    info
}

/// The `from_end`-th segment from the end, upper-cased, if it looks like an id.
fn id_segment(segments: &[&str], from_end: usize) -> Option<String> {
    let segment = segments.len().checked_sub(from_end).map(|i| segments[i])?;
    let upper = segment.to_uppercase();
    ID_PATTERN.is_match(&upper).then_some(upper)
}
