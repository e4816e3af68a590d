//! Accepted video container formats

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Video container accepted as pipeline input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaContainer {
    Mp4,
    Mov,
    Avi,
}

impl MediaContainer {
    pub const ALL: [MediaContainer; 3] = [Self::Mp4, Self::Mov, Self::Avi];

    /// Match a file extension, ignoring case and a leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "mov" => Some(Self::Mov),
            "avi" => Some(Self::Avi),
            _ => None,
        }
    }

    /// Determine the container from a path or file name, rejecting anything else
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "Unsupported video container for '{}'. Supported: mp4, mov, avi",
                    path.display()
                ))
            })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mov => "mov",
            Self::Avi => "avi",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Mov => "video/quicktime",
            Self::Avi => "video/x-msvideo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_case_insensitive() {
        assert_eq!(
            MediaContainer::from_path(Path::new("/tmp/Clip.MOV")).ok(),
            Some(MediaContainer::Mov)
        );
        assert_eq!(
            MediaContainer::from_path(Path::new("lecture.mp4")).ok(),
            Some(MediaContainer::Mp4)
        );
    }

    #[test]
    fn test_from_path_rejects_other_formats() {
        let err = MediaContainer::from_path(Path::new("movie.mkv")).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("Unsupported video container"));

        assert!(MediaContainer::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(MediaContainer::Mp4.mime_type(), "video/mp4");
        assert_eq!(MediaContainer::Mov.mime_type(), "video/quicktime");
        assert_eq!(MediaContainer::Avi.mime_type(), "video/x-msvideo");
    }

    #[test]
    fn test_extension_round_trip() {
        for container in MediaContainer::ALL {
            assert_eq!(
                MediaContainer::from_extension(container.extension()),
                Some(container)
            );
        }
        assert_eq!(MediaContainer::from_extension(".avi"), Some(MediaContainer::Avi));
    }
}
