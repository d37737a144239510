use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::subtitle_processor::{self, ParseOptions, SubtitleFile};

// @module: File loading utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Open and parse a subtitle file.
    ///
    /// The handle is dropped before returning, whether parsing succeeded or not.
    pub fn load_subtitles<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<SubtitleFile, AppError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AppError::File(format!("cannot open {}: {}", path.display(), e)))?;

        debug!("Parsing subtitle file: {}", path.display());
        let subtitles = subtitle_processor::parse_subtitles(BufReader::new(file), options)?;

        Ok(subtitles)
    }
}
