//! Canvas configuration loaded from JSON.
//!
//! Every field is optional in the file; missing fields take their defaults.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    canvas::grid::GridStyle,
    foundation::error::{SegError, SegResult},
    paint::style::PaintStyle,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options for a [`crate::canvas::session::SegmentCanvas`].
pub struct CanvasOpts {
    /// Paint constants.
    pub paint: PaintStyle,
    /// Grid look.
    pub grid: GridStyle,
    /// Show the grid once the partition is ready.
    pub grid_on: bool,
    /// Queue offsets until [`crate::canvas::session::SegmentCanvas::flush_offsets`] instead of
    /// applying each one as it arrives.
    pub batch_offsets: bool,
}

impl CanvasOpts {
    /// Parse options from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> SegResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| SegError::validation(format!("parse canvas options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SegResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SegError::validation(format!("open canvas options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check paint and grid values.
    pub fn validate(&self) -> SegResult<()> {
        self.paint.validate()?;
        self.grid.validate()
    }
}
