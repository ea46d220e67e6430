//! Export types for handing a filtration pair to an external reduction.
//!
//! The reduction settings are carried through untouched; this crate never
//! interprets them.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::operations::pair::FiltrationPair;
use crate::topology::Filtration;

/// Settings for the external kernel/image/cokernel reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReductionParams {
    /// Worker threads used by the reduction.
    pub n_threads: usize,
    /// Whether the reduction reports progress.
    pub verbose: bool,
    /// Request the kernel diagram.
    pub kernel: bool,
    /// Request the image diagram.
    pub image: bool,
    /// Request the cokernel diagram.
    pub cokernel: bool,
}

impl Default for ReductionParams {
    fn default() -> Self {
        Self {
            n_threads: 1,
            verbose: false,
            kernel: true,
            image: true,
            cokernel: true,
        }
    }
}

/// A filtration pair ready for the reduction, with its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairExport {
    pub params: ReductionParams,
    /// Sub-complex filtration.
    pub l: Filtration,
    /// Full filtration with `l` as prefix.
    pub k: Filtration,
    /// `L` id of each `K` entry, `null` outside the prefix.
    pub k_to_l: Vec<Option<usize>>,
}

impl PairExport {
    #[must_use]
    pub fn new(pair: FiltrationPair, params: ReductionParams) -> Self {
        Self {
            params,
            l: pair.l,
            k: pair.k,
            k_to_l: pair.k_to_l,
        }
    }

    /// Writes the export as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the writer fails.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(ExportError::from)?;
        writeln!(writer).map_err(ExportError::from)?;
        Ok(())
    }

    /// Reads an export previously written by [`PairExport::write_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid export.
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        let export: Self = serde_json::from_reader(reader).map_err(ExportError::from)?;
        Ok(export)
    }
}
