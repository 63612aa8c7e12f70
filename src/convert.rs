//! Conversion from a SOFA file to the `leaves` JSON document.

use crate::leaves::Leaves;
use crate::reader::{Hrtf, OpenOptions};
use crate::Error;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

const DEFAULT_PRETTY: bool = false;

#[derive(Clone, Debug)]
pub struct Converter {
    open_options: OpenOptions,
    pretty: bool,
}

impl Converter {
    pub fn new() -> Self {
        Default::default()
    }

    /// See [`OpenOptions::validate`]. Default value is `true`.
    pub fn validate(&mut self, validate: bool) -> &mut Self {
        self.open_options.validate(validate);
        self
    }

    /// Indent the output. Default value is `false`.
    pub fn pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Read `input` and write the `leaves` document to `output`.
    ///
    /// The document is written to a temporary file next to `output` and moved
    /// into place once complete, so `output` is either the full document or
    /// untouched.
    pub fn convert<P, Q>(&self, input: P, output: Q) -> Result<(), Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        log::info!("Converting {}...", input.display());

        let hrtf = self.open_options.open(input)?.read_hrtf()?;
        log::debug!(
            "read {} positions, {} samples per channel at {} Hz",
            hrtf.positions.len(),
            hrtf.responses.first().map_or(0, |pair| pair.left.len()),
            hrtf.sampling_rate
        );

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = temp_file_for(output, dir)?;
        self.write(&hrtf, BufWriter::new(tmp.as_file_mut()))?;
        tmp.persist(output).map_err(|e| e.error)?;

        log::info!("Saved to {}", output.display());
        Ok(())
    }

    /// Serialize `hrtf` as a `leaves` document into `writer`.
    pub fn write<W: Write>(&self, hrtf: &Hrtf, mut writer: W) -> Result<(), Error> {
        let leaves = Leaves::from_hrtf(hrtf);

        match self.pretty {
            true => serde_json::to_writer_pretty(&mut writer, &leaves)?,
            false => serde_json::to_writer(&mut writer, &leaves)?,
        }

        writer.flush()?;
        Ok(())
    }
}

/// Temporary file in `dir` that ends up with the mode `output` would have had
/// if written in place: the mode of the existing file, or the umask default.
fn temp_file_for(output: &Path, dir: &Path) -> Result<NamedTempFile, Error> {
    let mut builder = Builder::new();

    // the mode is passed to open(2), so the umask still applies
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let tmp = builder.tempfile_in(dir)?;

    if let Ok(metadata) = fs::metadata(output) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    Ok(tmp)
}

impl Default for Converter {
    fn default() -> Self {
        Converter {
            open_options: OpenOptions::new(),
            pretty: DEFAULT_PRETTY,
        }
    }
}

/// Convert `input` to `output` with the default options.
///
/// ~~~no_run
/// sofa2json::convert("MIT_KEMAR_Normal.sofa", "hrtf_kemar.json").unwrap();
/// ~~~
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<(), Error> {
    Converter::new().convert(input, output)
}
