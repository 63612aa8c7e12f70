//! Diagnostic report about the layout of a SOFA file.
//!
//! Inspection never fails: anything that goes wrong is folded into the report
//! as text.

use crate::reader::{
    dataset_info, FieldInfo, SofaFile, DATA_IR, DATA_SAMPLING_RATE, EXPECTED_FIELDS,
};
use crate::Error;

use std::fmt;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub enum FieldStatus {
    Present(FieldInfo),
    /// Not at the top level, but nested in the `Data` group
    InDataGroup,
    Missing,
    Unreadable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldReport {
    pub name: &'static str,
    pub status: FieldStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub keys: Result<Vec<String>, String>,
    pub fields: Vec<FieldReport>,
    /// First element, formatted by its stored type
    pub sampling_rate: Option<Result<String, String>>,
    /// Every dataset and unreadable member in the file by full path, when
    /// requested
    pub datasets: Vec<(String, Result<FieldInfo, String>)>,
}

impl Report {
    fn collect(sofa: &SofaFile, all: bool) -> Report {
        let keys = sofa.field_names().map_err(|e| e.to_string());

        let fields = EXPECTED_FIELDS
            .iter()
            .map(|&name| FieldReport {
                name,
                status: field_status(sofa, name),
            })
            .collect();

        let sampling_rate = sofa
            .has_field(DATA_SAMPLING_RATE)
            .then(|| sofa.sampling_rate_literal().map_err(|e| e.to_string()));

        let mut datasets = Vec::new();
        if all {
            walk(sofa.root(), &mut datasets);
        }

        Report {
            keys,
            fields,
            sampling_rate,
            datasets,
        }
    }
}

/// Where some writers put the impulse responses instead of `Data.IR`.
const NESTED_IR: [&str; 2] = ["Data/IR", "Data/Data.IR"];

fn field_status(sofa: &SofaFile, name: &str) -> FieldStatus {
    if sofa.has_field(name) {
        return match sofa.field_info(name) {
            Ok(info) => FieldStatus::Present(info),
            Err(e) => FieldStatus::Unreadable(e.to_string()),
        };
    }

    if name == DATA_IR && NESTED_IR.iter().any(|path| sofa.root().link_exists(path)) {
        return FieldStatus::InDataGroup;
    }

    FieldStatus::Missing
}

/// Records failures next to the entries that did read; never stops early.
fn walk(group: &hdf5::Group, out: &mut Vec<(String, Result<FieldInfo, String>)>) {
    let prefix = group.name();
    let prefix = prefix.trim_end_matches('/');

    let names = match group.member_names() {
        Ok(names) => names,
        Err(e) => {
            out.push((format!("{}/", prefix), Err(e.to_string())));
            return;
        }
    };

    for name in names {
        let path = format!("{}/{}", prefix, name);

        if let Ok(dataset) = group.dataset(&name) {
            out.push((path, dataset_info(&dataset).map_err(|e| e.to_string())));
            continue;
        }

        match group.group(&name) {
            Ok(child) => walk(&child, out),
            Err(e) => out.push((path, Err(e.to_string()))),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.keys {
            Ok(keys) => writeln!(f, "Keys: {:?}", keys)?,
            Err(e) => writeln!(f, "Keys: {}", e)?,
        }

        for field in &self.fields {
            match &field.status {
                FieldStatus::Present(info) => writeln!(f, "{} shape: {}", field.name, info)?,
                FieldStatus::InDataGroup => writeln!(f, "{} is in Data group", field.name)?,
                FieldStatus::Missing => writeln!(f, "{}: missing", field.name)?,
                FieldStatus::Unreadable(e) => writeln!(f, "{}: {}", field.name, e)?,
            }
        }

        match &self.sampling_rate {
            Some(Ok(fs)) => writeln!(f, "SampleRate via key: {}", fs)?,
            Some(Err(e)) => writeln!(f, "SampleRate via key: {}", e)?,
            None => (),
        }

        for (path, info) in &self.datasets {
            match info {
                Ok(info) => writeln!(f, "{}: {}", path, info)?,
                Err(e) => writeln!(f, "{}: unreadable, {}", path, e)?,
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Inspector {
    all: bool,
}

impl Inspector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Also list every dataset in the file, recursively. Default value is
    /// `false`.
    pub fn all(&mut self, all: bool) -> &mut Self {
        self.all = all;
        self
    }

    pub fn report<P: AsRef<Path>>(&self, path: P) -> Result<Report, Error> {
        let sofa = SofaFile::open(path)?;
        Ok(Report::collect(&sofa, self.all))
    }

    /// Print the report for `path` to stdout, or the error that prevented
    /// opening the file.
    pub fn run<P: AsRef<Path>>(&self, path: P) {
        match self.report(path) {
            Ok(report) => print!("{}", report),
            Err(e) => println!("Error: {}", e),
        }
    }
}

/// Print a report for `path` with the default options.
///
/// ~~~no_run
/// sofa2json::inspect("MIT_KEMAR_Normal.sofa");
/// ~~~
pub fn inspect<P: AsRef<Path>>(path: P) {
    Inspector::new().run(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SOURCE_POSITION;
    use crate::test_utils::{scenario, write_sofa, SofaFixture};

    #[test]
    fn reports_expected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.sofa");
        write_sofa(&path, &scenario()).unwrap();

        let report = Inspector::new().report(&path).unwrap();

        assert_eq!(
            report.keys.clone().unwrap(),
            vec![DATA_IR, DATA_SAMPLING_RATE, SOURCE_POSITION]
        );
        assert_eq!(report.sampling_rate, Some(Ok("44100.0".to_owned())));
        assert!(report.datasets.is_empty());

        let text = report.to_string();
        assert!(text.contains("Data.IR shape: (2, 2, 4) float64"));
        assert!(text.contains("SourcePosition shape: (2, 3) float64"));
        assert!(text.contains("Data.SamplingRate shape: (1,) float64"));
        assert!(text.contains("SampleRate via key: 44100"));
    }

    #[test]
    fn reports_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.sofa");
        write_sofa(
            &path,
            &SofaFixture {
                ir: None,
                sampling_rate: None,
                ..scenario()
            },
        )
        .unwrap();

        let report = Inspector::new().report(&path).unwrap();

        assert_eq!(report.fields[0].status, FieldStatus::Missing);
        assert_eq!(report.sampling_rate, None);
        assert!(report.to_string().contains("Data.IR: missing"));
    }

    #[test]
    fn finds_nested_ir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested.sofa");

        let file = hdf5::File::create(&path).unwrap();
        let data = file.create_group("Data").unwrap();
        data.new_dataset::<f32>()
            .shape((1, 2, 2))
            .create("IR")
            .unwrap()
            .write_raw(&[0.5f32, 0.25, -0.5, -0.25])
            .unwrap();
        drop(data);
        drop(file);

        let report = Inspector::new().all(true).report(&path).unwrap();

        assert_eq!(report.fields[0].status, FieldStatus::InDataGroup);
        assert_eq!(report.datasets.len(), 1);
        assert_eq!(report.datasets[0].0, "/Data/IR");
        assert_eq!(report.datasets[0].1.as_ref().unwrap().dtype, "float32");

        let text = report.to_string();
        assert!(text.contains("Data.IR is in Data group"));
        assert!(text.contains("/Data/IR: (1, 2, 2) float32"));
    }

    #[test]
    fn finds_ir_under_its_full_name_in_data_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested.sofa");

        let file = hdf5::File::create(&path).unwrap();
        file.create_group("Data")
            .unwrap()
            .new_dataset::<f64>()
            .shape((1, 2, 1))
            .create("Data.IR")
            .unwrap();
        drop(file);

        let report = Inspector::new().report(&path).unwrap();
        assert_eq!(report.fields[0].status, FieldStatus::InDataGroup);
    }

    #[test]
    fn unreadable_member_keeps_rest_of_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dangling.sofa");
        write_sofa(&path, &scenario()).unwrap();

        let file = hdf5::File::open_rw(&path).unwrap();
        file.link_soft("/does/not/exist", "Dangling").unwrap();
        drop(file);

        let report = Inspector::new().all(true).report(&path).unwrap();

        assert!(report.keys.as_ref().unwrap().contains(&"Dangling".to_owned()));
        assert!(matches!(report.fields[0].status, FieldStatus::Present(_)));
        assert_eq!(report.sampling_rate, Some(Ok("44100.0".to_owned())));

        let dangling = report
            .datasets
            .iter()
            .find(|(path, _)| path == "/Dangling")
            .unwrap();
        assert!(dangling.1.is_err());

        let text = report.to_string();
        assert!(text.contains("/Dangling: unreadable"));
        assert!(text.contains("/Data.IR: (2, 2, 4) float64"));
        assert!(text.contains("/SourcePosition: (2, 3) float64"));
    }

    #[test]
    fn unreadable_file_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.sofa");
        std::fs::write(&path, b"not an hdf5 file").unwrap();

        assert!(Inspector::new().report(&path).is_err());

        inspect(&path);
        inspect(dir.path().join("missing.sofa"));
    }
}
