use crate::reader::{DATA_IR, DATA_SAMPLING_RATE, SOURCE_POSITION};

use std::path::Path;

/// Contents of a synthetic SOFA file. `None` leaves the field out.
pub struct SofaFixture {
    pub sampling_rate: Option<f64>,
    pub positions: Vec<[f64; 3]>,
    /// `[left, right]` per measurement, all of the same length
    pub ir: Option<Vec<[Vec<f64>; 2]>>,
}

/// Two positions, four samples per channel, counting up from 1.
pub fn scenario() -> SofaFixture {
    SofaFixture {
        sampling_rate: Some(44100.0),
        positions: vec![[0.0, 0.0, 1.0], [90.0, 0.0, 1.0]],
        ir: Some(vec![
            [vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]],
            [vec![9.0, 10.0, 11.0, 12.0], vec![13.0, 14.0, 15.0, 16.0]],
        ]),
    }
}

pub fn write_sofa(path: &Path, fixture: &SofaFixture) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;

    if let Some(fs) = fixture.sampling_rate {
        file.new_dataset::<f64>()
            .shape(1)
            .create(DATA_SAMPLING_RATE)?
            .write_raw(&[fs])?;
    }

    let flat: Vec<f64> = fixture.positions.iter().flatten().copied().collect();
    file.new_dataset::<f64>()
        .shape((fixture.positions.len(), 3))
        .create(SOURCE_POSITION)?
        .write_raw(&flat)?;

    if let Some(ir) = &fixture.ir {
        let samples = ir.first().map_or(0, |pair| pair[0].len());
        let flat: Vec<f64> = ir.iter().flatten().flatten().copied().collect();

        file.new_dataset::<f64>()
            .shape((ir.len(), 2, samples))
            .create(DATA_IR)?
            .write_raw(&flat)?;
    }

    Ok(())
}
