use crate::core::models::system::SimulationBox;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const RESIDUE_PLACEHOLDER: &str = "UNK";

/// Writes a fixed-column PDB snapshot of every atom in the box.
///
/// Each atom becomes one `ATOM` record carrying its serial number, name, a residue
/// placeholder, the 1-based molecule index and its coordinates. Every molecule is
/// closed by `TER` and the file by `END`.
pub fn write_pdb(sim_box: &SimulationBox, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "REMARK Created by metrosim")?;
    for (index, molecule) in sim_box.molecules().iter().enumerate() {
        for atom in molecule.atoms() {
            writeln!(
                writer,
                "{:<6}{:>5}{:>3}{:>6}{:>6}{:>12.3}{:>8.3}{:>8.3}",
                "ATOM",
                atom.id + 1,
                atom.name,
                RESIDUE_PLACEHOLDER,
                index + 1,
                atom.position.x,
                atom.position.y,
                atom.position.z
            )?;
        }
        writeln!(writer, "TER")?;
    }
    writeln!(writer, "END")?;
    Ok(())
}

pub fn write_pdb_to_path<P: AsRef<Path>>(sim_box: &SimulationBox, path: P) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pdb(sim_box, &mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::environment::Environment;
    use crate::core::models::molecule::Molecule;
    use nalgebra::Point3;

    fn water_pair() -> SimulationBox {
        let env = Environment {
            dimensions: [30.0, 30.0, 30.0],
            temperature: 300.0,
            max_translation: 0.1,
            max_rotation: 5.0,
            cutoff: 10.0,
            seed: 1,
            molecule_count: 2,
            primary_atom_index: 0,
        };
        let molecules = vec![
            Molecule::new(
                0,
                vec![
                    Atom::new(0, "O", "OW", Point3::new(1.0, 2.0, 3.0)),
                    Atom::new(1, "H", "HW", Point3::new(1.5, 2.25, 3.125)),
                ],
            ),
            Molecule::new(1, vec![Atom::new(2, "O", "OW", Point3::new(10.0, 20.0, 29.5))]),
        ];
        SimulationBox::new(env, molecules).unwrap()
    }

    #[test]
    fn writes_fixed_column_records() {
        let mut buffer = Vec::new();
        write_pdb(&water_pair(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "REMARK Created by metrosim");
        assert_eq!(
            lines[1],
            "ATOM      1  O   UNK     1       1.000   2.000   3.000"
        );
        assert_eq!(
            lines[2],
            "ATOM      2  H   UNK     1       1.500   2.250   3.125"
        );
        assert_eq!(lines[3], "TER");
        assert_eq!(
            lines[4],
            "ATOM      3  O   UNK     2      10.000  20.000  29.500"
        );
        assert_eq!(lines[5], "TER");
        assert_eq!(lines[6], "END");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn writes_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.pdb");
        write_pdb_to_path(&water_pair(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("END\n"));
        assert_eq!(text.matches("ATOM").count(), 3);
    }
}
