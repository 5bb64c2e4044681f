use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::graph::*;

pub trait TsplibWriter {
    fn try_write_tsplib<W: Write>(&self, writer: W, name: &str) -> Result<(), std::io::Error>;
    fn try_write_tsplib_file<P: AsRef<Path>>(
        &self,
        path: P,
        name: &str,
    ) -> Result<(), std::io::Error>;
}

impl TsplibWriter for CompleteGraph {
    /// Writes an `EUC_2D` instance; coordinates are printed in their shortest exact form, so
    /// reading the file back yields an identical graph
    fn try_write_tsplib<W: Write>(&self, mut writer: W, name: &str) -> Result<(), std::io::Error> {
        writeln!(writer, "NAME : {name}")?;
        writeln!(writer, "TYPE : TSP")?;
        writeln!(writer, "DIMENSION : {}", self.number_of_nodes())?;
        writeln!(writer, "EDGE_WEIGHT_TYPE : EUC_2D")?;
        writeln!(writer, "NODE_COORD_SECTION")?;

        for Vertex { id, position } in self.vertices_with_labels() {
            writeln!(writer, "{id} {:?} {:?}", position.x, position.y)?;
        }

        writeln!(writer, "EOF")?;
        writer.flush()
    }

    fn try_write_tsplib_file<P: AsRef<Path>>(
        &self,
        path: P,
        name: &str,
    ) -> Result<(), std::io::Error> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_tsplib(writer, name)
    }
}

#[cfg(test)]
mod test {
    use crate::io::GraphTsplibReader;

    use super::*;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn hard_coded() {
        let graph =
            CompleteGraph::try_from_vertices([(4, 0.0, 0.5), (9, -1.25, 3.0)]).unwrap();

        let output = {
            let mut buffer: Vec<u8> = Vec::new();
            graph
                .try_write_tsplib(&mut buffer, "pair")
                .expect("Failed to write");
            String::from_utf8(buffer).unwrap()
        };

        assert!(Regex::new(r"(?m)^DIMENSION\s*:\s*2$").unwrap().is_match(&output));
        assert!(
            Regex::new(r"(?m)^4\s+0\.0\s+0\.5$").unwrap().is_match(&output),
            "Output: {output}"
        );
        assert!(
            Regex::new(r"(?m)^9\s+-1\.25\s+3\.0$").unwrap().is_match(&output),
            "Output: {output}"
        );
        assert!(output.trim_end().ends_with("EOF"));
    }

    #[test]
    fn transcribe() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1234);
        for n in [2, 3, 10, 100] {
            let org = CompleteGraph::random_clustered(&mut rng, n, 3, 1000.0, 25.0).unwrap();

            let mut buffer: Vec<u8> = Vec::new();
            org.try_write_tsplib(&mut buffer, "random")
                .expect("Failed to write");

            let read = CompleteGraph::try_read_tsplib(buffer.as_slice()).expect("Failed to read");

            assert_eq!(org.labels(), read.labels());
            assert_eq!(org.positions(), read.positions());
        }
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.tsp");
        let graph = CompleteGraph::try_from_points([
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap();

        graph.try_write_tsplib_file(&path, "square").unwrap();
        let read = CompleteGraph::try_read_tsplib_file(&path).unwrap();
        assert_eq!(read.labels(), &[1, 2, 3, 4]);
    }
}
