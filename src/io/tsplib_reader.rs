use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use log::{debug, warn};

use crate::{
    errors::{Result, TspError},
    graph::{CompleteGraph, Vertex, VertexId},
};

pub trait GraphTsplibReader: Sized {
    fn try_read_tsplib<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_tsplib_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl GraphTsplibReader for CompleteGraph {
    fn try_read_tsplib<R: BufRead>(reader: R) -> Result<Self> {
        TsplibReader::new(reader).try_read()?.into_graph()
    }

    fn try_read_tsplib_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading {}", path.display());
        let reader = File::open(path)?;
        Self::try_read_tsplib(BufReader::new(reader))
    }
}

/// Contents of a TSPLIB file with `NODE_COORD_SECTION`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TsplibInstance {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub edge_weight_type: Option<String>,
    pub dimension: usize,
    pub vertices: Vec<Vertex>,
}

impl TsplibInstance {
    pub fn into_graph(self) -> Result<CompleteGraph> {
        CompleteGraph::try_from_vertices(self.vertices)
    }
}

pub struct TsplibReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

macro_rules! raise_error_unless {
    ($cond : expr, $line : expr, $info : expr) => {
        if !($cond) {
            return Err(TspError::MalformedInput(format!("line {}: {}", $line, $info)));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $line : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            $line,
            format!("premature end of line when parsing {}", $name)
        );
        let token = next.unwrap();

        let parsed = token.parse();
        raise_error_unless!(
            parsed.is_ok(),
            $line,
            format!("cannot parse {} from '{}'", $name, token)
        );

        parsed.unwrap()
    }};
}

impl<R: BufRead> TsplibReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Returns the next line that is not blank, trimmed
    fn next_non_empty_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }

    /// Splits `KEY : VALUE`, `KEY: VALUE` or `KEY VALUE` into key and value
    fn split_header(line: &str) -> (String, &str) {
        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key, value),
            None => line.split_once(char::is_whitespace).unwrap_or((line, "")),
        };
        (key.trim().to_ascii_uppercase(), value.trim())
    }

    pub fn try_read(mut self) -> Result<TsplibInstance> {
        let mut instance = TsplibInstance::default();
        let mut dimension = None;
        let mut found_section = false;

        // header
        while let Some(line) = self.next_non_empty_line()? {
            let (key, value) = Self::split_header(&line);
            match key.as_str() {
                "NODE_COORD_SECTION" => {
                    found_section = true;
                    break;
                }
                "EOF" => break,
                "NAME" => instance.name = Some(value.to_string()),
                "COMMENT" => instance.comment = Some(value.to_string()),
                "EDGE_WEIGHT_TYPE" => instance.edge_weight_type = Some(value.to_string()),
                "TYPE" => {
                    if !value.eq_ignore_ascii_case("TSP") {
                        warn!("line {}: unexpected problem type {value}", self.line_number);
                    }
                }
                "DIMENSION" => {
                    let mut parts = value.split_whitespace();
                    let dim: usize = parse_next_value!(parts, self.line_number, "DIMENSION");
                    dimension = Some(dim);
                }
                _ => debug!("line {}: ignoring header {key}", self.line_number),
            }
        }

        let Some(dimension) = dimension else {
            return Err(TspError::MalformedInput(format!(
                "line {}: missing DIMENSION",
                self.line_number
            )));
        };
        raise_error_unless!(
            found_section,
            self.line_number,
            "missing NODE_COORD_SECTION"
        );
        instance.dimension = dimension;

        if let Some(weight_type) = instance.edge_weight_type.as_deref() {
            if !weight_type.eq_ignore_ascii_case("EUC_2D") {
                warn!("edge weight type {weight_type} is treated as EUC_2D without rounding");
            }
        }

        // coordinates
        instance.vertices.reserve(instance.dimension);
        while let Some(line) = self.next_non_empty_line()? {
            if line == "EOF" {
                break;
            }

            let mut parts = line.split_whitespace();
            let id: VertexId = parse_next_value!(parts, self.line_number, "city id");
            let x: f64 = parse_next_value!(parts, self.line_number, "x coordinate");
            let y: f64 = parse_next_value!(parts, self.line_number, "y coordinate");
            raise_error_unless!(
                parts.next().is_none(),
                self.line_number,
                "expected end of line after the y coordinate"
            );

            instance.vertices.push(Vertex::from((id, x, y)));
        }

        raise_error_unless!(
            instance.vertices.len() == instance.dimension,
            self.line_number,
            format!(
                "DIMENSION is {}, but {} cities were given",
                instance.dimension,
                instance.vertices.len()
            )
        );

        Ok(instance)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::*;

    use glob::glob;
    use itertools::Itertools;

    fn read(data: &str) -> Result<TsplibInstance> {
        TsplibReader::new(data.as_bytes()).try_read()
    }

    fn expect_malformed(data: &str, line: usize) {
        match read(data) {
            Err(TspError::MalformedInput(msg)) => {
                assert!(msg.starts_with(&format!("line {line}:")), "{msg}")
            }
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn test_success() {
        const DEMO_FILE: &str = "NAME : demo\nCOMMENT : a comment: with colon\nTYPE : TSP\nDIMENSION : 3\nEDGE_WEIGHT_TYPE : EUC_2D\nNODE_COORD_SECTION\n1 0 0\n\n2 3.0 0\n3 3 4e0\nEOF\n";
        let instance = read(DEMO_FILE).unwrap();

        assert_eq!(instance.name.as_deref(), Some("demo"));
        assert_eq!(instance.comment.as_deref(), Some("a comment: with colon"));
        assert_eq!(instance.dimension, 3);

        let graph = instance.into_graph().unwrap();
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.labels(), &[1, 2, 3]);
        assert_eq!(graph.weight(1, 2), 4.0);
        assert_eq!(graph.weight(0, 2), 5.0);
    }

    #[test]
    fn dimension_spellings() {
        for header in ["DIMENSION: 2", "DIMENSION : 2", "DIMENSION 2", "  DIMENSION:2  "] {
            let data = format!("{header}\nNODE_COORD_SECTION\n1 0 0\n2 1 1\n");
            assert_eq!(read(&data).unwrap().dimension, 2, "{header}");
        }
    }

    #[test]
    fn malformed_inputs() {
        expect_malformed("NAME : x\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n", 2);
        expect_malformed("DIMENSION : two\nNODE_COORD_SECTION\n", 1);
        expect_malformed("DIMENSION : 2\n1 0 0\n2 1 1\n", 3);
        expect_malformed("DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 1 y\nEOF\n", 4);
        expect_malformed("DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 1\nEOF\n", 4);
        expect_malformed("DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 1 1 1\n", 4);
        expect_malformed("DIMENSION : 3\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n", 5);
    }

    #[test]
    fn duplicate_ids_are_rejected_by_the_graph() {
        let instance = read("DIMENSION : 2\nNODE_COORD_SECTION\n7 0 0\n7 1 1\n").unwrap();
        assert!(matches!(
            instance.into_graph(),
            Err(TspError::MalformedInput(_))
        ));
    }

    #[test]
    fn read_tiny_instances() {
        let files = glob("instances/tiny/*.tsp")
            .expect("Failed to glob")
            .map(|r| r.expect("Failed to access globbed path"))
            .collect_vec();

        assert!(!files.is_empty());

        for file in files {
            let graph = CompleteGraph::try_read_tsplib_file(&file)
                .unwrap_or_else(|e| panic!("cannot read {}: {e}", file.display()));
            assert!(graph.number_of_nodes() >= 2);
            assert!(graph.positions().iter().all(Point::is_finite));
        }
    }
}
