//! Final-answer rendering.
//!
//! Each algorithm family has one fixed answer line. The translator decides
//! *what* the answer is; this module only decides how it reads.

use crate::hints::Answer;
use crate::model::{trace::fmt_list, Algorithm, Edge};
use crate::{Error, Result};

/// Render a translator's answer as the algorithm's answer line.
///
/// An answer of the wrong shape for `algorithm` is rejected rather than
/// rendered under the wrong heading.
pub fn render_answer(algorithm: Algorithm, answer: &Answer) -> Result<String> {
    match (algorithm, answer) {
        (Algorithm::Bfs, Answer::Reachable(nodes)) => {
            Ok(format!("Reachable Nodes: {}", fmt_list(nodes)))
        }
        (Algorithm::Dfs, Answer::Components(groups)) => {
            Ok(format!("Connected Components: {}", fmt_list(groups.iter().map(|group| fmt_list(group)))))
        }
        (Algorithm::Dijkstra | Algorithm::FloydWarshall, Answer::Distances(triples)) => {
            Ok(format!("Distances: {}", fmt_list(triples)))
        }
        (Algorithm::BellmanFord, Answer::DistanceArray { source, distances }) => {
            let triples = distances
                .iter()
                .enumerate()
                .filter(|&(node, d)| node != *source && d.is_finite())
                .map(|(node, d)| Edge::weighted(*source, node, *d));
            Ok(format!("Distances: {}", fmt_list(triples)))
        }
        (Algorithm::MstPrim, Answer::MstEdges(edges)) => {
            Ok(format!("MST Edges: {}", fmt_list(edges)))
        }
        (algorithm, answer) => Err(Error::UnsupportedAlgorithm(format!(
            "{algorithm} cannot render a {} answer",
            answer.kind()
        ))),
    }
}

/// Render an answer for an algorithm given by registry name.
pub fn translate_output(algorithm: &str, answer: &Answer) -> Result<String> {
    render_answer(algorithm.parse()?, answer)
}
