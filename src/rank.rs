//! PageRank over the indexed link graph
//!
//! Builds the teleport-smoothed transition matrix for the pages' adjacency
//! and power-iterates the rank vector to a fixed point. Page order is
//! whatever order the caller's adjacency rows are in; the caller relies on
//! that correspondence to write ranks back.

/// Teleport probability
pub const ALPHA: f64 = 0.1;

/// L2 distance between iterations below which the rank vector is converged
pub const CONVERGENCE: f64 = 1e-4;

/// Compute PageRank for the graph given as adjacency rows.
///
/// `outlinks[i]` lists the indices of pages that page `i` links to. Rows may
/// be empty: a dangling page is treated as linking uniformly to every page.
/// Returns one rank per page, in row order.
pub fn compute(outlinks: &[Vec<usize>], alpha: f64, convergence: f64) -> Vec<f64> {
    let n = outlinks.len();
    if n == 0 {
        return Vec::new();
    }

    let matrix = transition_matrix(outlinks, alpha);

    let mut rank = vec![1.0 / n as f64; n];
    loop {
        let next = row_vector_multiply(&rank, &matrix, n);
        let distance = l2_distance(&next, &rank);
        rank = next;
        if distance <= convergence {
            break;
        }
    }
    rank
}

/// Build the row-stochastic transition matrix, flattened row-major.
///
/// The `alpha/N` teleport term is added to every cell up front, so dangling
/// rows and linking rows use the same additive construction:
/// - linking row: `alpha/N + (1-alpha)/row_links` on each linked column
/// - dangling row: `alpha/N + (1-alpha)/N` everywhere, i.e. uniform `1/N`
fn transition_matrix(outlinks: &[Vec<usize>], alpha: f64) -> Vec<f64> {
    let n = outlinks.len();
    let teleport = alpha / n as f64;
    let mut matrix = vec![teleport; n * n];

    for (i, links) in outlinks.iter().enumerate() {
        let row = &mut matrix[i * n..(i + 1) * n];
        if links.is_empty() {
            let share = (1.0 - alpha) / n as f64;
            for cell in row.iter_mut() {
                *cell += share;
            }
        } else {
            let share = (1.0 - alpha) / links.len() as f64;
            for &j in links {
                row[j] += share;
            }
        }
    }
    matrix
}

/// Multiply a row vector by a square matrix: `product[i] = sum_j v[j]*M[j][i]`.
fn row_vector_multiply(vector: &[f64], matrix: &[f64], n: usize) -> Vec<f64> {
    let mut product = vec![0.0; n];
    for (j, &v) in vector.iter().enumerate() {
        let row = &matrix[j * n..(j + 1) * n];
        for (i, &m) in row.iter().enumerate() {
            product[i] += v * m;
        }
    }
    product
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_no_ranks() {
        assert!(compute(&[], ALPHA, CONVERGENCE).is_empty());
    }

    #[test]
    fn single_page_ranks_one() {
        let ranks = compute(&[vec![]], ALPHA, CONVERGENCE);
        assert_eq!(ranks, vec![1.0]);
    }

    #[test]
    fn mutual_pair_splits_evenly() {
        let ranks = compute(&[vec![1], vec![0]], ALPHA, CONVERGENCE);
        assert!((ranks[0] - 0.5).abs() <= CONVERGENCE);
        assert!((ranks[1] - 0.5).abs() <= CONVERGENCE);
    }

    #[test]
    fn dangling_sinks_are_symmetric_and_mass_is_conserved() {
        // X links to Y and Z; Y and Z have no outlinks.
        let ranks = compute(&[vec![1, 2], vec![], vec![]], ALPHA, CONVERGENCE);

        assert!((ranks[1] - ranks[2]).abs() < 1e-9);
        assert!(ranks.iter().all(|&r| r > 0.0));
        let total: f64 = ranks.iter().sum();
        assert!((total - 1.0).abs() <= 10.0 * CONVERGENCE);
    }

    #[test]
    fn linked_to_page_outranks_its_linker() {
        // Chain with a popular sink: A->C, B->C, C dangling.
        let ranks = compute(&[vec![2], vec![2], vec![]], ALPHA, CONVERGENCE);
        assert!(ranks[2] > ranks[0]);
        assert!(ranks[2] > ranks[1]);
    }

    #[test]
    fn transition_rows_sum_to_one() {
        let outlinks = vec![vec![1, 2], vec![], vec![0]];
        let n = outlinks.len();
        let matrix = transition_matrix(&outlinks, ALPHA);
        for i in 0..n {
            let row_sum: f64 = matrix[i * n..(i + 1) * n].iter().sum();
            assert!((row_sum - 1.0).abs() < 1e-12, "row {} sums to {}", i, row_sum);
        }
    }

    #[test]
    fn row_vector_multiply_matches_hand_calculation() {
        // v * M with M = [[1,2],[3,4]] (row-major), v = [1, 10]
        let matrix = vec![1.0, 2.0, 3.0, 4.0];
        let product = row_vector_multiply(&[1.0, 10.0], &matrix, 2);
        assert_eq!(product, vec![31.0, 42.0]);
    }
}
