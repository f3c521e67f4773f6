use super::{rescale_layout, translate, Capabilities, LayoutAlgorithm, LayoutInput};

/// Positions from the Laplacian eigenvectors after the trivial one.
///
/// Directed graphs are symmetrized first.
pub struct Spectral;

const JACOBI_SWEEPS: usize = 100;

impl LayoutAlgorithm for Spectral {
    fn name(&self) -> &'static str {
        "spectral"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            weighted: true,
            pinned: false,
            center_hint: true,
        }
    }

    fn layout(&self, input: &LayoutInput) -> Vec<Vec<f64>> {
        let n = input.graph.node_count();
        let dim = input.dimensions;
        let center = input.center();

        match n {
            0 => return Vec::new(),
            1 => return vec![center],
            2 => return vec![vec![0.0; dim], center.iter().map(|c| c * 2.0).collect()],
            _ => {}
        }

        let mut adjacency = input.adjacency_matrix();
        if input.graph.is_directed() {
            let transposed: Vec<Vec<f64>> =
                (0..n).map(|i| (0..n).map(|j| adjacency[j][i]).collect()).collect();
            for (row, t_row) in adjacency.iter_mut().zip(transposed) {
                for (a, t) in row.iter_mut().zip(t_row) {
                    *a += t;
                }
            }
        }

        let (values, vectors) = symmetric_eigen(laplacian(&adjacency));

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut pos: Vec<Vec<f64>> = (0..n)
            .map(|row| {
                (0..dim)
                    .map(|axis| {
                        order
                            .get(axis + 1)
                            .map(|&col| vectors[row][col])
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        rescale_layout(&mut pos, input.scale);
        translate(&mut pos, &center);
        pos
    }
}

/// `D - A` with `D` the diagonal of row sums.
pub fn laplacian(adjacency: &[Vec<f64>]) -> Vec<Vec<f64>> {
    adjacency
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let degree: f64 = row.iter().sum();
            row.iter()
                .enumerate()
                .map(|(j, a)| if i == j { degree - a } else { -a })
                .collect()
        })
        .collect()
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns the eigenvalues and a matrix whose column `k` is the eigenvector
/// for eigenvalue `k`.
pub fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _ in 0..JACOBI_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off < 1.0e-22 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < f64::MIN_POSITIVE {
                    continue;
                }

                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let (akp, akq) = (a[k][p], a[k][q]);
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{input, letters_graph};
    use crate::layout::Anchoring;

    #[test]
    fn test_eigen_of_path_laplacian() {
        // path of three: eigenvalues 0, 1, 3
        let l = laplacian(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let (mut values, vectors) = symmetric_eigen(l.clone());

        for k in 0..3 {
            for i in 0..3 {
                let lv: f64 = (0..3).map(|j| l[i][j] * vectors[j][k]).sum();
                assert!((lv - values[k] * vectors[i][k]).abs() < 1e-9);
            }
        }

        values.sort_by(f64::total_cmp);
        assert!(values[0].abs() < 1e-9);
        assert!((values[1] - 1.0).abs() < 1e-9);
        assert!((values[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_is_laid_out_on_a_line() {
        let g = letters_graph(&[("A", "B", 1), ("B", "C", 1), ("C", "D", 1)], false);
        let pos = Spectral.layout(&input(&g, Anchoring::Free, 1));
        let xs: Vec<f64> = pos.iter().map(|p| p[0]).collect();

        // Fiedler vector is monotone along a path
        let increasing = xs.windows(2).all(|w| w[0] < w[1]);
        let decreasing = xs.windows(2).all(|w| w[0] > w[1]);
        assert!(increasing || decreasing);
    }

    #[test]
    fn test_two_nodes_are_not_rescaled() {
        let g = letters_graph(&[("A", "B", 1)], false);
        let pos = Spectral.layout(&input(&g, Anchoring::Center(vec![1.0, 0.5]), 2));
        assert_eq!(pos, vec![vec![0.0, 0.0], vec![2.0, 1.0]]);
    }
}
