use crate::error::SimplexError;

/// Set of `N + 1` vertices in `N`-dimensional parameter space
///
/// Degenerate vertex configurations are accepted as is.
#[derive(Clone, Debug, PartialEq)]
pub struct Simplex<const N: usize> {
    vertices: Vec<[f64; N]>,
}

impl<const N: usize> Simplex<N> {
    pub fn new(vertices: Vec<[f64; N]>) -> Result<Self, SimplexError> {
        if vertices.len() != N + 1 {
            return Err(SimplexError::WrongVertexCount {
                actual: vertices.len(),
                expected_dim: N,
            });
        }
        Ok(Self { vertices })
    }

    /// Simplex from a literal array of vertices
    ///
    /// # Panics
    /// Panics if `K` is not `N + 1`
    pub fn from_vertices<const K: usize>(vertices: [[f64; N]; K]) -> Self {
        assert_eq!(K, N + 1, "simplex must have N + 1 vertices");
        Self {
            vertices: vertices.to_vec(),
        }
    }

    pub fn vertices(&self) -> &[[f64; N]] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<[f64; N]> {
        self.vertices
    }
}

/// Box in parameter space, used to build a starting simplex with [inner_simplex]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<const N: usize> {
    pub lower: [f64; N],
    pub upper: [f64; N],
}

impl<const N: usize> Bounds<N> {
    pub fn new(lower: [f64; N], upper: [f64; N]) -> Self {
        Self { lower, upper }
    }
}

/// Non-degenerate simplex inscribed in the box
///
/// Vertex zero is the lower corner. Vertex `i` moves coordinate `i - 1` to its upper bound, keeps
/// the following coordinates at their lower bounds and puts the preceding ones to the middle of
/// their ranges. For `N = 3` and the unit box it gives $(0, 0, 0)$, $(1, 0, 0)$, $(1/2, 1, 0)$ and
/// $(1/2, 1/2, 1)$.
pub fn inner_simplex<const N: usize>(bounds: &Bounds<N>) -> Result<Simplex<N>, SimplexError> {
    let Bounds { lower, upper } = bounds;
    if let Some(index) =
        (0..N).find(|&j| lower[j] > upper[j] || lower[j].is_nan() || upper[j].is_nan())
    {
        return Err(SimplexError::InvertedBounds { index });
    }
    let vertices = std::iter::once(*lower)
        .chain((0..N).map(|i| {
            std::array::from_fn(|j| match j.cmp(&i) {
                std::cmp::Ordering::Less => 0.5 * (lower[j] + upper[j]),
                std::cmp::Ordering::Equal => upper[j],
                std::cmp::Ordering::Greater => lower[j],
            })
        }))
        .collect();
    Simplex::new(vertices)
}
